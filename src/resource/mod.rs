// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Internet number resources: blocks of IP address space and AS
//! numbers.
//!
//! Registry objects such as inetnum, inet6num, route and as-block are
//! keyed by a block of some number space, and these blocks nest: an
//! allocation contains assignments, which contain smaller assignments,
//! and so on. A [`ResourceKey`] is a block in one of the three number
//! spaces, and is what an
//! [`AddressSpaceIndex`](crate::index::AddressSpaceIndex) is searched
//! with.

use std::fmt;
use std::str::FromStr;

mod asn;
mod interval;
mod ip;
mod reverse;
pub use asn::{AsNumber, AsRange};
pub use interval::Interval;
pub use ip::IpInterval;
pub use reverse::parse_reverse_domain;

/// A block of IPv4, IPv6, or AS number space.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ResourceKey {
    Ip(IpInterval),
    As(AsRange),
}

impl ResourceKey {
    /// Returns whether the key covers the entirety of its number space.
    /// More-specific lookups of such keys would match every object.
    pub fn is_whole_space(&self) -> bool {
        match self {
            Self::Ip(interval) => interval.is_whole_space(),
            Self::As(range) => *range == AsRange::whole(),
        }
    }

    /// Returns whether `other` lies within this key. Keys from
    /// different number spaces never contain each other.
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ip(a), Self::Ip(b)) => a.contains(b),
            (Self::As(a), Self::As(b)) => a.contains(b),
            _ => false,
        }
    }
}

impl From<IpInterval> for ResourceKey {
    fn from(interval: IpInterval) -> Self {
        Self::Ip(interval)
    }
}

impl From<AsRange> for ResourceKey {
    fn from(range: AsRange) -> Self {
        Self::As(range)
    }
}

impl From<AsNumber> for ResourceKey {
    fn from(number: AsNumber) -> Self {
        Self::As(AsRange::single(number))
    }
}

impl FromStr for ResourceKey {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if let Ok(interval) = text.parse::<IpInterval>() {
            Ok(Self::Ip(interval))
        } else if let Ok(number) = text.parse::<AsNumber>() {
            Ok(number.into())
        } else if let Ok(range) = text.parse::<AsRange>() {
            Ok(Self::As(range))
        } else {
            Err("not an IP block, AS number, or AS range")
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ip(interval) => write!(f, "{}", interval),
            Self::As(range) if range.begin() == range.end() => write!(f, "{}", range.begin()),
            Self::As(range) => write!(f, "{}", range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_number_space() {
        let ip: ResourceKey = "10.0.0.0 - 10.255.255.255".parse().unwrap();
        assert_eq!(ip.to_string(), "10.0.0.0/8");
        let asn: ResourceKey = "AS2050".parse().unwrap();
        assert_eq!(asn.to_string(), "AS2050");
        let block: ResourceKey = "AS2048 - AS2559".parse().unwrap();
        assert_eq!(block.to_string(), "AS2048 - AS2559");
        assert!(block.contains(&asn));
        assert!(!ip.contains(&asn));
        assert!("foo".parse::<ResourceKey>().is_err());
    }

    #[test]
    fn whole_spaces_are_detected() {
        assert!(ResourceKey::Ip(IpInterval::whole_v6()).is_whole_space());
        assert!(ResourceKey::As(AsRange::whole()).is_whole_space());
        assert!(!ResourceKey::from(AsNumber::from(1)).is_whole_space());
    }
}
