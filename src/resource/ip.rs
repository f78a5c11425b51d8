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

//! The [`IpInterval`] type for IPv4 and IPv6 address space.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::Interval;
use crate::util::parse_decimal_u32;

/// A contiguous block of IPv4 or IPv6 address space.
///
/// The textual forms accepted are:
///
/// * a single address (`192.0.2.1`, `2001:db8::1`), which becomes a
///   block of one address;
/// * a prefix (`192.0.2.0/24`, `2001:db8::/32`), whose host bits are
///   cleared if set;
/// * for IPv4 only, an explicit range (`192.0.2.0 - 192.0.2.127`).
///
/// Blocks that are prefixes display in prefix form, and other blocks as
/// ranges.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum IpInterval {
    V4(Interval<u32>),
    V6(Interval<u128>),
}

impl IpInterval {
    /// The whole IPv4 address space, `0.0.0.0/0`.
    pub fn whole_v4() -> Self {
        Self::V4(Interval::from_ordered(0, u32::MAX))
    }

    /// The whole IPv6 address space, `::/0`.
    pub fn whole_v6() -> Self {
        Self::V6(Interval::from_ordered(0, u128::MAX))
    }

    /// Creates the IPv4 block with the given prefix. Host bits set in
    /// `address` are ignored.
    pub fn v4_prefix(address: Ipv4Addr, len: u8) -> Option<Self> {
        if len > 32 {
            return None;
        }
        let host_mask = u32::MAX.checked_shr(len as u32).unwrap_or(0);
        let begin = u32::from(address) & !host_mask;
        Some(Self::V4(Interval::from_ordered(begin, begin | host_mask)))
    }

    /// Creates the IPv6 block with the given prefix. Host bits set in
    /// `address` are ignored.
    pub fn v6_prefix(address: Ipv6Addr, len: u8) -> Option<Self> {
        if len > 128 {
            return None;
        }
        let host_mask = u128::MAX.checked_shr(len as u32).unwrap_or(0);
        let begin = u128::from(address) & !host_mask;
        Some(Self::V6(Interval::from_ordered(begin, begin | host_mask)))
    }

    /// Parses the IPv4 textual forms.
    pub fn parse_v4(text: &str) -> Option<Self> {
        if let Some((begin, end)) = text.split_once('-') {
            let begin: Ipv4Addr = begin.trim().parse().ok()?;
            let end: Ipv4Addr = end.trim().parse().ok()?;
            Interval::new(u32::from(begin), u32::from(end)).map(Self::V4)
        } else if let Some((address, len)) = text.split_once('/') {
            let len = parse_prefix_len(len)?;
            Self::v4_prefix(address.parse().ok()?, len)
        } else {
            Self::v4_prefix(text.parse().ok()?, 32)
        }
    }

    /// Parses the IPv6 textual forms.
    pub fn parse_v6(text: &str) -> Option<Self> {
        if let Some((address, len)) = text.split_once('/') {
            let len = parse_prefix_len(len)?;
            Self::v6_prefix(address.parse().ok()?, len)
        } else {
            Self::v6_prefix(text.parse().ok()?, 128)
        }
    }

    /// Returns whether this block is all of IPv4 or all of IPv6.
    pub fn is_whole_space(&self) -> bool {
        *self == Self::whole_v4() || *self == Self::whole_v6()
    }

    /// Returns the prefix length of the block, or [`None`] if it is
    /// not a prefix.
    pub fn prefix_len(&self) -> Option<u8> {
        match *self {
            Self::V4(interval) => {
                let span = interval.end() - interval.begin();
                (span & span.wrapping_add(1) == 0 && interval.begin() & span == 0)
                    .then(|| (32 - span.count_ones()) as u8)
            }
            Self::V6(interval) => {
                let span = interval.end() - interval.begin();
                (span & span.wrapping_add(1) == 0 && interval.begin() & span == 0)
                    .then(|| (128 - span.count_ones()) as u8)
            }
        }
    }

    /// Returns whether `other` lies within this block. Blocks of
    /// different address families never contain each other.
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::V4(a), Self::V4(b)) => a.contains(b),
            (Self::V6(a), Self::V6(b)) => a.contains(b),
            _ => false,
        }
    }

    pub fn is_v4(&self) -> bool {
        matches!(self, Self::V4(_))
    }

    pub fn is_v6(&self) -> bool {
        matches!(self, Self::V6(_))
    }
}

/// Parses the length after the `/` of a prefix.
fn parse_prefix_len(text: &str) -> Option<u8> {
    parse_decimal_u32(text).and_then(|len| u8::try_from(len).ok())
}

impl FromStr for IpInterval {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse_v4(text)
            .or_else(|| Self::parse_v6(text))
            .ok_or("not an IP address, prefix, or range")
    }
}

impl fmt::Display for IpInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix_len = self.prefix_len();
        match (*self, prefix_len) {
            (Self::V4(interval), Some(len)) => {
                write!(f, "{}/{}", Ipv4Addr::from(interval.begin()), len)
            }
            (Self::V4(interval), None) => write!(
                f,
                "{} - {}",
                Ipv4Addr::from(interval.begin()),
                Ipv4Addr::from(interval.end())
            ),
            (Self::V6(interval), Some(len)) => {
                write!(f, "{}/{}", Ipv6Addr::from(interval.begin()), len)
            }
            (Self::V6(interval), None) => write!(
                f,
                "{} - {}",
                Ipv6Addr::from(interval.begin()),
                Ipv6Addr::from(interval.end())
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(text: &str) -> IpInterval {
        IpInterval::parse_v4(text).unwrap()
    }

    #[test]
    fn parses_ipv4_forms() {
        assert_eq!(v4("192.0.2.1").to_string(), "192.0.2.1/32");
        assert_eq!(v4("192.0.2.0/24").to_string(), "192.0.2.0/24");
        assert_eq!(v4("192.0.2.77/24").to_string(), "192.0.2.0/24");
        assert_eq!(v4("0.0.0.0/0"), IpInterval::whole_v4());
        assert_eq!(v4("192.0.2.0 - 192.0.2.255").to_string(), "192.0.2.0/24");
        assert_eq!(
            v4("192.0.2.0-192.0.2.127").to_string(),
            "192.0.2.0/25"
        );
        assert_eq!(
            v4("192.0.2.1 - 192.0.2.6").to_string(),
            "192.0.2.1 - 192.0.2.6"
        );
    }

    #[test]
    fn rejects_bad_ipv4_forms() {
        assert!(IpInterval::parse_v4("192.0.2.0/33").is_none());
        assert!(IpInterval::parse_v4("192.0.2.0/+8").is_none());
        assert!(IpInterval::parse_v4("192.0.2.9 - 192.0.2.1").is_none());
        assert!(IpInterval::parse_v4("192.0.2").is_none());
        assert!(IpInterval::parse_v4("2001:db8::/32").is_none());
    }

    #[test]
    fn parses_ipv6_forms() {
        let prefix = IpInterval::parse_v6("2001:DB8::/32").unwrap();
        assert_eq!(prefix.to_string(), "2001:db8::/32");
        let address = IpInterval::parse_v6("2001:db8::1").unwrap();
        assert_eq!(address.to_string(), "2001:db8::1/128");
        assert_eq!(
            IpInterval::parse_v6("::/0").unwrap(),
            IpInterval::whole_v6()
        );
        assert!(IpInterval::parse_v6("2001:db8::/129").is_none());
        assert!(prefix.contains(&address));
        assert!(!address.contains(&prefix));
    }

    #[test]
    fn families_do_not_contain_each_other() {
        assert!(!IpInterval::whole_v4().contains(&IpInterval::whole_v6()));
        assert!(!IpInterval::whole_v6().contains(&v4("192.0.2.0/24")));
    }

    #[test]
    fn whole_space_is_detected() {
        assert!(IpInterval::whole_v4().is_whole_space());
        assert!(IpInterval::whole_v6().is_whole_space());
        assert!(!v4("0.0.0.0/1").is_whole_space());
        assert_eq!(IpInterval::whole_v4().prefix_len(), Some(0));
        assert_eq!(IpInterval::whole_v6().prefix_len(), Some(0));
    }
}
