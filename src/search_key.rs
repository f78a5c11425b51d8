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

//! Classification of the free-text search term of a query.

use std::fmt;

use crate::resource::{parse_reverse_domain, AsNumber, AsRange, IpInterval, ResourceKey};

/// What a [`SearchKey`] turned out to be.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SearchKeyKind {
    Plain,
    Ipv4,
    Ipv6,
    AsNumber,
    AsRange,
}

/// The search term of a query, classified.
///
/// Classification tries, in order: an IPv4 address, prefix or range;
/// an IPv6 address or prefix; a route prefix immediately followed by
/// its origin AS (`10.0.0.0/8AS3333`); an AS number; an AS range; and
/// a reverse-DNS name under `in-addr.arpa` or `ip6.arpa`. The first
/// form that parses wins. Anything else is [`SearchKeyKind::Plain`],
/// so classification never fails.
///
/// A reverse-DNS name stays `Plain` (it is looked up by name) but also
/// records the address block it delegates as the
/// [reverse key](Self::ip_key_reverse).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchKey {
    value: String,
    kind: SearchKeyKind,
    address_key: Option<ResourceKey>,
    reverse_key: Option<IpInterval>,
    origin: Option<AsNumber>,
}

impl SearchKey {
    /// Classifies `term`. Leading and trailing whitespace is ignored.
    pub fn new(term: &str) -> Self {
        let value = term.trim();
        let mut key = Self {
            value: value.to_owned(),
            kind: SearchKeyKind::Plain,
            address_key: None,
            reverse_key: None,
            origin: None,
        };
        if value.is_empty() {
            return key;
        }

        if let Some(interval) = IpInterval::parse_v4(value) {
            key.set_address(SearchKeyKind::Ipv4, interval.into());
        } else if let Some(interval) = IpInterval::parse_v6(value) {
            key.set_address(SearchKeyKind::Ipv6, interval.into());
        } else if let Some((interval, origin)) = parse_route_with_origin(value) {
            let kind = if interval.is_v4() {
                SearchKeyKind::Ipv4
            } else {
                SearchKeyKind::Ipv6
            };
            key.set_address(kind, interval.into());
            key.origin = Some(origin);
        } else if let Ok(number) = value.parse::<AsNumber>() {
            key.set_address(SearchKeyKind::AsNumber, number.into());
        } else if let Ok(range) = value.parse::<AsRange>() {
            key.set_address(SearchKeyKind::AsRange, range.into());
        } else {
            key.reverse_key = parse_reverse_domain(value);
        }
        key
    }

    fn set_address(&mut self, kind: SearchKeyKind, address_key: ResourceKey) {
        self.kind = kind;
        self.address_key = Some(address_key);
    }

    /// Returns the trimmed term, exactly as given.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> SearchKeyKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns the block of number space the term denotes, if it is an
    /// IP address, prefix, or range, or an AS number or range.
    pub fn address_key(&self) -> Option<ResourceKey> {
        self.address_key
    }

    /// Returns the IP block the term denotes, if any.
    pub fn ip_key(&self) -> Option<IpInterval> {
        match self.address_key {
            Some(ResourceKey::Ip(interval)) => Some(interval),
            _ => None,
        }
    }

    /// Returns the IP block delegated by the term, if it is a
    /// reverse-DNS name.
    pub fn ip_key_reverse(&self) -> Option<IpInterval> {
        self.reverse_key
    }

    /// Returns the AS numbers the term denotes. A single AS number is
    /// returned as a range of one.
    pub fn as_range(&self) -> Option<AsRange> {
        match self.address_key {
            Some(ResourceKey::As(range)) => Some(range),
            _ => None,
        }
    }

    /// Returns the origin AS of a `prefixASn` route term.
    pub fn origin(&self) -> Option<AsNumber> {
        self.origin
    }

    /// Returns the canonical textual form of the term: address forms
    /// are normalized, and plain terms are returned unchanged.
    pub fn normalized(&self) -> String {
        match (self.address_key, self.origin) {
            (Some(key), Some(origin)) => format!("{}{}", key, origin),
            (Some(key), None) => key.to_string(),
            (None, _) => self.value.clone(),
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Parses the `prefixASn` form used to look up a route object by both
/// halves of its key.
fn parse_route_with_origin(text: &str) -> Option<(IpInterval, AsNumber)> {
    let split = text.to_ascii_uppercase().rfind("AS")?;
    let (prefix, origin) = text.split_at(split);
    if !prefix.contains('/') {
        return None;
    }
    let interval = prefix.parse().ok()?;
    let origin = origin.parse().ok()?;
    Some((interval, origin))
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
