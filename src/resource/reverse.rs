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

//! Conversion of reverse-DNS domain names into the address space they
//! delegate.
//!
//! Under `in-addr.arpa` ([RFC 1035 § 3.5]) each label is an octet of
//! an IPv4 address in decimal, least significant first. The leftmost
//! label may also be a range `a-b` of octets, as used by classless
//! delegations ([RFC 2317]). Under `ip6.arpa` ([RFC 3596 § 2.5]) each
//! label is a nibble of an IPv6 address in hexadecimal, least
//! significant first.
//!
//! [RFC 1035 § 3.5]: https://datatracker.ietf.org/doc/html/rfc1035#section-3.5
//! [RFC 2317]: https://datatracker.ietf.org/doc/html/rfc2317
//! [RFC 3596 § 2.5]: https://datatracker.ietf.org/doc/html/rfc3596#section-2.5

use super::{Interval, IpInterval};
use crate::util::{ascii_hex_digit_to_nibble, parse_decimal_u32, strip_suffix_caseless};

const IN_ADDR_ARPA: &str = ".in-addr.arpa";
const IP6_ARPA: &str = ".ip6.arpa";

/// Converts a reverse-DNS domain name into the block of address space
/// it covers. A trailing dot is permitted.
pub fn parse_reverse_domain(name: &str) -> Option<IpInterval> {
    let name = name.strip_suffix('.').unwrap_or(name);
    if let Some(labels) = strip_suffix_caseless(name, IN_ADDR_ARPA) {
        parse_in_addr_labels(labels)
    } else if let Some(labels) = strip_suffix_caseless(name, IP6_ARPA) {
        parse_ip6_labels(labels)
    } else {
        None
    }
}

fn parse_in_addr_labels(labels: &str) -> Option<IpInterval> {
    let labels: Vec<&str> = labels.split('.').collect();
    if labels.len() > 4 {
        return None;
    }

    // Walk from the most significant octet (the rightmost label). Only
    // the leftmost label may be a range.
    let mut begin = 0u32;
    let mut end = 0u32;
    for (i, label) in labels.iter().rev().enumerate() {
        let (low, high) = match label.split_once('-') {
            Some((low, high)) if i == labels.len() - 1 => (parse_octet(low)?, parse_octet(high)?),
            Some(_) => return None,
            None => {
                let octet = parse_octet(label)?;
                (octet, octet)
            }
        };
        if low > high {
            return None;
        }
        begin = begin << 8 | low;
        end = end << 8 | high;
    }

    let host_bits = 8 * (4 - labels.len() as u32);
    let host_mask = 1u32.checked_shl(host_bits).map_or(u32::MAX, |n| n - 1);
    begin = begin.checked_shl(host_bits).unwrap_or(0);
    end = end.checked_shl(host_bits).unwrap_or(0) | host_mask;
    Interval::new(begin, end).map(IpInterval::V4)
}

fn parse_octet(label: &str) -> Option<u32> {
    parse_decimal_u32(label).filter(|&octet| octet <= 255)
}

fn parse_ip6_labels(labels: &str) -> Option<IpInterval> {
    let labels: Vec<&str> = labels.split('.').collect();
    if labels.len() > 32 {
        return None;
    }

    let mut begin = 0u128;
    for label in labels.iter().rev() {
        let nibble = match label.as_bytes() {
            [digit] => ascii_hex_digit_to_nibble(*digit)?,
            _ => return None,
        };
        begin = begin << 4 | nibble as u128;
    }

    let host_bits = 4 * (32 - labels.len() as u32);
    let host_mask = 1u128.checked_shl(host_bits).map_or(u128::MAX, |n| n - 1);
    begin = begin.checked_shl(host_bits).unwrap_or(0);
    Interval::new(begin, begin | host_mask).map(IpInterval::V6)
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn reverse(name: &str) -> String {
        parse_reverse_domain(name).unwrap().to_string()
    }

    #[test]
    fn in_addr_arpa_names_convert() {
        assert_eq!(reverse("1.0.10.in-addr.arpa"), "10.0.1.0/24");
        assert_eq!(reverse("0.10.in-addr.arpa."), "10.0.0.0/16");
        assert_eq!(reverse("10.IN-ADDR.ARPA"), "10.0.0.0/8");
        assert_eq!(reverse("5.1.0.10.in-addr.arpa"), "10.0.1.5/32");
    }

    #[test]
    fn classless_delegations_convert() {
        assert_eq!(reverse("0-127.1.0.10.in-addr.arpa"), "10.0.1.0/25");
        assert_eq!(reverse("1-6.1.0.10.in-addr.arpa"), "10.0.1.1 - 10.0.1.6");
        assert!(parse_reverse_domain("1.0-1.10.in-addr.arpa").is_none());
        assert!(parse_reverse_domain("9-1.1.0.10.in-addr.arpa").is_none());
    }

    #[test]
    fn ip6_arpa_names_convert() {
        assert_eq!(reverse("8.b.d.0.1.0.0.2.ip6.arpa"), "2001:db8::/32");
        assert_eq!(reverse("8.B.D.0.1.0.0.2.ip6.arpa."), "2001:db8::/32");
        assert!(parse_reverse_domain("8b.d.0.1.0.0.2.ip6.arpa").is_none());
    }

    #[test]
    fn bad_names_are_rejected() {
        assert!(parse_reverse_domain("256.10.in-addr.arpa").is_none());
        assert!(parse_reverse_domain("1.2.3.4.5.in-addr.arpa").is_none());
        assert!(parse_reverse_domain("example.in-addr.arpa").is_none());
        assert!(parse_reverse_domain("in-addr.arpa").is_none());
        assert!(parse_reverse_domain("ripe.net").is_none());
    }
}
