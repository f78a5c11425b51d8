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

//! Decides which attributes a query's search key could match.
//!
//! A search key can only find an object through an attribute whose
//! syntax the key fits: `10.0.0.0/8` can find an inetnum or a route,
//! but never a person, and `AS-FOO` can find an as-set but no address
//! space. Object types none of whose lookup attributes fit are dropped
//! from a query's type filter.

use super::Query;
use crate::resource::AsNumber;
use crate::rpsl::AttributeType;
use crate::search_key::SearchKeyKind;
use crate::util::strip_prefix_caseless;

/// Returns whether `query` can fetch objects through `attribute`.
pub fn fetchable_by(attribute: AttributeType, query: &Query) -> bool {
    let key = query.search_key();
    let value = key.value();
    let plain = key.kind() == SearchKeyKind::Plain;
    match attribute {
        AttributeType::Inetnum | AttributeType::Route => {
            query.ip_key().map_or(false, |ip| ip.is_v4())
        }
        AttributeType::Inet6num | AttributeType::Route6 => {
            query.ip_key().map_or(false, |ip| ip.is_v6())
        }
        AttributeType::AutNum | AttributeType::Origin | AttributeType::LocalAs => {
            key.kind() == SearchKeyKind::AsNumber
        }
        AttributeType::AsBlock => key.as_range().is_some(),
        AttributeType::Domain => {
            query.ip_key_reverse().is_some() || (plain && is_domain_name(value))
        }
        AttributeType::InetRtr => plain && is_domain_name(value),
        AttributeType::AsSet => is_set_name(value, "AS-"),
        AttributeType::RouteSet => is_set_name(value, "RS-"),
        AttributeType::FilterSet => is_set_name(value, "FLTR-"),
        AttributeType::PeeringSet => is_set_name(value, "PRNG-"),
        AttributeType::RtrSet => is_set_name(value, "RTRS-"),
        AttributeType::Irt => has_named_prefix(value, "IRT-"),
        AttributeType::Poem => has_named_prefix(value, "POEM-"),
        AttributeType::PoeticForm => has_named_prefix(value, "FORM-"),
        AttributeType::Organisation => has_named_prefix(value, "ORG-"),
        AttributeType::KeyCert => is_key_cert(value),
        AttributeType::Mntner => is_object_name(value),
        AttributeType::NicHdl => is_nic_handle(value),
        AttributeType::Person | AttributeType::Role => is_person_name(value),
        _ => !value.is_empty(),
    }
}

////////////////////////////////////////////////////////////////////////
// SYNTAX PREDICATES                                                  //
////////////////////////////////////////////////////////////////////////

/// Checks the syntax of an object name such as a maintainer: a letter,
/// then letters, digits, hyphens and underscores, ending in a letter or
/// digit.
fn is_object_name(value: &str) -> bool {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= 80
                && first.is_ascii_alphabetic()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
        }
        _ => false,
    }
}

/// Checks for an object name with a class prefix, like `IRT-EXAMPLE`.
fn has_named_prefix(value: &str, prefix: &str) -> bool {
    strip_prefix_caseless(value, prefix).map_or(false, |rest| !rest.is_empty())
        && is_object_name(value)
}

/// Checks the syntax of a set name. A set name is a colon-separated
/// list of components, each an AS number or a name, where at least one
/// component carries the set class prefix (`AS-`, `RS-`, ...).
fn is_set_name(value: &str, prefix: &str) -> bool {
    let mut has_prefixed = false;
    for component in value.split(':') {
        if has_named_prefix(component, prefix) {
            has_prefixed = true;
        } else if component.parse::<AsNumber>().is_err() && !is_object_name(component) {
            return false;
        }
    }
    has_prefixed
}

/// Checks the syntax of a NIC handle: two to four letters, up to six
/// digits, and an optional suffix after a hyphen (e.g. `JS123-RIPE`),
/// or an `AUTO-n` placeholder.
fn is_nic_handle(value: &str) -> bool {
    let (head, suffix) = match value.split_once('-') {
        Some((head, suffix)) => (head, Some(suffix)),
        None => (value, None),
    };
    if head.eq_ignore_ascii_case("AUTO") {
        return suffix.map_or(false, is_digits);
    }

    let letters = head.bytes().take_while(u8::is_ascii_alphabetic).count();
    let digits = &head[letters..];
    (2..=4).contains(&letters)
        && digits.len() <= 6
        && digits.bytes().all(|b| b.is_ascii_digit())
        && suffix.map_or(true, |suffix| {
            (1..=10).contains(&suffix.len()) && suffix.bytes().all(|b| b.is_ascii_alphanumeric())
        })
}

/// Checks the syntax of a key-cert name: `PGPKEY-` and eight hex
/// digits, or `X509-` and a number.
fn is_key_cert(value: &str) -> bool {
    if let Some(id) = strip_prefix_caseless(value, "PGPKEY-") {
        id.len() == 8 && id.bytes().all(|b| b.is_ascii_hexdigit())
    } else if let Some(id) = strip_prefix_caseless(value, "X509-") {
        is_digits(id)
    } else {
        false
    }
}

/// Checks the syntax of a person or role name: at least two words,
/// each starting with a letter.
fn is_person_name(value: &str) -> bool {
    let mut words = 0;
    for word in value.split_whitespace() {
        let valid = word.starts_with(|c: char| c.is_ascii_alphabetic())
            && word
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || ".'`-_".contains(c));
        if !valid {
            return false;
        }
        words += 1;
    }
    words >= 2
}

/// Checks the syntax of a domain name with at least two labels. A
/// trailing dot is permitted.
fn is_domain_name(value: &str) -> bool {
    let name = value.strip_suffix('.').unwrap_or(value);
    if name.len() > 253 || !name.contains('.') {
        return false;
    }
    name.split('.').all(|label| {
        (1..=63).contains(&label.len())
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names() {
        assert!(is_object_name("EXAMPLE-MNT"));
        assert!(is_object_name("a_b1"));
        assert!(!is_object_name("1ABC"));
        assert!(!is_object_name("ABC-"));
        assert!(!is_object_name("foo bar"));
        assert!(!is_object_name(""));
    }

    #[test]
    fn set_names() {
        assert!(is_set_name("AS-EXAMPLE", "AS-"));
        assert!(is_set_name("AS3333:AS-CUSTOMERS", "AS-"));
        assert!(is_set_name("rs-foo:RS-BAR", "RS-"));
        assert!(!is_set_name("AS3333", "AS-"));
        assert!(!is_set_name("AS-", "AS-"));
        assert!(!is_set_name("RS-FOO", "AS-"));
        assert!(!is_set_name("AS-FOO::AS-BAR", "AS-"));
    }

    #[test]
    fn nic_handles() {
        assert!(is_nic_handle("JS123-RIPE"));
        assert!(is_nic_handle("AB1"));
        assert!(is_nic_handle("auto-1"));
        assert!(!is_nic_handle("A1"));
        assert!(!is_nic_handle("ABCDE1"));
        assert!(!is_nic_handle("AB1234567"));
        assert!(!is_nic_handle("AUTO-X"));
    }

    #[test]
    fn key_certs() {
        assert!(is_key_cert("PGPKEY-1A2B3C4D"));
        assert!(is_key_cert("X509-12"));
        assert!(!is_key_cert("PGPKEY-1A2B3C4"));
        assert!(!is_key_cert("X509-"));
    }

    #[test]
    fn person_names() {
        assert!(is_person_name("John Smith"));
        assert!(is_person_name("J. R. R. Tolkien"));
        assert!(!is_person_name("Smith"));
        assert!(!is_person_name("10.0.0.0 Smith"));
    }

    #[test]
    fn domain_names() {
        assert!(is_domain_name("ripe.net"));
        assert!(is_domain_name("1.0.10.in-addr.arpa."));
        assert!(!is_domain_name("localhost"));
        assert!(!is_domain_name("-bad.example"));
        assert!(!is_domain_name("a..b"));
    }
}
