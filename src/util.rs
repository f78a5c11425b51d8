// Copyright 2021 Matthew Ingwersen.
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

//! Crate-private utilities.

/// A wrapper around [`str`] references whose [`PartialEq`] and [`Eq`]
/// implementations are ASCII-case-insensitive.
pub struct Caseless<'a>(pub &'a str);

impl PartialEq for Caseless<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(other.0)
    }
}

impl Eq for Caseless<'_> {}

/// Converts an ASCII hexadecimal digit to its numeric value. This
/// returns [`None`] if `digit` is not one of the ASCII characters
/// `0` through `9`, `A` through `F`, or `a` through `f`.
pub fn ascii_hex_digit_to_nibble(digit: u8) -> Option<u8> {
    if (b'0'..=b'9').contains(&digit) {
        Some(digit - b'0')
    } else if (b'A'..=b'F').contains(&digit) {
        Some(digit - b'A' + 10)
    } else if (b'a'..=b'f').contains(&digit) {
        Some(digit - b'a' + 10)
    } else {
        None
    }
}

/// Splits a flag value on commas, dropping empty pieces. Multi-valued
/// flags such as `-T inetnum,route` and `-s RIPE,TEST` accept this
/// form.
pub fn split_commas(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').filter(|piece| !piece.is_empty())
}

/// Parses a string of ASCII decimal digits into a [`u32`]. Unlike
/// [`str::parse`], this rejects leading `+` signs.
pub fn parse_decimal_u32(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        None
    } else {
        text.parse().ok()
    }
}

/// Strips `prefix` from the start of `text`, ignoring ASCII case.
pub fn strip_prefix_caseless<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.get(0..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &text[prefix.len()..])
}

/// Strips `suffix` from the end of `text`, ignoring ASCII case.
pub fn strip_suffix_caseless<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    text.get(split..)
        .filter(|tail| tail.eq_ignore_ascii_case(suffix))
        .map(|_| &text[..split])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_commas_drops_empty_pieces() {
        let pieces: Vec<&str> = split_commas(",inetnum,,route,").collect();
        assert_eq!(pieces, ["inetnum", "route"]);
    }

    #[test]
    fn parse_decimal_u32_rejects_signs_and_overflow() {
        assert_eq!(parse_decimal_u32("2050"), Some(2050));
        assert_eq!(parse_decimal_u32("+1"), None);
        assert_eq!(parse_decimal_u32(""), None);
        assert_eq!(parse_decimal_u32("4294967296"), None);
    }

    #[test]
    fn caseless_affixes_work() {
        assert_eq!(strip_prefix_caseless("as2050", "AS"), Some("2050"));
        assert_eq!(strip_prefix_caseless("A", "AS"), None);
        assert_eq!(
            strip_suffix_caseless("1.0.10.IN-ADDR.ARPA", ".in-addr.arpa"),
            Some("1.0.10")
        );
        assert_eq!(strip_suffix_caseless("arpa", ".in-addr.arpa"), None);
    }
}
