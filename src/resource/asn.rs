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

//! The [`AsNumber`] and [`AsRange`] types.

use std::fmt;
use std::str::FromStr;

use super::Interval;
use crate::util::{parse_decimal_u32, strip_prefix_caseless};

////////////////////////////////////////////////////////////////////////
// AS NUMBERS                                                         //
////////////////////////////////////////////////////////////////////////

/// An autonomous system number, written `AS` followed by the number in
/// decimal (the prefix is case-insensitive).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct AsNumber(u32);

impl From<u32> for AsNumber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<AsNumber> for u32 {
    fn from(number: AsNumber) -> Self {
        number.0
    }
}

impl FromStr for AsNumber {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let digits = strip_prefix_caseless(text, "AS").ok_or("AS numbers must start with AS")?;
        parse_decimal_u32(digits)
            .map(Self)
            .ok_or("AS number is not a valid unsigned 32-bit integer")
    }
}

impl fmt::Display for AsNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////
// AS RANGES                                                          //
////////////////////////////////////////////////////////////////////////

/// A range of AS numbers, written `AS1 - AS5` (the spaces around the
/// hyphen are optional). This is the key of an as-block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct AsRange(Interval<u32>);

impl AsRange {
    /// Creates a new range, or returns [`None`] if `begin` comes after
    /// `end`.
    pub fn new(begin: AsNumber, end: AsNumber) -> Option<Self> {
        Interval::new(begin.0, end.0).map(Self)
    }

    /// Creates a range containing only `number`.
    pub fn single(number: AsNumber) -> Self {
        Self(Interval::single(number.0))
    }

    /// The range of every AS number, `AS0 - AS4294967295`.
    pub fn whole() -> Self {
        Self(Interval::from_ordered(0, u32::MAX))
    }

    pub fn begin(&self) -> AsNumber {
        AsNumber(self.0.begin())
    }

    pub fn end(&self) -> AsNumber {
        AsNumber(self.0.end())
    }

    pub fn interval(&self) -> Interval<u32> {
        self.0
    }

    /// Returns whether `other` lies within this range.
    pub fn contains(&self, other: &Self) -> bool {
        self.0.contains(&other.0)
    }
}

impl FromStr for AsRange {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (begin, end) = text.split_once('-').ok_or("AS ranges need a hyphen")?;
        let begin: AsNumber = begin.trim().parse()?;
        let end: AsNumber = end.trim().parse()?;
        Self::new(begin, end).ok_or("AS range ends before it begins")
    }
}

impl fmt::Display for AsRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.begin(), self.end())
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_numbers_parse() {
        assert_eq!("AS2050".parse::<AsNumber>(), Ok(AsNumber(2050)));
        assert_eq!("as4294967295".parse::<AsNumber>(), Ok(AsNumber(u32::MAX)));
        assert!("AS4294967296".parse::<AsNumber>().is_err());
        assert!("AS".parse::<AsNumber>().is_err());
        assert!("AS-FOO".parse::<AsNumber>().is_err());
        assert!("2050".parse::<AsNumber>().is_err());
    }

    #[test]
    fn as_ranges_parse() {
        let range: AsRange = "AS1-AS5".parse().unwrap();
        assert_eq!(range.begin(), AsNumber(1));
        assert_eq!(range.end(), AsNumber(5));
        assert_eq!(range.to_string(), "AS1 - AS5");
        assert_eq!("as1 - AS5".parse::<AsRange>(), Ok(range));
        assert!("AS5-AS1".parse::<AsRange>().is_err());
        assert!("AS1-".parse::<AsRange>().is_err());
        assert!("AS-SET".parse::<AsRange>().is_err());
    }

    #[test]
    fn as_range_containment() {
        let block: AsRange = "AS1-AS100".parse().unwrap();
        assert!(block.contains(&AsRange::single(AsNumber(50))));
        assert!(!block.contains(&AsRange::single(AsNumber(101))));
        assert!(AsRange::whole().contains(&block));
    }
}
