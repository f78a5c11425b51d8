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

//! The [`MemoryIndex`] structure.

use std::collections::BTreeMap;

use super::AddressSpaceIndex;
use crate::query::MatchOperation;
use crate::resource::{Interval, IpInterval, ResourceKey};

/// An in-memory [`AddressSpaceIndex`].
///
/// Each number space is kept in a [`BTreeMap`] ordered by the
/// [`Interval`] ordering, which lists every block before the blocks it
/// contains. The blocks containing a key are therefore all at or
/// before the key, and the blocks within it all follow it before the
/// first block that starts after the key ends.
#[derive(Clone, Debug)]
pub struct MemoryIndex<K> {
    v4: BTreeMap<Interval<u32>, Vec<K>>,
    v6: BTreeMap<Interval<u128>, Vec<K>>,
    asn: BTreeMap<Interval<u32>, Vec<K>>,
}

impl<K> MemoryIndex<K> {
    /// Creates a new, empty `MemoryIndex`.
    pub fn new() -> Self {
        Self {
            v4: BTreeMap::new(),
            v6: BTreeMap::new(),
            asn: BTreeMap::new(),
        }
    }

    /// Returns the number of distinct blocks in the index.
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len() + self.asn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: PartialEq> MemoryIndex<K> {
    /// Indexes `value` under the block `key`. Returns `false` if
    /// `value` was already indexed under that block.
    pub fn insert(&mut self, key: ResourceKey, value: K) -> bool {
        let values = match key {
            ResourceKey::Ip(IpInterval::V4(interval)) => self.v4.entry(interval).or_default(),
            ResourceKey::Ip(IpInterval::V6(interval)) => self.v6.entry(interval).or_default(),
            ResourceKey::As(range) => self.asn.entry(range.interval()).or_default(),
        };
        if values.contains(&value) {
            false
        } else {
            values.push(value);
            true
        }
    }
}

impl<K> Default for MemoryIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + PartialEq> AddressSpaceIndex for MemoryIndex<K> {
    type Key = K;

    fn lookup(&self, key: &ResourceKey, operation: MatchOperation) -> Vec<K> {
        let blocks = match *key {
            ResourceKey::Ip(IpInterval::V4(interval)) => walk(&self.v4, interval, operation),
            ResourceKey::Ip(IpInterval::V6(interval)) => walk(&self.v6, interval, operation),
            ResourceKey::As(range) => walk(&self.asn, range.interval(), operation),
        };

        let mut found = Vec::new();
        for value in blocks.into_iter().flatten() {
            if !found.contains(value) {
                found.push(value.clone());
            }
        }
        found
    }
}

/// Finds the entries of `map` that `operation` selects for `key`.
fn walk<T, K>(
    map: &BTreeMap<Interval<T>, Vec<K>>,
    key: Interval<T>,
    operation: MatchOperation,
) -> Vec<&Vec<K>>
where
    T: Copy + Ord,
{
    match operation {
        MatchOperation::Exact => map.get(&key).into_iter().collect(),
        MatchOperation::FirstLevelLessSpecific => {
            first_less_specific(map, key).into_iter().collect()
        }
        MatchOperation::ExactOrFirstLevelLessSpecific => map
            .get(&key)
            .or_else(|| first_less_specific(map, key))
            .into_iter()
            .collect(),
        MatchOperation::ExactAndAllLevelsLessSpecific => less_specific(map, key)
            .map(|(_, values)| values)
            .collect(),
        MatchOperation::AllLevelsMoreSpecific => more_specific(map, key)
            .map(|(_, values)| values)
            .collect(),
        MatchOperation::FirstLevelMoreSpecific => {
            let mut current: Option<Interval<T>> = None;
            let mut found = Vec::new();
            for (block, values) in more_specific(map, key) {
                if !current.map_or(false, |outer| outer.contains(block)) {
                    current = Some(*block);
                    found.push(values);
                }
            }
            found
        }
    }
}

/// Iterates over the entries whose blocks contain `key`, outermost
/// first.
fn less_specific<'a, T, K>(
    map: &'a BTreeMap<Interval<T>, Vec<K>>,
    key: Interval<T>,
) -> impl Iterator<Item = (&'a Interval<T>, &'a Vec<K>)> + 'a
where
    T: Copy + Ord + 'a,
    K: 'a,
{
    map.range(..=key)
        .filter(move |(block, _)| block.contains(&key))
}

/// Returns the entry whose block is the smallest to strictly contain
/// `key`.
fn first_less_specific<T, K>(
    map: &BTreeMap<Interval<T>, Vec<K>>,
    key: Interval<T>,
) -> Option<&Vec<K>>
where
    T: Copy + Ord,
{
    less_specific(map, key)
        .filter(|(block, _)| **block != key)
        .last()
        .map(|(_, values)| values)
}

/// Iterates over the entries whose blocks lie strictly within `key`,
/// in index order.
fn more_specific<'a, T, K>(
    map: &'a BTreeMap<Interval<T>, Vec<K>>,
    key: Interval<T>,
) -> impl Iterator<Item = (&'a Interval<T>, &'a Vec<K>)> + 'a
where
    T: Copy + Ord + 'a,
    K: 'a,
{
    map.range(key..)
        .take_while(move |(block, _)| block.begin() <= key.end())
        .filter(move |(block, _)| key.strictly_contains(block))
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use super::*;

    lazy_static! {
        static ref INDEX: MemoryIndex<&'static str> = {
            let mut index = MemoryIndex::new();
            for (key, name) in [
                ("10.0.0.0/8", "ALLOCATION"),
                ("10.0.0.0/16", "ASSIGNMENT-A"),
                ("10.0.1.0/24", "SUB-ASSIGNMENT"),
                ("10.1.0.0/16", "ASSIGNMENT-B"),
                ("10.1.0.0/16", "ROUTE-B"),
                ("11.0.0.0/8", "ELSEWHERE"),
                ("2001:db8::/32", "V6-ALLOCATION"),
                ("AS1 - AS100", "AS-BLOCK"),
                ("AS50", "AUT-NUM"),
            ] {
                index.insert(key.parse().unwrap(), name);
            }
            index
        };
    }

    fn lookup(key: &str, operation: MatchOperation) -> Vec<&'static str> {
        INDEX.lookup(&key.parse().unwrap(), operation)
    }

    #[test]
    fn insert_deduplicates() {
        let mut index = MemoryIndex::new();
        let key: ResourceKey = "10.0.0.0/8".parse().unwrap();
        assert!(index.insert(key, "A"));
        assert!(!index.insert(key, "A"));
        assert!(index.insert(key, "B"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn exact() {
        assert_eq!(
            lookup("10.1.0.0/16", MatchOperation::Exact),
            ["ASSIGNMENT-B", "ROUTE-B"]
        );
        assert!(lookup("10.2.0.0/16", MatchOperation::Exact).is_empty());
    }

    #[test]
    fn first_level_less_specific() {
        assert_eq!(
            lookup("10.0.1.0/24", MatchOperation::FirstLevelLessSpecific),
            ["ASSIGNMENT-A"]
        );
        assert_eq!(
            lookup("10.0.1.5", MatchOperation::FirstLevelLessSpecific),
            ["SUB-ASSIGNMENT"]
        );
        assert!(lookup("10.0.0.0/8", MatchOperation::FirstLevelLessSpecific).is_empty());
    }

    #[test]
    fn exact_or_first_level_less_specific() {
        let operation = MatchOperation::ExactOrFirstLevelLessSpecific;
        assert_eq!(lookup("10.0.1.0/24", operation), ["SUB-ASSIGNMENT"]);
        assert_eq!(lookup("10.0.2.0/24", operation), ["ASSIGNMENT-A"]);
        assert_eq!(lookup("AS60", operation), ["AS-BLOCK"]);
        assert!(lookup("12.0.0.0/8", operation).is_empty());
    }

    #[test]
    fn all_levels_less_specific_start_outermost() {
        assert_eq!(
            lookup("10.0.1.0/24", MatchOperation::ExactAndAllLevelsLessSpecific),
            ["ALLOCATION", "ASSIGNMENT-A", "SUB-ASSIGNMENT"]
        );
    }

    #[test]
    fn first_level_more_specific() {
        assert_eq!(
            lookup("10.0.0.0/8", MatchOperation::FirstLevelMoreSpecific),
            ["ASSIGNMENT-A", "ASSIGNMENT-B", "ROUTE-B"]
        );
        assert_eq!(
            lookup("AS1-AS100", MatchOperation::FirstLevelMoreSpecific),
            ["AUT-NUM"]
        );
    }

    #[test]
    fn all_levels_more_specific() {
        assert_eq!(
            lookup("0.0.0.0/0", MatchOperation::AllLevelsMoreSpecific),
            [
                "ALLOCATION",
                "ASSIGNMENT-A",
                "SUB-ASSIGNMENT",
                "ASSIGNMENT-B",
                "ROUTE-B",
                "ELSEWHERE"
            ]
        );
        assert!(lookup("10.0.1.0/24", MatchOperation::AllLevelsMoreSpecific).is_empty());
    }

    #[test]
    fn number_spaces_are_separate() {
        assert_eq!(
            lookup("::/0", MatchOperation::AllLevelsMoreSpecific),
            ["V6-ALLOCATION"]
        );
        assert!(lookup("AS50", MatchOperation::FirstLevelLessSpecific) == ["AS-BLOCK"]);
    }
}
