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

//! The [`Interval`] structure.

use std::cmp::Ordering;

/// A closed interval `[begin, end]` of integers.
///
/// Intervals are ordered by ascending `begin` and then by *descending*
/// `end`. Sorting a set of intervals thus puts every interval before
/// the intervals that it contains, which is the order in which a
/// hierarchy of address-space allocations is naturally listed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Interval<T> {
    begin: T,
    end: T,
}

impl<T: Copy + Ord> Interval<T> {
    /// Creates a new interval, or returns [`None`] if `begin` is
    /// greater than `end`.
    pub fn new(begin: T, end: T) -> Option<Self> {
        (begin <= end).then_some(Self { begin, end })
    }

    /// Creates an interval from bounds that are already known to be in
    /// order.
    pub(super) fn from_ordered(begin: T, end: T) -> Self {
        debug_assert!(begin <= end);
        Self { begin, end }
    }

    /// Creates an interval containing exactly one value.
    pub fn single(value: T) -> Self {
        Self {
            begin: value,
            end: value,
        }
    }

    pub fn begin(&self) -> T {
        self.begin
    }

    pub fn end(&self) -> T {
        self.end
    }

    /// Returns whether `other` lies within `self`. Every interval
    /// contains itself.
    pub fn contains(&self, other: &Self) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Returns whether `other` lies within `self` and is not equal to
    /// it.
    pub fn strictly_contains(&self, other: &Self) -> bool {
        self.contains(other) && self != other
    }
}

impl<T: Ord> PartialOrd for Interval<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Interval<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.begin
            .cmp(&other.begin)
            .then_with(|| other.end.cmp(&self.end))
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Interval;

    #[test]
    fn new_rejects_reversed_bounds() {
        assert!(Interval::new(5u32, 4).is_none());
        assert!(Interval::new(4u32, 4).is_some());
    }

    #[test]
    fn containment_works() {
        let outer = Interval::new(0u32, 255).unwrap();
        let inner = Interval::new(16u32, 31).unwrap();
        let straddling = Interval::new(250u32, 260).unwrap();
        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(outer.strictly_contains(&inner));
        assert!(!outer.strictly_contains(&outer));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&straddling));
    }

    #[test]
    fn containers_sort_before_their_contents() {
        let mut intervals = vec![
            Interval::new(16u32, 31).unwrap(),
            Interval::new(0u32, 255).unwrap(),
            Interval::new(0u32, 15).unwrap(),
            Interval::new(0u32, 127).unwrap(),
        ];
        intervals.sort();
        assert_eq!(
            intervals,
            [
                Interval::new(0, 255).unwrap(),
                Interval::new(0, 127).unwrap(),
                Interval::new(0, 15).unwrap(),
                Interval::new(16, 31).unwrap(),
            ]
        );
    }
}
