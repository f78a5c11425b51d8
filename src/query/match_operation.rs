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

//! The [`MatchOperation`] enumeration.

use std::fmt;

use crate::flag::Flag;

/// How an address-space index is walked from the search key.
///
/// "Less specific" blocks contain the search key and "more specific"
/// blocks lie within it. "First level" means only the nearest such
/// blocks: the smallest block strictly containing the key, or the
/// blocks strictly within the key that no other such block contains.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchOperation {
    /// The exact block if there is one, and otherwise the first-level
    /// less specific block. This is the default and has no flag.
    ExactOrFirstLevelLessSpecific,
    Exact,
    FirstLevelLessSpecific,
    ExactAndAllLevelsLessSpecific,
    FirstLevelMoreSpecific,
    AllLevelsMoreSpecific,
}

impl MatchOperation {
    /// The operations that are selected by a flag.
    pub const EXPLICIT: [MatchOperation; 5] = [
        Self::Exact,
        Self::FirstLevelLessSpecific,
        Self::ExactAndAllLevelsLessSpecific,
        Self::FirstLevelMoreSpecific,
        Self::AllLevelsMoreSpecific,
    ];

    /// Returns the flag that selects this operation, if any.
    pub fn flag(self) -> Option<Flag> {
        match self {
            Self::ExactOrFirstLevelLessSpecific => None,
            Self::Exact => Some(Flag::Exact),
            Self::FirstLevelLessSpecific => Some(Flag::OneLess),
            Self::ExactAndAllLevelsLessSpecific => Some(Flag::AllLess),
            Self::FirstLevelMoreSpecific => Some(Flag::OneMore),
            Self::AllLevelsMoreSpecific => Some(Flag::AllMore),
        }
    }

    pub fn is_more_specific(self) -> bool {
        matches!(
            self,
            Self::FirstLevelMoreSpecific | Self::AllLevelsMoreSpecific
        )
    }
}

impl fmt::Display for MatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.flag() {
            Some(flag) => f.write_str(flag.name()),
            None => f.write_str("exact-or-one-less"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::{FlagGroup, FlagRegistry};

    #[test]
    fn only_the_default_lacks_a_flag() {
        assert_eq!(MatchOperation::ExactOrFirstLevelLessSpecific.flag(), None);
        for operation in MatchOperation::EXPLICIT {
            assert!(operation.flag().is_some());
        }
        assert_eq!(MatchOperation::AllLevelsMoreSpecific.to_string(), "all-more");
    }

    #[test]
    fn operation_flags_are_the_ip_flags_besides_reverse_domain() {
        let flags: Vec<Flag> = MatchOperation::EXPLICIT
            .into_iter()
            .filter_map(MatchOperation::flag)
            .collect();
        let ip_flags: Vec<Flag> = FlagRegistry::standard()
            .flags_in(FlagGroup::MatchOperation)
            .filter(|flag| *flag != Flag::ReverseDomain)
            .collect();
        assert_eq!(flags, ip_flags);
    }
}
