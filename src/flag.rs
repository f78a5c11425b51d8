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

//! The catalog of query flags.
//!
//! Every flag understood by the query language is a member of the
//! [`Flag`] enumeration. How a flag is spelled on the command line and
//! whether it takes a value is described by a [`FlagSpec`], along with
//! the [`FlagGroup`] that says what the flag controls. The
//! [`FlagRegistry`] collects the specs so that the
//! [parser](crate::options) can look them up by spelling.
//!
//! The spellings and arities in the [standard
//! registry](FlagRegistry::standard) are relied upon by scripts and
//! mirrors in the wild, so they must not change.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

////////////////////////////////////////////////////////////////////////
// FLAGS                                                              //
////////////////////////////////////////////////////////////////////////

/// A query flag.
///
/// The declaration order has no meaning beyond giving [`Flag`] a
/// stable [`Ord`] implementation for use in ordered maps.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Flag {
    Brief,
    AbuseContact,
    PrimaryKeys,
    NoGrouping,
    NoReferenced,
    Irt,
    NoFiltering,
    Exact,
    OneLess,
    AllLess,
    OneMore,
    AllMore,
    ReverseDomain,
    Inverse,
    SelectTypes,
    NoPersonal,
    ShowPersonal,
    Sources,
    AllSources,
    Resource,
    ListSourcesOrVersion,
    ListSources,
    Version,
    Types,
    Template,
    Verbose,
    ListVersions,
    DiffVersions,
    ShowVersion,
    PersistentConnection,
    Client,
    NoTagInfo,
    ShowTagInfo,
    FilterTagInclude,
    FilterTagExclude,
    ValidSyntax,
    NoValidSyntax,
}

impl Flag {
    /// All flags, in declaration order.
    pub const ALL: [Flag; 37] = [
        Self::Brief,
        Self::AbuseContact,
        Self::PrimaryKeys,
        Self::NoGrouping,
        Self::NoReferenced,
        Self::Irt,
        Self::NoFiltering,
        Self::Exact,
        Self::OneLess,
        Self::AllLess,
        Self::OneMore,
        Self::AllMore,
        Self::ReverseDomain,
        Self::Inverse,
        Self::SelectTypes,
        Self::NoPersonal,
        Self::ShowPersonal,
        Self::Sources,
        Self::AllSources,
        Self::Resource,
        Self::ListSourcesOrVersion,
        Self::ListSources,
        Self::Version,
        Self::Types,
        Self::Template,
        Self::Verbose,
        Self::ListVersions,
        Self::DiffVersions,
        Self::ShowVersion,
        Self::PersistentConnection,
        Self::Client,
        Self::NoTagInfo,
        Self::ShowTagInfo,
        Self::FilterTagInclude,
        Self::FilterTagExclude,
        Self::ValidSyntax,
        Self::NoValidSyntax,
    ];

    /// Returns the spellings of the flag, without leading dashes.
    /// Single-character spellings are used with one dash and all others
    /// with two.
    pub fn spellings(self) -> &'static [&'static str] {
        match self {
            Self::Brief => &["F", "brief"],
            Self::AbuseContact => &["b", "abuse-contact"],
            Self::PrimaryKeys => &["K", "primary-keys"],
            Self::NoGrouping => &["G", "no-grouping"],
            Self::NoReferenced => &["r", "no-referenced"],
            Self::Irt => &["c", "irt"],
            Self::NoFiltering => &["B", "no-filtering"],
            Self::Exact => &["x", "exact"],
            Self::OneLess => &["l", "one-less"],
            Self::AllLess => &["L", "all-less"],
            Self::OneMore => &["m", "one-more"],
            Self::AllMore => &["M", "all-more"],
            Self::ReverseDomain => &["d", "reverse-domain"],
            Self::Inverse => &["i", "inverse"],
            Self::SelectTypes => &["T", "select-types"],
            Self::NoPersonal => &["no-personal"],
            Self::ShowPersonal => &["show-personal"],
            Self::Sources => &["s", "sources"],
            Self::AllSources => &["a", "all-sources"],
            Self::Resource => &["resource"],
            Self::ListSourcesOrVersion => &["q"],
            Self::ListSources => &["list-sources"],
            Self::Version => &["version"],
            Self::Types => &["types"],
            Self::Template => &["t", "template"],
            Self::Verbose => &["v", "verbose"],
            Self::ListVersions => &["list-versions"],
            Self::DiffVersions => &["diff-versions"],
            Self::ShowVersion => &["show-version"],
            Self::PersistentConnection => &["k", "persistent-connection"],
            Self::Client => &["V", "client"],
            Self::NoTagInfo => &["no-tag-info"],
            Self::ShowTagInfo => &["show-tag-info"],
            Self::FilterTagInclude => &["filter-tag-include"],
            Self::FilterTagExclude => &["filter-tag-exclude"],
            Self::ValidSyntax => &["valid-syntax"],
            Self::NoValidSyntax => &["no-valid-syntax"],
        }
    }

    /// Returns the canonical name of the flag: its longest spelling.
    pub fn name(self) -> &'static str {
        let spellings = self.spellings();
        spellings[spellings.len() - 1]
    }

    /// Returns the group the flag belongs to.
    pub fn group(self) -> FlagGroup {
        match self {
            Self::Exact
            | Self::OneLess
            | Self::AllLess
            | Self::OneMore
            | Self::AllMore
            | Self::ReverseDomain => FlagGroup::MatchOperation,
            Self::Brief
            | Self::AbuseContact
            | Self::PrimaryKeys
            | Self::NoGrouping
            | Self::NoReferenced
            | Self::Irt
            | Self::NoFiltering => FlagGroup::Output,
            Self::SelectTypes
            | Self::NoPersonal
            | Self::ShowPersonal
            | Self::Sources
            | Self::AllSources
            | Self::Resource
            | Self::ValidSyntax
            | Self::NoValidSyntax => FlagGroup::Filter,
            Self::Inverse => FlagGroup::Inverse,
            Self::ListSourcesOrVersion
            | Self::ListSources
            | Self::Version
            | Self::Types
            | Self::Template
            | Self::Verbose => FlagGroup::SystemInfo,
            Self::ListVersions | Self::DiffVersions | Self::ShowVersion => FlagGroup::Version,
            Self::NoTagInfo | Self::ShowTagInfo | Self::FilterTagInclude | Self::FilterTagExclude => {
                FlagGroup::Tag
            }
            Self::PersistentConnection | Self::Client => FlagGroup::Connection,
        }
    }

    /// Returns the spec of the flag in the standard registry.
    fn standard_spec(self) -> FlagSpec {
        let (arity, repeatable) = match self {
            Self::Inverse
            | Self::SelectTypes
            | Self::Sources
            | Self::FilterTagInclude
            | Self::FilterTagExclude => (Arity::RequiredValue, true),
            Self::ListSourcesOrVersion
            | Self::Template
            | Self::Verbose
            | Self::DiffVersions
            | Self::ShowVersion
            | Self::Client => (Arity::RequiredValue, false),
            _ => (Arity::None, false),
        };
        FlagSpec::new(self, arity, repeatable)
    }
}

/// Displays the flag the way users type it, e.g. `-x, --exact` or
/// `--resource`.
impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, spelling) in self.spellings().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if spelling.len() == 1 {
                write!(f, "-{}", spelling)?;
            } else {
                write!(f, "--{}", spelling)?;
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////
// FLAG GROUPS                                                        //
////////////////////////////////////////////////////////////////////////

/// What part of a query a [`Flag`] controls.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FlagGroup {
    /// How the address-space hierarchy is walked (`-x -l -L -m -M`, and
    /// `-d`). These are the "IP flags".
    MatchOperation,

    /// How results are presented and which related objects are added.
    Output,

    /// Which object types, sources and objects are searched.
    Filter,

    /// Inverse lookups (`-i`).
    Inverse,

    /// Requests for information about the server rather than objects,
    /// including templates.
    SystemInfo,

    /// Object history.
    Version,

    /// Tag filtering and display.
    Tag,

    /// The connection itself: keep-alive and proxying.
    Connection,
}

////////////////////////////////////////////////////////////////////////
// FLAG SPECS                                                         //
////////////////////////////////////////////////////////////////////////

/// Whether a flag takes a value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Arity {
    /// The flag is a boolean switch.
    None,

    /// The flag must be followed by a value, either attached
    /// (`-Tinetnum`, `--select-types=inetnum`) or as the next token.
    RequiredValue,

    /// The flag may carry a value, but only in attached form, so that
    /// an optional value never swallows the search term.
    OptionalValue,
}

/// Describes how a [`Flag`] is used on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FlagSpec {
    pub flag: Flag,
    pub arity: Arity,
    pub group: FlagGroup,

    /// Whether the flag may be given several times with different
    /// values. Values of a repeatable flag accumulate.
    pub repeatable: bool,
}

impl FlagSpec {
    pub fn new(flag: Flag, arity: Arity, repeatable: bool) -> Self {
        Self {
            flag,
            arity,
            group: flag.group(),
            repeatable,
        }
    }
}

////////////////////////////////////////////////////////////////////////
// FLAG REGISTRY                                                      //
////////////////////////////////////////////////////////////////////////

/// A lookup table from flag spellings to [`FlagSpec`]s.
///
/// Single-character spellings are matched case-sensitively, since the
/// catalog has pairs like `-l`/`-L` that differ only in case. Longer
/// spellings are matched case-insensitively.
#[derive(Debug)]
pub struct FlagRegistry {
    specs: HashMap<Flag, FlagSpec>,
    by_short: HashMap<char, Flag>,
    by_long: HashMap<String, Flag>,
}

lazy_static! {
    static ref STANDARD: FlagRegistry =
        FlagRegistry::new(Flag::ALL.iter().map(|flag| flag.standard_spec()));
}

impl FlagRegistry {
    /// Builds a registry from the provided specs.
    ///
    /// # Panics
    ///
    /// Panics if two specs share a spelling, since the registry could
    /// not tell them apart.
    pub fn new(specs: impl IntoIterator<Item = FlagSpec>) -> Self {
        let mut registry = Self {
            specs: HashMap::new(),
            by_short: HashMap::new(),
            by_long: HashMap::new(),
        };
        for spec in specs {
            for spelling in spec.flag.spellings() {
                let mut chars = spelling.chars();
                let clash = match (chars.next(), chars.next()) {
                    (Some(c), None) => registry.by_short.insert(c, spec.flag),
                    _ => registry
                        .by_long
                        .insert(spelling.to_ascii_lowercase(), spec.flag),
                };
                assert!(clash.is_none(), "flag spelling {} is not unique", spelling);
            }
            registry.specs.insert(spec.flag, spec);
        }
        registry
    }

    /// Returns the process-wide registry holding the standard catalog.
    /// It is built on first use and never modified afterwards.
    pub fn standard() -> &'static FlagRegistry {
        &STANDARD
    }

    /// Returns the spec registered for `flag`.
    pub fn spec(&self, flag: Flag) -> Option<&FlagSpec> {
        self.specs.get(&flag)
    }

    /// Looks up a single-character spelling.
    pub fn lookup_short(&self, c: char) -> Option<&FlagSpec> {
        self.by_short.get(&c).and_then(|flag| self.specs.get(flag))
    }

    /// Looks up a multi-character spelling, ignoring ASCII case.
    pub fn lookup_long(&self, spelling: &str) -> Option<&FlagSpec> {
        self.by_long
            .get(&spelling.to_ascii_lowercase())
            .and_then(|flag| self.specs.get(flag))
    }

    /// Iterates over the registered flags of `group`, in declaration
    /// order.
    pub fn flags_in(&self, group: FlagGroup) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL
            .into_iter()
            .filter(move |flag| self.spec(*flag).map_or(false, |spec| spec.group == group))
    }

    /// Returns the number of flags in the registry.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns whether the registry has no flags.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_every_flag() {
        let registry = FlagRegistry::standard();
        assert_eq!(registry.len(), Flag::ALL.len());
        for flag in Flag::ALL {
            assert_eq!(registry.spec(flag).map(|s| s.flag), Some(flag));
        }
    }

    #[test]
    fn short_spellings_are_case_sensitive() {
        let registry = FlagRegistry::standard();
        assert_eq!(registry.lookup_short('l').unwrap().flag, Flag::OneLess);
        assert_eq!(registry.lookup_short('L').unwrap().flag, Flag::AllLess);
        assert_eq!(registry.lookup_short('k').unwrap().flag, Flag::PersistentConnection);
        assert_eq!(registry.lookup_short('K').unwrap().flag, Flag::PrimaryKeys);
        assert!(registry.lookup_short('z').is_none());
    }

    #[test]
    fn long_spellings_are_case_insensitive() {
        let registry = FlagRegistry::standard();
        assert_eq!(registry.lookup_long("ALL-MORE").unwrap().flag, Flag::AllMore);
        assert_eq!(registry.lookup_long("Show-Version").unwrap().flag, Flag::ShowVersion);
        assert!(registry.lookup_long("more").is_none());
    }

    #[test]
    fn flags_are_grouped() {
        let registry = FlagRegistry::standard();
        let ip_flags: Vec<Flag> = registry.flags_in(FlagGroup::MatchOperation).collect();
        assert_eq!(
            ip_flags,
            [
                Flag::Exact,
                Flag::OneLess,
                Flag::AllLess,
                Flag::OneMore,
                Flag::AllMore,
                Flag::ReverseDomain
            ]
        );
        let versions: Vec<Flag> = registry.flags_in(FlagGroup::Version).collect();
        assert_eq!(
            versions,
            [Flag::ListVersions, Flag::DiffVersions, Flag::ShowVersion]
        );
        assert_eq!(registry.lookup_short('V').unwrap().group, FlagGroup::Connection);
        assert_eq!(Flag::Template.group(), FlagGroup::SystemInfo);
    }

    #[test]
    fn flags_display_like_the_command_line() {
        assert_eq!(Flag::Exact.to_string(), "-x, --exact");
        assert_eq!(Flag::Resource.to_string(), "--resource");
        assert_eq!(Flag::ListSourcesOrVersion.to_string(), "-q");
        assert_eq!(Flag::ListSourcesOrVersion.name(), "q");
        assert_eq!(Flag::AbuseContact.name(), "abuse-contact");
    }

    #[test]
    #[should_panic(expected = "not unique")]
    fn duplicate_spellings_are_rejected() {
        FlagRegistry::new([
            FlagSpec::new(Flag::Exact, Arity::None, false),
            FlagSpec::new(Flag::Exact, Arity::None, false),
        ]);
    }
}
