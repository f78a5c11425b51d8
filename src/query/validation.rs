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

//! The checks run on every query before it is handed out.
//!
//! The checks are independent functions that inspect a
//! [`Query`] and append any [`Issue`]s they find. [`VALIDATORS`] runs
//! them in a fixed order:
//!
//! 1. Match operations: at most one of `-x -l -L -m -M`; IP flags
//!    (including `-d`) need an address search key; more-specific
//!    lookups of an entire number space are refused.
//! 2. Proxy: `-V` takes `client` or `client,ip`.
//! 3. Abuse contact: `-b` needs a key that can find an inetnum,
//!    inet6num or aut-num.
//! 4. Flag combinations: pairs of flags that cannot be used together,
//!    and flags made pointless by others (warnings).
//! 5. Search key: a search key is needed unless the query asks for
//!    system information, a template, or only sets keep-alive; inverse
//!    lookups must name inverse-searchable attributes.
//! 6. Tags: a tag cannot be both included and excluded.
//! 7. Versions: `--show-version` and `--diff-versions` values.
//!
//! Every check always runs, so that a user sees all problems at once.

use std::net::IpAddr;

use super::{Issue, MatchOperation, Query};
use crate::flag::{Flag, FlagGroup, FlagRegistry};
use crate::resource::ResourceKey;
use crate::util::split_commas;

/// A single check.
pub type Validator = fn(&Query, &mut Vec<Issue>);

/// The checks, in the order in which they run.
pub const VALIDATORS: [Validator; 7] = [
    validate_match_operation,
    validate_proxy,
    validate_abuse_contact,
    validate_combinations,
    validate_search_key,
    validate_tags,
    validate_versions,
];

////////////////////////////////////////////////////////////////////////
// MATCH OPERATIONS                                                   //
////////////////////////////////////////////////////////////////////////

fn validate_match_operation(query: &Query, issues: &mut Vec<Issue>) {
    let explicit: Vec<Flag> = FlagRegistry::standard()
        .flags_in(FlagGroup::MatchOperation)
        .filter(|flag| *flag != Flag::ReverseDomain && query.has_option(*flag))
        .collect();
    if explicit.len() > 1 {
        issues.push(Issue::DuplicateIpFlags);
        return;
    }

    let key = query.address_key();
    if let (Some(flag), None) = (explicit.first(), key) {
        issues.push(Issue::UselessIpFlag(*flag));
        return;
    }
    if query.is_lookup_in_both_directions() && query.ip_key().is_none() {
        issues.push(Issue::UselessIpFlag(Flag::ReverseDomain));
        return;
    }

    let more_specific = query
        .match_operation()
        .map_or(false, MatchOperation::is_more_specific);
    if more_specific && key.as_ref().map_or(false, ResourceKey::is_whole_space) {
        issues.push(Issue::IllegalRange);
    }
}

////////////////////////////////////////////////////////////////////////
// PROXY                                                              //
////////////////////////////////////////////////////////////////////////

fn validate_proxy(query: &Query, issues: &mut Vec<Issue>) {
    if let Some(proxy) = query.proxy() {
        if !is_valid_proxy(proxy) {
            issues.push(Issue::InvalidProxy(proxy.to_owned()));
        }
    }
}

/// Checks a `-V` value: a client name, optionally followed by a comma
/// and the IP address the client is querying for.
pub(super) fn is_valid_proxy(proxy: &str) -> bool {
    let parts: Vec<&str> = split_commas(proxy).collect();
    match parts.as_slice() {
        [_, ip] => ip.parse::<IpAddr>().is_ok(),
        parts => parts.len() < 2,
    }
}

////////////////////////////////////////////////////////////////////////
// ABUSE CONTACT                                                      //
////////////////////////////////////////////////////////////////////////

fn validate_abuse_contact(query: &Query, issues: &mut Vec<Issue>) {
    // The type filter is already narrowed to the types that have abuse
    // contacts and that the key can find.
    if query.is_brief_abuse_contact() && query.object_types().is_empty() {
        issues.push(Issue::AbuseContactNotApplicable);
    }
}

////////////////////////////////////////////////////////////////////////
// FLAG COMBINATIONS                                                  //
////////////////////////////////////////////////////////////////////////

/// The groups whose flags a version query cannot be combined with.
const GROUPS_NOT_WITH_VERSIONS: [FlagGroup; 2] = [FlagGroup::MatchOperation, FlagGroup::Inverse];

/// Flags from other groups that a version query cannot be combined
/// with.
const NOT_WITH_VERSIONS: &[Flag] = &[
    Flag::Brief,
    Flag::AbuseContact,
    Flag::PrimaryKeys,
    Flag::Template,
    Flag::Verbose,
    Flag::Resource,
    Flag::Sources,
    Flag::AllSources,
];

/// Pairs of flags that cannot be used together. Each pair is listed
/// once.
const INCOMPATIBLE: &[(Flag, &[Flag])] = &[
    (
        Flag::AbuseContact,
        &[
            Flag::Brief,
            Flag::PrimaryKeys,
            Flag::Inverse,
            Flag::Template,
            Flag::Verbose,
        ],
    ),
    (Flag::PrimaryKeys, &[Flag::Brief]),
    (Flag::NoPersonal, &[Flag::ShowPersonal]),
    (
        Flag::NoTagInfo,
        &[
            Flag::ShowTagInfo,
            Flag::FilterTagInclude,
            Flag::FilterTagExclude,
        ],
    ),
    (Flag::ValidSyntax, &[Flag::NoValidSyntax]),
    (Flag::AllSources, &[Flag::Sources]),
    (Flag::ListVersions, &[Flag::DiffVersions, Flag::ShowVersion]),
    (Flag::DiffVersions, &[Flag::ShowVersion]),
];

fn is_not_with_versions(flag: Flag) -> bool {
    GROUPS_NOT_WITH_VERSIONS.contains(&flag.group()) || NOT_WITH_VERSIONS.contains(&flag)
}

/// Flags that have no effect when the first flag is given.
const OVERRIDDEN: &[(Flag, &[Flag])] = &[
    (Flag::PrimaryKeys, &[Flag::NoReferenced, Flag::NoGrouping]),
    (Flag::Brief, &[Flag::NoReferenced]),
];

fn validate_combinations(query: &Query, issues: &mut Vec<Issue>) {
    for (flag, others) in INCOMPATIBLE {
        if !query.has_option(*flag) {
            continue;
        }
        for other in others.iter().filter(|other| query.has_option(**other)) {
            issues.push(Issue::InvalidCombination(*flag, *other));
        }
    }

    let registry = FlagRegistry::standard();
    for version_flag in registry.flags_in(FlagGroup::Version) {
        if !query.has_option(version_flag) {
            continue;
        }
        for other in Flag::ALL
            .into_iter()
            .filter(|other| is_not_with_versions(*other) && query.has_option(*other))
        {
            issues.push(Issue::InvalidCombination(version_flag, other));
        }
    }

    for (flag, others) in OVERRIDDEN {
        if !query.has_option(*flag) {
            continue;
        }
        for other in others.iter().filter(|other| query.has_option(**other)) {
            issues.push(Issue::IgnoredFlag {
                ignored: *other,
                because: *flag,
            });
        }
    }
}

////////////////////////////////////////////////////////////////////////
// SEARCH KEY                                                         //
////////////////////////////////////////////////////////////////////////

fn validate_search_key(query: &Query, issues: &mut Vec<Issue>) {
    let needs_key = !(query.is_system_info()
        || query.is_template()
        || query.is_verbose()
        || query.has_only_keep_alive());
    if needs_key && query.search_value().is_empty() {
        issues.push(Issue::NoSearchKey);
    }

    for attribute in query.attribute_types() {
        if !attribute.is_inverse_key() {
            issues.push(Issue::AttributeNotSearchable(*attribute));
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TAGS                                                               //
////////////////////////////////////////////////////////////////////////

fn validate_tags(query: &Query, issues: &mut Vec<Issue>) {
    let excluded = query.tag_exclude();
    let conflicting: Vec<String> = query
        .tag_include()
        .into_iter()
        .filter(|tag| excluded.iter().any(|other| tag.eq_ignore_ascii_case(other)))
        .map(str::to_owned)
        .collect();
    if !conflicting.is_empty() {
        issues.push(Issue::ConflictingTags(conflicting));
    }
}

////////////////////////////////////////////////////////////////////////
// VERSIONS                                                           //
////////////////////////////////////////////////////////////////////////

fn validate_versions(query: &Query, issues: &mut Vec<Issue>) {
    if let Some(value) = query.options().value(Flag::ShowVersion) {
        if let Err(detail) = parse_object_version(value) {
            issues.push(Issue::InvalidVersion(detail));
        }
    }
    if let Some(value) = query.options().value(Flag::DiffVersions) {
        if let Err(detail) = parse_object_versions(value) {
            issues.push(Issue::InvalidVersion(detail));
        }
    }
}

/// Parses the value of `--show-version`.
pub(super) fn parse_object_version(value: &str) -> Result<u32, &'static str> {
    let version: i64 = value
        .trim()
        .parse()
        .map_err(|_| "version flag number must be a number")?;
    if version < 1 {
        return Err("version flag number must be greater than 0");
    }
    u32::try_from(version).map_err(|_| "version flag number is too large")
}

/// Parses the `a:b` value of `--diff-versions`.
pub(super) fn parse_object_versions(value: &str) -> Result<(u32, u32), &'static str> {
    const FORMAT: &str = "diff versions must be in the format a:b";

    let parts: Vec<&str> = value.split(':').filter(|part| !part.is_empty()).collect();
    let (first, second) = match parts.as_slice() {
        [first, second] => (first, second),
        _ => return Err(FORMAT),
    };
    let first: i64 = first.trim().parse().map_err(|_| FORMAT)?;
    let second: i64 = second.trim().parse().map_err(|_| FORMAT)?;
    if first < 1 || second < 1 {
        return Err("diff version number must be greater than 0");
    }
    if first == second {
        return Err("diff versions are the same");
    }
    match (u32::try_from(first), u32::try_from(second)) {
        (Ok(first), Ok(second)) => Ok((first, second)),
        _ => Err("diff version number is too large"),
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Reason;

    /// Runs a single check on a query that passes all checks, and
    /// returns what that check alone reports for `raw`.
    fn issues_of(validator: Validator, raw: &str) -> Vec<Issue> {
        let query = Query::unvalidated(raw);
        let mut issues = Vec::new();
        validator(&query, &mut issues);
        issues
    }

    #[test]
    fn duplicate_ip_flags_are_errors() {
        let issues = issues_of(validate_match_operation, "-x -M 10.0.0.0/8");
        assert_eq!(issues, [Issue::DuplicateIpFlags]);
    }

    #[test]
    fn ip_flags_need_an_address_key() {
        assert_eq!(
            issues_of(validate_match_operation, "-m EXAMPLE-MNT"),
            [Issue::UselessIpFlag(Flag::OneMore)]
        );
        assert_eq!(
            issues_of(validate_match_operation, "-d AS2050"),
            [Issue::UselessIpFlag(Flag::ReverseDomain)]
        );
        assert_eq!(
            issues_of(validate_match_operation, "-d -x AS2050"),
            [Issue::UselessIpFlag(Flag::ReverseDomain)]
        );
        assert!(issues_of(validate_match_operation, "-L AS2050").is_empty());
        assert!(issues_of(validate_match_operation, "-d 1.0.10.in-addr.arpa").is_empty());
        assert!(issues_of(validate_match_operation, "-m 1.0.10.in-addr.arpa").len() == 1);
        assert!(issues_of(validate_match_operation, "-d -m 1.0.10.in-addr.arpa").is_empty());
    }

    #[test]
    fn more_specific_whole_spaces_are_illegal() {
        for raw in [
            "-M 0.0.0.0/0",
            "-m ::/0",
            "-M AS0-AS4294967295",
        ] {
            assert_eq!(issues_of(validate_match_operation, raw), [Issue::IllegalRange]);
        }
        assert!(issues_of(validate_match_operation, "-L 0.0.0.0/0").is_empty());
        assert!(issues_of(validate_match_operation, "-M 0.0.0.0/1").is_empty());
    }

    #[test]
    fn proxies_are_checked() {
        assert!(is_valid_proxy("client"));
        assert!(is_valid_proxy("client,192.0.2.1"));
        assert!(is_valid_proxy("client,2001:db8::1"));
        assert!(!is_valid_proxy("client,example.net"));
        assert!(!is_valid_proxy("a,b,c"));
        assert_eq!(
            issues_of(validate_proxy, "-V client,nowhere AS1"),
            [Issue::InvalidProxy("client,nowhere".to_owned())]
        );
    }

    #[test]
    fn abuse_contacts_need_resources() {
        assert!(issues_of(validate_abuse_contact, "-b 10.0.0.0/8").is_empty());
        assert!(issues_of(validate_abuse_contact, "-b AS2050").is_empty());
        assert_eq!(
            issues_of(validate_abuse_contact, "-b EXAMPLE-MNT"),
            [Issue::AbuseContactNotApplicable]
        );
    }

    #[test]
    fn incompatible_flags_are_reported() {
        assert_eq!(
            issues_of(validate_combinations, "-b -K 10.0.0.0/8"),
            [Issue::InvalidCombination(Flag::AbuseContact, Flag::PrimaryKeys)]
        );
        assert_eq!(
            issues_of(validate_combinations, "--list-versions -x AS2050"),
            [Issue::InvalidCombination(Flag::ListVersions, Flag::Exact)]
        );
        assert_eq!(
            issues_of(validate_combinations, "--show-version 2 -i mnt-by -r EXAMPLE-MNT"),
            [Issue::InvalidCombination(Flag::ShowVersion, Flag::Inverse)]
        );
        assert_eq!(
            issues_of(validate_combinations, "--diff-versions 1:2 -d -s RIPE 10.0.0.0/8"),
            [
                Issue::InvalidCombination(Flag::DiffVersions, Flag::ReverseDomain),
                Issue::InvalidCombination(Flag::DiffVersions, Flag::Sources)
            ]
        );
        assert_eq!(
            issues_of(validate_combinations, "--no-personal --show-personal AS2050"),
            [Issue::InvalidCombination(Flag::NoPersonal, Flag::ShowPersonal)]
        );
    }

    #[test]
    fn overridden_flags_are_warnings() {
        let issues = issues_of(validate_combinations, "-K -r -G AS2050");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|issue| !issue.is_error()));
    }

    #[test]
    fn search_keys_are_required() {
        assert_eq!(issues_of(validate_search_key, "-r"), [Issue::NoSearchKey]);
        assert!(issues_of(validate_search_key, "-q version").is_empty());
        assert!(issues_of(validate_search_key, "--types").is_empty());
        assert!(issues_of(validate_search_key, "-t inetnum").is_empty());
        assert!(issues_of(validate_search_key, "-k").is_empty());
        assert_eq!(issues_of(validate_search_key, "-k -r"), [Issue::NoSearchKey]);
    }

    #[test]
    fn inverse_attributes_must_be_searchable() {
        let issues = issues_of(validate_search_key, "-i descr,mnt-by FOO");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].reason(), Reason::InvalidAttributeType);
    }

    #[test]
    fn tags_cannot_be_included_and_excluded() {
        let issues = issues_of(
            validate_tags,
            "--filter-tag-include foo,bar --filter-tag-exclude BAR AS1",
        );
        assert_eq!(issues, [Issue::ConflictingTags(vec!["bar".to_owned()])]);
    }

    #[test]
    fn show_version_values() {
        assert_eq!(parse_object_version("3"), Ok(3));
        assert_eq!(
            parse_object_version("0"),
            Err("version flag number must be greater than 0")
        );
        assert_eq!(
            parse_object_version("-2"),
            Err("version flag number must be greater than 0")
        );
        assert!(parse_object_version("x").is_err());
    }

    #[test]
    fn diff_versions_values() {
        assert_eq!(parse_object_versions("2:5"), Ok((2, 5)));
        assert_eq!(
            parse_object_versions("2"),
            Err("diff versions must be in the format a:b")
        );
        assert_eq!(
            parse_object_versions("1:2:3"),
            Err("diff versions must be in the format a:b")
        );
        assert_eq!(
            parse_object_versions("0:2"),
            Err("diff version number must be greater than 0")
        );
        assert_eq!(parse_object_versions("4:4"), Err("diff versions are the same"));
    }
}
