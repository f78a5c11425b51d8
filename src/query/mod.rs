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

//! Resolution of query strings into [`Query`] descriptors.
//!
//! [`resolve`] is the single way to build a [`Query`]. It parses the
//! flags, classifies the search term, works out the object types,
//! attributes, and sources to search, and then runs the
//! [validators](validation). A query with errors is never returned;
//! a [`QueryError`] listing all of them is returned instead. Warnings
//! are kept on the [`Query`].
//!
//! A [`Query`] never changes after it is built. Everything it reports
//! is a pure function of the query string, the origin, and the
//! credentials supplied with it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::flag::{Flag, FlagGroup};
use crate::options::{self, ParsedOptions};
use crate::resource::{AsNumber, AsRange, IpInterval, ResourceKey};
use crate::rpsl::{AttributeType, ObjectType};
use crate::search_key::SearchKey;
use crate::util::split_commas;

mod error;
mod match_operation;
pub mod matcher;
pub mod validation;
pub use error::{Issue, QueryError, Reason};
pub use match_operation::MatchOperation;

/// The object types with abuse contacts, to which `-b` restricts a
/// query.
pub const ABUSE_CONTACT_OBJECT_TYPES: [ObjectType; 3] = [
    ObjectType::Inetnum,
    ObjectType::Inet6num,
    ObjectType::AutNum,
];

/// The object types describing Internet number resources, to which
/// `--resource` restricts a query.
pub const RESOURCE_OBJECT_TYPES: [ObjectType; 6] = [
    ObjectType::AutNum,
    ObjectType::Inetnum,
    ObjectType::Inet6num,
    ObjectType::Route,
    ObjectType::Route6,
    ObjectType::Domain,
];

/// The object types searched by `-d` when no `-T` is given.
pub const LOOKUP_IN_BOTH_DIRECTIONS_OBJECT_TYPES: [ObjectType; 5] = [
    ObjectType::Inetnum,
    ObjectType::Inet6num,
    ObjectType::Route,
    ObjectType::Route6,
    ObjectType::Domain,
];

////////////////////////////////////////////////////////////////////////
// ORIGINS AND CREDENTIALS                                            //
////////////////////////////////////////////////////////////////////////

/// The channel through which a query arrived.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Origin {
    /// The unauthenticated line protocol.
    Direct,

    /// An authenticated channel, such as the REST API.
    Authenticated,
}

impl FromStr for Origin {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("direct") {
            Ok(Self::Direct)
        } else if s.eq_ignore_ascii_case("authenticated") {
            Ok(Self::Authenticated)
        } else {
            Err("expected \"direct\" or \"authenticated\"")
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Authenticated => "authenticated",
        })
    }
}

/// Credentials supplied out of band with a query. They are never
/// parsed from the query string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Credentials {
    pub sso_token: Option<String>,
    pub passwords: Vec<String>,
}

/// The kinds of system information that a query can ask for instead
/// of objects.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SystemInfoOption {
    Version,
    Types,
    Sources,
}

impl SystemInfoOption {
    fn from_option(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "version" => Some(Self::Version),
            "types" => Some(Self::Types),
            "sources" => Some(Self::Sources),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////
// RESOLUTION                                                         //
////////////////////////////////////////////////////////////////////////

/// Resolves a raw query string into a [`Query`].
///
/// `credentials` are kept only when `origin` is
/// [`Origin::Authenticated`]; credentials arriving over the direct
/// channel are dropped.
pub fn resolve(
    raw: &str,
    origin: Origin,
    credentials: Option<Credentials>,
) -> Result<Query, QueryError> {
    let raw = raw.trim();
    let options = options::parse(raw).map_err(|error| {
        debug!("Query {:?} is malformed: {}.", raw, error);
        QueryError::from(error)
    })?;

    let mut issues = Vec::new();
    let mut query = Query::build(raw, options, origin, &mut issues);
    for validator in validation::VALIDATORS {
        validator(&query, &mut issues);
    }

    let (errors, warnings): (Vec<Issue>, Vec<Issue>) =
        issues.into_iter().partition(Issue::is_error);
    if !errors.is_empty() {
        let error = QueryError::new(errors);
        debug!("Query {:?} is invalid ({}).", raw, error.reason());
        return Err(error);
    }

    query.warnings = warnings;
    query.credentials = match (origin, credentials) {
        (Origin::Authenticated, credentials) => credentials,
        (Origin::Direct, Some(_)) => {
            warn!("Dropping credentials supplied with a direct query.");
            None
        }
        (Origin::Direct, None) => None,
    };
    debug!(
        "Resolved query {:?}: key {:?}, operation {:?}, {} object type(s).",
        raw,
        query.search_key.kind(),
        query.match_operation,
        query.object_types.len()
    );
    Ok(query)
}

////////////////////////////////////////////////////////////////////////
// QUERIES                                                            //
////////////////////////////////////////////////////////////////////////

/// A fully resolved, validated query.
#[derive(Clone, Debug)]
pub struct Query {
    original: String,
    options: ParsedOptions,
    search_key: SearchKey,
    match_operation: Option<MatchOperation>,
    supplied_object_types: BTreeSet<ObjectType>,
    object_types: BTreeSet<ObjectType>,
    attribute_types: Vec<AttributeType>,
    sources: Vec<String>,
    warnings: Vec<Issue>,
    origin: Origin,
    credentials: Option<Credentials>,
}

impl Query {
    /// Resolves a query that arrived over the direct channel.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        resolve(raw, Origin::Direct, None)
    }

    /// Resolves a query that arrived over an authenticated channel,
    /// with its credentials.
    pub fn parse_authenticated(
        raw: &str,
        sso_token: Option<String>,
        passwords: Vec<String>,
    ) -> Result<Self, QueryError> {
        let credentials = Credentials {
            sso_token,
            passwords,
        };
        resolve(raw, Origin::Authenticated, Some(credentials))
    }

    /// Builds the query from its parsed options. Problems found while
    /// interpreting flag values are appended to `issues`.
    fn build(raw: &str, options: ParsedOptions, origin: Origin, issues: &mut Vec<Issue>) -> Self {
        let search_key = SearchKey::new(options.search_term());
        let mut query = Self {
            original: raw.to_owned(),
            options,
            search_key,
            match_operation: None,
            supplied_object_types: BTreeSet::new(),
            object_types: BTreeSet::new(),
            attribute_types: Vec::new(),
            sources: Vec::new(),
            warnings: Vec::new(),
            origin,
            credentials: None,
        };

        query.sources = query.parse_sources();
        query.supplied_object_types = query.parse_supplied_object_types(issues);
        query.attribute_types = query.parse_attribute_types(issues);
        query.match_operation = query.parse_match_operation();
        query.check_option_values(issues);
        query.object_types = query.filter_object_types();
        query
    }

    fn parse_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for source in self.option_values(Flag::Sources) {
            let source = source.to_ascii_uppercase();
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        sources
    }

    fn parse_supplied_object_types(&self, issues: &mut Vec<Issue>) -> BTreeSet<ObjectType> {
        let mut object_types = BTreeSet::new();
        for name in self.option_values(Flag::SelectTypes) {
            match name.parse::<ObjectType>() {
                Ok(object_type) => {
                    object_types.insert(object_type);
                }
                Err(_) => issues.push(Issue::UnknownObjectType(name.to_owned())),
            }
        }
        object_types
    }

    fn parse_attribute_types(&self, issues: &mut Vec<Issue>) -> Vec<AttributeType> {
        let mut attribute_types: Vec<AttributeType> = Vec::new();
        let mut add = |attribute_type: AttributeType| {
            if !attribute_types.contains(&attribute_type) {
                attribute_types.push(attribute_type);
            }
        };
        for name in self.option_values(Flag::Inverse) {
            match name.parse::<AttributeType>() {
                // Inverse lookups of "person" search every reference
                // to a person or role.
                Ok(AttributeType::Person) => {
                    AttributeType::PERSON_REFERENCES.into_iter().for_each(&mut add);
                }
                Ok(attribute_type) => add(attribute_type),
                Err(_) => issues.push(Issue::UnknownAttribute(name.to_owned())),
            }
        }
        attribute_types
    }

    /// Returns the operation selected by the match flags, or [`None`]
    /// if there is no such flag or there are several.
    fn parse_match_operation(&self) -> Option<MatchOperation> {
        let mut selected = MatchOperation::EXPLICIT
            .into_iter()
            .filter(|operation| operation.flag().map_or(false, |flag| self.has_option(flag)));
        match (selected.next(), selected.next()) {
            (Some(operation), None) => Some(operation),
            _ => None,
        }
    }

    /// Checks the values of flags that name object types or system
    /// information.
    fn check_option_values(&self, issues: &mut Vec<Issue>) {
        for flag in [Flag::Template, Flag::Verbose] {
            if let Some(name) = self.options.value(flag) {
                if name.parse::<ObjectType>().is_err() {
                    issues.push(Issue::UnknownObjectType(name.to_owned()));
                }
            }
        }
        if let Some(value) = self.options.value(Flag::ListSourcesOrVersion) {
            if SystemInfoOption::from_option(value).is_none() {
                issues.push(Issue::Malformed(Some(format!(
                    "Invalid option: {}",
                    value.trim()
                ))));
            }
        }
    }

    /// Works out the object types to search. Types that the search key
    /// cannot find are dropped rather than reported, so the result may
    /// be empty.
    fn filter_object_types(&self) -> BTreeSet<ObjectType> {
        let mut object_types: BTreeSet<ObjectType> = if !self.supplied_object_types.is_empty() {
            self.supplied_object_types.clone()
        } else if self.is_lookup_in_both_directions() {
            LOOKUP_IN_BOTH_DIRECTIONS_OBJECT_TYPES.into_iter().collect()
        } else {
            ObjectType::ALL.into_iter().collect()
        };

        if self.has_option(Flag::NoPersonal) {
            object_types.remove(&ObjectType::Person);
            object_types.remove(&ObjectType::Role);
        }
        if self.is_resource() {
            object_types.retain(|t| RESOURCE_OBJECT_TYPES.contains(t));
        }
        if self.is_brief_abuse_contact() {
            object_types.retain(|t| ABUSE_CONTACT_OBJECT_TYPES.contains(t));
        }
        if !self.is_inverse() {
            object_types.retain(|t| {
                t.lookup_attributes()
                    .iter()
                    .any(|attribute| matcher::fetchable_by(*attribute, self))
            });
        }
        object_types
    }

    /// Returns the comma-separated values of a flag, in order and
    /// without duplicates.
    fn option_values(&self, flag: Flag) -> Vec<&str> {
        let mut values = Vec::new();
        for value in self.options.values(flag).iter().flat_map(|v| split_commas(v)) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }

    #[cfg(test)]
    pub(crate) fn unvalidated(raw: &str) -> Self {
        let options = options::parse(raw).unwrap();
        Self::build(raw, options, Origin::Direct, &mut Vec::new())
    }
}

////////////////////////////////////////////////////////////////////////
// QUERIES - ACCESSORS                                                //
////////////////////////////////////////////////////////////////////////

impl Query {
    /// Returns the query string as given (trimmed).
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn options(&self) -> &ParsedOptions {
        &self.options
    }

    pub fn has_option(&self, flag: Flag) -> bool {
        self.options.has(flag)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn search_key(&self) -> &SearchKey {
        &self.search_key
    }

    pub fn search_value(&self) -> &str {
        self.search_key.value()
    }

    /// Returns the match operation selected by a flag. When this is
    /// [`None`], the executor should use
    /// [`effective_match_operation`](Self::effective_match_operation).
    pub fn match_operation(&self) -> Option<MatchOperation> {
        self.match_operation
    }

    /// Returns the match operation to walk an address-space index
    /// with, or [`None`] if the query has no address key.
    pub fn effective_match_operation(&self) -> Option<MatchOperation> {
        self.address_key()?;
        Some(
            self.match_operation
                .unwrap_or(MatchOperation::ExactOrFirstLevelLessSpecific),
        )
    }

    /// Returns the object types to search, in canonical order.
    pub fn object_types(&self) -> &BTreeSet<ObjectType> {
        &self.object_types
    }

    /// Returns the object types named with `-T`.
    pub fn supplied_object_types(&self) -> &BTreeSet<ObjectType> {
        &self.supplied_object_types
    }

    pub fn has_object_types_specified(&self) -> bool {
        self.has_option(Flag::SelectTypes)
    }

    pub fn has_object_type_filter(&self, object_type: ObjectType) -> bool {
        self.object_types.contains(&object_type)
    }

    /// Returns the attributes an inverse query searches. This is empty
    /// for other queries.
    pub fn attribute_types(&self) -> &[AttributeType] {
        &self.attribute_types
    }

    /// Returns the sources named with `-s`, upper-cased.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn via(&self, origin: Origin) -> bool {
        self.origin == origin
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn sso_token(&self) -> Option<&str> {
        self.credentials.as_ref()?.sso_token.as_deref()
    }

    pub fn passwords(&self) -> &[String] {
        self.credentials
            .as_ref()
            .map(|credentials| credentials.passwords.as_slice())
            .unwrap_or_default()
    }

    /// Returns the IP block to search. With `-d`, a reverse-DNS search
    /// term stands in for its forward block.
    pub fn ip_key(&self) -> Option<IpInterval> {
        self.search_key.ip_key().or_else(|| {
            self.is_lookup_in_both_directions()
                .then(|| self.search_key.ip_key_reverse())
                .flatten()
        })
    }

    /// Returns the IP block whose reverse-DNS domains to search. With
    /// `-d`, a forward search term stands in for its reverse domains.
    pub fn ip_key_reverse(&self) -> Option<IpInterval> {
        self.search_key.ip_key_reverse().or_else(|| {
            self.is_lookup_in_both_directions()
                .then(|| self.search_key.ip_key())
                .flatten()
        })
    }

    /// Returns the key to walk an address-space index with: the IP
    /// block or AS numbers of the search term.
    pub fn address_key(&self) -> Option<ResourceKey> {
        self.search_key
            .address_key()
            .or_else(|| self.ip_key().map(ResourceKey::Ip))
    }

    pub fn as_range(&self) -> Option<AsRange> {
        self.search_key.as_range()
    }

    pub fn route_origin(&self) -> Option<AsNumber> {
        self.search_key.origin()
    }

    /// Returns whether an object of `object_type` can be found through
    /// `attribute_type` by this query.
    pub fn matches_object_type_and_attribute(
        &self,
        object_type: ObjectType,
        attribute_type: AttributeType,
    ) -> bool {
        object_type.lookup_attributes().contains(&attribute_type)
            && matcher::fetchable_by(attribute_type, self)
    }
}

////////////////////////////////////////////////////////////////////////
// QUERIES - DERIVED PREDICATES                                       //
////////////////////////////////////////////////////////////////////////

impl Query {
    pub fn is_keys_only(&self) -> bool {
        self.has_option(Flag::PrimaryKeys)
    }

    pub fn is_all_sources(&self) -> bool {
        self.has_option(Flag::AllSources)
    }

    pub fn is_resource(&self) -> bool {
        self.has_option(Flag::Resource)
    }

    pub fn is_lookup_in_both_directions(&self) -> bool {
        self.has_option(Flag::ReverseDomain)
    }

    pub fn is_brief_abuse_contact(&self) -> bool {
        self.has_option(Flag::AbuseContact)
    }

    pub fn is_short_hand(&self) -> bool {
        self.has_option(Flag::Brief)
    }

    pub fn is_returning_irt(&self) -> bool {
        self.is_brief_abuse_contact() || (!self.is_keys_only() && self.has_option(Flag::Irt))
    }

    /// Returns whether results are grouped by the object they relate
    /// to.
    pub fn is_grouping(&self) -> bool {
        !self.is_keys_only() && !self.has_option(Flag::NoGrouping) && !self.is_brief_abuse_contact()
    }

    pub fn is_returning_referenced_objects(&self) -> bool {
        !(self.has_option(Flag::NoReferenced)
            || self.is_short_hand()
            || self.is_keys_only()
            || self.is_resource()
            || self.is_brief_abuse_contact())
    }

    /// Returns whether only the objects matching the search key are
    /// returned, with nothing related to them.
    pub fn is_primary_objects_only(&self) -> bool {
        !(self.is_returning_referenced_objects() || self.is_returning_irt() || self.is_grouping())
    }

    /// Returns whether sensitive attributes are filtered out of the
    /// results.
    pub fn is_filtered(&self) -> bool {
        !(self.has_option(Flag::NoFiltering)
            || self.is_keys_only()
            || self.is_help()
            || self.is_template()
            || self.is_verbose())
    }

    pub fn is_help(&self) -> bool {
        self.search_value().eq_ignore_ascii_case("help")
    }

    pub fn is_system_info(&self) -> bool {
        self.has_option(Flag::ListSourcesOrVersion)
            || self.has_option(Flag::ListSources)
            || self.has_option(Flag::Version)
            || self.has_option(Flag::Types)
    }

    /// Returns the system information asked for, if any.
    pub fn system_info_option(&self) -> Option<SystemInfoOption> {
        if let Some(value) = self.options.value(Flag::ListSourcesOrVersion) {
            SystemInfoOption::from_option(value)
        } else if self.has_option(Flag::ListSources) {
            Some(SystemInfoOption::Sources)
        } else if self.has_option(Flag::Version) {
            Some(SystemInfoOption::Version)
        } else if self.has_option(Flag::Types) {
            Some(SystemInfoOption::Types)
        } else {
            None
        }
    }

    pub fn is_inverse(&self) -> bool {
        self.has_option(Flag::Inverse)
    }

    pub fn is_template(&self) -> bool {
        self.has_option(Flag::Template)
    }

    /// Returns the object type whose template is asked for with `-t`.
    pub fn template_option(&self) -> Option<ObjectType> {
        self.options.value(Flag::Template)?.parse().ok()
    }

    pub fn is_verbose(&self) -> bool {
        self.has_option(Flag::Verbose)
    }

    /// Returns the object type whose verbose template is asked for
    /// with `-v`.
    pub fn verbose_option(&self) -> Option<ObjectType> {
        self.options.value(Flag::Verbose)?.parse().ok()
    }

    pub fn is_version_list(&self) -> bool {
        self.has_option(Flag::ListVersions)
    }

    pub fn is_version_diff(&self) -> bool {
        self.has_option(Flag::DiffVersions)
    }

    pub fn is_object_version(&self) -> bool {
        self.has_option(Flag::ShowVersion)
    }

    /// Returns the version asked for with `--show-version`.
    pub fn object_version(&self) -> Option<u32> {
        let value = self.options.value(Flag::ShowVersion)?;
        validation::parse_object_version(value).ok()
    }

    /// Returns the two versions asked for with `--diff-versions`.
    pub fn object_versions(&self) -> Option<(u32, u32)> {
        let value = self.options.value(Flag::DiffVersions)?;
        validation::parse_object_versions(value).ok()
    }

    pub fn is_valid_syntax(&self) -> bool {
        self.has_option(Flag::ValidSyntax)
    }

    pub fn is_no_valid_syntax(&self) -> bool {
        self.has_option(Flag::NoValidSyntax)
    }

    /// Returns whether the query uses any of the IP flags, which
    /// include `-d`.
    pub fn has_ip_flags(&self) -> bool {
        self.options
            .flags()
            .any(|flag| flag.group() == FlagGroup::MatchOperation)
    }

    /// Returns the `-V` value naming the client that is querying on
    /// someone's behalf.
    pub fn proxy(&self) -> Option<&str> {
        self.options.value(Flag::Client)
    }

    pub fn has_proxy(&self) -> bool {
        self.has_option(Flag::Client)
    }

    pub fn is_proxy_valid(&self) -> bool {
        self.proxy().map_or(true, validation::is_valid_proxy)
    }

    /// Returns the IP address a proxying client is querying for.
    pub fn proxy_ip(&self) -> Option<&str> {
        let mut parts = split_commas(self.proxy()?);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(ip), None) => Some(ip),
            _ => None,
        }
    }

    pub fn has_proxy_with_ip(&self) -> bool {
        self.proxy_ip().is_some()
    }

    pub fn has_keep_alive(&self) -> bool {
        self.has_option(Flag::PersistentConnection)
    }

    /// Returns whether the query does nothing but toggle keep-alive.
    pub fn has_only_keep_alive(&self) -> bool {
        self.has_keep_alive() && self.options.flags().count() == 1 && self.search_key.is_empty()
    }

    pub fn is_show_personal(&self) -> bool {
        self.has_option(Flag::ShowPersonal)
    }

    pub fn is_no_personal(&self) -> bool {
        self.has_option(Flag::NoPersonal)
    }

    pub fn is_show_tag_info(&self) -> bool {
        self.has_option(Flag::ShowTagInfo)
    }

    pub fn is_no_tag_info(&self) -> bool {
        self.has_option(Flag::NoTagInfo)
    }

    /// Returns the tags whose objects are kept.
    pub fn tag_include(&self) -> Vec<&str> {
        self.option_values(Flag::FilterTagInclude)
    }

    /// Returns the tags whose objects are dropped.
    pub fn tag_exclude(&self) -> Vec<&str> {
        self.option_values(Flag::FilterTagExclude)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.original)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
