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

//! Problems found while resolving a query.
//!
//! Every problem is an [`Issue`], which is either a (fatal) error or a
//! warning. Issues display in the form used by the line protocol:
//!
//! ```text
//! %ERROR:901: duplicate IP flags passed
//! %
//! % More than one IP flag (-l, -L, -m, -M or -x) passed to the server.
//! ```
//!
//! When resolution fails, the errors are collected into a
//! [`QueryError`], whose [`Reason`] is what callers should branch on.

use std::fmt;

use crate::flag::Flag;
use crate::options::ParseError;
use crate::rpsl::AttributeType;

////////////////////////////////////////////////////////////////////////
// REASONS                                                            //
////////////////////////////////////////////////////////////////////////

/// A stable, machine-checkable classification of an [`Issue`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reason {
    Malformed,
    DuplicateFlags,
    UselessIpFlag,
    IllegalRange,
    InvalidObjectType,
    InvalidAttributeType,
    InvalidCombination,
    NoSearchKey,
    InvalidSearchKey,
    InvalidVersion,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "MALFORMED",
            Self::DuplicateFlags => "DUPLICATE_FLAGS",
            Self::UselessIpFlag => "USELESS_IP_FLAG",
            Self::IllegalRange => "ILLEGAL_RANGE",
            Self::InvalidObjectType => "INVALID_OBJECT_TYPE",
            Self::InvalidAttributeType => "INVALID_ATTRIBUTE_TYPE",
            Self::InvalidCombination => "INVALID_COMBINATION",
            Self::NoSearchKey => "NO_SEARCH_KEY",
            Self::InvalidSearchKey => "INVALID_SEARCH_KEY",
            Self::InvalidVersion => "INVALID_VERSION",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

////////////////////////////////////////////////////////////////////////
// ISSUES                                                             //
////////////////////////////////////////////////////////////////////////

/// An error or warning found in a query.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Issue {
    /// The query could not be tokenized or a flag value is unusable.
    /// The detail replaces the generic advice when present.
    Malformed(Option<String>),
    InvalidProxy(String),
    DuplicateIpFlags,

    /// The IP flag has no search key it can apply to.
    UselessIpFlag(Flag),
    IllegalRange,
    UnknownObjectType(String),
    UnknownAttribute(String),
    AttributeNotSearchable(AttributeType),
    InvalidCombination(Flag, Flag),
    ConflictingTags(Vec<String>),
    NoSearchKey,
    AbuseContactNotApplicable,
    InvalidVersion(&'static str),

    /// A flag has no effect because of another flag. This is only a
    /// warning.
    IgnoredFlag { ignored: Flag, because: Flag },
}

impl Issue {
    /// Returns whether the `Issue` represents a (fatal) error.
    /// Otherwise, it is a warning.
    pub fn is_error(&self) -> bool {
        !matches!(*self, Self::IgnoredFlag { .. })
    }

    pub fn reason(&self) -> Reason {
        match self {
            Self::Malformed(_) | Self::InvalidProxy(_) => Reason::Malformed,
            Self::DuplicateIpFlags => Reason::DuplicateFlags,
            Self::UselessIpFlag(_) => Reason::UselessIpFlag,
            Self::IllegalRange => Reason::IllegalRange,
            Self::UnknownObjectType(_) => Reason::InvalidObjectType,
            Self::UnknownAttribute(_) | Self::AttributeNotSearchable(_) => {
                Reason::InvalidAttributeType
            }
            Self::InvalidCombination(..) | Self::ConflictingTags(_) | Self::IgnoredFlag { .. } => {
                Reason::InvalidCombination
            }
            Self::NoSearchKey => Reason::NoSearchKey,
            Self::AbuseContactNotApplicable => Reason::InvalidSearchKey,
            Self::InvalidVersion(_) => Reason::InvalidVersion,
        }
    }

    /// Returns the numeric code shown in the line protocol.
    pub fn code(&self) -> u16 {
        match self {
            Self::Malformed(_) | Self::InvalidProxy(_) | Self::InvalidVersion(_) => 111,
            Self::DuplicateIpFlags => 901,
            Self::UselessIpFlag(_) => 902,
            Self::IllegalRange => 903,
            Self::UnknownObjectType(_) => 103,
            Self::UnknownAttribute(_) => 104,
            Self::AttributeNotSearchable(_) => 105,
            Self::InvalidCombination(..) | Self::ConflictingTags(_) => 109,
            Self::NoSearchKey => 106,
            Self::AbuseContactNotApplicable => 115,
            Self::IgnoredFlag { .. } => 905,
        }
    }

    /// Returns the one-line summary of the issue.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Malformed(_) | Self::InvalidProxy(_) | Self::InvalidVersion(_) => {
                "invalid option supplied"
            }
            Self::DuplicateIpFlags => "duplicate IP flags passed",
            Self::UselessIpFlag(_) => "useless IP flag passed",
            Self::IllegalRange => "illegal range",
            Self::UnknownObjectType(_) => "unknown object type",
            Self::UnknownAttribute(_) => "unknown attribute",
            Self::AttributeNotSearchable(_) => "attribute is not searchable",
            Self::InvalidCombination(..) | Self::ConflictingTags(_) => {
                "invalid combination of flags passed"
            }
            Self::NoSearchKey => "no search key specified",
            Self::AbuseContactNotApplicable => "invalid search key",
            Self::IgnoredFlag { .. } => "flag has no effect",
        }
    }

    fn write_detail(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Malformed(Some(detail)) => f.write_str(detail),
            Self::Malformed(None) => f.write_str("Use help query to see the valid options."),
            Self::InvalidProxy(proxy) => write!(
                f,
                "The client \"{}\" is not of the form <client>[,<ip address>].",
                proxy
            ),
            Self::DuplicateIpFlags => {
                f.write_str("More than one IP flag (-l, -L, -m, -M or -x) passed to the server.")
            }
            Self::UselessIpFlag(Flag::ReverseDomain) => f.write_str(
                "The -d flag needs an IP address, prefix, range or reverse-domain search key.",
            ),
            Self::UselessIpFlag(_) => f.write_str(
                "An IP flag (-l, -L, -m, -M or -x) was used without an IP or AS search key.",
            ),
            Self::IllegalRange => f.write_str(
                "More specific lookups of the entire address space are not allowed.",
            ),
            Self::UnknownObjectType(name) => write!(f, "Unknown object type \"{}\".", name),
            Self::UnknownAttribute(name) => write!(f, "Unknown attribute \"{}\".", name),
            Self::AttributeNotSearchable(attribute) => write!(
                f,
                "\"{}\" is not a known RPSL attribute that is inverse searchable.",
                attribute
            ),
            Self::InvalidCombination(a, b) => write!(
                f,
                "The flags \"{}\" and \"{}\" cannot be used together.",
                a, b
            ),
            Self::ConflictingTags(tags) => write!(
                f,
                "The tags {} are both included and excluded.",
                tags.join(", ")
            ),
            Self::NoSearchKey => f.write_str("A search key is required for this query."),
            Self::AbuseContactNotApplicable => f.write_str(
                "Abuse contacts can only be looked up for IP address space and AS numbers.",
            ),
            Self::InvalidVersion(detail) => f.write_str(detail),
            Self::IgnoredFlag { ignored, because } => write!(
                f,
                "The flag \"{}\" is ignored when \"{}\" is used.",
                ignored, because
            ),
        }
    }
}

impl From<ParseError> for Issue {
    fn from(error: ParseError) -> Self {
        Self::Malformed(Some(error.to_string()))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let severity = if self.is_error() { "ERROR" } else { "WARNING" };
        write!(f, "%{}:{}: {}\n%\n% ", severity, self.code(), self.title())?;
        self.write_detail(f)
    }
}

////////////////////////////////////////////////////////////////////////
// QUERY ERRORS                                                       //
////////////////////////////////////////////////////////////////////////

/// The reason a query could not be resolved, with every error found.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryError {
    reason: Reason,
    errors: Vec<Issue>,
}

impl QueryError {
    /// Creates a `QueryError` from the errors found. The reason is
    /// that of the first error.
    pub(crate) fn new(errors: Vec<Issue>) -> Self {
        let reason = errors.first().map_or(Reason::Malformed, Issue::reason);
        Self { reason, errors }
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    pub fn errors(&self) -> &[Issue] {
        &self.errors
    }

    /// Returns the rendered form of each error.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(Issue::to_string).collect()
    }
}

impl From<ParseError> for QueryError {
    fn from(error: ParseError) -> Self {
        Self::new(vec![error.into()])
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_render_like_the_line_protocol() {
        assert_eq!(
            Issue::DuplicateIpFlags.to_string(),
            "%ERROR:901: duplicate IP flags passed\n%\n\
             % More than one IP flag (-l, -L, -m, -M or -x) passed to the server."
        );
        let warning = Issue::IgnoredFlag {
            ignored: Flag::NoReferenced,
            because: Flag::PrimaryKeys,
        };
        assert!(!warning.is_error());
        assert!(warning.to_string().starts_with("%WARNING:905: flag has no effect"));
    }

    #[test]
    fn useless_ip_flag_detail_names_the_missing_key() {
        let reverse = Issue::UselessIpFlag(Flag::ReverseDomain).to_string();
        assert!(reverse.starts_with("%ERROR:902: useless IP flag passed"));
        assert!(reverse.ends_with("or reverse-domain search key."));
        let more = Issue::UselessIpFlag(Flag::OneMore).to_string();
        assert!(more.ends_with("without an IP or AS search key."));
    }

    #[test]
    fn query_errors_take_the_first_reason() {
        let error = QueryError::new(vec![
            Issue::IllegalRange,
            Issue::InvalidVersion("diff versions are the same"),
        ]);
        assert_eq!(error.reason(), Reason::IllegalRange);
        assert_eq!(error.messages().len(), 2);
        assert!(error.to_string().contains("\n\n%ERROR:111:"));
    }

    #[test]
    fn parse_errors_are_malformed() {
        let error = QueryError::from(ParseError::UnknownFlag("-z".to_owned()));
        assert_eq!(error.reason(), Reason::Malformed);
        assert!(error.messages()[0].ends_with("unknown flag -z"));
    }
}
