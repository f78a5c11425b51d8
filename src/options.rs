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

//! Tokenizing and flag parsing for query strings.
//!
//! A query string is split on whitespace into tokens. Tokens that spell
//! a flag in the [`FlagRegistry`] (and any values those flags consume)
//! become [`ParsedOptions`]; every other token is part of the search
//! term. The accepted syntax is the usual getopt-style one:
//!
//! * `-x`, and clusters of short flags such as `-rBG`;
//! * short flags with attached values, e.g. `-Tinetnum`;
//! * `--exact`, `--select-types inetnum` and `--select-types=inetnum`;
//! * `--` on its own, after which every token belongs to the search
//!   term.
//!
//! Flags with an [optional value](Arity::OptionalValue) only take a
//! value in the attached forms.

use std::collections::BTreeMap;
use std::fmt;

use log::trace;

use crate::flag::{Arity, Flag, FlagRegistry, FlagSpec};

/// The maximum number of whitespace-separated tokens in a query.
pub const MAX_QUERY_ELEMENTS: usize = 60;

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// Errors that make a query string malformed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The query had more than [`MAX_QUERY_ELEMENTS`] tokens.
    TooManyElements(usize),

    /// A token looked like a flag but no such flag exists.
    UnknownFlag(String),

    /// A flag requiring a value was given none.
    MissingValue(Flag),

    /// A value was attached to a flag that takes none.
    UnexpectedValue(Flag),

    /// A non-repeatable flag was given more than once with different
    /// values.
    MultipleValues(Flag),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TooManyElements(n) => write!(
                f,
                "the query has {} elements, but at most {} are allowed",
                n, MAX_QUERY_ELEMENTS
            ),
            Self::UnknownFlag(token) => write!(f, "unknown flag {}", token),
            Self::MissingValue(flag) => write!(f, "the flag \"{}\" requires a value", flag),
            Self::UnexpectedValue(flag) => write!(f, "the flag \"{}\" takes no value", flag),
            Self::MultipleValues(flag) => {
                write!(f, "the flag \"{}\" cannot be used multiple times", flag)
            }
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////
// PARSED OPTIONS                                                     //
////////////////////////////////////////////////////////////////////////

/// The flags found in a query string, with their values, and the
/// residual search term.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedOptions {
    values: BTreeMap<Flag, Vec<String>>,
    search_term: String,
}

impl ParsedOptions {
    /// Returns whether `flag` was given.
    pub fn has(&self, flag: Flag) -> bool {
        self.values.contains_key(&flag)
    }

    /// Returns the values given for `flag`, in order. This is empty
    /// both for boolean flags and for flags that were not given.
    pub fn values(&self, flag: Flag) -> &[String] {
        self.values.get(&flag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the first value given for `flag`.
    pub fn value(&self, flag: Flag) -> Option<&str> {
        self.values(flag).first().map(String::as_str)
    }

    /// Returns an iterator over the flags that were given.
    pub fn flags(&self) -> impl Iterator<Item = Flag> + '_ {
        self.values.keys().copied()
    }

    /// Returns whether no flags were given.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the search term: the tokens that were not flags or flag
    /// values, joined by single spaces.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }
}

////////////////////////////////////////////////////////////////////////
// PARSING                                                            //
////////////////////////////////////////////////////////////////////////

/// Splits a query string into tokens.
pub fn tokenize(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

/// Parses a query string with the [standard
/// registry](FlagRegistry::standard).
pub fn parse(query: &str) -> Result<ParsedOptions, ParseError> {
    parse_tokens(FlagRegistry::standard(), &tokenize(query))
}

/// Parses already tokenized input against `registry`.
pub fn parse_tokens(registry: &FlagRegistry, tokens: &[&str]) -> Result<ParsedOptions, ParseError> {
    if tokens.len() > MAX_QUERY_ELEMENTS {
        return Err(ParseError::TooManyElements(tokens.len()));
    }

    let mut parser = Parser {
        registry,
        values: BTreeMap::new(),
        non_options: Vec::new(),
    };
    let mut remaining = tokens.iter().copied();
    while let Some(token) = remaining.next() {
        if token == "--" {
            parser.non_options.extend(remaining.by_ref());
        } else if let Some(body) = token.strip_prefix("--") {
            parser.parse_long(body, token, &mut remaining)?;
        } else if looks_like_flag(token) {
            parser.parse_short_cluster(&token[1..], &mut remaining)?;
        } else {
            parser.non_options.push(token);
        }
    }

    let options = ParsedOptions {
        values: parser.values,
        search_term: parser.non_options.join(" ").trim().to_owned(),
    };
    trace!(
        "Parsed flags {:?} with search term {:?}.",
        options.values,
        options.search_term
    );
    Ok(options)
}

/// Returns whether a token should be read as one or more flags.
fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Parser state for one call to [`parse_tokens`].
struct Parser<'r, 't> {
    registry: &'r FlagRegistry,
    values: BTreeMap<Flag, Vec<String>>,
    non_options: Vec<&'t str>,
}

impl<'t> Parser<'_, 't> {
    /// Handles a `--name` or `--name=value` token. `body` is the token
    /// without its leading dashes.
    fn parse_long(
        &mut self,
        body: &str,
        token: &str,
        remaining: &mut impl Iterator<Item = &'t str>,
    ) -> Result<(), ParseError> {
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let spec = *self
            .registry
            .lookup_long(name)
            .ok_or_else(|| ParseError::UnknownFlag(token.to_owned()))?;

        let value = match spec.arity {
            Arity::None => {
                if attached.is_some() {
                    return Err(ParseError::UnexpectedValue(spec.flag));
                }
                None
            }
            Arity::RequiredValue => match attached {
                Some("") => return Err(ParseError::MissingValue(spec.flag)),
                Some(value) => Some(value),
                None => Some(take_value(self.registry, spec.flag, remaining)?),
            },
            Arity::OptionalValue => attached.filter(|value| !value.is_empty()),
        };
        self.record(spec, value)
    }

    /// Handles a cluster of short flags such as `rBG` or `Tinetnum`
    /// (the token without its leading dash).
    fn parse_short_cluster(
        &mut self,
        cluster: &str,
        remaining: &mut impl Iterator<Item = &'t str>,
    ) -> Result<(), ParseError> {
        for (i, c) in cluster.char_indices() {
            let spec = *self
                .registry
                .lookup_short(c)
                .ok_or_else(|| ParseError::UnknownFlag(format!("-{}", c)))?;
            let rest = &cluster[i + c.len_utf8()..];
            match spec.arity {
                Arity::None => self.record(spec, None)?,
                Arity::RequiredValue => {
                    let value = if rest.is_empty() {
                        take_value(self.registry, spec.flag, remaining)?
                    } else {
                        rest
                    };
                    return self.record(spec, Some(value));
                }
                Arity::OptionalValue => {
                    return self.record(spec, Some(rest).filter(|value| !value.is_empty()));
                }
            }
        }
        Ok(())
    }

    /// Records an occurrence of a flag.
    fn record(&mut self, spec: FlagSpec, value: Option<&str>) -> Result<(), ParseError> {
        let values = self.values.entry(spec.flag).or_default();
        if let Some(value) = value {
            match values.first() {
                None => values.push(value.to_owned()),
                Some(_) if spec.repeatable => values.push(value.to_owned()),
                Some(first) if first == value => (),
                Some(_) => return Err(ParseError::MultipleValues(spec.flag)),
            }
        }
        Ok(())
    }
}

/// Consumes the next token as the value of `flag`. A missing token, or
/// one that names a flag in `registry`, is an error. Other tokens
/// starting with a dash (such as `-1`) are taken as values.
fn take_value<'t>(
    registry: &FlagRegistry,
    flag: Flag,
    remaining: &mut impl Iterator<Item = &'t str>,
) -> Result<&'t str, ParseError> {
    match remaining.next() {
        Some(token) if !names_flag(registry, token) => Ok(token),
        _ => Err(ParseError::MissingValue(flag)),
    }
}

/// Returns whether `token` would be read as a flag known to
/// `registry`.
fn names_flag(registry: &FlagRegistry, token: &str) -> bool {
    if token == "--" {
        true
    } else if let Some(body) = token.strip_prefix("--") {
        let name = body.split_once('=').map_or(body, |(name, _)| name);
        registry.lookup_long(name).is_some()
    } else if looks_like_flag(token) {
        token[1..]
            .chars()
            .next()
            .map_or(false, |c| registry.lookup_short(c).is_some())
    } else {
        false
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a query string that uses `flag` by its first spelling,
    /// with a value if the flag needs one.
    fn query_using(flag: Flag) -> String {
        let spelling = flag.spellings()[0];
        let dashes = if spelling.len() == 1 { "-" } else { "--" };
        let spec = FlagRegistry::standard().spec(flag).unwrap();
        match spec.arity {
            Arity::RequiredValue => format!("{}{} value AS2050", dashes, spelling),
            _ => format!("{}{} AS2050", dashes, spelling),
        }
    }

    #[test]
    fn every_flag_parses() {
        for flag in Flag::ALL {
            let options = parse(&query_using(flag)).unwrap();
            assert!(options.has(flag), "{} was not recorded", flag);
            assert_eq!(options.search_term(), "AS2050");
        }
    }

    #[test]
    fn every_long_spelling_parses() {
        for flag in Flag::ALL.into_iter().filter(|flag| flag.name().len() > 1) {
            let query = format!("--{}=1 AS2050", flag.name());
            match FlagRegistry::standard().spec(flag).unwrap().arity {
                Arity::None => assert_eq!(
                    parse(&query),
                    Err(ParseError::UnexpectedValue(flag))
                ),
                _ => assert_eq!(parse(&query).unwrap().value(flag), Some("1")),
            }
        }
    }

    #[test]
    fn short_clusters_and_attached_values_work() {
        let options = parse("-rBG -Tinetnum,route 10.0.0.0/8").unwrap();
        assert!(options.has(Flag::NoReferenced));
        assert!(options.has(Flag::NoFiltering));
        assert!(options.has(Flag::NoGrouping));
        assert_eq!(options.values(Flag::SelectTypes), ["inetnum,route"]);
        assert_eq!(options.search_term(), "10.0.0.0/8");
    }

    #[test]
    fn long_flags_ignore_case() {
        let options = parse("--ONE-LESS 10.0.0.0/8").unwrap();
        assert!(options.has(Flag::OneLess));
    }

    #[test]
    fn search_term_collects_leftover_tokens() {
        let options = parse("  John   -r   Smith ").unwrap();
        assert!(options.has(Flag::NoReferenced));
        assert_eq!(options.search_term(), "John Smith");
    }

    #[test]
    fn double_dash_ends_flags() {
        let options = parse("-r -- -x foo").unwrap();
        assert!(options.has(Flag::NoReferenced));
        assert!(!options.has(Flag::Exact));
        assert_eq!(options.search_term(), "-x foo");
    }

    #[test]
    fn repeatable_flags_accumulate() {
        let options = parse("-s RIPE -s TEST --sources RIPE AS1").unwrap();
        assert_eq!(options.values(Flag::Sources), ["RIPE", "TEST", "RIPE"]);
    }

    #[test]
    fn non_repeatable_flags_reject_conflicting_values() {
        assert_eq!(
            parse("-t inetnum -t route"),
            Err(ParseError::MultipleValues(Flag::Template))
        );
        let options = parse("-t inetnum --template inetnum").unwrap();
        assert_eq!(options.values(Flag::Template), ["inetnum"]);
        assert!(parse("-r -r --no-referenced AS1").is_ok());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert_eq!(
            parse("-z AS1"),
            Err(ParseError::UnknownFlag(String::from("-z")))
        );
        assert_eq!(
            parse("--bogus AS1"),
            Err(ParseError::UnknownFlag(String::from("--bogus")))
        );
        assert_eq!(
            parse("-rz AS1"),
            Err(ParseError::UnknownFlag(String::from("-z")))
        );
    }

    #[test]
    fn missing_values_are_rejected() {
        assert_eq!(parse("-T"), Err(ParseError::MissingValue(Flag::SelectTypes)));
        assert_eq!(
            parse("-T -r AS1"),
            Err(ParseError::MissingValue(Flag::SelectTypes))
        );
        assert_eq!(
            parse("--sources= AS1"),
            Err(ParseError::MissingValue(Flag::Sources))
        );
    }

    #[test]
    fn values_may_start_with_a_dash() {
        let options = parse("--show-version -1 AS2050").unwrap();
        assert_eq!(options.value(Flag::ShowVersion), Some("-1"));
        assert_eq!(options.search_term(), "AS2050");
        let options = parse("--diff-versions -1:2 AS2050").unwrap();
        assert_eq!(options.value(Flag::DiffVersions), Some("-1:2"));
        assert_eq!(
            parse("--show-version --exact AS2050"),
            Err(ParseError::MissingValue(Flag::ShowVersion))
        );
        assert_eq!(
            parse("-T -- AS1"),
            Err(ParseError::MissingValue(Flag::SelectTypes))
        );
    }

    #[test]
    fn token_count_boundary() {
        let sixty = vec!["-r"; 59].join(" ") + " AS1";
        assert!(parse(&sixty).is_ok());
        let sixty_one = vec!["-r"; 60].join(" ") + " AS1";
        assert_eq!(parse(&sixty_one), Err(ParseError::TooManyElements(61)));
    }

    #[test]
    fn optional_values_are_only_taken_when_attached() {
        let registry = FlagRegistry::new([
            FlagSpec::new(Flag::PersistentConnection, Arity::OptionalValue, false),
            FlagSpec::new(Flag::NoReferenced, Arity::None, false),
        ]);
        let options = parse_tokens(&registry, &["-k", "AS1"]).unwrap();
        assert!(options.has(Flag::PersistentConnection));
        assert_eq!(options.value(Flag::PersistentConnection), None);
        assert_eq!(options.search_term(), "AS1");

        let options = parse_tokens(&registry, &["-k60", "AS1"]).unwrap();
        assert_eq!(options.value(Flag::PersistentConnection), Some("60"));

        let options =
            parse_tokens(&registry, &["--persistent-connection=30", "-r", "AS1"]).unwrap();
        assert_eq!(options.value(Flag::PersistentConnection), Some("30"));
        assert!(options.has(Flag::NoReferenced));
    }
}
