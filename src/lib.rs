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

//! Resolution of whois queries.
//!
//! A whois query is a single line such as `-r -T inetnum 10.0.0.0/8`:
//! flags followed by a search term. This crate turns such a line into
//! an immutable [`Query`] describing what to search for, or into a
//! [`QueryError`] listing everything that is wrong with it. Executing
//! the query is left to the caller, which may use an
//! [`index::AddressSpaceIndex`] for the address-space walk.
//!
//! ```
//! use whois_query::query::{MatchOperation, Query};
//! use whois_query::rpsl::ObjectType;
//!
//! let query = Query::parse("-m 10.0.0.0/8").unwrap();
//! assert_eq!(query.match_operation(), Some(MatchOperation::FirstLevelMoreSpecific));
//! assert!(query.object_types().contains(&ObjectType::Inetnum));
//! ```

pub mod flag;
pub mod index;
pub mod options;
pub mod query;
pub mod resource;
pub mod rpsl;
pub mod search_key;
mod util;

pub use query::{resolve, Query, QueryError};
