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

//! Address-space indices.
//!
//! Objects keyed by Internet number resources (inetnums, inet6nums,
//! routes, as-blocks, ...) form a containment hierarchy, and queries
//! walk that hierarchy according to their [`MatchOperation`]. An
//! [`AddressSpaceIndex`] is anything that can do this walk. Resolving
//! a [`Query`](crate::query::Query) never touches an index; an
//! executor passes the query's
//! [address key](crate::query::Query::address_key) and
//! [effective match
//! operation](crate::query::Query::effective_match_operation) to one
//! afterwards.
//!
//! [`MemoryIndex`] is an in-memory implementation.

use crate::query::MatchOperation;
use crate::resource::ResourceKey;

mod memory;
pub use memory::MemoryIndex;

/// Trait for address-space indices.
pub trait AddressSpaceIndex {
    /// The type identifying the objects that are indexed.
    type Key;

    /// Finds the objects whose blocks are related to `key` as
    /// `operation` requires:
    ///
    /// * [`Exact`](MatchOperation::Exact): blocks equal to `key`;
    /// * [`FirstLevelLessSpecific`](MatchOperation::FirstLevelLessSpecific):
    ///   the smallest blocks strictly containing `key`;
    /// * [`ExactOrFirstLevelLessSpecific`](MatchOperation::ExactOrFirstLevelLessSpecific):
    ///   the exact blocks if there are any, and otherwise the first
    ///   level less specific blocks;
    /// * [`ExactAndAllLevelsLessSpecific`](MatchOperation::ExactAndAllLevelsLessSpecific):
    ///   all blocks containing `key`, including equal ones;
    /// * [`FirstLevelMoreSpecific`](MatchOperation::FirstLevelMoreSpecific):
    ///   the blocks strictly within `key` that no other such block
    ///   contains;
    /// * [`AllLevelsMoreSpecific`](MatchOperation::AllLevelsMoreSpecific):
    ///   all blocks strictly within `key`.
    ///
    /// Blocks in a different number space from `key` never match. The
    /// result is ordered outermost block first, without duplicates.
    fn lookup(&self, key: &ResourceKey, operation: MatchOperation) -> Vec<Self::Key>;
}
