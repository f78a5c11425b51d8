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

//! The RPSL vocabulary that queries refer to: object types and
//! attribute types.
//!
//! Only what query resolution needs is modeled here. Each object type
//! knows its *lookup attributes* (the attributes that a plain query can
//! match), and each attribute type knows whether it can be searched
//! with an inverse query (`-i`).

mod attribute_type;
mod object_type;
pub use attribute_type::AttributeType;
pub use object_type::ObjectType;
