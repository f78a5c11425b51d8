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

//! Implements index loading.

use std::fmt;

use anyhow::{anyhow, Result};
use log::{debug, error, warn};

use whois_query::index::MemoryIndex;
use whois_query::resource::{IpInterval, ResourceKey};
use whois_query::rpsl::ObjectType;

use crate::config::ObjectConfig;

/// An object in the index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexedObject {
    pub object_type: ObjectType,
    pub name: String,
}

impl fmt::Display for IndexedObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.object_type, self.name)
    }
}

/// Loads the objects configured in `objects` into a new index.
/// Objects that cannot be indexed are logged and skipped.
pub fn load(objects: Vec<ObjectConfig>) -> MemoryIndex<IndexedObject> {
    let mut index = MemoryIndex::new();
    let mut objects_failed = 0;

    for object_config in objects {
        let object_type = object_config.object_type.0;
        let key = object_config.key.0;
        if let Err(e) = check_key(object_type, key) {
            error!(
                "Failed to index {} {}: {}",
                object_type, object_config.name, e
            );
            objects_failed += 1;
            continue;
        }

        debug!("Indexing {} {} at {}.", object_type, object_config.name, key);
        let object = IndexedObject {
            object_type,
            name: object_config.name,
        };
        if !index.insert(key, object) {
            warn!("Ignoring a duplicate {} object at {}.", object_type, key);
        }
    }

    if objects_failed > 0 {
        warn!("{} object(s) could not be indexed.", objects_failed);
    }
    index
}

/// Checks that objects of type `object_type` can be keyed by `key`.
fn check_key(object_type: ObjectType, key: ResourceKey) -> Result<()> {
    let fits = match object_type {
        ObjectType::Inetnum | ObjectType::Route => {
            matches!(key, ResourceKey::Ip(IpInterval::V4(_)))
        }
        ObjectType::Inet6num | ObjectType::Route6 => {
            matches!(key, ResourceKey::Ip(IpInterval::V6(_)))
        }
        ObjectType::Domain => matches!(key, ResourceKey::Ip(_)),
        ObjectType::AutNum => {
            matches!(key, ResourceKey::As(range) if range.begin() == range.end())
        }
        ObjectType::AsBlock => matches!(key, ResourceKey::As(_)),
        _ => return Err(anyhow!("{} objects are not keyed by address space", object_type)),
    };
    if fits {
        Ok(())
    } else {
        Err(anyhow!("{} objects cannot be keyed by {}", object_type, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn load_skips_mistyped_objects() {
        let config: Config = toml::from_str(
            r#"
            [[objects]]
            type = "inetnum"
            key = "10.0.0.0/8"
            name = "EXAMPLE-NET"

            [[objects]]
            type = "inet6num"
            key = "10.0.0.0/8"
            name = "WRONG-FAMILY"

            [[objects]]
            type = "person"
            key = "AS1"
            name = "NOT-ADDRESS-SPACE"

            [[objects]]
            type = "aut-num"
            key = "AS1-AS5"
            name = "NOT-SINGLE"
            "#,
        )
        .unwrap();
        let index = load(config.objects);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn check_key_accepts_matching_spaces() {
        assert!(check_key(ObjectType::Route6, "2001:db8::/32".parse().unwrap()).is_ok());
        assert!(check_key(ObjectType::AsBlock, "AS1-AS100".parse().unwrap()).is_ok());
        assert!(check_key(ObjectType::AutNum, "AS7".parse().unwrap()).is_ok());
        assert!(check_key(ObjectType::Domain, "193.0.0.0/24".parse().unwrap()).is_ok());
    }
}
