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

//! Implements the configuration file.

use std::fmt::{self, Write};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::Level::Debug;
use log::{debug, log_enabled};
use paste::paste;
use serde::{de, Deserialize};

use whois_query::query::{Credentials, Origin};
use whois_query::resource::ResourceKey;
use whois_query::rpsl::ObjectType;

////////////////////////////////////////////////////////////////////////
// CONFIGURATION LOADING                                              //
////////////////////////////////////////////////////////////////////////

/// Loads the configuration from the file given by `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = fs::read(path.as_ref()).context("failed to read the configuration file")?;
    let config: Config =
        toml::from_slice(&raw_config).context("failed to parse the configuration file")?;
    log_config_summary(&config);
    Ok(config)
}

/// Summarizes the configuration in the log, if the debug log level is
/// enabled.
fn log_config_summary(config: &Config) {
    if !log_enabled!(Debug) {
        return;
    }

    let mut message = format!(
        "Configuration loaded:\n\
         Origin:    {}\n\
         SSO token: {}\n\
         Passwords: {}\n\
         Objects:   ",
        config.origin.0,
        if config.sso_token.is_some() {
            "present"
        } else {
            "absent"
        },
        config.passwords.len(),
    );
    if config.objects.is_empty() {
        message.push_str("none");
    } else {
        write!(message, "{}", config.objects.len()).unwrap();
        for object in &config.objects {
            write!(
                message,
                "\n  {} {} ({})",
                object.object_type.0, object.name, object.key.0
            )
            .unwrap();
        }
    }
    debug!("{}", message);
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION FILE STRUCTURE                                       //
////////////////////////////////////////////////////////////////////////

/// The complete configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_origin")]
    pub origin: ConfigOrigin,
    pub sso_token: Option<String>,
    #[serde(default)]
    pub passwords: Vec<String>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

fn default_origin() -> ConfigOrigin {
    ConfigOrigin(Origin::Direct)
}

impl Config {
    /// Returns the credentials to send with queries, if any are
    /// configured.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.sso_token.is_none() && self.passwords.is_empty() {
            None
        } else {
            Some(Credentials {
                sso_token: self.sso_token.clone(),
                passwords: self.passwords.clone(),
            })
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            sso_token: None,
            passwords: Vec::new(),
            objects: Vec::new(),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION SECTION: OBJECTS                                     //
////////////////////////////////////////////////////////////////////////

/// An object to place in the in-memory index.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectConfig {
    #[serde(rename = "type")]
    pub object_type: ConfigObjectType,
    pub key: ConfigResourceKey,
    pub name: String,
}

////////////////////////////////////////////////////////////////////////
// WRAPPERS OVER LIBRARY TYPES FOR SERDE                              //
////////////////////////////////////////////////////////////////////////

/// Generates a deserializable `ConfigX` structure wrapping an `X` type
/// from [`whois_query`], using its [`FromStr`](std::str::FromStr)
/// implementation.
macro_rules! make_serde_wrapper {
    ($wrapper:ident, $over:ty, $description:literal) => {
        /// A macro-generated deserializable wrapper over a
        /// [`whois_query`] type.
        #[derive(Clone, Debug)]
        pub struct $wrapper(pub $over);

        impl<'de> Deserialize<'de> for $wrapper {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                deserializer.deserialize_str(paste! { [<$wrapper Visitor>] })
            }
        }

        paste! {
            /// A macro-generated [`Visitor`](de::Visitor).
            #[derive(Debug)]
            struct [<$wrapper Visitor>];
        }

        impl<'de> de::Visitor<'de> for paste! { [<$wrapper Visitor>] } {
            type Value = $wrapper;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str($description)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse()
                    .map($wrapper)
                    .map_err(|e| E::custom(format!("invalid {}: {}", $description, e)))
            }
        }
    };
}

make_serde_wrapper!(ConfigOrigin, Origin, "query origin");
make_serde_wrapper!(ConfigObjectType, ObjectType, "object type");
make_serde_wrapper!(ConfigResourceKey, ResourceKey, "resource key");
