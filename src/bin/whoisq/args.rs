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

//! Implements command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use whois_query::query::Origin;

/// Parses the command line arguments.
pub fn parse() -> Args {
    Args::parse()
}

/// Resolves whois queries into what they ask for
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve queries and print their descriptors
    Resolve(ResolveArgs),

    /// Resolve a query and walk the configured index with it
    Lookup(LookupArgs),
}

#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Set the configuration file to use
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the channel the queries are treated as arriving over
    #[clap(long, value_name = "direct|authenticated", value_parser)]
    pub origin: Option<Origin>,

    /// The queries to resolve (read from standard input, one per line,
    /// if none are given)
    #[clap(value_name = "QUERY", allow_hyphen_values = true)]
    pub queries: Vec<String>,
}

#[derive(Debug, Parser)]
pub struct LookupArgs {
    /// Set the configuration file holding the index
    #[clap(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Override the channel the query is treated as arriving over
    #[clap(long, value_name = "direct|authenticated", value_parser)]
    pub origin: Option<Origin>,

    /// The query to look up
    #[clap(value_name = "QUERY", allow_hyphen_values = true)]
    pub query: String,
}
