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

//! Implements the `resolve` and `lookup` commands.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::process;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info};

use whois_query::index::AddressSpaceIndex;
use whois_query::query::{self, Query};

use crate::args::{Command, LookupArgs, ResolveArgs};
use crate::config::{self, Config};
use crate::index;

/// Runs the command.
pub fn run(command: Command) {
    env_logger::init_from_env(Env::new().default_filter_or("warn"));

    let result = match command {
        Command::Resolve(args) => try_resolving(args),
        Command::Lookup(args) => try_looking_up(args),
    };
    if let Err(e) = result {
        let mut message = String::from("Failed to run:");
        for (i, cause) in e.chain().enumerate() {
            write!(message, "\n[{}] {}", i + 1, cause).unwrap();
        }
        message.push_str("\nExiting with failure.");
        error!("{}", message);
        process::exit(1);
    }
}

fn try_resolving(args: ResolveArgs) -> Result<()> {
    let config = match args.config {
        Some(ref path) => {
            info!("Loading the configuration from {}.", path.display());
            config::load_from_path(path).context("failed to load the configuration")?
        }
        None => Config::default(),
    };
    let origin = args.origin.unwrap_or(config.origin.0);
    let credentials = config.credentials();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut resolve_and_print = |raw: &str| -> Result<()> {
        let response = match query::resolve(raw, origin, credentials.clone()) {
            Ok(query) => describe(&query),
            Err(e) => e.to_string(),
        };
        writeln!(out, "{}\n", response).context("failed to write to standard output")
    };

    if args.queries.is_empty() {
        info!("Reading queries from standard input.");
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read standard input")?;
            resolve_and_print(&line)?;
        }
    } else {
        for raw in &args.queries {
            resolve_and_print(raw)?;
        }
    }
    Ok(())
}

fn try_looking_up(args: LookupArgs) -> Result<()> {
    info!("Loading the configuration from {}.", args.config.display());
    let config =
        config::load_from_path(&args.config).context("failed to load the configuration")?;
    let origin = args.origin.unwrap_or(config.origin.0);
    let credentials = config.credentials();
    let index = index::load(config.objects);

    let query = match query::resolve(&args.query, origin, credentials) {
        Ok(query) => query,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };
    for warning in query.warnings() {
        println!("{}\n", warning);
    }

    let (key, operation) = match (query.address_key(), query.effective_match_operation()) {
        (Some(key), Some(operation)) => (key, operation),
        _ => {
            println!("% The search key \"{}\" is not in address space.", query.search_value());
            return Ok(());
        }
    };
    let found: Vec<_> = index
        .lookup(&key, operation)
        .into_iter()
        .filter(|object| query.object_types().contains(&object.object_type))
        .collect();
    if found.is_empty() {
        println!("%ERROR:101: no entries found");
    } else {
        for object in found {
            println!("{}", object);
        }
    }
    Ok(())
}

/// Renders a summary of what `query` asks for, followed by its
/// warnings.
fn describe(query: &Query) -> String {
    let key = query.search_key();
    let operation = query
        .effective_match_operation()
        .map_or_else(|| "none".to_owned(), |o| o.to_string());
    let flags: Vec<&str> = query.options().flags().map(|f| f.name()).collect();
    let object_types: Vec<&str> = query.object_types().iter().map(|t| t.name()).collect();

    let mut message = format!(
        "% Query:        {}\n\
         % Search key:   {} ({:?})\n\
         % Flags:        {}\n\
         % Operation:    {}\n\
         % Object types: {}",
        query,
        key,
        key.kind(),
        flags.join(", "),
        operation,
        object_types.join(", "),
    );
    if query.is_inverse() {
        let attribute_types: Vec<&str> = query.attribute_types().iter().map(|a| a.name()).collect();
        write!(message, "\n% Attributes:   {}", attribute_types.join(", ")).unwrap();
    }
    if query.has_sources() {
        write!(message, "\n% Sources:      {}", query.sources().join(", ")).unwrap();
    }
    for warning in query.warnings() {
        write!(message, "\n\n{}", warning).unwrap();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_resolved_filters() {
        let query = Query::parse("-i mnt-by -s ripe,test EXAMPLE-MNT").unwrap();
        let description = describe(&query);
        assert!(description.contains("% Search key:   EXAMPLE-MNT (Plain)"));
        assert!(description.contains("% Attributes:   mnt-by"));
        assert!(description.contains("% Sources:      RIPE, TEST"));
    }

    #[test]
    fn describe_appends_warnings() {
        let query = Query::parse("-K -r AS2050").unwrap();
        assert!(describe(&query).contains("%WARNING:"));
    }
}
