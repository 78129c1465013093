// Copyright 2018-2022 Cargill Incorporated
// Copyright 2018 Intel Corporation
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod error;
#[cfg(all(feature = "sqlite", feature = "store-factory"))]
pub mod profile;

use std::collections::HashMap;
use std::io::{Error as IoError, ErrorKind};

use clap::ArgMatches;

#[cfg(feature = "sqlite")]
use build_database::build_database::{get_default_database, Migrate};

#[cfg(feature = "sqlite")]
use crate::env_config::SharedConfig;

use self::error::CliError;

/// A CLI Command Action.
///
/// An Action is a single subcommand for CLI operations.
pub trait Action {
    /// Run a CLI Action with the given args
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError>;
}

/// A collection of Subcommands associated with a single parent command.
#[derive(Default)]
pub struct SubcommandActions<'a> {
    actions: HashMap<String, Box<dyn Action + 'a>>,
}

impl<'a> SubcommandActions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command<'action: 'a, A: Action + 'action>(
        mut self,
        command: &str,
        action: A,
    ) -> Self {
        self.actions.insert(command.to_string(), Box::new(action));

        self
    }
}

impl<'s> Action for SubcommandActions<'s> {
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError> {
        let args = arg_matches.ok_or(CliError::RequiresArgs)?;

        match args.subcommand() {
            Some((subcommand, args)) => {
                if let Some(action) = self.actions.get_mut(subcommand) {
                    action.run(Some(args))
                } else {
                    Err(CliError::InvalidSubcommand)
                }
            }
            None => Ok(()),
        }
    }
}

fn msg_from_io_error(err: IoError) -> String {
    match err.kind() {
        ErrorKind::NotFound => "File not found".into(),
        ErrorKind::PermissionDenied => "Permission denied".into(),
        ErrorKind::InvalidData => "Invalid data".into(),
        _ => "Unknown I/O error".into(),
    }
}

// Takes a vec of vecs of strings. The first vec should include the title of the columns.
// The max length of each column is calculated and is used as the column with when printing the
// table.
fn format_table(table: &[Vec<String>]) -> String {
    let mut max_lengths: Vec<usize> = Vec::new();

    for row in table.iter() {
        for (i, col) in row.iter().enumerate() {
            match max_lengths.get_mut(i) {
                Some(length) if col.len() > *length => *length = col.len(),
                Some(_) => {}
                None => max_lengths.push(col.len()),
            }
        }
    }

    let mut output = String::new();
    for row in table.iter() {
        let mut col_string = String::new();
        for (i, len) in max_lengths.iter().enumerate() {
            if let Some(value) = row.get(i) {
                col_string.push_str(value);
                col_string.push_str(&" ".repeat(1 + *len - value.len()));
            } else {
                col_string += &" ".repeat(*len);
            }
        }
        output.push_str(col_string.trim_end());
        output.push('\n');
    }
    output
}

/// Applies the embedded migrations to the database named by `-C`, the configured url, or the
/// default database under the state directory, in that order.
#[cfg(feature = "sqlite")]
pub struct MigrateAction {
    config: SharedConfig,
}

#[cfg(feature = "sqlite")]
impl MigrateAction {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "sqlite")]
impl Action for MigrateAction {
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError> {
        let url = match arg_matches.and_then(|args| args.get_one::<String>("connect")) {
            Some(url) => url.to_owned(),
            None => match &self.config.database.url {
                Some(url) => url.expose_secret().to_owned(),
                None => get_default_database()?,
            },
        };

        Migrate::run(Some(url))?;
        Ok(())
    }
}
