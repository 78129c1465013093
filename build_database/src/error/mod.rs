//! Errors raised while locating or migrating the profile database.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// A subcommand requires one or more arguments, but none were provided.
    RequiresArgs,
    /// A non-existent subcommand was specified.
    InvalidSubcommand,
    /// A general error encountered by a subcommand.
    ActionError(String),
    /// The environment is not in the correct state to execute the subcommand as requested.
    EnvironmentError(String),
}

impl Error for CliError {}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::RequiresArgs => write!(
                f,
                "The specified subcommand requires arguments, but none were provided"
            ),
            CliError::InvalidSubcommand => write!(f, "An invalid subcommand was specified"),
            CliError::ActionError(msg) => write!(f, "Subcommand encountered an error: {}", msg),
            CliError::EnvironmentError(msg) => f.write_str(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_action_error() {
        let err = CliError::ActionError("boom".to_string());
        assert_eq!(format!("{}", err), "Subcommand encountered an error: boom");
    }

    #[test]
    fn test_display_environment_error_is_verbatim() {
        let err = CliError::EnvironmentError("no state dir".to_string());
        assert_eq!(format!("{}", err), "no state dir");
    }
}
