use std::ffi::OsString;
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use flexi_logger::{DeferredNow, LogSpecBuilder, Logger};
use log::Record;

use tenant_profiles::env_config::{self, SharedConfig};
use tenant_profiles::subcommands::error::CliError;
use tenant_profiles::subcommands::profile::{
    CreateProfileAction, DeleteProfileAction, SearchProfilesAction, UpdateProfileAction,
    UploadImageAction,
};
use tenant_profiles::subcommands::{Action, MigrateAction, SubcommandActions};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn setup_logging(log_level: log::LevelFilter) -> Result<(), CliError> {
    let mut log_spec_builder = LogSpecBuilder::new();
    log_spec_builder.default(log_level);
    log_spec_builder.module("diesel", log::LevelFilter::Warn);
    log_spec_builder.module("r2d2", log::LevelFilter::Warn);

    // stdout carries the JSON replies, so logs go to stderr
    Logger::with(log_spec_builder.build())
        .log_to_stderr()
        .format(log_format)
        .start()
        .map(|_| ())
        .map_err(|err| CliError::EnvironmentError(format!("Failed to start logger: {}", err)))
}

// log format for cli that will only show the log message
pub fn log_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(w, "{}", record.args(),)
}

fn profile_id_arg() -> Arg {
    Arg::new("profile_id")
        .value_name("PROFILE_ID")
        .required(true)
        .help("Id of the profile")
}

fn text_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).num_args(1).help(help)
}

fn build_app() -> Command {
    Command::new(APP_NAME)
        .version(VERSION)
        .about("Command line for tenant-scoped user profiles")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Log verbosely"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Only log errors"),
        )
        .arg(
            Arg::new("tenant")
                .long("tenant")
                .num_args(1)
                .global(true)
                .help("Tenant to act on; defaults to the configured default tenant"),
        )
        .subcommand(
            Command::new("database")
                .about("Database commands")
                .subcommand_required(true)
                .subcommand(
                    Command::new("migrate")
                        .about("Runs database migrations for tenant_profiles")
                        .arg(
                            Arg::new("connect")
                                .short('C')
                                .num_args(1)
                                .help("Database connection URI"),
                        ),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Creates a profile and prints its generated id")
                .arg(text_arg("full-name", "Full name").required(true))
                .arg(text_arg("email", "Email address, unique across tenants").required(true))
                .arg(text_arg("mobile", "Mobile number, unique across tenants").required(true))
                .arg(text_arg("gender", "Gender"))
                .arg(text_arg("birth-date", "Birth date, YYYY-MM-DD"))
                .arg(text_arg("city-id", "City id"))
                .arg(text_arg("country-id", "Country id"))
                .arg(text_arg("address", "Postal address"))
                .arg(
                    text_arg("latitude", "Latitude")
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true),
                )
                .arg(
                    text_arg("longitude", "Longitude")
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Deletes a profile")
                .arg(profile_id_arg()),
        )
        .subcommand(
            Command::new("update")
                .about("Changes the given fields of a profile; empty values are ignored")
                .arg(profile_id_arg())
                .arg(text_arg("full-name", "Full name"))
                .arg(text_arg("gender", "Gender"))
                .arg(text_arg("email", "Email address"))
                .arg(text_arg("mobile", "Mobile number"))
                .arg(text_arg("birth-date", "Birth date, YYYY-MM-DD"))
                .arg(text_arg("address", "Postal address")),
        )
        .subcommand(
            Command::new("search")
                .about("Lists the tenant's profiles matching a SQL predicate")
                .arg(text_arg("query", "Predicate, e.g. \"city_id = 'BLR'\""))
                .arg(text_arg("sort-by", "Sort expression, e.g. \"full_name DESC\""))
                .arg(
                    text_arg("limit", "Maximum number of profiles; 0 for no limit")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    text_arg("offset", "Number of profiles to skip")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    text_arg("format", "Output format")
                        .value_parser(["json", "table"])
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("upload-image")
                .about("Stores an image and attaches its URL to a profile")
                .arg(profile_id_arg())
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .required(true)
                        .help("Image file, at most 2MB"),
                ),
        )
}

fn log_level(matches: &ArgMatches) -> log::LevelFilter {
    if matches.get_flag("quiet") {
        return log::LevelFilter::Error;
    }
    match matches.get_count("verbose") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn run<I: IntoIterator<Item = T>, T: Into<OsString> + Clone>(args: I) -> Result<(), CliError> {
    let matches = build_app().try_get_matches_from(args)?;

    setup_logging(log_level(&matches))?;
    let config = env_config::read_config()
        .map_err(|err| CliError::EnvironmentError(format!("{}", err)))?;
    log::debug!("Starting... {config:#?}");
    let config = SharedConfig::new(config);

    let mut subcommands = SubcommandActions::new()
        .with_command(
            "database",
            SubcommandActions::new().with_command("migrate", MigrateAction::new(config.clone())),
        )
        .with_command("create", CreateProfileAction::new(config.clone()))
        .with_command("delete", DeleteProfileAction::new(config.clone()))
        .with_command("update", UpdateProfileAction::new(config.clone()))
        .with_command("search", SearchProfilesAction::new(config.clone()))
        .with_command("upload-image", UploadImageAction::new(config));

    subcommands.run(Some(&matches))
}

fn main() {
    match run(std::env::args_os()) {
        Ok(()) => {}
        Err(CliError::ClapError(err)) => err.exit(),
        Err(err) => {
            log::error!("{}", err);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_definition_is_valid() {
        build_app().debug_assert();
    }

    #[test]
    fn test_global_tenant_reaches_subcommand() {
        let matches = build_app()
            .try_get_matches_from(["tenant_profiles", "delete", "101", "--tenant", "acme"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "delete");
        assert_eq!(args.get_one::<String>("tenant").map(String::as_str), Some("acme"));
        assert_eq!(args.get_one::<String>("profile_id").map(String::as_str), Some("101"));
    }

    #[test]
    fn test_verbosity() {
        let matches = build_app()
            .try_get_matches_from(["tenant_profiles", "-vv", "search"])
            .unwrap();
        assert_eq!(log_level(&matches), log::LevelFilter::Debug);

        let matches = build_app()
            .try_get_matches_from(["tenant_profiles", "-q", "search"])
            .unwrap();
        assert_eq!(log_level(&matches), log::LevelFilter::Error);
    }

    #[test]
    fn test_create_requires_contact_details() {
        assert!(build_app()
            .try_get_matches_from(["tenant_profiles", "create", "--full-name", "Nimesh"])
            .is_err());
    }
}
