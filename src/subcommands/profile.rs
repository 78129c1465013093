//! Actions for the profile subcommands. Each one opens the configured store, performs one
//! operation through a [`ProfileService`] and prints the JSON reply on stdout.

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use clap::ArgMatches;
use serde::Serialize;

#[cfg(feature = "sqlite")]
use build_database::build_database::get_default_database;

use crate::database::{create_connection_pool, create_store_factory, ConnectionUri};
use crate::env_config::{Config, SharedConfig};
use crate::gateway::{BlobStore, FileBlobStore, MAX_UPLOAD_SIZE};
use crate::modules::profile::request::{
    generate_profile_id, resolve_tenant, CreateProfileRequest, CreateProfileResponse,
    SearchProfileRequest, StatusResponse, UpdateProfileRequest,
};
use crate::modules::profile::{Profile, ProfileKey, ProfilePatch, ProfileService};

use super::error::CliError;
use super::{format_table, msg_from_io_error, Action};

fn open_service(config: &Config) -> Result<ProfileService, CliError> {
    let url = match &config.database.url {
        Some(url) => url.expose_secret().to_owned(),
        #[cfg(feature = "sqlite")]
        None => get_default_database()?,
        #[cfg(not(feature = "sqlite"))]
        None => "memory".to_string(),
    };
    let connection_uri = url.parse::<ConnectionUri>().map_err(|err| {
        CliError::EnvironmentError(format!("Invalid database URL provided: {}", err))
    })?;
    let connection_pool =
        create_connection_pool(&connection_uri, &config.database).map_err(|err| {
            CliError::EnvironmentError(format!("Failed to initialize connection pool: {}", err))
        })?;
    let store_factory = create_store_factory(&connection_pool).map_err(|err| {
        CliError::EnvironmentError(format!("Failed to initialize store factory: {}", err))
    })?;

    Ok(ProfileService::with_log_events(
        store_factory.get_profile_store(),
    ))
}

fn tenant(args: &ArgMatches, config: &Config) -> String {
    resolve_tenant(
        args.get_one::<String>("tenant").map(String::as_str),
        &config.default_tenant,
    )
}

fn text(args: &ArgMatches, name: &str) -> String {
    args.get_one::<String>(name).cloned().unwrap_or_default()
}

fn birth_date(args: &ArgMatches) -> Result<Option<NaiveDateTime>, CliError> {
    args.get_one::<String>("birth-date")
        .map(|value| parse_birth_date(value))
        .transpose()
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
fn parse_birth_date(value: &str) -> Result<NaiveDateTime, CliError> {
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(date_time);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CliError::ActionError(format!("Invalid birth date: {}", value)))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string(value)
        .map_err(|err| CliError::ActionError(format!("Unable to serialize response: {}", err)))?;
    println!("{}", json);
    Ok(())
}

fn profiles_table(profiles: &[Profile]) -> Vec<Vec<String>> {
    let mut table = vec![vec![
        "PROFILE_ID".to_string(),
        "FULL_NAME".to_string(),
        "EMAIL".to_string(),
        "MOBILE".to_string(),
        "ACTIVE".to_string(),
    ]];
    table.extend(profiles.iter().map(|profile| {
        vec![
            profile.profile_id().to_string(),
            profile.full_name().to_string(),
            profile.email().to_string(),
            profile.mobile().to_string(),
            profile.active().to_string(),
        ]
    }));
    table
}

pub struct CreateProfileAction {
    config: SharedConfig,
}

impl CreateProfileAction {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl Action for CreateProfileAction {
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError> {
        let args = arg_matches.ok_or(CliError::RequiresArgs)?;
        let tenant_id = tenant(args, &self.config);

        let request = CreateProfileRequest {
            full_name: text(args, "full-name"),
            gender: text(args, "gender"),
            email: text(args, "email"),
            mobile: text(args, "mobile"),
            birth_date: birth_date(args)?,
            city_id: text(args, "city-id"),
            country_id: text(args, "country-id"),
            address: text(args, "address"),
            latitude: args.get_one::<f64>("latitude").copied(),
            longitude: args.get_one::<f64>("longitude").copied(),
        };
        let profile = request
            .into_profile(&tenant_id, generate_profile_id())
            .map_err(|err| {
                CliError::ActionError(format!("invalid create profile request: {}", err))
            })?;

        let profile_id = open_service(&self.config)?.create(profile).map_err(|err| {
            CliError::ActionError(format!("error processing create profile request: {}", err))
        })?;

        print_json(&CreateProfileResponse {
            tenant_id,
            profile_id,
        })
    }
}

pub struct DeleteProfileAction {
    config: SharedConfig,
}

impl DeleteProfileAction {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl Action for DeleteProfileAction {
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError> {
        let args = arg_matches.ok_or(CliError::RequiresArgs)?;
        let tenant_id = tenant(args, &self.config);
        let profile_id = text(args, "profile_id");

        let deleted = open_service(&self.config)?
            .delete(&profile_id, &tenant_id)
            .map_err(|err| {
                CliError::ActionError(format!("error processing delete profile request: {}", err))
            })?;

        print_json(&StatusResponse::from(deleted))
    }
}

pub struct UpdateProfileAction {
    config: SharedConfig,
}

impl UpdateProfileAction {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl Action for UpdateProfileAction {
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError> {
        let args = arg_matches.ok_or(CliError::RequiresArgs)?;
        let filter = ProfileKey::new(&tenant(args, &self.config), &text(args, "profile_id"));

        let patch = UpdateProfileRequest {
            full_name: text(args, "full-name"),
            gender: text(args, "gender"),
            email: text(args, "email"),
            mobile: text(args, "mobile"),
            birth_date: birth_date(args)?,
            address: text(args, "address"),
        }
        .into_patch();

        let updated = open_service(&self.config)?
            .update(&filter, patch)
            .map_err(|err| {
                CliError::ActionError(format!("error processing update profile request: {}", err))
            })?;

        print_json(&StatusResponse::from(updated))
    }
}

pub struct SearchProfilesAction {
    config: SharedConfig,
}

impl SearchProfilesAction {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl Action for SearchProfilesAction {
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError> {
        let args = arg_matches.ok_or(CliError::RequiresArgs)?;
        let tenant_id = tenant(args, &self.config);

        let request = SearchProfileRequest {
            query: text(args, "query"),
            sort_by: text(args, "sort-by"),
            limit: args.get_one::<u32>("limit").copied().unwrap_or_default(),
            offset: args.get_one::<u32>("offset").copied().unwrap_or_default(),
        };

        let profiles = open_service(&self.config)?
            .search(
                &request.query,
                request.limit,
                request.offset,
                &request.sort_by,
                &tenant_id,
            )
            .map_err(|err| {
                CliError::ActionError(format!("error processing search profile request: {}", err))
            })?;

        match args.get_one::<String>("format").map(String::as_str) {
            Some("table") => {
                print!("{}", format_table(&profiles_table(&profiles)));
                Ok(())
            }
            _ => print_json(&profiles),
        }
    }
}

/// Stores an image in the blob store and attaches its URL to the profile.
pub struct UploadImageAction {
    config: SharedConfig,
}

impl UploadImageAction {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl Action for UploadImageAction {
    fn run<'a>(&mut self, arg_matches: Option<&ArgMatches>) -> Result<(), CliError> {
        let args = arg_matches.ok_or(CliError::RequiresArgs)?;
        let filter = ProfileKey::new(&tenant(args, &self.config), &text(args, "profile_id"));
        let file = args
            .get_one::<String>("file")
            .ok_or(CliError::RequiresArgs)?;

        let size = fs::metadata(file)
            .map_err(|err| {
                CliError::ActionError(format!(
                    "Error fetching uploaded file {}: {}",
                    file,
                    msg_from_io_error(err)
                ))
            })?
            .len();
        if size > MAX_UPLOAD_SIZE as u64 {
            return Err(CliError::ActionError(format!(
                "Image too large, max file size allowed is {} bytes",
                MAX_UPLOAD_SIZE
            )));
        }
        let image = fs::read(file).map_err(|err| {
            CliError::ActionError(format!(
                "Error fetching uploaded file {}: {}",
                file,
                msg_from_io_error(err)
            ))
        })?;

        let blob_store = FileBlobStore::new(
            &self.config.blob_store.root,
            self.config.blob_store.public_url_prefix.clone(),
        );
        let url = blob_store
            .put(file, &image)
            .map_err(|err| CliError::ActionError(format!("Unable to upload file: {}", err)))?;

        let updated = open_service(&self.config)?
            .update(&filter, ProfilePatch::profile_image_url(url.clone()))
            .map_err(|err| {
                CliError::ActionError(format!(
                    "Unable to update profile with image url: {}",
                    err
                ))
            })?;
        if !updated {
            log::warn!(
                "No profile {} in tenant {}; the image at {} is not attached",
                filter.profile_id,
                filter.tenant_id,
                url
            );
        }

        print_json(&StatusResponse {
            status: format!("File upload successful. File uploaded at {}", url),
        })
    }
}
