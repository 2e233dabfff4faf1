//! Post command: announce a random harvested dataset on Bluesky
//!
//! Loads the saved dataset list, picks one eligible record at random,
//! formats the announcement and submits it through an authenticated
//! Bluesky session.

use std::env;
use std::path::PathBuf;

use colored::Colorize;
use structopt::StructOpt;
use tokio::runtime::Runtime;

use crate::bsky::post::send_post;
use crate::bsky::session::{create_session, DEFAULT_SERVICE};
use crate::compose::{choose_record, compose_post};
use crate::record::load_records;

use super::base::{exit_with_error, Matcher};

/// Process-wide configuration for the post command, collected once from
/// the environment at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct PostConfig {
    /// Bluesky account handle
    pub handle: String,
    /// Bluesky app password
    pub password: String,
    /// AT Protocol service endpoint
    pub service: String,
    /// Dataset record file to read
    pub input: PathBuf,
}

impl PostConfig {
    /// Builds the configuration from the environment.
    ///
    /// `BSKY_HANDLE` and `BSKY_PASSWORD` are required; `BSKY_SERVICE`
    /// defaults to the public service and `DATASETS_FILE` to
    /// `datasets.json`. A CLI-provided input path overrides the latter.
    pub fn from_env(input_override: Option<PathBuf>) -> Result<Self, String> {
        let handle = env::var("BSKY_HANDLE")
            .map_err(|_| "BSKY_HANDLE and BSKY_PASSWORD must be set".to_string())?;
        let password = env::var("BSKY_PASSWORD")
            .map_err(|_| "BSKY_HANDLE and BSKY_PASSWORD must be set".to_string())?;

        let service = env::var("BSKY_SERVICE").unwrap_or_else(|_| DEFAULT_SERVICE.to_string());
        let input = input_override.unwrap_or_else(|| {
            PathBuf::from(env::var("DATASETS_FILE").unwrap_or_else(|_| "datasets.json".to_string()))
        });

        Ok(PostConfig {
            handle,
            password,
            service,
            input,
        })
    }
}

/// Post a random harvested dataset to Bluesky
#[derive(StructOpt, Debug)]
#[structopt(about = "Post a random harvested dataset to Bluesky")]
pub struct PostSubCommand {
    /// Dataset file to read, overriding the DATASETS_FILE environment variable
    #[structopt(
        long,
        short = "i",
        parse(from_os_str),
        help = "Dataset file to read (defaults to $DATASETS_FILE or datasets.json)"
    )]
    input: Option<PathBuf>,

    /// Select and preview without logging in or posting
    #[structopt(long, help = "Print the selected dataset and preview without posting")]
    dry_run: bool,
}

impl Matcher for PostSubCommand {
    fn process(self) {
        let config = match PostConfig::from_env(self.input) {
            Ok(config) => config,
            Err(err) => exit_with_error(&err, exitcode::USAGE),
        };

        let records = match load_records(&config.input) {
            Ok(records) => records,
            Err(err) => exit_with_error(
                &format!("Failed to read {}: {}", config.input.display(), err),
                exitcode::NOINPUT,
            ),
        };

        let Some(record) = choose_record(&records, &mut rand::thread_rng()) else {
            // Nothing postable is a clean end of the run, not a failure
            println!("No valid datasets found.");
            return;
        };

        let composition = compose_post(record);

        println!("Selected dataset: {}", record.title.bold());
        println!("Preview:\n{}", composition.text);

        if self.dry_run {
            return;
        }

        let runtime = Runtime::new().expect("Failed to create runtime");

        let result = runtime.block_on(async {
            let session = create_session(&config.service, &config.handle, &config.password).await?;
            send_post(&session, &composition.text, composition.facets).await
        });

        // One network write per invocation, no retry
        match result {
            Ok(_) => println!("{}", "✅ Posted to Bluesky!".green()),
            Err(err) => exit_with_error(&err, exitcode::UNAVAILABLE),
        }
    }
}
