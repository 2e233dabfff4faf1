//! Harvest command: enumerate datasets and write the record file
//!
//! Lists the datasets of the caller's own collection, or of a set of
//! explicitly named collections, enriches each with citation metadata
//! and writes the result as JSON to stdout or a file.

use std::fs;
use std::path::PathBuf;

use structopt::StructOpt;
use tokio::runtime::Runtime;

use crate::client::BaseClient;
use crate::harvest::run::{harvest, HarvestOptions, HarvestReport};
use crate::record::HarvestOutput;
use crate::response::print_json;

use super::base::{exit_with_error, Matcher};

/// Harvest datasets owned by a user or a set of named collections
#[derive(StructOpt, Debug)]
#[structopt(about = "Harvest datasets from a Dataverse instance")]
pub struct HarvestSubCommand {
    /// Base URL of the Dataverse instance
    #[structopt(
        long,
        short = "b",
        help = "Dataverse base URL (e.g. https://dataverse.harvard.edu)"
    )]
    base_url: String,

    /// API token used for authentication
    #[structopt(long, short = "t", help = "API token for authentication")]
    token: String,

    /// Explicit collection aliases; empty means the caller's own collection
    #[structopt(
        long = "dataverse",
        short = "d",
        help = "Collection alias to harvest (repeatable)"
    )]
    dataverses: Vec<String>,

    /// Also harvest the caller's own collection alongside the explicit ones
    #[structopt(long, help = "Include the caller's own collection")]
    include_own: bool,

    /// Where to write the dataset list; stdout when omitted
    #[structopt(
        long,
        short = "o",
        parse(from_os_str),
        help = "Output file to save the dataset list as JSON"
    )]
    output: Option<PathBuf>,

    /// Per-collection progress on stderr
    #[structopt(long, short = "v", help = "Print progress to stderr")]
    verbose: bool,
}

impl Matcher for HarvestSubCommand {
    fn process(self) {
        let runtime = Runtime::new().expect("Failed to create runtime");

        let client = match BaseClient::new(&self.base_url, Some(&self.token)) {
            Ok(client) => client,
            Err(err) => exit_with_error(&err, exitcode::USAGE),
        };

        let options = HarvestOptions {
            dataverses: self.dataverses,
            include_own: self.include_own,
            verbose: self.verbose,
        };

        let report = match runtime.block_on(harvest(&client, &options)) {
            Ok(report) => report,
            // Unrecoverable request failure
            Err(err) => exit_with_error(&err, 1),
        };

        eprintln!("Found {} datasets.", report.datasets.len());

        let json = serialize_report(&self.base_url, report);

        match self.output {
            Some(path) => {
                if let Err(err) = fs::write(&path, json) {
                    exit_with_error(
                        &format!("Failed to write {}: {}", path.display(), err),
                        exitcode::IOERR,
                    );
                }
                eprintln!("Saved to {}", path.display());
            }
            None => print_json(&json),
        }
    }
}

/// Serializes the harvest result into its output shape: a bare record
/// array in single-collection mode, the wrapped object otherwise.
fn serialize_report(base_url: &str, report: HarvestReport) -> String {
    let json = if report.multi {
        let output = HarvestOutput {
            base_url: base_url.to_string(),
            dataverses: report.dataverses,
            count: report.datasets.len(),
            datasets: report.datasets,
        };
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string_pretty(&report.datasets)
    };

    json.expect("Failed to serialize harvest output")
}
