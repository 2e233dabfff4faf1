use colored::Colorize;

use crate::client::{print_error, BaseClient};
use crate::harvest::contents::get_collection_contents;
use crate::harvest::detail::{
    citation_fields, extract_description, extract_title, get_dataset_detail,
};
use crate::harvest::user::resolve_own_alias;
use crate::identifier::persistent_id_from_url;
use crate::record::DatasetRecord;

/// Options for a harvest run, built once from the CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct HarvestOptions {
    /// Explicit collection aliases to harvest. Empty means
    /// single-collection mode over the caller's own collection.
    pub dataverses: Vec<String>,

    /// Also harvest the caller's own collection (multi-collection mode)
    pub include_own: bool,

    /// Print per-collection progress to stderr
    pub verbose: bool,
}

impl HarvestOptions {
    /// Multi-collection mode is entered whenever explicit aliases are given.
    pub fn is_multi(&self) -> bool {
        !self.dataverses.is_empty()
    }
}

/// The outcome of a harvest run.
#[derive(Debug)]
pub struct HarvestReport {
    /// The collection aliases that were targeted
    pub dataverses: Vec<String>,
    /// All harvested records, in collection order
    pub datasets: Vec<DatasetRecord>,
    /// Whether the run was in multi-collection mode
    pub multi: bool,
}

/// Harvests dataset records from the configured collections.
///
/// In single-collection mode the caller's own alias is resolved via the
/// `:me` endpoint and any failure is fatal. In multi-collection mode a
/// failing collection is reported and skipped, and the remaining
/// collections are still harvested; a failing own-alias resolution under
/// `include_own` is treated the same way.
pub async fn harvest(
    client: &BaseClient,
    options: &HarvestOptions,
) -> Result<HarvestReport, String> {
    let multi = options.is_multi();

    let mut aliases = options.dataverses.clone();
    if !multi {
        aliases.push(resolve_own_alias(client).await?);
    } else if options.include_own {
        match resolve_own_alias(client).await {
            Ok(alias) => aliases.push(alias),
            Err(err) => print_error(&format!("Skipping own collection: {}", err)),
        }
    }

    let mut datasets = Vec::new();

    for alias in &aliases {
        match harvest_collection(client, alias, multi, options.verbose).await {
            Ok(mut records) => datasets.append(&mut records),
            Err(err) if multi => {
                print_error(&format!("Skipping collection '{}': {}", alias, err));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(HarvestReport {
        dataverses: aliases,
        datasets,
        multi,
    })
}

/// Harvests all datasets of a single collection.
///
/// Per-dataset detail failures are reported and skipped; a failing
/// contents listing is returned to the caller, whose mode decides
/// whether that aborts the run.
async fn harvest_collection(
    client: &BaseClient,
    alias: &str,
    multi: bool,
    verbose: bool,
) -> Result<Vec<DatasetRecord>, String> {
    if verbose {
        eprintln!("{} collection '{}'", "Harvesting".bold(), alias);
    }

    let response = get_collection_contents(client, alias).await?;
    if response.status.is_err() {
        return Err(response.error_message());
    }

    let items = response.data.unwrap_or_default();
    let mut records = Vec::new();

    for item in items.into_iter().filter(|item| item.is_dataset()) {
        let persistent_url = item.persistent_url.clone().unwrap_or_default();

        let Some(pid) = persistent_id_from_url(&persistent_url) else {
            continue;
        };

        if verbose {
            eprintln!("  Fetching {}", pid);
        }

        let detail = match get_dataset_detail(client, &pid).await {
            Ok(response) if response.status.is_ok() => response.data.unwrap_or_default(),
            Ok(response) => {
                print_error(&format!("Skipping {}: {}", pid, response.error_message()));
                continue;
            }
            Err(err) => {
                print_error(&format!("Skipping {}: {}", pid, err));
                continue;
            }
        };

        let (title, description) = match citation_fields(&detail) {
            Some(fields) => (extract_title(fields), extract_description(fields)),
            None => (String::new(), String::new()),
        };

        // `type` was consumed into the typed listing entry; put it back so
        // the record round-trips the full listing payload.
        let mut extra = item.extra;
        extra.insert(
            "type".to_string(),
            serde_json::Value::String(item.item_type),
        );

        records.push(DatasetRecord {
            persistent_id: pid.to_string(),
            persistent_url,
            title,
            description,
            source_collection: multi.then(|| alias.to_string()),
            extra,
        });
    }

    if verbose {
        eprintln!("  {} dataset(s) harvested from '{}'", records.len(), alias);
    }

    Ok(records)
}
