use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One harvested dataset, enriched with citation metadata.
///
/// Records are created by the harvester, persisted to a JSON file and
/// read back by the composer; they are never mutated after creation.
/// Any other fields the content listing carried (database id, type,
/// publication date, ...) are kept as an opaque passthrough so the
/// output file stays as informative as the API listing.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DatasetRecord {
    /// Stable identifier in the native scheme (e.g. `doi:10.7910/DVN/ABC`)
    #[serde(rename = "persistentId", default)]
    pub persistent_id: String,

    /// Resolvable URL form of the identifier
    #[serde(rename = "persistentUrl", default)]
    pub persistent_url: String,

    /// Title extracted from the citation metadata block
    #[serde(default)]
    pub title: String,

    /// First non-empty description value, may contain markup
    #[serde(default)]
    pub description: String,

    /// Collection the record came from, set in multi-collection mode only
    #[serde(
        rename = "sourceCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_collection: Option<String>,

    /// Remaining fields of the content listing entry
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DatasetRecord {
    /// A record is eligible for posting only if both the title and the
    /// persistent URL are non-empty.
    pub fn is_postable(&self) -> bool {
        !self.title.is_empty() && !self.persistent_url.is_empty()
    }
}

/// The harvest output file in multi-collection mode.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HarvestOutput {
    pub base_url: String,
    pub dataverses: Vec<String>,
    pub count: usize,
    pub datasets: Vec<DatasetRecord>,
}

/// Both on-disk shapes the composer accepts: a bare array of records
/// (single-collection harvest) or a wrapped `{datasets: [...]}` object
/// (multi-collection harvest).
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Wrapped { datasets: Vec<DatasetRecord> },
    Plain(Vec<DatasetRecord>),
}

impl From<RecordFile> for Vec<DatasetRecord> {
    fn from(file: RecordFile) -> Self {
        match file {
            RecordFile::Wrapped { datasets } => datasets,
            RecordFile::Plain(datasets) => datasets,
        }
    }
}

/// Loads dataset records from a harvest output file.
///
/// The file is parsed as JSON first and as YAML as a fallback, in
/// either of the two output shapes.
///
/// # Arguments
/// * `path` - Path to the records file
///
/// # Returns
/// * `Ok(Vec<DatasetRecord>)` - The records contained in the file
/// * `Err` - File reading or parsing error
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<DatasetRecord>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;

    if let Ok(file) = serde_json::from_str::<RecordFile>(&content) {
        Ok(file.into())
    } else if let Ok(file) = serde_yaml::from_str::<RecordFile>(&content) {
        Ok(file.into())
    } else {
        Err("Failed to parse the dataset file as either JSON or YAML".into())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_load_records_bare_array() {
        let file = write_temp(
            r#"[
                {"persistentId": "doi:10.7910/DVN/A", "persistentUrl": "https://doi.org/10.7910/DVN/A", "title": "A", "description": ""},
                {"persistentId": "doi:10.7910/DVN/B", "persistentUrl": "https://doi.org/10.7910/DVN/B", "title": "B", "description": "desc"}
            ]"#,
        );

        let records = load_records(file.path()).expect("Failed to load records");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "A");
        assert!(records[0].source_collection.is_none());
    }

    #[test]
    fn test_load_records_wrapped_object() {
        let file = write_temp(
            r#"{
                "base_url": "https://demo.dataverse.org",
                "dataverses": ["soodoku"],
                "count": 1,
                "datasets": [
                    {"persistentId": "doi:10.7910/DVN/A", "persistentUrl": "https://doi.org/10.7910/DVN/A", "title": "A", "description": "", "sourceCollection": "soodoku"}
                ]
            }"#,
        );

        let records = load_records(file.path()).expect("Failed to load records");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_collection.as_deref(), Some("soodoku"));
    }

    #[test]
    fn test_load_records_missing_fields_default_empty() {
        let file = write_temp(r#"[{"id": 42, "type": "dataset"}]"#);

        let records = load_records(file.path()).expect("Failed to load records");

        assert_eq!(records[0].persistent_url, "");
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].extra["id"], 42);
        assert!(!records[0].is_postable());
    }

    #[test]
    fn test_load_records_invalid_file() {
        let file = write_temp("{not json: [nor yaml");
        assert!(load_records(file.path()).is_err());
    }

    #[test]
    fn test_is_postable_requires_title_and_url() {
        let record = DatasetRecord {
            title: "Census 2020".to_string(),
            persistent_url: "https://doi.org/10.7910/DVN/A".to_string(),
            ..Default::default()
        };
        assert!(record.is_postable());

        let no_url = DatasetRecord {
            title: "Census 2020".to_string(),
            ..Default::default()
        };
        assert!(!no_url.is_postable());

        let no_title = DatasetRecord {
            persistent_url: "https://doi.org/10.7910/DVN/A".to_string(),
            ..Default::default()
        };
        assert!(!no_title.is_postable());
    }

    #[test]
    fn test_source_collection_absent_on_the_wire_when_unset() {
        let record = DatasetRecord {
            title: "A".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&record).expect("Failed to serialize record");
        assert!(!json.contains("sourceCollection"));
    }
}
