use std::collections::HashMap;

use serde_json::Value;

use crate::{
    client::{evaluate_response, BaseClient},
    identifier::Identifier,
    request::RequestType,
    response::Response,
};

/// Retrieves the detail record of a dataset.
///
/// The detail record is kept as a loosely-typed `serde_json::Value`
/// since only a handful of nested citation fields are read from it;
/// the accessors below walk the tree with per-field defaults.
///
/// # Arguments
/// * `client` - A reference to the `BaseClient` used to send the request.
/// * `id` - Identifier of the dataset, either persistent or numeric.
///
/// # Returns
/// A `Result` wrapping a `Response<Value>` if the request is successful,
/// or a `String` error message on failure.
pub async fn get_dataset_detail(
    client: &BaseClient,
    id: &Identifier,
) -> Result<Response<Value>, String> {
    // Endpoint metadata
    let url = match id {
        Identifier::PersistentId(_) => "api/datasets/:persistentId/".to_string(),
        Identifier::Id(id) => format!("api/datasets/{}/", id),
    };

    // Send request
    let parameters = id_query_params(id);
    let response = client.get(url.as_str(), parameters, RequestType::Plain).await;

    evaluate_response::<Value>(response).await
}

/// Constructs query parameters based on the provided identifier.
///
/// Persistent identifiers are passed as the `persistentId` query
/// parameter; numeric identifiers are part of the path and need none.
pub(crate) fn id_query_params(id: &Identifier) -> Option<HashMap<String, String>> {
    match id {
        Identifier::PersistentId(id) => {
            Some(HashMap::from([("persistentId".to_string(), id.clone())]))
        }
        Identifier::Id(_) => None,
    }
}

/// The citation metadata fields of a detail record, at
/// `latestVersion.metadataBlocks.citation.fields`.
pub fn citation_fields(detail: &Value) -> Option<&Vec<Value>> {
    detail
        .get("latestVersion")?
        .get("metadataBlocks")?
        .get("citation")?
        .get("fields")?
        .as_array()
}

/// Extracts the dataset title from the citation fields.
///
/// Returns an empty string when no `title` field is present.
pub fn extract_title(fields: &[Value]) -> String {
    fields
        .iter()
        .find(|field| field.get("typeName").and_then(Value::as_str) == Some("title"))
        .and_then(|field| field.get("value"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extracts the first non-empty description from the citation fields.
///
/// The `dsDescription` field holds a list of compound values, each with
/// a nested `dsDescriptionValue.value`. Returns an empty string when no
/// entry carries one.
pub fn extract_description(fields: &[Value]) -> String {
    let entries = fields
        .iter()
        .find(|field| field.get("typeName").and_then(Value::as_str) == Some("dsDescription"))
        .and_then(|field| field.get("value"))
        .and_then(Value::as_array);

    let Some(entries) = entries else {
        return String::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            entry
                .get("dsDescriptionValue")?
                .get("value")?
                .as_str()
                .filter(|value| !value.is_empty())
        })
        .next()
        .unwrap_or_default()
        .to_string()
}
