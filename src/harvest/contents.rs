use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    client::{evaluate_response, BaseClient},
    request::RequestType,
    response::Response,
};

/// Entry type marking a dataset in a collection listing.
pub const DATASET_TYPE: &str = "dataset";

/// One immediate child of a collection, as returned by the contents
/// endpoint. Children are either datasets or nested collections; the
/// `type` field tells them apart.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CollectionItem {
    #[serde(rename = "type")]
    pub item_type: String,

    #[serde(rename = "persistentUrl", default)]
    pub persistent_url: Option<String>,

    /// Remaining listing fields, carried through into the output record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionItem {
    /// Returns true for entries whose type marks them as datasets.
    pub fn is_dataset(&self) -> bool {
        self.item_type == DATASET_TYPE
    }
}

/// Lists the immediate contents of a collection.
///
/// # Arguments
/// * `client` - A reference to the `BaseClient` used to send the request.
/// * `alias` - Alias of the collection to list.
///
/// # Returns
/// A `Result` wrapping a `Response<Vec<CollectionItem>>` if the request
/// is successful, or a `String` error message on failure.
pub async fn get_collection_contents(
    client: &BaseClient,
    alias: &str,
) -> Result<Response<Vec<CollectionItem>>, String> {
    // Endpoint metadata
    let url = format!("api/dataverses/{}/contents", alias);

    // Send request
    let response = client.get(url.as_str(), None, RequestType::Plain).await;

    evaluate_response::<Vec<CollectionItem>>(response).await
}
