use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::bsky::session::{BskySession, XrpcError};
use crate::request::RequestType;

/// Record collection posts are created in.
const POST_COLLECTION: &str = "app.bsky.feed.post";

/// A byte range into the UTF-8 encoding of the post text, half-open.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ByteSlice {
    #[serde(rename = "byteStart")]
    pub byte_start: usize,
    #[serde(rename = "byteEnd")]
    pub byte_end: usize,
}

/// Feature attached to a facet. Only links are produced here; the
/// lexicon tags each feature with its `$type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },
}

/// A rich-text annotation over a byte range of the post text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<FacetFeature>,
}

impl Facet {
    /// Builds a link facet over `[start, end)` pointing at `uri`.
    pub fn link(start: usize, end: usize, uri: String) -> Self {
        Facet {
            index: ByteSlice {
                byte_start: start,
                byte_end: end,
            },
            features: vec![FacetFeature::Link { uri }],
        }
    }
}

/// Wire shape of the post record inside createRecord.
#[derive(Serialize)]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    record_type: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
    #[serde(rename = "createdAt")]
    created_at: String,
}

/// Wire shape of a successful createRecord response.
#[derive(Deserialize, Debug, Clone)]
pub struct CreateRecordResponse {
    pub uri: String,
    pub cid: String,
}

/// Publishes a post through an authenticated session.
///
/// One network write; there is no retry. A failure is returned to the
/// caller as an error message and the record is not resubmitted.
///
/// # Arguments
/// * `session` - The authenticated session to post through.
/// * `text` - The post body.
/// * `facets` - Zero or more link annotations over the body.
///
/// # Returns
/// A `Result` wrapping the created record's URI and CID, or a `String`
/// error message on failure.
pub async fn send_post(
    session: &BskySession,
    text: &str,
    facets: Vec<Facet>,
) -> Result<CreateRecordResponse, String> {
    let url = session
        .service
        .join("xrpc/com.atproto.repo.createRecord")
        .map_err(|e| e.to_string())?;

    let context = RequestType::JSON {
        body: serde_json::json!({
            "repo": session.did,
            "collection": POST_COLLECTION,
            "record": PostRecord {
                record_type: POST_COLLECTION,
                text,
                facets,
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        })
        .to_string(),
    };

    let response = context
        .to_request(session.client.post(url).bearer_auth(&session.access_jwt))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        let status = response.status();
        let error = response.json::<XrpcError>().await.unwrap_or(XrpcError {
            error: None,
            message: None,
        });
        return Err(error.describe(&format!("Post failed with status {}", status)));
    }

    response
        .json::<CreateRecordResponse>()
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::bsky::session::create_session;

    use super::*;

    /// The facet serialization must match the lexicon field names exactly.
    #[test]
    fn test_facet_serialization() {
        let facet = Facet::link(16, 30, "https://doi.org/10.7910/DVN/A".to_string());

        let value = serde_json::to_value(&facet).expect("Failed to serialize facet");

        assert_eq!(
            value,
            json!({
                "index": {"byteStart": 16, "byteEnd": 30},
                "features": [{
                    "$type": "app.bsky.richtext.facet#link",
                    "uri": "https://doi.org/10.7910/DVN/A"
                }]
            })
        );
    }

    #[test]
    fn test_post_record_omits_empty_facets() {
        let record = PostRecord {
            record_type: POST_COLLECTION,
            text: "no links here",
            facets: Vec::new(),
            created_at: "2026-08-29T12:00:00.000Z".to_string(),
        };

        let value = serde_json::to_value(&record).expect("Failed to serialize record");

        assert!(value.get("facets").is_none());
        assert_eq!(value["$type"], POST_COLLECTION);
        assert_eq!(value["createdAt"], "2026-08-29T12:00:00.000Z");
    }

    #[tokio::test]
    async fn test_send_post() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(POST)
                .path("/xrpc/com.atproto.server.createSession");
            then.status(200).json_body(json!({
                "did": "did:plc:abc123",
                "handle": "alice.bsky.social",
                "accessJwt": "jwt-token"
            }));
        });

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/xrpc/com.atproto.repo.createRecord")
                .header("Authorization", "Bearer jwt-token")
                .header("Content-Type", "application/json")
                .json_body_partial(
                    json!({
                        "repo": "did:plc:abc123",
                        "collection": "app.bsky.feed.post",
                        "record": {
                            "$type": "app.bsky.feed.post",
                            "text": "📊 Census 2020\n\ndataverse link"
                        }
                    })
                    .to_string(),
                );
            then.status(200).json_body(json!({
                "uri": "at://did:plc:abc123/app.bsky.feed.post/3k44",
                "cid": "bafyrei"
            }));
        });

        let session = create_session(&server.base_url(), "alice.bsky.social", "pw")
            .await
            .expect("Login failed");

        let text = "📊 Census 2020\n\ndataverse link";
        let start = text.find("dataverse link").unwrap();
        let facets = vec![Facet::link(
            start,
            start + "dataverse link".len(),
            "https://doi.org/10.7910/DVN/A".to_string(),
        )];
        let response = send_post(&session, text, facets)
            .await
            .expect("Post failed");

        assert!(response.uri.starts_with("at://did:plc:abc123"));
        mock.assert();
    }

    #[tokio::test]
    async fn test_send_post_failure_is_reported() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(POST)
                .path("/xrpc/com.atproto.server.createSession");
            then.status(200).json_body(json!({
                "did": "did:plc:abc123",
                "handle": "alice.bsky.social",
                "accessJwt": "jwt-token"
            }));
        });

        server.mock(|when, then| {
            when.method(POST).path("/xrpc/com.atproto.repo.createRecord");
            then.status(400).json_body(json!({
                "error": "InvalidRequest",
                "message": "Record must have the property \"text\""
            }));
        });

        let session = create_session(&server.base_url(), "alice.bsky.social", "pw")
            .await
            .expect("Login failed");

        let result = send_post(&session, "", Vec::new()).await;

        assert!(result.unwrap_err().starts_with("InvalidRequest"));
    }
}
