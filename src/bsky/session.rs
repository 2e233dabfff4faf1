use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::request::RequestType;

/// Default AT Protocol service endpoint.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// An authenticated Bluesky session.
///
/// Holds the access token and repo DID returned by the session
/// endpoint, plus the HTTP client used for subsequent XRPC calls.
#[derive(Debug, Clone)]
pub struct BskySession {
    pub did: String,
    pub handle: String,
    pub(crate) access_jwt: String,
    pub(crate) service: Url,
    pub(crate) client: Client,
}

/// Wire shape of a successful createSession response.
#[derive(Deserialize)]
struct SessionData {
    did: String,
    handle: String,
    #[serde(rename = "accessJwt")]
    access_jwt: String,
}

/// Wire shape of an XRPC error response.
#[derive(Deserialize)]
pub(crate) struct XrpcError {
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl XrpcError {
    pub(crate) fn describe(&self, fallback: &str) -> String {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) => format!("{}: {}", error, message),
            (_, Some(message)) => message.clone(),
            (Some(error), _) => error.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Logs in to a Bluesky service with a handle and app password.
///
/// # Arguments
/// * `service` - Base URL of the service (e.g. `https://bsky.social`).
/// * `identifier` - Account handle or email.
/// * `password` - App password for the account.
///
/// # Returns
/// A `Result` wrapping an authenticated `BskySession`, or a `String`
/// error message on failure.
pub async fn create_session(
    service: &str,
    identifier: &str,
    password: &str,
) -> Result<BskySession, String> {
    let service = Url::parse(service).map_err(|e| e.to_string())?;

    let mut headers = HeaderMap::new();
    headers.insert("Accept", HeaderValue::from_static("application/json"));
    headers.insert("User-Agent", HeaderValue::from_static("dvsky/0.1.0"));

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .default_headers(headers)
        .build()
        .map_err(|e| e.to_string())?;

    let url = service
        .join("xrpc/com.atproto.server.createSession")
        .map_err(|e| e.to_string())?;

    let context = RequestType::JSON {
        body: serde_json::json!({
            "identifier": identifier,
            "password": password,
        })
        .to_string(),
    };

    let response = context
        .to_request(client.post(url))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        let status = response.status();
        let error = response
            .json::<XrpcError>()
            .await
            .unwrap_or(XrpcError {
                error: None,
                message: None,
            });
        return Err(error.describe(&format!("Login failed with status {}", status)));
    }

    let data = response
        .json::<SessionData>()
        .await
        .map_err(|e| e.to_string())?;

    Ok(BskySession {
        did: data.did,
        handle: data.handle,
        access_jwt: data.access_jwt,
        service,
        client,
    })
}
