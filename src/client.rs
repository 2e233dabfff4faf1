use std::collections::HashMap;

use atty::Stream;
use colored::Colorize;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::Client;
use reqwest::Url;
use serde::Deserialize;

use crate::request::RequestType;
use crate::response::Response;

#[derive(Debug, Clone)]
pub struct BaseClient {
    base_url: Url,
    client: Client,
}

// This is the base client that will be used to make requests to the
// Dataverse API. It acts as a wrapper around reqwest::Client and provides
// a GET method with the API token attached; the harvester never writes
// to the repository.
impl BaseClient {
    pub fn new(base_url: &str, api_token: Option<&String>) -> Result<Self, String> {
        let base_url = Url::parse(base_url).map_err(|e| e.to_string())?;
        let default_headers = Self::default_headers(api_token);

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(30))
            .default_headers(default_headers)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(BaseClient { base_url, client })
    }

    fn default_headers(api_token: Option<&String>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(api_token) = api_token {
            headers.insert(
                "X-Dataverse-key",
                api_token.parse().expect("Failed to parse API token"),
            );
        }

        // Add the default headers
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert("User-Agent", HeaderValue::from_static("dvsky/0.1.0"));

        headers
    }

    /// Get the base URL of the client
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get(
        &self,
        path: &str,
        parameters: Option<HashMap<String, String>>,
        context: RequestType,
    ) -> Result<reqwest::Response, reqwest::Error> {
        // Process the URL and build the request based on the context
        let url = self
            .base_url
            .join(path)
            .expect("Failed to join URL with path");

        // If the DEBUG environment variable is set, print the URL
        if std::env::var("DEBUG").is_ok() {
            print_call(url.to_string());
        }

        let request = context.to_request(self.client.request(reqwest::Method::GET, url));

        let request = match parameters {
            Some(parameters) => request.query(&parameters),
            None => request,
        };

        request.send().await
    }
}

// Helper function to evaluate a response
pub async fn evaluate_response<T>(
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<Response<T>, String>
where
    T: for<'de> Deserialize<'de>,
{
    // Check if the response is an error
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            return Err(err.to_string());
        }
    };

    // Try to read the response into the response struct
    let raw_content = response.text().await.map_err(|e| e.to_string())?;

    serde_json::from_str::<Response<T>>(&raw_content)
        .map_err(|err| format!("{} - {}", err, raw_content))
}

pub(crate) fn print_error(error: &str) {
    eprintln!("\n{} {}\n", "Error:".red().bold(), error);
}

fn print_call(url: String) {
    if atty::is(Stream::Stdout) {
        println!("{}: {}", "Calling".to_string().blue().bold(), url);
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use lazy_static::lazy_static;

    use super::*;

    lazy_static! {
        static ref MOCK_SERVER: MockServer = MockServer::start();
    }

    #[tokio::test]
    async fn test_get_request() {
        let client = BaseClient::new(&MOCK_SERVER.base_url(), None).unwrap();

        let _m = MOCK_SERVER.mock(|when, then| {
            when.method(GET).path("/test");
            then.status(200).body("test");
        });

        let response = client.get("test", None, RequestType::Plain).await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_api_token_header() {
        let token = "my-secret-token".to_string();
        let client = BaseClient::new(&MOCK_SERVER.base_url(), Some(&token)).unwrap();

        let mock = MOCK_SERVER.mock(|when, then| {
            when.method(GET)
                .path("/test_token")
                .header("X-Dataverse-key", "my-secret-token");
            then.status(200).body("test");
        });

        let response = client.get("test_token", None, RequestType::Plain).await;

        assert!(response.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn test_parameter_request() {
        let client = BaseClient::new(&MOCK_SERVER.base_url(), None).unwrap();

        let mock = MOCK_SERVER.mock(|when, then| {
            when.method(GET)
                .path("/test_parameters")
                .query_param("key1", "value1")
                .query_param("key2", "value2");
            then.status(200).body("test");
        });

        let parameters = Some(HashMap::from([
            ("key1".to_string(), "value1".to_string()),
            ("key2".to_string(), "value2".to_string()),
        ]));

        let response = client
            .get("test_parameters", parameters, RequestType::Plain)
            .await;

        assert!(response.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn test_evaluate_response_envelope() {
        let client = BaseClient::new(&MOCK_SERVER.base_url(), None).unwrap();

        let mock = MOCK_SERVER.mock(|when, then| {
            when.method(GET).path("/test_envelope");
            then.status(200)
                .json_body(serde_json::json!({"status": "OK", "data": {"key": "value"}}));
        });

        let response = client.get("test_envelope", None, RequestType::Plain).await;
        let response = evaluate_response::<serde_json::Value>(response)
            .await
            .expect("Failed to evaluate response");

        assert!(response.status.is_ok());
        assert_eq!(
            response.data.unwrap()["key"],
            serde_json::Value::String("value".to_string())
        );

        mock.assert();
    }

    #[tokio::test]
    async fn test_evaluate_response_malformed_body() {
        let client = BaseClient::new(&MOCK_SERVER.base_url(), None).unwrap();

        let mock = MOCK_SERVER.mock(|when, then| {
            when.method(GET).path("/test_malformed");
            then.status(200).body("<html>not json</html>");
        });

        let response = client.get("test_malformed", None, RequestType::Plain).await;
        let result = evaluate_response::<serde_json::Value>(response).await;

        assert!(result.is_err());
        mock.assert();
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let client = BaseClient::new("not a url", None);
        assert!(client.is_err());
    }
}
