use serde::{Deserialize, Serialize};

use crate::{
    client::{evaluate_response, BaseClient},
    request::RequestType,
    response::Response,
};

/// The authenticated user as returned by the `:me` endpoint.
///
/// Only the fields needed to resolve the user's default collection
/// alias are modeled; the endpoint returns more.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthenticatedUser {
    #[serde(rename = "persistentUserId", default)]
    pub persistent_user_id: Option<String>,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
}

impl AuthenticatedUser {
    /// The collection alias of the user: the persistent user id when
    /// present, falling back to the user name.
    pub fn alias(&self) -> Option<&str> {
        self.persistent_user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.user_name.as_deref().filter(|name| !name.is_empty()))
    }
}

/// Retrieves the authenticated user behind the API token.
///
/// # Arguments
/// * `client` - A reference to the `BaseClient` used to send the request.
///
/// # Returns
/// A `Result` wrapping a `Response<AuthenticatedUser>` if the request
/// is successful, or a `String` error message on failure.
pub async fn get_current_user(client: &BaseClient) -> Result<Response<AuthenticatedUser>, String> {
    // Endpoint metadata
    let url = "api/users/:me";

    // Send request
    let response = client.get(url, None, RequestType::Plain).await;

    evaluate_response::<AuthenticatedUser>(response).await
}

/// Resolves the collection alias of the caller, for runs that target the
/// user's own default collection. Failure here means the token cannot be
/// mapped to an identity and the caller decides whether that is fatal.
pub async fn resolve_own_alias(client: &BaseClient) -> Result<String, String> {
    let response = get_current_user(client).await?;

    if response.status.is_err() {
        return Err(response.error_message());
    }

    response
        .data
        .as_ref()
        .and_then(|user| user.alias())
        .map(|alias| alias.to_string())
        .ok_or_else(|| "Unable to determine Dataverse alias from API token".to_string())
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use lazy_static::lazy_static;

    use super::*;

    lazy_static! {
        static ref MOCK_SERVER: MockServer = MockServer::start();
    }

    #[test]
    fn test_alias_prefers_persistent_user_id() {
        let user = AuthenticatedUser {
            persistent_user_id: Some("soodoku".to_string()),
            user_name: Some("gaurav".to_string()),
        };

        assert_eq!(user.alias(), Some("soodoku"));
    }

    #[test]
    fn test_alias_falls_back_to_user_name() {
        let user = AuthenticatedUser {
            persistent_user_id: None,
            user_name: Some("gaurav".to_string()),
        };

        assert_eq!(user.alias(), Some("gaurav"));

        let empty_pid = AuthenticatedUser {
            persistent_user_id: Some(String::new()),
            user_name: Some("gaurav".to_string()),
        };

        assert_eq!(empty_pid.alias(), Some("gaurav"));
    }

    #[test]
    fn test_alias_none_when_absent() {
        let user = AuthenticatedUser {
            persistent_user_id: None,
            user_name: None,
        };

        assert_eq!(user.alias(), None);
    }

    #[tokio::test]
    async fn test_resolve_own_alias() {
        let client = BaseClient::new(&MOCK_SERVER.base_url(), None).unwrap();

        let mock = MOCK_SERVER.mock(|when, then| {
            when.method(GET).path("/api/users/:me");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "data": {"persistentUserId": "soodoku", "userName": "gaurav"}
            }));
        });

        let alias = resolve_own_alias(&client)
            .await
            .expect("Failed to resolve alias");

        assert_eq!(alias, "soodoku");
        mock.assert();
    }

    #[tokio::test]
    async fn test_resolve_own_alias_error_envelope() {
        let server = MockServer::start_async().await;
        let client = BaseClient::new(&server.base_url(), None).unwrap();

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/users/:me");
                then.status(401).json_body(serde_json::json!({
                    "status": "ERROR",
                    "message": "Bad API key"
                }));
            })
            .await;

        let result = resolve_own_alias(&client).await;

        assert_eq!(result.unwrap_err(), "Bad API key");
    }
}
