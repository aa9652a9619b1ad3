//! Access tokens for Vertex AI.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::RelayError;

/// Token endpoint of the GCE/Cloud Run metadata server for the default service account.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Clone)]
pub enum Credentials {
    /// A pre-minted OAuth access token (e.g. `gcloud auth print-access-token`).
    Static(String),
    /// Ask the metadata server for a fresh token on every call.
    MetadataServer { token_url: String },
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl Credentials {
    #[must_use]
    pub fn from_optional_token(token: Option<String>) -> Self {
        match token {
            Some(t) => Credentials::Static(t),
            None => Credentials::MetadataServer {
                token_url: METADATA_TOKEN_URL.to_string(),
            },
        }
    }

    /// # Errors
    ///
    /// Returns an error if the metadata server cannot be reached or answers
    /// without a token.
    pub async fn access_token(&self, http: &Client) -> Result<String, RelayError> {
        match self {
            Credentials::Static(token) => Ok(token.clone()),
            Credentials::MetadataServer { token_url } => {
                let resp = http
                    .get(token_url)
                    .header("Metadata-Flavor", "Google")
                    .timeout(Duration::from_secs(5))
                    .send()
                    .await
                    .map_err(|e| {
                        RelayError::GeminiError(format!("metadata token request failed: {e}"))
                    })?;

                if !resp.status().is_success() {
                    return Err(RelayError::GeminiError(format!(
                        "metadata token HTTP {}",
                        resp.status()
                    )));
                }

                let token: MetadataToken = resp.json().await.map_err(|e| {
                    RelayError::GeminiError(format!("metadata token parse error: {e}"))
                })?;
                Ok(token.access_token)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_static_token_is_returned_as_is() {
        let creds = Credentials::from_optional_token(Some("ya29.static".into()));
        let token = creds.access_token(&Client::new()).await.unwrap();
        assert_eq!(token, "ya29.static");
    }

    #[tokio::test]
    async fn test_metadata_server_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/token"))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.metadata",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let creds = Credentials::MetadataServer {
            token_url: format!("{}/token", server.uri()),
        };
        let token = creds.access_token(&Client::new()).await.unwrap();
        assert_eq!(token, "ya29.metadata");
    }

    #[test]
    fn test_missing_token_defaults_to_metadata_server() {
        match Credentials::from_optional_token(None) {
            Credentials::MetadataServer { token_url } => assert_eq!(token_url, METADATA_TOKEN_URL),
            Credentials::Static(_) => panic!("expected metadata server credentials"),
        }
    }
}
