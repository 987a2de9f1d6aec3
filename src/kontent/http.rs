//! HTTP utilities for management API calls

use super::client::ApiKey;
use super::error::{KontentError, KontentResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Request header carrying the list continuation token
pub const CONTINUATION_HEADER: &str = "x-continuation";

const USER_AGENT: &str = concat!("kontent-provider/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Statuses the management API uses for success
fn is_accepted(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
    )
}

/// HTTP client wrapper for management API calls
#[derive(Clone)]
pub struct KontentHttpClient {
    client: Client,
}

impl KontentHttpClient {
    /// Create a new HTTP client
    pub fn new() -> KontentResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| KontentError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Make a GET request, optionally resuming a listing
    pub async fn get(
        &self,
        url: &str,
        api_key: &ApiKey,
        continuation: Option<&str>,
    ) -> KontentResult<String> {
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url).bearer_auth(api_key.expose());
        if let Some(token) = continuation {
            request = request.header(CONTINUATION_HEADER, token);
        }

        self.execute("GET", url, request).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, api_key: &ApiKey, body: &Value) -> KontentResult<String> {
        tracing::debug!("POST {}", url);

        // `json` sets Content-Type: application/json
        let request = self
            .client
            .post(url)
            .bearer_auth(api_key.expose())
            .json(body);

        self.execute("POST", url, request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, api_key: &ApiKey) -> KontentResult<String> {
        tracing::debug!("DELETE {}", url);

        let request = self.client.delete(url).bearer_auth(api_key.expose());

        self.execute("DELETE", url, request).await
    }

    /// Send a request and classify the response
    async fn execute(
        &self,
        method: &str,
        url: &str,
        request: RequestBuilder,
    ) -> KontentResult<String> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("{} {} could not be sent: {}", method, url, e);
            KontentError::Transport(e)
        })?;

        let status = response.status();

        if !is_accepted(status) {
            // Best effort: the status alone is reported when the body is unreadable
            let body = match response.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    tracing::warn!("Failed to read error body for {} {}: {}", method, url, e);
                    None
                }
            };
            // Security: Only log sanitized/truncated error body
            tracing::error!(
                "API error: {} {} -> {} - {}",
                method,
                url,
                status,
                sanitize_for_log(body.as_deref().unwrap_or(""))
            );
            return Err(KontentError::from_status(status, body));
        }

        let body = response.text().await?;
        tracing::trace!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(body)
    }
}
