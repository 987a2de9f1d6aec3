//! Kontent Client
//!
//! Main client for the management API, combining credentials, project
//! scoping and the HTTP layer.

use super::error::{KontentError, KontentResult};
use super::http::KontentHttpClient;
use std::fmt;
use url::Url;

/// Default management API endpoint
pub const DEFAULT_BASE_URL: &str = "https://manage.kontent.ai";

/// Management API key
///
/// Security: never rendered in `Debug`/`Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, for the Authorization header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Main management API client
#[derive(Clone)]
pub struct KontentClient {
    pub(crate) http: KontentHttpClient,
    pub(crate) api_key: ApiKey,
    pub project_id: String,
    base_url: Url,
}

impl fmt::Debug for KontentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KontentClient")
            .field("api_key", &self.api_key)
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl KontentClient {
    /// Create a client against the default endpoint
    pub fn new(api_key: ApiKey, project_id: &str) -> KontentResult<Self> {
        Self::with_base_url(api_key, project_id, DEFAULT_BASE_URL)
    }

    /// Create a client against an explicit endpoint
    pub fn with_base_url(api_key: ApiKey, project_id: &str, base_url: &str) -> KontentResult<Self> {
        if project_id.trim().is_empty() {
            return Err(KontentError::Config("project id is empty".to_string()));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| KontentError::Config(format!("invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(KontentError::Config(format!(
                "base URL {} cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            http: KontentHttpClient::new()?,
            api_key,
            project_id: project_id.to_string(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build a project-scoped management API URL
    pub fn management_url(&self, path: &str) -> String {
        format!(
            "{}/v2/projects/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(&self.project_id),
            path
        )
    }

    /// URL of the content type collection
    pub fn types_url(&self) -> String {
        self.management_url("types")
    }

    /// URL of a single content type
    pub fn type_url(&self, id: &str) -> String {
        self.management_url(&format!("types/{}", urlencoding::encode(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> KontentClient {
        KontentClient::with_base_url(ApiKey::new("secret-key"), "proj-1", base).unwrap()
    }

    #[test]
    fn test_default_urls() {
        let c = KontentClient::new(ApiKey::new("k"), "proj-1").unwrap();
        assert_eq!(
            c.types_url(),
            "https://manage.kontent.ai/v2/projects/proj-1/types"
        );
        assert_eq!(
            c.type_url("abc123"),
            "https://manage.kontent.ai/v2/projects/proj-1/types/abc123"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let c = client("http://127.0.0.1:8080/");
        assert_eq!(c.types_url(), "http://127.0.0.1:8080/v2/projects/proj-1/types");
    }

    #[test]
    fn test_id_is_percent_encoded() {
        let c = client("http://localhost");
        assert_eq!(
            c.type_url("a/b c"),
            "http://localhost/v2/projects/proj-1/types/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            KontentClient::with_base_url(ApiKey::new("k"), "proj", "not a url"),
            Err(KontentError::Config(_))
        ));
        assert!(matches!(
            KontentClient::with_base_url(ApiKey::new("k"), "  ", DEFAULT_BASE_URL),
            Err(KontentError::Config(_))
        ));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let c = client("http://localhost");
        let rendered = format!("{:?}", c);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("***"));
        assert_eq!(ApiKey::new("secret-key").to_string(), "***");
    }
}
