//! Provider descriptor
//!
//! Composes the provider configuration schema, the managed resource kinds
//! and their operation table into one immutable value.

use super::content_type::{self, ContentTypeResource};
use super::data::ResourceData;
use super::schema::{Attribute, ResourceSchema};
use crate::config::{ProviderConfig, API_KEY_ENV, BASE_URL_ENV, PROJECT_ID_ENV};
use crate::kontent::KontentClient;
use anyhow::{anyhow, Result};
use serde::Serialize;

/// Lifecycle operation requested by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Exists,
    /// Adopt an existing remote object by id
    Import(String),
}

/// Result of a dispatched operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Exists(bool),
}

/// Resource kinds served by this provider
#[derive(Debug, Clone, Copy)]
enum ResourceKind {
    ContentType(ContentTypeResource),
}

/// Immutable provider descriptor
#[derive(Debug, Clone, Serialize)]
pub struct Provider {
    pub config: Vec<Attribute>,
    pub resources: Vec<ResourceSchema>,
}

/// Build the provider descriptor
pub fn provider() -> Provider {
    Provider {
        config: vec![
            Attribute::optional_string("api_key", "Management API key")
                .sensitive()
                .from_env(API_KEY_ENV),
            Attribute::optional_string("project_id", "Project (environment) identifier")
                .from_env(PROJECT_ID_ENV),
            Attribute::optional_string("base_url", "Management API endpoint")
                .from_env(BASE_URL_ENV),
        ],
        resources: vec![content_type::schema()],
    }
}

impl Provider {
    /// Look up a resource schema by host-facing name
    pub fn resource(&self, name: &str) -> Option<&ResourceSchema> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Build a client from resolved configuration
    pub fn configure(&self, config: &ProviderConfig) -> Result<KontentClient> {
        config.client()
    }

    fn kind(&self, resource_type: &str) -> Result<ResourceKind> {
        match resource_type {
            content_type::RESOURCE_TYPE => Ok(ResourceKind::ContentType(ContentTypeResource)),
            _ => Err(anyhow!("Unknown resource type: {}", resource_type)),
        }
    }

    /// Run a lifecycle operation against a resource
    pub async fn dispatch(
        &self,
        resource_type: &str,
        operation: Operation,
        client: &KontentClient,
        d: &mut ResourceData,
    ) -> Result<Outcome> {
        tracing::info!(
            "dispatch: resource={}, operation={:?}, id={}",
            resource_type,
            operation,
            d.id()
        );

        match self.kind(resource_type)? {
            ResourceKind::ContentType(resource) => match operation {
                Operation::Create => resource.create(client, d).await.map(|_| Outcome::Done),
                Operation::Read => resource.read(client, d).await.map(|_| Outcome::Done),
                Operation::Update => resource.update(client, d).await.map(|_| Outcome::Done),
                Operation::Delete => resource.delete(client, d).await.map(|_| Outcome::Done),
                Operation::Exists => resource.exists(client, d).await.map(Outcome::Exists),
                Operation::Import(id) => {
                    *d = resource.import(&id);
                    Ok(Outcome::Done)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kontent::ApiKey;

    #[test]
    fn test_descriptor_contents() {
        let p = provider();
        assert!(p.resource("kontent_content_type").is_some());
        assert!(p.resource("kontent_asset").is_none());

        let api_key = p.config.iter().find(|a| a.name == "api_key").unwrap();
        assert!(api_key.sensitive);
        assert_eq!(api_key.env, Some("KONTENT_API_KEY"));

        let project = p.config.iter().find(|a| a.name == "project_id").unwrap();
        assert_eq!(project.env, Some("KONTENT_PROJECT_ID"));
    }

    #[test]
    fn test_descriptor_serializes_without_validators() {
        let value = serde_json::to_value(provider()).unwrap();
        assert_eq!(value["resources"][0]["name"], "kontent_content_type");
        assert_eq!(value["resources"][0]["importable"], true);
        assert_eq!(value["config"][0]["sensitive"], true);
    }

    #[test]
    fn test_dispatch_import_and_unknown_type() {
        let p = provider();
        let client =
            KontentClient::with_base_url(ApiKey::new("k"), "proj", "http://127.0.0.1:9").unwrap();
        let mut d = ResourceData::new();

        let outcome = tokio_test::block_on(p.dispatch(
            content_type::RESOURCE_TYPE,
            Operation::Import("abc123".to_string()),
            &client,
            &mut d,
        ))
        .unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(d.id(), "abc123");

        let err = tokio_test::block_on(p.dispatch("kontent_asset", Operation::Read, &client, &mut d))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown resource type"));
    }
}
