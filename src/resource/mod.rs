//! Resource layer
//!
//! Implements the declarative resource lifecycle on top of the management
//! API client.
//!
//! # Architecture
//!
//! - [`data`] - Per-resource attribute store handed over by the host
//! - [`schema`] - Attribute and resource schema descriptors
//! - [`content_type`] - Lifecycle adapter for `kontent_content_type`
//! - [`provider`] - Provider descriptor and operation dispatch
//!
//! # Example
//!
//! ```ignore
//! use kontent_provider::resource::{provider, Operation, ResourceData};
//!
//! async fn refresh(client: &KontentClient, id: &str) -> anyhow::Result<ResourceData> {
//!     let mut d = ResourceData::new();
//!     d.set_id(id);
//!     provider()
//!         .dispatch("kontent_content_type", Operation::Read, client, &mut d)
//!         .await?;
//!     Ok(d)
//! }
//! ```

pub mod content_type;
pub mod data;
pub mod provider;
pub mod schema;

pub use content_type::{validate_codename, ContentTypeResource, RESOURCE_TYPE};
pub use data::ResourceData;
pub use provider::{provider, Operation, Outcome, Provider};
pub use schema::{Attribute, AttributeType, ResourceSchema};
