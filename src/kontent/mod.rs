//! Kontent management API module
//!
//! This module provides typed access to the content type endpoints of the
//! Kontent management API.
//!
//! # Module Structure
//!
//! - [`client`] - Project-scoped client and API key handling
//! - [`http`] - HTTP utilities and response classification
//! - [`content_types`] - Content type model and CRUD operations
//! - [`error`] - Structured error kinds
//!
//! # Example
//!
//! ```ignore
//! use kontent_provider::kontent::{ApiKey, KontentClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = KontentClient::new(ApiKey::new("key"), "my-project")?;
//!     let types = client.list_content_types().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod content_types;
pub mod error;
pub mod http;

pub use client::{ApiKey, KontentClient, DEFAULT_BASE_URL};
pub use content_types::{ContentType, ContentTypes, Element, ElementValue};
pub use error::{KontentError, KontentResult};
