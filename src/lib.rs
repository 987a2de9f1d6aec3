//! Declarative provider for Kontent content types.
//!
//! - [`kontent`] - management API client
//! - [`resource`] - declarative lifecycle adapters and the provider descriptor
//! - [`config`] - provider settings resolution

pub mod config;
pub mod kontent;
pub mod resource;

pub use config::{Config, ProviderConfig};
pub use kontent::{KontentClient, KontentError};
pub use resource::{provider, Operation, Outcome, Provider, ResourceData};
