//! Content type resource
//!
//! Maps the declarative lifecycle of `kontent_content_type` onto the
//! management API client.

use super::data::ResourceData;
use super::schema::{Attribute, ResourceSchema};
use crate::kontent::{ContentType, Element, ElementValue, KontentClient, KontentError};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};

/// Host-facing name of the resource kind
pub const RESOURCE_TYPE: &str = "kontent_content_type";

const ATTR_CODENAME: &str = "codename";
const ATTR_NAME: &str = "name";
const ATTR_ELEMENTS: &str = "elements";

/// Reject codenames containing any whitespace
pub fn validate_codename(codename: &str) -> Result<(), String> {
    if codename.chars().any(char::is_whitespace) {
        return Err(format!(
            "codename cannot contain whitespace. Got {:?}",
            codename
        ));
    }
    Ok(())
}

/// Schema of `kontent_content_type`
pub fn schema() -> ResourceSchema {
    ResourceSchema {
        name: RESOURCE_TYPE,
        attributes: vec![
            Attribute::computed_string("id", "Server-assigned identifier of the content type"),
            Attribute::required_string(
                ATTR_CODENAME,
                "The codename of the content type, also acts as its unique ID",
            )
            .force_new()
            .validated_by(validate_codename),
            Attribute::required_string(ATTR_NAME, "The name of the content type"),
            Attribute::required_map_list(ATTR_ELEMENTS, "The list of elements for the content type"),
        ],
        importable: true,
    }
}

/// Convert one declared element into a flattened, string-valued element
fn flatten_element(index: usize, value: &Value) -> Result<Element> {
    let Some(fields) = value.as_object() else {
        bail!("elements[{}] must be a map, got {}", index, value);
    };

    fields
        .iter()
        .map(|(key, v)| {
            let scalar = match v {
                Value::String(s) => ElementValue::Text(s.clone()),
                Value::Bool(b) => ElementValue::Bool(*b),
                Value::Number(n) => ElementValue::Number(n.clone()),
                other => {
                    return Err(anyhow!(
                        "elements[{}].{} must be a string, number or boolean, got {}",
                        index,
                        key,
                        other
                    ))
                }
            };
            Ok((key.clone(), scalar))
        })
        .collect::<Result<Element>>()
        .map(|element| element.flatten())
}

/// Build the content type declared in `d`, validating it before any request
fn declared_content_type(d: &ResourceData) -> Result<ContentType> {
    let codename = d
        .get_str(ATTR_CODENAME)
        .ok_or_else(|| KontentError::Validation("codename is required".to_string()))?;
    validate_codename(codename).map_err(KontentError::Validation)?;

    let name = d
        .get_str(ATTR_NAME)
        .ok_or_else(|| KontentError::Validation("name is required".to_string()))?;

    let elements = d
        .get_list(ATTR_ELEMENTS)
        .ok_or_else(|| KontentError::Validation("elements is required".to_string()))?
        .iter()
        .enumerate()
        .map(|(i, v)| flatten_element(i, v))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| KontentError::Validation(e.to_string()))?;

    Ok(ContentType::new(name, codename, elements))
}

/// Write a fetched content type back into the store
fn record(d: &mut ResourceData, content_type: &ContentType) {
    d.set_id(content_type.id.clone());
    d.set(ATTR_NAME, Value::String(content_type.name.clone()));
    d.set(ATTR_CODENAME, Value::String(content_type.codename.clone()));
    d.set(
        ATTR_ELEMENTS,
        Value::Array(
            content_type
                .elements
                .iter()
                .map(|e| {
                    Value::Object(
                        e.to_string_map()
                            .into_iter()
                            .map(|(k, v)| (k, Value::String(v)))
                            .collect::<Map<_, _>>(),
                    )
                })
                .collect(),
        ),
    );
}

fn require_id(d: &ResourceData, op: &str) -> Result<String> {
    if d.id().is_empty() {
        bail!("cannot {} {}: resource has no identity", op, RESOURCE_TYPE);
    }
    Ok(d.id().to_string())
}

/// Lifecycle adapter for content types
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTypeResource;

impl ContentTypeResource {
    pub async fn create(&self, client: &KontentClient, d: &mut ResourceData) -> Result<()> {
        let content_type = declared_content_type(d)?;

        let id = client
            .create_content_type(&content_type)
            .await
            .with_context(|| format!("failed to create content type {}", content_type.codename))?;

        d.set_id(id);
        d.clear_changes();
        Ok(())
    }

    /// Refresh `d` from the remote side.
    ///
    /// A missing content type clears the identity instead of failing.
    pub async fn read(&self, client: &KontentClient, d: &mut ResourceData) -> Result<()> {
        let id = require_id(d, "read")?;

        match client.get_content_type(&id).await {
            Ok(content_type) => {
                record(d, &content_type);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("Content type {} no longer exists, clearing identity", id);
                d.clear_id();
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read content type {}", id)),
        }
    }

    /// Replace the remote content type with the declared one.
    ///
    /// A codename change is refused; the host must recreate the resource.
    pub async fn update(&self, client: &KontentClient, d: &mut ResourceData) -> Result<()> {
        let id = require_id(d, "update")?;

        if let Some(attr) = schema().force_new_attributes().find(|a| d.has_change(a)) {
            return Err(KontentError::Validation(format!(
                "{} cannot be changed in place; {} {} must be replaced",
                attr, RESOURCE_TYPE, id
            ))
            .into());
        }

        let mut content_type = declared_content_type(d)?;
        content_type.id = id.clone();

        match client.update_content_type(&mut content_type).await {
            Ok(()) => {
                d.set_id(content_type.id);
                d.clear_changes();
                Ok(())
            }
            Err(e @ KontentError::PartialUpdate { .. }) => {
                // Old object is gone; let the host plan a fresh create
                tracing::error!("{} {} lost during update: {}", RESOURCE_TYPE, id, e);
                d.clear_id();
                Err(e.into())
            }
            Err(e) => Err(e).with_context(|| format!("failed to update content type {}", id)),
        }
    }

    pub async fn delete(&self, client: &KontentClient, d: &mut ResourceData) -> Result<()> {
        let id = require_id(d, "delete")?;

        client
            .delete_content_type(&id)
            .await
            .with_context(|| format!("failed to delete content type {}", id))?;

        d.clear_id();
        Ok(())
    }

    /// Whether the content type behind `d` still exists.
    ///
    /// Only a 404 answers `false`; other failures are errors.
    pub async fn exists(&self, client: &KontentClient, d: &ResourceData) -> Result<bool> {
        if d.id().is_empty() {
            return Ok(false);
        }

        match client.get_content_type(d.id()).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("failed to check content type {}", d.id()))
            }
        }
    }

    /// Adopt an existing content type; the id is taken as-is
    pub fn import(&self, id: &str) -> ResourceData {
        let mut d = ResourceData::new();
        d.set_id(id);
        d
    }
}
