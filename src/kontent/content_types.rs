//! Content types
//!
//! Typed model and CRUD operations for the management API `types` endpoint.

use super::client::KontentClient;
use super::error::{KontentError, KontentResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Scalar value inside an element definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementValue {
    Text(String),
    Bool(bool),
    Number(serde_json::Number),
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Text(s) => f.write_str(s),
            ElementValue::Bool(b) => write!(f, "{}", b),
            ElementValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl ElementValue {
    /// Convert a raw JSON value as returned by the service.
    ///
    /// `null` has no counterpart and yields `None`; arrays and objects are
    /// kept as their compact JSON text.
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(ElementValue::Text(s)),
            Value::Bool(b) => Some(ElementValue::Bool(b)),
            Value::Number(n) => Some(ElementValue::Number(n)),
            nested => Some(ElementValue::Text(nested.to_string())),
        }
    }
}

impl From<&str> for ElementValue {
    fn from(value: &str) -> Self {
        ElementValue::Text(value.to_string())
    }
}

impl From<String> for ElementValue {
    fn from(value: String) -> Self {
        ElementValue::Text(value)
    }
}

impl From<bool> for ElementValue {
    fn from(value: bool) -> Self {
        ElementValue::Bool(value)
    }
}

impl From<i64> for ElementValue {
    fn from(value: i64) -> Self {
        ElementValue::Number(value.into())
    }
}

/// A single field definition within a content type.
///
/// The schema varies per element kind (text, asset, ...) and is not
/// validated client-side. The `type` key, when present, names the kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Element(BTreeMap<String, ElementValue>);

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| ElementValue::from_json(v).map(|v| (k, v)))
            .collect())
    }
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ElementValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ElementValue> {
        self.0.get(key)
    }

    /// Declared element kind (the `type` key)
    pub fn element_type(&self) -> Option<&str> {
        match self.0.get("type") {
            Some(ElementValue::Text(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Copy of this element with every value coerced to its string form
    pub fn flatten(&self) -> Element {
        Element(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), ElementValue::Text(v.to_string())))
                .collect(),
        )
    }

    /// String-valued view of this element
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ElementValue)> for Element {
    fn from_iter<I: IntoIterator<Item = (String, ElementValue)>>(iter: I) -> Self {
        Element(iter.into_iter().collect())
    }
}

/// A content type as exchanged with the management API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    /// Server-assigned identifier, empty before the first create
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub codename: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl ContentType {
    pub fn new(name: &str, codename: &str, elements: Vec<Element>) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            codename: codename.to_string(),
            elements,
        }
    }
}

/// Body of a create response; only the assigned id is relied upon
#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

/// Pagination block of a list response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// Wrapper object returned by `GET types`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentTypes {
    #[serde(default)]
    pub types: Vec<ContentType>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl ContentTypes {
    fn next_token(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.continuation_token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

impl KontentClient {
    /// List all content types in the project, following continuation tokens
    pub async fn list_content_types(&self) -> KontentResult<Vec<ContentType>> {
        let url = self.types_url();
        let mut all_types = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let body = self
                .http
                .get(&url, &self.api_key, continuation.as_deref())
                .await?;
            let page: ContentTypes = serde_json::from_str(&body)?;
            let next = page.next_token().map(str::to_string);
            all_types.extend(page.types);

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        tracing::debug!("Listed {} content types", all_types.len());
        Ok(all_types)
    }

    /// Create a content type and return its server-assigned id
    pub async fn create_content_type(&self, content_type: &ContentType) -> KontentResult<String> {
        let payload = serde_json::to_value(content_type)?;
        let body = self
            .http
            .post(&self.types_url(), &self.api_key, &payload)
            .await?;
        let created: Created = serde_json::from_str(&body)?;

        tracing::info!(
            "Created content type {} with id {}",
            content_type.codename,
            created.id
        );
        Ok(created.id)
    }

    /// Fetch a single content type by id
    pub async fn get_content_type(&self, id: &str) -> KontentResult<ContentType> {
        let body = self
            .http
            .get(&self.type_url(id), &self.api_key, None)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Replace a content type by deleting it and creating it again.
    ///
    /// On success `content_type.id` holds the newly assigned id. A failed
    /// delete is returned as-is and nothing has changed remotely. If the
    /// recreate fails after the delete went through, the error is
    /// [`KontentError::PartialUpdate`] and `content_type.id` is left
    /// pointing at the deleted object.
    pub async fn update_content_type(&self, content_type: &mut ContentType) -> KontentResult<()> {
        let old_id = content_type.id.clone();

        tracing::debug!("Update {}: deleting", old_id);
        self.delete_content_type(&old_id).await?;

        tracing::debug!("Update {}: recreating", old_id);
        match self.create_content_type(content_type).await {
            Ok(new_id) => {
                tracing::info!("Replaced content type {} with {}", old_id, new_id);
                content_type.id = new_id;
                Ok(())
            }
            Err(source) => {
                tracing::error!("Content type {} deleted but recreate failed", old_id);
                let mut attempted = content_type.clone();
                attempted.id.clear();
                Err(KontentError::PartialUpdate {
                    old_id,
                    attempted: Box::new(attempted),
                    source: Box::new(source),
                })
            }
        }
    }

    /// Delete a content type by id
    pub async fn delete_content_type(&self, id: &str) -> KontentResult<()> {
        self.http.delete(&self.type_url(id), &self.api_key).await?;
        tracing::info!("Deleted content type {}", id);
        Ok(())
    }
}
