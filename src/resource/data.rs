//! Resource Data
//!
//! Per-resource attribute store shared between the host and the adapters:
//! an opaque identity plus named attribute values.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Attribute store for one managed resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    attributes: Map<String, Value>,
    changed: BTreeSet<String>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding declared configuration, with every attribute
    /// marked as changed (nothing exists remotely yet)
    pub fn from_config(config: Map<String, Value>) -> Self {
        let changed = config.keys().cloned().collect();
        Self {
            id: String::new(),
            attributes: config,
            changed,
        }
    }

    /// Build a store from previously recorded state
    pub fn from_state(id: &str, attributes: Map<String, Value>) -> Self {
        Self {
            id: id.to_string(),
            attributes,
            changed: BTreeSet::new(),
        }
    }

    /// Resource identity, empty when the resource does not exist
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    pub fn get_list(&self, key: &str) -> Option<&Vec<Value>> {
        self.attributes.get(key).and_then(|v| v.as_array())
    }

    /// Record a value read back from the remote side
    pub fn set(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    /// Apply a declared value, marking the attribute changed if it differs
    pub fn plan(&mut self, key: &str, value: Value) {
        if self.attributes.get(key) != Some(&value) {
            self.changed.insert(key.to_string());
        }
        self.attributes.insert(key.to_string(), value);
    }

    /// Apply every declared attribute in `config`
    pub fn plan_all(&mut self, config: Map<String, Value>) {
        for (key, value) in config {
            self.plan(&key, value);
        }
    }

    pub fn has_change(&self, key: &str) -> bool {
        self.changed.contains(key)
    }

    /// Forget planned changes once they are applied
    pub fn clear_changes(&mut self) {
        self.changed.clear();
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Render as a state object (`id` plus attributes)
    pub fn to_state(&self) -> Value {
        let mut state = self.attributes.clone();
        state.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(state)
    }
}
