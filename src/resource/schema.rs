//! Schema descriptors
//!
//! Static descriptions of the provider configuration and of each managed
//! resource kind, as presented to the host.

use serde::Serialize;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    /// Ordered list of string-keyed, string-valued maps
    ListOfStringMap,
}

/// Validation hook applied to a declared string value
pub type Validator = fn(&str) -> Result<(), String>;

/// Description of one attribute
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    /// Changing the value forces the resource to be recreated
    #[serde(skip_serializing_if = "is_false")]
    pub force_new: bool,
    /// Value must never be logged or rendered
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    /// Environment variable supplying a default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<&'static str>,
    #[serde(skip)]
    pub validate: Option<Validator>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Attribute {
    fn new(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            attr_type,
            description,
            required: false,
            computed: false,
            force_new: false,
            sensitive: false,
            env: None,
            validate: None,
        }
    }

    pub fn required_string(name: &'static str, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(name, AttributeType::String, description)
        }
    }

    pub fn optional_string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::String, description)
    }

    pub fn computed_string(name: &'static str, description: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::new(name, AttributeType::String, description)
        }
    }

    pub fn required_map_list(name: &'static str, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(name, AttributeType::ListOfStringMap, description)
        }
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn from_env(mut self, var: &'static str) -> Self {
        self.env = Some(var);
        self
    }

    pub fn validated_by(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }
}

/// Schema of one managed resource kind
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub name: &'static str,
    pub attributes: Vec<Attribute>,
    pub importable: bool,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Names of attributes whose change forces recreation
    pub fn force_new_attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().filter(|a| a.force_new).map(|a| a.name)
    }
}
