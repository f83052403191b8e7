//! Declarative schema descriptors
//!
//! A [`Schema`] describes the attributes a data source accepts as
//! configuration and the attributes it computes. The host uses it twice:
//!
//! - before a read, to validate the raw user configuration
//!   ([`Schema::validate_config`])
//! - when a read handler publishes output, to check the written value against
//!   the declared shape ([`Schema::check_value`])
//!
//! Schemas are plain immutable values built by factory functions, e.g.
//! [`crate::data_source::dns_records_schema`].

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Type of a schema attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// UTF-8 string
    String,
    /// Signed integer
    Int,
    /// Ordered list of nested objects described by the inner schema
    List(Box<Schema>),
}

impl ValueType {
    fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::List(_) => "list",
        }
    }
}

/// A single attribute declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute type
    pub value_type: ValueType,
    /// Must be present in configuration (or in every list element)
    pub required: bool,
    /// May be present in configuration
    pub optional: bool,
    /// Value is produced by the read handler
    pub computed: bool,
}

impl Attribute {
    /// A required attribute
    pub fn required(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: true,
            optional: false,
            computed: false,
        }
    }

    /// An optional attribute
    pub fn optional(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: false,
            optional: true,
            computed: false,
        }
    }

    /// A computed attribute (output only)
    pub fn computed(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: false,
            optional: false,
            computed: true,
        }
    }

    /// Whether the user is allowed to set this attribute
    pub fn is_configurable(&self) -> bool {
        self.required || self.optional
    }
}

/// Attribute map describing a data source (or a nested list element)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute (builder style)
    pub fn with(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Iterate over all attributes in name order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Validate a raw user configuration against this schema
    ///
    /// Every violation is collected and reported in a single
    /// [`Error::Config`]. A `null` value is treated the same as an absent key.
    pub fn validate_config(&self, raw: &Value) -> Result<()> {
        let object = raw
            .as_object()
            .ok_or_else(|| Error::config("configuration must be an object"))?;

        let mut violations = Vec::new();

        for (key, value) in object {
            let Some(attribute) = self.attribute(key) else {
                violations.push(format!("unsupported argument \"{}\"", key));
                continue;
            };

            if !attribute.is_configurable() {
                violations.push(format!("{}: cannot be set, value is computed", key));
                continue;
            }

            if value.is_null() {
                continue;
            }

            if let Err(e) = check_type(&attribute.value_type, value, key) {
                violations.push(e);
            }
        }

        for (name, attribute) in self.attributes() {
            if attribute.required && object.get(name).is_none_or(Value::is_null) {
                violations.push(format!("{}: required field is not set", name));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::config(violations.join("; ")))
        }
    }

    /// Check a value the read handler wants to store under `key`
    ///
    /// Returns a human-readable description of the first mismatch.
    pub fn check_value(&self, key: &str, value: &Value) -> std::result::Result<(), String> {
        let attribute = self
            .attribute(key)
            .ok_or_else(|| format!("invalid key \"{}\"", key))?;
        check_type(&attribute.value_type, value, key)
    }
}

fn check_type(value_type: &ValueType, value: &Value, path: &str) -> std::result::Result<(), String> {
    let matches = match value_type {
        ValueType::String => value.is_string(),
        ValueType::Int => value.is_i64() || value.is_u64(),
        ValueType::List(element) => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch(value_type, value, path))?;
            for (index, item) in items.iter().enumerate() {
                check_element(element, item, &format!("{}.{}", path, index))?;
            }
            true
        }
    };

    if matches {
        Ok(())
    } else {
        Err(mismatch(value_type, value, path))
    }
}

fn check_element(schema: &Schema, item: &Value, path: &str) -> std::result::Result<(), String> {
    let object = item
        .as_object()
        .ok_or_else(|| format!("{}: expected object, got {}", path, json_type(item)))?;

    for (key, value) in object {
        let attribute = schema
            .attribute(key)
            .ok_or_else(|| format!("{}: invalid key \"{}\"", path, key))?;
        if !value.is_null() {
            check_type(&attribute.value_type, value, &format!("{}.{}", path, key))?;
        }
    }

    for (name, attribute) in schema.attributes() {
        if attribute.required && object.get(name).is_none_or(Value::is_null) {
            return Err(format!("{}.{}: required field is not set", path, name));
        }
    }

    Ok(())
}

fn mismatch(expected: &ValueType, value: &Value, path: &str) -> String {
    format!("{}: expected {}, got {}", path, expected.name(), json_type(value))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
