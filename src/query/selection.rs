//! Selection sets
//!
//! A query is written as a YAML (or JSON) mapping from field name to either
//! a leaf marker (`~`, `null`, `true`) or a nested mapping. A list of names is
//! shorthand for a mapping of leaves. Keys may carry an alias as
//! `"alias: field"`.
//!
//! ```yaml
//! tweets:
//!   id: ~
//!   favoriteCount: ~
//!   author: [handle, name]
//! "me: currentUser": [id]
//! ```

use crate::{FeedGraphError, Result};
use serde_yaml::Value;

/// One selected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    /// Nested selection; `None` for scalar leaves
    pub selection: Option<SelectionSet>,
}

impl Field {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            selection: None,
        }
    }

    pub fn object(name: impl Into<String>, selection: SelectionSet) -> Self {
        Self {
            alias: None,
            name: name.into(),
            selection: Some(selection),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Key this field occupies in the response object
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered list of selected fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    fields: Vec<Field>,
}

impl SelectionSet {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a YAML or JSON query document
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Mapping(mapping) => {
                let mut fields = Vec::with_capacity(mapping.len());
                for (key, child) in mapping {
                    let key = key.as_str().ok_or_else(|| {
                        FeedGraphError::Parse(format!("Field names must be strings, got {:?}", key))
                    })?;
                    let (alias, name) = split_key(key)?;
                    let selection = match child {
                        Value::Null | Value::Bool(true) => None,
                        Value::Mapping(_) | Value::Sequence(_) => Some(Self::from_value(child)?),
                        other => {
                            return Err(FeedGraphError::Parse(format!(
                                "Unexpected value for field '{}': {:?}",
                                name, other
                            )))
                        }
                    };
                    fields.push(Field {
                        alias,
                        name,
                        selection,
                    });
                }
                Ok(Self::new(fields))
            }
            Value::Sequence(items) => {
                let mut fields = Vec::with_capacity(items.len());
                for item in items {
                    let key = item.as_str().ok_or_else(|| {
                        FeedGraphError::Parse(format!(
                            "List shorthand only accepts field names, got {:?}",
                            item
                        ))
                    })?;
                    let (alias, name) = split_key(key)?;
                    fields.push(Field {
                        alias,
                        name,
                        selection: None,
                    });
                }
                Ok(Self::new(fields))
            }
            other => Err(FeedGraphError::Parse(format!(
                "A selection must be a mapping or a list, got {:?}",
                other
            ))),
        }
    }
}

/// Split `"alias: field"` into its parts
fn split_key(key: &str) -> Result<(Option<String>, String)> {
    let (alias, name) = match key.split_once(':') {
        Some((alias, name)) => (Some(alias.trim()), name.trim()),
        None => (None, key.trim()),
    };

    for part in alias.iter().chain(std::iter::once(&name)) {
        if !is_identifier(part) {
            return Err(FeedGraphError::Parse(format!(
                "'{}' is not a valid field name or alias",
                part
            )));
        }
    }

    Ok((alias.map(str::to_string), name.to_string()))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
