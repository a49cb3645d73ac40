//! Remote schema shapes as returned by the plugin
//!
//! Column types (closed set):
//! - bool, int, double, string
//! - json, datetime, timestamp
//! - ipaddr, cidr, inet
//! - ltree (hierarchical path)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type of a remote column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Int,
    Double,
    String,
    Json,
    Datetime,
    Timestamp,
    #[serde(rename = "ipaddr")]
    IpAddr,
    Cidr,
    Inet,
    Ltree,
}

impl ColumnType {
    /// Returns the type name used in errors and plan tokens
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::Double => "double",
            ColumnType::String => "string",
            ColumnType::Json => "json",
            ColumnType::Datetime => "datetime",
            ColumnType::Timestamp => "timestamp",
            ColumnType::IpAddr => "ipaddr",
            ColumnType::Cidr => "cidr",
            ColumnType::Inet => "inet",
            ColumnType::Ltree => "ltree",
        }
    }

    /// True for datetime and timestamp
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Datetime | ColumnType::Timestamp)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A single remote column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            description: None,
        }
    }
}

/// How strongly the remote source needs a key column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRequirement {
    /// Listing fails without a predicate on this column
    Required,
    /// Predicate narrows the remote call when present
    Optional,
    /// Advertised but carries no requirement
    #[serde(rename = "none")]
    Unconstrained,
}

impl Default for KeyRequirement {
    fn default() -> Self {
        KeyRequirement::Optional
    }
}

fn default_key_operators() -> Vec<String> {
    vec!["=".to_string()]
}

/// A column the remote source accepts as a filter parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyColumn {
    pub name: String,
    #[serde(default)]
    pub require: KeyRequirement,
    /// Operator symbols the remote source accepts (defaults to "=")
    #[serde(default = "default_key_operators")]
    pub operators: Vec<String>,
}

impl KeyColumn {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            require: KeyRequirement::Required,
            operators: default_key_operators(),
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            require: KeyRequirement::Optional,
            operators: default_key_operators(),
        }
    }

    /// Replaces the supported operators
    pub fn with_operators(mut self, operators: &[&str]) -> Self {
        self.operators = operators.iter().map(|op| op.to_string()).collect();
        self
    }
}

/// Description of one remote table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub key_columns: Vec<KeyColumn>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        Self {
            description: None,
            columns,
            key_columns: Vec::new(),
        }
    }

    pub fn with_key_column(mut self, key: KeyColumn) -> Self {
        self.key_columns.push(key);
        self
    }

    /// Column at a declared position
    pub fn column(&self, index: usize) -> Option<&ColumnDefinition> {
        self.columns.get(index)
    }

    /// Column by name
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Whether the plugin's table set can change after connection configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    #[default]
    Static,
    Dynamic,
}

/// All tables exposed by one plugin connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Schema {
    #[serde(default)]
    pub mode: SchemaMode,
    #[serde(default)]
    pub tables: BTreeMap<String, TableSchema>,
}

impl Schema {
    pub fn new(mode: SchemaMode) -> Self {
        Self {
            mode,
            tables: BTreeMap::new(),
        }
    }

    pub fn with_table(mut self, name: impl Into<String>, table: TableSchema) -> Self {
        self.tables.insert(name.into(), table);
        self
    }
}
