//! Remote schema → local table declaration
//!
//! Local declared types:
//! - bool, int → INTEGER
//! - double → FLOAT
//! - everything else → TEXT
//!
//! The semantic type survives in `TranslatedTable::semantic_types` so that
//! predicate values can be mapped by declared type later.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnType, KeyRequirement, TableSchema};

/// Column type as declared to the SQL engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalType {
    Integer,
    Float,
    Text,
}

impl LocalType {
    pub fn for_column(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Bool | ColumnType::Int => LocalType::Integer,
            ColumnType::Double => LocalType::Float,
            _ => LocalType::Text,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            LocalType::Integer => "INTEGER",
            LocalType::Float => "FLOAT",
            LocalType::Text => "TEXT",
        }
    }
}

impl fmt::Display for LocalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalColumn {
    pub name: String,
    pub local_type: LocalType,
}

/// Ordered local column list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalColumns(Vec<LocalColumn>);

impl LocalColumns {
    pub fn iter(&self) -> impl Iterator<Item = &LocalColumn> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `name TYPE, name TYPE, ...`
    pub fn declaration_string(&self) -> String {
        self.0
            .iter()
            .map(|c| format!("{} {}", c.name, c.local_type))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Statement handed to the engine's declare hook
    pub fn create_table_statement(&self, table: &str) -> String {
        format!("CREATE TABLE {}({})", table, self.declaration_string())
    }
}

/// Planning metadata for one key column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumnEntry {
    pub requirement: KeyRequirement,
    pub operators: Vec<String>,
}

/// Key columns by name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyColumnIndex {
    entries: HashMap<String, KeyColumnEntry>,
    /// Required key names in schema order
    required: Vec<String>,
}

impl KeyColumnIndex {
    pub fn get(&self, column: &str) -> Option<&KeyColumnEntry> {
        self.entries.get(column)
    }

    pub fn is_key(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    /// True when `column` is a key column advertising `operator`
    pub fn supports(&self, column: &str, operator: &str) -> bool {
        self.entries
            .get(column)
            .map_or(false, |entry| entry.operators.iter().any(|op| op == operator))
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of translating one remote table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedTable {
    pub columns: LocalColumns,
    pub key_columns: KeyColumnIndex,
    pub semantic_types: HashMap<String, ColumnType>,
}

/// Translates remote table descriptions; pure.
pub struct SchemaTranslator;

impl SchemaTranslator {
    /// Fails only for a malformed schema: empty or duplicate column names,
    /// or a key column that is not a column.
    pub fn translate(table: &str, schema: &TableSchema) -> SchemaResult<TranslatedTable> {
        let mut columns = Vec::with_capacity(schema.columns.len());
        let mut semantic_types = HashMap::with_capacity(schema.columns.len());

        for (position, column) in schema.columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                return Err(SchemaError::malformed(
                    table,
                    format!("column {} has no name", position),
                ));
            }
            if semantic_types
                .insert(column.name.clone(), column.column_type)
                .is_some()
            {
                return Err(SchemaError::malformed(
                    table,
                    format!("duplicate column '{}'", column.name),
                ));
            }
            columns.push(LocalColumn {
                name: column.name.clone(),
                local_type: LocalType::for_column(column.column_type),
            });
        }

        let mut key_columns = KeyColumnIndex::default();
        let mut seen_required = HashSet::new();
        for key in &schema.key_columns {
            if !semantic_types.contains_key(&key.name) {
                return Err(SchemaError::malformed(
                    table,
                    format!("key column '{}' is not a column", key.name),
                ));
            }
            // A name listed twice keeps the union of its operators
            let entry = key_columns
                .entries
                .entry(key.name.clone())
                .or_insert_with(|| KeyColumnEntry {
                    requirement: key.require,
                    operators: Vec::new(),
                });
            if key.require == KeyRequirement::Required {
                entry.requirement = KeyRequirement::Required;
            }
            for op in &key.operators {
                if !entry.operators.contains(op) {
                    entry.operators.push(op.clone());
                }
            }
            if key.require == KeyRequirement::Required && seen_required.insert(key.name.clone()) {
                key_columns.required.push(key.name.clone());
            }
        }

        Ok(TranslatedTable {
            columns: LocalColumns(columns),
            key_columns,
            semantic_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ColumnDefinition, KeyColumn};

    fn sample_schema() -> TableSchema {
        TableSchema::new(vec![
            ColumnDefinition::new("id", ColumnType::Int),
            ColumnDefinition::new("active", ColumnType::Bool),
            ColumnDefinition::new("score", ColumnType::Double),
            ColumnDefinition::new("tags", ColumnType::Json),
            ColumnDefinition::new("created", ColumnType::Timestamp),
            ColumnDefinition::new("addr", ColumnType::IpAddr),
            ColumnDefinition::new("net", ColumnType::Cidr),
            ColumnDefinition::new("path", ColumnType::Ltree),
        ])
        .with_key_column(KeyColumn::required("id").with_operators(&["=", ">"]))
        .with_key_column(KeyColumn::optional("net"))
    }

    #[test]
    fn test_local_type_mapping() {
        assert_eq!(LocalType::for_column(ColumnType::Bool), LocalType::Integer);
        assert_eq!(LocalType::for_column(ColumnType::Int), LocalType::Integer);
        assert_eq!(LocalType::for_column(ColumnType::Double), LocalType::Float);
        for t in [
            ColumnType::String,
            ColumnType::Json,
            ColumnType::Datetime,
            ColumnType::Timestamp,
            ColumnType::IpAddr,
            ColumnType::Cidr,
            ColumnType::Inet,
            ColumnType::Ltree,
        ] {
            assert_eq!(LocalType::for_column(t), LocalType::Text);
        }
    }

    #[test]
    fn test_create_table_statement() {
        let translated = SchemaTranslator::translate("things", &sample_schema()).unwrap();
        assert_eq!(
            translated.columns.create_table_statement("things"),
            "CREATE TABLE things(id INTEGER, active INTEGER, score FLOAT, tags TEXT, \
             created TEXT, addr TEXT, net TEXT, path TEXT)"
        );
    }

    #[test]
    fn test_semantic_types_preserved() {
        let translated = SchemaTranslator::translate("things", &sample_schema()).unwrap();
        assert_eq!(translated.semantic_types["net"], ColumnType::Cidr);
        assert_eq!(translated.semantic_types["created"], ColumnType::Timestamp);
    }

    #[test]
    fn test_key_column_index() {
        let translated = SchemaTranslator::translate("things", &sample_schema()).unwrap();
        let keys = &translated.key_columns;

        assert!(keys.supports("id", "="));
        assert!(keys.supports("id", ">"));
        assert!(!keys.supports("id", "<"));
        assert!(keys.supports("net", "="));
        assert!(!keys.supports("score", "="));
        assert_eq!(keys.required_columns(), ["id".to_string()]);
    }

    #[test]
    fn test_unnamed_column_rejected() {
        let schema = TableSchema::new(vec![ColumnDefinition::new("", ColumnType::Int)]);
        let err = SchemaTranslator::translate("broken", &schema).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_MALFORMED");
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let schema = TableSchema::new(vec![
            ColumnDefinition::new("id", ColumnType::Int),
            ColumnDefinition::new("id", ColumnType::String),
        ]);
        let err = SchemaTranslator::translate("broken", &schema).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_MALFORMED");
        assert!(err.to_string().contains("duplicate column 'id'"));
    }

    #[test]
    fn test_unknown_key_column_rejected() {
        let schema = TableSchema::new(vec![ColumnDefinition::new("id", ColumnType::Int)])
            .with_key_column(KeyColumn::required("region"));
        assert!(SchemaTranslator::translate("broken", &schema).is_err());
    }

    #[test]
    fn test_repeated_key_column_merges_operators() {
        let schema = TableSchema::new(vec![ColumnDefinition::new("id", ColumnType::Int)])
            .with_key_column(KeyColumn::optional("id").with_operators(&["="]))
            .with_key_column(KeyColumn::required("id").with_operators(&["<", "="]));
        let translated = SchemaTranslator::translate("t", &schema).unwrap();

        let entry = translated.key_columns.get("id").unwrap();
        assert_eq!(entry.requirement, KeyRequirement::Required);
        assert_eq!(entry.operators, vec!["=", "<"]);
        assert_eq!(translated.key_columns.required_columns().len(), 1);
    }
}
