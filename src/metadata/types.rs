//! Reflected metamodel types.
//!
//! A [`Table`] is built once per reflection pass by the
//! [`SchemaAssembler`](super::SchemaAssembler) and is not mutated afterwards.
//! All types serialize with serde so the graph can be handed to a code
//! generator as JSON.

use serde::{Deserialize, Serialize};

use crate::naming::FieldType;

/// Storage subtype inferred for an auto-increment surrogate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoIncrementType {
    Serial,
    BigSerial,
}

impl AutoIncrementType {
    /// Subtype for a raw base type; only `integer` and `bigint` have one.
    pub fn from_data_type(data_type: &str) -> Option<Self> {
        match data_type {
            "integer" => Some(Self::Serial),
            "bigint" => Some(Self::BigSerial),
            _ => None,
        }
    }

    /// Generic field type the surrogate key is exposed as.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Serial => FieldType::Int,
            Self::BigSerial => FieldType::Int64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::BigSerial => "bigserial",
        }
    }
}

/// One reflected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Raw column name.
    pub column_name: String,
    /// PascalCase field name derived from the column name.
    pub field_name: String,
    pub field_name_lower_case: String,
    pub field_type: FieldType,
    /// Raw database type, e.g. `character varying`.
    pub data_type: String,
    /// Character maximum length, when the type has one.
    pub data_type_size: Option<i64>,
    pub is_nullable: bool,
    pub has_default: bool,
    pub is_primary_key_column: bool,
    pub is_unique: bool,
    /// Inferred, not read from the catalog: a non-nullable primary key column
    /// with a default.
    pub is_auto_increment_column: bool,
    pub auto_increment_type: Option<AutoIncrementType>,
}

/// One referential constraint, possibly spanning several columns.
///
/// `fk_columns[i]` references `uk_columns[i]`; both always have the same,
/// non-zero length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referenced database (catalog).
    pub database_name: String,
    /// Referenced schema.
    pub schema_name: String,
    /// Referenced table.
    pub table_name: String,
    /// Constraint name.
    pub key_name: String,
    /// Local column names.
    pub fk_columns: Vec<String>,
    /// Referenced unique/primary key column names.
    pub uk_columns: Vec<String>,
    pub update_rule: String,
    pub delete_rule: String,
    pub match_option: String,
}

impl ForeignKey {
    /// Whether this key references the given (catalog, schema, table).
    pub fn references(&self, database_name: &str, schema_name: &str, table_name: &str) -> bool {
        self.database_name == database_name
            && self.schema_name == schema_name
            && self.table_name == table_name
    }

    /// Local/referenced column pairs in constraint order.
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fk_columns
            .iter()
            .zip(&self.uk_columns)
            .map(|(fk, uk)| (fk.as_str(), uk.as_str()))
    }
}

/// Table-level summary of the auto-increment surrogate key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoIncrementKey {
    pub column_name: String,
    pub field_name: String,
    /// `None` when the key's base type has no recognised serial subtype.
    pub field_type: Option<FieldType>,
}

/// One reflected base table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub database_name: String,
    pub schema_name: String,
    pub table_name: String,

    /// PascalCase model name derived from the table name.
    pub model_name: String,
    pub model_name_lower_case: String,
    pub model_name_lower_case_plural: String,

    /// Columns in ordinal order.
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,

    /// `columns` without the auto-increment column.
    pub insert_columns: Vec<Column>,
    /// `columns` without the auto-increment column.
    pub update_columns: Vec<Column>,
    /// Primary key columns in column order.
    pub primary_key_columns: Vec<Column>,
    pub has_primary_keys: bool,

    pub auto_increment: Option<AutoIncrementKey>,
}

impl Table {
    /// Look up a column by its raw name.
    pub fn column(&self, column_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.column_name == column_name)
    }

    /// Look up a column by its lower-case field name, as used in URL filters.
    pub fn column_by_field(&self, field_name: &str) -> Option<&Column> {
        let lower = field_name.to_lowercase();
        self.columns
            .iter()
            .find(|c| c.field_name_lower_case == lower)
    }

    /// The column the table-level auto-increment summary points at.
    pub fn auto_increment_column(&self) -> Option<&Column> {
        self.auto_increment
            .as_ref()
            .and_then(|key| self.column(&key.column_name))
    }

    /// `schema.table`, unquoted.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}
