//! Catalog data source abstraction.
//!
//! The [`CatalogSource`] trait is the seam between the schema assembler and
//! whatever actually runs the catalog queries. Rows mirror the
//! `information_schema` views they are read from, with nullable catalog
//! columns as `Option`.

use serde::{Deserialize, Serialize};

/// Constraint type marking a primary key column in key usage rows.
pub const PRIMARY_KEY: &str = "PRIMARY KEY";
/// Constraint type marking a unique column in key usage rows.
pub const UNIQUE: &str = "UNIQUE";
/// Table type of a base (non-view) table.
pub const BASE_TABLE: &str = "BASE TABLE";

/// A row of `information_schema.tables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub table_catalog: String,
    pub table_schema: String,
    pub table_name: String,
    pub table_type: String,
}

/// A row of `information_schema.columns`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub table_catalog: String,
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub ordinal_position: Option<i32>,
    pub column_default: Option<String>,
    /// `YES` / `NO`.
    pub is_nullable: Option<String>,
    pub data_type: String,
    pub character_maximum_length: Option<i32>,
}

/// A `key_column_usage` row joined with its `table_constraints` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyUsageRow {
    pub constraint_catalog: String,
    pub constraint_schema: String,
    pub constraint_name: String,
    pub table_name: String,
    pub column_name: String,
    /// `PRIMARY KEY`, `UNIQUE`, `FOREIGN KEY`, ...
    pub constraint_type: String,
    pub ordinal_position: i32,
    pub position_in_unique_constraint: Option<i32>,
}

impl KeyUsageRow {
    pub fn is_primary_key(&self) -> bool {
        self.constraint_type == PRIMARY_KEY
    }

    pub fn is_unique(&self) -> bool {
        self.constraint_type == UNIQUE
    }
}

/// One local column of a referential constraint paired with the referenced
/// unique/primary key column at the same ordinal position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyPairRow {
    pub fk_table_catalog: String,
    pub fk_table_schema: String,
    pub fk_table_name: String,
    pub fk_constraint_name: String,
    pub fk_column_name: String,
    pub fk_ordinal_position: i32,
    pub uq_table_catalog: String,
    pub uq_table_schema: String,
    pub uq_table_name: String,
    pub uq_constraint_name: String,
    pub uq_column_name: String,
    pub uq_ordinal_position: i32,
    pub update_rule: String,
    pub delete_rule: String,
    pub match_option: String,
}

impl ForeignKeyPairRow {
    /// Referenced (catalog, schema, table) identity used for grouping.
    pub fn referenced_table(&self) -> (&str, &str, &str) {
        (
            &self.uq_table_catalog,
            &self.uq_table_schema,
            &self.uq_table_name,
        )
    }

    /// Ordering key required for grouping: referenced catalog, schema, table,
    /// constraint name, column and ordinal position.
    pub fn sort_key(&self) -> (&str, &str, &str, &str, &str, i32) {
        (
            &self.uq_table_catalog,
            &self.uq_table_schema,
            &self.uq_table_name,
            &self.uq_constraint_name,
            &self.uq_column_name,
            self.uq_ordinal_position,
        )
    }
}

/// Read-only catalog queries consumed by the schema assembler.
///
/// Implementations must release any connection they open before returning,
/// on error paths too. Errors are surfaced to the assembler's caller
/// unchanged.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Base tables (views excluded) of one catalog and schema.
    fn list_base_tables(&self, database: &str, schema: &str) -> Result<Vec<TableRow>, Self::Error>;

    /// Columns of one table, ordered by ordinal position.
    fn list_columns(
        &self,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRow>, Self::Error>;

    /// Foreign key column pairs of one table, ordered by
    /// [`ForeignKeyPairRow::sort_key`].
    fn list_foreign_key_pairs(
        &self,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyPairRow>, Self::Error>;

    /// Constraint-annotated key usage of one column.
    fn list_column_key_usage(
        &self,
        database: &str,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Vec<KeyUsageRow>, Self::Error>;
}

impl<C: CatalogSource + ?Sized> CatalogSource for &C {
    type Error = C::Error;

    fn list_base_tables(&self, database: &str, schema: &str) -> Result<Vec<TableRow>, Self::Error> {
        (**self).list_base_tables(database, schema)
    }

    fn list_columns(
        &self,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRow>, Self::Error> {
        (**self).list_columns(database, schema, table)
    }

    fn list_foreign_key_pairs(
        &self,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyPairRow>, Self::Error> {
        (**self).list_foreign_key_pairs(database, schema, table)
    }

    fn list_column_key_usage(
        &self,
        database: &str,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Vec<KeyUsageRow>, Self::Error> {
        (**self).list_column_key_usage(database, schema, table, column)
    }
}
