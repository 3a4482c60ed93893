//! Schema metadata assembly.
//!
//! [`SchemaAssembler`] runs the catalog queries of a [`CatalogSource`] for one
//! catalog and schema and joins their rows into the [`Table`] graph:
//!
//! ```text
//! list_base_tables(db, schema)
//!   └─ for each table
//!        ├─ list_columns            ─┐
//!        ├─ list_foreign_key_pairs   ├─► group_foreign_keys / classify_column
//!        └─ list_column_key_usage   ─┘        (once per column)
//! ```
//!
//! Round trips are sequential. The first catalog error aborts the pass and is
//! returned as is; no partial result is produced.

use log::{debug, trace};

use super::catalog::{CatalogSource, ColumnRow, ForeignKeyPairRow, KeyUsageRow, TableRow};
use super::types::{AutoIncrementKey, AutoIncrementType, Column, ForeignKey, Table};
use crate::naming::{pluralize, to_capital_case, FieldType};

/// Match option reported by drivers for a constraint without `MATCH`.
const MATCH_NONE: &str = "NONE";
/// What `NONE` means in SQL terms.
const MATCH_SIMPLE: &str = "SIMPLE";

/// Reflects the tables of one catalog and schema.
pub trait SchemaProcessor {
    type Error;

    fn retrieve_table_metadata(
        &self,
        database_name: &str,
        schema_name: &str,
    ) -> Result<Vec<Table>, Self::Error>;
}

/// [`SchemaProcessor`] that assembles tables from catalog rows.
#[derive(Debug, Clone)]
pub struct SchemaAssembler<C> {
    catalog: C,
}

impl<C: CatalogSource> SchemaAssembler<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// The underlying catalog source.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Reflect every base table of `database_name`.`schema_name`.
    pub fn retrieve_table_metadata(
        &self,
        database_name: &str,
        schema_name: &str,
    ) -> Result<Vec<Table>, C::Error> {
        let table_rows = self.catalog.list_base_tables(database_name, schema_name)?;
        debug!(
            "reflecting {} tables in {}.{}",
            table_rows.len(),
            database_name,
            schema_name
        );

        table_rows
            .into_iter()
            .map(|row| self.assemble_table(database_name, schema_name, row))
            .collect()
    }

    fn assemble_table(
        &self,
        database_name: &str,
        schema_name: &str,
        row: TableRow,
    ) -> Result<Table, C::Error> {
        let column_rows = self
            .catalog
            .list_columns(database_name, schema_name, &row.table_name)?;
        let fk_rows =
            self.catalog
                .list_foreign_key_pairs(database_name, schema_name, &row.table_name)?;

        let mut columns = Vec::with_capacity(column_rows.len());
        for column_row in &column_rows {
            let key_usage = self.catalog.list_column_key_usage(
                database_name,
                schema_name,
                &row.table_name,
                &column_row.column_name,
            )?;
            columns.push(classify_column(column_row, &key_usage));
        }

        let table = build_table(row, columns, group_foreign_keys(fk_rows));
        debug!(
            "reflected {}: {} columns, {} foreign keys, {} primary key columns",
            table.qualified_name(),
            table.columns.len(),
            table.foreign_keys.len(),
            table.primary_key_columns.len()
        );

        Ok(table)
    }
}

impl<C: CatalogSource> SchemaProcessor for SchemaAssembler<C> {
    type Error = C::Error;

    fn retrieve_table_metadata(
        &self,
        database_name: &str,
        schema_name: &str,
    ) -> Result<Vec<Table>, Self::Error> {
        SchemaAssembler::retrieve_table_metadata(self, database_name, schema_name)
    }
}

/// Group foreign key pair rows into [`ForeignKey`]s.
///
/// A new key is opened whenever the referenced (catalog, schema, table)
/// differs from the one currently open; otherwise the row's column pair is
/// appended to the open key. Rows are stable-sorted by
/// [`ForeignKeyPairRow::sort_key`] first, so grouping does not depend on the
/// order the catalog returned them in.
pub fn group_foreign_keys(mut rows: Vec<ForeignKeyPairRow>) -> Vec<ForeignKey> {
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let mut keys: Vec<ForeignKey> = Vec::new();
    for row in rows {
        let (catalog, schema, table) = row.referenced_table();
        match keys.last_mut() {
            Some(open) if open.references(catalog, schema, table) => {
                open.fk_columns.push(row.fk_column_name);
                open.uk_columns.push(row.uq_column_name);
            }
            _ => keys.push(open_foreign_key(row)),
        }
    }

    keys
}

fn open_foreign_key(row: ForeignKeyPairRow) -> ForeignKey {
    let match_option = if row.match_option == MATCH_NONE {
        MATCH_SIMPLE.to_string()
    } else {
        row.match_option
    };

    ForeignKey {
        database_name: row.uq_table_catalog,
        schema_name: row.uq_table_schema,
        table_name: row.uq_table_name,
        key_name: row.fk_constraint_name,
        fk_columns: vec![row.fk_column_name],
        uk_columns: vec![row.uq_column_name],
        update_rule: row.update_rule,
        delete_rule: row.delete_rule,
        match_option,
    }
}

/// Classify one column from its catalog row and key usage rows.
///
/// A column that has a default, is part of the primary key and is not
/// nullable is taken to be an auto-increment surrogate key. This is a
/// heuristic, the catalog is not asked.
pub fn classify_column(row: &ColumnRow, key_usage: &[KeyUsageRow]) -> Column {
    let field_name = to_capital_case(&row.column_name);
    let field_name_lower_case = field_name.to_lowercase();

    let is_nullable = row.is_nullable.as_deref() == Some("YES");
    let has_default = row.column_default.is_some();
    let is_primary_key_column = key_usage.iter().any(KeyUsageRow::is_primary_key);
    let is_unique = key_usage.iter().any(KeyUsageRow::is_unique);

    let is_auto_increment_column = has_default && is_primary_key_column && !is_nullable;
    let auto_increment_type = if is_auto_increment_column {
        AutoIncrementType::from_data_type(&row.data_type)
    } else {
        None
    };

    Column {
        column_name: row.column_name.clone(),
        field_name,
        field_name_lower_case,
        field_type: FieldType::from_data_type(&row.data_type),
        data_type: row.data_type.clone(),
        data_type_size: row.character_maximum_length.map(i64::from),
        is_nullable,
        has_default,
        is_primary_key_column,
        is_unique,
        is_auto_increment_column,
        auto_increment_type,
    }
}

/// Derive names and column subsets for a table from its classified columns.
fn build_table(row: TableRow, columns: Vec<Column>, foreign_keys: Vec<ForeignKey>) -> Table {
    let model_name = to_capital_case(&row.table_name);
    let model_name_lower_case = model_name.to_lowercase();
    let model_name_lower_case_plural = pluralize(&model_name_lower_case);

    let mut auto_increment = None;
    for column in columns.iter().filter(|c| c.is_auto_increment_column) {
        trace!(
            "{}.{} inferred as auto-increment ({})",
            row.table_name,
            column.column_name,
            column
                .auto_increment_type
                .map(|t| t.as_str())
                .unwrap_or("untyped")
        );
        auto_increment = Some(AutoIncrementKey {
            column_name: column.column_name.clone(),
            field_name: column.field_name.clone(),
            field_type: column.auto_increment_type.map(|t| t.field_type()),
        });
    }

    let writable: Vec<Column> = columns
        .iter()
        .filter(|c| !c.is_auto_increment_column)
        .cloned()
        .collect();
    let primary_key_columns: Vec<Column> = columns
        .iter()
        .filter(|c| c.is_primary_key_column)
        .cloned()
        .collect();

    Table {
        database_name: row.table_catalog,
        schema_name: row.table_schema,
        table_name: row.table_name,
        model_name,
        model_name_lower_case,
        model_name_lower_case_plural,
        columns,
        foreign_keys,
        insert_columns: writable.clone(),
        update_columns: writable,
        has_primary_keys: !primary_key_columns.is_empty(),
        primary_key_columns,
        auto_increment,
    }
}
