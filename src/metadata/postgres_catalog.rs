//! PostgreSQL catalog source.
//!
//! Runs the four `information_schema` queries the assembler needs. Every read
//! opens its own connection and drops it before returning, so a
//! [`PostgresCatalog`] holds no connection state and can be shared freely.
//!
//! `information_schema` columns use domain types (`sql_identifier`,
//! `cardinal_number`, ...), so every selected column and parameter is cast to
//! a plain type.

use postgres::types::ToSql;
use postgres::{Client, NoTls, Row};
use thiserror::Error;

use super::catalog::{CatalogSource, ColumnRow, ForeignKeyPairRow, KeyUsageRow, TableRow};

/// Errors raised while reading the PostgreSQL catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Could not open a connection.
    #[error("failed to connect to catalog database: {0}")]
    Connect(#[source] postgres::Error),

    /// A catalog query failed or returned a row of an unexpected shape.
    #[error("catalog query {query} failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: postgres::Error,
    },
}

const LIST_BASE_TABLES: &str = "
    select table_catalog::text, table_schema::text, table_name::text, table_type::text
    from information_schema.tables
    where table_catalog::text = $1::text
      and table_schema::text = $2::text
      and table_type = 'BASE TABLE'
    order by table_name";

const LIST_COLUMNS: &str = "
    select table_catalog::text, table_schema::text, table_name::text, column_name::text,
           ordinal_position::int4, column_default::text, is_nullable::text, data_type::text,
           character_maximum_length::int4
    from information_schema.columns
    where table_catalog::text = $1::text
      and table_schema::text = $2::text
      and table_name::text = $3::text
    order by ordinal_position";

const LIST_COLUMN_KEY_USAGE: &str = "
    select kcu.constraint_catalog::text, kcu.constraint_schema::text,
           kcu.constraint_name::text, kcu.table_name::text, kcu.column_name::text,
           tc.constraint_type::text, kcu.ordinal_position::int4,
           kcu.position_in_unique_constraint::int4
    from information_schema.key_column_usage kcu
    join information_schema.table_constraints tc
      on tc.constraint_catalog = kcu.constraint_catalog
     and tc.constraint_schema = kcu.constraint_schema
     and tc.constraint_name = kcu.constraint_name
    where kcu.table_catalog::text = $1::text
      and kcu.table_schema::text = $2::text
      and kcu.table_name::text = $3::text
      and kcu.column_name::text = $4::text";

const LIST_FOREIGN_KEY_PAIRS: &str = "
    select kcu1.table_catalog::text as fk_table_catalog,
           kcu1.table_schema::text as fk_table_schema,
           kcu1.table_name::text as fk_table_name,
           kcu1.constraint_name::text as fk_constraint_name,
           kcu1.column_name::text as fk_column_name,
           kcu1.ordinal_position::int4 as fk_ordinal_position,
           kcu2.table_catalog::text as uq_table_catalog,
           kcu2.table_schema::text as uq_table_schema,
           kcu2.table_name::text as uq_table_name,
           kcu2.constraint_name::text as uq_constraint_name,
           kcu2.column_name::text as uq_column_name,
           kcu2.ordinal_position::int4 as uq_ordinal_position,
           rc.update_rule::text as update_rule,
           rc.delete_rule::text as delete_rule,
           rc.match_option::text as match_option
    from information_schema.referential_constraints rc
    join information_schema.key_column_usage kcu1
      on kcu1.constraint_catalog = rc.constraint_catalog
     and kcu1.constraint_schema = rc.constraint_schema
     and kcu1.constraint_name = rc.constraint_name
    join information_schema.key_column_usage kcu2
      on kcu2.constraint_catalog = rc.unique_constraint_catalog
     and kcu2.constraint_schema = rc.unique_constraint_schema
     and kcu2.constraint_name = rc.unique_constraint_name
     and kcu2.ordinal_position = kcu1.ordinal_position
    where kcu1.table_catalog::text = $1::text
      and kcu1.table_schema::text = $2::text
      and kcu1.table_name::text = $3::text
    order by uq_table_catalog, uq_table_schema, uq_table_name,
             uq_constraint_name, uq_column_name, uq_ordinal_position";

/// [`CatalogSource`] over a PostgreSQL connection string.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    connection_string: String,
}

impl PostgresCatalog {
    /// Create a catalog source for a libpq-style or URL connection string.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Run one query on a fresh connection and convert its rows.
    ///
    /// The client is dropped when this returns, whatever the outcome.
    fn query<T>(
        &self,
        name: &'static str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        convert: fn(&Row) -> Result<T, postgres::Error>,
    ) -> Result<Vec<T>, CatalogError> {
        let mut client =
            Client::connect(&self.connection_string, NoTls).map_err(CatalogError::Connect)?;
        log::trace!("running catalog query {}", name);

        let rows = client
            .query(sql, params)
            .map_err(|source| CatalogError::Query { query: name, source })?;

        rows.iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| CatalogError::Query { query: name, source })
    }
}

impl CatalogSource for PostgresCatalog {
    type Error = CatalogError;

    fn list_base_tables(&self, database: &str, schema: &str) -> Result<Vec<TableRow>, Self::Error> {
        self.query(
            "list_base_tables",
            LIST_BASE_TABLES,
            &[&database, &schema],
            table_row,
        )
    }

    fn list_columns(
        &self,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRow>, Self::Error> {
        self.query(
            "list_columns",
            LIST_COLUMNS,
            &[&database, &schema, &table],
            column_row,
        )
    }

    fn list_foreign_key_pairs(
        &self,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyPairRow>, Self::Error> {
        self.query(
            "list_foreign_key_pairs",
            LIST_FOREIGN_KEY_PAIRS,
            &[&database, &schema, &table],
            foreign_key_pair_row,
        )
    }

    fn list_column_key_usage(
        &self,
        database: &str,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Vec<KeyUsageRow>, Self::Error> {
        self.query(
            "list_column_key_usage",
            LIST_COLUMN_KEY_USAGE,
            &[&database, &schema, &table, &column],
            key_usage_row,
        )
    }
}

fn table_row(row: &Row) -> Result<TableRow, postgres::Error> {
    Ok(TableRow {
        table_catalog: row.try_get("table_catalog")?,
        table_schema: row.try_get("table_schema")?,
        table_name: row.try_get("table_name")?,
        table_type: row.try_get("table_type")?,
    })
}

fn column_row(row: &Row) -> Result<ColumnRow, postgres::Error> {
    Ok(ColumnRow {
        table_catalog: row.try_get("table_catalog")?,
        table_schema: row.try_get("table_schema")?,
        table_name: row.try_get("table_name")?,
        column_name: row.try_get("column_name")?,
        ordinal_position: row.try_get("ordinal_position")?,
        column_default: row.try_get("column_default")?,
        is_nullable: row.try_get("is_nullable")?,
        data_type: row.try_get("data_type")?,
        character_maximum_length: row.try_get("character_maximum_length")?,
    })
}

fn key_usage_row(row: &Row) -> Result<KeyUsageRow, postgres::Error> {
    Ok(KeyUsageRow {
        constraint_catalog: row.try_get("constraint_catalog")?,
        constraint_schema: row.try_get("constraint_schema")?,
        constraint_name: row.try_get("constraint_name")?,
        table_name: row.try_get("table_name")?,
        column_name: row.try_get("column_name")?,
        constraint_type: row.try_get("constraint_type")?,
        ordinal_position: row.try_get("ordinal_position")?,
        position_in_unique_constraint: row.try_get("position_in_unique_constraint")?,
    })
}

fn foreign_key_pair_row(row: &Row) -> Result<ForeignKeyPairRow, postgres::Error> {
    Ok(ForeignKeyPairRow {
        fk_table_catalog: row.try_get("fk_table_catalog")?,
        fk_table_schema: row.try_get("fk_table_schema")?,
        fk_table_name: row.try_get("fk_table_name")?,
        fk_constraint_name: row.try_get("fk_constraint_name")?,
        fk_column_name: row.try_get("fk_column_name")?,
        fk_ordinal_position: row.try_get("fk_ordinal_position")?,
        uq_table_catalog: row.try_get("uq_table_catalog")?,
        uq_table_schema: row.try_get("uq_table_schema")?,
        uq_table_name: row.try_get("uq_table_name")?,
        uq_constraint_name: row.try_get("uq_constraint_name")?,
        uq_column_name: row.try_get("uq_column_name")?,
        uq_ordinal_position: row.try_get("uq_ordinal_position")?,
        update_rule: row.try_get("update_rule")?,
        delete_rule: row.try_get("delete_rule")?,
        match_option: row.try_get("match_option")?,
    })
}
