//! Schema reflection.
//!
//! This module turns the catalog of a relational database into a [`Table`]
//! metamodel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      SchemaAssembler                            │
//! │  - FK grouping by referenced table                              │
//! │  - column classification (naming, types, keys)                  │
//! │  - auto-increment inference                                     │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │ CatalogSource
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      PostgresCatalog                            │
//! │              (information_schema, one connection per read)      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dbmeta::metadata::{PostgresCatalog, SchemaAssembler};
//!
//! let assembler = SchemaAssembler::new(PostgresCatalog::new("postgres://localhost/shop"));
//! let tables = assembler.retrieve_table_metadata("shop", "public")?;
//!
//! for table in &tables {
//!     println!("{} -> {}", table.table_name, table.model_name);
//! }
//! ```

mod assembler;
mod catalog;
mod postgres_catalog;
mod types;

pub use assembler::{classify_column, group_foreign_keys, SchemaAssembler, SchemaProcessor};
pub use catalog::{
    CatalogSource, ColumnRow, ForeignKeyPairRow, KeyUsageRow, TableRow, BASE_TABLE, PRIMARY_KEY,
    UNIQUE,
};
pub use postgres_catalog::{CatalogError, PostgresCatalog};
pub use types::{AutoIncrementKey, AutoIncrementType, Column, ForeignKey, Table};
