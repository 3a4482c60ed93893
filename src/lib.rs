//! # dbmeta
//!
//! Relational schema reflection and REST-style URL filter parsing.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │  Catalog (information_schema)│     │  URL query string            │
//! └──────────────────────────────┘     └──────────────────────────────┘
//!                │                                    │
//!                ▼ [metadata::SchemaAssembler]        ▼ [query::FilterParser]
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │  Table / Column / ForeignKey │     │  FindQuery, CountQuery, ...  │
//! └──────────────────────────────┘     └──────────────────────────────┘
//!                │                                    │
//!                └──────────────┬─────────────────────┘
//!                               ▼ [query::SqlQueryBuilder, external]
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           SQL text                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod metadata;
pub mod naming;
pub mod query;

pub use metadata::{Column, ForeignKey, SchemaAssembler, Table};
pub use naming::FieldType;
pub use query::{FilterError, FilterParser, FindQuery, QueryValues};
