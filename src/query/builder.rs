//! Interface of the SQL generation layer.
//!
//! Query descriptors are engine-agnostic. Turning one into SQL needs the
//! reflected [`Table`] as well, to resolve field names to columns and reject
//! references to fields the table does not have. This crate does not ship an
//! implementation.

use crate::metadata::Table;

use super::descriptors::{
    CountQuery, DestroyByIdQuery, DestroyQuery, ExistsQuery, FindByIdQuery, FindOneQuery,
    FindQuery, InsertQuery, UpdateByIdQuery, UpdateQuery,
};

/// Builds SQL text for query descriptors against a reflected table.
pub trait SqlQueryBuilder {
    type Error: std::error::Error;

    fn build_find_by_id_query(&self, query: &FindByIdQuery, table: &Table) -> Result<String, Self::Error>;

    fn build_find_query(&self, query: &FindQuery, table: &Table) -> Result<String, Self::Error>;

    fn build_find_one_query(&self, query: &FindOneQuery, table: &Table) -> Result<String, Self::Error>;

    fn build_count_query(&self, query: &CountQuery, table: &Table) -> Result<String, Self::Error>;

    fn build_exists_query(&self, query: &ExistsQuery, table: &Table) -> Result<String, Self::Error>;

    fn build_insert_query(&self, query: &InsertQuery, table: &Table) -> Result<String, Self::Error>;

    fn build_destroy_by_id_query(
        &self,
        query: &DestroyByIdQuery,
        table: &Table,
    ) -> Result<String, Self::Error>;

    fn build_destroy_query(&self, query: &DestroyQuery, table: &Table) -> Result<String, Self::Error>;

    fn build_update_by_id_query(
        &self,
        query: &UpdateByIdQuery,
        table: &Table,
    ) -> Result<String, Self::Error>;

    fn build_update_query(&self, query: &UpdateQuery, table: &Table) -> Result<String, Self::Error>;
}
