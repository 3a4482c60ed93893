//! REST-style URL filter parsing.
//!
//! Turns the `filter[...]` parameters of a decoded query string into query
//! descriptors that an [`SqlQueryBuilder`] can turn into SQL.
//!
//! ```text
//! "?filter[limit]=5&filter[order]=name ASC"
//!          │
//!          ▼ QueryValues::parse
//! { "filter[limit]": ["5"], "filter[order]": ["name ASC"] }
//!          │
//!          ▼ FilterParser::parse_find_query
//! FindQuery { limit: Some(5), order_by: Some([name asc]), .. }
//! ```
//!
//! # Example
//!
//! ```
//! use dbmeta::query::{FilterParser, FindQuery, QueryValues, SortDirection};
//!
//! let parser = FilterParser::new();
//! let values = QueryValues::parse("filter[limit]=5&filter[order]=name DESC&page=2");
//!
//! let mut query = FindQuery::default();
//! parser.parse_find_query(&mut query, &values).unwrap();
//!
//! assert_eq!(query.limit.unwrap().limit_to, 5);
//! assert_eq!(query.order_by.unwrap().order_by[0].direction, SortDirection::Desc);
//! assert!(query.skip.is_none());
//! ```

mod builder;
mod descriptors;
mod error;
mod filter;
mod parts;
mod values;

pub use builder::SqlQueryBuilder;
pub use descriptors::{
    CountQuery, DestroyByIdQuery, DestroyQuery, ExistsQuery, FilterPart, FilterTarget, FilterType,
    FindByIdQuery, FindOneQuery, FindQuery, InsertQuery, UpdateByIdQuery, UpdateQuery,
};
pub use error::{FilterError, FilterResult};
pub use filter::{FilterKey, FilterParser};
pub use parts::{
    FieldsQueryPart, LimitQueryPart, OrderQueryPart, OrderQueryPartItem, SkipQueryPart,
    SortDirection, WhereOperator, WhereQueryPart,
};
pub use values::QueryValues;
