//! Filter parsing errors.

use std::num::ParseIntError;

use thiserror::Error;

/// Result type for filter parsing.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while parsing `filter[...]` query string parameters.
///
/// Parsing stops at the first error. Parts applied to the descriptor before
/// the failing key stay applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A well-formed `filter[x]` key whose `x` is not accepted by the query kind.
    #[error("{filter_type} is not a valid filter for a {query_kind}")]
    UnknownFilter {
        filter_type: String,
        query_kind: &'static str,
    },

    /// A `limit` or `skip` value that is not a non-negative integer.
    #[error("invalid value {value:?} for the {filter} filter, it is not a valid integer: {source}")]
    InvalidNumber {
        filter: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A `where` operator outside the supported set.
    #[error("unknown where operator: {0}")]
    UnknownOperator(String),

    /// A bracket path of the wrong shape for its filter, e.g. `filter[limit][x]`.
    #[error("invalid filter path: {0}")]
    InvalidPath(String),

    /// A `filter[fields][<field>]` value other than true/false.
    #[error("invalid fields flag {value:?} for {key}, expected true or false")]
    InvalidFlag { key: String, value: String },

    /// A recognised filter used in a form that is not supported.
    #[error("the {filter} filter is not supported in this form: {reason}")]
    Unsupported {
        filter: &'static str,
        reason: &'static str,
    },
}

impl FilterError {
    pub fn unknown_filter(filter_type: impl Into<String>, query_kind: &'static str) -> Self {
        Self::UnknownFilter {
            filter_type: filter_type.into(),
            query_kind,
        }
    }
}
