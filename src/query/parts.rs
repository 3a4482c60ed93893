//! Query parts produced by the filter parser.
//!
//! Each part corresponds to one filter keyword. Descriptors hold parts as
//! `Option`s: a missing part means the keyword was not in the query string,
//! not that a default applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// `filter[limit]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitQueryPart {
    pub limit_to: u64,
}

/// `filter[skip]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipQueryPart {
    pub skip_over: u64,
}

/// Sort direction of an order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<field> <direction>` entry of an order filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQueryPartItem {
    pub field_name: String,
    pub direction: SortDirection,
}

/// `filter[order]`: entries in the order they appeared in the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQueryPart {
    pub order_by: Vec<OrderQueryPartItem>,
}

/// Comparison operator of a where part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhereOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Nlike,
    Inq,
    Nin,
    Between,
}

impl WhereOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::Nlike => "nlike",
            Self::Inq => "inq",
            Self::Nin => "nin",
            Self::Between => "between",
        }
    }
}

impl FromStr for WhereOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "like" => Ok(Self::Like),
            "nlike" => Ok(Self::Nlike),
            "inq" => Ok(Self::Inq),
            "nin" => Ok(Self::Nin),
            "between" => Ok(Self::Between),
            _ => Err(FilterError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for WhereOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `filter[where][<field>][<operator>]=<value>`.
///
/// The value is kept as the raw string; it is not checked against the
/// column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereQueryPart {
    pub field_name: String,
    pub operator: WhereOperator,
    pub value: String,
}

/// `filter[fields]`: projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsQueryPart {
    pub included: Vec<String>,
    pub excluded: Vec<String>,
}

impl FieldsQueryPart {
    /// Append another part's fields, skipping names already listed.
    ///
    /// The later part wins for a field named in both: including a field drops
    /// it from `excluded` and excluding it drops it from `included`.
    pub fn merge(&mut self, other: FieldsQueryPart) {
        for field in other.included {
            self.excluded.retain(|f| *f != field);
            if !self.included.contains(&field) {
                self.included.push(field);
            }
        }
        for field in other.excluded {
            self.included.retain(|f| *f != field);
            if !self.excluded.contains(&field) {
                self.excluded.push(field);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }
}
