//! Query descriptors.
//!
//! A descriptor is one request's engine-agnostic intent: the filter parser
//! fills in its parts from the query string and an [`SqlQueryBuilder`]
//! turns it into SQL against a reflected table.
//!
//! [`SqlQueryBuilder`]: super::SqlQueryBuilder

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parts::{
    FieldsQueryPart, LimitQueryPart, OrderQueryPart, SkipQueryPart, WhereQueryPart,
};

/// Filter keyword inside `filter[...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    Fields,
    Where,
    Order,
    Limit,
    Skip,
}

impl FilterType {
    /// Recognise a lower-cased keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "fields" => Some(Self::Fields),
            "where" => Some(Self::Where),
            "order" => Some(Self::Order),
            "limit" => Some(Self::Limit),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fields => "fields",
            Self::Where => "where",
            Self::Order => "order",
            Self::Limit => "limit",
            Self::Skip => "skip",
        }
    }
}

/// A part parsed from one filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPart {
    Fields(FieldsQueryPart),
    Where(WhereQueryPart),
    Order(OrderQueryPart),
    Limit(LimitQueryPart),
    Skip(SkipQueryPart),
}

/// A descriptor the filter parser can populate.
pub trait FilterTarget {
    /// Name used in error messages, e.g. `findQuery`.
    const QUERY_KIND: &'static str;

    /// Whether `filter[<filter>]` is valid for this kind of query.
    fn accepts(filter: FilterType) -> bool;

    /// Store a parsed part. Scalar parts replace the previous value, where
    /// parts accumulate and fields parts merge.
    ///
    /// Only called with parts whose filter type [`accepts`](Self::accepts)
    /// returned true for.
    fn apply(&mut self, part: FilterPart);
}

fn merge_fields(slot: &mut Option<FieldsQueryPart>, part: FieldsQueryPart) {
    match slot {
        Some(existing) => existing.merge(part),
        None => *slot = Some(part),
    }
}

/// List query: `GET /models`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindQuery {
    pub fields: Option<FieldsQueryPart>,
    pub where_parts: Vec<WhereQueryPart>,
    pub order_by: Option<OrderQueryPart>,
    pub limit: Option<LimitQueryPart>,
    pub skip: Option<SkipQueryPart>,
}

impl FilterTarget for FindQuery {
    const QUERY_KIND: &'static str = "findQuery";

    fn accepts(_filter: FilterType) -> bool {
        true
    }

    fn apply(&mut self, part: FilterPart) {
        match part {
            FilterPart::Fields(fields) => merge_fields(&mut self.fields, fields),
            FilterPart::Where(where_part) => self.where_parts.push(where_part),
            FilterPart::Order(order) => self.order_by = Some(order),
            FilterPart::Limit(limit) => self.limit = Some(limit),
            FilterPart::Skip(skip) => self.skip = Some(skip),
        }
    }
}

/// Single-row query: the first match of a find, so no limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOneQuery {
    pub fields: Option<FieldsQueryPart>,
    pub where_parts: Vec<WhereQueryPart>,
    pub order_by: Option<OrderQueryPart>,
    pub skip: Option<SkipQueryPart>,
}

impl FilterTarget for FindOneQuery {
    const QUERY_KIND: &'static str = "findOneQuery";

    fn accepts(filter: FilterType) -> bool {
        filter != FilterType::Limit
    }

    fn apply(&mut self, part: FilterPart) {
        match part {
            FilterPart::Fields(fields) => merge_fields(&mut self.fields, fields),
            FilterPart::Where(where_part) => self.where_parts.push(where_part),
            FilterPart::Order(order) => self.order_by = Some(order),
            FilterPart::Skip(skip) => self.skip = Some(skip),
            FilterPart::Limit(_) => {}
        }
    }
}

/// `GET /models/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindByIdQuery {
    pub model_id: String,
    pub fields: Option<FieldsQueryPart>,
}

impl FindByIdQuery {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            fields: None,
        }
    }
}

impl FilterTarget for FindByIdQuery {
    const QUERY_KIND: &'static str = "findByIdQuery";

    fn accepts(filter: FilterType) -> bool {
        filter == FilterType::Fields
    }

    fn apply(&mut self, part: FilterPart) {
        if let FilterPart::Fields(fields) = part {
            merge_fields(&mut self.fields, fields);
        }
    }
}

/// `GET /models/count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountQuery {
    pub where_parts: Vec<WhereQueryPart>,
}

impl FilterTarget for CountQuery {
    const QUERY_KIND: &'static str = "countQuery";

    fn accepts(filter: FilterType) -> bool {
        filter == FilterType::Where
    }

    fn apply(&mut self, part: FilterPart) {
        if let FilterPart::Where(where_part) = part {
            self.where_parts.push(where_part);
        }
    }
}

/// `HEAD /models/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsQuery {
    pub model_id: String,
}

/// `POST /models`. Column values keyed by field name, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertQuery {
    pub data: IndexMap<String, String>,
}

/// `PUT /models/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateByIdQuery {
    pub model_id: String,
    pub data: IndexMap<String, String>,
}

/// Bulk update of every row matching the where parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuery {
    pub data: IndexMap<String, String>,
    pub where_parts: Vec<WhereQueryPart>,
}

impl FilterTarget for UpdateQuery {
    const QUERY_KIND: &'static str = "updateQuery";

    fn accepts(filter: FilterType) -> bool {
        filter == FilterType::Where
    }

    fn apply(&mut self, part: FilterPart) {
        if let FilterPart::Where(where_part) = part {
            self.where_parts.push(where_part);
        }
    }
}

/// `DELETE /models/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyByIdQuery {
    pub model_id: String,
}

/// Bulk delete of every row matching the where parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyQuery {
    pub where_parts: Vec<WhereQueryPart>,
}

impl FilterTarget for DestroyQuery {
    const QUERY_KIND: &'static str = "destroyQuery";

    fn accepts(filter: FilterType) -> bool {
        filter == FilterType::Where
    }

    fn apply(&mut self, part: FilterPart) {
        if let FilterPart::Where(where_part) = part {
            self.where_parts.push(where_part);
        }
    }
}
