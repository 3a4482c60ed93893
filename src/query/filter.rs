//! URL filter language parser.
//!
//! Parses bracket-addressed query string keys into query parts:
//!
//! ```text
//! filter[limit]=10
//! filter[skip]=20
//! filter[order]=name ASC,created_at DESC
//! filter[fields]=id,name
//! filter[fields][secret]=false
//! filter[where][age][gte]=18
//! ```
//!
//! The keyword inside the first bracket is matched case-insensitively and
//! surrounding whitespace is ignored. Keys that are not `filter[...]` at all
//! belong to other parameters and are skipped.

use log::trace;
use regex::Regex;

use super::descriptors::{
    CountQuery, DestroyQuery, FilterPart, FilterTarget, FilterType, FindByIdQuery, FindOneQuery,
    FindQuery, UpdateQuery,
};
use super::error::{FilterError, FilterResult};
use super::parts::{
    FieldsQueryPart, LimitQueryPart, OrderQueryPart, OrderQueryPartItem, SkipQueryPart,
    SortDirection, WhereQueryPart,
};
use super::values::QueryValues;

/// `filter[<type>]` optionally followed by `[<segment>]...`.
/// The keyword is ASCII word characters only.
const FILTER_KEY_PATTERN: &str =
    r"(?i)^\s*filter\s*\[\s*((?-u:\w)*)\s*\]((?:\s*\[[^\[\]]*\])*)\s*$";
/// One trailing path segment.
const PATH_SEGMENT_PATTERN: &str = r"\[\s*([^\[\]]*?)\s*\]";
/// One `<field> <ASC|DESC>` entry of an order value, ASCII word characters
/// and boundaries.
const ORDER_ITEM_PATTERN: &str = r"(?i-u)\b(\w+)\s+(asc|desc)\b";

/// A key recognised as `filter[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    /// Lower-cased keyword of the first bracket.
    pub filter_type: String,
    /// Trimmed contents of the remaining brackets.
    pub path: Vec<String>,
}

/// One match of the order item pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderCapture<'a> {
    field_name: &'a str,
    direction: &'a str,
}

/// Parser for `filter[...]` query string parameters.
///
/// Patterns are compiled once in [`FilterParser::new`] and never mutated, so a
/// parser can be shared between threads or owned per caller.
#[derive(Debug, Clone)]
pub struct FilterParser {
    filter_key: Regex,
    path_segment: Regex,
    order_item: Regex,
}

impl Default for FilterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterParser {
    pub fn new() -> Self {
        Self {
            filter_key: Regex::new(FILTER_KEY_PATTERN).expect("filter key pattern is valid"),
            path_segment: Regex::new(PATH_SEGMENT_PATTERN).expect("path segment pattern is valid"),
            order_item: Regex::new(ORDER_ITEM_PATTERN).expect("order item pattern is valid"),
        }
    }

    /// Populate a find query.
    pub fn parse_find_query(&self, query: &mut FindQuery, values: &QueryValues) -> FilterResult<()> {
        self.parse_query_string(query, values)
    }

    /// Populate a find-by-id query; only `fields` is accepted.
    pub fn parse_find_by_id_query(
        &self,
        query: &mut FindByIdQuery,
        values: &QueryValues,
    ) -> FilterResult<()> {
        self.parse_query_string(query, values)
    }

    /// Populate a find-one query; everything but `limit` is accepted.
    pub fn parse_find_one_query(
        &self,
        query: &mut FindOneQuery,
        values: &QueryValues,
    ) -> FilterResult<()> {
        self.parse_query_string(query, values)
    }

    /// Populate a count query; only `where` is accepted.
    pub fn parse_count_query(&self, query: &mut CountQuery, values: &QueryValues) -> FilterResult<()> {
        self.parse_query_string(query, values)
    }

    /// Populate the where parts of a bulk update.
    pub fn parse_update_query(
        &self,
        query: &mut UpdateQuery,
        values: &QueryValues,
    ) -> FilterResult<()> {
        self.parse_query_string(query, values)
    }

    /// Populate the where parts of a bulk delete.
    pub fn parse_destroy_query(
        &self,
        query: &mut DestroyQuery,
        values: &QueryValues,
    ) -> FilterResult<()> {
        self.parse_query_string(query, values)
    }

    /// Populate any descriptor from the filter keys of a query string.
    ///
    /// Keys are visited in first-appearance order and each value of a key is
    /// parsed separately. For scalar parts (`limit`, `skip`, `order`) the last
    /// value wins, and a field flagged more than once by `fields` keeps its
    /// last flag. The first error stops the parse; parts applied before it
    /// stay on `target`.
    pub fn parse_query_string<T: FilterTarget>(
        &self,
        target: &mut T,
        values: &QueryValues,
    ) -> FilterResult<()> {
        for (key, key_values) in values.iter() {
            let Some(filter_key) = self.parse_key(key) else {
                continue;
            };

            let filter_type = FilterType::from_keyword(&filter_key.filter_type)
                .filter(|filter_type| T::accepts(*filter_type))
                .ok_or_else(|| FilterError::unknown_filter(&filter_key.filter_type, T::QUERY_KIND))?;

            for value in key_values {
                trace!("{}: {} = {:?}", T::QUERY_KIND, key, value);
                if let Some(part) = self.parse_part(filter_type, key, &filter_key.path, value)? {
                    target.apply(part);
                }
            }
        }

        Ok(())
    }

    /// Recognise a `filter[...]` key. Returns `None` for unrelated keys.
    pub fn parse_key(&self, key: &str) -> Option<FilterKey> {
        let captures = self.filter_key.captures(key)?;
        let filter_type = captures.get(1).map_or("", |m| m.as_str()).to_lowercase();
        let path = captures
            .get(2)
            .map(|rest| {
                self.path_segment
                    .captures_iter(rest.as_str())
                    .filter_map(|segment| segment.get(1))
                    .map(|segment| segment.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default();

        Some(FilterKey { filter_type, path })
    }

    fn parse_part(
        &self,
        filter_type: FilterType,
        key: &str,
        path: &[String],
        value: &str,
    ) -> FilterResult<Option<FilterPart>> {
        match filter_type {
            FilterType::Fields => Ok(self.parse_fields(key, path, value)?.map(FilterPart::Fields)),
            FilterType::Where => Ok(Some(FilterPart::Where(self.parse_where(key, path, value)?))),
            FilterType::Order => {
                expect_no_path(key, path)?;
                Ok(self.parse_order(value).map(FilterPart::Order))
            }
            FilterType::Limit => {
                expect_no_path(key, path)?;
                Ok(Some(FilterPart::Limit(self.parse_limit(value)?)))
            }
            FilterType::Skip => {
                expect_no_path(key, path)?;
                Ok(Some(FilterPart::Skip(self.parse_skip(value)?)))
            }
        }
    }

    /// Parse a `filter[limit]` value.
    pub fn parse_limit(&self, value: &str) -> FilterResult<LimitQueryPart> {
        let limit_to = parse_count(FilterType::Limit, value)?;
        Ok(LimitQueryPart { limit_to })
    }

    /// Parse a `filter[skip]` value.
    pub fn parse_skip(&self, value: &str) -> FilterResult<SkipQueryPart> {
        let skip_over = parse_count(FilterType::Skip, value)?;
        Ok(SkipQueryPart { skip_over })
    }

    /// Parse a `filter[order]` value.
    ///
    /// Returns `None` when the value holds no `<field> <ASC|DESC>` entry.
    pub fn parse_order(&self, value: &str) -> Option<OrderQueryPart> {
        let order_by: Vec<OrderQueryPartItem> = self
            .order_item
            .captures_iter(value)
            .filter_map(|captures| {
                Some(OrderCapture {
                    field_name: captures.get(1)?.as_str(),
                    direction: captures.get(2)?.as_str(),
                })
            })
            .map(|capture| OrderQueryPartItem {
                field_name: capture.field_name.to_string(),
                direction: if capture.direction.eq_ignore_ascii_case("desc") {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            })
            .collect();

        if order_by.is_empty() {
            None
        } else {
            Some(OrderQueryPart { order_by })
        }
    }

    /// Parse a `filter[where][<field>][<operator>]` value.
    pub fn parse_where(&self, key: &str, path: &[String], value: &str) -> FilterResult<WhereQueryPart> {
        match path {
            [] => Err(FilterError::Unsupported {
                filter: FilterType::Where.as_str(),
                reason: "expected filter[where][<field>][<operator>]",
            }),
            [field_name, operator] if !field_name.is_empty() => Ok(WhereQueryPart {
                field_name: field_name.clone(),
                operator: operator.parse()?,
                value: value.to_string(),
            }),
            _ => Err(FilterError::InvalidPath(key.to_string())),
        }
    }

    /// Parse a `filter[fields]` value.
    ///
    /// `filter[fields]=a,b` includes the listed fields and
    /// `filter[fields][a]=true|false` includes or excludes one field. Returns
    /// `None` for an empty field list.
    pub fn parse_fields(
        &self,
        key: &str,
        path: &[String],
        value: &str,
    ) -> FilterResult<Option<FieldsQueryPart>> {
        match path {
            [] => {
                let included: Vec<String> = value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|field| !field.is_empty())
                    .map(str::to_string)
                    .collect();
                if included.is_empty() {
                    return Ok(None);
                }
                Ok(Some(FieldsQueryPart {
                    included,
                    excluded: Vec::new(),
                }))
            }
            [field_name] if !field_name.is_empty() => {
                let mut part = FieldsQueryPart::default();
                match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" => part.included.push(field_name.clone()),
                    "false" | "0" => part.excluded.push(field_name.clone()),
                    _ => {
                        return Err(FilterError::InvalidFlag {
                            key: key.to_string(),
                            value: value.to_string(),
                        })
                    }
                }
                Ok(Some(part))
            }
            _ => Err(FilterError::InvalidPath(key.to_string())),
        }
    }
}

fn expect_no_path(key: &str, path: &[String]) -> FilterResult<()> {
    if path.is_empty() {
        Ok(())
    } else {
        Err(FilterError::InvalidPath(key.to_string()))
    }
}

/// Parse an unsigned base-10 count. Only ASCII digits are accepted; the
/// leading `+` that `u64::from_str` tolerates is rejected.
fn parse_count(filter_type: FilterType, value: &str) -> FilterResult<u64> {
    let digits = if value.starts_with('+') { "+" } else { value };
    digits
        .parse::<u64>()
        .map_err(|source| FilterError::InvalidNumber {
            filter: filter_type.as_str(),
            value: value.to_string(),
            source,
        })
}
