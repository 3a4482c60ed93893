//! Identifier casing, pluralization and database type mapping.
//!
//! Everything in this module is a pure function over strings. The schema
//! assembler uses it to turn raw catalog names (`customer_order`, `ip4_addr`)
//! into model and field names (`CustomerOrder`, `Ip4Addr`) and to map raw
//! database types onto a small set of generic field types.

use std::fmt;

use inflector::Inflector;
use serde::{Deserialize, Serialize};

/// Irregular plurals the inflector gets wrong for table names.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("potato", "potatoes"),
    ("hero", "heroes"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
];

/// Convert a raw identifier to PascalCase.
///
/// Any character that is not an ASCII letter or digit is a segment boundary
/// and is dropped. A digit is kept and also ends the current segment, so the
/// next letter is capitalised. Letters inside a segment are lower-cased.
///
/// ```
/// use dbmeta::naming::to_capital_case;
///
/// assert_eq!(to_capital_case("customer_id"), "CustomerId");
/// assert_eq!(to_capital_case("ip4_addr"), "Ip4Addr");
/// assert_eq!(to_capital_case("HTTPStatus"), "Httpstatus");
/// ```
pub fn to_capital_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut segment_start = true;

    for ch in name.chars() {
        if ch.is_ascii_alphabetic() {
            if segment_start {
                result.push(ch.to_ascii_uppercase());
                segment_start = false;
            } else {
                result.push(ch.to_ascii_lowercase());
            }
        } else if ch.is_ascii_digit() {
            result.push(ch);
            segment_start = true;
        } else {
            segment_start = true;
        }
    }

    result
}

/// Pluralize a word, handling irregulars first then falling back to inflector.
///
/// Words that are already a known irregular plural are returned unchanged.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *singular || lower == *plural {
            return plural.to_string();
        }
    }

    word.to_plural()
}

/// Generic field type a raw database type maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int64,
    Int,
    String,
    DateTime,
    Float64,
    Bool,
}

impl FieldType {
    /// Map a raw database type name onto a generic field type.
    ///
    /// Matching is case-insensitive and only looks at the base type name:
    /// anything after the first whitespace or `(` is a modifier and ignored,
    /// so `character varying(255)` and `CHARACTER VARYING` both map through
    /// `character`. Unrecognized types map to [`FieldType::String`].
    pub fn from_data_type(data_type: &str) -> Self {
        let base = data_type
            .trim()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match base.as_str() {
            "bigint" => FieldType::Int64,
            "int" | "integer" | "smallint" => FieldType::Int,
            "character" | "text" => FieldType::String,
            "timestamp" => FieldType::DateTime,
            "numeric" => FieldType::Float64,
            "boolean" => FieldType::Bool,
            _ => FieldType::String,
        }
    }

    /// Lower-case name used in generated code and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int64 => "int64",
            FieldType::Int => "int",
            FieldType::String => "string",
            FieldType::DateTime => "datetime",
            FieldType::Float64 => "float64",
            FieldType::Bool => "bool",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
