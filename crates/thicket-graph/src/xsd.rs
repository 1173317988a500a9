//! XML Schema datatypes for literal values
//!
//! Literals carry their datatype as a prefixed name such as `xsd:integer`.
//! [`Xsd`] covers the built-in datatypes the pipeline understands and
//! checks whether a lexical value belongs to a datatype's value space.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

static INTEGER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").ok());
static DECIMAL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").ok());
static FLOATING: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^([+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([Ee][+-]?[0-9]+)?|[+-]?INF|NaN)$").ok()
});
static ABSOLUTE_IRI: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").ok());

fn matches(pattern: &Lazy<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(value))
}

/// Built-in datatype
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Xsd {
    #[serde(rename = "xsd:string")]
    String,
    #[serde(rename = "xsd:boolean")]
    Boolean,
    #[serde(rename = "xsd:integer")]
    Integer,
    #[serde(rename = "xsd:decimal")]
    Decimal,
    #[serde(rename = "xsd:float")]
    Float,
    #[serde(rename = "xsd:double")]
    Double,
    #[serde(rename = "xsd:date")]
    Date,
    #[serde(rename = "xsd:dateTime")]
    DateTime,
    #[serde(rename = "xsd:anyURI")]
    AnyUri,
}

impl Xsd {
    /// All built-in datatypes
    pub const ALL: [Self; 9] = [
        Self::String,
        Self::Boolean,
        Self::Integer,
        Self::Decimal,
        Self::Float,
        Self::Double,
        Self::Date,
        Self::DateTime,
        Self::AnyUri,
    ];

    /// Prefixed name, e.g. `xsd:integer`
    #[must_use]
    pub const fn prefixed_uri(self) -> &'static str {
        match self {
            Self::String => "xsd:string",
            Self::Boolean => "xsd:boolean",
            Self::Integer => "xsd:integer",
            Self::Decimal => "xsd:decimal",
            Self::Float => "xsd:float",
            Self::Double => "xsd:double",
            Self::Date => "xsd:date",
            Self::DateTime => "xsd:dateTime",
            Self::AnyUri => "xsd:anyURI",
        }
    }

    /// Look up a datatype by prefixed name
    #[must_use]
    pub fn from_prefixed_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|xsd| xsd.prefixed_uri() == uri)
    }

    /// Whether values of this datatype are numbers
    #[inline]
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal | Self::Float | Self::Double)
    }

    /// Check whether `value` is in the value space of this datatype
    #[must_use]
    pub fn can_parse(self, value: &str) -> bool {
        match self {
            Self::String => true,
            Self::Boolean => matches!(value, "true" | "false" | "1" | "0"),
            Self::Integer => matches(&INTEGER, value),
            Self::Decimal => matches(&DECIMAL, value),
            Self::Float | Self::Double => matches(&FLOATING, value),
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            Self::DateTime => {
                DateTime::parse_from_rfc3339(value).is_ok()
                    || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
            }
            Self::AnyUri => !value.is_empty() && !value.chars().any(char::is_whitespace),
        }
    }
}

impl Display for Xsd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefixed_uri())
    }
}

/// Default datatype of literals without an explicit one
pub const DEFAULT_DATATYPE: &str = "xsd:string";

/// Check whether a datatype reference is usable for a literal
///
/// Built-in prefixed names and absolute IRIs are accepted.
#[must_use]
pub fn is_valid_datatype(datatype: &str) -> bool {
    Xsd::from_prefixed_uri(datatype).is_some() || matches(&ABSOLUTE_IRI, datatype)
}

/// Check whether a value fits the given datatype reference
///
/// Datatypes outside the built-in set are not checked.
#[must_use]
pub fn label_matches_datatype(label: &str, datatype: &str) -> bool {
    Xsd::from_prefixed_uri(datatype).map_or(true, |xsd| xsd.can_parse(label))
}

/// Check whether a string is an absolute IRI
#[must_use]
pub fn is_absolute_iri(value: &str) -> bool {
    matches(&ABSOLUTE_IRI, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_parse() {
        assert!(Xsd::Integer.can_parse("100"));
        assert!(Xsd::Integer.can_parse("-7"));
        assert!(!Xsd::Integer.can_parse("1.5"));
        assert!(!Xsd::Integer.can_parse("ten"));
    }

    #[test]
    fn decimals_and_doubles_parse() {
        assert!(Xsd::Decimal.can_parse("10.25"));
        assert!(!Xsd::Decimal.can_parse("1e3"));
        assert!(Xsd::Double.can_parse("1e3"));
        assert!(Xsd::Float.can_parse("NaN"));
    }

    #[test]
    fn dates_parse() {
        assert!(Xsd::Date.can_parse("2024-02-29"));
        assert!(!Xsd::Date.can_parse("2023-02-29"));
        assert!(Xsd::DateTime.can_parse("2024-01-01T10:00:00Z"));
        assert!(Xsd::DateTime.can_parse("2024-01-01T10:00:00"));
    }

    #[test]
    fn booleans_parse() {
        assert!(Xsd::Boolean.can_parse("true"));
        assert!(!Xsd::Boolean.can_parse("yes"));
    }

    #[test]
    fn prefixed_names_round_trip() {
        for xsd in Xsd::ALL {
            assert_eq!(Xsd::from_prefixed_uri(xsd.prefixed_uri()), Some(xsd));
        }
        assert_eq!(Xsd::from_prefixed_uri("xsd:nope"), None);
    }

    #[test]
    fn datatype_validity() {
        assert!(is_valid_datatype("xsd:integer"));
        assert!(is_valid_datatype("http://example.org/type"));
        assert!(!is_valid_datatype("not a datatype"));
    }

    #[test]
    fn custom_datatypes_accept_any_label() {
        assert!(label_matches_datatype("anything", "http://example.org/type"));
        assert!(!label_matches_datatype("abc", "xsd:integer"));
    }
}
