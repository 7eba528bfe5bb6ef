//! Lenient field deserializers for request bodies and query strings
//!
//! Form-driven clients send numbers as strings and leave unused query
//! parameters empty. Both helpers map a blank value to `None` and parse
//! anything else, so range checks still run on the parsed number.
//!
//! ```
//! use inventory_api::de::number_or_string;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Line {
//!     #[serde(default, deserialize_with = "number_or_string")]
//!     quantity: Option<i64>,
//! }
//!
//! let line: Line = serde_json::from_str(r#"{ "quantity": "2" }"#).unwrap();
//! assert_eq!(line.quantity, Some(2));
//! ```

use serde::{de, Deserialize, Deserializer};
use std::{fmt::Display, str::FromStr};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

fn parse_text<T, E>(text: &str) -> Result<Option<T>, E>
where
    T: FromStr,
    T::Err: Display,
    E: de::Error,
{
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    text.parse()
        .map(Some)
        .map_err(|e| E::custom(format!("invalid number '{text}': {e}")))
}

/// Accepts a JSON number or a numeric string; `null` and blank strings
/// are `None`
pub fn number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::String(text)) => parse_text(&text),
    }
}

/// Parses a query parameter, treating `?page=` like an absent parameter
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) => parse_text(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "number_or_string")]
        price: Option<f64>,

        #[serde(default, deserialize_with = "number_or_string")]
        quantity: Option<i64>,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        #[serde(default, deserialize_with = "empty_as_none")]
        page: Option<u32>,
    }

    fn body(value: serde_json::Value) -> Result<Body, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        let parsed = body(json!({ "price": "10.5", "quantity": " 3 " })).unwrap();
        assert_eq!(parsed.price, Some(10.5));
        assert_eq!(parsed.quantity, Some(3));

        let parsed = body(json!({ "price": 7, "quantity": -2 })).unwrap();
        assert_eq!(parsed.price, Some(7.0));
        assert_eq!(parsed.quantity, Some(-2));
    }

    #[test]
    fn test_blank_and_null_are_absent() {
        let parsed = body(json!({ "price": "", "quantity": null })).unwrap();
        assert_eq!(parsed.price, None);
        assert_eq!(parsed.quantity, None);

        let parsed = body(json!({})).unwrap();
        assert_eq!(parsed.quantity, None);
    }

    #[test]
    fn test_non_numeric_input_is_rejected() {
        assert!(body(json!({ "quantity": "two" })).is_err());
        assert!(body(json!({ "quantity": "2.5" })).is_err());
        assert!(body(json!({ "quantity": 2.5 })).is_err());
        assert!(body(json!({ "quantity": true })).is_err());
    }

    #[test]
    fn test_empty_query_value_is_absent() {
        let paging: Paging = serde_json::from_value(json!({ "page": "" })).unwrap();
        assert_eq!(paging.page, None);

        let paging: Paging = serde_json::from_value(json!({ "page": "4" })).unwrap();
        assert_eq!(paging.page, Some(4));

        assert!(serde_json::from_value::<Paging>(json!({ "page": "-1" })).is_err());
        assert!(serde_json::from_value::<Paging>(json!({ "page": "abc" })).is_err());
    }
}
