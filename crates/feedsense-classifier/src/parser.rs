// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strict validation of classification JSON.
//!
//! Values are checked against their JSON type before their domain: an integer
//! score must arrive as a JSON integer and labels as exact lowercase strings.
//! Nothing is coerced. Keys outside the schema are ignored.

use std::str::FromStr;

use feedsense_core::{Aspect, Classification, SentimentScore, SentimentType};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Field name used when the whole value is rejected.
pub const ROOT_FIELD: &str = "$";

/// Parses completion text into a [`Classification`].
pub fn parse_response(raw: &str) -> Result<Classification, ParseError> {
    let value: Value = serde_json::from_str(raw).map_err(ParseError::Syntax)?;
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(ParseError::schema(
                ROOT_FIELD,
                format!("must be a JSON object, got {}", json_kind(&other)),
            ));
        }
    };

    Ok(Classification {
        sentiment_score: score_field(&object)?,
        sentiment_type: label_field(&object, "sentiment_type")?,
        aspect: label_field::<Aspect>(&object, "aspect")?,
    })
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ParseError> {
    object
        .get(field)
        .ok_or_else(|| ParseError::schema(field, "is missing"))
}

fn score_field(object: &Map<String, Value>) -> Result<SentimentScore, ParseError> {
    const FIELD: &str = "sentiment_score";
    let value = required(object, FIELD)?;
    let number = value
        .as_i64()
        .ok_or_else(|| ParseError::schema(FIELD, format!("must be an integer, got {}", json_kind(value))))?;
    SentimentScore::try_from(number).map_err(|_| {
        ParseError::schema(
            FIELD,
            format!(
                "{number} is outside {}..={}",
                SentimentScore::MIN,
                SentimentScore::MAX
            ),
        )
    })
}

fn label_field<T>(object: &Map<String, Value>, field: &'static str) -> Result<T, ParseError>
where
    T: FromStr + strum::IntoEnumIterator + std::fmt::Display,
{
    let value = required(object, field)?;
    let text = value
        .as_str()
        .ok_or_else(|| ParseError::schema(field, format!("must be a string, got {}", json_kind(value))))?;
    T::from_str(text).map_err(|_| {
        let allowed: Vec<String> = T::iter().map(|v| v.to_string()).collect();
        ParseError::schema(
            field,
            format!("`{text}` is not one of {}", allowed.join(", ")),
        )
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a float",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
