//! Tolerant JSON decoding.
//!
//! Backend payloads are decoded with unknown keys ignored, and the helpers
//! here coerce loosely-typed scalars instead of failing the whole response:
//! numeric strings become integers, numbers become strings, string booleans
//! become bools, and `null` becomes the field's default.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

use crate::error::ApiError;

/// Decode a response body, mapping failures to [`ApiError::Decode`].
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::decode(e.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

/// `null` for a non-optional field decodes as its default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `7`, `7.0` or `"7"`.
pub fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Scalar::Unsigned(n)) => Ok(n),
        Some(Scalar::Signed(n)) => u64::try_from(n).map_err(D::Error::custom),
        Some(Scalar::Float(f)) if f.fract() == 0.0 && f >= 0.0 => Ok(f as u64),
        Some(Scalar::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<u64>()
                .map_err(|_| D::Error::custom(format!("expected integer, got {s:?}")))
        }
        Some(_) => Err(D::Error::custom("expected integer")),
    }
}

/// Accepts `12.5`, `"12.5"` or `null` (as `None`).
pub fn f64_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Unsigned(n)) => Ok(Some(n as f64)),
        Some(Scalar::Signed(n)) => Ok(Some(n as f64)),
        Some(Scalar::Float(f)) => Ok(Some(f)),
        Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Scalar::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected number, got {s:?}"))),
        Some(Scalar::Bool(_)) => Err(D::Error::custom("expected number")),
    }
}

/// Accepts any scalar and renders it as text; `null` is the empty string.
pub fn string_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Unsigned(n)) => n.to_string(),
        Some(Scalar::Signed(n)) => n.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
    })
}

/// Accepts `true`, `"true"`, `1` and their negatives; `null` is `false`.
pub fn bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Scalar::Bool(b)) => Ok(b),
        Some(Scalar::Unsigned(n)) => Ok(n != 0),
        Some(Scalar::Signed(n)) => Ok(n != 0),
        Some(Scalar::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(D::Error::custom(format!("expected boolean, got {other:?}"))),
        },
        Some(Scalar::Float(_)) => Err(D::Error::custom("expected boolean")),
    }
}
