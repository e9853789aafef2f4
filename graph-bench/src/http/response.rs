// Decoding of `get-degrees` response bodies
use serde_json::Value;

use crate::errors::BackendError;
use crate::models::Degrees;

/// Distance the graph service reports when its bounded search finds no
/// common neighbourhood. Anything at or above it means "no path".
pub const NO_PATH_SENTINEL: i64 = 1_000_000_000_000;

/// Parse a `get-degrees` body into [`Degrees`].
///
/// Accepts a bare integer, `null`, an empty body, or JSON in the form of a
/// number, `null`, or an object with a `degrees` or `distance` field.
pub fn parse_degrees(body: &str) -> Result<Degrees, BackendError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Degrees::NoPath);
    }
    if let Ok(n) = body.parse::<i64>() {
        return Ok(from_distance(n));
    }

    let value: Value = serde_json::from_str(body).map_err(|_| unexpected(body))?;
    match &value {
        Value::Null => Ok(Degrees::NoPath),
        Value::Number(_) => from_json_number(&value).ok_or_else(|| unexpected(body)),
        Value::Object(map) => match map.get("degrees").or_else(|| map.get("distance")) {
            Some(Value::Null) => Ok(Degrees::NoPath),
            Some(n @ Value::Number(_)) => from_json_number(n).ok_or_else(|| unexpected(body)),
            _ => Err(unexpected(body)),
        },
        _ => Err(unexpected(body)),
    }
}

fn from_json_number(value: &Value) -> Option<Degrees> {
    if let Some(n) = value.as_i64() {
        return Some(from_distance(n));
    }
    // Integers beyond i64 are past the sentinel anyway.
    value.as_u64().map(|_| Degrees::NoPath)
}

fn from_distance(n: i64) -> Degrees {
    if (0..NO_PATH_SENTINEL).contains(&n) {
        Degrees::Path(n as u64)
    } else {
        Degrees::NoPath
    }
}

fn unexpected(body: &str) -> BackendError {
    let preview: String = body.chars().take(64).collect();
    BackendError::backend(format!("unexpected get-degrees response: {:?}", preview))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse_degrees("3").unwrap(), Degrees::Path(3));
        assert_eq!(parse_degrees(" 0\n").unwrap(), Degrees::Path(0));
    }

    #[test]
    fn test_sentinel_and_negative_mean_no_path() {
        assert_eq!(parse_degrees("1000000000000").unwrap(), Degrees::NoPath);
        assert_eq!(parse_degrees("-1").unwrap(), Degrees::NoPath);
        assert_eq!(parse_degrees("").unwrap(), Degrees::NoPath);
        assert_eq!(parse_degrees("null").unwrap(), Degrees::NoPath);
    }

    #[test]
    fn test_json_objects() {
        assert_eq!(parse_degrees(r#"{"degrees": 2}"#).unwrap(), Degrees::Path(2));
        assert_eq!(parse_degrees(r#"{"distance": 5}"#).unwrap(), Degrees::Path(5));
        assert_eq!(parse_degrees(r#"{"degrees": null}"#).unwrap(), Degrees::NoPath);
        assert_eq!(
            parse_degrees("18446744073709551615").unwrap(),
            Degrees::NoPath
        );
    }

    #[test]
    fn test_garbage_is_backend_error() {
        for body in ["key not found", r#"{"hops": 1}"#, "[1]", "2.5"] {
            let err = parse_degrees(body).unwrap_err();
            assert!(matches!(err, BackendError::Backend { .. }), "{}", body);
        }
    }
}
