//! Purpose: JSON mediation for structured/variant values crossing the boundary.
//! Exports: `Variant`, `VariantMap`, `parse`, `parse_map`, `parse_array`, `to_bytes`.
//! Role: Single decode/encode seam so callsites never hand-roll JSON handling.
//! Invariants: Inputs are byte-exact UTF-8 of known length; no terminator is assumed.
//! Notes: Callers pass a short context label that ends up in the error text.
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{Error, ErrorKind, Result};

pub type Variant = Value;
pub type VariantMap = Map<String, Value>;

pub fn parse(bytes: &[u8], context: &str) -> Result<Variant> {
    let text = std::str::from_utf8(bytes).map_err(|err| {
        Error::new(ErrorKind::Conversion)
            .with_message(format!("{context}: invalid json utf-8"))
            .with_source(err)
    })?;
    serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::Conversion)
            .with_message(format!("{context}: invalid json"))
            .with_source(err)
    })
}

pub fn parse_map(bytes: &[u8], context: &str) -> Result<VariantMap> {
    match parse(bytes, context)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::new(ErrorKind::Conversion)
            .with_message(format!("{context}: expected object, got {}", type_name(&other)))),
    }
}

pub fn parse_array(bytes: &[u8], context: &str) -> Result<Vec<Variant>> {
    match parse(bytes, context)? {
        Value::Array(items) => Ok(items),
        other => Err(Error::new(ErrorKind::Conversion)
            .with_message(format!("{context}: expected array, got {}", type_name(&other)))),
    }
}

pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to serialize value")
            .with_source(err)
    })
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn representative_tree_survives_encode_decode() {
        let tree = json!({
            "none": null,
            "flag": true,
            "count": 42,
            "ratio": -0.5,
            "name": "coffee \u{2615}",
            "list": [1, "two", [false], {}],
            "nested": {"inner": {"k": "v"}},
        });
        let bytes = to_bytes(&tree).expect("encode");
        assert_eq!(parse(&bytes, "tree").expect("decode"), tree);
    }

    #[test]
    fn key_order_is_preserved() {
        let map = parse_map(br#"{"z":1,"a":2,"m":3}"#, "attrs").expect("map");
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn malformed_json_is_a_conversion_error() {
        let err = parse(br#"{"a":}"#, "hint").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(err.to_string().starts_with("Conversion: hint: invalid json"));
    }

    #[test]
    fn invalid_utf8_is_a_conversion_error() {
        let err = parse(&[0xff, b'1'], "settings").unwrap_err();
        assert_eq!(err.message(), Some("settings: invalid json utf-8"));
    }

    #[test]
    fn shape_checks_name_the_actual_type() {
        let err = parse_map(b"[1]", "location").unwrap_err();
        assert_eq!(err.message(), Some("location: expected object, got array"));
        let err = parse_array(b"{}", "filters").unwrap_err();
        assert_eq!(err.message(), Some("filters: expected array, got object"));
    }
}
