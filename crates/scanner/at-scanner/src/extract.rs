//! JSON field extraction.
//!
//! Object content is decoded into a generic [`serde_json::Value`] and then
//! checked explicitly: the top level must be an object and the field must
//! hold a string.

use at_error::{FieldError, Result, ScanError};
use serde_json::Value;

use crate::ExtractedRecord;

/// Parse `data` as a JSON object and read the string value of `field`.
///
/// Malformed JSON fails with [`ScanError::Parse`]; a non-object top level,
/// a missing field or a non-string field fails with [`ScanError::Field`].
pub fn extract_field(key: &str, data: &[u8], field: &str) -> Result<ExtractedRecord> {
    let value: Value = serde_json::from_slice(data).map_err(|e| ScanError::parse(key, e))?;
    let extracted = field_value(&value, field).map_err(|e| ScanError::field(key, e))?;

    Ok(ExtractedRecord {
        key: key.to_string(),
        value: extracted.to_string(),
    })
}

/// Look up a top-level string field.
pub fn field_value<'v>(
    value: &'v Value,
    field: &str,
) -> std::result::Result<&'v str, FieldError> {
    let object = value.as_object().ok_or(FieldError::NotAnObject {
        found: json_type_name(value),
    })?;

    let field_value = object.get(field).ok_or_else(|| FieldError::Missing {
        field: field.to_string(),
    })?;

    field_value.as_str().ok_or_else(|| FieldError::WrongType {
        field: field.to_string(),
        found: json_type_name(field_value),
    })
}

/// Describe the JSON type of a value for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_string_field() {
        let record = extract_field("a.json", br#"{"attribute": "foo"}"#, "attribute").unwrap();

        assert_eq!(
            record,
            ExtractedRecord {
                key: "a.json".to_string(),
                value: "foo".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_ignores_other_fields() {
        let data = br#"{"id": 7, "attribute": "bar", "nested": {"attribute": "no"}}"#;
        let record = extract_field("b.json", data, "attribute").unwrap();

        assert_eq!(record.value, "bar");
    }

    #[test]
    fn test_extract_custom_field_name() {
        let data = br#"{"name": "x", "attribute": "y"}"#;
        let record = extract_field("c.json", data, "name").unwrap();

        assert_eq!(record.value, "x");
    }

    #[test]
    fn test_extract_empty_and_unicode_strings() {
        assert_eq!(
            extract_field("k", br#"{"attribute": ""}"#, "attribute")
                .unwrap()
                .value,
            ""
        );
        assert_eq!(
            extract_field("k", "{\"attribute\": \"caf\u{e9} \\u2603\"}".as_bytes(), "attribute")
                .unwrap()
                .value,
            "caf\u{e9} \u{2603}"
        );
    }

    #[test]
    fn test_extract_wrong_type() {
        let err = extract_field("n.json", br#"{"attribute": 42}"#, "attribute").unwrap_err();

        match err {
            ScanError::Field { key, source } => {
                assert_eq!(key, "n.json");
                assert_eq!(
                    source,
                    FieldError::WrongType {
                        field: "attribute".to_string(),
                        found: "a number",
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extract_null_is_wrong_type() {
        let err = extract_field("k", br#"{"attribute": null}"#, "attribute").unwrap_err();

        assert!(matches!(
            err,
            ScanError::Field {
                source: FieldError::WrongType { found: "null", .. },
                ..
            }
        ));
    }

    #[test]
    fn test_extract_missing_field() {
        let err = extract_field("e.json", b"{}", "attribute").unwrap_err();

        assert!(matches!(
            err,
            ScanError::Field {
                source: FieldError::Missing { .. },
                ..
            }
        ));
        assert!(err.to_string().contains("e.json"));
    }

    #[test]
    fn test_extract_non_object_top_level() {
        let cases: [(&[u8], &str); 5] = [
            (b"[1, 2]", "an array"),
            (b"\"attribute\"", "a string"),
            (b"3.5", "a number"),
            (b"true", "a boolean"),
            (b"null", "null"),
        ];

        for (data, found) in cases {
            let err = extract_field("k", data, "attribute").unwrap_err();
            match err {
                ScanError::Field {
                    source: FieldError::NotAnObject { found: actual },
                    ..
                } => assert_eq!(actual, found),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_extract_malformed_json() {
        let inputs: [&[u8]; 4] = [b"", b"{", b"{\"attribute\": \"x\",}", b"not json"];

        for data in inputs {
            let err = extract_field("bad.json", data, "attribute").unwrap_err();
            assert!(matches!(err, ScanError::Parse { .. }), "input: {data:?}");
        }
    }
}
