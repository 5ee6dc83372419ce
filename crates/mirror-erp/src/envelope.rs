//! ERP response envelope handling
//!
//! The ERP service wraps collections in one of three shapes:
//! 1. `{"d": {"results": [...]}}`
//! 2. `{"d": [...]}`
//! 3. a bare `[...]`
//!
//! All three normalize to one flat list. Anything else (no list found, `null`,
//! an empty body) is a valid zero-record result. List entries that are not JSON
//! objects cannot be mapped and are skipped.

use mirror_api::RawUpstreamRecord;
use serde_json::Value;
use tracing::warn;

/// Decode a response body and extract its records.
pub fn parse_records(body: &str) -> Result<Vec<RawUpstreamRecord>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let payload: Value = serde_json::from_str(body)?;
    Ok(extract_records(payload))
}

pub fn extract_records(payload: Value) -> Vec<RawUpstreamRecord> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("d") {
            Some(Value::Object(mut d)) => match d.remove("results") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let total = items.len();
    let records: Vec<RawUpstreamRecord> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect();

    if records.len() != total {
        warn!(
            "[ErpClient] Skipped {} non-object entries in upstream payload",
            total - records.len()
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbers(records: &[RawUpstreamRecord]) -> Vec<Value> {
        records.iter().map(|r| r["InvoiceNumber"].clone()).collect()
    }

    #[test]
    fn test_nested_results() {
        let records = extract_records(json!({
            "d": {"results": [{"InvoiceNumber": "A"}, {"InvoiceNumber": "B"}], "__count": "2"}
        }));
        assert_eq!(numbers(&records), vec![json!("A"), json!("B")]);
    }

    #[test]
    fn test_list_directly_under_d() {
        let records = extract_records(json!({"d": [{"InvoiceNumber": "A"}]}));
        assert_eq!(numbers(&records), vec![json!("A")]);
    }

    #[test]
    fn test_bare_list() {
        let records = extract_records(json!([{"InvoiceNumber": "A"}, {"InvoiceNumber": "B"}]));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_absent_or_empty_is_zero_records() {
        assert!(extract_records(json!({})).is_empty());
        assert!(extract_records(json!({"d": {}})).is_empty());
        assert!(extract_records(json!({"d": {"results": []}})).is_empty());
        assert!(extract_records(json!({"d": null})).is_empty());
        assert!(extract_records(json!([])).is_empty());
        assert!(extract_records(Value::Null).is_empty());
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let records = extract_records(json!([{"InvoiceNumber": "A"}, 42, "x", null]));
        assert_eq!(numbers(&records), vec![json!("A")]);
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(parse_records("<html>maintenance</html>").is_err());
    }
}
