//! Decode the `changes` array of a replace request / 解析替换请求
//!
//! The body is read as raw JSON so every structural problem can be reported with
//! the index of the offending entry instead of a generic deserialisation error.

use serde_json::Value;

use super::{Change, ChangeError, TextRange};

/// Parse `[{operation: "replace", range: {start, end}, text}]` / 解析changes数组
pub fn parse_changes(value: Option<&Value>) -> Result<Vec<Change>, ChangeError> {
    let items = match value.and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => return Err(ChangeError::Empty),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_one(index, item))
        .collect()
}

fn parse_one(index: usize, item: &Value) -> Result<Change, ChangeError> {
    if item.get("operation").and_then(Value::as_str) != Some("replace") {
        return Err(ChangeError::UnsupportedOperation { index });
    }

    let range = item.get("range");
    let start = range.and_then(|r| r.get("start")).and_then(Value::as_i64);
    let end = range.and_then(|r| r.get("end")).and_then(Value::as_i64);
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) => (s, e),
        _ => return Err(ChangeError::NonIntegerRange { index }),
    };

    let start = to_offset(index, "start", start)?;
    let end = to_offset(index, "end", end)?;

    let text = item
        .get("text")
        .and_then(Value::as_str)
        .ok_or(ChangeError::TextNotString { index })?;

    Ok(Change {
        range: TextRange { start, end },
        text: text.to_string(),
    })
}

fn to_offset(index: usize, field: &'static str, value: i64) -> Result<usize, ChangeError> {
    usize::try_from(value).map_err(|_| ChangeError::NegativeOffset { index, field, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_batch() {
        let body = json!([
            { "operation": "replace", "range": { "start": 0, "end": 5 }, "text": "Hi" },
            { "operation": "replace", "range": { "start": 6, "end": 6 }, "text": "" }
        ]);
        let changes = parse_changes(Some(&body)).unwrap();
        assert_eq!(changes, vec![Change::replace(0, 5, "Hi"), Change::replace(6, 6, "")]);
    }

    #[test]
    fn test_missing_or_empty_changes() {
        assert_eq!(parse_changes(None), Err(ChangeError::Empty));
        assert_eq!(parse_changes(Some(&json!([]))), Err(ChangeError::Empty));
        assert_eq!(parse_changes(Some(&json!({ "a": 1 }))), Err(ChangeError::Empty));
    }

    #[test]
    fn test_reports_offending_index() {
        let body = json!([
            { "operation": "replace", "range": { "start": 0, "end": 1 }, "text": "a" },
            { "operation": "insert", "range": { "start": 0, "end": 1 }, "text": "b" }
        ]);
        let err = parse_changes(Some(&body)).unwrap_err();
        assert_eq!(err, ChangeError::UnsupportedOperation { index: 1 });
        assert_eq!(err.to_string(), "changes[1].operation must be \"replace\"");
    }

    #[test]
    fn test_non_integer_and_negative_offsets() {
        let body = json!([{ "operation": "replace", "range": { "start": 1.5, "end": 2 }, "text": "" }]);
        assert_eq!(
            parse_changes(Some(&body)),
            Err(ChangeError::NonIntegerRange { index: 0 })
        );

        let body = json!([{ "operation": "replace", "range": { "start": "1", "end": 2 }, "text": "" }]);
        assert_eq!(
            parse_changes(Some(&body)),
            Err(ChangeError::NonIntegerRange { index: 0 })
        );

        let body = json!([{ "operation": "replace", "range": { "start": -1, "end": 2 }, "text": "" }]);
        let err = parse_changes(Some(&body)).unwrap_err();
        assert_eq!(
            err,
            ChangeError::NegativeOffset { index: 0, field: "start", value: -1 }
        );
        assert_eq!(err.to_string(), "changes[0].range.start -1 must not be negative");
    }

    #[test]
    fn test_text_must_be_string() {
        let body = json!([{ "operation": "replace", "range": { "start": 0, "end": 0 }, "text": 7 }]);
        assert_eq!(
            parse_changes(Some(&body)),
            Err(ChangeError::TextNotString { index: 0 })
        );
    }
}
