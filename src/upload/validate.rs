use anyhow::{anyhow, Result};
use serde_json::Value;

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format. Data should be an array of objects.";
pub const CSV_ONLY_MESSAGE: &str = "Only CSV files are supported";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";
pub const FILE_UPLOAD_ERROR_MESSAGE: &str = "Failed to upload file. Please try again.";
pub const JSON_UPLOAD_ERROR_MESSAGE: &str = "Failed to upload JSON data. Please try again.";

/// True for any non-empty JSON array. Elements are not checked against each other.
pub fn is_valid_json_array(text: &str) -> bool {
    parse_records(text).is_ok()
}

pub fn parse_records(text: &str) -> Result<Vec<Value>> {
    if text.trim().is_empty() {
        return Err(anyhow!("no data"));
    }
    match serde_json::from_str::<Value>(text)? {
        Value::Array(records) if !records.is_empty() => Ok(records),
        Value::Array(_) => Err(anyhow!("array is empty")),
        _ => Err(anyhow!("expected a JSON array")),
    }
}

/// Case-sensitive, like the browser's file picker filter it backs up.
pub fn has_csv_suffix(name: &str) -> bool {
    name.ends_with(".csv")
}

/// Message shown after the server answered with a non-success status.
pub fn server_failure_message(message: &str) -> String {
    if message.is_empty() {
        UPLOAD_FAILED_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_unparsable_text() {
        assert!(!is_valid_json_array(""));
        assert!(!is_valid_json_array("  \n\t"));
        assert!(!is_valid_json_array("[{\"a\":1}"));
        assert!(!is_valid_json_array("not json"));
    }

    #[test]
    fn rejects_non_arrays_and_empty_arrays() {
        assert!(!is_valid_json_array(r#"{"a":1}"#));
        assert!(!is_valid_json_array("42"));
        assert!(!is_valid_json_array("\"[1]\""));
        assert!(!is_valid_json_array("null"));
        assert!(!is_valid_json_array("[]"));
        assert!(!is_valid_json_array("  [ ]  "));
    }

    #[test]
    fn accepts_any_non_empty_array_regardless_of_element_shape() {
        assert!(is_valid_json_array(r#"[{"a":1}]"#));
        assert!(is_valid_json_array(r#"[{"a":1},{"b":"x","c":null}]"#));
        assert!(is_valid_json_array("[1, \"two\", null]"));
        assert!(is_valid_json_array("[[]]"));
    }

    #[test]
    fn parse_records_returns_the_elements() {
        let records = parse_records(
            r#"[{"name":"Product A","price":10.99},{"name":"Product B","price":24.99}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], "Product B");
    }

    #[test]
    fn csv_suffix_is_case_sensitive() {
        assert!(has_csv_suffix("sales.csv"));
        assert!(has_csv_suffix("archive.tar.csv"));
        assert!(!has_csv_suffix("sales.CSV"));
        assert!(!has_csv_suffix("sales.csv.txt"));
        assert!(!has_csv_suffix("sales.json"));
        assert!(!has_csv_suffix("csv"));
    }

    #[test]
    fn server_failure_falls_back_to_generic_text() {
        assert_eq!(server_failure_message(""), UPLOAD_FAILED_MESSAGE);
        assert_eq!(server_failure_message("Bad columns"), "Bad columns");
    }
}
