//! Tabular test data for parametrized cases.
//!
//! The data file is a YAML mapping of named sheets to row lists; each row
//! is a mapping of column name to value. Rows deserialize into typed
//! records, one record per parametrized test invocation.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::result::{EnsayoError, EnsayoResult};

/// One row of the `form_test` sheet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormRecord {
    /// Free text entered into the form
    pub text_input: String,
    /// Dropdown option value to select
    pub selected_dropdown: String,
    /// Date as present in the data source (`MM/DD/YYYY` or ISO)
    pub date: String,
    /// Radio button value to select
    pub select_radio: String,
}

impl FormRecord {
    /// The row's date reformatted to `YYYY-MM-DD`
    pub fn iso_date(&self) -> EnsayoResult<String> {
        reformat_date(&self.date)
    }

    /// The confirmation message the application must echo for this row
    pub fn expected_message(&self) -> EnsayoResult<String> {
        Ok(format!(
            "Form submitted! Text: {}, Option: {}, Date: {}, Choice: {}, Agreed: true",
            self.text_input,
            self.selected_dropdown,
            self.iso_date()?,
            self.select_radio,
        ))
    }
}

/// Load one named sheet from a tabular data file
pub fn load_sheet<T: DeserializeOwned>(path: impl AsRef<Path>, sheet: &str) -> EnsayoResult<Vec<T>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| EnsayoError::TestData {
        message: format!("cannot read {}: {e}", path.display()),
    })?;
    sheet_from_yaml(&raw, sheet)
}

/// Parse one named sheet out of a tabular data document
pub fn sheet_from_yaml<T: DeserializeOwned>(raw: &str, sheet: &str) -> EnsayoResult<Vec<T>> {
    let book: HashMap<String, serde_yaml_ng::Value> =
        serde_yaml_ng::from_str(raw).map_err(|e| EnsayoError::TestData {
            message: e.to_string(),
        })?;
    let rows = book.get(sheet).ok_or_else(|| EnsayoError::TestData {
        message: format!("no sheet named '{sheet}'"),
    })?;
    serde_yaml_ng::from_value(rows.clone()).map_err(|e| EnsayoError::TestData {
        message: format!("sheet '{sheet}': {e}"),
    })
}

/// Reformat a source date (`MM/DD/YYYY`, or already ISO) to `YYYY-MM-DD`
pub fn reformat_date(raw: &str) -> EnsayoResult<String> {
    let parsed = NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|e| EnsayoError::TestData {
            message: format!("unparseable date '{raw}': {e}"),
        })?;
    Ok(parsed.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const BOOK: &str = "\
form_test:
  - text_input: hello world
    selected_dropdown: option2
    date: 07/15/2025
    select_radio: choice1
  - text_input: second row
    selected_dropdown: option1
    date: 2025-12-01
    select_radio: choice2
";

    mod sheet_tests {
        use super::*;

        #[test]
        fn test_load_named_sheet() {
            let rows: Vec<FormRecord> = sheet_from_yaml(BOOK, "form_test").unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].text_input, "hello world");
            assert_eq!(rows[1].selected_dropdown, "option1");
        }

        #[test]
        fn test_missing_sheet_errors() {
            let err = sheet_from_yaml::<FormRecord>(BOOK, "login_test").unwrap_err();
            match err {
                EnsayoError::TestData { message } => assert!(message.contains("login_test")),
                other => panic!("expected test data error, got {other}"),
            }
        }

        #[test]
        fn test_malformed_row_errors() {
            let raw = "\
form_test:
  - text_input: only one column
";
            let err = sheet_from_yaml::<FormRecord>(raw, "form_test").unwrap_err();
            assert!(matches!(err, EnsayoError::TestData { .. }));
        }

        #[test]
        fn test_load_sheet_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("testdata.yaml");
            std::fs::write(&path, BOOK).unwrap();
            let rows: Vec<FormRecord> = load_sheet(&path, "form_test").unwrap();
            assert_eq!(rows.len(), 2);
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn test_us_date_reformatted() {
            assert_eq!(reformat_date("07/15/2025").unwrap(), "2025-07-15");
        }

        #[test]
        fn test_iso_date_passes_through() {
            assert_eq!(reformat_date("2025-12-01").unwrap(), "2025-12-01");
        }

        #[test]
        fn test_leap_day() {
            assert_eq!(reformat_date("02/29/2024").unwrap(), "2024-02-29");
        }

        #[test]
        fn test_invalid_date_errors() {
            assert!(reformat_date("13/45/2025").is_err());
            assert!(reformat_date("not a date").is_err());
        }
    }

    mod form_record_tests {
        use super::*;

        #[test]
        fn test_expected_message_template() {
            let record = FormRecord {
                text_input: "hello world".to_string(),
                selected_dropdown: "option2".to_string(),
                date: "07/15/2025".to_string(),
                select_radio: "choice1".to_string(),
            };
            assert_eq!(
                record.expected_message().unwrap(),
                "Form submitted! Text: hello world, Option: option2, \
                 Date: 2025-07-15, Choice: choice1, Agreed: true"
            );
        }
    }
}
