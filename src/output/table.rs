use std::borrow::Cow;
use std::collections::HashSet;

use comfy_table::{Table, presets::ASCII_BORDERS_ONLY_CONDENSED};

use super::Tabular;

/// Maximum width for free-text columns
const MAX_WIDE_COLUMN_WIDTH: usize = 60;

/// Columns that should have width limits in table mode
const WIDE_COLUMNS: &[&str] = &["containers", "stopped_reason", "failure"];

/// Truncate a string to max_len chars, adding "..." if truncated
fn truncate_value(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}

pub struct TableFormatter;

impl TableFormatter {
    pub fn format(result: &Tabular, no_headers: bool) -> String {
        if result.rows.is_empty() {
            return "(0 rows)".to_string();
        }

        let mut table = Table::new();
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);

        let truncate_cols: HashSet<usize> = result
            .columns
            .iter()
            .enumerate()
            .filter(|(_, col)| WIDE_COLUMNS.contains(&col.as_str()))
            .map(|(idx, _)| idx)
            .collect();

        if !no_headers {
            table.set_header(&result.columns);
        }

        for row in &result.rows {
            let cells: Vec<Cow<'_, str>> = row
                .iter()
                .enumerate()
                .map(|(idx, val)| {
                    if truncate_cols.contains(&idx) {
                        truncate_value(val, MAX_WIDE_COLUMN_WIDTH)
                    } else {
                        Cow::Borrowed(val.as_str())
                    }
                })
                .collect();
            table.add_row(cells);
        }

        format!("{}\n({} rows)", table, result.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_value_short() {
        let result = truncate_value("hello", 10);
        assert_eq!(result, "hello");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_value_too_long() {
        let long = "CannotPullContainerError: pull image manifest has been retried";
        let result = truncate_value(long, 20);
        assert!(result.ends_with("..."));
        assert_eq!(result.chars().count(), 20);
        assert!(matches!(result, Cow::Owned(_)));
    }

    #[test]
    fn test_truncate_value_unicode() {
        let unicode = "日本語テストです長い文字列";
        let result = truncate_value(unicode, 8);
        assert!(result.chars().count() <= 8);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_empty_result() {
        let result = Tabular::new(&["task_arn"]);
        assert_eq!(TableFormatter::format(&result, false), "(0 rows)");
    }

    #[test]
    fn test_wide_column_truncated() {
        let mut result = Tabular::new(&["task_arn", "stopped_reason"]);
        result.push(vec!["t1".to_string(), "a".repeat(80)]);

        let output = TableFormatter::format(&result, false);
        assert!(!output.contains(&"a".repeat(80)));
        assert!(output.contains("..."));
        assert!(output.ends_with("(1 rows)"));
    }

    #[test]
    fn test_arn_column_not_truncated() {
        let mut result = Tabular::new(&["task_arn", "last_status"]);
        result.push(vec!["a".repeat(80), "RUNNING".to_string()]);

        let output = TableFormatter::format(&result, false);
        assert!(output.contains(&"a".repeat(80)));
    }

    #[test]
    fn test_no_headers() {
        let mut result = Tabular::new(&["task_arn"]);
        result.push(vec!["t1".to_string()]);

        let output = TableFormatter::format(&result, true);
        assert!(!output.contains("task_arn"));
        assert!(output.contains("t1"));
    }
}
