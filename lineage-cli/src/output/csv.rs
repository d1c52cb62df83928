//! CSV output formatting for data export.

use super::Column;
use serde::Serialize;

/// CSV output formatter
pub struct CsvOutput;

impl CsvOutput {
    /// Format an array of items as CSV with specified columns
    pub fn format_with_columns<T: Serialize>(data: &[T], columns: &[Column]) -> String {
        let headers: Vec<String> = columns.iter().map(|c| Self::escape_value(&c.name)).collect();
        let mut output = headers.join(",");

        for item in data {
            if let Ok(json) = serde_json::to_value(item) {
                let row: Vec<String> = columns
                    .iter()
                    .map(|col| {
                        json.get(&col.key)
                            .map(Self::value_to_csv)
                            .unwrap_or_default()
                    })
                    .collect();
                output.push('\n');
                output.push_str(&row.join(","));
            }
        }

        output
    }

    /// Convert a JSON value to a CSV cell
    fn value_to_csv(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => Self::escape_value(s),
            serde_json::Value::Array(arr) => {
                let items: Vec<String> = arr
                    .iter()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                Self::escape_value(&items.join(";"))
            }
            serde_json::Value::Object(obj) => {
                Self::escape_value(&format!("{{{} fields}}", obj.len()))
            }
        }
    }

    /// Escape a string value for CSV
    ///
    /// Wraps in quotes if the value contains comma, newline, or quote.
    /// Doubles any existing quotes.
    pub fn escape_value(s: &str) -> String {
        if s.contains(',') || s.contains('\n') || s.contains('\r') || s.contains('"') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestItem {
        table: String,
        rows: Option<u64>,
        columns: Vec<String>,
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(CsvOutput::escape_value("orders"), "orders");
        assert_eq!(CsvOutput::escape_value("DECIMAL(10,2)"), "\"DECIMAL(10,2)\"");
        assert_eq!(CsvOutput::escape_value("a\nb"), "\"a\nb\"");
        assert_eq!(CsvOutput::escape_value("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_with_columns() {
        let data = vec![
            TestItem {
                table: "orders".to_string(),
                rows: Some(42),
                columns: vec!["id".to_string(), "amount".to_string()],
            },
            TestItem {
                table: "customers".to_string(),
                rows: None,
                columns: vec![],
            },
        ];
        let columns = vec![
            Column::new("Table", "table"),
            Column::new("Rows", "rows"),
            Column::new("Columns", "columns"),
        ];
        let output = CsvOutput::format_with_columns(&data, &columns);

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "Table,Rows,Columns");
        assert_eq!(lines[1], "orders,42,id;amount");
        assert_eq!(lines[2], "customers,,");
    }

    #[test]
    fn test_empty_data() {
        let data: Vec<TestItem> = vec![];
        let columns = vec![Column::new("Table", "table")];
        assert_eq!(CsvOutput::format_with_columns(&data, &columns), "Table");
    }
}
