//! Result rendering
//!
//! Turns a [`QueryResult`] into text for the terminal, either as a boxed
//! table or as JSON.

use crate::config::OutputFormat;
use crate::error::{Error, Result};
use crate::executor::QueryResult;

/// Render a result in the requested format
pub fn format_result(result: &QueryResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(result)),
        OutputFormat::Json => format_json(result),
    }
}

/// Render a result as a text table
pub fn format_table(result: &QueryResult) -> String {
    let (columns, rows) = match result {
        QueryResult::Count { label, count } => return format!("{} = {}\n", label, count),
        QueryResult::Rows { columns, rows } => (columns, rows),
    };

    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }

    // Calculate column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            let len = row.get(column).unwrap_or("").chars().count();
            widths[i] = widths[i].max(len);
        }
    }

    let mut output = String::new();

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{}+\n", separator);

    // Header
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
        .collect::<Vec<_>>()
        .join("|");
    output.push_str(&format!("|{}|\n", header));
    output.push_str(&separator);

    // Rows
    for row in rows {
        let line: String = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {:<width$} ", row.get(c).unwrap_or(""), width = *w))
            .collect::<Vec<_>>()
            .join("|");
        output.push_str(&format!("|{}|\n", line));
    }
    output.push_str(&separator);

    output.push_str(&format!("{} row(s) returned\n", rows.len()));
    output
}

/// Render a result as JSON: an array of row objects, or `{"count": n}`
pub fn format_json(result: &QueryResult) -> Result<String> {
    let rendered = match result {
        QueryResult::Rows { rows, .. } => serde_json::to_string_pretty(rows),
        QueryResult::Count { count, .. } => {
            serde_json::to_string_pretty(&serde_json::json!({ "count": count }))
        }
    };
    rendered
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| Error::Internal(e.to_string()))
}
