//! Text rendering for CLI output.

use serde_json::Value;
use speedrun_query_core::models::Row;

/// Format seconds as `"1h 2m 3.456s"`, dropping leading zero units.
pub fn format_time(seconds: f64) -> String {
    let negative = seconds < 0.0;
    let total = seconds.abs();
    let hours = (total / 3600.0).floor() as u64;
    let minutes = ((total % 3600.0) / 60.0).floor() as u64;
    let secs = total % 60.0;
    let sign = if negative { "-" } else { "" };

    if hours > 0 {
        format!("{}{}h {}m {:.3}s", sign, hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}{}m {:.3}s", sign, minutes, secs)
    } else {
        format!("{}{:.3}s", sign, secs)
    }
}

/// Columns that hold durations in seconds.
pub fn is_time_column(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("time") || name.ends_with("_seconds")
}

fn render_cell(column: &str, value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Number(n) if is_time_column(column) => match n.as_f64() {
            Some(secs) => format_time(secs),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render rows as a fixed-width table. Columns come from the first row.
pub fn render_table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(*c).map(|v| render_cell(c, v)).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
