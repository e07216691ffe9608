//! Plain-text tables and JSON output.

use serde::Serialize;

use crate::commands::CliError;

/// Render rows as a left-aligned table with a header rule.
#[must_use]
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = pad_line(headers.iter().copied(), &widths);
    out.push('\n');
    out.push_str(&pad_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push('\n');
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

/// Print a table, or a note when there is nothing to show.
#[allow(clippy::print_stdout)]
pub fn print_table(headers: &[&str], rows: &[Vec<String>], empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
    } else {
        println!("{}", table(headers, rows));
    }
}

/// Print a value as pretty JSON.
///
/// # Errors
///
/// Returns `CliError::Json` if the value cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a one-line confirmation.
#[allow(clippy::print_stdout)]
pub fn done(message: &str) {
    println!("{message}");
}

/// Print a failure to stderr.
#[allow(clippy::print_stderr)]
pub fn fail(error: &CliError) {
    eprintln!("error: {error}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_pads_columns() {
        let rows = vec![
            vec!["Widget".to_string(), "12".to_string()],
            vec!["Extra long gadget".to_string(), "3".to_string()],
        ];
        let rendered = table(&["Product", "Qty"], &rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Product            Qty");
        assert_eq!(lines[1], "-----------------  ---");
        assert_eq!(lines[2], "Widget             12");
        assert_eq!(lines[3], "Extra long gadget  3");
    }

    #[test]
    fn test_header_only_table() {
        assert_eq!(table(&["A", "Bee"], &[]), "A  Bee\n-  ---");
    }
}
