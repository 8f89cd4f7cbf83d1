//! Rendering a sheet into the bounded text sample sent to the summarizer.

use tabula_core::models::{CellScalar, SheetData};

/// Render the header line, up to `row_limit` data rows, and a totals line.
pub fn render_sample(sheet: &SheetData, row_limit: usize) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Headers: {}", sheet.columns.join(" | ")));
    lines.push(String::new());
    lines.push("Data sample:".to_string());
    for (idx, row) in sheet.rows.iter().take(row_limit).enumerate() {
        let cells: Vec<String> = row.iter().map(render_cell).collect();
        lines.push(format!("Row {}: {}", idx + 1, cells.join(" | ")));
    }
    if sheet.rows.len() > row_limit {
        lines.push(format!(
            "... {} more rows omitted",
            sheet.rows.len() - row_limit
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Totals: {} rows, {} columns",
        sheet.row_count(),
        sheet.column_count()
    ));
    lines.join("\n")
}

fn render_cell(cell: &CellScalar) -> String {
    match cell {
        CellScalar::Null => String::new(),
        CellScalar::Int(i) => i.to_string(),
        CellScalar::Float(f) => f.to_string(),
        CellScalar::Bool(b) => b.to_string(),
        CellScalar::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: usize) -> SheetData {
        SheetData {
            name: "Sheet1".to_string(),
            columns: vec!["item".to_string(), "qty".to_string()],
            rows: (0..rows)
                .map(|i| {
                    vec![
                        CellScalar::Text(format!("part-{i}")),
                        CellScalar::Int(i as i64),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn sample_includes_headers_rows_and_totals() {
        let sample = render_sample(&sheet(2), 20);
        assert!(sample.starts_with("Headers: item | qty"));
        assert!(sample.contains("Row 1: part-0 | 0"));
        assert!(sample.contains("Row 2: part-1 | 1"));
        assert!(sample.ends_with("Totals: 2 rows, 2 columns"));
    }

    #[test]
    fn sample_is_bounded_but_totals_are_not() {
        let sample = render_sample(&sheet(50), 3);
        assert!(sample.contains("Row 3:"));
        assert!(!sample.contains("Row 4:"));
        assert!(sample.contains("... 47 more rows omitted"));
        assert!(sample.contains("Totals: 50 rows"));
    }

    #[test]
    fn null_cells_render_empty() {
        let data = SheetData {
            name: "S".to_string(),
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec![CellScalar::Null, CellScalar::Int(1)]],
        };
        let sample = render_sample(&data, 20);
        assert!(sample.contains("Row 1:  | 1"));
    }
}
