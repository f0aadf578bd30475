//! Problem report rendering
//!
//! Table output mirrors a console table: bordered, one row per record,
//! columns sized to their widest cell. JSON output is an array of
//! `{id, sku, storeId, problem}` objects.

use clap::ValueEnum;
use urlck_common::{Error, Result};

use crate::model::ProblemRecord;

pub const NO_PROBLEMS_MESSAGE: &str = "No problems found!";

const HEADERS: [&str; 4] = ["ID", "SKU", "Store", "Problem"];

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

/// Render records in the requested format
pub fn render(records: &[ProblemRecord], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => Ok(render_table(records)),
        ReportFormat::Json => render_json(records),
    }
}

/// Bordered table, or the no-problems message when there is nothing to show
pub fn render_table(records: &[ProblemRecord]) -> String {
    if records.is_empty() {
        return NO_PROBLEMS_MESSAGE.to_string();
    }

    let rows: Vec<[String; 4]> = records
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                r.sku.clone(),
                r.store_id.to_string(),
                r.problem.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let format_row = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| {
                let fill = width - cell.chars().count();
                format!(" {}{} ", cell, " ".repeat(fill))
            })
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(separator.clone());
    lines.push(format_row(&HEADERS[..]));
    lines.push(separator.clone());
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(cells.as_slice()));
    }
    lines.push(separator);

    lines.join("\n")
}

/// Pretty-printed JSON array
pub fn render_json(records: &[ProblemRecord]) -> Result<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| Error::Internal(format!("Failed to serialize report: {}", e)))
}
