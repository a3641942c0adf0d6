use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, ExcelDateTime, Range, Reader, Xlsx, XlsxError};
use tracing::debug;

use super::{ExtractionError, Extractor};

/// Workbooks: every sheet, in workbook order, as a `Sheet: <name>` header
/// followed by a markdown table whose first row is the column header.
pub struct SpreadsheetExtractor;

fn xlsx_error(e: XlsxError) -> ExtractionError {
    ExtractionError::Spreadsheet(e.to_string())
}

impl Extractor for SpreadsheetExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(xlsx_error)?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(xlsx_error)?;
            sheets.push((name, range));
        }

        debug!(sheets = sheets.len(), "Extracted workbook");
        Ok(render_workbook(&sheets))
    }
}

pub fn render_workbook(sheets: &[(String, Range<Data>)]) -> String {
    let mut text = String::new();
    for (name, range) in sheets {
        text.push_str(&format!("\nSheet: {}\n", name));
        text.push_str(&markdown_table(range));
        text.push('\n');
    }
    text
}

/// Render a sheet as a pipe table. Returns an empty string for an empty sheet.
pub fn markdown_table(range: &Range<Data>) -> String {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return String::new();
    };

    let mut lines = vec![table_row(header.iter().map(cell_text))];
    lines.push(table_row(header.iter().map(|_| "---".to_string())));
    for row in rows {
        lines.push(table_row(row.iter().map(cell_text)));
    }
    lines.join("\n")
}

fn table_row(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.collect();
    format!("| {} |", cells.join(" | "))
}

fn cell_text(cell: &Data) -> String {
    let text = match cell {
        Data::DateTime(dt) => excel_datetime_text(dt),
        other => other.to_string(),
    };
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Dates render as `YYYY-MM-DD HH:MM:SS`, durations as `H:MM:SS`. Serials
/// outside the representable range fall back to the raw number.
fn excel_datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let total = duration.num_seconds();
            let sign = if total < 0 { "-" } else { "" };
            let total = total.abs();
            return format!("{}{}:{:02}:{:02}", sign, total / 3600, total / 60 % 60, total % 60);
        }
    } else if let Some(datetime) = dt.as_datetime() {
        return datetime.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    dt.as_f64().to_string()
}
