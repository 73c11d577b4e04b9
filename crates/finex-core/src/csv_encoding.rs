//! CSV text encoding for export tables.
//!
//! Every cell is double-quoted with embedded quotes doubled, cells are joined
//! by `,` and records by `\n`, with no trailing newline.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use finex_domain::{Cell, ExportTable};

use crate::{CoreError, CoreResult};

/// Encodes a table, header first.
pub fn encode_table(table: &ExportTable) -> CoreResult<String> {
    encode_records(&table.records())
}

/// Encodes arbitrary rows of cells.
pub fn encode_records(records: &[Vec<Cell>]) -> CoreResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(record.iter().map(|cell| cell.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| CoreError::Storage(err.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|err| CoreError::Serde(err.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Quotes a single cell the same way [`encode_records`] does.
pub fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
