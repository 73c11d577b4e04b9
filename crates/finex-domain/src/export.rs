//! Tabular export shapes handed to CSV encoding.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::ParseEnumError;

/// A single export cell. Numbers keep their numeric type until encoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            // negative zero renders as plain zero
            Cell::Number(value) if *value == 0.0 => f.write_str("0"),
            Cell::Number(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
/// Enumerates the fixed export schemas.
pub enum ExportKind {
    Transactions,
    Ledger,
    Income,
    Expenses,
    ProfitAndLoss,
    TaxSummary,
}

impl ExportKind {
    pub const ALL: [ExportKind; 6] = [
        ExportKind::Transactions,
        ExportKind::Ledger,
        ExportKind::Income,
        ExportKind::Expenses,
        ExportKind::ProfitAndLoss,
        ExportKind::TaxSummary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::Transactions => "transactions",
            ExportKind::Ledger => "ledger",
            ExportKind::Income => "income",
            ExportKind::Expenses => "expenses",
            ExportKind::ProfitAndLoss => "profit-and-loss",
            ExportKind::TaxSummary => "tax-summary",
        }
    }

    /// Column names of the header row.
    pub fn header(self) -> &'static [&'static str] {
        match self {
            ExportKind::Transactions => &["Date", "Type", "Category/Source", "Method", "Amount"],
            ExportKind::Ledger | ExportKind::Income | ExportKind::Expenses => &[
                "Type",
                "Date",
                "Category/Source",
                "Method",
                "Status",
                "Amount",
            ],
            ExportKind::ProfitAndLoss => &["Line", "Amount"],
            ExportKind::TaxSummary => &["Label", "Amount"],
        }
    }

    /// Download file name offered for this export.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::Transactions => "transactions.csv",
            ExportKind::Ledger => "finex-export.csv",
            ExportKind::Income => "income.csv",
            ExportKind::Expenses => "expenses.csv",
            ExportKind::ProfitAndLoss => "pnl.csv",
            ExportKind::TaxSummary => "tax-summary.csv",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transactions" => Ok(ExportKind::Transactions),
            "ledger" => Ok(ExportKind::Ledger),
            "income" => Ok(ExportKind::Income),
            "expenses" => Ok(ExportKind::Expenses),
            "profit-and-loss" | "pnl" => Ok(ExportKind::ProfitAndLoss),
            "tax-summary" => Ok(ExportKind::TaxSummary),
            _ => Err(ParseEnumError::new("export kind", value)),
        }
    }
}

/// A fixed header plus ordered data rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportTable {
    pub kind: ExportKind,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ExportTable {
    /// Creates an empty table carrying the kind's header.
    pub fn new(kind: ExportKind) -> Self {
        Self {
            kind,
            header: kind.header().iter().map(|name| name.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// All records, header first, as text/number cells.
    pub fn records(&self) -> Vec<Vec<Cell>> {
        let mut records = Vec::with_capacity(self.rows.len() + 1);
        records.push(self.header.iter().cloned().map(Cell::Text).collect());
        records.extend(self.rows.iter().cloned());
        records
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_like_plain_decimals() {
        assert_eq!(Cell::Number(1000.0).to_string(), "1000");
        assert_eq!(Cell::Number(-210.0).to_string(), "-210");
        assert_eq!(Cell::Number(0.5).to_string(), "0.5");
        assert_eq!(Cell::Number(-0.0).to_string(), "0");
    }

    #[test]
    fn export_kind_accepts_pnl_alias() {
        assert_eq!("pnl".parse::<ExportKind>(), Ok(ExportKind::ProfitAndLoss));
        assert_eq!(
            "Tax-Summary".parse::<ExportKind>(),
            Ok(ExportKind::TaxSummary)
        );
        assert!("balance-sheet".parse::<ExportKind>().is_err());
    }

    #[test]
    fn records_start_with_header() {
        let mut table = ExportTable::new(ExportKind::TaxSummary);
        table.push_row(vec!["Deductible".into(), 350.0.into()]);
        let records = table.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec![Cell::text("Label"), Cell::text("Amount")]);
        assert_eq!(records[1][1], Cell::Number(350.0));
    }
}
