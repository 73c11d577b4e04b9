//! Expense records as persisted by the dashboard.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: ExpenseStatus,
    #[serde(default)]
    pub note: String,
}

impl ExpenseRecord {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
        method: PaymentMethod,
        status: ExpenseStatus,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            category: category.into(),
            amount,
            method,
            status,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == ExpenseStatus::Pending
    }
}

impl Identifiable for ExpenseRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for ExpenseRecord {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Labelled for ExpenseRecord {
    fn label(&self) -> &str {
        &self.category
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Settlement state of an expense record.
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "Pending",
            ExpenseStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ExpenseStatus::Pending),
            "paid" => Ok(ExpenseStatus::Paid),
            _ => Err(ParseEnumError::new("expense status", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_back_to_persisted_shape() {
        let record = ExpenseRecord::new(
            "exp-1",
            NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            "Software (SaaS)",
            240.0,
            PaymentMethod::Card,
            ExpenseStatus::Paid,
        );
        let json = serde_json::to_value(&record).expect("serialize expense");
        assert_eq!(json["date"], "2026-02-14");
        assert_eq!(json["category"], "Software (SaaS)");
        assert_eq!(json["method"], "Card");
        assert_eq!(json["status"], "Paid");
        assert_eq!(json["note"], "");
    }

    #[test]
    fn pending_status_is_detected() {
        let record = ExpenseRecord::new(
            "exp-3",
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            "Marketing",
            940.0,
            PaymentMethod::Card,
            "pending".parse().expect("status"),
        );
        assert!(record.is_pending());
        assert_eq!(record.label(), "Marketing");
    }
}
