//! Income records as persisted by the dashboard.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeRecord {
    pub id: String,
    pub date: NaiveDate,
    pub source: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: IncomeStatus,
    #[serde(default)]
    pub note: String,
}

impl IncomeRecord {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        source: impl Into<String>,
        amount: f64,
        method: PaymentMethod,
        status: IncomeStatus,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            source: source.into(),
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
        self.status == IncomeStatus::Pending
    }
}

impl Identifiable for IncomeRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for IncomeRecord {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Labelled for IncomeRecord {
    fn label(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Settlement state of an income record.
pub enum IncomeStatus {
    #[default]
    Pending,
    Received,
}

impl IncomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IncomeStatus::Pending => "Pending",
            IncomeStatus::Received => "Received",
        }
    }
}

impl fmt::Display for IncomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(IncomeStatus::Pending),
            "received" => Ok(IncomeStatus::Received),
            _ => Err(ParseEnumError::new("income status", value)),
        }
    }
}
