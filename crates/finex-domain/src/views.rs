//! Derived, non-persisted views produced by aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{Granularity, PaymentMethod, Polarity};

/// Headline sums over both record collections.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub income_total: f64,
    pub expense_total: f64,
    pub net: f64,
    /// Sum of income amounts still awaiting settlement.
    pub pending: f64,
}

impl Totals {
    /// Builds totals from the two sums, deriving `net`.
    pub fn from_sums(income_total: f64, expense_total: f64, pending: f64) -> Self {
        Self {
            income_total,
            expense_total,
            net: income_total - expense_total,
            pending,
        }
    }
}

/// Secondary figures shown next to the headline totals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Kpis {
    pub average_daily_income: f64,
    pub margin_percent: f64,
}

/// Bucketed income and expense sums aligned by index with `labels`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub labels: Vec<String>,
    pub income_series: Vec<f64>,
    pub expense_series: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates `(label, income, expense)` triples in bucket order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.labels
            .iter()
            .zip(self.income_series.iter().zip(self.expense_series.iter()))
            .map(|(label, (income, expense))| (label.as_str(), *income, *expense))
    }
}

/// Summed amounts per label, kept in first-seen order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub entries: Vec<(String, f64)>,
}

impl CategoryBreakdown {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, value)| *value)
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

/// One row of the recent-transactions feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionEntry {
    pub date: NaiveDate,
    pub polarity: Polarity,
    /// Income source or expense category.
    pub label: String,
    pub method: PaymentMethod,
    /// Signed amount: positive for credits, negative for debits.
    pub amount: f64,
}

/// Merged, date-descending view over both collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionFeed {
    pub entries: Vec<TransactionEntry>,
}

impl TransactionFeed {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionEntry> {
        self.entries.iter()
    }
}
