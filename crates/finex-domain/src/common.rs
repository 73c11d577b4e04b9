//! Shared traits and enums for finance records.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Exposes the caller-assigned identifier of a stored record.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a common contract for retrieving the stored magnitude of a record.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Read-only access to the free-text label used for grouping
/// (income source or expense category).
pub trait Labelled {
    fn label(&self) -> &str;
}

/// Error returned when a closed enum is parsed from an unknown string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Enumerates the payment channels offered by the entry form.
pub enum PaymentMethod {
    #[default]
    Bank,
    Cash,
    Online,
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Bank,
        PaymentMethod::Card,
        PaymentMethod::Cash,
        PaymentMethod::Online,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Bank => "Bank",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Online => "Online",
            PaymentMethod::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bank" => Ok(PaymentMethod::Bank),
            "cash" => Ok(PaymentMethod::Cash),
            "online" => Ok(PaymentMethod::Online),
            "card" => Ok(PaymentMethod::Card),
            _ => Err(ParseEnumError::new("payment method", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Whether a feed entry adds money (income) or removes it (expense).
pub enum Polarity {
    Credit,
    Debit,
}

impl Polarity {
    /// Applies the polarity to a stored non-negative magnitude.
    pub fn apply(self, magnitude: f64) -> f64 {
        match self {
            Polarity::Credit => magnitude,
            Polarity::Debit => -magnitude,
        }
    }

    /// Row label used in the transaction table and exports.
    pub fn type_label(self) -> &'static str {
        match self {
            Polarity::Credit => "Income",
            Polarity::Debit => "Expense",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Polarity::Credit => "credit",
            Polarity::Debit => "debit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
/// Time-bucketing resolution for chart series.
pub enum Granularity {
    /// Seven Monday-first weekday buckets.
    #[default]
    Week,
    /// Twelve calendar-month buckets.
    Month,
}

impl Granularity {
    pub fn bucket_count(self) -> usize {
        match self {
            Granularity::Week => 7,
            Granularity::Month => 12,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        f.write_str(label)
    }
}

impl FromStr for Granularity {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            _ => Err(ParseEnumError::new("granularity", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_rejects_unknown_values() {
        assert_eq!("Week".parse::<Granularity>(), Ok(Granularity::Week));
        assert_eq!(" month ".parse::<Granularity>(), Ok(Granularity::Month));
        let err = "quarter".parse::<Granularity>().unwrap_err();
        assert_eq!(err.to_string(), "unknown granularity `quarter`");
    }

    #[test]
    fn polarity_signs_magnitudes() {
        assert_eq!(Polarity::Credit.apply(12.5), 12.5);
        assert_eq!(Polarity::Debit.apply(12.5), -12.5);
        assert_eq!(Polarity::Debit.type_label(), "Expense");
    }

    #[test]
    fn payment_method_parses_case_insensitively() {
        assert_eq!("ONLINE".parse::<PaymentMethod>(), Ok(PaymentMethod::Online));
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
