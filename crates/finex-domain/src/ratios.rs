//! Placeholder ratios used by the profit-and-loss and tax reports.

use serde::{Deserialize, Serialize};

/// Share of expenses reported as cost of goods sold.
pub const DEFAULT_COGS_RATIO: f64 = 0.42;
/// Share of expenses reported as operating expenses.
pub const DEFAULT_OPERATING_RATIO: f64 = 0.58;
/// Share of expenses treated as deductible.
pub const DEFAULT_DEDUCTIBLE_RATIO: f64 = 0.7;
/// Share of expenses treated as non-deductible.
pub const DEFAULT_NON_DEDUCTIBLE_RATIO: f64 = 0.3;
/// Flat rate applied to positive net profit for the estimated tax line.
pub const DEFAULT_TAX_RATE: f64 = 0.18;

/// Report ratios applied to expense and net totals.
///
/// The defaults are demo values carried over from the dashboard mock-up. They
/// do not encode any accounting rule and are expected to be overridden through
/// configuration when real figures are needed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportRatios {
    pub cogs: f64,
    pub operating: f64,
    pub deductible: f64,
    pub non_deductible: f64,
    pub tax_rate: f64,
}

impl Default for ReportRatios {
    fn default() -> Self {
        Self {
            cogs: DEFAULT_COGS_RATIO,
            operating: DEFAULT_OPERATING_RATIO,
            deductible: DEFAULT_DEDUCTIBLE_RATIO,
            non_deductible: DEFAULT_NON_DEDUCTIBLE_RATIO,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}

impl ReportRatios {
    /// Returns `true` when every ratio is a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        [
            self.cogs,
            self.operating,
            self.deductible,
            self.non_deductible,
            self.tax_rate,
        ]
        .iter()
        .all(|value| value.is_finite() && *value >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let ratios: ReportRatios = serde_json::from_str(r#"{"tax_rate":0.25}"#).unwrap();
        assert_eq!(ratios.tax_rate, 0.25);
        assert_eq!(ratios.cogs, DEFAULT_COGS_RATIO);
        assert!(ratios.is_valid());
    }

    #[test]
    fn negative_ratio_is_invalid() {
        let ratios = ReportRatios {
            cogs: -0.1,
            ..ReportRatios::default()
        };
        assert!(!ratios.is_valid());
    }
}
