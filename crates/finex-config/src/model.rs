use serde::{de::Deserializer, Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

use finex_domain::{Granularity, ReportRatios};

use crate::ConfigError;

/// Dashboard preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_language")]
    pub language: String,
    #[serde(default)]
    pub theme: Theme,
    /// Rows shown in the recent-transactions feed and the transactions export.
    #[serde(default = "Config::default_feed_limit")]
    pub feed_limit: usize,
    #[serde(default)]
    pub default_range: Granularity,
    #[serde(default)]
    pub ratios: ReportRatios,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for record snapshots. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            language: Self::default_language(),
            theme: Theme::default(),
            feed_limit: Self::default_feed_limit(),
            default_range: Granularity::default(),
            ratios: ReportRatios::default(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_language() -> String {
        "English".into()
    }

    pub fn default_feed_limit() -> usize {
        8
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("finex")
    }

    pub fn set_currency(&mut self, code: &str) -> Result<(), ConfigError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue(format!(
                "currency must be a three-letter code, got `{code}`"
            )));
        }
        self.currency = code.to_ascii_uppercase();
        Ok(())
    }

    pub fn set_feed_limit(&mut self, limit: usize) -> Result<(), ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidValue(
                "feed limit must be at least 1".into(),
            ));
        }
        self.feed_limit = limit;
        Ok(())
    }

    /// Overrides one report ratio; the value must be finite and non-negative.
    pub fn set_ratio(&mut self, key: RatioKey, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "ratio `{key}` must be a non-negative number, got {value}"
            )));
        }
        let slot = match key {
            RatioKey::Cogs => &mut self.ratios.cogs,
            RatioKey::Operating => &mut self.ratios.operating,
            RatioKey::Deductible => &mut self.ratios.deductible,
            RatioKey::NonDeductible => &mut self.ratios.non_deductible,
            RatioKey::TaxRate => &mut self.ratios.tax_rate,
        };
        *slot = value;
        Ok(())
    }
}

/// Names of the overridable report ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioKey {
    Cogs,
    Operating,
    Deductible,
    NonDeductible,
    TaxRate,
}

impl RatioKey {
    pub const ALL: [RatioKey; 5] = [
        RatioKey::Cogs,
        RatioKey::Operating,
        RatioKey::Deductible,
        RatioKey::NonDeductible,
        RatioKey::TaxRate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RatioKey::Cogs => "cogs",
            RatioKey::Operating => "operating",
            RatioKey::Deductible => "deductible",
            RatioKey::NonDeductible => "non-deductible",
            RatioKey::TaxRate => "tax-rate",
        }
    }

    pub fn value_in(self, ratios: &ReportRatios) -> f64 {
        match self {
            RatioKey::Cogs => ratios.cogs,
            RatioKey::Operating => ratios.operating,
            RatioKey::Deductible => ratios.deductible,
            RatioKey::NonDeductible => ratios.non_deductible,
            RatioKey::TaxRate => ratios.tax_rate,
        }
    }
}

impl fmt::Display for RatioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatioKey {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        RatioKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| ConfigError::InvalidValue(format!("unknown ratio `{value}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::from_label(v.trim()))
            .unwrap_or_default()
    }

    /// Lenient parse: unknown labels fall back to the light theme.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            "system" => Theme::System,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Theme::from_value(value))
    }
}
