use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Whole-unit amounts with thousands separators, e.g. `$1,234` or `-$210`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeUnitFormatter;

impl CurrencyFormatter for WholeUnitFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let units = amount.abs().round() as u64;
        let sign = if amount < 0.0 && units > 0 { "-" } else { "" };
        format!("{sign}{}{}", currency_prefix(currency), group_thousands(units))
    }
}

/// Short month-and-day dates, e.g. `Feb 15`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortDateFormatter;

impl DateFormatter for ShortDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%b %-d").to_string()
    }
}

fn currency_prefix(currency: &str) -> String {
    match currency.trim().to_ascii_uppercase().as_str() {
        "USD" | "" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        other => format!("{other} "),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
