//! Demo records used when no snapshot has been persisted yet.

use chrono::NaiveDate;

use finex_domain::{ExpenseRecord, ExpenseStatus, IncomeRecord, IncomeStatus, PaymentMethod};

type SeedRow<S> = (
    &'static str,
    (i32, u32, u32),
    &'static str,
    f64,
    PaymentMethod,
    S,
    &'static str,
);

#[rustfmt::skip]
const SEED_INCOME: [SeedRow<IncomeStatus>; 5] = [
    ("inc-1", (2026, 2, 15), "Consulting", 3200.0, PaymentMethod::Bank, IncomeStatus::Received, ""),
    ("inc-2", (2026, 2, 13), "Sales (POS)", 1180.0, PaymentMethod::Cash, IncomeStatus::Received, ""),
    ("inc-3", (2026, 2, 11), "Subscription", 540.0, PaymentMethod::Online, IncomeStatus::Pending, "Stripe payout"),
    ("inc-4", (2026, 2, 10), "Services", 4200.0, PaymentMethod::Bank, IncomeStatus::Received, ""),
    ("inc-5", (2026, 2, 8), "Affiliate", 620.0, PaymentMethod::Online, IncomeStatus::Received, ""),
];

#[rustfmt::skip]
const SEED_EXPENSE: [SeedRow<ExpenseStatus>; 5] = [
    ("exp-1", (2026, 2, 14), "Software (SaaS)", 240.0, PaymentMethod::Card, ExpenseStatus::Paid, ""),
    ("exp-2", (2026, 2, 12), "Payroll", 7500.0, PaymentMethod::Bank, ExpenseStatus::Paid, ""),
    ("exp-3", (2026, 2, 10), "Marketing", 940.0, PaymentMethod::Card, ExpenseStatus::Pending, ""),
    ("exp-4", (2026, 2, 8), "Rent", 4100.0, PaymentMethod::Bank, ExpenseStatus::Paid, ""),
    ("exp-5", (2026, 2, 7), "Logistics", 650.0, PaymentMethod::Card, ExpenseStatus::Paid, ""),
];

fn seed_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed dates are valid calendar dates")
}

/// Income records shown on first launch.
pub fn seed_incomes() -> Vec<IncomeRecord> {
    SEED_INCOME
        .iter()
        .map(|&(id, ymd, source, amount, method, status, note)| {
            IncomeRecord::new(id, seed_date(ymd), source, amount, method, status).with_note(note)
        })
        .collect()
}

/// Expense records shown on first launch.
pub fn seed_expenses() -> Vec<ExpenseRecord> {
    SEED_EXPENSE
        .iter()
        .map(|&(id, ymd, category, amount, method, status, note)| {
            ExpenseRecord::new(id, seed_date(ymd), category, amount, method, status)
                .with_note(note)
        })
        .collect()
}
