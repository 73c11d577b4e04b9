//! Pure aggregation over income and expense collections.
//!
//! Every function takes borrowed snapshots and returns an owned derived view.
//! Nothing here mutates its inputs or keeps state between calls, so identical
//! inputs always produce identical outputs. Sums are folded in collection
//! order, which keeps floating-point results reproducible.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use finex_domain::{
    Amounted, CategoryBreakdown, Cell, ExpenseRecord, ExportKind, ExportTable, Granularity,
    Identifiable, IncomeRecord, Kpis, Labelled, Polarity, ReportRatios, TimeSeries, Totals,
    TransactionEntry, TransactionFeed,
};

use crate::{CoreError, CoreResult};

/// Number of rows shown in the recent-transactions feed unless configured otherwise.
pub const DEFAULT_FEED_LIMIT: usize = 8;

/// Monday-first weekday bucket labels.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Calendar-month bucket labels.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Day count used for the average-daily-income KPI.
pub const KPI_PERIOD_DAYS: f64 = 30.0;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters for [`Aggregator::export_table`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub ratios: ReportRatios,
    /// Row limit applied to the `transactions` export.
    pub feed_limit: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            ratios: ReportRatios::default(),
            feed_limit: DEFAULT_FEED_LIMIT,
        }
    }
}

/// Stateless aggregation entry points.
pub struct Aggregator;

impl Aggregator {
    /// Sums both collections and derives `net` and the pending-income total.
    ///
    /// Non-finite amounts contribute zero.
    pub fn totals(incomes: &[IncomeRecord], expenses: &[ExpenseRecord]) -> Totals {
        let income_total = sum_amounts(incomes);
        let expense_total = sum_amounts(expenses);
        let pending = sum_amounts(incomes.iter().filter(|income| income.is_pending()));
        Totals::from_sums(income_total, expense_total, pending)
    }

    /// Derives the dashboard KPI figures from totals.
    pub fn kpis(totals: &Totals) -> Kpis {
        let margin = totals.net / totals.income_total.max(1.0) * 100.0;
        Kpis {
            average_daily_income: totals.income_total / KPI_PERIOD_DAYS,
            // half-up rounding, so -12.5 becomes -12
            margin_percent: (margin + 0.5).floor(),
        }
    }

    /// Monday-first weekday index: Monday = 0 … Sunday = 6.
    pub fn weekday_index(date: NaiveDate) -> usize {
        date.weekday().num_days_from_monday() as usize
    }

    /// Zero-based calendar month index: January = 0 … December = 11.
    pub fn month_index(date: NaiveDate) -> usize {
        date.month0() as usize
    }

    /// Parses an ISO `YYYY-MM-DD` date.
    pub fn parse_date(raw: &str) -> CoreResult<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT)
            .map_err(|err| CoreError::InvalidInput(format!("invalid date `{raw}`: {err}")))
    }

    /// Weekday index of an ISO date string.
    pub fn weekday_index_of(raw: &str) -> CoreResult<usize> {
        Self::parse_date(raw).map(Self::weekday_index)
    }

    /// Buckets both collections by weekday or calendar month.
    ///
    /// Records from different weeks (or years) land in the same bucket: the
    /// series describes a weekday/month profile, not a rolling window.
    pub fn time_series(
        incomes: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        granularity: Granularity,
    ) -> TimeSeries {
        type Bucket = fn(NaiveDate) -> usize;
        let (labels, bucket_of) = match granularity {
            Granularity::Week => (&WEEKDAY_LABELS[..], Self::weekday_index as Bucket),
            Granularity::Month => (&MONTH_LABELS[..], Self::month_index as Bucket),
        };
        let mut income_series = vec![0.0; labels.len()];
        let mut expense_series = vec![0.0; labels.len()];
        for income in incomes {
            income_series[bucket_of(income.date)] += effective_amount(income);
        }
        for expense in expenses {
            expense_series[bucket_of(expense.date)] += effective_amount(expense);
        }
        TimeSeries {
            granularity,
            labels: labels.iter().map(|label| label.to_string()).collect(),
            income_series,
            expense_series,
        }
    }

    /// Like [`Aggregator::time_series`], parsing the range selector first.
    pub fn time_series_for(
        incomes: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        range: &str,
    ) -> CoreResult<TimeSeries> {
        let granularity: Granularity = range.parse()?;
        Ok(Self::time_series(incomes, expenses, granularity))
    }

    /// Sums expense amounts per category, in order of first appearance.
    pub fn category_breakdown(expenses: &[ExpenseRecord]) -> CategoryBreakdown {
        breakdown_by_label(expenses)
    }

    /// Sums income amounts per source, in order of first appearance.
    pub fn source_breakdown(incomes: &[IncomeRecord]) -> CategoryBreakdown {
        breakdown_by_label(incomes)
    }

    /// Merges both collections into a signed feed, newest first.
    ///
    /// Entries sharing a date keep their input order, incomes ahead of
    /// expenses.
    pub fn recent_transactions(
        incomes: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        limit: usize,
    ) -> TransactionFeed {
        let credits = incomes.iter().map(|income| TransactionEntry {
            date: income.date,
            polarity: Polarity::Credit,
            label: income.source.clone(),
            method: income.method,
            amount: Polarity::Credit.apply(effective_amount(income)),
        });
        let debits = expenses.iter().map(|expense| TransactionEntry {
            date: expense.date,
            polarity: Polarity::Debit,
            label: expense.category.clone(),
            method: expense.method,
            amount: Polarity::Debit.apply(effective_amount(expense)),
        });
        let mut entries: Vec<TransactionEntry> = credits.chain(debits).collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(limit);
        TransactionFeed { entries }
    }

    /// Builds one of the fixed-schema export tables.
    pub fn export_table(
        kind: ExportKind,
        incomes: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        totals: &Totals,
        options: &ExportOptions,
    ) -> ExportTable {
        let mut table = ExportTable::new(kind);
        match kind {
            ExportKind::Transactions => {
                let feed = Self::recent_transactions(incomes, expenses, options.feed_limit);
                for entry in feed.entries {
                    table.push_row(vec![
                        Cell::Text(entry.date.format(ISO_DATE_FORMAT).to_string()),
                        entry.polarity.type_label().into(),
                        Cell::Text(entry.label),
                        entry.method.as_str().into(),
                        Cell::Number(entry.amount),
                    ]);
                }
            }
            ExportKind::Ledger => {
                push_income_rows(&mut table, incomes);
                push_expense_rows(&mut table, expenses);
            }
            ExportKind::Income => push_income_rows(&mut table, incomes),
            ExportKind::Expenses => push_expense_rows(&mut table, expenses),
            ExportKind::ProfitAndLoss => {
                let ratios = &options.ratios;
                let cogs = -totals.expense_total * ratios.cogs;
                let operating = -totals.expense_total * ratios.operating;
                table.push_row(vec!["Revenue".into(), totals.income_total.into()]);
                table.push_row(vec!["COGS".into(), cogs.into()]);
                table.push_row(vec![
                    "Gross Profit".into(),
                    (totals.income_total + cogs).into(),
                ]);
                table.push_row(vec!["Operating Expenses".into(), operating.into()]);
                table.push_row(vec!["Net Profit".into(), totals.net.into()]);
            }
            ExportKind::TaxSummary => {
                let ratios = &options.ratios;
                let estimated = (totals.net * ratios.tax_rate).max(0.0);
                table.push_row(vec![
                    "Deductible".into(),
                    (totals.expense_total * ratios.deductible).into(),
                ]);
                table.push_row(vec![
                    "Non-deductible".into(),
                    (totals.expense_total * ratios.non_deductible).into(),
                ]);
                table.push_row(vec!["Estimated tax".into(), estimated.into()]);
            }
        }
        table
    }

    /// Like [`Aggregator::export_table`], parsing the kind selector first.
    pub fn export_table_for(
        kind: &str,
        incomes: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        totals: &Totals,
        options: &ExportOptions,
    ) -> CoreResult<ExportTable> {
        let kind: ExportKind = kind.parse()?;
        Ok(Self::export_table(kind, incomes, expenses, totals, options))
    }
}

/// Returns the amount used for aggregation, treating non-finite values as zero.
pub fn effective_amount<T: Amounted + Identifiable>(record: &T) -> f64 {
    let amount = record.amount();
    if amount.is_finite() {
        amount
    } else {
        warn!(id = record.id(), "non-finite amount treated as zero");
        0.0
    }
}

fn sum_amounts<'a, T, I>(records: I) -> f64
where
    T: Amounted + Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .fold(0.0, |acc, record| acc + effective_amount(record))
}

fn breakdown_by_label<T: Amounted + Identifiable + Labelled>(records: &[T]) -> CategoryBreakdown {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(String, f64)> = Vec::new();
    for record in records {
        let index = *positions.entry(record.label()).or_insert_with(|| {
            entries.push((record.label().to_string(), 0.0));
            entries.len() - 1
        });
        entries[index].1 += effective_amount(record);
    }
    CategoryBreakdown { entries }
}

fn push_income_rows(table: &mut ExportTable, incomes: &[IncomeRecord]) {
    for income in incomes {
        table.push_row(vec![
            Polarity::Credit.type_label().into(),
            Cell::Text(income.date.format(ISO_DATE_FORMAT).to_string()),
            Cell::Text(income.source.clone()),
            income.method.as_str().into(),
            income.status.as_str().into(),
            Cell::Number(Polarity::Credit.apply(effective_amount(income))),
        ]);
    }
}

fn push_expense_rows(table: &mut ExportTable, expenses: &[ExpenseRecord]) {
    for expense in expenses {
        table.push_row(vec![
            Polarity::Debit.type_label().into(),
            Cell::Text(expense.date.format(ISO_DATE_FORMAT).to_string()),
            Cell::Text(expense.category.clone()),
            expense.method.as_str().into(),
            expense.status.as_str().into(),
            Cell::Number(Polarity::Debit.apply(effective_amount(expense))),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finex_domain::{ExpenseStatus, IncomeStatus, PaymentMethod};

    fn date(raw: &str) -> NaiveDate {
        Aggregator::parse_date(raw).expect("valid date")
    }

    fn income(
        id: &str,
        day: &str,
        source: &str,
        amount: f64,
        status: IncomeStatus,
    ) -> IncomeRecord {
        IncomeRecord::new(id, date(day), source, amount, PaymentMethod::Bank, status)
    }

    fn expense(id: &str, day: &str, category: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(
            id,
            date(day),
            category,
            amount,
            PaymentMethod::Card,
            ExpenseStatus::Paid,
        )
    }

    #[test]
    fn totals_include_pending_income_only() {
        let incomes = vec![
            income("i1", "2026-02-15", "Consulting", 3200.0, IncomeStatus::Received),
            income("i2", "2026-02-11", "Subscription", 540.0, IncomeStatus::Pending),
        ];
        let expenses = vec![expense("e1", "2026-02-14", "Rent", 4100.0)];
        let totals = Aggregator::totals(&incomes, &expenses);
        assert_eq!(totals.income_total, 3740.0);
        assert_eq!(totals.expense_total, 4100.0);
        assert_eq!(totals.net, -360.0);
        assert_eq!(totals.pending, 540.0);
    }

    #[test]
    fn non_finite_amounts_count_as_zero() {
        let incomes = vec![
            income("i1", "2026-02-15", "A", f64::NAN, IncomeStatus::Pending),
            income("i2", "2026-02-16", "B", 10.0, IncomeStatus::Pending),
        ];
        let expenses = vec![expense("e1", "2026-02-14", "Rent", f64::INFINITY)];
        let totals = Aggregator::totals(&incomes, &expenses);
        assert_eq!(totals.income_total, 10.0);
        assert_eq!(totals.expense_total, 0.0);
        assert_eq!(totals.pending, 10.0);

        let series = Aggregator::time_series(&incomes, &expenses, Granularity::Week);
        assert!(series.income_series.iter().all(|value| value.is_finite()));
        assert!(series.expense_series.iter().all(|value| *value == 0.0));
    }

    #[test]
    fn weekday_index_is_monday_first() {
        assert_eq!(Aggregator::weekday_index_of("2026-02-16").unwrap(), 0);
        assert_eq!(Aggregator::weekday_index_of("2026-02-22").unwrap(), 6);
        assert_eq!(Aggregator::weekday_index_of("2026-02-18").unwrap(), 2);
    }

    #[test]
    fn malformed_dates_are_invalid_input() {
        for raw in ["2026-13-01", "16/02/2026", "", "2026-02-30"] {
            let err = Aggregator::parse_date(raw).expect_err("malformed date");
            assert!(matches!(err, CoreError::InvalidInput(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn weekly_series_collapses_weeks_onto_weekdays() {
        let incomes = vec![
            income("i1", "2026-02-16", "A", 100.0, IncomeStatus::Received),
            income("i2", "2026-02-09", "B", 50.0, IncomeStatus::Received),
            income("i3", "2026-02-22", "C", 7.0, IncomeStatus::Received),
        ];
        let series = Aggregator::time_series(&incomes, &[], Granularity::Week);
        assert_eq!(series.labels, WEEKDAY_LABELS.to_vec());
        assert_eq!(series.income_series, vec![150.0, 0.0, 0.0, 0.0, 0.0, 0.0, 7.0]);
        assert_eq!(series.expense_series, vec![0.0; 7]);
    }

    #[test]
    fn monthly_series_collapses_years_onto_months() {
        let expenses = vec![
            expense("e1", "2025-03-05", "Rent", 10.0),
            expense("e2", "2026-03-20", "Rent", 5.0),
            expense("e3", "2026-12-31", "Payroll", 1.0),
        ];
        let series = Aggregator::time_series(&[], &expenses, Granularity::Month);
        assert_eq!(series.len(), 12);
        assert_eq!(series.labels[0], "Jan");
        assert_eq!(series.expense_series[2], 15.0);
        assert_eq!(series.expense_series[11], 1.0);
    }

    #[test]
    fn unknown_range_is_invalid_argument() {
        let err = Aggregator::time_series_for(&[], &[], "quarter").expect_err("unknown range");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
        let series = Aggregator::time_series_for(&[], &[], "month").expect("month range");
        assert_eq!(series.granularity, Granularity::Month);
    }

    #[test]
    fn category_breakdown_keeps_first_seen_order() {
        let expenses = vec![
            expense("e1", "2026-02-14", "Software", 240.0),
            expense("e2", "2026-02-12", "Payroll", 7500.0),
            expense("e3", "2026-02-10", "Software", 60.0),
            expense("e4", "2026-02-08", "Rent", 4100.0),
        ];
        let breakdown = Aggregator::category_breakdown(&expenses);
        assert_eq!(
            breakdown.labels().collect::<Vec<_>>(),
            vec!["Software", "Payroll", "Rent"]
        );
        assert_eq!(breakdown.get("Software"), Some(300.0));
        assert_eq!(breakdown.total(), 11_900.0);
    }

    #[test]
    fn feed_is_signed_sorted_and_limited() {
        let incomes = vec![
            income("i1", "2026-02-10", "Services", 4200.0, IncomeStatus::Received),
            income("i2", "2026-02-12", "Sales", 1180.0, IncomeStatus::Received),
        ];
        let expenses = vec![expense("e1", "2026-02-12", "Payroll", 7500.0)];

        let feed = Aggregator::recent_transactions(&incomes, &expenses, 2);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.entries[0].date, date("2026-02-12"));
        assert_eq!(feed.entries[0].polarity, Polarity::Credit);
        assert_eq!(feed.entries[1].date, date("2026-02-12"));
        assert_eq!(feed.entries[1].polarity, Polarity::Debit);
        assert_eq!(feed.entries[1].amount, -7500.0);

        let full = Aggregator::recent_transactions(&incomes, &expenses, DEFAULT_FEED_LIMIT);
        assert_eq!(full.len(), 3);
        assert_eq!(full.entries[2].date, date("2026-02-10"));
    }

    #[test]
    fn zero_limit_yields_empty_feed() {
        let incomes = vec![income("i1", "2026-02-10", "A", 1.0, IncomeStatus::Received)];
        assert!(Aggregator::recent_transactions(&incomes, &[], 0).is_empty());
    }

    #[test]
    fn kpis_follow_dashboard_rounding() {
        let totals = Totals::from_sums(3000.0, 3375.0, 0.0);
        let kpis = Aggregator::kpis(&totals);
        assert_eq!(kpis.average_daily_income, 100.0);
        assert_eq!(kpis.margin_percent, -12.0);

        let empty = Aggregator::kpis(&Totals::default());
        assert_eq!(empty.margin_percent, 0.0);
    }

    #[test]
    fn ledger_export_negates_expenses() {
        let incomes = vec![income(
            "i1",
            "2026-02-15",
            "Consulting",
            3200.0,
            IncomeStatus::Received,
        )];
        let expenses = vec![expense("e1", "2026-02-14", "Rent", 4100.0)];
        let totals = Aggregator::totals(&incomes, &expenses);
        let table = Aggregator::export_table(
            ExportKind::Ledger,
            &incomes,
            &expenses,
            &totals,
            &ExportOptions::default(),
        );
        assert_eq!(table.header[0], "Type");
        assert_eq!(
            table.rows[0],
            vec![
                Cell::text("Income"),
                Cell::text("2026-02-15"),
                Cell::text("Consulting"),
                Cell::text("Bank"),
                Cell::text("Received"),
                Cell::Number(3200.0),
            ]
        );
        assert_eq!(table.rows[1][0], Cell::text("Expense"));
        assert_eq!(table.rows[1][5], Cell::Number(-4100.0));
    }

    #[test]
    fn income_and_expense_exports_filter_one_side() {
        let incomes = vec![income("i1", "2026-02-15", "Consulting", 1.0, IncomeStatus::Received)];
        let expenses = vec![expense("e1", "2026-02-14", "Rent", 2.0)];
        let totals = Aggregator::totals(&incomes, &expenses);
        let options = ExportOptions::default();
        let income_only =
            Aggregator::export_table(ExportKind::Income, &incomes, &expenses, &totals, &options);
        let expense_only =
            Aggregator::export_table(ExportKind::Expenses, &incomes, &expenses, &totals, &options);
        assert_eq!(income_only.len(), 1);
        assert_eq!(income_only.rows[0][0], Cell::text("Income"));
        assert_eq!(expense_only.len(), 1);
        assert_eq!(expense_only.rows[0][0], Cell::text("Expense"));
    }

    #[test]
    fn ledger_export_writes_non_finite_amounts_as_zero() {
        let incomes = vec![income(
            "i1",
            "2026-02-15",
            "Grant",
            f64::INFINITY,
            IncomeStatus::Received,
        )];
        let expenses = vec![expense("e1", "2026-02-14", "Rent", f64::NAN)];
        let totals = Aggregator::totals(&incomes, &expenses);
        let options = ExportOptions::default();
        for kind in [ExportKind::Ledger, ExportKind::Income, ExportKind::Expenses] {
            let table = Aggregator::export_table(kind, &incomes, &expenses, &totals, &options);
            assert!(
                table.rows.iter().all(|row| row[5] == Cell::Number(0.0)),
                "{kind}: {:?}",
                table.rows
            );
            let csv = crate::encode_table(&table).expect("encode");
            assert!(!csv.contains("NaN") && !csv.contains("inf"), "{csv}");
        }
        assert_eq!(totals.expense_total, 0.0);
    }

    #[test]
    fn tax_summary_clamps_negative_estimate() {
        let totals = Totals::from_sums(100.0, 500.0, 0.0);
        let table = Aggregator::export_table(
            ExportKind::TaxSummary,
            &[],
            &[],
            &totals,
            &ExportOptions::default(),
        );
        assert_eq!(table.rows[0], vec![Cell::text("Deductible"), Cell::Number(350.0)]);
        assert_eq!(table.rows[1], vec![Cell::text("Non-deductible"), Cell::Number(150.0)]);
        assert_eq!(table.rows[2], vec![Cell::text("Estimated tax"), Cell::Number(0.0)]);
    }

    #[test]
    fn custom_ratios_override_demo_values() {
        let totals = Totals::from_sums(1000.0, 500.0, 0.0);
        let options = ExportOptions {
            ratios: ReportRatios {
                tax_rate: 0.5,
                ..ReportRatios::default()
            },
            feed_limit: DEFAULT_FEED_LIMIT,
        };
        let table = Aggregator::export_table(ExportKind::TaxSummary, &[], &[], &totals, &options);
        assert_eq!(table.rows[2][1], Cell::Number(250.0));
    }

    #[test]
    fn transactions_export_respects_feed_limit() {
        let incomes: Vec<IncomeRecord> = (1..=9)
            .map(|day| {
                income(
                    &format!("i{day}"),
                    &format!("2026-02-{day:02}"),
                    "Sales",
                    day as f64,
                    IncomeStatus::Received,
                )
            })
            .collect();
        let totals = Aggregator::totals(&incomes, &[]);
        let options = ExportOptions {
            feed_limit: 3,
            ..ExportOptions::default()
        };
        let table =
            Aggregator::export_table(ExportKind::Transactions, &incomes, &[], &totals, &options);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0][0], Cell::text("2026-02-09"));
        assert_eq!(table.rows[0][1], Cell::text("Income"));
        assert_eq!(table.rows[0][4], Cell::Number(9.0));
    }

    #[test]
    fn unknown_export_kind_is_invalid_argument() {
        let err = Aggregator::export_table_for(
            "balance-sheet",
            &[],
            &[],
            &Totals::default(),
            &ExportOptions::default(),
        )
        .expect_err("unknown kind");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }
}
