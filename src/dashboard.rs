//! Composition of the repository, preferences and aggregator into the views
//! rendered by the dashboard.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;

use finex_config::Config;
use finex_core::{
    encode_table, filter_expenses, filter_incomes, Aggregator, ExportOptions, FinanceRepository,
    RecordFilter, SnapshotStore,
};
use finex_domain::{
    CategoryBreakdown, ExpenseRecord, ExpenseStatus, ExportKind, ExportTable, Granularity,
    IncomeRecord, IncomeStatus, Kpis, TimeSeries, Totals, TransactionFeed,
};

use crate::errors::FinexResult;

/// Every derived view shown on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub totals: Totals,
    pub kpis: Kpis,
    pub series: TimeSeries,
    pub categories: CategoryBreakdown,
    pub sources: CategoryBreakdown,
    pub feed: TransactionFeed,
}

impl DashboardSnapshot {
    pub fn build(
        incomes: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        range: Granularity,
        feed_limit: usize,
    ) -> Self {
        let totals = Aggregator::totals(incomes, expenses);
        Self {
            kpis: Aggregator::kpis(&totals),
            totals,
            series: Aggregator::time_series(incomes, expenses, range),
            categories: Aggregator::category_breakdown(expenses),
            sources: Aggregator::source_breakdown(incomes),
            feed: Aggregator::recent_transactions(incomes, expenses, feed_limit),
        }
    }
}

/// An encoded export ready to be written or printed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedExport {
    pub kind: ExportKind,
    pub rows: usize,
    pub csv: String,
}

impl RenderedExport {
    /// Writes the CSV into `dir` under the kind's file name, replacing any previous export.
    pub fn write_to(&self, dir: &Path) -> FinexResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.kind.file_name());
        let tmp = path.with_extension("csv.tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(self.csv.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&tmp, &path)?;
        info!(kind = %self.kind, rows = self.rows, path = %path.display(), "export written");
        Ok(path)
    }
}

/// Repository plus preferences: the state behind a dashboard session.
pub struct Dashboard<S: SnapshotStore> {
    repository: FinanceRepository<S>,
    config: Config,
}

impl<S: SnapshotStore> Dashboard<S> {
    pub fn new(repository: FinanceRepository<S>, config: Config) -> Self {
        Self { repository, config }
    }

    pub fn repository_mut(&mut self) -> &mut FinanceRepository<S> {
        &mut self.repository
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Overview for `range`, or the configured default range.
    pub fn snapshot(&self, range: Option<Granularity>) -> DashboardSnapshot {
        DashboardSnapshot::build(
            self.repository.incomes(),
            self.repository.expenses(),
            range.unwrap_or(self.config.default_range),
            self.config.feed_limit,
        )
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            ratios: self.config.ratios,
            feed_limit: self.config.feed_limit,
        }
    }

    pub fn export_table(&self, kind: ExportKind) -> ExportTable {
        let incomes = self.repository.incomes();
        let expenses = self.repository.expenses();
        let totals = Aggregator::totals(incomes, expenses);
        Aggregator::export_table(kind, incomes, expenses, &totals, &self.export_options())
    }

    pub fn export(&self, kind: ExportKind) -> FinexResult<RenderedExport> {
        let table = self.export_table(kind);
        Ok(RenderedExport {
            kind,
            rows: table.len(),
            csv: encode_table(&table)?,
        })
    }

    pub fn incomes_matching(&self, filter: &RecordFilter<IncomeStatus>) -> Vec<&IncomeRecord> {
        filter_incomes(self.repository.incomes(), filter)
    }

    pub fn expenses_matching(&self, filter: &RecordFilter<ExpenseStatus>) -> Vec<&ExpenseRecord> {
        filter_expenses(self.repository.expenses(), filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finex_core::MemoryStore;

    fn dashboard(config: Config) -> Dashboard<MemoryStore> {
        let repository = FinanceRepository::open(MemoryStore::new()).expect("open repository");
        Dashboard::new(repository, config)
    }

    #[test]
    fn snapshot_uses_configured_defaults() {
        let mut config = Config::default();
        config.feed_limit = 3;
        config.default_range = Granularity::Month;
        let snapshot = dashboard(config).snapshot(None);

        assert_eq!(snapshot.series.len(), 12);
        assert_eq!(snapshot.feed.len(), 3);
        assert_eq!(snapshot.totals.net, -3690.0);
        assert_eq!(snapshot.kpis.margin_percent, -38.0);
        assert_eq!(snapshot.sources.len(), 5);
    }

    #[test]
    fn export_honours_configured_ratios() {
        let mut config = Config::default();
        config.ratios.cogs = 0.5;
        let rendered = dashboard(config)
            .export(ExportKind::ProfitAndLoss)
            .expect("export");
        assert_eq!(rendered.rows, 5);
        assert!(rendered.csv.contains("\"COGS\",\"-6715\""), "{}", rendered.csv);
    }
}
