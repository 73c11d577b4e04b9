//! Command-line front end for the dashboard.

pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use finex_config::{Config, ConfigManager, RatioKey};
use finex_core::{
    Aggregator, CoreError, CurrencyFormatter, DateFormatter, FinanceRepository, NewExpense,
    NewIncome, RecordFilter, ShortDateFormatter, StatusFilter, WholeUnitFormatter,
};
use finex_domain::{ExpenseStatus, ExportKind, Granularity, IncomeStatus, PaymentMethod};
use finex_storage_json::JsonFileStore;

use crate::{
    dashboard::{Dashboard, DashboardSnapshot},
    errors::FinexResult,
};

#[derive(Parser, Debug)]
#[command(name = "finex", version, about = "Income and expense dashboard")]
pub struct Cli {
    /// Directory holding the record snapshots (overrides the configured one)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path of the preferences file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Totals, KPIs, chart series, breakdowns and the recent feed
    Summary {
        /// `week` or `month`; defaults to the configured range
        #[arg(long)]
        range: Option<String>,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List records of one collection
    List {
        #[arg(value_enum)]
        collection: Collection,
        /// Status filter, or `all`
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive match on title or note
        #[arg(long)]
        search: Option<String>,
    },
    /// Add an income or expense record
    Add {
        #[arg(value_enum)]
        collection: Collection,
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Export a report as CSV
    Export {
        /// transactions, ledger, income, expenses, profit-and-loss or tax-summary
        kind: String,
        /// Write `<kind file>.csv` into this directory instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show or change preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Restore the demo records
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    #[value(alias = "incomes")]
    Income,
    #[value(alias = "expense")]
    Expenses,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Source for incomes, category for expenses
    #[arg(long)]
    pub title: String,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: f64,
    /// ISO date, defaults to today
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub method: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    Show,
    /// Override a report ratio, e.g. `set-ratio tax-rate 0.2`
    SetRatio { name: String, value: f64 },
    /// Rows shown in the recent feed and the transactions export
    SetLimit { limit: usize },
    SetCurrency { code: String },
}

/// Executes a parsed command line.
pub fn run(cli: Cli) -> FinexResult<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::platform_default(),
    };
    debug!(path = %manager.config_path().display(), "using config");

    if let Command::Config { action } = &cli.command {
        return run_config(&manager, action);
    }

    let config = manager.load()?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.resolve_data_dir());
    let store = JsonFileStore::new(data_dir)?;
    if let Command::Reset = cli.command {
        FinanceRepository::reset_store(store)?;
        output::success("Demo records restored");
        return Ok(());
    }
    let mut dashboard = Dashboard::new(FinanceRepository::open(store)?, config);

    match cli.command {
        Command::Summary { range, json } => {
            let range = range
                .as_deref()
                .map(str::parse::<Granularity>)
                .transpose()
                .map_err(CoreError::from)?;
            let snapshot = dashboard.snapshot(range);
            if json {
                output::info(serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_summary(&snapshot, dashboard.config());
            }
        }
        Command::List {
            collection,
            status,
            search,
        } => list_records(&dashboard, collection, status.as_deref(), search.as_deref())?,
        Command::Add { collection, record } => {
            let id = add_record(&mut dashboard, collection, record)?;
            let label = match collection {
                Collection::Income => "income",
                Collection::Expenses => "expense",
            };
            output::success(format!("Added {label} {id}"));
        }
        Command::Export { kind, out } => {
            let kind: ExportKind = kind.parse().map_err(CoreError::from)?;
            let rendered = dashboard.export(kind)?;
            match out {
                Some(dir) => {
                    let path = rendered.write_to(&dir)?;
                    output::success(format!(
                        "Exported {} rows to {}",
                        rendered.rows,
                        path.display()
                    ));
                }
                None => output::info(rendered.csv),
            }
        }
        Command::Config { .. } | Command::Reset => {}
    }
    Ok(())
}

fn run_config(manager: &ConfigManager, action: &ConfigAction) -> FinexResult<()> {
    let config = match action {
        ConfigAction::Show => manager.load()?,
        ConfigAction::SetRatio { name, value } => {
            let key: RatioKey = name.parse()?;
            manager.update(|cfg| cfg.set_ratio(key, *value))?
        }
        ConfigAction::SetLimit { limit } => manager.update(|cfg| cfg.set_feed_limit(*limit))?,
        ConfigAction::SetCurrency { code } => manager.update(|cfg| cfg.set_currency(code))?,
    };
    if !matches!(action, ConfigAction::Show) {
        output::success("Configuration saved");
    }
    print_config(&config);
    Ok(())
}

fn print_config(config: &Config) {
    output::section("Configuration");
    let mut rows = vec![
        vec!["currency".to_string(), config.currency.clone()],
        vec!["language".to_string(), config.language.clone()],
        vec!["theme".to_string(), config.theme.to_string()],
        vec!["feed limit".to_string(), config.feed_limit.to_string()],
        vec!["default range".to_string(), config.default_range.to_string()],
        vec![
            "data dir".to_string(),
            config.resolve_data_dir().display().to_string(),
        ],
    ];
    for key in RatioKey::ALL {
        rows.push(vec![
            format!("ratio {key}"),
            key.value_in(&config.ratios).to_string(),
        ]);
    }
    for line in output::table(&rows) {
        output::info(line);
    }
}

fn print_summary(snapshot: &DashboardSnapshot, config: &Config) {
    let money = |amount: f64| WholeUnitFormatter.format_amount(amount, &config.currency);
    let totals = &snapshot.totals;

    output::section("Overview");
    let rows = vec![
        vec!["Total income".to_string(), money(totals.income_total)],
        vec!["Total expenses".to_string(), money(totals.expense_total)],
        vec!["Net".to_string(), money(totals.net)],
        vec!["Pending income".to_string(), money(totals.pending)],
        vec![
            "Avg daily income".to_string(),
            money(snapshot.kpis.average_daily_income),
        ],
        vec![
            "Margin".to_string(),
            format!("{}%", snapshot.kpis.margin_percent),
        ],
    ];
    for line in output::table(&rows) {
        output::info(line);
    }

    output::section(format!("Income vs expenses ({})", snapshot.series.granularity));
    let mut rows = vec![vec![
        String::new(),
        "Income".to_string(),
        "Expenses".to_string(),
    ]];
    rows.extend(snapshot.series.buckets().map(|(label, income, expense)| {
        vec![label.to_string(), money(income), money(expense)]
    }));
    for line in output::table(&rows) {
        output::info(line);
    }

    output::section("Expenses by category");
    let rows: Vec<Vec<String>> = snapshot
        .categories
        .entries
        .iter()
        .map(|(label, value)| vec![label.clone(), money(*value)])
        .collect();
    for line in output::table(&rows) {
        output::info(line);
    }

    output::section("Recent transactions");
    if snapshot.feed.is_empty() {
        output::info("No transactions yet");
    }
    let rows: Vec<Vec<String>> = snapshot
        .feed
        .iter()
        .map(|entry| {
            vec![
                ShortDateFormatter.format_date(entry.date),
                entry.label.clone(),
                entry.method.to_string(),
                money(entry.amount),
            ]
        })
        .collect();
    for (line, entry) in output::table(&rows).into_iter().zip(snapshot.feed.iter()) {
        output::info(output::signed(entry.amount, line));
    }
}

fn list_records<S: finex_core::SnapshotStore>(
    dashboard: &Dashboard<S>,
    collection: Collection,
    status: Option<&str>,
    search: Option<&str>,
) -> FinexResult<()> {
    let currency = &dashboard.config().currency;
    let money = |amount: f64| WholeUnitFormatter.format_amount(amount, currency);
    let rows: Vec<Vec<String>> = match collection {
        Collection::Income => {
            let status: StatusFilter<IncomeStatus> =
                status.unwrap_or("all").parse().map_err(CoreError::from)?;
            let filter = RecordFilter::new(status).with_query(search.unwrap_or_default());
            dashboard
                .incomes_matching(&filter)
                .into_iter()
                .map(|income| {
                    vec![
                        income.date.to_string(),
                        income.source.clone(),
                        income.method.to_string(),
                        income.status.to_string(),
                        money(income.amount),
                    ]
                })
                .collect()
        }
        Collection::Expenses => {
            let status: StatusFilter<ExpenseStatus> =
                status.unwrap_or("all").parse().map_err(CoreError::from)?;
            let filter = RecordFilter::new(status).with_query(search.unwrap_or_default());
            dashboard
                .expenses_matching(&filter)
                .into_iter()
                .map(|expense| {
                    vec![
                        expense.date.to_string(),
                        expense.category.clone(),
                        expense.method.to_string(),
                        expense.status.to_string(),
                        money(expense.amount),
                    ]
                })
                .collect()
        }
    };
    if rows.is_empty() {
        output::warning("No matching records");
    }
    for line in output::table(&rows) {
        output::info(line);
    }
    Ok(())
}

fn add_record<S: finex_core::SnapshotStore>(
    dashboard: &mut Dashboard<S>,
    collection: Collection,
    args: RecordArgs,
) -> FinexResult<String> {
    let date = args.date.as_deref().map(Aggregator::parse_date).transpose()?;
    let method = match args.method.as_deref() {
        Some(raw) => raw.parse::<PaymentMethod>().map_err(CoreError::from)?,
        None => PaymentMethod::default(),
    };
    let repository = dashboard.repository_mut();
    let id = match collection {
        Collection::Income => {
            let status = match args.status.as_deref() {
                Some(raw) => raw.parse::<IncomeStatus>().map_err(CoreError::from)?,
                None => IncomeStatus::default(),
            };
            repository.add_income(NewIncome {
                source: args.title,
                amount: args.amount,
                date,
                method,
                status,
                note: args.note,
            })?
        }
        Collection::Expenses => {
            let status = match args.status.as_deref() {
                Some(raw) => raw.parse::<ExpenseStatus>().map_err(CoreError::from)?,
                None => ExpenseStatus::default(),
            };
            repository.add_expense(NewExpense {
                category: args.title,
                amount: args.amount,
                date,
                method,
                status,
                note: args.note,
            })?
        }
    };
    Ok(id)
}
