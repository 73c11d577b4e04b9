//! Ownership of the two record collections.
//!
//! `FinanceRepository` is the only component that mutates records. It
//! validates every snapshot at the boundary, so aggregation downstream can
//! rely on finite, non-negative amounts and unique identifiers.

use std::{collections::HashSet, sync::Arc};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use finex_domain::{
    Amounted, ExpenseRecord, ExpenseStatus, Identifiable, IncomeRecord, IncomeStatus,
    PaymentMethod,
};

use crate::{
    seed,
    storage::{snapshot_warnings, SnapshotStore},
    time::{Clock, SystemClock},
    CoreError, CoreResult,
};

pub const INCOMES_KEY: &str = "finex-incomes";
pub const EXPENSES_KEY: &str = "finex-expenses";

/// Form payload for a new income record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub source: String,
    pub amount: f64,
    /// Defaults to today when absent.
    pub date: Option<NaiveDate>,
    pub method: PaymentMethod,
    pub status: IncomeStatus,
    pub note: String,
}

impl NewIncome {
    pub fn new(source: impl Into<String>, amount: f64) -> Self {
        Self {
            source: source.into(),
            amount,
            date: None,
            method: PaymentMethod::default(),
            status: IncomeStatus::default(),
            note: String::new(),
        }
    }
}

/// Form payload for a new expense record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    /// Defaults to today when absent.
    pub date: Option<NaiveDate>,
    pub method: PaymentMethod,
    pub status: ExpenseStatus,
    pub note: String,
}

impl NewExpense {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
            date: None,
            method: PaymentMethod::default(),
            status: ExpenseStatus::default(),
            note: String::new(),
        }
    }
}

/// Loads, validates and persists the income and expense collections.
pub struct FinanceRepository<S: SnapshotStore> {
    store: S,
    clock: Arc<dyn Clock>,
    incomes: Vec<IncomeRecord>,
    expenses: Vec<ExpenseRecord>,
}

impl<S: SnapshotStore> FinanceRepository<S> {
    /// Opens the repository using the wall clock.
    pub fn open(store: S) -> CoreResult<Self> {
        Self::open_with_clock(store, Arc::new(SystemClock))
    }

    /// Opens the repository, seeding any collection that was never persisted.
    ///
    /// Both snapshots are loaded and validated before anything is written, so
    /// a failed open leaves the store untouched.
    pub fn open_with_clock(store: S, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        let stored_incomes = load_snapshot::<_, IncomeRecord>(&store, INCOMES_KEY)?;
        let stored_expenses = load_snapshot::<_, ExpenseRecord>(&store, EXPENSES_KEY)?;
        if let Some(incomes) = &stored_incomes {
            validate_records("income", incomes)?;
        }
        if let Some(expenses) = &stored_expenses {
            validate_records("expense", expenses)?;
        }

        let incomes = match stored_incomes {
            Some(incomes) => incomes,
            None => seed_key(&store, INCOMES_KEY, seed::seed_incomes())?,
        };
        let expenses = match stored_expenses {
            Some(expenses) => expenses,
            None => seed_key(&store, EXPENSES_KEY, seed::seed_expenses())?,
        };
        for warning in snapshot_warnings(&incomes, &expenses) {
            warn!("{warning}");
        }
        Ok(Self {
            store,
            clock,
            incomes,
            expenses,
        })
    }

    /// Overwrites both snapshots with the demo records without reading them
    /// first, which recovers a store holding a corrupt snapshot.
    pub fn reset_store(store: S) -> CoreResult<Self> {
        Self::reset_store_with_clock(store, Arc::new(SystemClock))
    }

    pub fn reset_store_with_clock(store: S, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        let incomes = seed::seed_incomes();
        let expenses = seed::seed_expenses();
        persist_pair(&store, &incomes, &expenses)?;
        info!("store reset to demo records");
        Ok(Self {
            store,
            clock,
            incomes,
            expenses,
        })
    }

    pub fn incomes(&self) -> &[IncomeRecord] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and persists a whole new income collection.
    pub fn replace_incomes(&mut self, incomes: Vec<IncomeRecord>) -> CoreResult<()> {
        validate_records("income", &incomes)?;
        persist(&self.store, INCOMES_KEY, &incomes)?;
        self.incomes = incomes;
        Ok(())
    }

    /// Validates and persists a whole new expense collection.
    pub fn replace_expenses(&mut self, expenses: Vec<ExpenseRecord>) -> CoreResult<()> {
        validate_records("expense", &expenses)?;
        persist(&self.store, EXPENSES_KEY, &expenses)?;
        self.expenses = expenses;
        Ok(())
    }

    /// Prepends a new income record and returns its generated identifier.
    pub fn add_income(&mut self, form: NewIncome) -> CoreResult<String> {
        let source = required_label("source", &form.source)?;
        require_positive(form.amount)?;
        let record = IncomeRecord {
            id: Uuid::new_v4().to_string(),
            date: form.date.unwrap_or_else(|| self.clock.today()),
            source,
            amount: form.amount,
            method: form.method,
            status: form.status,
            note: form.note,
        };
        let id = record.id.clone();
        let mut next = Vec::with_capacity(self.incomes.len() + 1);
        next.push(record);
        next.extend(self.incomes.iter().cloned());
        self.replace_incomes(next)?;
        debug!(%id, "income added");
        Ok(id)
    }

    /// Prepends a new expense record and returns its generated identifier.
    pub fn add_expense(&mut self, form: NewExpense) -> CoreResult<String> {
        let category = required_label("category", &form.category)?;
        require_positive(form.amount)?;
        let record = ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            date: form.date.unwrap_or_else(|| self.clock.today()),
            category,
            amount: form.amount,
            method: form.method,
            status: form.status,
            note: form.note,
        };
        let id = record.id.clone();
        let mut next = Vec::with_capacity(self.expenses.len() + 1);
        next.push(record);
        next.extend(self.expenses.iter().cloned());
        self.replace_expenses(next)?;
        debug!(%id, "expense added");
        Ok(id)
    }

    /// Restores and persists the demo seed collections.
    pub fn reset(&mut self) -> CoreResult<()> {
        let incomes = seed::seed_incomes();
        let expenses = seed::seed_expenses();
        persist_pair(&self.store, &incomes, &expenses)?;
        self.incomes = incomes;
        self.expenses = expenses;
        Ok(())
    }
}

/// Checks the ingestion invariants of a collection.
///
/// Amounts must be finite and non-negative, identifiers non-empty and unique.
pub fn validate_records<T: Amounted + Identifiable>(kind: &str, records: &[T]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let id = record.id();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidInput(format!("{kind} record with empty id")));
        }
        if !seen.insert(id) {
            return Err(CoreError::InvalidInput(format!("duplicate {kind} id `{id}`")));
        }
        let amount = record.amount();
        if !amount.is_finite() {
            return Err(CoreError::InvalidInput(format!(
                "{kind} `{id}` has a non-finite amount"
            )));
        }
        if amount < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "{kind} `{id}` has a negative amount {amount}"
            )));
        }
    }
    Ok(())
}

fn required_label(field: &str, value: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn require_positive(amount: f64) -> CoreResult<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "amount must be a positive number, got {amount}"
        )))
    }
}

fn load_snapshot<S, T>(store: &S, key: &str) -> CoreResult<Option<Vec<T>>>
where
    S: SnapshotStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(snapshot) = store.load(key)? else {
        return Ok(None);
    };
    let records: Vec<T> = serde_json::from_str(&snapshot)
        .map_err(|err| CoreError::Serde(format!("{key}: {err}")))?;
    debug!(key, count = records.len(), "snapshot loaded");
    Ok(Some(records))
}

fn seed_key<S, T>(store: &S, key: &str, records: Vec<T>) -> CoreResult<Vec<T>>
where
    S: SnapshotStore + ?Sized,
    T: Serialize,
{
    info!(key, count = records.len(), "no snapshot, using seed data");
    store.save(key, &encode_snapshot(&records)?)?;
    Ok(records)
}

fn encode_snapshot<T: Serialize>(records: &[T]) -> CoreResult<String> {
    serde_json::to_string(records).map_err(|err| CoreError::Serde(err.to_string()))
}

fn persist<S, T>(store: &S, key: &str, records: &[T]) -> CoreResult<()>
where
    S: SnapshotStore + ?Sized,
    T: Serialize,
{
    store.save(key, &encode_snapshot(records)?)?;
    debug!(key, count = records.len(), "snapshot saved");
    Ok(())
}

/// Encodes both collections before saving either.
fn persist_pair<S>(
    store: &S,
    incomes: &[IncomeRecord],
    expenses: &[ExpenseRecord],
) -> CoreResult<()>
where
    S: SnapshotStore + ?Sized,
{
    let incomes_snapshot = encode_snapshot(incomes)?;
    let expenses_snapshot = encode_snapshot(expenses)?;
    store.save(INCOMES_KEY, &incomes_snapshot)?;
    store.save(EXPENSES_KEY, &expenses_snapshot)?;
    debug!(incomes = incomes.len(), expenses = expenses.len(), "snapshots saved");
    Ok(())
}
