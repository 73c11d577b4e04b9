use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use chrono::Datelike;

use finex_domain::{ExpenseRecord, IncomeRecord};

use crate::CoreError;

/// Key-value persistence for whole-collection JSON snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Returns the stored snapshot, or `None` when the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;
    /// Replaces the snapshot stored under `key`.
    fn save(&self, key: &str, snapshot: &str) -> Result<(), CoreError>;
}

/// In-process store, used for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a raw snapshot.
    pub fn with_snapshot(key: impl Into<String>, snapshot: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), snapshot.into());
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .map(|guard| guard.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &str, snapshot: &str) -> Result<(), CoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        guard.insert(key.to_string(), snapshot.to_string());
        Ok(())
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, snapshot: &str) -> Result<(), CoreError> {
        (**self).save(key, snapshot)
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Arc<T> {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, snapshot: &str) -> Result<(), CoreError> {
        (**self).save(key, snapshot)
    }
}

/// Detects non-fatal anomalies within a snapshot pair.
pub fn snapshot_warnings(incomes: &[IncomeRecord], expenses: &[ExpenseRecord]) -> Vec<String> {
    let mut warnings = Vec::new();

    for income in incomes {
        if income.source.trim().is_empty() {
            warnings.push(format!("income {} has an empty source", income.id));
        }
        if income.amount == 0.0 {
            warnings.push(format!("income {} has a zero amount", income.id));
        }
    }
    for expense in expenses {
        if expense.category.trim().is_empty() {
            warnings.push(format!("expense {} has an empty category", expense.id));
        }
        if expense.amount == 0.0 {
            warnings.push(format!("expense {} has a zero amount", expense.id));
        }
    }

    let years: BTreeSet<i32> = incomes
        .iter()
        .map(|income| income.date.year())
        .chain(expenses.iter().map(|expense| expense.date.year()))
        .collect();
    if years.len() > 1 {
        warnings.push(format!(
            "records span {} calendar years; monthly series merge them",
            years.len()
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn memory_store_round_trips_snapshots() {
        let store = MemoryStore::new();
        assert_eq!(store.load("finex-incomes").unwrap(), None);
        store.save("finex-incomes", "[]").unwrap();
        assert_eq!(store.load("finex-incomes").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.keys(), vec!["finex-incomes".to_string()]);
    }

    #[test]
    fn seed_data_has_no_warnings() {
        assert!(snapshot_warnings(&seed::seed_incomes(), &seed::seed_expenses()).is_empty());
    }

    #[test]
    fn warns_about_multi_year_snapshots_and_blank_labels() {
        let mut expenses = seed::seed_expenses();
        expenses[0].date = chrono::NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        expenses[1].category = "  ".into();
        let warnings = snapshot_warnings(&seed::seed_incomes(), &expenses);
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("empty category")));
        assert!(warnings.iter().any(|w| w.contains("2 calendar years")));
    }
}
