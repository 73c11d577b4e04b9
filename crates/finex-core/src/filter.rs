//! Status and text filtering for the income and expense lists.

use std::str::FromStr;

use finex_domain::{
    ExpenseRecord, ExpenseStatus, IncomeRecord, IncomeStatus, Labelled, ParseEnumError,
};

/// Status chip selection: everything, or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn accepts(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl<S> FromStr for StatusFilter<S>
where
    S: FromStr<Err = ParseEnumError>,
{
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        value.parse().map(StatusFilter::Only)
    }
}

/// Status selection plus an optional case-insensitive search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter<S> {
    pub status: StatusFilter<S>,
    pub query: Option<String>,
}

impl<S> Default for RecordFilter<S> {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            query: None,
        }
    }
}

impl<S: PartialEq> RecordFilter<S> {
    pub fn new(status: StatusFilter<S>) -> Self {
        Self {
            status,
            query: None,
        }
    }

    /// Adds a search query; blank queries are ignored.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        let trimmed = query.trim();
        self.query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
        self
    }

    fn matches<R: Labelled>(&self, status: &S, record: &R, note: &str) -> bool {
        if !self.status.accepts(status) {
            return false;
        }
        match &self.query {
            None => true,
            Some(query) => {
                record.label().to_lowercase().contains(query.as_str())
                    || note.to_lowercase().contains(query.as_str())
            }
        }
    }
}

/// Income records accepted by `filter`, in input order.
pub fn filter_incomes<'a>(
    incomes: &'a [IncomeRecord],
    filter: &RecordFilter<IncomeStatus>,
) -> Vec<&'a IncomeRecord> {
    incomes
        .iter()
        .filter(|income| filter.matches(&income.status, *income, &income.note))
        .collect()
}

/// Expense records accepted by `filter`, in input order.
pub fn filter_expenses<'a>(
    expenses: &'a [ExpenseRecord],
    filter: &RecordFilter<ExpenseStatus>,
) -> Vec<&'a ExpenseRecord> {
    expenses
        .iter()
        .filter(|expense| filter.matches(&expense.status, *expense, &expense.note))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn status_filter_parses_all_and_specific_states() {
        let all: StatusFilter<IncomeStatus> = "All".parse().unwrap();
        assert_eq!(all, StatusFilter::All);
        let pending: StatusFilter<IncomeStatus> = "pending".parse().unwrap();
        assert_eq!(pending, StatusFilter::Only(IncomeStatus::Pending));
        assert!("paid".parse::<StatusFilter<IncomeStatus>>().is_err());
    }

    #[test]
    fn pending_incomes_are_selected() {
        let incomes = seed::seed_incomes();
        let filter = RecordFilter::new(StatusFilter::Only(IncomeStatus::Pending));
        let selected = filter_incomes(&incomes, &filter);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].source, "Subscription");
    }

    #[test]
    fn query_matches_label_or_note_case_insensitively() {
        let incomes = seed::seed_incomes();
        let by_note = RecordFilter::default().with_query("STRIPE");
        assert_eq!(filter_incomes(&incomes, &by_note).len(), 1);

        let expenses = seed::seed_expenses();
        let by_label = RecordFilter::new(StatusFilter::Only(ExpenseStatus::Paid)).with_query("ro");
        let selected = filter_expenses(&expenses, &by_label);
        assert_eq!(
            selected.iter().map(|e| e.category.as_str()).collect::<Vec<_>>(),
            vec!["Payroll"]
        );
    }

    #[test]
    fn blank_query_is_ignored() {
        let expenses = seed::seed_expenses();
        let filter = RecordFilter::default().with_query("   ");
        assert!(filter.query.is_none());
        assert_eq!(filter_expenses(&expenses, &filter).len(), expenses.len());
    }
}
