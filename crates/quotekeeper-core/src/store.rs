//! The in-memory quote store.
//!
//! An insertion-ordered sequence of [`Quote`]s. Duplicates are permitted:
//! no uniqueness invariant is enforced on `add` or import; only
//! [`MergePolicy::Append`] de-duplicates, and it does so by the
//! `(text, category)` identity pair. The store grows only: there is no
//! delete or edit operation.

use std::collections::HashSet;

use thiserror::Error;

use crate::Quote;
use crate::select::ALL_CATEGORY;
use crate::storage::Storage;

/// Seed quotes used when durable storage is absent or unreadable.
const SEED_QUOTES: &[(&str, &str)] = &[
    ("Stay hungry, stay foolish.", "Inspiration"),
    ("Talk is cheap.", "Programming"),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Quote text or category was empty after trimming.
    #[error("quote text and category must both be non-empty")]
    EmptyField,
}

/// Merge stance for reconciling an incoming sequence into the store.
///
/// The two stances have materially different data-loss behavior; the choice
/// is explicit at every call site and never mixed within a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Add only incoming quotes whose identity is not already present.
    Append,
    /// Discard the current sequence and substitute the incoming one.
    Replace,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::Append => "append",
            MergePolicy::Replace => "replace",
        }
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(MergePolicy::Append),
            "replace" => Ok(MergePolicy::Replace),
            other => Err(format!(
                "unknown merge policy '{}' (expected 'append' or 'replace')",
                other
            )),
        }
    }
}

/// What a merge did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Number of incoming quotes appended under [`MergePolicy::Append`].
    Added(usize),
    /// New store length after [`MergePolicy::Replace`].
    Replaced(usize),
}

#[derive(Debug, Clone, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// The fixed seed set used when no durable data exists.
    pub fn seed() -> Self {
        Self {
            quotes: SEED_QUOTES
                .iter()
                .map(|(text, category)| Quote::new(*text, *category))
                .collect(),
        }
    }

    /// Load the store from durable storage.
    ///
    /// Absent or unparsable data falls back to the seed set, which is
    /// persisted immediately so the fallback is not re-chosen on next load.
    pub fn load(storage: &Storage) -> Self {
        match storage.load_quotes() {
            Some(quotes) => Self::from_quotes(quotes),
            None => {
                let store = Self::seed();
                if let Err(e) = storage.save_quotes(store.quotes()) {
                    tracing::warn!(error = %e, "failed to persist seed quotes");
                }
                store
            }
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Validate and append a quote.
    ///
    /// Both fields are trimmed; either being empty afterwards rejects the
    /// add with [`StoreError::EmptyField`] and leaves the store unchanged.
    /// The caller is responsible for persisting and refreshing derived views.
    pub fn add(&mut self, text: &str, category: &str) -> Result<(), StoreError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(StoreError::EmptyField);
        }
        self.quotes.push(Quote::new(text, category));
        Ok(())
    }

    /// Bulk-append already-validated quotes (import path). No de-duplication.
    pub fn extend(&mut self, quotes: impl IntoIterator<Item = Quote>) {
        self.quotes.extend(quotes);
    }

    /// Reconcile `incoming` into the store under the given policy.
    pub fn merge(&mut self, incoming: Vec<Quote>, policy: MergePolicy) -> MergeOutcome {
        match policy {
            MergePolicy::Append => {
                let mut seen: HashSet<(String, String)> = self
                    .quotes
                    .iter()
                    .map(|q| (q.text.clone(), q.category.clone()))
                    .collect();
                let mut added = 0;
                for quote in incoming {
                    if seen.insert((quote.text.clone(), quote.category.clone())) {
                        self.quotes.push(quote);
                        added += 1;
                    }
                }
                MergeOutcome::Added(added)
            }
            MergePolicy::Replace => {
                self.quotes = incoming;
                MergeOutcome::Replaced(self.quotes.len())
            }
        }
    }

    /// Distinct categories in first-seen order, prefixed with the `"all"`
    /// sentinel.
    pub fn categories(&self) -> Vec<String> {
        let mut out = vec![ALL_CATEGORY.to_string()];
        for quote in &self.quotes {
            if !out.iter().any(|c| c == &quote.category) {
                out.push(quote.category.clone());
            }
        }
        out
    }

    /// The subsequence matching `selection`, order-preserving.
    ///
    /// The full sequence for the `"all"` sentinel; possibly empty when the
    /// selection names a category no quote carries anymore.
    pub fn filtered(&self, selection: &str) -> Vec<&Quote> {
        if selection == ALL_CATEGORY {
            return self.quotes.iter().collect();
        }
        self.quotes
            .iter()
            .filter(|q| q.category == selection)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> QuoteStore {
        QuoteStore::seed()
    }

    #[test]
    fn filtered_all_returns_everything_in_order() {
        let mut store = seeded();
        store.add("Test quote", "Testing").unwrap();
        let all = store.filtered(ALL_CATEGORY);
        assert_eq!(all.len(), store.len());
        for (got, want) in all.iter().zip(store.quotes()) {
            assert_eq!(**got, *want);
        }
    }

    #[test]
    fn filtered_category_returns_matching_subsequence() {
        let mut store = seeded();
        store.add("Premature optimization is the root of all evil.", "Programming")
            .unwrap();
        let programming = store.filtered("Programming");
        assert_eq!(programming.len(), 2);
        assert!(programming.iter().all(|q| q.category == "Programming"));
        // Order preserved: seed quote first.
        assert_eq!(programming[0].text, "Talk is cheap.");
    }

    #[test]
    fn filtered_vanished_category_is_empty() {
        let store = seeded();
        assert!(store.filtered("Travel").is_empty());
    }

    #[test]
    fn add_rejects_empty_fields() {
        let mut store = seeded();
        let before = store.len();
        assert_eq!(store.add("", "x"), Err(StoreError::EmptyField));
        assert_eq!(store.add("x", ""), Err(StoreError::EmptyField));
        assert_eq!(store.add("   ", "x"), Err(StoreError::EmptyField));
        assert_eq!(store.len(), before);
    }

    #[test]
    fn add_trims_and_permits_duplicates() {
        let mut store = QuoteStore::new();
        store.add("  A  ", " B ").unwrap();
        store.add("A", "B").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.quotes()[0], Quote::new("A", "B"));
    }

    #[test]
    fn seed_scenario_categories() {
        let mut store = seeded();
        store.add("Test quote", "Testing").unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.categories(),
            vec!["all", "Inspiration", "Programming", "Testing"]
        );
    }

    #[test]
    fn merge_append_adds_only_unseen() {
        let mut store = seeded();
        let before = store.len();
        let incoming = vec![
            Quote::new("Talk is cheap.", "Programming"), // already present
            Quote::new("New one", "Server"),
            Quote::new("New one", "Server"), // duplicate inside incoming
        ];
        let outcome = store.merge(incoming, MergePolicy::Append);
        assert_eq!(outcome, MergeOutcome::Added(1));
        assert_eq!(store.len(), before + 1);
    }

    #[test]
    fn merge_append_distinguishes_category() {
        let mut store = seeded();
        // Same text, different category: distinct identity, so it goes in.
        let outcome = store.merge(
            vec![Quote::new("Talk is cheap.", "Server")],
            MergePolicy::Append,
        );
        assert_eq!(outcome, MergeOutcome::Added(1));
    }

    #[test]
    fn merge_replace_substitutes_wholesale() {
        let mut store = seeded();
        let incoming = vec![Quote::new("Only one", "Server")];
        let outcome = store.merge(incoming.clone(), MergePolicy::Replace);
        assert_eq!(outcome, MergeOutcome::Replaced(1));
        assert_eq!(store.quotes(), incoming.as_slice());
    }

    #[test]
    fn merge_policy_parses() {
        assert_eq!("append".parse(), Ok(MergePolicy::Append));
        assert_eq!("Replace".parse(), Ok(MergePolicy::Replace));
        assert!("both".parse::<MergePolicy>().is_err());
    }
}
