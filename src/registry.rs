//! The identifier-to-table mapping accumulated during one ingestion run.
//!
//! A [`Registry`] is constructed by the caller and passed into
//! [`crate::ingestion::walker::extract_tables`] by mutable reference; repeated
//! walker invocations against the same registry accumulate. Callers wanting an
//! isolated run construct a fresh value. The registry owns the duplicate
//! policy: a second table under an existing identifier is rejected and the
//! first is retained, except for the designated test identifier, which may be
//! overwritten to keep test fixtures repeatable.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::Table;

/// Outcome of a [`Registry::insert`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The identifier was new; the table is now registered.
    Inserted,
    /// The identifier matched the designated test identifier and its table was
    /// replaced.
    Replaced,
    /// The identifier was already registered; the new table was discarded and
    /// the original retained.
    RejectedDuplicate,
}

/// Mapping from identifier to [`Table`] for one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registry {
    tables: HashMap<String, Table>,
    #[serde(skip)]
    test_identifier: Option<String>,
}

impl Registry {
    /// Create an empty registry with no test identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry whose `test_identifier` may be overwritten by
    /// repeated inserts.
    pub fn with_test_identifier(test_identifier: impl Into<String>) -> Self {
        Self {
            tables: HashMap::new(),
            test_identifier: Some(test_identifier.into()),
        }
    }

    /// Insert `table` under `identifier`, applying the duplicate policy.
    pub fn insert(&mut self, identifier: impl Into<String>, table: Table) -> InsertOutcome {
        let identifier = identifier.into();
        if self.tables.contains_key(&identifier) {
            if self.test_identifier.as_deref() == Some(identifier.as_str()) {
                self.tables.insert(identifier, table);
                return InsertOutcome::Replaced;
            }
            return InsertOutcome::RejectedDuplicate;
        }
        self.tables.insert(identifier, table);
        InsertOutcome::Inserted
    }

    /// Table registered under `identifier`, if any.
    pub fn get(&self, identifier: &str) -> Option<&Table> {
        self.tables.get(identifier)
    }

    /// True if `identifier` is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.tables.contains_key(identifier)
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True if no tables are registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate `(identifier, table)` pairs. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate registered identifiers. Order is unspecified.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}
