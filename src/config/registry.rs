//! A keyed collection of rate tables.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};

use super::RateTable;

/// Rate tables keyed by jurisdiction and tax year.
///
/// Tables are held behind `Arc` so a calculation can keep using the table it
/// was handed while the registry itself is replaced.
#[derive(Debug, Clone, Default)]
pub struct RateTableRegistry {
    tables: BTreeMap<(String, String), Arc<RateTable>>,
}

fn key(jurisdiction: &str, tax_year: &str) -> (String, String) {
    (
        jurisdiction.trim().to_ascii_uppercase(),
        tax_year.trim().to_string(),
    )
}

impl RateTableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateRateTable`] if a table for the same
    /// jurisdiction and tax year is already registered.
    pub fn insert(&mut self, table: RateTable) -> EngineResult<()> {
        let key = key(table.jurisdiction(), table.tax_year());
        if self.tables.contains_key(&key) {
            return Err(EngineError::DuplicateRateTable {
                jurisdiction: table.jurisdiction().to_string(),
                tax_year: table.tax_year().to_string(),
            });
        }
        self.tables.insert(key, Arc::new(table));
        Ok(())
    }

    /// Looks up a table by jurisdiction (case-insensitive) and tax year.
    pub fn get(&self, jurisdiction: &str, tax_year: &str) -> EngineResult<Arc<RateTable>> {
        self.tables
            .get(&key(jurisdiction, tax_year))
            .cloned()
            .ok_or_else(|| EngineError::RateTableNotFound {
                jurisdiction: jurisdiction.to_string(),
                tax_year: tax_year.to_string(),
            })
    }

    /// Finds the table for a jurisdiction whose effective period covers `date`.
    ///
    /// When periods overlap, the table with the latest `effective_from` wins.
    pub fn for_date(&self, jurisdiction: &str, date: NaiveDate) -> EngineResult<Arc<RateTable>> {
        let wanted = jurisdiction.trim().to_ascii_uppercase();
        self.tables
            .iter()
            .filter(|((j, _), table)| *j == wanted && table.covers(date))
            .max_by_key(|(_, table)| table.effective_from())
            .map(|(_, table)| Arc::clone(table))
            .ok_or_else(|| EngineError::RateTableNotFound {
                jurisdiction: jurisdiction.to_string(),
                tax_year: date.to_string(),
            })
    }

    /// Iterates over all tables in key order.
    pub fn tables(&self) -> impl Iterator<Item = &Arc<RateTable>> {
        self.tables.values()
    }

    /// Returns the number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true when no tables are registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
