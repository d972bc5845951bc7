//! Request types for the Tax Engine API.
//!
//! Every calculation endpoint names the rate table it wants with a
//! [`TableSelector`], flattened into the request body next to the
//! calculation input.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{RateTable, RateTableRegistry};
use crate::error::{EngineError, EngineResult};
use crate::models::{BusinessSummaryInput, CalculationInput, VatReturnInput};

/// Identifies the rate table a request is calculated against.
///
/// `tax_year` takes precedence; otherwise `date` selects the table whose
/// effective period covers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSelector {
    /// Jurisdiction code, e.g. "UK".
    pub jurisdiction: String,
    /// Tax year label, e.g. "2024-25".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_year: Option<String>,
    /// A date inside the wanted tax year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl TableSelector {
    /// Looks the table up in `registry`.
    pub fn resolve(&self, registry: &RateTableRegistry) -> EngineResult<Arc<RateTable>> {
        match (&self.tax_year, self.date) {
            (Some(tax_year), _) => registry.get(&self.jurisdiction, tax_year),
            (None, Some(date)) => registry.for_date(&self.jurisdiction, date),
            (None, None) => Err(EngineError::invalid_input(
                "tax_year",
                "either tax_year or date is required",
            )),
        }
    }
}

/// Request body for the `/calculate` endpoint.
///
/// ```json
/// {"jurisdiction": "UK", "tax_year": "2024-25", "tax_type": "income_tax", "gross_income": "30000"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The rate table to use.
    #[serde(flatten)]
    pub table: TableSelector,
    /// The tagged calculation input.
    #[serde(flatten)]
    pub input: CalculationInput,
}

/// Request body for the `/vat-return` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatReturnRequest {
    /// The rate table to use.
    #[serde(flatten)]
    pub table: TableSelector,
    /// Sales and purchases for the period.
    #[serde(flatten)]
    pub input: VatReturnInput,
}

/// Request body for the `/business-summary` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSummaryRequest {
    /// The rate table to use.
    #[serde(flatten)]
    pub table: TableSelector,
    /// The business figures for the period.
    #[serde(flatten)]
    pub input: BusinessSummaryInput,
}
