//! Core data models for the Tax Engine.
//!
//! This module contains the inputs accepted and results returned by the
//! calculation entry points.

mod calculation_result;
mod input;
mod summary;

pub use calculation_result::{BandContribution, CalculationResult, ReliefComponent};
pub use input::{AuxiliaryBases, BandedTaxOptions, CalculationInput, TaxType};
pub use summary::{
    BusinessSummaryInput, BusinessTaxSummary, BusinessType, VatPosition, VatReturn,
    VatReturnInput,
};
