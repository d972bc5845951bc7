//! Calculation result models for the Tax Engine.
//!
//! This module contains the [`CalculationResult`] type and the
//! [`BandContribution`] rows that make up its audit breakdown. Results are
//! returned by value and never stored by the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxType;

/// One row of the audit breakdown.
///
/// # Example
///
/// ```
/// use tax_engine::models::BandContribution;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let row = BandContribution {
///     label: "Basic Rate".to_string(),
///     amount: Decimal::from_str("5000").unwrap(),
///     rate: Decimal::from_str("0.20").unwrap(),
///     tax: Decimal::from_str("1000").unwrap(),
/// };
/// assert_eq!(row.amount * row.rate, row.tax);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandContribution {
    /// The band or rate label.
    pub label: String,
    /// The portion of the base falling in this band.
    pub amount: Decimal,
    /// The rate applied to the amount.
    pub rate: Decimal,
    /// The tax contributed by this band.
    pub tax: Decimal,
}

/// A named relief component deducted before banding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefComponent {
    /// The component name, e.g. "consolidated_relief".
    pub name: String,
    /// Display label, e.g. "Personal Allowance".
    pub label: String,
    /// The amount deducted.
    pub amount: Decimal,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The complete result of a tax calculation.
///
/// Monetary fields are rounded to two decimal places once, at the end of the
/// calculation. Breakdown rows carry their exact contributions, so
/// `sum(breakdown.tax)` rounds to the banded total.
///
/// When `minimum_tax_applied` is set, `total_tax` is the minimum-tax floor and
/// the breakdown is retained for transparency only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The tax type that was calculated.
    pub tax_type: TaxType,
    /// The gross figure (income, profit, VAT-inclusive amount or payment).
    pub gross_amount: Decimal,
    /// The total relief or allowance deducted before banding.
    pub allowance: Decimal,
    /// The base the rates were applied to.
    pub taxable_amount: Decimal,
    /// The total tax after any overlay.
    pub total_tax: Decimal,
    /// The amount remaining after tax.
    pub net_amount: Decimal,
    /// Total tax divided by the caller-supplied base.
    pub effective_rate: Decimal,
    /// Per-band audit breakdown.
    pub breakdown: Vec<BandContribution>,
    /// Whether a minimum-tax floor replaced the banded tax.
    pub minimum_tax_applied: bool,
    /// Whether marginal relief smoothing produced the tax.
    pub marginal_relief_applied: bool,
    /// Named relief components making up `allowance`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reliefs: Vec<ReliefComponent>,
    /// Flat levies added to the total after the minimum-tax comparison.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levies: Vec<BandContribution>,
    /// Whether the payment fell under the withholding exemption threshold.
    #[serde(default, skip_serializing_if = "is_false")]
    pub exempt: bool,
    /// Whether the withholding deducted is a final tax.
    #[serde(default, skip_serializing_if = "is_false")]
    pub final_tax: bool,
    /// Human-readable description of the rate that applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalculationResult {
    pub(crate) fn empty(tax_type: TaxType) -> Self {
        Self {
            tax_type,
            gross_amount: Decimal::ZERO,
            allowance: Decimal::ZERO,
            taxable_amount: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            net_amount: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            breakdown: Vec::new(),
            minimum_tax_applied: false,
            marginal_relief_applied: false,
            reliefs: Vec::new(),
            levies: Vec::new(),
            exempt: false,
            final_tax: false,
            description: None,
        }
    }

    /// Returns the exact sum of the breakdown contributions.
    pub fn breakdown_tax(&self) -> Decimal {
        self.breakdown.iter().map(|row| row.tax).sum()
    }

    /// Returns the exact sum of the levy contributions.
    pub fn levies_total(&self) -> Decimal {
        self.levies.iter().map(|row| row.tax).sum()
    }
}
