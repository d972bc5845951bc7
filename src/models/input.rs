//! Calculation input models.
//!
//! This module contains the [`TaxType`] tag and the per-call inputs accepted
//! by the engine entry points. Inputs are transient: they are constructed for
//! a single calculation and never stored by the engine.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The tax types understood by the engine.
///
/// # Example
///
/// ```
/// use tax_engine::models::TaxType;
///
/// assert_eq!(TaxType::NationalInsurance.as_str(), "national_insurance");
/// assert!(TaxType::IncomeTax.is_banded());
/// assert!(!TaxType::Vat.is_banded());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    /// Personal income tax (PAYE).
    IncomeTax,
    /// National insurance or other payroll contributions.
    NationalInsurance,
    /// Corporation or companies income tax.
    CorporationTax,
    /// Value added tax.
    Vat,
    /// Withholding tax on payments.
    Withholding,
}

impl TaxType {
    /// Returns the snake_case identifier used in configuration and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxType::IncomeTax => "income_tax",
            TaxType::NationalInsurance => "national_insurance",
            TaxType::CorporationTax => "corporation_tax",
            TaxType::Vat => "vat",
            TaxType::Withholding => "withholding",
        }
    }

    /// Returns true for tax types calculated by walking progressive bands.
    pub fn is_banded(&self) -> bool {
        matches!(self, TaxType::IncomeTax | TaxType::NationalInsurance)
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional caller overrides for banded calculations.
///
/// Each override replaces one relief component only. A value of `Some(0)`
/// is an explicit zero, not a request for the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandedTaxOptions {
    /// Replaces the formula-derived allowance (personal or consolidated relief).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowance_override: Option<Decimal>,
    /// Replaces the default pension contribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pension_contribution: Option<Decimal>,
}

/// Additional company figures used by corporation tax rules.
///
/// Absent figures count as zero, except `turnover`, which is required by
/// turnover-tiered rate schedules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryBases {
    /// Annual turnover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<Decimal>,
    /// Gross profit.
    #[serde(default)]
    pub gross_profit: Decimal,
    /// Net assets.
    #[serde(default)]
    pub net_assets: Decimal,
    /// Capital allowances deducted from assessable profit.
    #[serde(default)]
    pub capital_allowances: Decimal,
    /// Trading losses brought forward and relieved against this year's profit.
    #[serde(default)]
    pub losses_brought_forward: Decimal,
}

fn default_vat_selector() -> String {
    "standard".to_string()
}

/// A single calculation request, tagged by tax type.
///
/// # Example
///
/// ```
/// use tax_engine::models::{CalculationInput, TaxType};
///
/// let input: CalculationInput = serde_json::from_str(
///     r#"{"tax_type": "vat", "amount": "100", "rate": "reduced"}"#,
/// ).unwrap();
/// assert_eq!(input.tax_type(), TaxType::Vat);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tax_type", rename_all = "snake_case")]
pub enum CalculationInput {
    /// Personal income tax on gross income.
    IncomeTax {
        /// Annual gross income.
        gross_income: Decimal,
        /// Relief overrides.
        #[serde(default)]
        options: BandedTaxOptions,
    },
    /// National insurance contributions on gross income.
    NationalInsurance {
        /// Annual gross income.
        gross_income: Decimal,
        /// Relief overrides.
        #[serde(default)]
        options: BandedTaxOptions,
    },
    /// Corporation tax on annual profit.
    CorporationTax {
        /// Annual (assessable) profit.
        profit: Decimal,
        /// Additional company figures.
        #[serde(default)]
        auxiliary: AuxiliaryBases,
    },
    /// VAT on a net sale amount.
    Vat {
        /// The net (VAT-exclusive) amount.
        amount: Decimal,
        /// The VAT rate selector, e.g. "standard".
        #[serde(default = "default_vat_selector")]
        rate: String,
    },
    /// Withholding tax on a payment.
    Withholding {
        /// The payment type key, e.g. "dividends".
        payment_type: String,
        /// The gross payment amount.
        amount: Decimal,
    },
}

impl CalculationInput {
    /// Returns the tax type this input is tagged with.
    pub fn tax_type(&self) -> TaxType {
        match self {
            CalculationInput::IncomeTax { .. } => TaxType::IncomeTax,
            CalculationInput::NationalInsurance { .. } => TaxType::NationalInsurance,
            CalculationInput::CorporationTax { .. } => TaxType::CorporationTax,
            CalculationInput::Vat { .. } => TaxType::Vat,
            CalculationInput::Withholding { .. } => TaxType::Withholding,
        }
    }
}
