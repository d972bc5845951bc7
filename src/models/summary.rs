//! Aggregate models built on top of single calculations: VAT returns and
//! business tax summaries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationResult;

/// Sales and purchase figures for a VAT return period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatReturnInput {
    /// Sales charged at the return rate.
    #[serde(default)]
    pub vatable_sales: Decimal,
    /// Purchases on which input VAT was paid at the return rate.
    #[serde(default)]
    pub vatable_purchases: Decimal,
    /// Zero-rated sales.
    #[serde(default)]
    pub zero_rated_sales: Decimal,
    /// Exempt sales.
    #[serde(default)]
    pub exempt_sales: Decimal,
}

/// The computed VAT position for a return period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatReturn {
    /// The rate applied to vatable sales and purchases.
    pub vat_rate: Decimal,
    /// VAT charged on sales.
    pub output_vat: Decimal,
    /// VAT paid on purchases.
    pub input_vat: Decimal,
    /// VAT due to the authority, never negative.
    pub net_vat_payable: Decimal,
    /// VAT reclaimable when input VAT exceeds output VAT.
    pub vat_credit: Decimal,
    /// Vatable, zero-rated and exempt sales combined.
    pub total_sales: Decimal,
    /// Whether total sales reach the registration threshold, when one is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_required: Option<bool>,
    /// The configured registration threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_threshold: Option<Decimal>,
}

/// The legal form of a business, which decides how its profit is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    /// Self-employed individual.
    SoleTrader,
    /// Partnership, taxed through the partners as individuals.
    Partnership,
    /// Company liable to corporation tax.
    LimitedCompany,
}

/// Financial figures for a business tax summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSummaryInput {
    /// The legal form of the business.
    pub business_type: BusinessType,
    /// Total income for the period.
    pub income: Decimal,
    /// Total allowable expenses for the period.
    pub expenses: Decimal,
    /// VAT collected on sales.
    #[serde(default)]
    pub vat_collected: Decimal,
    /// VAT paid on purchases.
    #[serde(default)]
    pub vat_paid: Decimal,
}

/// The VAT position reported in a business summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatPosition {
    /// VAT collected on sales.
    pub collected: Decimal,
    /// VAT paid on purchases.
    pub paid: Decimal,
    /// Collected minus paid; negative when a repayment is due.
    pub liability: Decimal,
}

/// Taxes due on a business's profit for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessTaxSummary {
    /// The legal form of the business.
    pub business_type: BusinessType,
    /// Total income.
    pub income: Decimal,
    /// Total expenses.
    pub expenses: Decimal,
    /// Income minus expenses; negative for a loss.
    pub profit: Decimal,
    /// VAT position.
    pub vat: VatPosition,
    /// The individual calculations on the taxable profit.
    pub calculations: Vec<CalculationResult>,
    /// Sum of `total_tax` across the calculations.
    pub total_tax: Decimal,
}
