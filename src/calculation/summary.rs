//! Business tax summaries.
//!
//! Sole traders and partnerships pay personal taxes on their profit; limited
//! companies pay corporation tax. The summary runs the relevant calculations
//! on the period's profit and reports the VAT position alongside.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RateTable;
use crate::error::EngineResult;
use crate::models::{
    AuxiliaryBases, BandedTaxOptions, BusinessSummaryInput, BusinessTaxSummary, BusinessType,
    TaxType, VatPosition,
};

use super::common::{require_non_negative, round_money};
use super::corporation::calculate_flat_or_tiered_tax;
use super::income::calculate_banded_tax;

/// Summarizes the taxes due on a business's profit for one period.
///
/// A loss is taxed as zero profit. For limited companies the period income is
/// used as turnover, so turnover-tiered schedules can select a tier. National
/// insurance is only included when the table configures it.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::summarize_business;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::{BusinessSummaryInput, BusinessType};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s: &str| Decimal::from_str(s).unwrap();
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("UK", "2024-25").unwrap();
///
/// let summary = summarize_business(
///     &BusinessSummaryInput {
///         business_type: BusinessType::LimitedCompany,
///         income: d("100000"),
///         expenses: d("60000"),
///         vat_collected: d("20000"),
///         vat_paid: d("12000"),
///     },
///     &table,
/// )
/// .unwrap();
///
/// assert_eq!(summary.profit, d("40000"));
/// assert_eq!(summary.total_tax, d("7600"));
/// assert_eq!(summary.vat.liability, d("8000"));
/// ```
pub fn summarize_business(
    input: &BusinessSummaryInput,
    table: &RateTable,
) -> EngineResult<BusinessTaxSummary> {
    require_non_negative("income", input.income)?;
    require_non_negative("expenses", input.expenses)?;
    require_non_negative("vat_collected", input.vat_collected)?;
    require_non_negative("vat_paid", input.vat_paid)?;

    let profit = input.income - input.expenses;
    let taxable_profit = profit.max(Decimal::ZERO);

    let calculations = match input.business_type {
        BusinessType::LimitedCompany => {
            let bases = AuxiliaryBases {
                turnover: Some(input.income),
                ..Default::default()
            };
            vec![calculate_flat_or_tiered_tax(
                TaxType::CorporationTax,
                taxable_profit,
                table,
                &bases,
            )?]
        }
        BusinessType::SoleTrader | BusinessType::Partnership => {
            let options = BandedTaxOptions::default();
            let mut results = vec![calculate_banded_tax(
                TaxType::IncomeTax,
                taxable_profit,
                table,
                &options,
            )?];
            if table.definition().national_insurance.is_some() {
                results.push(calculate_banded_tax(
                    TaxType::NationalInsurance,
                    taxable_profit,
                    table,
                    &options,
                )?);
            }
            results
        }
    };

    let total_tax: Decimal = calculations.iter().map(|result| result.total_tax).sum();

    debug!(
        table = %table.id(),
        business_type = ?input.business_type,
        profit = %profit,
        "business summary calculated"
    );

    Ok(BusinessTaxSummary {
        business_type: input.business_type,
        income: round_money(input.income),
        expenses: round_money(input.expenses),
        profit: round_money(profit),
        vat: VatPosition {
            collected: round_money(input.vat_collected),
            paid: round_money(input.vat_paid),
            liability: round_money(input.vat_collected - input.vat_paid),
        },
        calculations,
        total_tax,
    })
}
