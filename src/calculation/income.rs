//! Banded personal taxes: income tax and national insurance.
//!
//! ## Flow
//!
//! 1. Reliefs are resolved from gross income (allowance, pension).
//! 2. The taxable base is walked through the bands.
//! 3. A personal minimum-tax floor may replace the banded total.
//!
//! Money is rounded once, after step 3.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RateTable;
use crate::error::EngineResult;
use crate::models::{BandedTaxOptions, CalculationResult, TaxType};

use super::bands::accumulate_bands;
use super::common::{effective_rate, require_non_negative, require_non_negative_opt, round_money};
use super::minimum_tax::apply_personal_minimum;
use super::relief::resolve_relief;

/// Calculates a banded personal tax on gross income.
///
/// # Arguments
///
/// * `tax_type` - [`TaxType::IncomeTax`] or [`TaxType::NationalInsurance`]
/// * `gross` - Annual gross income
/// * `table` - The rate table to apply
/// * `options` - Relief overrides
///
/// # Errors
///
/// - [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput) if
///   the gross income or an override is negative
/// - [`EngineError::UnsupportedTaxType`](crate::error::EngineError::UnsupportedTaxType)
///   if the tax type is not banded or not configured in the table
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_banded_tax;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::{BandedTaxOptions, TaxType};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("UK", "2024-25").unwrap();
///
/// let result = calculate_banded_tax(
///     TaxType::IncomeTax,
///     Decimal::from_str("30000").unwrap(),
///     &table,
///     &BandedTaxOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.allowance, Decimal::from_str("12570").unwrap());
/// assert_eq!(result.total_tax, Decimal::from_str("3486").unwrap());
/// ```
pub fn calculate_banded_tax(
    tax_type: TaxType,
    gross: Decimal,
    table: &RateTable,
    options: &BandedTaxOptions,
) -> EngineResult<CalculationResult> {
    require_non_negative("gross_income", gross)?;
    require_non_negative_opt("allowance_override", options.allowance_override)?;
    require_non_negative_opt("pension_contribution", options.pension_contribution)?;
    let rules = table.banded_rules(tax_type)?;

    let relief = resolve_relief(rules, gross, options);
    let banded = accumulate_bands(relief.taxable, &rules.bands);
    let outcome = apply_personal_minimum(rules.minimum_tax.as_ref(), banded.total, gross);

    debug!(
        table = %table.id(),
        tax_type = %tax_type,
        taxable = %relief.taxable,
        banded = %banded.total,
        minimum_tax_applied = outcome.applied,
        "banded tax calculated"
    );

    let total_tax = round_money(outcome.total);

    Ok(CalculationResult {
        gross_amount: round_money(gross),
        allowance: round_money(relief.total),
        taxable_amount: round_money(relief.taxable),
        total_tax,
        net_amount: round_money(gross - total_tax),
        effective_rate: effective_rate(total_tax, gross),
        breakdown: banded.breakdown,
        minimum_tax_applied: outcome.applied,
        reliefs: relief.components,
        ..CalculationResult::empty(tax_type)
    })
}
