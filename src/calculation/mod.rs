//! Calculation logic for the Tax Engine.
//!
//! This module contains the band accumulator, the relief resolver, the
//! minimum-tax and marginal-relief overlays, and the entry points built on top
//! of them: banded personal taxes, corporation tax, VAT, withholding tax, VAT
//! returns and business summaries. [`calculate`] dispatches a tagged
//! [`CalculationInput`] to the matching entry point.
//!
//! Every function here is pure: it reads an immutable [`RateTable`] and the
//! caller's input and returns a fresh result.

mod bands;
mod common;
mod corporation;
mod income;
mod marginal_relief;
mod minimum_tax;
mod relief;
mod summary;
mod vat;
mod withholding;

pub use bands::{BandedTax, accumulate_bands};
pub use common::{MONEY_DP, RATE_DP, effective_rate, max_amount, round_money};
pub use corporation::{calculate_flat_or_tiered_tax, chargeable_profit, select_tier};
pub use income::calculate_banded_tax;
pub use marginal_relief::{CorporationRate, marginal_relief_tax};
pub use minimum_tax::{
    MinimumTaxOutcome, apply_company_minimum, apply_personal_minimum, company_floor,
    personal_floor,
};
pub use relief::{
    ALLOWANCE, CONSOLIDATED_RELIEF, PENSION_CONTRIBUTION, PERSONAL_ALLOWANCE, ReliefResolution,
    relief_formula, resolve_relief,
};
pub use summary::summarize_business;
pub use vat::{calculate_proportional_tax, calculate_vat_return};
pub use withholding::calculate_withholding;

use crate::config::RateTable;
use crate::error::EngineResult;
use crate::models::{CalculationInput, CalculationResult};

/// Runs the calculation selected by the input's tax type.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::CalculationInput;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("UK", "2024-25").unwrap();
///
/// let input: CalculationInput =
///     serde_json::from_str(r#"{"tax_type": "vat", "amount": "100"}"#).unwrap();
/// let result = calculate(&table, &input).unwrap();
///
/// assert_eq!(result.total_tax, Decimal::from_str("20").unwrap());
/// ```
pub fn calculate(table: &RateTable, input: &CalculationInput) -> EngineResult<CalculationResult> {
    match input {
        CalculationInput::IncomeTax {
            gross_income,
            options,
        }
        | CalculationInput::NationalInsurance {
            gross_income,
            options,
        } => calculate_banded_tax(input.tax_type(), *gross_income, table, options),
        CalculationInput::CorporationTax { profit, auxiliary } => {
            calculate_flat_or_tiered_tax(input.tax_type(), *profit, table, auxiliary)
        }
        CalculationInput::Vat { amount, rate } => calculate_proportional_tax(*amount, rate, table),
        CalculationInput::Withholding {
            payment_type,
            amount,
        } => calculate_withholding(payment_type, *amount, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{BandedTaxOptions, TaxType};
    use rust_decimal::Decimal;
    use std::path::Path;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn uk() -> RateTable {
        ConfigLoader::load_table(Path::new("./config/rates/uk-2024-25.yaml")).unwrap()
    }

    #[test]
    fn test_dispatch_matches_direct_call() {
        let table = uk();
        let input = CalculationInput::NationalInsurance {
            gross_income: dec("30000"),
            options: BandedTaxOptions::default(),
        };

        let dispatched = calculate(&table, &input).unwrap();
        let direct = calculate_banded_tax(
            TaxType::NationalInsurance,
            dec("30000"),
            &table,
            &BandedTaxOptions::default(),
        )
        .unwrap();

        assert_eq!(dispatched, direct);
    }

    #[test]
    fn test_dispatch_each_tax_type() {
        let table = uk();
        let inputs = [
            r#"{"tax_type": "income_tax", "gross_income": "30000"}"#,
            r#"{"tax_type": "national_insurance", "gross_income": "30000"}"#,
            r#"{"tax_type": "corporation_tax", "profit": "150000"}"#,
            r#"{"tax_type": "vat", "amount": "100", "rate": "reduced"}"#,
        ];

        for json in inputs {
            let input: CalculationInput = serde_json::from_str(json).unwrap();
            let result = calculate(&table, &input).unwrap();
            assert_eq!(result.tax_type, input.tax_type());
        }
    }

    #[test]
    fn test_dispatch_propagates_errors() {
        let input = CalculationInput::Withholding {
            payment_type: "dividends".to_string(),
            amount: dec("100000"),
        };
        assert!(calculate(&uk(), &input).unwrap_err().is_input_error());
    }
}
