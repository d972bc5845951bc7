//! VAT: single sales and period returns.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{RateTable, VatRules};
use crate::error::{EngineError, EngineResult};
use crate::models::{BandContribution, CalculationResult, TaxType, VatReturn, VatReturnInput};

use super::common::{require_non_negative, round_money};

fn rate_for(rules: &VatRules, selector: &str) -> EngineResult<Decimal> {
    rules
        .rates
        .get(selector)
        .copied()
        .ok_or_else(|| EngineError::UnknownRateSelector {
            selector: selector.to_string(),
        })
}

/// Calculates VAT on a net (VAT-exclusive) amount.
///
/// The result reports the net amount as `taxable_amount` and `net_amount`,
/// the VAT-inclusive amount as `gross_amount`, and the configured rate as
/// `effective_rate`.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if the amount is negative
/// - [`EngineError::UnknownRateSelector`] if the selector is not in the table
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_proportional_tax;
/// use tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("UK", "2024-25").unwrap();
///
/// let result = calculate_proportional_tax(Decimal::from_str("100").unwrap(), "standard", &table).unwrap();
/// assert_eq!(result.total_tax, Decimal::from_str("20").unwrap());
/// assert_eq!(result.gross_amount, Decimal::from_str("120").unwrap());
/// ```
pub fn calculate_proportional_tax(
    amount: Decimal,
    selector: &str,
    table: &RateTable,
) -> EngineResult<CalculationResult> {
    require_non_negative("amount", amount)?;
    let rate = rate_for(table.vat()?, selector)?;

    let tax = amount * rate;
    debug!(table = %table.id(), selector, rate = %rate, "vat calculated");

    let mut breakdown = Vec::new();
    if amount > Decimal::ZERO {
        breakdown.push(BandContribution {
            label: selector.to_string(),
            amount,
            rate,
            tax,
        });
    }

    let net = round_money(amount);
    let total_tax = round_money(tax);

    Ok(CalculationResult {
        gross_amount: net + total_tax,
        taxable_amount: net,
        total_tax,
        net_amount: net,
        effective_rate: rate,
        breakdown,
        ..CalculationResult::empty(TaxType::Vat)
    })
}

/// Calculates the VAT position for a return period.
///
/// Output VAT is charged on vatable sales and input VAT reclaimed on vatable
/// purchases, both at the table's return rate. An excess of input VAT is
/// reported as a credit rather than a negative payable.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_vat_return;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::VatReturnInput;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s: &str| Decimal::from_str(s).unwrap();
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("NG", "2026").unwrap();
///
/// let vat_return = calculate_vat_return(
///     &VatReturnInput {
///         vatable_sales: d("30000000"),
///         vatable_purchases: d("10000000"),
///         ..Default::default()
///     },
///     &table,
/// )
/// .unwrap();
///
/// assert_eq!(vat_return.net_vat_payable, d("2000000"));
/// assert_eq!(vat_return.registration_required, Some(true));
/// ```
pub fn calculate_vat_return(input: &VatReturnInput, table: &RateTable) -> EngineResult<VatReturn> {
    require_non_negative("vatable_sales", input.vatable_sales)?;
    require_non_negative("vatable_purchases", input.vatable_purchases)?;
    require_non_negative("zero_rated_sales", input.zero_rated_sales)?;
    require_non_negative("exempt_sales", input.exempt_sales)?;

    let rules = table.vat()?;
    let vat_rate = rate_for(rules, &rules.return_rate)?;

    let output_vat = round_money(input.vatable_sales * vat_rate);
    let input_vat = round_money(input.vatable_purchases * vat_rate);
    let balance = output_vat - input_vat;
    let total_sales = round_money(input.vatable_sales + input.zero_rated_sales + input.exempt_sales);

    debug!(table = %table.id(), output = %output_vat, input = %input_vat, "vat return calculated");

    Ok(VatReturn {
        vat_rate,
        output_vat,
        input_vat,
        net_vat_payable: balance.max(Decimal::ZERO),
        vat_credit: (-balance).max(Decimal::ZERO),
        total_sales,
        registration_required: rules
            .registration_threshold
            .map(|threshold| total_sales >= threshold),
        registration_threshold: rules.registration_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::max_amount;
    use crate::config::ConfigLoader;
    use std::path::Path;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn uk() -> RateTable {
        ConfigLoader::load_table(Path::new("./config/rates/uk-2024-25.yaml")).unwrap()
    }

    fn ng() -> RateTable {
        ConfigLoader::load_table(Path::new("./config/rates/ng-2026.yaml")).unwrap()
    }

    #[test]
    fn test_standard_rate() {
        let result = calculate_proportional_tax(dec("100"), "standard", &uk()).unwrap();

        assert_eq!(result.tax_type, TaxType::Vat);
        assert_eq!(result.taxable_amount, dec("100"));
        assert_eq!(result.net_amount, dec("100"));
        assert_eq!(result.total_tax, dec("20"));
        assert_eq!(result.gross_amount, dec("120"));
        assert_eq!(result.effective_rate, dec("0.20"));
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].label, "standard");
    }

    #[test]
    fn test_reduced_rate_rounds_once() {
        let result = calculate_proportional_tax(dec("10.99"), "reduced", &uk()).unwrap();

        // 10.99 * 0.05 = 0.5495
        assert_eq!(result.total_tax, dec("0.55"));
        assert_eq!(result.gross_amount, dec("11.54"));
        assert_eq!(result.breakdown[0].tax, dec("0.5495"));
    }

    #[test]
    fn test_zero_rate() {
        let result = calculate_proportional_tax(dec("500"), "zero", &uk()).unwrap();
        assert_eq!(result.total_tax, Decimal::ZERO);
        assert_eq!(result.gross_amount, dec("500"));
    }

    #[test]
    fn test_zero_amount() {
        let result = calculate_proportional_tax(Decimal::ZERO, "standard", &uk()).unwrap();
        assert!(result.breakdown.is_empty());
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let err = calculate_proportional_tax(dec("100"), "luxury", &uk()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown VAT rate selector: luxury");
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = calculate_proportional_tax(dec("-100"), "standard", &uk()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_oversized_amount_rejected() {
        let err =
            calculate_proportional_tax(dec("70000000000000000000000000000"), "standard", &uk())
                .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "amount"));
    }

    #[test]
    fn test_vat_return_oversized_sales_rejected() {
        let input = VatReturnInput {
            vatable_sales: dec("70000000000000000000000000000"),
            zero_rated_sales: dec("70000000000000000000000000000"),
            ..Default::default()
        };

        let err = calculate_vat_return(&input, &ng()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "vatable_sales"));
    }

    #[test]
    fn test_vat_return_at_amount_limit() {
        let input = VatReturnInput {
            vatable_sales: max_amount(),
            zero_rated_sales: max_amount(),
            exempt_sales: max_amount(),
            ..Default::default()
        };

        let vat_return = calculate_vat_return(&input, &ng()).unwrap();
        assert_eq!(vat_return.total_sales, max_amount() * Decimal::from(3));
    }

    #[test]
    fn test_vat_return_payable() {
        let input = VatReturnInput {
            vatable_sales: dec("20000000"),
            vatable_purchases: dec("5000000"),
            zero_rated_sales: dec("3000000"),
            exempt_sales: dec("1000000"),
        };
        let vat_return = calculate_vat_return(&input, &ng()).unwrap();

        assert_eq!(vat_return.vat_rate, dec("0.10"));
        assert_eq!(vat_return.output_vat, dec("2000000"));
        assert_eq!(vat_return.input_vat, dec("500000"));
        assert_eq!(vat_return.net_vat_payable, dec("1500000"));
        assert_eq!(vat_return.vat_credit, Decimal::ZERO);
        assert_eq!(vat_return.total_sales, dec("24000000"));
        assert_eq!(vat_return.registration_required, Some(false));
    }

    #[test]
    fn test_vat_return_credit() {
        let input = VatReturnInput {
            vatable_sales: dec("1000000"),
            vatable_purchases: dec("4000000"),
            ..Default::default()
        };
        let vat_return = calculate_vat_return(&input, &ng()).unwrap();

        assert_eq!(vat_return.net_vat_payable, Decimal::ZERO);
        assert_eq!(vat_return.vat_credit, dec("300000"));
    }

    #[test]
    fn test_vat_return_registration_at_threshold() {
        let input = VatReturnInput {
            vatable_sales: dec("25000000"),
            ..Default::default()
        };
        let vat_return = calculate_vat_return(&input, &ng()).unwrap();
        assert_eq!(vat_return.registration_required, Some(true));
    }

    #[test]
    fn test_vat_return_without_threshold() {
        let vat_return = calculate_vat_return(&VatReturnInput::default(), &uk()).unwrap();

        assert_eq!(vat_return.vat_rate, dec("0.20"));
        assert_eq!(vat_return.registration_required, None);
        assert_eq!(vat_return.registration_threshold, None);
    }
}
