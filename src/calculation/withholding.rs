//! Withholding tax deducted at source from payments.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RateTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{BandContribution, CalculationResult, TaxType};

use super::common::{require_non_negative, round_money};

/// Calculates withholding tax on a payment.
///
/// The payment type is checked before the exemption threshold, so an unknown
/// type is rejected even for small payments. Payments at or below the
/// threshold are exempt and report a zero rate.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if the amount is negative
/// - [`EngineError::UnknownPaymentType`] if the payment type is not in the table
/// - [`EngineError::UnsupportedTaxType`] if the table has no withholding rules
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_withholding;
/// use tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("NG", "2026").unwrap();
///
/// let result = calculate_withholding("dividends", Decimal::from_str("100000").unwrap(), &table).unwrap();
/// assert_eq!(result.total_tax, Decimal::from_str("10000").unwrap());
/// assert!(result.final_tax);
/// ```
pub fn calculate_withholding(
    payment_type: &str,
    amount: Decimal,
    table: &RateTable,
) -> EngineResult<CalculationResult> {
    require_non_negative("amount", amount)?;
    let rules = table.withholding()?;
    let withholding_rate =
        rules
            .rates
            .get(payment_type)
            .ok_or_else(|| EngineError::UnknownPaymentType {
                payment_type: payment_type.to_string(),
            })?;

    let gross = round_money(amount);

    if amount <= rules.exemption_threshold {
        debug!(table = %table.id(), payment_type, "payment exempt from withholding");
        return Ok(CalculationResult {
            gross_amount: gross,
            net_amount: gross,
            exempt: true,
            description: Some(withholding_rate.description.clone()),
            ..CalculationResult::empty(TaxType::Withholding)
        });
    }

    let tax = amount * withholding_rate.rate;
    let total_tax = round_money(tax);
    let final_tax = rules.final_tax_types.iter().any(|t| t == payment_type);

    debug!(
        table = %table.id(),
        payment_type,
        rate = %withholding_rate.rate,
        final_tax,
        "withholding calculated"
    );

    Ok(CalculationResult {
        gross_amount: gross,
        taxable_amount: gross,
        total_tax,
        net_amount: gross - total_tax,
        effective_rate: withholding_rate.rate,
        breakdown: vec![BandContribution {
            label: payment_type.to_string(),
            amount,
            rate: withholding_rate.rate,
            tax,
        }],
        final_tax,
        description: Some(withholding_rate.description.clone()),
        ..CalculationResult::empty(TaxType::Withholding)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::path::Path;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ng() -> RateTable {
        ConfigLoader::load_table(Path::new("./config/rates/ng-2026.yaml")).unwrap()
    }

    #[test]
    fn test_final_tax_payment() {
        let result = calculate_withholding("rent", dec("1200000"), &ng()).unwrap();

        assert_eq!(result.total_tax, dec("120000"));
        assert_eq!(result.net_amount, dec("1080000"));
        assert_eq!(result.effective_rate, dec("0.10"));
        assert!(result.final_tax);
        assert!(!result.exempt);
        assert_eq!(result.description.as_deref(), Some("Rent on land and buildings"));
    }

    #[test]
    fn test_non_final_payment() {
        let result = calculate_withholding("professional_fees", dec("500000"), &ng()).unwrap();

        assert_eq!(result.total_tax, dec("25000"));
        assert!(!result.final_tax);
    }

    #[test]
    fn test_payment_at_threshold_is_exempt() {
        let result = calculate_withholding("dividends", dec("5000"), &ng()).unwrap();

        assert!(result.exempt);
        assert_eq!(result.total_tax, Decimal::ZERO);
        assert_eq!(result.effective_rate, Decimal::ZERO);
        assert_eq!(result.net_amount, dec("5000"));
        assert!(!result.final_tax);
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn test_payment_just_above_threshold() {
        let result = calculate_withholding("commission", dec("5000.01"), &ng()).unwrap();

        assert!(!result.exempt);
        assert_eq!(result.total_tax, dec("250.00"));
    }

    #[test]
    fn test_unknown_payment_type_rejected_before_exemption() {
        let err = calculate_withholding("gifts", dec("10"), &ng()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid payment type: gifts");
    }

    #[test]
    fn test_table_without_withholding() {
        let uk = ConfigLoader::load_table(Path::new("./config/rates/uk-2024-25.yaml")).unwrap();
        let err = calculate_withholding("dividends", dec("100000"), &uk).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedTaxType { .. }));
    }
}
