//! Minimum-tax floors.
//!
//! A floor is computed from gross figures and compared with the tax produced
//! by the regular schedule at money precision. The larger value wins; when the
//! floor wins the caller keeps the regular breakdown for transparency.

use rust_decimal::Decimal;

use crate::config::{CompanyMinimumTax, MinimumTaxBase, PersonalMinimumTax};
use crate::models::AuxiliaryBases;

use super::common::round_money;

/// The tax after the minimum-tax comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumTaxOutcome {
    /// The larger of the regular tax and the floor.
    pub total: Decimal,
    /// True when the floor replaced the regular tax. A floor that only wins
    /// below a cent does not apply.
    pub applied: bool,
}

impl MinimumTaxOutcome {
    fn compare(regular: Decimal, floor: Option<Decimal>) -> Self {
        match floor {
            Some(floor) if round_money(floor) > round_money(regular) => Self {
                total: floor,
                applied: true,
            },
            _ => Self {
                total: regular,
                applied: false,
            },
        }
    }
}

/// Returns the personal minimum tax on `gross`, if the gross exceeds the threshold.
pub fn personal_floor(rule: &PersonalMinimumTax, gross: Decimal) -> Option<Decimal> {
    (gross > rule.threshold).then(|| gross * rule.rate)
}

/// Applies a personal minimum-tax floor to the banded tax.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::apply_personal_minimum;
/// use tax_engine::config::PersonalMinimumTax;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s: &str| Decimal::from_str(s).unwrap();
/// let rule = PersonalMinimumTax { rate: d("0.005"), threshold: d("300000") };
///
/// let outcome = apply_personal_minimum(Some(&rule), Decimal::ZERO, d("1000000"));
/// assert!(outcome.applied);
/// assert_eq!(outcome.total, d("5000"));
/// ```
pub fn apply_personal_minimum(
    rule: Option<&PersonalMinimumTax>,
    banded: Decimal,
    gross: Decimal,
) -> MinimumTaxOutcome {
    let floor = rule.and_then(|rule| personal_floor(rule, gross));
    MinimumTaxOutcome::compare(banded, floor)
}

fn base_value(base: MinimumTaxBase, bases: &AuxiliaryBases) -> Decimal {
    match base {
        MinimumTaxBase::Turnover => bases.turnover.unwrap_or(Decimal::ZERO),
        MinimumTaxBase::GrossProfit => bases.gross_profit,
        MinimumTaxBase::NetAssets => bases.net_assets,
    }
}

/// Returns the highest candidate of a company minimum-tax rule.
///
/// With a turnover threshold configured, no floor applies unless turnover is
/// known and exceeds it.
pub fn company_floor(rule: &CompanyMinimumTax, bases: &AuxiliaryBases) -> Option<Decimal> {
    if let Some(threshold) = rule.turnover_threshold {
        match bases.turnover {
            Some(turnover) if turnover > threshold => {}
            _ => return None,
        }
    }

    rule.candidates
        .iter()
        .map(|candidate| base_value(candidate.base, bases) * candidate.rate)
        .max()
}

/// Applies a company minimum-tax floor to the scheduled corporation tax.
pub fn apply_company_minimum(
    rule: Option<&CompanyMinimumTax>,
    scheduled: Decimal,
    bases: &AuxiliaryBases,
) -> MinimumTaxOutcome {
    let floor = rule.and_then(|rule| company_floor(rule, bases));
    MinimumTaxOutcome::compare(scheduled, floor)
}
