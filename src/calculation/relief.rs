//! Relief and allowance resolution.
//!
//! Computes the amount deducted from gross income before banding. Each
//! component is resolved independently, so an override for one component
//! leaves the others on their formula.

use rust_decimal::Decimal;

use crate::config::{BandedTaxRules, ReliefRule};
use crate::models::{BandedTaxOptions, ReliefComponent};

/// Component name for a flat personal allowance.
pub const PERSONAL_ALLOWANCE: &str = "personal_allowance";
/// Component name for the consolidated relief allowance.
pub const CONSOLIDATED_RELIEF: &str = "consolidated_relief";
/// Component name for a caller-supplied allowance with no configured formula.
pub const ALLOWANCE: &str = "allowance";
/// Component name for the pension contribution.
pub const PENSION_CONTRIBUTION: &str = "pension_contribution";

/// The resolved relief for one calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliefResolution {
    /// Components in deduction order; zero components are omitted.
    pub components: Vec<ReliefComponent>,
    /// Sum of the components.
    pub total: Decimal,
    /// `max(0, gross - total)`.
    pub taxable: Decimal,
}

/// Evaluates a relief formula against gross income.
pub fn relief_formula(rule: &ReliefRule, gross: Decimal) -> Decimal {
    match rule {
        ReliefRule::PersonalAllowance { amount } => *amount,
        ReliefRule::Consolidated {
            minimum_percentage,
            base_amount,
            additional_percentage,
        } => {
            let percentage_option = gross * *minimum_percentage;
            let base_option = *base_amount + gross * *additional_percentage;
            percentage_option.max(base_option)
        }
    }
}

fn allowance_component(rule: Option<&ReliefRule>, amount: Decimal) -> ReliefComponent {
    let (name, label) = match rule {
        Some(ReliefRule::PersonalAllowance { .. }) => (PERSONAL_ALLOWANCE, "Personal Allowance"),
        Some(ReliefRule::Consolidated { .. }) => {
            (CONSOLIDATED_RELIEF, "Consolidated Relief Allowance")
        }
        None => (ALLOWANCE, "Allowance"),
    };
    ReliefComponent {
        name: name.to_string(),
        label: label.to_string(),
        amount,
    }
}

/// Resolves the relief components for `gross` under `rules`.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::resolve_relief;
/// use tax_engine::config::{Band, BandedTaxRules, PensionRule, ReliefRule};
/// use tax_engine::models::BandedTaxOptions;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s: &str| Decimal::from_str(s).unwrap();
/// let rules = BandedTaxRules {
///     bands: vec![Band { name: "Flat".into(), min: d("0"), max: None, rate: d("0.10") }],
///     relief: Some(ReliefRule::Consolidated {
///         minimum_percentage: d("0.01"),
///         base_amount: d("200000"),
///         additional_percentage: d("0.20"),
///     }),
///     pension: Some(PensionRule { employee_rate: d("0.08") }),
///     minimum_tax: None,
/// };
///
/// let relief = resolve_relief(&rules, d("5000000"), &BandedTaxOptions::default());
/// assert_eq!(relief.total, d("1600000"));
/// assert_eq!(relief.taxable, d("3400000"));
/// ```
pub fn resolve_relief(
    rules: &BandedTaxRules,
    gross: Decimal,
    options: &BandedTaxOptions,
) -> ReliefResolution {
    let mut components = Vec::new();

    let allowance = options
        .allowance_override
        .or_else(|| rules.relief.as_ref().map(|rule| relief_formula(rule, gross)))
        .unwrap_or(Decimal::ZERO);
    if allowance > Decimal::ZERO {
        components.push(allowance_component(rules.relief.as_ref(), allowance));
    }

    let pension = options
        .pension_contribution
        .or_else(|| rules.pension.as_ref().map(|p| gross * p.employee_rate))
        .unwrap_or(Decimal::ZERO);
    if pension > Decimal::ZERO {
        components.push(ReliefComponent {
            name: PENSION_CONTRIBUTION.to_string(),
            label: "Pension Contribution".to_string(),
            amount: pension,
        });
    }

    let total = allowance + pension;
    let taxable = (gross - total).max(Decimal::ZERO);

    ReliefResolution {
        components,
        total,
        taxable,
    }
}
