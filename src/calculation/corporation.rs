//! Corporation (companies income) tax.
//!
//! The rate schedule is either two flat rates joined by marginal relief, or a
//! flat rate chosen by turnover tier. Either way the schedule is applied to the
//! chargeable profit: assessable profit less capital allowances and losses
//! brought forward. A company minimum-tax floor is then compared with the
//! scheduled tax, and levies are added on top.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{CorporationSchedule, Levy, LevyBase, RateTable, TurnoverTier};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuxiliaryBases, BandContribution, CalculationResult, TaxType};

use super::common::{effective_rate, require_non_negative, require_non_negative_opt, round_money};
use super::marginal_relief::{CorporationRate, marginal_relief_tax};
use super::minimum_tax::apply_company_minimum;

/// Returns `max(0, profit - capital_allowances - losses_brought_forward)`.
pub fn chargeable_profit(profit: Decimal, bases: &AuxiliaryBases) -> Decimal {
    (profit - bases.capital_allowances - bases.losses_brought_forward).max(Decimal::ZERO)
}

/// Selects the first tier whose `below` limit exceeds the turnover.
pub fn select_tier(tiers: &[TurnoverTier], turnover: Decimal) -> Option<&TurnoverTier> {
    tiers
        .iter()
        .find(|tier| tier.below.is_none_or(|below| turnover < below))
}

fn validate_bases(profit: Decimal, bases: &AuxiliaryBases) -> EngineResult<()> {
    require_non_negative("profit", profit)?;
    require_non_negative_opt("turnover", bases.turnover)?;
    require_non_negative("gross_profit", bases.gross_profit)?;
    require_non_negative("net_assets", bases.net_assets)?;
    require_non_negative("capital_allowances", bases.capital_allowances)?;
    require_non_negative("losses_brought_forward", bases.losses_brought_forward)?;
    Ok(())
}

fn tiered_rate(
    table: &RateTable,
    tiers: &[TurnoverTier],
    chargeable: Decimal,
    bases: &AuxiliaryBases,
) -> EngineResult<CorporationRate> {
    let turnover = bases.turnover.ok_or_else(|| {
        EngineError::invalid_input("turnover", "required by turnover-tiered rate schedules")
    })?;
    let tier = select_tier(tiers, turnover).ok_or_else(|| EngineError::InvalidConfiguration {
        table: table.id(),
        message: format!("no turnover tier covers turnover {}", turnover),
    })?;

    Ok(CorporationRate {
        tax: chargeable * tier.rate,
        rate: tier.rate,
        label: tier.name.clone(),
        marginal_relief_applied: false,
    })
}

fn levy_base(levy: &Levy, profit: Decimal, chargeable: Decimal, bases: &AuxiliaryBases) -> Decimal {
    match levy.base {
        LevyBase::AssessableProfit => profit,
        LevyBase::ChargeableProfit => chargeable,
        LevyBase::Turnover => bases.turnover.unwrap_or(Decimal::ZERO),
        LevyBase::GrossProfit => bases.gross_profit,
    }
}

fn apply_levies(
    levies: &[Levy],
    profit: Decimal,
    chargeable: Decimal,
    bases: &AuxiliaryBases,
) -> Vec<BandContribution> {
    levies
        .iter()
        .filter_map(|levy| {
            let base = levy_base(levy, profit, chargeable, bases);
            let above_threshold = levy.threshold.is_none_or(|threshold| base > threshold);
            (above_threshold && base > Decimal::ZERO).then(|| BandContribution {
                label: levy.name.clone(),
                amount: base,
                rate: levy.rate,
                tax: base * levy.rate,
            })
        })
        .collect()
}

/// Calculates corporation tax on annual profit.
///
/// # Arguments
///
/// * `tax_type` - Must be [`TaxType::CorporationTax`]
/// * `profit` - Annual assessable profit
/// * `table` - The rate table to apply
/// * `bases` - Turnover, gross profit, net assets, capital allowances and losses
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if any figure is negative, or turnover is
///   missing for a turnover-tiered schedule
/// - [`EngineError::UnsupportedTaxType`] if the tax type is not corporation
///   tax or the table has no corporation tax rules
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_flat_or_tiered_tax;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::{AuxiliaryBases, TaxType};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("UK", "2024-25").unwrap();
///
/// let result = calculate_flat_or_tiered_tax(
///     TaxType::CorporationTax,
///     Decimal::from_str("40000").unwrap(),
///     &table,
///     &AuxiliaryBases::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.total_tax, Decimal::from_str("7600").unwrap());
/// assert!(!result.marginal_relief_applied);
/// ```
pub fn calculate_flat_or_tiered_tax(
    tax_type: TaxType,
    profit: Decimal,
    table: &RateTable,
    bases: &AuxiliaryBases,
) -> EngineResult<CalculationResult> {
    if tax_type != TaxType::CorporationTax {
        return Err(EngineError::UnsupportedTaxType {
            tax_type: tax_type.to_string(),
            context: "flat or tiered calculation".to_string(),
        });
    }
    validate_bases(profit, bases)?;
    let rules = table.corporation_tax()?;

    let chargeable = chargeable_profit(profit, bases);
    let scheduled = match &rules.schedule {
        CorporationSchedule::MarginalRelief(schedule) => marginal_relief_tax(chargeable, schedule),
        CorporationSchedule::TurnoverTiers { tiers } => {
            tiered_rate(table, tiers, chargeable, bases)?
        }
    };

    let outcome = apply_company_minimum(rules.minimum_tax.as_ref(), scheduled.tax, bases);
    let levies = apply_levies(&rules.levies, profit, chargeable, bases);
    let levies_total: Decimal = levies.iter().map(|levy| levy.tax).sum();

    debug!(
        table = %table.id(),
        chargeable = %chargeable,
        rate = %scheduled.rate,
        minimum_tax_applied = outcome.applied,
        levies = %levies_total,
        "corporation tax calculated"
    );

    let mut breakdown = Vec::new();
    if chargeable > Decimal::ZERO {
        breakdown.push(BandContribution {
            label: scheduled.label,
            amount: chargeable,
            rate: scheduled.rate,
            tax: scheduled.tax,
        });
    }

    let total_tax = round_money(outcome.total + levies_total);

    Ok(CalculationResult {
        gross_amount: round_money(profit),
        allowance: round_money(profit - chargeable),
        taxable_amount: round_money(chargeable),
        total_tax,
        net_amount: round_money(profit - total_tax),
        effective_rate: effective_rate(total_tax, profit),
        breakdown,
        minimum_tax_applied: outcome.applied,
        marginal_relief_applied: scheduled.marginal_relief_applied,
        levies,
        ..CalculationResult::empty(TaxType::CorporationTax)
    })
}
