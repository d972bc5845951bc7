//! Marginal relief between two flat corporation tax rates.
//!
//! Profits at or below the lower threshold pay the lower rate, profits at or
//! above the upper threshold pay the upper rate, and profits in between are
//! charged by the relief formula:
//!
//! ```text
//! tax = p * upper_rate - ((upper_threshold - p) / upper_threshold) * (upper_rate - lower_rate) * p
//! ```
//!
//! This is a separate path from band accumulation: the whole profit is
//! charged at one effective rate rather than sliced.

use rust_decimal::Decimal;

use crate::config::MarginalReliefSchedule;

/// The corporation tax produced by a flat or relieved rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorporationRate {
    /// Exact tax on the profit.
    pub tax: Decimal,
    /// The effective rate applied to the whole profit.
    pub rate: Decimal,
    /// Label of the rate that applied.
    pub label: String,
    /// True when the profit fell inside the relief zone.
    pub marginal_relief_applied: bool,
}

/// Computes corporation tax on `profit` under a marginal relief schedule.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::marginal_relief_tax;
/// use tax_engine::config::MarginalReliefSchedule;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s: &str| Decimal::from_str(s).unwrap();
/// let schedule = MarginalReliefSchedule {
///     lower_rate: d("0.19"),
///     upper_rate: d("0.25"),
///     lower_threshold: d("50000"),
///     upper_threshold: d("250000"),
///     lower_label: "Small Profits Rate".into(),
///     upper_label: "Main Rate".into(),
///     relief_label: "Marginal Relief Applied".into(),
/// };
///
/// assert_eq!(marginal_relief_tax(d("40000"), &schedule).tax, d("7600"));
/// assert_eq!(marginal_relief_tax(d("300000"), &schedule).tax, d("75000"));
/// assert!(marginal_relief_tax(d("150000"), &schedule).marginal_relief_applied);
/// ```
pub fn marginal_relief_tax(profit: Decimal, schedule: &MarginalReliefSchedule) -> CorporationRate {
    if profit <= schedule.lower_threshold {
        return flat(profit, schedule.lower_rate, &schedule.lower_label);
    }
    if profit >= schedule.upper_threshold {
        return flat(profit, schedule.upper_rate, &schedule.upper_label);
    }

    let rate_gap = schedule.upper_rate - schedule.lower_rate;
    let fraction = (schedule.upper_threshold - profit) / schedule.upper_threshold;
    let tax = profit * schedule.upper_rate - fraction * rate_gap * profit;

    CorporationRate {
        tax,
        rate: tax / profit,
        label: schedule.relief_label.clone(),
        marginal_relief_applied: true,
    }
}

fn flat(profit: Decimal, rate: Decimal, label: &str) -> CorporationRate {
    CorporationRate {
        tax: profit * rate,
        rate,
        label: label.to_string(),
        marginal_relief_applied: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn uk_schedule() -> MarginalReliefSchedule {
        MarginalReliefSchedule {
            lower_rate: dec("0.19"),
            upper_rate: dec("0.25"),
            lower_threshold: dec("50000"),
            upper_threshold: dec("250000"),
            lower_label: "Small Profits Rate".to_string(),
            upper_label: "Main Rate".to_string(),
            relief_label: "Marginal Relief Applied".to_string(),
        }
    }

    #[test]
    fn test_small_profits_rate() {
        let result = marginal_relief_tax(dec("40000"), &uk_schedule());
        assert_eq!(result.tax, dec("7600"));
        assert_eq!(result.rate, dec("0.19"));
        assert_eq!(result.label, "Small Profits Rate");
        assert!(!result.marginal_relief_applied);
    }

    #[test]
    fn test_main_rate() {
        let result = marginal_relief_tax(dec("300000"), &uk_schedule());
        assert_eq!(result.tax, dec("75000"));
        assert_eq!(result.label, "Main Rate");
        assert!(!result.marginal_relief_applied);
    }

    #[test]
    fn test_lower_threshold_uses_lower_rate() {
        let result = marginal_relief_tax(dec("50000"), &uk_schedule());
        assert_eq!(result.tax, dec("9500"));
        assert!(!result.marginal_relief_applied);
    }

    #[test]
    fn test_upper_threshold_uses_upper_rate() {
        let result = marginal_relief_tax(dec("250000"), &uk_schedule());
        assert_eq!(result.tax, dec("62500"));
        assert!(!result.marginal_relief_applied);
    }

    #[test]
    fn test_relief_zone_formula() {
        // 150000 * 0.25 - (100000 / 250000) * 0.06 * 150000 = 37500 - 3600
        let result = marginal_relief_tax(dec("150000"), &uk_schedule());
        assert_eq!(result.tax, dec("33900"));
        assert_eq!(result.rate, dec("0.226"));
        assert_eq!(result.label, "Marginal Relief Applied");
        assert!(result.marginal_relief_applied);
    }

    #[test]
    fn test_relief_zone_between_flat_rates() {
        let schedule = uk_schedule();
        for profit in ["50001", "100000", "200000", "249999"] {
            let p = dec(profit);
            let result = marginal_relief_tax(p, &schedule);
            assert!(result.tax > p * schedule.lower_rate, "profit {}", profit);
            assert!(result.tax < p * schedule.upper_rate, "profit {}", profit);
        }
    }

    #[test]
    fn test_zero_profit() {
        let result = marginal_relief_tax(Decimal::ZERO, &uk_schedule());
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.rate, dec("0.19"));
    }
}
