//! Progressive band accumulation.
//!
//! Walks an ordered band list over a taxable base, attributing each slice of
//! the base to the band it falls in. Bands are half-open `[min, max)`: an
//! amount exactly on a boundary belongs to the lower band.

use rust_decimal::Decimal;

use crate::config::Band;
use crate::models::BandContribution;

/// The result of walking the bands over a taxable base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandedTax {
    /// Exact (unrounded) sum of the contributions.
    pub total: Decimal,
    /// One row per band that received a positive amount.
    pub breakdown: Vec<BandContribution>,
}

/// Computes banded tax on `base`.
///
/// `base` must be non-negative; entry points reject negative amounts before
/// calling this. The band list is assumed to be validated (contiguous from
/// zero, last band unbounded).
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::accumulate_bands;
/// use tax_engine::config::Band;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s: &str| Decimal::from_str(s).unwrap();
/// let bands = vec![
///     Band { name: "Nil Rate".into(), min: d("0"), max: Some(d("10000")), rate: d("0") },
///     Band { name: "Basic Rate".into(), min: d("10000"), max: None, rate: d("0.20") },
/// ];
///
/// let result = accumulate_bands(d("15000"), &bands);
/// assert_eq!(result.total, d("1000"));
/// assert_eq!(result.breakdown.len(), 2);
/// assert_eq!(result.breakdown[1].amount, d("5000"));
/// ```
pub fn accumulate_bands(base: Decimal, bands: &[Band]) -> BandedTax {
    let mut cumulative = Decimal::ZERO;
    let mut total = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for band in bands {
        if cumulative >= base {
            break;
        }

        let band_end = match band.max {
            Some(max) => max.min(base),
            None => base,
        };
        let amount_in_band = (band_end - cumulative).max(Decimal::ZERO);

        if amount_in_band > Decimal::ZERO {
            let tax = amount_in_band * band.rate;
            total += tax;
            breakdown.push(BandContribution {
                label: band.name.clone(),
                amount: amount_in_band,
                rate: band.rate,
                tax,
            });
            cumulative += amount_in_band;
        }
    }

    BandedTax { total, breakdown }
}
