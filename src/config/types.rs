//! Configuration types for rate tables.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML rate table files. They are raw definitions; [`super::RateTable`]
//! validates them before any calculation can see them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single progressive band covering `[min, max)`.
///
/// A band without `max` is unbounded and must be the last band of its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// The band label shown in breakdowns.
    pub name: String,
    /// Inclusive lower bound.
    pub min: Decimal,
    /// Exclusive upper bound; `None` for the final unbounded band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// Marginal rate applied within the band, in [0, 1].
    pub rate: Decimal,
}

impl Band {
    /// Returns true when this band has no upper bound.
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// Relief formula deducted from gross income before banding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReliefRule {
    /// A flat tax-free allowance.
    PersonalAllowance {
        /// The allowance amount.
        amount: Decimal,
    },
    /// The higher of `gross * minimum_percentage` or
    /// `base_amount + gross * additional_percentage`.
    Consolidated {
        /// Percentage of gross for the first option.
        minimum_percentage: Decimal,
        /// Fixed amount for the second option.
        base_amount: Decimal,
        /// Percentage of gross added to `base_amount`.
        additional_percentage: Decimal,
    },
}

/// Default pension contribution deducted before banding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionRule {
    /// Employee contribution as a fraction of gross income.
    pub employee_rate: Decimal,
}

/// Minimum tax on gross income for personal taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalMinimumTax {
    /// Rate applied to gross income.
    pub rate: Decimal,
    /// The floor only applies when gross income exceeds this amount.
    #[serde(default)]
    pub threshold: Decimal,
}

/// Rules for a banded tax type (income tax, national insurance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandedTaxRules {
    /// Ordered, contiguous bands starting at zero.
    pub bands: Vec<Band>,
    /// Allowance formula.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relief: Option<ReliefRule>,
    /// Default pension deduction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pension: Option<PensionRule>,
    /// Minimum-tax floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_tax: Option<PersonalMinimumTax>,
}

fn default_lower_label() -> String {
    "Small Profits Rate".to_string()
}

fn default_upper_label() -> String {
    "Main Rate".to_string()
}

fn default_relief_label() -> String {
    "Marginal Relief Applied".to_string()
}

/// Two flat rates joined by a marginal relief zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalReliefSchedule {
    /// Rate at or below `lower_threshold`.
    pub lower_rate: Decimal,
    /// Rate at or above `upper_threshold`.
    pub upper_rate: Decimal,
    /// Upper limit of the lower-rate zone.
    pub lower_threshold: Decimal,
    /// Lower limit of the upper-rate zone.
    pub upper_threshold: Decimal,
    /// Label for results taxed at the lower rate.
    #[serde(default = "default_lower_label")]
    pub lower_label: String,
    /// Label for results taxed at the upper rate.
    #[serde(default = "default_upper_label")]
    pub upper_label: String,
    /// Label for results inside the relief zone.
    #[serde(default = "default_relief_label")]
    pub relief_label: String,
}

/// A company-size tier selected by turnover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoverTier {
    /// The tier label.
    pub name: String,
    /// The tier applies while turnover is below this amount; `None` for the last tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<Decimal>,
    /// Flat rate applied to chargeable profit.
    pub rate: Decimal,
}

/// How the corporation tax rate is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorporationSchedule {
    /// Lower and upper flat rates with marginal relief in between.
    MarginalRelief(MarginalReliefSchedule),
    /// Flat rate chosen by turnover tier.
    TurnoverTiers {
        /// Tiers in ascending order of `below`.
        tiers: Vec<TurnoverTier>,
    },
}

/// A figure a company minimum-tax candidate is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumTaxBase {
    /// Annual turnover.
    Turnover,
    /// Gross profit.
    GrossProfit,
    /// Net assets.
    NetAssets,
}

/// One candidate of a company minimum-tax rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumTaxCandidate {
    /// The figure the rate is applied to.
    pub base: MinimumTaxBase,
    /// The rate applied.
    pub rate: Decimal,
}

/// Company minimum tax: the highest candidate is the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMinimumTax {
    /// Candidate bases and rates.
    pub candidates: Vec<MinimumTaxCandidate>,
    /// The floor only applies when turnover exceeds this amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_threshold: Option<Decimal>,
}

/// A figure a levy is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyBase {
    /// Profit before capital allowances and losses.
    AssessableProfit,
    /// Profit after capital allowances and losses.
    ChargeableProfit,
    /// Annual turnover.
    Turnover,
    /// Gross profit.
    GrossProfit,
}

/// A flat levy charged alongside corporation tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levy {
    /// The levy label.
    pub name: String,
    /// Rate applied to the base.
    pub rate: Decimal,
    /// The figure the rate is applied to.
    pub base: LevyBase,
    /// The levy only applies when its base exceeds this amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Decimal>,
}

/// Rules for corporation / companies income tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporationTaxRules {
    /// The rate schedule.
    pub schedule: CorporationSchedule,
    /// Minimum-tax floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_tax: Option<CompanyMinimumTax>,
    /// Levies added after the minimum-tax comparison.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levies: Vec<Levy>,
}

fn default_return_rate() -> String {
    "standard".to_string()
}

/// Rules for VAT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRules {
    /// Map of rate selector to rate.
    pub rates: BTreeMap<String, Decimal>,
    /// The selector used for VAT returns.
    #[serde(default = "default_return_rate")]
    pub return_rate: String,
    /// Annual taxable sales at which registration becomes mandatory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_threshold: Option<Decimal>,
}

/// A withholding tax rate for one payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingRate {
    /// Rate deducted from the payment.
    pub rate: Decimal,
    /// Description of the payments covered.
    #[serde(default)]
    pub description: String,
}

/// Rules for withholding tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingRules {
    /// Map of payment type to rate.
    pub rates: BTreeMap<String, WithholdingRate>,
    /// Payments at or below this amount are exempt.
    #[serde(default)]
    pub exemption_threshold: Decimal,
    /// Payment types for which the deduction is a final tax.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub final_tax_types: Vec<String>,
}

/// A rate table file as written in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTableDefinition {
    /// Jurisdiction code, e.g. "UK".
    pub jurisdiction: String,
    /// Tax year label, e.g. "2024-25".
    pub tax_year: String,
    /// ISO currency code.
    pub currency: String,
    /// First day the table applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
    /// Last day the table applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,
    /// Income tax rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_tax: Option<BandedTaxRules>,
    /// National insurance / payroll rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_insurance: Option<BandedTaxRules>,
    /// Corporation tax rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporation_tax: Option<CorporationTaxRules>,
    /// VAT rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<VatRules>,
    /// Withholding tax rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withholding: Option<WithholdingRules>,
}
