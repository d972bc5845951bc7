//! The validated, immutable rate table.
//!
//! A [`RateTable`] can only be obtained through [`RateTable::new`], which
//! checks every structural rule the calculations rely on. Once built the table
//! is never mutated; a new tax year means a new table.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::TaxType;

use super::types::{
    Band, BandedTaxRules, CompanyMinimumTax, CorporationSchedule, CorporationTaxRules,
    MarginalReliefSchedule, RateTableDefinition, ReliefRule, TurnoverTier, VatRules,
    WithholdingRules,
};

/// A validated rate table for one jurisdiction and tax year.
///
/// # Example
///
/// ```
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::TaxType;
///
/// let table = ConfigLoader::parse_table(
///     r#"
/// jurisdiction: XX
/// tax_year: "2025"
/// currency: GBP
/// income_tax:
///   bands:
///     - { name: Nil Rate, min: "0", max: "10000", rate: "0" }
///     - { name: Basic Rate, min: "10000", rate: "0.20" }
/// "#,
///     "inline",
/// )
/// .unwrap();
///
/// assert_eq!(table.id(), "XX/2025");
/// assert_eq!(table.supported_tax_types(), vec![TaxType::IncomeTax]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    definition: RateTableDefinition,
}

impl RateTable {
    /// Validates a definition and builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if any band list is not
    /// contiguous from zero to an unbounded final band, any rate falls outside
    /// [0, 1], a threshold or amount is negative, or no tax type is configured.
    pub fn new(definition: RateTableDefinition) -> EngineResult<Self> {
        Validator::new(&definition).validate()?;
        Ok(Self { definition })
    }

    /// Returns the `jurisdiction/tax_year` identifier.
    pub fn id(&self) -> String {
        format!("{}/{}", self.definition.jurisdiction, self.definition.tax_year)
    }

    /// Returns the jurisdiction code.
    pub fn jurisdiction(&self) -> &str {
        &self.definition.jurisdiction
    }

    /// Returns the tax year label.
    pub fn tax_year(&self) -> &str {
        &self.definition.tax_year
    }

    /// Returns the ISO currency code.
    pub fn currency(&self) -> &str {
        &self.definition.currency
    }

    /// Returns the first day the table applies, if set.
    pub fn effective_from(&self) -> Option<NaiveDate> {
        self.definition.effective_from
    }

    /// Returns the last day the table applies, if set.
    pub fn effective_to(&self) -> Option<NaiveDate> {
        self.definition.effective_to
    }

    /// Returns true when `date` falls within the table's effective period.
    ///
    /// A table without dates covers no date; it can only be selected by tax year.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match (self.definition.effective_from, self.definition.effective_to) {
            (Some(from), Some(to)) => from <= date && date <= to,
            (Some(from), None) => from <= date,
            _ => false,
        }
    }

    /// Returns the raw definition the table was built from.
    pub fn definition(&self) -> &RateTableDefinition {
        &self.definition
    }

    /// Returns the tax types this table has rules for.
    pub fn supported_tax_types(&self) -> Vec<TaxType> {
        let d = &self.definition;
        [
            (TaxType::IncomeTax, d.income_tax.is_some()),
            (TaxType::NationalInsurance, d.national_insurance.is_some()),
            (TaxType::CorporationTax, d.corporation_tax.is_some()),
            (TaxType::Vat, d.vat.is_some()),
            (TaxType::Withholding, d.withholding.is_some()),
        ]
        .into_iter()
        .filter_map(|(tax_type, present)| present.then_some(tax_type))
        .collect()
    }

    /// Returns the banded rules for income tax or national insurance.
    pub fn banded_rules(&self, tax_type: TaxType) -> EngineResult<&BandedTaxRules> {
        let rules = match tax_type {
            TaxType::IncomeTax => self.definition.income_tax.as_ref(),
            TaxType::NationalInsurance => self.definition.national_insurance.as_ref(),
            _ => {
                return Err(EngineError::UnsupportedTaxType {
                    tax_type: tax_type.to_string(),
                    context: "banded calculation".to_string(),
                });
            }
        };
        rules.ok_or_else(|| self.not_configured(tax_type))
    }

    /// Returns the corporation tax rules.
    pub fn corporation_tax(&self) -> EngineResult<&CorporationTaxRules> {
        self.definition
            .corporation_tax
            .as_ref()
            .ok_or_else(|| self.not_configured(TaxType::CorporationTax))
    }

    /// Returns the VAT rules.
    pub fn vat(&self) -> EngineResult<&VatRules> {
        self.definition
            .vat
            .as_ref()
            .ok_or_else(|| self.not_configured(TaxType::Vat))
    }

    /// Returns the withholding tax rules.
    pub fn withholding(&self) -> EngineResult<&WithholdingRules> {
        self.definition
            .withholding
            .as_ref()
            .ok_or_else(|| self.not_configured(TaxType::Withholding))
    }

    fn not_configured(&self, tax_type: TaxType) -> EngineError {
        EngineError::UnsupportedTaxType {
            tax_type: tax_type.to_string(),
            context: self.id(),
        }
    }
}

/// Collects the structural checks for one definition.
struct Validator<'a> {
    definition: &'a RateTableDefinition,
    table: String,
}

impl<'a> Validator<'a> {
    fn new(definition: &'a RateTableDefinition) -> Self {
        Self {
            definition,
            table: format!("{}/{}", definition.jurisdiction, definition.tax_year),
        }
    }

    fn fail(&self, message: impl Into<String>) -> EngineError {
        EngineError::InvalidConfiguration {
            table: self.table.clone(),
            message: message.into(),
        }
    }

    fn validate(&self) -> EngineResult<()> {
        let d = self.definition;

        if d.jurisdiction.trim().is_empty() {
            return Err(self.fail("jurisdiction must not be empty"));
        }
        if d.tax_year.trim().is_empty() {
            return Err(self.fail("tax_year must not be empty"));
        }
        if let (Some(from), Some(to)) = (d.effective_from, d.effective_to) {
            if from > to {
                return Err(self.fail(format!(
                    "effective_from {} is after effective_to {}",
                    from, to
                )));
            }
        }

        let mut configured = 0;
        if let Some(rules) = &d.income_tax {
            self.banded(TaxType::IncomeTax, rules)?;
            configured += 1;
        }
        if let Some(rules) = &d.national_insurance {
            self.banded(TaxType::NationalInsurance, rules)?;
            configured += 1;
        }
        if let Some(rules) = &d.corporation_tax {
            self.corporation(rules)?;
            configured += 1;
        }
        if let Some(rules) = &d.vat {
            self.vat(rules)?;
            configured += 1;
        }
        if let Some(rules) = &d.withholding {
            self.withholding(rules)?;
            configured += 1;
        }

        if configured == 0 {
            return Err(self.fail("no tax types configured"));
        }
        Ok(())
    }

    fn rate(&self, context: &str, rate: Decimal) -> EngineResult<()> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(self.fail(format!("{} rate {} is outside [0, 1]", context, rate)));
        }
        Ok(())
    }

    fn non_negative(&self, context: &str, amount: Decimal) -> EngineResult<()> {
        if amount < Decimal::ZERO {
            return Err(self.fail(format!("{} must not be negative, got {}", context, amount)));
        }
        Ok(())
    }

    fn bands(&self, tax_type: TaxType, bands: &[Band]) -> EngineResult<()> {
        let Some(first) = bands.first() else {
            return Err(self.fail(format!("{} has no bands", tax_type)));
        };
        if !first.min.is_zero() {
            return Err(self.fail(format!(
                "{} band '{}' must start at 0, starts at {}",
                tax_type, first.name, first.min
            )));
        }

        let last_index = bands.len() - 1;
        for (index, band) in bands.iter().enumerate() {
            self.rate(&format!("{} band '{}'", tax_type, band.name), band.rate)?;

            match band.max {
                Some(max) if max <= band.min => {
                    return Err(self.fail(format!(
                        "{} band '{}' has max {} not above min {}",
                        tax_type, band.name, max, band.min
                    )));
                }
                None if index != last_index => {
                    return Err(self.fail(format!(
                        "{} band '{}' is unbounded but is not the last band",
                        tax_type, band.name
                    )));
                }
                Some(_) if index == last_index => {
                    return Err(self.fail(format!(
                        "{} last band '{}' must be unbounded",
                        tax_type, band.name
                    )));
                }
                _ => {}
            }

            if let Some(next) = bands.get(index + 1) {
                if band.max != Some(next.min) {
                    return Err(self.fail(format!(
                        "{} band '{}' does not start where band '{}' ends",
                        tax_type, next.name, band.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn banded(&self, tax_type: TaxType, rules: &BandedTaxRules) -> EngineResult<()> {
        self.bands(tax_type, &rules.bands)?;

        match &rules.relief {
            Some(ReliefRule::PersonalAllowance { amount }) => {
                self.non_negative(&format!("{} personal allowance", tax_type), *amount)?;
            }
            Some(ReliefRule::Consolidated {
                minimum_percentage,
                base_amount,
                additional_percentage,
            }) => {
                let context = format!("{} consolidated relief", tax_type);
                self.rate(&context, *minimum_percentage)?;
                self.rate(&context, *additional_percentage)?;
                self.non_negative(&format!("{} base amount", context), *base_amount)?;
            }
            None => {}
        }

        if let Some(pension) = &rules.pension {
            self.rate(&format!("{} pension", tax_type), pension.employee_rate)?;
        }
        if let Some(minimum) = &rules.minimum_tax {
            self.rate(&format!("{} minimum tax", tax_type), minimum.rate)?;
            self.non_negative(&format!("{} minimum tax threshold", tax_type), minimum.threshold)?;
        }
        Ok(())
    }

    fn corporation(&self, rules: &CorporationTaxRules) -> EngineResult<()> {
        match &rules.schedule {
            CorporationSchedule::MarginalRelief(schedule) => self.marginal_relief(schedule)?,
            CorporationSchedule::TurnoverTiers { tiers } => self.turnover_tiers(tiers)?,
        }
        if let Some(minimum) = &rules.minimum_tax {
            self.company_minimum(minimum)?;
        }
        for levy in &rules.levies {
            self.rate(&format!("levy '{}'", levy.name), levy.rate)?;
            if let Some(threshold) = levy.threshold {
                self.non_negative(&format!("levy '{}' threshold", levy.name), threshold)?;
            }
        }
        Ok(())
    }

    fn marginal_relief(&self, schedule: &MarginalReliefSchedule) -> EngineResult<()> {
        self.rate("corporation_tax lower", schedule.lower_rate)?;
        self.rate("corporation_tax upper", schedule.upper_rate)?;
        if schedule.lower_rate > schedule.upper_rate {
            return Err(self.fail("corporation_tax lower_rate exceeds upper_rate"));
        }
        if schedule.lower_threshold <= Decimal::ZERO {
            return Err(self.fail("corporation_tax lower_threshold must be positive"));
        }
        if schedule.upper_threshold <= schedule.lower_threshold {
            return Err(self.fail(
                "corporation_tax upper_threshold must be above lower_threshold",
            ));
        }
        Ok(())
    }

    fn turnover_tiers(&self, tiers: &[TurnoverTier]) -> EngineResult<()> {
        if tiers.is_empty() {
            return Err(self.fail("corporation_tax has no turnover tiers"));
        }
        let last_index = tiers.len() - 1;
        let mut previous: Option<Decimal> = None;
        for (index, tier) in tiers.iter().enumerate() {
            self.rate(&format!("corporation_tax tier '{}'", tier.name), tier.rate)?;
            match tier.below {
                Some(limit) => {
                    if index == last_index {
                        return Err(self.fail(format!(
                            "corporation_tax last tier '{}' must be unbounded",
                            tier.name
                        )));
                    }
                    if previous.is_some_and(|p| limit <= p) || limit <= Decimal::ZERO {
                        return Err(self.fail(format!(
                            "corporation_tax tier '{}' limit {} is not ascending",
                            tier.name, limit
                        )));
                    }
                    previous = Some(limit);
                }
                None if index != last_index => {
                    return Err(self.fail(format!(
                        "corporation_tax tier '{}' is unbounded but is not the last tier",
                        tier.name
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }

    fn company_minimum(&self, minimum: &CompanyMinimumTax) -> EngineResult<()> {
        if minimum.candidates.is_empty() {
            return Err(self.fail("corporation_tax minimum_tax has no candidates"));
        }
        for candidate in &minimum.candidates {
            self.rate("corporation_tax minimum tax", candidate.rate)?;
        }
        if let Some(threshold) = minimum.turnover_threshold {
            self.non_negative("corporation_tax minimum tax threshold", threshold)?;
        }
        Ok(())
    }

    fn vat(&self, rules: &VatRules) -> EngineResult<()> {
        if rules.rates.is_empty() {
            return Err(self.fail("vat has no rates"));
        }
        for (selector, rate) in &rules.rates {
            self.rate(&format!("vat '{}'", selector), *rate)?;
        }
        if !rules.rates.contains_key(&rules.return_rate) {
            return Err(self.fail(format!(
                "vat return_rate '{}' is not a configured rate",
                rules.return_rate
            )));
        }
        if let Some(threshold) = rules.registration_threshold {
            self.non_negative("vat registration threshold", threshold)?;
        }
        Ok(())
    }

    fn withholding(&self, rules: &WithholdingRules) -> EngineResult<()> {
        if rules.rates.is_empty() {
            return Err(self.fail("withholding has no payment types"));
        }
        for (payment_type, rate) in &rules.rates {
            self.rate(&format!("withholding '{}'", payment_type), rate.rate)?;
        }
        self.non_negative("withholding exemption threshold", rules.exemption_threshold)?;
        if let Some(unknown) = rules
            .final_tax_types
            .iter()
            .find(|t| !rules.rates.contains_key(*t))
        {
            return Err(self.fail(format!(
                "withholding final tax type '{}' has no rate",
                unknown
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    const BASE: &str = r#"
jurisdiction: XX
tax_year: "2025"
currency: GBP
"#;

    fn parse(body: &str) -> EngineResult<RateTable> {
        ConfigLoader::parse_table(&format!("{}{}", BASE, body), "test.yaml")
    }

    fn assert_invalid(body: &str, fragment: &str) {
        match parse(body) {
            Err(EngineError::InvalidConfiguration { table, message }) => {
                assert_eq!(table, "XX/2025");
                assert!(
                    message.contains(fragment),
                    "Expected '{}' in message, got: {}",
                    fragment,
                    message
                );
            }
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_two_band_table() {
        let table = parse(
            r#"
income_tax:
  bands:
    - { name: Nil Rate, min: "0", max: "10000", rate: "0" }
    - { name: Basic Rate, min: "10000", rate: "0.20" }
"#,
        )
        .unwrap();

        assert_eq!(table.jurisdiction(), "XX");
        assert_eq!(table.tax_year(), "2025");
        assert_eq!(table.currency(), "GBP");
        assert!(table.banded_rules(TaxType::IncomeTax).is_ok());
    }

    #[test]
    fn test_first_band_must_start_at_zero() {
        assert_invalid(
            r#"
income_tax:
  bands:
    - { name: Basic Rate, min: "100", max: "1000", rate: "0.20" }
    - { name: Higher Rate, min: "1000", rate: "0.40" }
"#,
            "must start at 0",
        );
    }

    #[test]
    fn test_gap_between_bands_rejected() {
        assert_invalid(
            r#"
income_tax:
  bands:
    - { name: Personal Allowance, min: "0", max: "12570", rate: "0" }
    - { name: Basic Rate, min: "12571", rate: "0.20" }
"#,
            "does not start where band 'Personal Allowance' ends",
        );
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        assert_invalid(
            r#"
national_insurance:
  bands:
    - { name: Lower, min: "0", max: "5000", rate: "0" }
    - { name: Upper, min: "4000", rate: "0.12" }
"#,
            "does not start where",
        );
    }

    #[test]
    fn test_last_band_must_be_unbounded() {
        assert_invalid(
            r#"
income_tax:
  bands:
    - { name: Nil Rate, min: "0", max: "10000", rate: "0" }
    - { name: Basic Rate, min: "10000", max: "50000", rate: "0.20" }
"#,
            "must be unbounded",
        );
    }

    #[test]
    fn test_unbounded_band_must_be_last() {
        assert_invalid(
            r#"
income_tax:
  bands:
    - { name: Nil Rate, min: "0", rate: "0" }
    - { name: Basic Rate, min: "10000", rate: "0.20" }
"#,
            "is not the last band",
        );
    }

    #[test]
    fn test_empty_band_rejected() {
        assert_invalid(
            r#"
income_tax:
  bands:
    - { name: Nil Rate, min: "0", max: "0", rate: "0" }
    - { name: Basic Rate, min: "0", rate: "0.20" }
"#,
            "not above min",
        );
    }

    #[test]
    fn test_rate_above_one_rejected() {
        assert_invalid(
            r#"
income_tax:
  bands:
    - { name: Everything, min: "0", rate: "1.5" }
"#,
            "outside [0, 1]",
        );
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert_invalid(
            r#"
vat:
  rates:
    standard: "-0.2"
"#,
            "outside [0, 1]",
        );
    }

    #[test]
    fn test_no_tax_types_rejected() {
        assert_invalid("", "no tax types configured");
    }

    #[test]
    fn test_marginal_relief_thresholds_must_ascend() {
        assert_invalid(
            r#"
corporation_tax:
  schedule:
    kind: marginal_relief
    lower_rate: "0.19"
    upper_rate: "0.25"
    lower_threshold: "250000"
    upper_threshold: "50000"
"#,
            "upper_threshold must be above lower_threshold",
        );
    }

    #[test]
    fn test_marginal_relief_rates_must_not_invert() {
        assert_invalid(
            r#"
corporation_tax:
  schedule:
    kind: marginal_relief
    lower_rate: "0.30"
    upper_rate: "0.25"
    lower_threshold: "50000"
    upper_threshold: "250000"
"#,
            "lower_rate exceeds upper_rate",
        );
    }

    #[test]
    fn test_turnover_tiers_need_unbounded_last_tier() {
        assert_invalid(
            r#"
corporation_tax:
  schedule:
    kind: turnover_tiers
    tiers:
      - { name: Small, below: "25000000", rate: "0" }
      - { name: Large, below: "100000000", rate: "0.30" }
"#,
            "must be unbounded",
        );
    }

    #[test]
    fn test_vat_return_rate_must_be_configured() {
        assert_invalid(
            r#"
vat:
  rates:
    reduced: "0.05"
"#,
            "return_rate 'standard'",
        );
    }

    #[test]
    fn test_withholding_final_tax_type_must_have_rate() {
        assert_invalid(
            r#"
withholding:
  rates:
    rent: { rate: "0.10" }
  final_tax_types: [dividends]
"#,
            "final tax type 'dividends'",
        );
    }

    #[test]
    fn test_effective_dates_must_be_ordered() {
        assert_invalid(
            r#"
effective_from: 2025-04-06
effective_to: 2024-04-05
vat:
  rates:
    standard: "0.20"
"#,
            "is after effective_to",
        );
    }

    #[test]
    fn test_missing_tax_type_is_input_error() {
        let table = parse(
            r#"
vat:
  rates:
    standard: "0.20"
"#,
        )
        .unwrap();

        let err = table.withholding().unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(err, EngineError::UnsupportedTaxType { .. }));
    }

    #[test]
    fn test_banded_rules_reject_non_banded_tax_type() {
        let table = parse(
            r#"
vat:
  rates:
    standard: "0.20"
"#,
        )
        .unwrap();

        assert!(table.banded_rules(TaxType::Vat).is_err());
    }

    #[test]
    fn test_covers_uses_inclusive_dates() {
        let table = parse(
            r#"
effective_from: 2024-04-06
effective_to: 2025-04-05
vat:
  rates:
    standard: "0.20"
"#,
        )
        .unwrap();

        assert!(table.covers(NaiveDate::from_ymd_opt(2024, 4, 6).unwrap()));
        assert!(table.covers(NaiveDate::from_ymd_opt(2025, 4, 5).unwrap()));
        assert!(!table.covers(NaiveDate::from_ymd_opt(2025, 4, 6).unwrap()));
    }
}
