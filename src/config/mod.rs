//! Configuration loading and management for the Tax Engine.
//!
//! This module provides functionality to load rate tables from YAML files,
//! validate them into immutable [`RateTable`] values and keep them in a
//! [`RateTableRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use tax_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/rates").unwrap();
//! for table in loader.registry().tables() {
//!     println!("{} ({})", table.id(), table.currency());
//! }
//! ```

mod loader;
mod rate_table;
mod registry;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use rate_table::RateTable;
pub use registry::RateTableRegistry;
pub use settings::ServerSettings;
pub use types::{
    Band, BandedTaxRules, CompanyMinimumTax, CorporationSchedule, CorporationTaxRules, Levy,
    LevyBase, MarginalReliefSchedule, MinimumTaxBase, MinimumTaxCandidate, PensionRule,
    PersonalMinimumTax, RateTableDefinition, ReliefRule, TurnoverTier, VatRules,
    WithholdingRate, WithholdingRules,
};
