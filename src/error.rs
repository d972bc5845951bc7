//! Error types for the Tax Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Errors fall into two classes: configuration errors, raised while a rate
//! table is loaded or constructed, and input errors, raised by an entry
//! function before any relief or band logic runs.

use thiserror::Error;

/// The main error type for the Tax Engine.
///
/// # Example
///
/// ```
/// use tax_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rates".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rates");
/// assert!(error.is_configuration_error());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rate table failed validation.
    #[error("Invalid rate table '{table}': {message}")]
    InvalidConfiguration {
        /// The `jurisdiction/tax_year` identifier of the table.
        table: String,
        /// A description of the violated rule.
        message: String,
    },

    /// Two rate tables were loaded for the same jurisdiction and tax year.
    #[error("Duplicate rate table for {jurisdiction} {tax_year}")]
    DuplicateRateTable {
        /// The jurisdiction code.
        jurisdiction: String,
        /// The tax year label.
        tax_year: String,
    },

    /// No rate table is loaded for the requested jurisdiction and tax year.
    #[error("Rate table not found for {jurisdiction} {tax_year}")]
    RateTableNotFound {
        /// The jurisdiction code.
        jurisdiction: String,
        /// The tax year label (or date) that was requested.
        tax_year: String,
    },

    /// An input amount or option was invalid.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The VAT rate selector is not defined by the rate table.
    #[error("Unknown VAT rate selector: {selector}")]
    UnknownRateSelector {
        /// The selector that was not found.
        selector: String,
    },

    /// The withholding payment type is not defined by the rate table.
    #[error("Invalid payment type: {payment_type}")]
    UnknownPaymentType {
        /// The payment type that was not found.
        payment_type: String,
    },

    /// The tax type is not configured for the table or not accepted by the
    /// entry point it was passed to.
    #[error("Tax type '{tax_type}' is not supported for {context}")]
    UnsupportedTaxType {
        /// The tax type that was requested.
        tax_type: String,
        /// The table or operation that rejected it.
        context: String,
    },
}

impl EngineError {
    /// Returns true for errors raised while loading or constructing rate tables.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::InvalidConfiguration { .. }
                | EngineError::DuplicateRateTable { .. }
        )
    }

    /// Returns true for errors caused by the caller's input.
    pub fn is_input_error(&self) -> bool {
        !self.is_configuration_error()
    }

    pub(crate) fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/rates".to_string(),
        };
        assert_eq!(error.to_string(), "Configuration file not found: /missing/rates");
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/rates/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/rates/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_configuration_displays_table_and_message() {
        let error = EngineError::InvalidConfiguration {
            table: "UK/2024-25".to_string(),
            message: "income_tax band 2 does not start where band 1 ends".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid rate table 'UK/2024-25': income_tax band 2 does not start where band 1 ends"
        );
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("gross_income", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid input 'gross_income': must not be negative"
        );
    }

    #[test]
    fn test_unknown_payment_type_display() {
        let error = EngineError::UnknownPaymentType {
            payment_type: "gifts".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid payment type: gifts");
    }

    #[test]
    fn test_unsupported_tax_type_display() {
        let error = EngineError::UnsupportedTaxType {
            tax_type: "withholding".to_string(),
            context: "UK/2024-25".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Tax type 'withholding' is not supported for UK/2024-25"
        );
    }

    #[test]
    fn test_error_classification() {
        let config = EngineError::DuplicateRateTable {
            jurisdiction: "NG".to_string(),
            tax_year: "2026".to_string(),
        };
        let input = EngineError::UnknownRateSelector {
            selector: "luxury".to_string(),
        };
        let missing = EngineError::RateTableNotFound {
            jurisdiction: "FR".to_string(),
            tax_year: "2025".to_string(),
        };

        assert!(config.is_configuration_error());
        assert!(!config.is_input_error());
        assert!(input.is_input_error());
        assert!(missing.is_input_error());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_input() -> EngineResult<()> {
            Err(EngineError::invalid_input("amount", "must not be negative"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_input()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
