//! Response types for the Tax Engine API.
//!
//! This module defines the success envelope, the rate table listing, and the
//! error response structures for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RateTable;
use crate::error::EngineError;
use crate::models::TaxType;

/// The engine version reported in every envelope.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wraps a calculation result with its identifier and the table it used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationEnvelope<T> {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The engine version that produced the result.
    pub engine_version: String,
    /// Jurisdiction of the rate table used.
    pub jurisdiction: String,
    /// Tax year of the rate table used.
    pub tax_year: String,
    /// Currency of every monetary amount in the result.
    pub currency: String,
    /// The calculation output.
    pub result: T,
}

impl<T> CalculationEnvelope<T> {
    /// Wraps `result` computed against `table`.
    pub fn new(calculation_id: Uuid, table: &RateTable, result: T) -> Self {
        Self {
            calculation_id,
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            jurisdiction: table.jurisdiction().to_string(),
            tax_year: table.tax_year().to_string(),
            currency: table.currency().to_string(),
            result,
        }
    }
}

/// One entry of the `/rate-tables` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTableSummary {
    /// Jurisdiction code.
    pub jurisdiction: String,
    /// Tax year label.
    pub tax_year: String,
    /// ISO currency code.
    pub currency: String,
    /// First day the table applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
    /// Last day the table applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,
    /// Tax types the table has rules for.
    pub tax_types: Vec<TaxType>,
}

impl From<&RateTable> for RateTableSummary {
    fn from(table: &RateTable) -> Self {
        Self {
            jurisdiction: table.jurisdiction().to_string(),
            tax_year: table.tax_year().to_string(),
            currency: table.currency().to_string(),
            effective_from: table.effective_from(),
            effective_to: table.effective_to(),
            tax_types: table.supported_tax_types(),
        }
    }
}

/// Body of the `/rate-tables` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTableList {
    /// The loaded tables, ordered by jurisdiction and tax year.
    pub tables: Vec<RateTableSummary>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfiguration { .. }
            | EngineError::DuplicateRateTable { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::RateTableNotFound { .. } => (StatusCode::NOT_FOUND, "RATE_TABLE_NOT_FOUND"),
            EngineError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            EngineError::UnknownRateSelector { .. } => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_RATE_SELECTOR")
            }
            EngineError::UnknownPaymentType { .. } => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_PAYMENT_TYPE")
            }
            EngineError::UnsupportedTaxType { .. } => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_TAX_TYPE")
            }
        };

        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            ApiError::with_details(code, "Configuration error", message)
        } else {
            ApiError::new(code, message)
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_unknown_table_maps_to_404() {
        let api_error: ApiErrorResponse = EngineError::RateTableNotFound {
            jurisdiction: "FR".to_string(),
            tax_year: "2025".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "RATE_TABLE_NOT_FOUND");
        assert_eq!(api_error.error.message, "Rate table not found for FR 2025");
    }

    #[test]
    fn test_input_errors_map_to_400() {
        let api_error: ApiErrorResponse = EngineError::UnknownPaymentType {
            payment_type: "gifts".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "UNKNOWN_PAYMENT_TYPE");
    }

    #[test]
    fn test_configuration_errors_map_to_500() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "/missing".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
        assert_eq!(
            api_error.error.details.as_deref(),
            Some("Configuration file not found: /missing")
        );
    }

    #[test]
    fn test_envelope_serialization() {
        let table = crate::config::ConfigLoader::load_table(std::path::Path::new(
            "./config/rates/uk-2024-25.yaml",
        ))
        .unwrap();
        let envelope = CalculationEnvelope::new(Uuid::new_v4(), &table, 42);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["jurisdiction"], "UK");
        assert_eq!(json["tax_year"], "2024-25");
        assert_eq!(json["currency"], "GBP");
        assert_eq!(json["engine_version"], ENGINE_VERSION);
        assert_eq!(json["result"], 42);
    }
}
