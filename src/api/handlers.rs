//! HTTP request handlers for the Tax Engine API.
//!
//! This module contains the handler functions for all API endpoints. Handlers
//! parse the request, take a registry snapshot, resolve the rate table and
//! call into [`crate::calculation`]; they hold no tax logic of their own.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate, calculate_vat_return, summarize_business};
use crate::config::RateTableRegistry;
use crate::error::EngineError;

use super::request::{BusinessSummaryRequest, CalculationRequest, VatReturnRequest};
use super::response::{
    ApiError, ApiErrorResponse, CalculationEnvelope, RateTableList, RateTableSummary,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/vat-return", post(vat_return_handler))
        .route("/business-summary", post(business_summary_handler))
        .route("/rate-tables", get(list_rate_tables_handler))
        .route("/rate-tables/reload", post(reload_rate_tables_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the failure
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Calculation failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn table_list(registry: &RateTableRegistry) -> RateTableList {
    RateTableList {
        tables: registry
            .tables()
            .map(|table| RateTableSummary::from(table.as_ref()))
            .collect(),
    }
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a tagged calculation input and returns the result in an envelope.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let registry = state.registry();
    let table = match request.table.resolve(&registry) {
        Ok(table) => table,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match calculate(&table, &request.input) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                table = %table.id(),
                tax_type = %result.tax_type,
                total_tax = %result.total_tax,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(
                StatusCode::OK,
                CalculationEnvelope::new(correlation_id, &table, result),
            )
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /vat-return endpoint.
async fn vat_return_handler(
    State(state): State<AppState>,
    payload: Result<Json<VatReturnRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing VAT return request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let registry = state.registry();
    let result = request
        .table
        .resolve(&registry)
        .and_then(|table| calculate_vat_return(&request.input, &table).map(|r| (table, r)));

    match result {
        Ok((table, vat_return)) => {
            info!(
                correlation_id = %correlation_id,
                table = %table.id(),
                net_vat_payable = %vat_return.net_vat_payable,
                "VAT return completed successfully"
            );
            json_response(
                StatusCode::OK,
                CalculationEnvelope::new(correlation_id, &table, vat_return),
            )
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /business-summary endpoint.
async fn business_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<BusinessSummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing business summary request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let registry = state.registry();
    let result = request
        .table
        .resolve(&registry)
        .and_then(|table| summarize_business(&request.input, &table).map(|s| (table, s)));

    match result {
        Ok((table, summary)) => {
            info!(
                correlation_id = %correlation_id,
                table = %table.id(),
                business_type = ?summary.business_type,
                total_tax = %summary.total_tax,
                "Business summary completed successfully"
            );
            json_response(
                StatusCode::OK,
                CalculationEnvelope::new(correlation_id, &table, summary),
            )
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /rate-tables endpoint.
async fn list_rate_tables_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, table_list(&state.registry()))
}

/// Handler for POST /rate-tables/reload endpoint.
///
/// Reloads the rates directory. A failed reload keeps the previous tables.
async fn reload_rate_tables_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.reload() {
        Ok(registry) => json_response(StatusCode::OK, table_list(&registry)),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                rates_dir = %state.rates_dir().display(),
                error = %err,
                "Rate table reload failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let loader = ConfigLoader::load("./config/rates").expect("Failed to load config");
        create_router(AppState::new(loader))
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let body = json!({
            "jurisdiction": "UK",
            "tax_year": "2024-25",
            "tax_type": "income_tax",
            "gross_income": "30000"
        });

        let (status, json) = send(create_test_router(), "POST", "/calculate", Some(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["currency"], "GBP");
        assert_eq!(json["result"]["tax_type"], "income_tax");
        assert!(json["calculation_id"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_jurisdiction_returns_400() {
        let body = json!({"tax_year": "2024-25", "tax_type": "vat", "amount": "100"});

        let (status, json) = send(create_test_router(), "POST", "/calculate", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_table_returns_404() {
        let body = json!({
            "jurisdiction": "FR",
            "tax_year": "2025",
            "tax_type": "vat",
            "amount": "100"
        });

        let (status, json) = send(create_test_router(), "POST", "/calculate", Some(body)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "RATE_TABLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_rate_tables() {
        let (status, json) = send(create_test_router(), "GET", "/rate-tables", None).await;

        assert_eq!(status, StatusCode::OK);
        let tables = json["tables"].as_array().unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0]["jurisdiction"], "NG");
        assert_eq!(tables[1]["jurisdiction"], "UK");
    }

    #[tokio::test]
    async fn test_reload_rate_tables() {
        let (status, json) = send(create_test_router(), "POST", "/rate-tables/reload", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tables"].as_array().unwrap().len(), 2);
    }
}
