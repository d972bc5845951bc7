//! HTTP API module for the Tax Engine.
//!
//! This module provides the REST API endpoints for running calculations,
//! VAT returns and business summaries against the loaded rate tables, and
//! for listing and reloading those tables.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BusinessSummaryRequest, CalculationRequest, TableSelector, VatReturnRequest};
pub use response::{
    ApiError, ApiErrorResponse, CalculationEnvelope, ENGINE_VERSION, RateTableList,
    RateTableSummary,
};
pub use state::AppState;
