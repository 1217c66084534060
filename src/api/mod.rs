//! HTTP API module for the Statutory Calculation Engine.
//!
//! This module provides the JSON endpoints the presentation layer calls:
//! listing calculators, running a calculation, and rendering a report.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculateRequest, ReportRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
