use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use kernel::prelude::entity::{OrderStatus, UnmetRequirement};
use kernel::{KernelError, StatusMismatch};
use serde::Serialize;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_statuses: Option<Vec<OrderStatus>>,
}

impl ErrorStatus {
    fn status_code(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::InvalidOrderStatus
            | KernelError::ShipRequirementsNotMet
            | KernelError::InvalidInput => StatusCode::BAD_REQUEST,
            KernelError::DuplicateOffer | KernelError::Conflict => StatusCode::CONFLICT,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let mismatch = self.0.downcast_ref::<StatusMismatch>();
        let detail = match (mismatch, self.0.downcast_ref::<UnmetRequirement>()) {
            (Some(mismatch), _) => Some(mismatch.to_string()),
            (None, Some(unmet)) => Some(unmet.to_string()),
            (None, None) => None,
        };
        ErrorBody {
            error: self.0.current_context().to_string(),
            detail,
            current_status: mismatch.map(|mismatch| mismatch.current),
            required_statuses: mismatch.map(|mismatch| mismatch.required.clone()),
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        (status, axum::Json(self.body())).into_response()
    }
}
