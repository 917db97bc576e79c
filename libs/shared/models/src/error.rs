use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Body returned by the fault-injection branch. Clients cannot tell it apart
/// from a real backend failure.
pub const SIMULATED_FAILURE_MESSAGE: &str = "transient error retrieving schedule";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", SIMULATED_FAILURE_MESSAGE)]
    SimulatedFailure,

    #[error("Not found")]
    NotFound,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SimulatedFailure => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::SimulatedFailure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_simulated_failure_message() {
        assert_eq!(
            AppError::SimulatedFailure.to_string(),
            "transient error retrieving schedule"
        );
        let response = AppError::SimulatedFailure.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
