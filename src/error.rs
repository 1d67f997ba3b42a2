use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use crate::gateway::GatewayError;

/// Shown instead of the generic failure when the provider has refused our key.
pub const ACCESS_DENIED_MESSAGE: &str =
    "The Google Places API key has been disabled. Please contact the administrator to resolve this issue.";

#[derive(Error, Debug)]
pub enum AppError {
    /// The caller left out or mangled a required parameter.
    #[error("{0}")]
    Configuration(String),

    #[error("Server configuration error")]
    MissingApiKey,

    /// The places provider failed. `context` is the message the caller sees;
    /// the source is only logged.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: GatewayError,
    },
}

impl AppError {
    pub fn upstream(context: &'static str) -> impl FnOnce(GatewayError) -> AppError {
        move |source| AppError::Upstream { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::BAD_REQUEST,
            AppError::MissingApiKey | AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show an end user; upstream details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upstream { source, .. } if source.is_access_denied() => {
                ACCESS_DENIED_MESSAGE.to_string()
            }
            AppError::Upstream { context, .. } => context.to_string(),
            other => other.to_string(),
        }
    }

    pub fn log(&self) {
        match self {
            AppError::Configuration(message) => warn!("Rejected request: {}", message),
            AppError::MissingApiKey => warn!("Google Places API key is missing"),
            AppError::Upstream { context, source } => {
                warn!("{} due to: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        (
            self.status_code(),
            Json(json!({ "error": self.user_message() })),
        ).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_client_errors() {
        let error = AppError::Configuration("Query parameter is required".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.user_message(), "Query parameter is required");
    }

    #[test]
    fn upstream_details_are_not_shown_to_users() {
        let error = AppError::upstream("Failed to fetch data from Google Places API")(GatewayError::Status(503));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.user_message(), "Failed to fetch data from Google Places API");
        assert!(error.to_string().contains("503"));
    }

    #[test]
    fn denied_keys_get_the_friendly_message() {
        let error = AppError::upstream("Failed to fetch data from Google Places API")(GatewayError::Api {
            status: "REQUEST_DENIED".to_string(),
            message: None,
        });
        assert_eq!(error.user_message(), ACCESS_DENIED_MESSAGE);
    }
}
