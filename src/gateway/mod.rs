//! Outbound access to the places provider.
//!
//! Handlers only see the [`PlacesGateway`] trait; [`google_places::GooglePlacesClient`]
//! is the production implementation.

use async_trait::async_trait;
use thiserror::Error;
use crate::models::place::{PlaceDetails, PlaceSummary};

pub mod dto;
pub mod google_places;

/// Upstream statuses and message fragments that mean the API key itself was refused.
const ACCESS_DENIED_MARKERS: [&str; 2] = ["REQUEST_DENIED", "disabled"];

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Network error talking to places API: {0}")]
    Network(String),

    #[error("Places API responded with HTTP status {0}")]
    Status(u16),

    #[error("Places API error: {}", api_reason(.status, .message))]
    Api {
        status: String,
        message: Option<String>,
    },

    #[error("Malformed places API response: {0}")]
    Parse(String),
}

fn api_reason<'a>(status: &'a str, message: &'a Option<String>) -> &'a str {
    message.as_deref().unwrap_or(status)
}

impl GatewayError {
    /// Whether the provider refused the API key, as opposed to a transient failure.
    pub fn is_access_denied(&self) -> bool {
        match self {
            GatewayError::Api { status, message } => ACCESS_DENIED_MARKERS.iter().any(|marker| {
                status.contains(marker)
                    || message.as_deref().map_or(false, |message| message.contains(marker))
            }),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            GatewayError::Status(status.as_u16())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}

#[async_trait]
pub trait PlacesGateway: Send + Sync {
    /// Free-text place search. An empty list is a valid answer, not an error.
    async fn text_search(&self, query: &str) -> Result<Vec<PlaceSummary>, GatewayError>;

    /// Place metadata plus its reviews.
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: &str, message: Option<&str>) -> GatewayError {
        GatewayError::Api {
            status: status.to_string(),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn detects_denied_keys() {
        assert!(api_error("REQUEST_DENIED", None).is_access_denied());
        assert!(api_error("OVER_QUERY_LIMIT", Some("This API project was disabled")).is_access_denied());
        assert!(!api_error("INVALID_REQUEST", None).is_access_denied());
        assert!(!GatewayError::Status(500).is_access_denied());
    }

    #[test]
    fn api_error_prefers_upstream_message() {
        assert_eq!(
            api_error("REQUEST_DENIED", Some("The provided API key is invalid.")).to_string(),
            "Places API error: The provided API key is invalid."
        );
        assert_eq!(api_error("UNKNOWN_ERROR", None).to_string(), "Places API error: UNKNOWN_ERROR");
    }
}
