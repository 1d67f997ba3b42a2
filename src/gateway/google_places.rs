//! Google Places web service client.
//!
//! Text Search feeds the search proxy; Place Details supplies the reviews.
//! Google reports most failures with HTTP 200 and a non-`OK` `status` field, so
//! both the HTTP status and the body status are checked.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use crate::gateway::dto::{DetailsResponse, TextSearchResponse};
use crate::gateway::{GatewayError, PlacesGateway};
use crate::models::place::{PlaceDetails, PlaceSummary};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const DETAILS_FIELDS: &str = "name,rating,formatted_address,review,user_ratings_total";

pub struct GooglePlacesClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let url = format!("{}/{}/json", self.base_url, endpoint);
        debug!("Calling places API endpoint: {}", endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Places API endpoint {} responded with HTTP {}", endpoint, status);
            return Err(GatewayError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PlacesGateway for GooglePlacesClient {
    async fn text_search(&self, query: &str) -> Result<Vec<PlaceSummary>, GatewayError> {
        let response: TextSearchResponse = self.get_json("textsearch", &[("query", query)]).await?;
        debug!("Text search returned status {} with {} results", response.status, response.results.len());
        response.into_places()
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, GatewayError> {
        let response: DetailsResponse = self
            .get_json("details", &[("place_id", place_id), ("fields", DETAILS_FIELDS)])
            .await?;
        response.into_details(place_id)
    }
}
