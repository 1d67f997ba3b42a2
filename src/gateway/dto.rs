//! Wire shapes of the Google Places web service responses.

use serde::Deserialize;
use crate::gateway::GatewayError;
use crate::models::place::{Place, PlaceDetails, PlaceSummary};
use crate::models::review::Review;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Deserialize, Debug)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Deserialize, Debug)]
pub struct SearchResult {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u64>,
}

#[derive(Deserialize, Debug)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<DetailsResult>,
}

#[derive(Deserialize, Debug)]
pub struct DetailsResult {
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl TextSearchResponse {
    pub fn into_places(self) -> Result<Vec<PlaceSummary>, GatewayError> {
        match self.status.as_str() {
            STATUS_OK => {}
            STATUS_ZERO_RESULTS => return Ok(Vec::new()),
            _ => {
                return Err(GatewayError::Api {
                    status: self.status,
                    message: self.error_message,
                })
            }
        }

        Ok(self
            .results
            .into_iter()
            .map(|result| PlaceSummary {
                place_id: result.place_id,
                name: result.name,
                formatted_address: result.formatted_address,
                rating: result.rating,
                user_ratings_total: result.user_ratings_total,
            })
            .collect())
    }
}

impl DetailsResponse {
    /// The details endpoint does not echo the id back, so the caller supplies it.
    pub fn into_details(self, place_id: &str) -> Result<PlaceDetails, GatewayError> {
        if self.status != STATUS_OK {
            return Err(GatewayError::Api {
                status: self.status,
                message: self.error_message,
            });
        }

        let result = self
            .result
            .ok_or_else(|| GatewayError::Parse("details response without a result".to_string()))?;

        Ok(PlaceDetails {
            place: Place {
                id: place_id.to_string(),
                name: result.name,
                formatted_address: result.formatted_address,
                rating: result.rating,
                user_ratings_total: result.user_ratings_total,
            },
            reviews: result.reviews,
        })
    }
}
