use serde::{Deserialize, Serialize};
use crate::models::review::Review;

/// A business as identified by the places gateway.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Place {
    #[serde(rename = "place_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u64>,
}

/// Text search hit, projected down to the fields the widget needs.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PlaceDetails {
    #[serde(flatten)]
    pub place: Place,
    #[serde(default)]
    pub reviews: Vec<Review>,
}
