use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::controller::AppState;
use crate::error::AppError;
use crate::helpers::params::required;
use crate::models::place::{PlaceDetails, PlaceSummary};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/search", get(search_places))
        .route("/details", get(retrieve_place_details))
        .route("/lookup", get(lookup_place))
        .route_layer(Extension(app_state))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchPlacesParam {
    pub query: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchPlacesResponse {
    pub places: Vec<PlaceSummary>,
}

pub async fn search_places(
    Extension(app_state): Extension<AppState>,
    Query(param): Query<SearchPlacesParam>,
) -> Result<Json<SearchPlacesResponse>, AppError> {
    let query = required(param.query.as_deref(), "Query parameter is required")?;

    let places = app_state
        .gateway()?
        .text_search(query)
        .await
        .map_err(AppError::upstream("Failed to fetch data from Google Places API"))?;

    info!("Search for {:?} matched {} places", query, places.len());
    Ok(Json(SearchPlacesResponse { places }))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailsParam {
    pub place_id: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlaceDetailsResponse {
    pub place: PlaceDetails,
}

pub async fn retrieve_place_details(
    Extension(app_state): Extension<AppState>,
    Query(param): Query<PlaceDetailsParam>,
) -> Result<Json<PlaceDetailsResponse>, AppError> {
    let place_id = required(param.place_id.as_deref(), "Place ID parameter is required")?;

    let place = app_state
        .gateway()?
        .place_details(place_id)
        .await
        .map_err(AppError::upstream("Failed to fetch place details from Google Places API"))?;

    Ok(Json(PlaceDetailsResponse { place }))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct LookupPlaceResponse {
    /// `None` when the search had no hits.
    pub place: Option<PlaceDetails>,
}

/// Search, then fetch details for the best match.
pub async fn lookup_place(
    Extension(app_state): Extension<AppState>,
    Query(param): Query<SearchPlacesParam>,
) -> Result<Json<LookupPlaceResponse>, AppError> {
    let query = required(param.query.as_deref(), "Query parameter is required")?;
    let gateway = app_state.gateway()?;

    let places = gateway
        .text_search(query)
        .await
        .map_err(AppError::upstream("Failed to fetch data from Google Places API"))?;

    let Some(best_match) = places.first() else {
        info!("No places found for {:?}", query);
        return Ok(Json(LookupPlaceResponse { place: None }));
    };

    let place = gateway
        .place_details(&best_match.place_id)
        .await
        .map_err(AppError::upstream("Failed to fetch place details from Google Places API"))?;

    Ok(Json(LookupPlaceResponse { place: Some(place) }))
}
