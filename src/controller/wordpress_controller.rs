use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use crate::error::AppError;
use crate::helpers::params::required;
use crate::models::display_config::DisplayConfig;
use crate::widget::wordpress::{export, WordpressExport};

pub fn router() -> Router {
    Router::new().route("/export", get(export_plugin))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExportPluginParam {
    pub place_id: Option<String>,
    /// JSON-encoded display settings.
    pub settings: Option<String>,
}

/// Pure text templating; never calls the places API.
pub async fn export_plugin(
    Query(param): Query<ExportPluginParam>,
) -> Result<Json<WordpressExport>, AppError> {
    let place_id = required(param.place_id.as_deref(), "Place ID parameter is required")?;

    let config = match param.settings.as_deref().map(str::trim) {
        None | Some("") => DisplayConfig::default(),
        Some(settings) => serde_json::from_str::<DisplayConfig>(settings)
            .map_err(|e| AppError::Configuration(format!("Invalid settings parameter: {}", e)))?
            .sanitized(),
    };

    Ok(Json(export(place_id, &config)))
}
