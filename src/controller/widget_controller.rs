use axum::extract::Query;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use crate::controller::AppState;
use crate::error::AppError;
use crate::fetch::FetchState;
use crate::helpers::params::required;
use crate::models::display_config::{DisplayConfig, WidgetQuery};
use crate::models::place::PlaceDetails;
use crate::widget::embed::{generate, EmbedCode};
use crate::widget::markup::{html_document, static_snippet, Element, Node, WIDGET_STYLESHEET};
use crate::widget::render::render_state;

const WIDGET_BUNDLE: &str = include_str!("../../static/widget-bundle.js");
const PLACE_ID_REQUIRED: &str = "Place ID is required";

/// Routes used from the dashboard and the iframe page.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/embed", get(embed_page))
        .route("/widget/static", get(render_static_snippet))
        .route("/widget/embed-code", get(generate_embed_code))
        .route_layer(Extension(app_state))
}

/// Routes the script embed calls from arbitrary host pages.
pub fn public_router(app_state: AppState) -> Router {
    Router::new()
        .route("/widget/render", get(render_markup))
        .route("/widget-bundle.js", get(widget_bundle))
        .route("/widget.css", get(widget_stylesheet))
        .route_layer(Extension(app_state))
}

async fn fetch_details(app_state: &AppState, query: &WidgetQuery) -> Result<PlaceDetails, AppError> {
    let place_id = required(query.place_id(), PLACE_ID_REQUIRED)?;
    app_state
        .gateway()?
        .place_details(place_id)
        .await
        .map_err(AppError::upstream("Failed to load place details"))
}

/// Resolves the place behind a widget request into the state that gets rendered,
/// along with the status code that state should be served with.
async fn load_place(app_state: &AppState, query: &WidgetQuery) -> (StatusCode, FetchState<PlaceDetails>) {
    match fetch_details(app_state, query).await {
        Ok(details) => (StatusCode::OK, FetchState::Loaded(details)),
        Err(e) => {
            e.log();
            (e.status_code(), FetchState::failed(e.user_message()))
        }
    }
}

/// JSON endpoints report a failed fetch the same way every other handler does.
fn failure_response(status: StatusCode, reason: &str) -> Response {
    (status, Json(json!({ "error": reason }))).into_response()
}

/// Page behind the iframe embed.
pub async fn embed_page(
    Extension(app_state): Extension<AppState>,
    Query(query): Query<WidgetQuery>,
) -> impl IntoResponse {
    let config = query.display_config();
    let (status, state) = load_place(&app_state, &query).await;

    let title = match &state {
        FetchState::Loaded(details) => details.place.name.clone(),
        _ => "Google Reviews Widget".to_string(),
    };

    let body = if query.is_embed_only() {
        render_state(&state, &config)
    } else {
        page_chrome(&state, &config)
    };

    (status, Html(html_document(&title, &body)))
}

/// Header and footer around the widget for direct, non-iframe visits.
fn page_chrome(state: &FetchState<PlaceDetails>, config: &DisplayConfig) -> Node {
    let mut page = Element::new("div").class("grw-page");

    if let FetchState::Loaded(details) = state {
        let mut header = Element::new("div")
            .class("grw-page-header")
            .child(Element::new("h1").text(details.place.name.as_str()));
        if let Some(address) = &details.place.formatted_address {
            header = header.child(Element::new("p").text(address.as_str()));
        }
        page = page.child(header);
    }

    page.child(render_state(state, config))
        .child(
            Element::new("div")
                .class("grw-page-footer")
                .child(Element::new("p").text("This widget is embedded using the Google Reviews Widget tool.")),
        )
        .into()
}

#[derive(Serialize, Debug)]
pub struct MarkupResponse {
    pub markup: Node,
}

/// Markup tree for `widget-bundle.js` to turn into DOM nodes.
pub async fn render_markup(
    Extension(app_state): Extension<AppState>,
    Query(query): Query<WidgetQuery>,
) -> Response {
    let (status, state) = load_place(&app_state, &query).await;
    if let FetchState::Failed { reason } = &state {
        return failure_response(status, reason);
    }

    let markup = render_state(&state, &query.display_config());
    Json(MarkupResponse { markup }).into_response()
}

#[derive(Serialize, Debug)]
pub struct StaticSnippetResponse {
    pub snippet: String,
}

/// Self-decoding snippet for hosts that cannot call back to this service.
pub async fn render_static_snippet(
    Extension(app_state): Extension<AppState>,
    Query(query): Query<WidgetQuery>,
) -> Response {
    let (status, state) = load_place(&app_state, &query).await;
    if let FetchState::Failed { reason } = &state {
        return failure_response(status, reason);
    }

    let markup = render_state(&state, &query.display_config());
    let snippet = static_snippet(&markup, query.place_id().unwrap_or_default());
    Json(StaticSnippetResponse { snippet }).into_response()
}

pub async fn generate_embed_code(
    Extension(app_state): Extension<AppState>,
    Query(query): Query<WidgetQuery>,
) -> Result<Json<EmbedCode>, AppError> {
    let place_id = required(query.place_id(), PLACE_ID_REQUIRED)?;
    debug!("Generating embed code for place {}", place_id);
    Ok(Json(generate(&app_state.public_base_url, place_id, &query.display_config())))
}

async fn widget_bundle() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "application/javascript; charset=utf-8"), (CACHE_CONTROL, "public, max-age=3600")],
        WIDGET_BUNDLE,
    )
}

async fn widget_stylesheet() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/css; charset=utf-8"), (CACHE_CONTROL, "public, max-age=3600")],
        WIDGET_STYLESHEET,
    )
}
