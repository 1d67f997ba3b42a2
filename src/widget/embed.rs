use serde::Serialize;
use serde_json::{Map, Value};
use crate::fetch::FetchState;
use crate::models::display_config::DisplayConfig;
use crate::widget::markup::{escape_html, to_html};
use crate::widget::render::render_state;

/// Container the script embed mounts into.
pub const SCRIPT_CONTAINER_ID: &str = "google-reviews-widget";
/// Global function exposed by `widget-bundle.js`.
pub const INIT_FUNCTION: &str = "initGoogleReviewsWidget";

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct EmbedCode {
    pub iframe: String,
    pub script: String,
}

/// Builds both embed flavours for a place. The caller guarantees `place_id` is present.
pub fn generate(base_url: &str, place_id: &str, config: &DisplayConfig) -> EmbedCode {
    let base_url = base_url.trim_end_matches('/');
    EmbedCode {
        iframe: iframe_tag(base_url, place_id, config),
        script: script_tag(base_url, place_id, config),
    }
}

/// `{base}/embed?placeId=...&theme=...`, every value URL-encoded.
pub fn embed_url(base_url: &str, place_id: &str, config: &DisplayConfig) -> String {
    let mut query = format!("placeId={}", urlencoding::encode(place_id));
    for (name, value) in config.to_query_pairs() {
        query.push('&');
        query.push_str(name);
        query.push('=');
        query.push_str(&urlencoding::encode(&value));
    }
    format!("{}/embed?{}", base_url, query)
}

fn iframe_tag(base_url: &str, place_id: &str, config: &DisplayConfig) -> String {
    format!(
        "<iframe\n  src=\"{}\"\n  width=\"100%\"\n  height=\"600\"\n  frameborder=\"0\"\n  title=\"Google Reviews Widget\">\n</iframe>",
        escape_html(&embed_url(base_url, place_id, config))
    )
}

fn script_tag(base_url: &str, place_id: &str, config: &DisplayConfig) -> String {
    let loading = to_html(&render_state(&FetchState::Loading, config));

    // The container precedes both scripts so the inline init call can find it
    // while the host page is still being parsed.
    format!(
        "<div id=\"{container}\">{loading}</div>\n<script src=\"{bundle}\"></script>\n<script>\n  window.{init}({options});\n</script>",
        bundle = escape_html(&format!("{}/widget-bundle.js", base_url)),
        init = INIT_FUNCTION,
        options = init_options(base_url, place_id, config),
        container = SCRIPT_CONTAINER_ID,
        loading = loading,
    )
}

/// Inline object literal for the init call, safe to place inside a `<script>` block.
fn init_options(base_url: &str, place_id: &str, config: &DisplayConfig) -> String {
    let mut options = Map::new();
    options.insert("containerId".to_string(), Value::from(SCRIPT_CONTAINER_ID));
    options.insert("placeId".to_string(), Value::from(place_id));
    options.insert("apiUrl".to_string(), Value::from(base_url));
    if let Ok(Value::Object(settings)) = serde_json::to_value(config) {
        options.extend(settings);
    }

    let json = serde_json::to_string_pretty(&Value::Object(options)).unwrap_or_else(|_| "{}".to_string());
    // `<` only ever appears inside JSON strings, where < is equivalent.
    json.replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace('\n', "\n  ")
}
