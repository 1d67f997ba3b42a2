use serde::Serialize;
use crate::models::display_config::DisplayConfig;
use crate::widget::markup::escape_html;

pub const SHORTCODE_TAG: &str = "google_reviews_widget";

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordpressExport {
    pub steps: Vec<String>,
    pub shortcode: String,
    pub php_code: String,
}

const INSTALL_STEPS: [&str; 6] = [
    "1. Create a new plugin in WordPress by adding a new directory in wp-content/plugins/",
    "2. Create a new file named google-reviews-widget.php and paste the PHP code provided above",
    "3. Create css and js directories in your plugin folder",
    "4. Add your custom CSS and JavaScript files",
    "5. Activate the plugin in WordPress admin panel",
    "6. Use the shortcode provided below to embed the widget in your posts or pages",
];

pub fn export(place_id: &str, config: &DisplayConfig) -> WordpressExport {
    let attributes = shortcode_attributes(place_id, config);

    WordpressExport {
        steps: INSTALL_STEPS.iter().map(|step| step.to_string()).collect(),
        shortcode: shortcode(&attributes),
        php_code: plugin_source(&attributes),
    }
}

/// Shortcode attributes in snake_case, in a stable order.
fn shortcode_attributes(place_id: &str, config: &DisplayConfig) -> Vec<(&'static str, PhpValue)> {
    vec![
        ("place_id", PhpValue::Str(place_id.to_string())),
        ("theme", PhpValue::Str(config.theme.to_string())),
        ("accent_color", PhpValue::Str(config.accent_color.to_string())),
        ("filter_rating", PhpValue::Int(i64::from(config.filter_rating))),
        ("sort_by_date", PhpValue::Bool(config.sort_by_date)),
        ("sort_direction", PhpValue::Str(config.sort_direction.to_string())),
        ("show_photos", PhpValue::Bool(config.show_photos)),
        ("compact_view", PhpValue::Bool(config.compact_view)),
        ("max_reviews", PhpValue::Int(config.max_reviews)),
        ("layout", PhpValue::Str(config.layout.to_string())),
        ("spacing", PhpValue::Int(i64::from(config.spacing))),
        ("card_width", PhpValue::Int(i64::from(config.card_width))),
        ("show_verified_badge", PhpValue::Bool(config.show_verified_badge)),
        ("animation_style", PhpValue::Str(config.animation_style.to_string())),
    ]
}

enum PhpValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl PhpValue {
    fn shortcode_text(&self) -> String {
        match self {
            PhpValue::Str(value) => escape_shortcode(value),
            PhpValue::Int(value) => value.to_string(),
            PhpValue::Bool(value) => value.to_string(),
        }
    }

    fn php_literal(&self) -> String {
        match self {
            PhpValue::Str(value) => format!("'{}'", escape_php_single_quoted(value)),
            PhpValue::Int(value) => value.to_string(),
            PhpValue::Bool(value) => value.to_string(),
        }
    }
}

/// Shortcode values sit in double quotes and must not open or close a shortcode.
fn escape_shortcode(raw: &str) -> String {
    escape_html(raw).replace('[', "&#91;").replace(']', "&#93;")
}

fn escape_php_single_quoted(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "\\'")
}

fn shortcode(attributes: &[(&'static str, PhpValue)]) -> String {
    let body: Vec<String> = attributes
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, value.shortcode_text()))
        .collect();
    format!("[{} {}]", SHORTCODE_TAG, body.join("\n    "))
}

fn plugin_source(attributes: &[(&'static str, PhpValue)]) -> String {
    let defaults: Vec<String> = attributes
        .iter()
        .map(|(name, value)| format!("        '{}' => {}", name, value.php_literal()))
        .collect();

    format!(
        r#"<?php
/*
Plugin Name: Google Reviews Widget
Description: Display Google Reviews with customizable layout
Version: 1.0
Author: Your Name
*/

function {tag}_shortcode($atts) {{
    $defaults = array(
{defaults}
    );

    $atts = shortcode_atts($defaults, $atts, '{tag}');

    wp_enqueue_style('google-reviews-widget-style', plugin_dir_url(__FILE__) . 'css/style.css');
    wp_enqueue_script('google-reviews-widget-script', plugin_dir_url(__FILE__) . 'js/widget.js', array('jquery'), '1.0', true);

    wp_localize_script('google-reviews-widget-script', 'googleReviewsWidgetSettings', $atts);

    return '<div id="google-reviews-widget" data-settings="' . esc_attr(json_encode($atts)) . '"></div>';
}}
add_shortcode('{tag}', '{tag}_shortcode');
?>"#,
        tag = SHORTCODE_TAG,
        defaults = defaults.join(",\n"),
    )
}
