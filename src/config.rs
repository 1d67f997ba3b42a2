use std::net::{IpAddr, SocketAddr};
use axum::http::HeaderValue;
use clap::Parser;
use tracing::warn;
use crate::gateway::google_places::DEFAULT_BASE_URL;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Google reviews widget backend")]
pub struct Config {
    /// `development` turns on debug logging by default.
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    /// Comma separated list of origins allowed to call the API.
    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    #[clap(env, long)]
    pub google_places_api_key: Option<String>,

    #[clap(env, long, default_value = DEFAULT_BASE_URL)]
    pub places_api_base_url: String,

    /// Public origin of this service, used in generated embed code.
    #[clap(env, long, default_value = "http://localhost:3000")]
    pub public_base_url: String,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.environment.eq_ignore_ascii_case("development") {
            "debug"
        } else {
            "info"
        }
    }

    pub fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.origin_urls
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid origin url {}: {}", origin, e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let config = Config::try_parse_from(["review-widget-backend"]).unwrap();
        assert_eq!(config.places_api_base_url, DEFAULT_BASE_URL);
        assert!(config.google_places_api_key.is_none() || std::env::var("GOOGLE_PLACES_API_KEY").is_ok());
    }

    #[test]
    fn splits_origin_list() {
        let config = Config::try_parse_from([
            "review-widget-backend",
            "--origin-urls",
            "https://a.example, https://b.example,,",
            "--environment",
            "production",
        ])
        .unwrap();
        assert_eq!(config.allowed_origins().len(), 2);
        assert_eq!(config.default_log_filter(), "info");
    }
}
