//! Backend for an embeddable Google reviews widget.
//!
//! Proxies place search and details from Google Places, selects and renders
//! reviews according to a [`models::display_config::DisplayConfig`], and
//! generates iframe, script-tag and WordPress embed code.

pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod helpers;
pub mod models;
pub mod widget;
