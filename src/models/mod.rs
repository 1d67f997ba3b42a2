pub mod display_config;
pub mod place;
pub mod review;
