pub mod config;
pub mod cross_season;
pub mod demo_feed;
pub mod http_client;
pub mod loader;
pub mod model;
pub mod render;
pub mod selection;
pub mod snapshot_filter;
pub mod standings_fetch;
pub mod state;
pub mod time_series;
pub mod validate;
pub mod view_mode;
