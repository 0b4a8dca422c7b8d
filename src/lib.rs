pub mod app;
pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod price_source;
pub mod provider;
pub mod sink;
pub mod static_export;
pub mod synth;
pub mod universe;
