//! Dragnet - batch momentum scanner with concurrent enrichment and risk scoring

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
