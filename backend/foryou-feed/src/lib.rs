pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::FeedPipeline;
