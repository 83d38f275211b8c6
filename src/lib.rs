pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

// Re-export main components for easier use
pub use config::Config;
pub use db::{DatabaseService, Stores};
pub use error::Error;
pub use services::Services;
