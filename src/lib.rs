pub mod analytics;
pub mod api;
pub mod args;
pub mod commands;
mod config;
pub mod consolidate;
mod error;
pub mod model;
pub mod parse;
pub mod subscriptions;
mod utils;


pub use api::{Ledger, Mode, Sheet, Source};
pub use config::Config;
pub use error::{error_type, Error, ErrorType, Result};
