pub mod config;
pub mod error;
pub mod types;

pub use config::AcquireTuning;
pub use error::{Result, TideholdError};
