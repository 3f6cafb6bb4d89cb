pub mod config;
pub mod error;
pub mod local;
pub mod provider;

pub use config::{Config, ConfigFormat, ConfigOptions};
pub use error::StorageSystemError;
pub use local::LocalStorageProvider;
pub use provider::StorageProvider;

#[cfg(test)]
mod tests;
