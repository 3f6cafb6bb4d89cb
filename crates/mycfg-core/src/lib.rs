//! # mycfg core
//!
//! A hierarchical key/value [`Store`] with dotted-path addressing, INI and
//! JSON codecs for it, and a [`Config`] facade that loads and saves a named
//! store to disk.
//!
//! ```no_run
//! use mycfg_core::Config;
//!
//! # fn main() -> mycfg_core::Result<()> {
//! let mut config = Config::load_sync("myapp", None, true)?;
//! config.set("server.port", "8080");
//! config.save_sync(None)?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod ini;
pub mod json;
pub mod storage;
pub mod store;
pub mod utils;
pub mod value;

pub use error::{Error, Result};
pub use storage::{Config, ConfigFormat, ConfigOptions, LocalStorageProvider, StorageProvider};
pub use store::Store;
pub use value::Value;
