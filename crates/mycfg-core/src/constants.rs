//! Shared constants

/// File name used when a config is saved or loaded without an explicit path
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Prefix of every generated config id
pub const ID_PREFIX: &str = "mycfg_";

/// Environment variable read by the `mycfg` binary for its log filter
pub const LOG_ENV_VAR: &str = "MYCFG_LOG";
