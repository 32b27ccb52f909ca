//! Configuration loading, validation, persistence, and the live config store.
//!
//! Config files: `config.yaml` by default (`.yaml`, `.yml`, `.toml` and
//! `.json` are all accepted). The path can be overridden with `CONFIG_PATH`.

pub mod error;
pub mod loader;
pub mod schema;
pub mod store;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, load_config, save_config},
    schema::{DATABASE_URL_ENV, MessagesConfig, UploaderConfig},
    store::{ConfigStore, UpdateOutcome},
};
