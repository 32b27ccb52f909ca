//! Post-load normalization and required-field checks.

use {
    secrecy::{ExposeSecret, Secret},
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    schema::{
        DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_PASSWORD, DEFAULT_DB_PORT,
        DEFAULT_DB_SSLMODE, DEFAULT_DB_USER, DEFAULT_DELETE_DELAY_SECS, UploaderConfig,
    },
};

/// Apply defaults, clean the gating-group list and check required fields.
pub fn finalize(mut cfg: UploaderConfig) -> Result<UploaderConfig> {
    apply_defaults(&mut cfg);
    cfg.sponsored_channels = clean_channels(&cfg.sponsored_channels);
    check_required(&cfg)?;
    Ok(cfg)
}

/// Zero or empty values are treated as unset.
fn apply_defaults(cfg: &mut UploaderConfig) {
    if cfg.delete_delay == 0 {
        cfg.delete_delay = DEFAULT_DELETE_DELAY_SECS;
    }
    if cfg.db_host.is_empty() {
        cfg.db_host = DEFAULT_DB_HOST.into();
    }
    if cfg.db_port == 0 {
        cfg.db_port = DEFAULT_DB_PORT;
    }
    if cfg.db_user.is_empty() {
        cfg.db_user = DEFAULT_DB_USER.into();
    }
    if cfg.db_password.expose_secret().is_empty() {
        cfg.db_password = Secret::new(DEFAULT_DB_PASSWORD.to_string());
    }
    if cfg.db_name.is_empty() {
        cfg.db_name = DEFAULT_DB_NAME.into();
    }
    if cfg.db_sslmode.is_empty() {
        cfg.db_sslmode = DEFAULT_DB_SSLMODE.into();
    }
}

/// Trim entries, drop blanks and duplicates, keep first-seen order.
pub fn clean_channels(channels: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(channels.len());
    for channel in channels {
        let channel = channel.trim();
        if channel.is_empty() {
            continue;
        }
        if cleaned.iter().any(|c| c == channel) {
            debug!(channel, "dropping duplicate sponsored channel");
            continue;
        }
        cleaned.push(channel.to_string());
    }
    cleaned
}

fn check_required(cfg: &UploaderConfig) -> Result<()> {
    let mut missing = Vec::new();
    if cfg.api_token.expose_secret().is_empty() {
        missing.push("api_token");
    }
    if cfg.bot_username.is_empty() {
        missing.push("bot_username");
    }
    if cfg.sponsored_channels.is_empty() {
        missing.push("sponsored_channels");
    }
    if cfg.admin_password.expose_secret().is_empty() {
        missing.push("admin_password");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingFields(missing))
    }
}
