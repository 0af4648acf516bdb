//! Endpoint configuration. Command-line flags win over environment variables.

use anyhow::Context as _;

pub const SHEET_URL_ENV: &str = "LIBINVENTORY_SHEET_URL";
pub const ORDER_URL_ENV: &str = "LIBINVENTORY_ORDER_URL";
pub const UPLOAD_URL_ENV: &str = "LIBINVENTORY_UPLOAD_URL";

/// Flag value, else the trimmed non-empty environment variable.
#[must_use]
pub fn flag_or_env(flag: Option<&str>, env_key: &str) -> Option<String> {
    flag.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            std::env::var(env_key)
                .ok()
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        })
}

pub fn required_endpoint(flag: Option<&str>, env_key: &str, flag_name: &str) -> anyhow::Result<String> {
    flag_or_env(flag, env_key)
        .with_context(|| format!("{flag_name} or {env_key} is required"))
}
