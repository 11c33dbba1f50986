//! Strict URL resolution for generated payloads

use thiserror::Error;

use super::entity::ApiPayload;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum UrlResolutionError {
    #[error("Missing path parameter")]
    MissingPath,

    #[error("Invalid server_base_url")]
    UnresolvableBaseUrl,
}

/// Whether `value` starts with an `http://` or `https://` scheme
pub fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Resolve the absolute URL a payload should be sent to
///
/// An absolute `path` wins; otherwise `server_base_url` is prepended verbatim.
/// Never guesses a scheme or host.
pub fn resolve_url(
    payload: &ApiPayload,
    server_base_url: Option<&str>,
) -> Result<String, UrlResolutionError> {
    let path = payload
        .path
        .as_deref()
        .ok_or(UrlResolutionError::MissingPath)?;

    if is_absolute_url(path) {
        return Ok(path.to_string());
    }

    match server_base_url {
        Some(base) if is_absolute_url(base) => Ok(format!("{}{}", base, path)),
        _ => Err(UrlResolutionError::UnresolvableBaseUrl),
    }
}
