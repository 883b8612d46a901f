//! Source URL validation.
//!
//! A source URL must be absolute (`http` or `https` with a host) and contain
//! the configured source host marker somewhere in the string. The marker
//! check is a plain substring test: `https://elsewhere.test/?via=docs.google.com`
//! passes. Hardening it would reject URLs operators have already registered.

/// Error type for URL validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("not a {0} URL")]
    ForeignHost(String),
}

/// Validate a registered source URL.
///
/// Steps:
/// 1. Trim leading/trailing whitespace
/// 2. Parse as an absolute URL (no scheme defaulting)
/// 3. Require `http`/`https` and a host
/// 4. Require `source_host` as a substring of the input
pub fn validate_source_url(input: &str, source_host: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    if !trimmed.contains(source_host) {
        return Err(UrlError::ForeignHost(source_host.to_string()));
    }

    Ok(parsed)
}
