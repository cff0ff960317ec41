use thiserror::Error;
use url::Url;

pub const DEFAULT_LIMIT: u32 = 25;
pub const MAX_LIMIT: u32 = 50;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("limit must be between 1 and {MAX_LIMIT}, got {0}")]
    LimitOutOfRange(u32),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("malformed URL: {0}")]
    MalformedUrl(String),
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("URL must have a host")]
    MissingHost,
}

/// Normalized paging parameters for search and trending requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: u32,
    pub offset: u32,
}

pub fn validate_page(
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<PageParams, ValidationError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if limit < 1 || limit > MAX_LIMIT {
        return Err(ValidationError::LimitOutOfRange(limit));
    }

    Ok(PageParams {
        limit,
        offset: offset.unwrap_or(0),
    })
}

pub fn validate_search_term(term: &str) -> Result<&str, ValidationError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(term)
}

/// Checks that a provider-supplied media URL is a plausible http(s) URL.
///
/// The URL is stored verbatim; provider CDN links are sensitive to
/// query-string order, so no normalization is applied.
pub fn validate_media_url(url_str: &str) -> Result<(), ValidationError> {
    if url_str.is_empty() {
        return Err(ValidationError::MissingField("url"));
    }

    let url =
        Url::parse(url_str).map_err(|_| ValidationError::MalformedUrl(url_str.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(ValidationError::UnsupportedScheme(scheme.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingHost),
    }
}
