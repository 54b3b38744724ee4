use thiserror::Error;
use url::Url;

/// Errors that can occur while validating catalog or share URLs.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme the caller does not accept.
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
    /// An http(s) URL without a host.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a video source from the catalog.
///
/// Accepts `http`, `https` and `file` URLs; network URLs must carry a host.
///
/// ```
/// use reelfeed::util::validate_media_url;
///
/// assert!(validate_media_url("https://cdn.example.com/reel.mp4").is_ok());
/// assert!(validate_media_url("file:///home/me/clips/a.mp4").is_ok());
/// assert!(validate_media_url("ftp://example.com/a.mp4").is_err());
/// ```
pub fn validate_media_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => require_host(url),
        "file" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Validates the base URL that share links are built from.
///
/// Only `http`/`https` are accepted since the link leaves the machine. A
/// missing trailing slash is added so that joining an id appends a path
/// segment instead of replacing the last one.
pub fn validate_share_base(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    require_host(url)
}

fn require_host(url: Url) -> Result<Url, UrlValidationError> {
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}
