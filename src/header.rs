//! The `Strict-Transport-Security` header and its value.

use std::convert::TryFrom;

pub use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, HOST, STRICT_TRANSPORT_SECURITY,
};

use crate::{errors::Result, Config};

/// Renders the header value for a [`Config`].
///
/// Directives always appear in the order `max-age`, `includeSubDomains`, `preload`, and only
/// whole seconds of the max age are used.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use hsts::{header, Config};
///
/// let config = Config::new()
///     .max_age(Duration::from_secs(31_536_000))
///     .include_subdomains()
///     .preload();
///
/// assert_eq!(
///     header::render(&config),
///     "max-age=31536000; includeSubDomains; preload"
/// );
/// ```
pub fn render(config: &Config) -> String {
    let mut string = format!("max-age={}", config.max_age.as_secs());
    if config.include_subdomains {
        string.push_str("; includeSubDomains");
    }
    if config.preload {
        string.push_str("; preload");
    }
    string
}

/// Renders the header value for a [`Config`] as a [`HeaderValue`].
///
/// # Errors
///
/// Returns an error if the rendered value is not a valid header value.
pub fn value(config: &Config) -> Result<HeaderValue> {
    Ok(HeaderValue::try_from(render(config))?)
}

/// Strips the port from an authority-style host, leaving bracketed IPv6 literals intact.
pub(crate) fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}

/// Formats a header value for logging, falling back to its debug form.
pub(crate) fn display(value: &HeaderValue) -> String {
    value
        .to_str()
        .map(str::to_owned)
        .unwrap_or_else(|_| format!("{:?}", value))
}
