//! The parts of a request that the HSTS decision depends on.

use http::Request;

use crate::header::{self, HOST};

/// A request extension marking that the request arrived over an encrypted transport.
///
/// Servers that terminate TLS themselves, or sit behind a trusted TLS-terminating proxy, should
/// insert this into each request's extensions. It is the only source of the secure flag: the URI
/// scheme is chosen by the client and says nothing about the connection.
///
/// # Example
///
/// ```
/// use hsts::{RequestContext, Secure};
///
/// let mut request = http::Request::new(());
/// request.extensions_mut().insert(Secure);
///
/// assert!(RequestContext::from_request(&request).is_secure);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Secure;

/// Per-request input to the HSTS decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RequestContext<'a> {
    /// Whether the request arrived over an encrypted transport.
    pub is_secure: bool,

    /// The target host of the request, without a port.
    pub host: &'a str,
}

impl<'a> RequestContext<'a> {
    /// Creates a context from its parts.
    ///
    /// A port in `host` is stripped.
    pub fn new(is_secure: bool, host: &'a str) -> Self {
        Self {
            is_secure,
            host: header::strip_port(host),
        }
    }

    /// Reads the context from a request.
    ///
    /// The request is secure only if it carries the [`Secure`] extension. The host comes from the URI authority if present, and otherwise from the `Host` header. A
    /// missing or unreadable host is treated as empty.
    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        let is_secure = request.extensions().get::<Secure>().is_some();
        let host = match request.uri().host() {
            Some(host) => host,
            None => request
                .headers()
                .get(HOST)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default(),
        };
        Self::new(is_secure, host)
    }

    /// Returns whether the host is `localhost`, ignoring ASCII case.
    pub fn is_localhost(&self) -> bool {
        self.host.eq_ignore_ascii_case("localhost")
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestContext, Secure};
    use crate::test;

    #[test]
    fn https_uri_alone_is_insecure() {
        for uri in ["https://example.com/path", "HTTPS://example.com/"] {
            let request = test::get().uri(uri).into_request();
            let context = RequestContext::from_request(&request);
            assert!(!context.is_secure, "uri {}", uri);
            assert_eq!(context.host, "example.com");
        }
    }

    #[test]
    fn https_uri_with_marker_is_secure() {
        let request = test::get()
            .uri("https://example.com/path")
            .secure()
            .into_request();
        let context = RequestContext::from_request(&request);
        assert!(context.is_secure);
        assert_eq!(context.host, "example.com");
    }

    #[test]
    fn http_uri_is_insecure() {
        let request = test::get().uri("http://example.com:8080/").into_request();
        let context = RequestContext::from_request(&request);
        assert!(!context.is_secure);
        assert_eq!(context.host, "example.com");
    }

    #[test]
    fn origin_form_uses_host_header() {
        let request = test::get()
            .uri("/index.html")
            .header("Host", "LocalHost:8443")
            .secure()
            .into_request();
        let context = RequestContext::from_request(&request);
        assert!(context.is_secure);
        assert_eq!(context.host, "LocalHost");
        assert!(context.is_localhost());
    }

    #[test]
    fn missing_host_is_empty() {
        let request = test::get().uri("/").into_request();
        let context = RequestContext::from_request(&request);
        assert!(!context.is_secure);
        assert_eq!(context.host, "");
        assert!(!context.is_localhost());
    }

    #[test]
    fn marker_extension() {
        let mut request = http::Request::new(());
        request.extensions_mut().insert(Secure);
        assert!(RequestContext::from_request(&request).is_secure);
    }

    #[test]
    fn localhost_matching() {
        assert!(RequestContext::new(true, "localhost").is_localhost());
        assert!(RequestContext::new(true, "LOCALHOST").is_localhost());
        assert!(RequestContext::new(true, "localhost:443").is_localhost());
        assert!(!RequestContext::new(true, "localhost.example.com").is_localhost());
        assert!(!RequestContext::new(true, "127.0.0.1").is_localhost());
    }
}
