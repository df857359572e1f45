//! Deciding whether a response gets the `Strict-Transport-Security` header.

use crate::{
    errors::Result,
    header::{self, HeaderMap, HeaderValue, STRICT_TRANSPORT_SECURITY},
    Config, RequestContext,
};

/// The outcome of evaluating a [`Policy`] for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The request did not arrive over an encrypted transport.
    SkipInsecure,

    /// The request was for `localhost`, which is not enabled.
    SkipLocalhost,

    /// The header is sent with this value.
    Emit(HeaderValue),
}

impl Decision {
    /// Returns the header value, if the header is sent.
    pub fn value(&self) -> Option<&HeaderValue> {
        match self {
            Self::Emit(value) => Some(value),
            Self::SkipInsecure | Self::SkipLocalhost => None,
        }
    }

    /// Sets the header in `headers` if the header is sent.
    ///
    /// Any value already present for the header is replaced, so the header has exactly one value.
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Self::Emit(value) = self {
            headers.insert(STRICT_TRANSPORT_SECURITY, value.clone());
        }
    }
}

/// A [`Config`] prepared for per-request evaluation.
///
/// The header value is rendered once, when the policy is created.
///
/// # Example
///
/// ```
/// use hsts::{header::HeaderMap, Config, Decision, Policy, RequestContext};
///
/// let policy = Policy::try_new(&Config::new().include_subdomains()).unwrap();
///
/// let mut headers = HeaderMap::new();
/// policy.process(&RequestContext::new(true, "example.com"), &mut headers);
/// assert_eq!(
///     headers["strict-transport-security"],
///     "max-age=31536000; includeSubDomains"
/// );
///
/// let decision = policy.decide(&RequestContext::new(false, "example.com"));
/// assert_eq!(decision, Decision::SkipInsecure);
/// ```
#[derive(Clone, Debug)]
pub struct Policy {
    value: HeaderValue,
    enable_for_localhost: bool,
}

impl Policy {
    /// Creates a policy from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the header value could not be rendered.
    pub fn try_new(config: &Config) -> Result<Self> {
        config.check_preload();
        let value = header::value(config)?;
        tracing::trace!("Prepared HSTS policy: {}", header::display(&value));
        Ok(Self {
            value,
            enable_for_localhost: config.enable_for_localhost,
        })
    }

    /// Decides whether the header is sent for a request.
    ///
    /// Insecure requests are skipped first, then requests for `localhost` unless enabled.
    pub fn decide(&self, context: &RequestContext<'_>) -> Decision {
        if !context.is_secure {
            Decision::SkipInsecure
        } else if !self.enable_for_localhost && context.is_localhost() {
            Decision::SkipLocalhost
        } else {
            Decision::Emit(self.value.clone())
        }
    }

    /// Decides for a request, and sets the header in the response `headers` accordingly.
    pub fn process(&self, context: &RequestContext<'_>, headers: &mut HeaderMap) -> Decision {
        let decision = self.decide(context);
        decision.apply(headers);
        decision
    }

    /// Returns the rendered header value.
    pub fn header_value(&self) -> &HeaderValue {
        &self.value
    }
}
