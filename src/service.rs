//! Wiring the HSTS decision into a request pipeline.
//!
//! [`HstsLayer`] is a [`Layer`] that wraps the next handler in the pipeline with [`Hsts`]. Every
//! request is forwarded to the next handler exactly once and unchanged; the header is added to
//! the response that handler produces.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures_util::ready;
use http::{Request, Response};
use hyper::service::Service;
use pin_project_lite::pin_project;
use tower::Layer;

use crate::{
    diagnostics::{self, Diagnostics, TracingDiagnostics},
    errors::{Error, Result},
    header::{HeaderValue, STRICT_TRANSPORT_SECURITY},
    Config, Decision, Policy, RequestContext,
};

/// Builds a [`HstsLayer`], validating its collaborators.
///
/// # Example
///
/// ```
/// use hsts::{Config, HstsLayer};
///
/// let layer = HstsLayer::builder()
///     .config(Config::new().include_subdomains())
///     .diagnostics(|_: &hsts::RequestContext<'_>, decision: &hsts::Decision| {
///         println!("{:?}", decision);
///     })
///     .build()
///     .unwrap();
///
/// // A configuration is required.
/// assert!(HstsLayer::builder().build().is_err());
/// ```
#[must_use]
pub struct Builder {
    config: Option<Config>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Builder {
    /// Creates a builder with no configuration, reporting through [`TracingDiagnostics`].
    pub fn new() -> Self {
        Self {
            config: None,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the sink that is told about each decision.
    pub fn diagnostics(mut self, diagnostics: impl Diagnostics) -> Self {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    /// Builds the layer.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration was set, or if the header value could not be
    /// rendered.
    pub fn build(self) -> Result<HstsLayer> {
        let config = self.config.ok_or(Error::MissingConfig)?;
        let policy = Policy::try_new(&config)?;
        Ok(HstsLayer {
            policy: Arc::new(policy),
            diagnostics: self.diagnostics,
        })
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A [`Layer`] that adds the `Strict-Transport-Security` header to responses.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
///
/// use hsts::Config;
/// use hyper::{service::service_fn, Body, Request, Response};
/// use tower::Layer;
///
/// let next = service_fn(|_: Request<Body>| async {
///     Ok::<_, Infallible>(Response::new(Body::from("Hello world!")))
/// });
///
/// let service = Config::new().layer().layer(next);
/// ```
#[derive(Clone)]
pub struct HstsLayer {
    policy: Arc<Policy>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl HstsLayer {
    /// Creates a [`Builder`].
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Returns the prepared policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub(crate) fn wrap<S>(&self, inner: S) -> Hsts<S> {
        Hsts {
            inner,
            policy: Arc::clone(&self.policy),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}

impl<S> Layer<S> for HstsLayer {
    type Service = Hsts<S>;

    fn layer(&self, inner: S) -> Self::Service {
        self.wrap(inner)
    }
}

impl fmt::Debug for HstsLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HstsLayer")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// A [`Service`] that wraps the next handler `S` and adds the `Strict-Transport-Security` header
/// to its responses.
///
/// Created by [`HstsLayer`] or [`Config::apply`].
#[derive(Clone)]
pub struct Hsts<S> {
    inner: S,
    policy: Arc<Policy>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<S> Hsts<S> {
    /// Returns a reference to the next handler.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Returns the next handler.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B, R> Service<Request<B>> for Hsts<S>
where
    S: Service<Request<B>, Response = Response<R>>,
{
    type Response = Response<R>;

    type Error = S::Error;

    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let decision = {
            let context = RequestContext::from_request(&request);
            let decision = self.policy.decide(&context);
            diagnostics::report(&*self.diagnostics, &context, &decision);
            decision
        };
        ResponseFuture {
            future: self.inner.call(request),
            value: match decision {
                Decision::Emit(value) => Some(value),
                Decision::SkipInsecure | Decision::SkipLocalhost => None,
            },
        }
    }
}

impl<S> fmt::Debug for Hsts<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hsts")
            .field("inner", &self.inner)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

pin_project! {
    /// The [`Future`] returned by [`Hsts`], which sets the header on the next handler's response.
    #[derive(Debug)]
    pub struct ResponseFuture<F> {
        #[pin]
        future: F,
        value: Option<HeaderValue>,
    }
}

impl<F, R, E> Future for ResponseFuture<F>
where
    F: Future<Output = std::result::Result<Response<R>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let mut response = ready!(this.future.poll(cx))?;
        if let Some(value) = this.value.take() {
            response.headers_mut().insert(STRICT_TRANSPORT_SECURITY, value);
        }
        Poll::Ready(Ok(response))
    }
}
