#![forbid(unsafe_code)]

//! # HSTS
//!
//! Middleware that adds the
//! [`Strict-Transport-Security`](https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Strict-Transport-Security)
//! header to responses.
//!
//! For every request, the header is:
//!  - skipped if the request did not arrive over an encrypted transport,
//!  - skipped if the request is for `localhost`, unless
//!    [enabled](Config::enable_for_localhost),
//!  - otherwise set to a value computed from the [`Config`], such as
//!    `max-age=31536000; includeSubDomains; preload`.
//!
//! The request is always passed on to the next handler, whatever was decided.
//!
//! ## Usage
//!
//! A [`Config`] is turned into an [`HstsLayer`], which wraps any [`Service`](hyper::service::Service)
//! handling [`http::Request`]s:
//!
//! ```no_run
//! use std::{convert::Infallible, net::SocketAddr, time::Duration};
//!
//! use hyper::{service::service_fn, Body, Request, Response, Server};
//! use tower::make::Shared;
//!
//! # #[tokio::main] async fn main() -> hyper::Result<()> {
//! let next = service_fn(|_: Request<Body>| async {
//!     Ok::<_, Infallible>(Response::new(Body::from("Hello world!")))
//! });
//!
//! let service = hsts::Config::new()
//!     .max_age(Duration::from_secs(2 * 31_536_000))
//!     .include_subdomains()
//!     .apply(next);
//!
//! Server::bind(&SocketAddr::from(([127, 0, 0, 1], 3000)))
//!     .serve(Shared::new(service))
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Requests count as secure only when they carry the [`Secure`] extension, which a server
//! terminating TLS, or trusting the proxy that does, should insert. An `https` scheme in the
//! request URI is sent by the client and is not trusted.
//!
//! The decision itself is available without any pipeline through [`Policy`].

mod config;
mod decision;
pub mod diagnostics;
pub mod errors;
pub mod header;
mod request;
mod service;

pub use self::{
    config::Config,
    decision::{Decision, Policy},
    diagnostics::{Diagnostics, TracingDiagnostics},
    errors::{Error, Result},
    request::{RequestContext, Secure},
    service::{Builder, Hsts, HstsLayer, ResponseFuture},
};
