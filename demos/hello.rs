//! Serves "Hello world!" with HSTS on `127.0.0.1:8080`.
//!
//! The server speaks plaintext HTTP, so it trusts `X-Forwarded-Proto: https` from a
//! TLS-terminating proxy in front of it:
//!
//! ```text
//! RUST_LOG=hsts=debug cargo run --example hello
//! curl -i -H 'X-Forwarded-Proto: https' http://127.0.0.1:8080/
//! ```

use std::{convert::Infallible, net::SocketAddr, time::Duration};

use hsts::{Config, Secure};
use hyper::{
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server,
};
use tower::ServiceExt;

async fn hello(_: Request<Body>) -> Result<Response<Body>, Infallible> {
    Ok(Response::new(Body::from("Hello world!")))
}

fn forwarded_https(request: &Request<Body>) -> bool {
    request
        .headers()
        .get("X-Forwarded-Proto")
        .and_then(|value| value.to_str().ok())
        .map_or(false, |proto| proto.eq_ignore_ascii_case("https"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hsts=debug".parse().unwrap()),
        )
        .init();

    let service = Config::new()
        .max_age(Duration::from_secs(2 * 31_536_000))
        .include_subdomains()
        .preload()
        .apply(service_fn(hello));

    let make_service = make_service_fn(move |_| {
        let service = service.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |mut request: Request<Body>| {
                if forwarded_https(&request) {
                    request.extensions_mut().insert(Secure);
                }
                service.clone().oneshot(request)
            }))
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    tracing::info!("Listening on http://{}", addr);
    if let Err(error) = Server::bind(&addr)
        .serve(make_service)
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to install ctrl-c shutdown signal: {}", error);
            }
        })
        .await
    {
        tracing::error!("Server error: {}", error);
    }
}
