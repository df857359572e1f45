//! Reporting HSTS decisions.

use std::panic::{self, AssertUnwindSafe};

use crate::{header, Decision, RequestContext};

/// A sink that is told about every decision made for a request.
///
/// Reporting never affects the request: if an implementation panics, the panic is caught and the
/// request proceeds as decided.
pub trait Diagnostics: Send + Sync + 'static {
    /// Called once per request, before the request is forwarded.
    fn decision(&self, context: &RequestContext<'_>, decision: &Decision);
}

/// The default [`Diagnostics`], which emits [`tracing`] debug events.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn decision(&self, context: &RequestContext<'_>, decision: &Decision) {
        match decision {
            Decision::SkipInsecure => {
                tracing::debug!("HSTS header is not set because the scheme is not https")
            }
            Decision::SkipLocalhost => {
                tracing::debug!(host = context.host, "HSTS header is disabled for localhost")
            }
            Decision::Emit(value) => {
                tracing::debug!("Adding HSTS header: {}", header::display(value))
            }
        }
    }
}

impl<F> Diagnostics for F
where
    F: Fn(&RequestContext<'_>, &Decision) + Send + Sync + 'static,
{
    fn decision(&self, context: &RequestContext<'_>, decision: &Decision) {
        self(context, decision)
    }
}

/// Reports to `diagnostics`, containing any panic.
pub(crate) fn report(
    diagnostics: &dyn Diagnostics,
    context: &RequestContext<'_>,
    decision: &Decision,
) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        diagnostics.decision(context, decision);
    }));
    if result.is_err() {
        tracing::warn!("HSTS diagnostics panicked while reporting a decision");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::{report, Diagnostics, TracingDiagnostics};
    use crate::{Decision, RequestContext};

    #[test]
    fn closures_are_sinks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = {
            let calls = Arc::clone(&calls);
            move |_: &RequestContext<'_>, decision: &Decision| {
                assert_eq!(decision, &Decision::SkipInsecure);
                calls.fetch_add(1, Ordering::SeqCst);
            }
        };
        report(
            &sink,
            &RequestContext::new(false, "example.com"),
            &Decision::SkipInsecure,
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panics_are_contained() {
        let sink = |_: &RequestContext<'_>, _: &Decision| panic!("sink failure");
        report(
            &sink,
            &RequestContext::new(true, "localhost"),
            &Decision::SkipLocalhost,
        );
    }

    #[test]
    fn tracing_sink_accepts_every_decision() {
        let context = RequestContext::new(true, "example.com");
        let sink: &dyn Diagnostics = &TracingDiagnostics;
        sink.decision(&context, &Decision::SkipInsecure);
        sink.decision(&context, &Decision::SkipLocalhost);
        sink.decision(
            &context,
            &Decision::Emit(http::HeaderValue::from_static("max-age=0")),
        );
    }
}
