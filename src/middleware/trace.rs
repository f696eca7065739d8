use std::pin::Pin;

use super::{Middleware, Verdict};
use crate::{Request, Responder};

#[derive(Default, Debug, Clone)]
/// A middleware for tracing HTTP requests.
///
/// This logs (using `log`) each request as it enters the pipeline, and
/// marks the request so that the router logs its completion (with the
/// response status and how long the request took) as well.  The log level
/// is `info`.
pub struct TraceMiddleware {
    _v: (),
}

#[derive(Debug, Copy, Clone)]
/// Inserted into traced requests; the instant the request was seen.
pub(crate) struct TraceStart(pub(crate) std::time::Instant);

impl TraceMiddleware {
    #[must_use]
    /// Creates a new trace middleware.  This is provided as an alternative
    /// to `Default`.
    pub fn new() -> Self {
        TraceMiddleware::default()
    }
}

#[async_trait]
impl Middleware for TraceMiddleware {
    async fn apply(
        self: Pin<&Self>,
        request: &mut Request,
        _: &Responder,
    ) -> Result<Verdict, anyhow::Error> {
        log::info!("--> {} {}", request.method(), request.path());
        request.set_ext(TraceStart(std::time::Instant::now()));
        Ok(Verdict::Continue)
    }
}
