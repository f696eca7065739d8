//! Middleware, and a few pre-defined ones.
//!
//! A middleware runs before the handler of a route, and decides whether the
//! request may continue.  Middleware registered on the router (with
//! [`crate::Router::with`]) run for every routed request, in registration
//! order; middleware registered on a route run after those, again in
//! registration order.  Their use should be as simple as this:
//!
//! ```rust
//! # use turnstile::*;
//! let mut http = turnstile::http();
//! http.with(turnstile::middleware::TraceMiddleware::new());
//! http.at("/echo")
//!     .with(turnstile::middleware::RequireHeader::new(http::header::AUTHORIZATION))
//!     .post(|request: Request, res: Responder| async move {
//!         res.send(request.path())
//!     });
//! ```

mod require_header;
mod state;
mod sync;
mod trace;
pub use self::require_header::RequireHeader;
pub use self::state::{State, StateMiddleware};
pub(crate) use self::trace::TraceStart;
pub use self::trace::TraceMiddleware;
use crate::{Request, Responder, Response};
use std::fmt::Debug;
use std::pin::Pin;

#[derive(Debug)]
#[must_use]
/// The decision of a middleware.
pub enum Verdict {
    /// Hand the request to the next middleware, or the handler.
    Continue,
    /// Stop the pipeline; the router answers with a generic 403.
    Halt,
    /// Stop the pipeline, answering with this response instead of the
    /// generic 403.
    Respond(Response),
}

impl Verdict {
    /// Whether the pipeline may continue past this verdict.
    pub fn is_continue(&self) -> bool {
        matches!(self, Verdict::Continue)
    }
}

#[async_trait]
/// A pre-handler hook that may inspect or modify the request, and can veto
/// the rest of the pipeline.
///
/// Middleware run strictly one after another; each is awaited before the
/// next one starts.  A middleware that halts prevents every later
/// middleware, and the handler, from running.  Errors returned here are
/// treated like handler errors: logged, and answered with an empty 500.
pub trait Middleware: Debug + Send + Sync + 'static {
    #[must_use]
    /// Inspects the request.  The request may be modified in place; the
    /// responder can be used to build a rejection response.
    async fn apply(
        self: Pin<&Self>,
        request: &mut Request,
        response: &Responder,
    ) -> Result<Verdict, anyhow::Error>;
}

/// Converts the current type into a [`Verdict`].
///
/// `true` and `()` continue, `false` halts, and a [`Response`] halts with
/// that response.  Results are accepted so that middleware can use `?`.
pub trait IntoVerdict {
    /// Converts the current type into a verdict.
    ///
    /// # Errors
    /// Whatever error the implementing type carries.
    fn into_verdict(self) -> Result<Verdict, anyhow::Error>;
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Result<Verdict, anyhow::Error> {
        Ok(self)
    }
}

impl IntoVerdict for bool {
    fn into_verdict(self) -> Result<Verdict, anyhow::Error> {
        Ok(if self { Verdict::Continue } else { Verdict::Halt })
    }
}

impl IntoVerdict for () {
    fn into_verdict(self) -> Result<Verdict, anyhow::Error> {
        Ok(Verdict::Continue)
    }
}

impl IntoVerdict for Response {
    fn into_verdict(self) -> Result<Verdict, anyhow::Error> {
        Ok(Verdict::Respond(self))
    }
}

impl IntoVerdict for Option<Response> {
    fn into_verdict(self) -> Result<Verdict, anyhow::Error> {
        Ok(self.map_or(Verdict::Continue, Verdict::Respond))
    }
}

impl<V, E> IntoVerdict for Result<V, E>
where
    V: IntoVerdict,
    E: Into<anyhow::Error>,
{
    fn into_verdict(self) -> Result<Verdict, anyhow::Error> {
        self.map_err(Into::into).and_then(IntoVerdict::into_verdict)
    }
}

/// Creates a middleware from a synchronous function.
///
/// # Examples
/// ```rust
/// # use turnstile::*;
/// let mut http = turnstile::http();
/// http.with(turnstile::middleware::sync(|request: &mut Request, _: &Responder| {
///     request.header("x-api-key").is_some()
/// }));
/// ```
pub fn sync<F, V>(func: F) -> impl Middleware
where
    F: Fn(&mut Request, &Responder) -> V + Send + Sync + 'static,
    V: IntoVerdict + Send + 'static,
{
    self::sync::SyncMiddleware(func)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_verdicts() {
        assert!(true.into_verdict().unwrap().is_continue());
        assert!(matches!(false.into_verdict().unwrap(), Verdict::Halt));
        assert!(().into_verdict().unwrap().is_continue());
    }

    #[test]
    fn test_response_verdicts() {
        let verdict = Response::empty_404().into_verdict().unwrap();
        assert!(matches!(verdict, Verdict::Respond(r) if r.status() == http::StatusCode::NOT_FOUND));
        assert!(None::<Response>.into_verdict().unwrap().is_continue());
    }

    #[test]
    fn test_error_verdict() {
        let result: Result<bool, std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(result.into_verdict().is_err());
    }
}
