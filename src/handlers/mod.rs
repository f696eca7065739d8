//! Pre-defined handlers.
//!
//! Async closures and functions taking a [`Request`] and a [`Responder`]
//! are handlers already; this module covers the synchronous cases:
//!
//! ```rust
//! # use turnstile::*;
//! let mut http = turnstile::http();
//! http.at("/home").get(turnstile::handlers::simple(|| {
//!     Response::text("hello, there!")
//! }));
//! ```

mod sync;

use self::sync::SyncHandler;
use crate::response::IntoResponse;
use crate::{Handler, Request, Responder};

/// Creates a handler that synchronously generates a response.
///
/// This does not spawn a blocking task; so any handler that uses this should
/// not block the task in its processing.
///
/// # Examples
///
/// ```rust
/// # use turnstile::*;
/// let mut http = turnstile::http();
/// http.at("/data").post(turnstile::handlers::sync(|_, res: &Responder| {
///     res.send(serde_json::json!({ "message": "Data received!" }))
/// }));
/// ```
pub fn sync<F, Res>(func: F) -> impl Handler
where
    F: Fn(Request, &Responder) -> Res + Send + Sync + 'static,
    Res: IntoResponse + Send + 'static,
{
    SyncHandler(func)
}

/// Creates a handler that synchronously, infallibly generates a response
/// regardless of the request.
///
/// # Examples
///
/// ```rust
/// # use turnstile::*;
/// let mut http = turnstile::http();
/// http.at("/gone").get(turnstile::handlers::simple(Response::empty_404));
/// ```
pub fn simple<F, Res>(func: F) -> impl Handler
where
    F: Fn() -> Res + Send + Sync + 'static,
    Res: IntoResponse + Send + 'static,
{
    sync::<_, Res>(move |_, _| func())
}
