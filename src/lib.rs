//! Turnstile is a small async HTTP router built around a middleware
//! pipeline.  Every request passes through the router's global middleware,
//! then through the middleware of the route it matched, and only then
//! reaches the route's handler.  Any middleware may stop the request on the
//! way, in which case the client is answered with a 403 (or with the
//! middleware's own response).
//!
//! Routes are matched on the exact method and path; there are no path
//! parameters or wildcards.  Requests that match no route are answered with
//! a 404 without running any middleware.
//!
//! # Examples
//! ```rust,no_run
//! use turnstile::{Request, Responder};
//!
//! async fn hello_world(_: Request, res: Responder) -> turnstile::Result {
//!     Ok(res.send("hello, world!")?)
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), anyhow::Error> {
//!     let mut http = turnstile::http();
//!     http.with(turnstile::middleware::TraceMiddleware::new());
//!     http.at("/").get(hello_world);
//!     http.listen_with("0.0.0.0:8080", |addr| println!("listening on {}", addr))
//!         .await?;
//!     Ok(())
//! }
//! ```
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(clippy::correctness, unused_must_use)]

#[macro_use]
extern crate async_trait;

pub mod config;
mod entity;
mod error;
mod handler;
pub mod handlers;
mod method;
pub mod middleware;
mod request;
mod responder;
mod response;
mod router;

pub use self::config::ServerConfig;
pub use self::entity::HttpEntity;
pub use self::error::TurnstileError;
pub use self::handler::Handler;
pub use self::method::{Method, UnroutableMethod};
pub use self::middleware::{IntoVerdict, Middleware, Verdict};
pub use self::request::Request;
pub use self::responder::{Json, Payload, Responder};
pub use self::response::{IntoResponse, Response};
pub use self::router::{Endpoint, EndpointBuilder, Listening, Path, Router, ToAddress};

pub use ::http;
pub use hyper::Body;

/// A type alias for [`std::result::Result`].
///
/// The most common use-case for this type is for handlers, which return this
/// type as a response for a request.
///
/// # Examples
/// ```rust
/// async fn handle(_: turnstile::Request, res: turnstile::Responder) -> turnstile::Result {
///     Ok(res.send("hello, world!")?)
/// }
///
/// let mut http = turnstile::http();
/// http.at("/").get(handle);
/// ```
pub type Result<R = Response, E = anyhow::Error> = std::result::Result<R, E>;

#[must_use]
#[inline]
/// This creates a new HTTP router.  This is a shortcut for [`Router::default`].
pub fn http() -> Router {
    Router::default()
}

#[must_use]
#[inline]
/// This starts building an endpoint with its own middleware.  This is a
/// shortcut for [`Endpoint::builder`].
pub fn endpoint() -> EndpointBuilder {
    Endpoint::builder()
}
