use super::endpoint::SharedMiddleware;
use super::{Endpoint, Router};
use crate::{Handler, Method, Middleware};
use std::sync::Arc;

/// A description of a path in the router.
///
/// This is generated when you call [`crate::Router::at`], and it contains the
/// exact path passed to that function.  Here, you can specify the handlers to
/// run for each method at that path, and the middleware to run in front of
/// them.
///
/// Middleware added with [`Path::with`] apply to every method registered on
/// this `Path` _afterwards_.
///
/// # Examples
/// ```rust
/// # use turnstile::*;
/// let handler = || turnstile::handlers::simple(Response::empty_200);
/// let mut http = turnstile::http();
/// http.at("/users")
///     .get(handler())
///     .with(middleware::RequireHeader::new(http::header::AUTHORIZATION))
///     .post(handler())
///     .delete(handler());
/// ```
#[derive(Debug)]
pub struct Path<'a> {
    path: String,
    router: &'a mut Router,
    middleware: Vec<SharedMiddleware>,
}

macro_rules! method {
    ($($(#[$m:meta])* $v:vis fn $n:ident = $meth:expr;)+) => {
        $(
            $(#[$m])* $v fn $n<H: Handler>(&mut self, handler: H) -> &mut Self {
                self.method($meth, handler)
            }
        )+
    };
}

impl<'a> Path<'a> {
    pub(super) fn new(path: String, router: &'a mut Router) -> Self {
        Path {
            path,
            router,
            middleware: vec![],
        }
    }

    /// Appends route middleware for the methods registered after this call.
    pub fn with<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middleware.push(Arc::pin(middleware));
        self
    }

    /// Registers the handler for the given method at this path, behind the
    /// middleware added so far.
    pub fn method<H: Handler>(&mut self, method: Method, handler: H) -> &mut Self {
        let endpoint = Endpoint::from_parts(self.middleware.clone(), Box::pin(handler));
        self.router.register(method, self.path.clone(), endpoint);
        self
    }

    method![
        /// Registers a GET handler at this path.
        ///
        /// # Examples
        /// ```rust
        /// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
        /// let mut http = turnstile::http();
        /// let handler = turnstile::handlers::simple(turnstile::Response::empty_200);
        /// http.at("/user").get(handler);
        /// let response = http.handle(turnstile::Request::get("/user")?).await;
        /// assert_eq!(response.status(), http::StatusCode::OK);
        /// # Ok(())
        /// # }
        /// ```
        pub fn get = Method::Get;
        /// Registers a POST handler at this path.
        pub fn post = Method::Post;
        /// Registers a PUT handler at this path.
        pub fn put = Method::Put;
        /// Registers a PATCH handler at this path.
        pub fn patch = Method::Patch;
        /// Registers a DELETE handler at this path.
        pub fn delete = Method::Delete;
    ];
}
