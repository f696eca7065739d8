use crate::{Handler, Middleware};
use std::pin::Pin;
use std::sync::Arc;

pub(crate) type SharedMiddleware = Pin<Arc<dyn Middleware>>;

#[derive(Default, Debug)]
/// A builder for an [`Endpoint`].
///
/// This takes in all of the middleware that should operate before the
/// handler, in order.  It operates very similarly to [`crate::Router::with`],
/// except that the middleware only apply to the route the endpoint is
/// registered at, and always run _after_ the router's middleware.
pub struct EndpointBuilder(Vec<SharedMiddleware>);

impl EndpointBuilder {
    /// Appends middleware to the endpoint.
    pub fn with<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.0.push(Arc::pin(middleware));
        self
    }

    /// Completes the builder with the handler, generating an [`Endpoint`].
    ///
    /// This does leave the builder in a usable state afterwards, resetting it
    /// to the default state.
    pub fn then<H: Handler>(&mut self, handler: H) -> Endpoint {
        Endpoint {
            middleware: std::mem::take(&mut self.0),
            handler: Box::pin(handler),
        }
    }
}

/// What a route resolves to: the route's own middleware, in order, followed
/// by its handler.
///
/// # Examples
/// ```rust
/// # use turnstile::*;
/// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
/// let mut http = turnstile::http();
///
/// async fn endpoint(request: Request, _: Responder) -> Response {
///     let target = request.state::<String>().map(|v| v.as_str()).unwrap_or("world");
///     Response::text(format!("hello, {}", target))
/// }
///
/// http.register(Method::Get, "/foo", Endpoint::new(endpoint));
/// http.register(
///     Method::Get,
///     "/bar",
///     turnstile::endpoint()
///         .with(middleware::StateMiddleware::new("bar".to_string()))
///         .then(endpoint),
/// );
/// let mut response = http.handle(Request::get("/foo")?).await;
/// assert_eq!(response.text(512).await?, "hello, world");
/// let mut response = http.handle(Request::get("/bar")?).await;
/// assert_eq!(response.text(512).await?, "hello, bar");
/// # Ok(())
/// # }
/// ```
pub struct Endpoint {
    middleware: Vec<SharedMiddleware>,
    handler: Pin<Box<dyn Handler>>,
}

impl Endpoint {
    /// An endpoint with no middleware of its own.
    pub fn new<H: Handler>(handler: H) -> Self {
        Endpoint {
            middleware: vec![],
            handler: Box::pin(handler),
        }
    }

    /// Starts building an endpoint with middleware.  The same as
    /// [`crate::endpoint`].
    pub fn builder() -> EndpointBuilder {
        EndpointBuilder::default()
    }

    pub(crate) fn from_parts(
        middleware: Vec<SharedMiddleware>,
        handler: Pin<Box<dyn Handler>>,
    ) -> Self {
        Endpoint { middleware, handler }
    }

    pub(crate) fn middleware(
        &self,
    ) -> impl Iterator<Item = Pin<&(dyn Middleware + 'static)>> + Send + '_ {
        self.middleware.iter().map(Pin::as_ref)
    }

    pub(crate) fn handler(&self) -> Pin<&dyn Handler> {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("middleware", &self.middleware)
            .field("handler", &self.handler)
            .finish()
    }
}
