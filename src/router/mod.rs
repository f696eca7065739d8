mod endpoint;
mod path;
mod service;
mod table;

pub use self::endpoint::{Endpoint, EndpointBuilder};
pub use self::path::Path;
pub(crate) use self::service::PeerAddress;
pub use self::service::{Listening, ToAddress};
use self::table::{Route, RouteTable};
use crate::middleware::{Middleware, TraceStart, Verdict};
use crate::{Method, Request, Responder, Response};
use futures::FutureExt;
use std::convert::TryFrom;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

/// An HTTP router.
///
/// This contains the route table, which maps a method and an exact path to
/// an [`Endpoint`], and the global middleware list.  The router is built up
/// front, and then either moved into a server with [`Router::listen`], or
/// used directly with [`Router::handle`] (which is what the server does for
/// every request).
///
/// # Dispatch
///
/// For every request, the router:
///
/// 1. looks up the route for the request's method and path, answering
///    `404 Not Found` if there is none (no middleware run in that case);
/// 2. runs every global middleware, in the order they were added, stopping
///    with `403 Global middleware terminated the request` if one halts;
/// 3. runs every middleware of the route, in order, stopping with
///    `403 Route middleware terminated the request` if one halts;
/// 4. runs the handler of the route, whose response is the response.
///
/// A middleware can also halt with its own response, which is then used
/// instead of the generic 403.  Errors (and panics) from middleware or
/// handlers are logged, and answered with an empty 500.
///
/// # Examples
/// ```rust
/// # use turnstile::*;
/// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
/// let mut http = turnstile::http();
/// http.at("/").get(|_: Request, res: Responder| async move {
///     res.send(serde_json::json!({ "message": "Welcome" }))
/// });
/// let mut response = http.handle(Request::get("/missing")?).await;
/// assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
/// assert_eq!(response.text(512).await?, "Not Found");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Router {
    routes: RouteTable,
    middleware: Vec<Pin<Box<dyn Middleware>>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Stage {
    Global,
    Route,
}

impl Stage {
    fn rejection(self) -> &'static str {
        match self {
            Stage::Global => "Global middleware terminated the request",
            Stage::Route => "Route middleware terminated the request",
        }
    }
}

impl Router {
    /// Creates a [`Path`] at the provided path, for registering handlers
    /// with the method shortcuts.
    pub fn at<P: Into<String>>(&mut self, path: P) -> Path<'_> {
        Path::new(path.into(), self)
    }

    /// Registers the endpoint for the given method and path.  A previous
    /// registration for the same method and path is replaced.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let mut http = turnstile::http();
    /// http.register(
    ///     Method::Post,
    ///     "/data",
    ///     Endpoint::new(handlers::simple(Response::empty_200)),
    /// );
    /// ```
    pub fn register<P: Into<String>>(
        &mut self,
        method: Method,
        path: P,
        endpoint: Endpoint,
    ) -> &mut Self {
        let path = path.into();
        if !path.starts_with('/') {
            log::warn!("route {} {:?} does not start with '/', so it never matches", method, path);
        }

        let previous = self.routes.insert(Route {
            method,
            path,
            endpoint,
        });
        if let Some(previous) = previous {
            log::debug!("route {} {} replaced", previous.method, previous.path);
        }
        self
    }

    /// Appends global middleware to the router.  Each middleware is executed
    /// in the order that it is appended to the router (i.e., the first
    /// middleware inserted executes first), before any route middleware.
    ///
    /// # Examples
    /// ```rust
    /// let mut http = turnstile::http();
    /// http.with(turnstile::middleware::TraceMiddleware::new())
    ///     .with(turnstile::middleware::StateMiddleware::new(123u32));
    /// ```
    pub fn with<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middleware.push(Box::pin(middleware));
        self
    }

    pub(crate) fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        self.routes.iter()
    }

    pub(crate) fn lookup(&self, method: &http::Method, path: &str) -> Option<&Route> {
        let method = Method::try_from(method).ok()?;
        self.routes.lookup(method, path)
    }

    /// Dispatches one request through the router, producing its response.
    ///
    /// This never fails: unrouted requests, rejections, and failures inside
    /// middleware or handlers all become responses.
    pub async fn handle(&self, request: Request) -> Response {
        let method = request.method().clone();
        let path = request.path().to_owned();

        let route = match self.lookup(&method, &path) {
            Some(route) => route,
            None => {
                log::trace!("{} {} --> (no route)", method, path);
                return not_found();
            }
        };
        log::trace!("{} {} --> {:?}", method, path, route);

        let responder = Responder::new(route.method, &path);
        let mut traced = None;
        let result = AssertUnwindSafe(self.run(route, request, responder, &mut traced))
            .catch_unwind()
            .await;

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                log::error!("{} {}: {}", method, path, error);
                log::trace!("{} {}: {:?}", method, path, error);
                Response::empty_500()
            }
            Err(panic) => {
                log::error!("{} {}: panicked: {}", method, path, panic_message(&*panic));
                Response::empty_500()
            }
        };

        if let Some(TraceStart(start)) = traced {
            log::info!(
                "<-- {} {}: {} (in {}ms)",
                method,
                path,
                response.status(),
                start.elapsed().as_millis()
            );
        }

        response
    }

    fn global(&self) -> impl Iterator<Item = Pin<&(dyn Middleware + 'static)>> + Send + '_ {
        self.middleware.iter().map(Pin::as_ref)
    }

    async fn run(
        &self,
        route: &Route,
        mut request: Request,
        responder: Responder,
        traced: &mut Option<TraceStart>,
    ) -> Result<Response, anyhow::Error> {
        let global = self.global();
        let rejection = gate(Stage::Global, global, &mut request, &responder, traced).await?;
        if let Some(rejection) = rejection {
            return Ok(rejection);
        }

        let local = route.endpoint.middleware();
        let rejection = gate(Stage::Route, local, &mut request, &responder, traced).await?;
        if let Some(rejection) = rejection {
            return Ok(rejection);
        }

        route.endpoint.handler().apply(request, responder).await
    }
}

/// Runs the middleware of one stage in order, returning the response to
/// answer with if one of them halted.
///
/// `traced` is refreshed after every middleware, so that a request marked
/// by [`crate::middleware::TraceMiddleware`] is logged on completion even if
/// a later middleware fails.
async fn gate<'m, I>(
    stage: Stage,
    chain: I,
    request: &mut Request,
    responder: &Responder,
    traced: &mut Option<TraceStart>,
) -> Result<Option<Response>, anyhow::Error>
where
    I: Iterator<Item = Pin<&'m (dyn Middleware + 'static)>> + Send,
{
    for middleware in chain {
        let verdict = middleware.apply(request, responder).await;
        *traced = request.ext::<TraceStart>().copied();
        match verdict? {
            Verdict::Continue => {}
            Verdict::Halt => {
                log::debug!("{} {}: halted by {:?}", responder.method(), responder.path(), middleware);
                return Ok(Some(forbidden(stage)));
            }
            Verdict::Respond(response) => {
                log::debug!(
                    "{} {}: answered by {:?} ({})",
                    responder.method(),
                    responder.path(),
                    middleware,
                    response.status()
                );
                return Ok(Some(response));
            }
        }
    }

    Ok(None)
}

fn not_found() -> Response {
    Response::text("Not Found").with_status(http::StatusCode::NOT_FOUND)
}

fn forbidden(stage: Stage) -> Response {
    Response::text(stage.rejection()).with_status(http::StatusCode::FORBIDDEN)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("(unknown)")
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("middleware", &self.middleware)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::middleware::IntoVerdict;
    use crate::HttpEntity;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<&'static str>>>;

    #[derive(Debug)]
    struct Recorder {
        name: &'static str,
        log: Log,
        pass: bool,
    }

    #[async_trait]
    impl Middleware for Recorder {
        async fn apply(
            self: Pin<&Self>,
            _: &mut Request,
            _: &Responder,
        ) -> Result<Verdict, anyhow::Error> {
            // yield, so that ordering does not rely on running synchronously
            tokio::task::yield_now().await;
            self.log.lock().unwrap().push(self.name);
            self.pass.into_verdict()
        }
    }

    fn recorder(name: &'static str, log: &Log, pass: bool) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
            pass,
        }
    }

    fn recording_router(
        log: &Log,
        global: &[(&'static str, bool)],
        local: &[(&'static str, bool)],
    ) -> Router {
        let mut router = Router::default();
        for &(name, pass) in global {
            router.with(recorder(name, log, pass));
        }
        let mut builder = Endpoint::builder();
        for &(name, pass) in local {
            builder.with(recorder(name, log, pass));
        }
        let handler_log = log.clone();
        let endpoint = builder.then(move |_: Request, res: Responder| {
            let log = handler_log.clone();
            async move {
                log.lock().unwrap().push("handler");
                res.send(serde_json::json!({ "message": "Hello, World!" }))
            }
        });
        router.register(Method::Get, "/", endpoint);
        router
    }

    async fn body(response: &mut Response) -> String {
        response.text(4096).await.unwrap()
    }

    #[tokio::test]
    async fn test_order() {
        let log = Log::default();
        let router = recording_router(&log, &[("a", true), ("b", true)], &[("c", true)]);
        let mut response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "handler"]);
        assert_eq!(
            response.header_str(http::header::CONTENT_TYPE),
            Some("application/json")
        );
        assert_eq!(body(&mut response).await, r#"{"message":"Hello, World!"}"#);
    }

    #[tokio::test]
    async fn test_global_halt() {
        let log = Log::default();
        let router = recording_router(&log, &[("a", false), ("b", true)], &[("c", true)]);
        let mut response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
        assert_eq!(body(&mut response).await, "Global middleware terminated the request");
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_route_halt() {
        let log = Log::default();
        let router = recording_router(&log, &[("a", true)], &[("c", false), ("d", true)]);
        let mut response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
        assert_eq!(body(&mut response).await, "Route middleware terminated the request");
        assert_eq!(*log.lock().unwrap(), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_not_found_runs_nothing() {
        let log = Log::default();
        let router = recording_router(&log, &[("a", true)], &[]);
        let mut response = router.handle(Request::get("/missing").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(body(&mut response).await, "Not Found");
        let response = router.handle(Request::post("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        let response = router.handle(Request::from_method("/", http::Method::HEAD).unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_direct_dispatch() {
        let log = Log::default();
        let router = recording_router(&log, &[], &[]);
        let response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(*log.lock().unwrap(), vec!["handler"]);
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut router = Router::default();
        router.at("/").get(crate::handlers::simple(|| Response::text("first")));
        router.at("/").get(crate::handlers::simple(|| Response::text("second")));
        assert_eq!(router.routes().count(), 1);
        let mut response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(body(&mut response).await, "second");
    }

    #[tokio::test]
    async fn test_middleware_response_wins() {
        let mut router = Router::default();
        router
            .at("/echo")
            .with(crate::middleware::RequireHeader::new(http::header::AUTHORIZATION))
            .post(crate::handlers::simple(Response::empty_200));

        let mut response = router.handle(Request::post("/echo").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(body(&mut response).await, r#"{"error":"Unauthorized"}"#);

        let request = Request::post("/echo")
            .unwrap()
            .with_header("Authorization", "Bearer x")
            .unwrap();
        let response = router.handle(request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handler_error() {
        let mut router = Router::default();
        router.at("/fail").get(|_: Request, _: Responder| async {
            Err::<Response, _>(anyhow::anyhow!("database unavailable"))
        });
        let response = router.handle(Request::get("/fail").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_handler_panic() {
        let mut router = Router::default();
        router
            .at("/panic")
            .get(crate::handlers::sync(|_, _: &Responder| -> Response { panic!("boom") }));
        let response = router.handle(Request::get("/panic").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_middleware_modifies_request() {
        let mut router = Router::default();
        router.with(crate::middleware::StateMiddleware::new(7u32));
        router.at("/state").get(|request: Request, res: Responder| async move {
            let value = request.state::<u32>().copied().unwrap_or_default();
            res.send(serde_json::json!({ "value": value }))
        });
        let mut response = router.handle(Request::get("/state").unwrap()).await;
        assert_eq!(body(&mut response).await, r#"{"value":7}"#);
    }

    #[tokio::test]
    async fn test_middleware_error() {
        let log = Log::default();
        let mut router = recording_router(&log, &[], &[]);
        router.with(crate::middleware::sync(|_: &mut Request, _: &Responder| {
            Err::<bool, _>(anyhow::anyhow!("session store unavailable"))
        }));
        let mut response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&mut response).await, "");
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_middleware_panic() {
        let log = Log::default();
        let mut router = recording_router(&log, &[], &[]);
        router.with(crate::middleware::sync(|_: &mut Request, _: &Responder| -> bool {
            panic!("boom")
        }));
        let mut response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&mut response).await, "");
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_global_middleware_response() {
        let log = Log::default();
        let mut router = recording_router(&log, &[], &[("c", true)]);
        router.with(crate::middleware::sync(|_: &mut Request, res: &Responder| {
            res.status(http::StatusCode::IM_A_TEAPOT)
        }));
        let mut response = router.handle(Request::get("/").unwrap()).await;
        assert_eq!(response.status(), http::StatusCode::IM_A_TEAPOT);
        assert_eq!(body(&mut response).await, "");
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trace_kept_when_middleware_fails() {
        let mut router = Router::default();
        router.with(crate::middleware::TraceMiddleware::new());
        router.with(crate::middleware::sync(|_: &mut Request, _: &Responder| -> bool {
            panic!("boom")
        }));
        let mut request = Request::get("/").unwrap();
        let responder = Responder::new(Method::Get, "/");
        let mut traced = None;
        let result = AssertUnwindSafe(gate(
            Stage::Global,
            router.global(),
            &mut request,
            &responder,
            &mut traced,
        ))
        .catch_unwind()
        .await;
        assert!(result.is_err());
        assert!(traced.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let notify = Arc::new(tokio::sync::Notify::new());
        let mut router = Router::default();
        let waiting = notify.clone();
        router.at("/slow").get(move |_: Request, res: Responder| {
            let waiting = waiting.clone();
            async move {
                waiting.notified().await;
                res.send("slow")
            }
        });
        let waking = notify.clone();
        router.at("/fast").get(move |_: Request, res: Responder| {
            let waking = waking.clone();
            async move {
                waking.notify_one();
                res.send("fast")
            }
        });

        // the slow request can only finish once the fast one has run
        let both = futures::future::join(
            router.handle(Request::get("/slow").unwrap()),
            router.handle(Request::get("/fast").unwrap()),
        );
        let (mut slow, mut fast) = tokio::time::timeout(std::time::Duration::from_secs(5), both)
            .await
            .unwrap();
        assert_eq!(body(&mut slow).await, "slow");
        assert_eq!(body(&mut fast).await, "fast");
    }

    #[test]
    fn test_panic_message() {
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*owned), "owned");
        let fixed: Box<dyn std::any::Any + Send> = Box::new(1u8);
        assert_eq!(panic_message(&*fixed), "(unknown)");
    }
}
