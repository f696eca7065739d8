use super::Router;
use crate::TurnstileError;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// Something that can be turned into the address to listen on.
///
/// This is implemented for `"host:port"` strings, [`SocketAddr`], and a bare
/// port number (`u16`), which listens on every interface.
pub trait ToAddress {
    /// Resolves the address.
    ///
    /// # Errors
    /// Fails if the address could not be parsed.
    fn to_address(self) -> Result<SocketAddr, TurnstileError>;
}

impl ToAddress for &str {
    fn to_address(self) -> Result<SocketAddr, TurnstileError> {
        self.parse()
            .map_err(|_| TurnstileError::InvalidAddress(self.to_owned()))
    }
}

impl ToAddress for String {
    fn to_address(self) -> Result<SocketAddr, TurnstileError> {
        self.as_str().to_address()
    }
}

impl ToAddress for SocketAddr {
    fn to_address(self) -> Result<SocketAddr, TurnstileError> {
        Ok(self)
    }
}

impl ToAddress for u16 {
    fn to_address(self) -> Result<SocketAddr, TurnstileError> {
        Ok(SocketAddr::from(([0, 0, 0, 0], self)))
    }
}

#[derive(Debug, Copy, Clone)]
/// Inserted into every request accepted by the server; the address of the
/// connected peer.
pub(crate) struct PeerAddress(pub(crate) SocketAddr);

type ServerFuture = Pin<Box<dyn Future<Output = Result<(), hyper::Error>> + Send + 'static>>;

#[must_use = "the server does not answer any request until it is served"]
/// A router bound to a socket, but not yet serving.
///
/// Created by [`Router::bind`].  Having one of these means the socket was
/// bound successfully, so [`Listening::local_addr`] can be used as a
/// readiness signal (e.g. when binding to port `0`).
pub struct Listening {
    local_addr: SocketAddr,
    server: ServerFuture,
}

impl Listening {
    /// The address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves connections until the server fails.
    ///
    /// # Errors
    /// Fails if hyper fails while serving.
    pub async fn serve(self) -> Result<(), TurnstileError> {
        self.server.await.map_err(TurnstileError::HyperServer)
    }
}

impl std::fmt::Debug for Listening {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listening")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Binds the router to the given address, without serving yet.
    ///
    /// # Errors
    /// This can fail if the address is invalid, or if the socket could not
    /// be bound (e.g. it is already in use).
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime, as the socket is
    /// registered with the runtime's reactor.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
    /// let mut http = turnstile::http();
    /// http.at("/").get(handlers::simple(Response::empty_200));
    /// let listening = http.bind("127.0.0.1:0")?;
    /// assert_ne!(listening.local_addr().port(), 0);
    /// tokio::spawn(listening.serve());
    /// # Ok(())
    /// # }
    /// ```
    pub fn bind<A: ToAddress>(self, address: A) -> Result<Listening, TurnstileError> {
        let address = address.to_address()?;
        let builder = hyper::server::Server::try_bind(&address)
            .map_err(|e| TurnstileError::Bind(address, e))?;

        if log::log_enabled!(log::Level::Trace) {
            for route in self.routes() {
                log::trace!("route: {} {} ({:?})", route.method, route.path, route.endpoint);
            }
        }

        let this = Arc::pin(self);
        let server = builder.serve(hyper::service::make_service_fn(
            move |v: &hyper::server::conn::AddrStream| {
                let service = RouterService(this.clone(), v.remote_addr());
                async move { Ok::<_, std::convert::Infallible>(service) }
            },
        ));
        let local_addr = server.local_addr();
        log::info!("listen({})", local_addr);

        Ok(Listening {
            local_addr,
            server: Box::pin(server),
        })
    }

    /// Binds to the specified address, and serves connections on it.
    ///
    /// # Errors
    /// This can fail if the socket address is invalid, if the socket is
    /// already in use, or if serving fails.
    ///
    /// # Examples
    /// ```rust,no_run
    /// # use turnstile::*;
    /// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
    /// let mut http = turnstile::http();
    /// http.at("/").get(|_: Request, res: Responder| async move { res.send("hello, world!") });
    /// http.listen(3000).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn listen<A: ToAddress>(self, address: A) -> Result<(), TurnstileError> {
        self.bind(address)?.serve().await
    }

    /// Binds to the specified address, calls `on_ready` with the bound
    /// address once the socket is listening, and then serves connections.
    /// `on_ready` is not called if binding fails.
    ///
    /// # Errors
    /// The same as [`Router::listen`].
    pub async fn listen_with<A, F>(self, address: A, on_ready: F) -> Result<(), TurnstileError>
    where
        A: ToAddress,
        F: FnOnce(SocketAddr),
    {
        let listening = self.bind(address)?;
        on_ready(listening.local_addr());
        listening.serve().await
    }
}

#[derive(Clone)]
struct RouterService(Pin<Arc<Router>>, SocketAddr);

type RouterFuture<R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'static>>;

impl tower::Service<hyper::Request<hyper::Body>> for RouterService {
    type Response = hyper::Response<hyper::Body>;
    type Error = std::convert::Infallible;
    type Future = RouterFuture<Self::Response, Self::Error>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut request: hyper::Request<hyper::Body>) -> Self::Future {
        let this = (self.0).clone();
        request.extensions_mut().insert(PeerAddress(self.1));
        Box::pin(async move {
            let response = this.handle(request.into()).await;
            Ok::<hyper::Response<hyper::Body>, _>(response.into())
        })
    }
}
