use crate::response::IntoResponse;
use crate::{Request, Responder, Response};
use std::future::Future;
use std::pin::Pin;

#[async_trait]
/// The terminal function of a route.
///
/// This is automatically implemented for
/// `Fn(Request, Responder) -> impl Future<Output = impl IntoResponse>` types,
/// but it may be useful to implement this yourself.  The handler only runs
/// once every global and route middleware has approved the request, and its
/// result is the response sent to the client.
pub trait Handler: Send + Sync + 'static {
    #[must_use]
    /// Transforms the request into the response.  A failure here is caught
    /// by the router, logged, and turned into an empty 500.
    async fn apply(
        self: Pin<&Self>,
        request: Request,
        response: Responder,
    ) -> Result<Response, anyhow::Error>;

    #[doc(hidden)]
    fn describe(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", std::any::type_name::<Self>())
    }
}

impl std::fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.describe(f)
    }
}

#[async_trait]
impl<Res, F, Fut> Handler for F
where
    F: Fn(Request, Responder) -> Fut + Sync + Send + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse + Send + 'static,
{
    async fn apply(
        self: Pin<&Self>,
        request: Request,
        response: Responder,
    ) -> Result<Response, anyhow::Error> {
        self(request, response).await.into_response()
    }
}
