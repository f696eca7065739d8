use std::pin::Pin;

use crate::response::IntoResponse;
use crate::{Handler, Request, Responder, Response};
use anyhow::Error;

pub(crate) struct SyncHandler<F>(pub(crate) F);

#[async_trait]
impl<F, Res> Handler for SyncHandler<F>
where
    F: Fn(Request, &Responder) -> Res + Send + Sync + 'static,
    Res: IntoResponse + Send + 'static,
{
    async fn apply(
        self: Pin<&Self>,
        request: Request,
        response: Responder,
    ) -> Result<Response, Error> {
        let f = &self.0;
        f(request, &response).into_response()
    }
}
