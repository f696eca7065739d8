use std::pin::Pin;

use super::{IntoVerdict, Middleware, Verdict};
use crate::{Request, Responder};

pub(super) struct SyncMiddleware<F>(pub(super) F);

#[async_trait]
impl<F, V> Middleware for SyncMiddleware<F>
where
    F: Fn(&mut Request, &Responder) -> V + Send + Sync + 'static,
    V: IntoVerdict + Send + 'static,
{
    async fn apply(
        self: Pin<&Self>,
        request: &mut Request,
        response: &Responder,
    ) -> Result<Verdict, anyhow::Error> {
        let f = &self.0;
        f(request, response).into_verdict()
    }
}

impl<F> std::fmt::Debug for SyncMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SyncMiddleware")
            .field(&std::any::type_name::<F>())
            .finish()
    }
}
