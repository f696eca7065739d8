use std::pin::Pin;

use super::{Middleware, Verdict};
use crate::{HttpEntity, Request, Responder};

#[derive(Debug, Clone)]
/// A middleware that rejects requests missing a header.
///
/// A request without the header is answered with a JSON error body, e.g.
/// `{"error":"Unauthorized"}`, and the status (401 unless changed with
/// [`RequireHeader::with_status`]).  The header's value is not inspected.
///
/// # Examples
/// ```rust
/// # use turnstile::*;
/// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
/// let mut http = turnstile::http();
/// http.at("/echo")
///     .with(middleware::RequireHeader::new(http::header::AUTHORIZATION))
///     .post(handlers::simple(Response::empty_200));
/// let mut response = http.handle(Request::post("/echo")?).await;
/// assert_eq!(response.status(), http::StatusCode::UNAUTHORIZED);
/// assert_eq!(response.text(512).await?, r#"{"error":"Unauthorized"}"#);
/// # Ok(())
/// # }
/// ```
pub struct RequireHeader {
    name: http::header::HeaderName,
    status: http::StatusCode,
}

impl RequireHeader {
    /// Requires the given header on every request passing through.
    pub fn new(name: http::header::HeaderName) -> Self {
        RequireHeader {
            name,
            status: http::StatusCode::UNAUTHORIZED,
        }
    }

    #[must_use]
    /// Changes the status of the rejection response.
    pub fn with_status(mut self, status: http::StatusCode) -> Self {
        self.status = status;
        self
    }
}

#[async_trait]
impl Middleware for RequireHeader {
    async fn apply(
        self: Pin<&Self>,
        request: &mut Request,
        response: &Responder,
    ) -> Result<Verdict, anyhow::Error> {
        if request.header(&self.name).is_some() {
            return Ok(Verdict::Continue);
        }

        log::debug!("{} {}: missing {} header", request.method(), request.path(), self.name);
        let error = self.status.canonical_reason().unwrap_or("Rejected");
        let rejection = response
            .send(serde_json::json!({ "error": error }))?
            .with_status(self.status);
        Ok(Verdict::Respond(rejection))
    }
}
