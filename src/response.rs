use crate::HttpEntity;

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug)]
#[must_use]
/// An HTTP response.
///
/// An HTTP Response consists of a head (a status code and some headers), and
/// a body (which may be empty).  Handlers usually build these through their
/// [`crate::Responder`], but this type offers helpers for common use-cases as
/// well.
///
/// # Examples
///
/// ```rust
/// use turnstile::{HttpEntity, Request, Responder, Response};
///
/// async fn handle_get(_: Request, _: Responder) -> Response {
///     Response::text("hello, world")
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), anyhow::Error> {
/// let mut http = turnstile::http();
/// http.at("/hello").get(handle_get);
/// let mut response = http.handle(Request::get("/hello")?).await;
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.text(512).await?, "hello, world");
/// # Ok(())
/// # }
/// ```
pub struct Response(http::Response<hyper::Body>);

impl Response {
    /// Creates an empty response with a status code of 200.
    pub fn empty_200() -> Self {
        Self::empty_status(http::StatusCode::OK)
    }

    /// Creates an empty response with a status code of 404.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let response = Response::empty_404();
    /// assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    /// ```
    pub fn empty_404() -> Self {
        Response::empty_status(http::StatusCode::NOT_FOUND)
    }

    /// Creates an empty response with a status code of 500.
    pub fn empty_500() -> Self {
        Response::empty_status(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Creates a response with an empty body and a set status.  The
    /// Content-Type is not set.
    pub fn empty_status(status: http::StatusCode) -> Self {
        let mut response = http::Response::new(hyper::Body::empty());
        *response.status_mut() = status;
        Response(response)
    }

    /// Creates a response with the given body and `Content-Type`, and a
    /// status code of 200.
    pub(crate) fn with_content_type<B: Into<hyper::Body>>(
        content_type: &'static str,
        body: B,
    ) -> Self {
        let mut response = http::Response::new(body.into());
        response.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static(content_type),
        );
        Response(response)
    }

    /// Creates a response with the given text body.  The returned response
    /// has a `Content-Type` of `text/plain; charset=utf-8`.
    pub fn text<V: Into<String>>(body: V) -> Self {
        Self::with_content_type("text/plain; charset=utf-8", body.into())
    }

    /// Creates a response with the given JSON body.  The returned response
    /// has a `Content-Type` of `application/json`.
    ///
    /// # Errors
    /// This errors if the underlying JSON serialization fails; and it will
    /// return that exact error.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let response = Response::json(&serde_json::json!({ "hello": "world" }))?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn json<V: serde::Serialize>(body: &V) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_string(body)?;
        Ok(Self::with_content_type(JSON_CONTENT_TYPE, value))
    }

    /// Sets the current responses's status code.
    pub fn set_status<S: Into<http::StatusCode>>(&mut self, status: S) {
        *self.0.status_mut() = status.into();
    }

    /// Returns a response with the new status code.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let response = Response::empty_404();
    /// let response = response.with_status(http::StatusCode::OK);
    /// assert_eq!(response.status(), http::StatusCode::OK);
    /// ```
    pub fn with_status<S: Into<http::StatusCode>>(mut self, status: S) -> Self {
        self.set_status(status);
        self
    }

    /// Returns the [`http::StatusCode`].
    pub fn status(&self) -> http::StatusCode {
        self.0.status()
    }

    /// Returns a reference to the associated extensions.
    pub fn extensions(&self) -> &http::Extensions {
        self.0.extensions()
    }

    /// Returns a mutable reference to the associated extensions.
    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        self.0.extensions_mut()
    }
}

impl HttpEntity for Response {
    #[inline]
    fn body_mut(&mut self) -> &mut hyper::Body {
        self.0.body_mut()
    }
    #[inline]
    fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        self.0.headers()
    }
    #[inline]
    fn headers_mut(&mut self) -> &mut http::HeaderMap<http::HeaderValue> {
        self.0.headers_mut()
    }
}

impl Default for Response {
    fn default() -> Self {
        Response::empty_200()
    }
}

impl From<http::Response<hyper::Body>> for Response {
    fn from(hy: http::Response<hyper::Body>) -> Self {
        Response(hy)
    }
}

impl From<Response> for http::Response<hyper::Body> {
    fn from(this: Response) -> Self {
        this.0
    }
}

/// Converts the current type into a [`crate::Response`].
///
/// This assumes that the conversion into a response is fallible
/// (as it often is).  This is used instead of `TryFrom` because
/// `TryFrom<Result<T, E>>` is not implemented for `Result<T, E>`.
pub trait IntoResponse {
    /// Converts the current type into a response.
    ///
    /// # Errors
    /// Whatever error the implementing type carries.
    fn into_response(self) -> Result<Response, anyhow::Error>;
}

impl IntoResponse for Response {
    fn into_response(self) -> Result<Response, anyhow::Error> {
        Ok(self)
    }
}

impl<R, E> IntoResponse for Result<R, E>
where
    R: IntoResponse,
    E: Into<anyhow::Error>,
{
    fn into_response(self) -> Result<Response, anyhow::Error> {
        self.map_err(Into::into).and_then(IntoResponse::into_response)
    }
}

impl IntoResponse for std::convert::Infallible {
    fn into_response(self) -> Result<Response, anyhow::Error> {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_response() {
        let response = Response::empty_500();

        assert!(Ok::<_, std::convert::Infallible>(response)
            .into_response()
            .is_ok());
    }

    #[test]
    fn convert_error() {
        let result: Result<Response, anyhow::Error> = Err(anyhow::anyhow!("nope"));
        assert!(result.into_response().is_err());
    }

    #[tokio::test]
    async fn json_content_type() {
        let mut response = Response::json(&serde_json::json!({ "a": 1 })).unwrap();
        assert_eq!(
            response.header_str(http::header::CONTENT_TYPE),
            Some("application/json")
        );
        assert_eq!(response.text(64).await.unwrap(), r#"{"a":1}"#);
    }
}
