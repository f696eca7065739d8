use crate::response::JSON_CONTENT_TYPE;
use crate::{Method, Response};
use std::sync::Arc;

/// A body that can be handed to [`Responder::send`].
///
/// `String`, `&str`, and [`serde_json::Value::String`] are sent verbatim;
/// any other [`serde_json::Value`] is serialized to JSON, and so is any
/// serializable type wrapped in [`Json`] (including strings, which then
/// keep their quotes).
pub trait Payload {
    /// Produces the text of the body.
    ///
    /// # Errors
    /// Fails if the payload could not be serialized.
    fn into_body(self) -> Result<String, serde_json::Error>;
}

impl Payload for String {
    fn into_body(self) -> Result<String, serde_json::Error> {
        Ok(self)
    }
}

impl Payload for &str {
    fn into_body(self) -> Result<String, serde_json::Error> {
        Ok(self.to_owned())
    }
}

impl Payload for serde_json::Value {
    fn into_body(self) -> Result<String, serde_json::Error> {
        match self {
            serde_json::Value::String(s) => Ok(s),
            other => serde_json::to_string(&other),
        }
    }
}

#[derive(Debug, Clone, Copy)]
/// Marks a serializable value as an object payload for
/// [`Responder::send`].
///
/// # Examples
/// ```rust
/// # use turnstile::*;
/// #[derive(serde::Serialize)]
/// struct Greeting { message: &'static str }
///
/// async fn greet(_: Request, response: Responder) -> turnstile::Result {
///     Ok(response.send(Json(Greeting { message: "hello" }))?)
/// }
/// ```
pub struct Json<T>(pub T);

impl<T: serde::Serialize> Payload for Json<T> {
    fn into_body(self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

#[derive(Debug, Clone)]
/// The response writer handed to middleware and handlers.
///
/// A responder is created fresh for every routed request, and is bound to
/// that request's method and path.  It does not own the connection; it only
/// constructs [`Response`] values, which the caller returns up the stack.
/// Middleware receive it by reference, the handler by value.
pub struct Responder {
    method: Method,
    path: Arc<str>,
}

impl Responder {
    pub(crate) fn new(method: Method, path: &str) -> Self {
        Responder {
            method,
            path: Arc::from(path),
        }
    }

    /// The method of the request this responder is bound to.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The path of the request this responder is bound to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Builds a 200 response carrying the given payload.  Objects are
    /// serialized to JSON and strings are sent verbatim; either way the
    /// `Content-Type` is `application/json`.
    ///
    /// # Errors
    /// Fails if the payload could not be serialized.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
    /// let mut http = turnstile::http();
    /// http.at("/").get(|_: Request, res: Responder| async move {
    ///     res.send(serde_json::json!({ "message": "Hello, World!" }))
    /// });
    /// let mut response = http.handle(Request::get("/")?).await;
    /// assert_eq!(response.header_str("content-type"), Some("application/json"));
    /// assert_eq!(response.text(512).await?, r#"{"message":"Hello, World!"}"#);
    /// # Ok(())
    /// # }
    /// ```
    pub fn send<P: Payload>(&self, body: P) -> Result<Response, serde_json::Error> {
        let body = body.into_body()?;
        log::trace!("{} {} send({} bytes)", self.method, self.path, body.len());
        Ok(Response::with_content_type(JSON_CONTENT_TYPE, body))
    }

    /// Builds a response with an empty body and the given status code.
    pub fn status(&self, code: http::StatusCode) -> Response {
        log::trace!("{} {} status({})", self.method, self.path, code);
        Response::empty_status(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HttpEntity;

    fn responder() -> Responder {
        Responder::new(Method::Get, "/")
    }

    #[tokio::test]
    async fn test_send_object() {
        let mut response = responder()
            .send(serde_json::json!({ "message": "Hello, World!" }))
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.header_str("content-type"), Some("application/json"));
        let body: serde_json::Value = response.json(512).await.unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Hello, World!" }));
    }

    #[tokio::test]
    async fn test_send_string_verbatim() {
        let mut response = responder().send("plain words").unwrap();
        assert_eq!(response.header_str("content-type"), Some("application/json"));
        assert_eq!(response.text(512).await.unwrap(), "plain words");
    }

    #[tokio::test]
    async fn test_send_json_wrapper() {
        #[derive(serde::Serialize)]
        struct Point {
            x: i32,
        }
        let mut response = responder().send(Json(Point { x: 3 })).unwrap();
        assert_eq!(response.text(512).await.unwrap(), r#"{"x":3}"#);
    }

    #[tokio::test]
    async fn test_send_json_string_quoted() {
        let mut response = responder().send(Json("text")).unwrap();
        assert_eq!(response.text(512).await.unwrap(), r#""text""#);
        let mut response = responder().send(serde_json::json!("text")).unwrap();
        assert_eq!(response.text(512).await.unwrap(), "text");
    }

    #[tokio::test]
    async fn test_status_empty() {
        let mut response = responder().status(http::StatusCode::ACCEPTED);
        assert_eq!(response.status(), http::StatusCode::ACCEPTED);
        assert!(response.header("content-type").is_none());
        assert_eq!(response.text(512).await.unwrap(), "");
    }
}
