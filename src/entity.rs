use crate::TurnstileError;
use bytes::{Bytes, BytesMut};
use hyper::body::HttpBody;

/// A HTTP Entity.
///
/// This is either a request or a response.  This represents common, shared
/// functionality between the two, such as accessing headers and reading the
/// body.
#[async_trait]
pub trait HttpEntity: Sized + Send {
    /// Returns a mutable reference to the body of the entity.  This is used
    /// for all of the body-reading methods.
    fn body_mut(&mut self) -> &mut hyper::Body;

    /// Returns a reference to the associated header field map.
    fn headers(&self) -> &http::HeaderMap<http::HeaderValue>;

    /// Returns a mutable reference to the associated header field map.
    fn headers_mut(&mut self) -> &mut http::HeaderMap<http::HeaderValue>;

    /// Sets the body of the entity, dropping the previous one in place.
    fn set_body<I: Into<hyper::Body>>(&mut self, body: I) -> &mut Self {
        *self.body_mut() = body.into();
        self
    }

    /// Takes the body from this entity, and replaces it with an empty body.
    /// Attempting to read the body more than once will therefore yield an
    /// empty body the second time.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
    /// let mut response = Response::text("foo");
    /// let body = hyper::body::to_bytes(response.take_body()).await?;
    /// assert_eq!(&body[..], b"foo");
    /// let body = hyper::body::to_bytes(response.take_body()).await?;
    /// assert_eq!(&body[..], b"");
    /// # Ok(())
    /// # }
    /// ```
    fn take_body(&mut self) -> hyper::Body {
        std::mem::replace(self.body_mut(), hyper::Body::empty())
    }

    /// Returns the first value of the given header, if present.
    fn header<H: http::header::AsHeaderName>(&self, key: H) -> Option<&http::HeaderValue> {
        self.headers().get(key)
    }

    /// Returns the first value of the given header as a string, if present
    /// and valid visible ASCII.
    fn header_str<H: http::header::AsHeaderName>(&self, key: H) -> Option<&str> {
        self.header(key).and_then(|v| v.to_str().ok())
    }

    /// Sets the given header, replacing every previous value of it.
    ///
    /// # Errors
    /// This fails if either the name or the value cannot be converted into a
    /// valid header name or value.
    fn set_header<H, V>(&mut self, key: H, value: V) -> Result<(), http::Error>
    where
        http::header::HeaderName: TryFrom<H>,
        <http::header::HeaderName as TryFrom<H>>::Error: Into<http::Error>,
        http::HeaderValue: TryFrom<V>,
        <http::HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        let key = http::header::HeaderName::try_from(key).map_err(Into::into)?;
        let value = http::HeaderValue::try_from(value).map_err(Into::into)?;
        self.headers_mut().insert(key, value);
        Ok(())
    }

    /// Sets the given header, consuming and returning `self`.  See
    /// [`Self::set_header`].
    ///
    /// # Errors
    /// The same as [`Self::set_header`].
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let request = Request::get("/")?.with_header("Authorization", "Bearer abc")?;
    /// assert_eq!(request.header_str("authorization"), Some("Bearer abc"));
    /// # Ok::<(), http::Error>(())
    /// ```
    fn with_header<H, V>(mut self, key: H, value: V) -> Result<Self, http::Error>
    where
        http::header::HeaderName: TryFrom<H>,
        <http::header::HeaderName as TryFrom<H>>::Error: Into<http::Error>,
        http::HeaderValue: TryFrom<V>,
        <http::HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.set_header(key, value)?;
        Ok(self)
    }

    /// Parses the `Content-Type` header, if present and valid.
    fn content_type(&self) -> Option<mime::Mime> {
        self.header_str(http::header::CONTENT_TYPE)?.parse().ok()
    }

    /// Reads the whole body into memory, failing if it is longer than
    /// `limit` bytes.  This consumes the body.
    ///
    /// # Errors
    /// Returns [`TurnstileError::ReadBody`] if the underlying stream fails,
    /// and [`TurnstileError::PayloadTooLarge`] if the limit is exceeded.
    async fn bytes(&mut self, limit: u64) -> Result<Bytes, TurnstileError> {
        let mut body = self.take_body();
        let mut buffer = BytesMut::new();
        while let Some(chunk) = body.data().await {
            let chunk = chunk.map_err(TurnstileError::ReadBody)?;
            if (buffer.len() + chunk.len()) as u64 > limit {
                return Err(TurnstileError::PayloadTooLarge(limit));
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }

    /// Reads the body as UTF-8 text.  See [`Self::bytes`].
    ///
    /// # Errors
    /// As [`Self::bytes`], plus [`TurnstileError::TextDeserialization`] if
    /// the body is not valid UTF-8.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// # #[tokio::main] async fn main() -> Result<(), anyhow::Error> {
    /// let mut response = Response::text("hello");
    /// assert_eq!(response.text(512).await?, "hello");
    /// # Ok(())
    /// # }
    /// ```
    async fn text(&mut self, limit: u64) -> Result<String, TurnstileError> {
        let bytes = self.bytes(limit).await?;
        String::from_utf8(bytes.to_vec()).map_err(TurnstileError::TextDeserialization)
    }

    /// Reads the body as JSON into the given type.  See [`Self::bytes`].
    ///
    /// # Errors
    /// As [`Self::bytes`], plus [`TurnstileError::JsonDeserialization`] if
    /// the body could not be deserialized.
    async fn json<T: serde::de::DeserializeOwned>(
        &mut self,
        limit: u64,
    ) -> Result<T, TurnstileError> {
        let bytes = self.bytes(limit).await?;
        serde_json::from_slice(&bytes).map_err(TurnstileError::JsonDeserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Request, Response};

    #[tokio::test]
    async fn test_bytes_limit() {
        let mut request = Request::post("/").unwrap();
        request.set_body("0123456789");
        let result = request.bytes(4).await;
        assert!(matches!(result, Err(TurnstileError::PayloadTooLarge(4))));
    }

    #[tokio::test]
    async fn test_bytes_exact_limit() {
        let mut request = Request::post("/").unwrap();
        request.set_body("0123");
        assert_eq!(&request.bytes(4).await.unwrap()[..], b"0123");
    }

    #[tokio::test]
    async fn test_json() {
        #[derive(serde::Deserialize)]
        struct Message {
            message: String,
        }

        let mut response = Response::json(&serde_json::json!({ "message": "hi" })).unwrap();
        let message: Message = response.json(512).await.unwrap();
        assert_eq!(message.message, "hi");
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut response = Response::text("{");
        let result = response.json::<serde_json::Value>(512).await;
        assert!(matches!(result, Err(TurnstileError::JsonDeserialization(_))));
    }

    #[test]
    fn test_content_type() {
        let response = Response::text("x");
        let mime = response.content_type().unwrap();
        assert_eq!(mime.essence_str(), "text/plain");
    }
}
