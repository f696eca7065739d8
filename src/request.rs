use crate::HttpEntity;
use std::convert::TryFrom;

macro_rules! forward {
    () => {};
    (
        $(#[$m:meta])* $v:vis fn $name:ident(&self $(, $pn:ident: $pt:ty)*) -> $ret:ty;
        $($tail:tt)*
    ) => {
        $(#[$m])* $v fn $name(&self $(, $pn: $pt)*) -> $ret {
            (self.0).$name($($pn),*)
        }

        forward! { $($tail)* }
    };

    (
        $(#[$m:meta])* $v:vis fn $name:ident(&mut self $(, $pn:ident: $pt:ty)*) -> $ret:ty;
        $($tail:tt)*
    ) => {
        $(#[$m])* $v fn $name(&mut self $(, $pn: $pt)*) -> $ret {
            (self.0).$name($($pn),*)
        }

        forward! { $($tail)* }
    }
}

macro_rules! construct {
    () => {};
    ($($(#[$m:meta])* $v:vis fn $method:ident = $action:expr;)+) => {
        $($(#[$m])* $v fn $method<U>(uri: U) -> Result<Self, http::Error>
        where
            http::Uri: TryFrom<U>,
            <http::Uri as TryFrom<U>>::Error: Into<http::Error>
        {
            Self::from_method(uri, $action)
        })+
    };
}

#[derive(Debug)]
/// Represents an HTTP request.
///
/// An HTTP Request consists of a head (a version, a method, a path, and some
/// headers), and a body (which may be empty).  Middleware receive a mutable
/// reference to the request, so they may modify it (e.g. insert extensions)
/// before the handler receives it by value.
///
/// # Examples
/// ```rust
/// # use turnstile::*;
/// async fn respond_to(request: Request, response: Responder) -> Response {
///     if request.uri() != "/foo" {
///         return response.status(http::StatusCode::NOT_FOUND);
///     }
///
///     response.status(http::StatusCode::NO_CONTENT)
/// }
/// ```
pub struct Request(http::Request<hyper::Body>);

impl Request {
    construct! {
        /// Creates a new request initialized with the GET method and the given
        /// URI.
        ///
        /// # Examples
        /// ```rust
        /// # use turnstile::*;
        /// let request = Request::get("https://example.com/a").unwrap();
        /// assert_eq!(request.method(), http::Method::GET);
        /// ```
        pub fn get = http::Method::GET;
        /// Creates a new request initialized with the POST method and the given
        /// URI.
        pub fn post = http::Method::POST;
        /// Creates a new request initialized with the PUT method and the given
        /// URI.
        pub fn put = http::Method::PUT;
        /// Creates a new request initialized with the PATCH method and the
        /// given URI.
        pub fn patch = http::Method::PATCH;
        /// Creates a new request initialized with the DELETE method and the
        /// given URI.
        pub fn delete = http::Method::DELETE;
    }

    /// Creates a new request initialized with the provided method and the
    /// given URI.
    ///
    /// # Errors
    /// This method will return an error if the provided URI is invalid.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let request = Request::from_method("/a", http::Method::HEAD).unwrap();
    /// assert_eq!(request.method(), http::Method::HEAD);
    /// ```
    pub fn from_method<U>(uri: U, method: http::Method) -> Result<Self, http::Error>
    where
        http::Uri: TryFrom<U>,
        <http::Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        http::request::Builder::new()
            .method(method)
            .uri(uri)
            .body(hyper::Body::empty())
            .map(Request)
    }

    /// The path of the request URI, without the query string.  This is the
    /// exact string routes are matched against.
    pub fn path(&self) -> &str {
        self.uri().path()
    }

    /// Parses the query string from the request into the provided type.  If
    /// there is no query string, or it cannot be parsed into the given type,
    /// then `None` is returned.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let request = Request::get("/users?id=1").unwrap();
    /// #[derive(serde::Deserialize)]
    /// struct User { id: u32 }
    /// let user: User = request.query().unwrap();
    /// assert_eq!(user.id, 1);
    /// ```
    pub fn query<'q, S: serde::Deserialize<'q>>(&'q self) -> Option<S> {
        self.uri()
            .query()
            .and_then(|s| serde_qs::from_str::<S>(s).ok())
    }

    /// Returns state information provided by the
    /// [`crate::middleware::StateMiddleware`] middleware.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// use turnstile::middleware::State;
    /// let mut request = Request::get("/").unwrap();
    /// request.extensions_mut().insert(State(123u32));
    /// assert_eq!(request.state::<u32>(), Some(&123u32));
    /// ```
    pub fn state<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.ext::<crate::middleware::State<T>>().map(|v| &v.0)
    }

    /// The address of the connected peer.
    ///
    /// This is only available for requests accepted by a listening router;
    /// requests built by hand (e.g. for [`crate::Router::handle`]) have none.
    pub fn peer_addr(&self) -> Option<std::net::SocketAddr> {
        self.ext::<crate::router::PeerAddress>().map(|v| v.0)
    }

    /// Retrieves a specific extension from the extensions map.
    pub fn ext<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions().get::<T>()
    }

    /// Sets the value of the specific extension in the extensions map.
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::*;
    /// let mut request = Request::get("/").unwrap();
    /// request.set_ext(123u32);
    /// assert_eq!(request.ext::<u32>(), Some(&123u32));
    /// ```
    pub fn set_ext<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.extensions_mut().insert(value);
        self
    }

    /// Sets the value of the specific extension, consuming `self`.
    #[must_use]
    pub fn with_ext<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.set_ext(value);
        self
    }

    forward! {
        /// Returns a reference to the associated URI.
        #[inline]
        pub fn uri(&self) -> &http::Uri;
        /// Returns a reference to the associated HTTP method.
        #[inline]
        pub fn method(&self) -> &http::Method;
        /// Returns a reference to the associated extensions.
        #[inline]
        pub fn extensions(&self) -> &http::Extensions;
        /// Returns a mutable reference to the associated extensions.
        #[inline]
        pub fn extensions_mut(&mut self) -> &mut http::Extensions;
    }
}

impl HttpEntity for Request {
    #[inline]
    fn body_mut(&mut self) -> &mut hyper::Body {
        self.0.body_mut()
    }

    #[inline]
    fn headers(&self) -> &http::HeaderMap {
        self.0.headers()
    }

    #[inline]
    fn headers_mut(&mut self) -> &mut http::HeaderMap {
        self.0.headers_mut()
    }
}

impl From<http::Request<hyper::Body>> for Request {
    fn from(r: http::Request<hyper::Body>) -> Self {
        Request(r)
    }
}

impl From<Request> for http::Request<hyper::Body> {
    fn from(r: Request) -> Self {
        r.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_addr() {
        let request = Request::get("/").unwrap();
        assert_eq!(request.peer_addr(), None);
        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 4000));
        let request = request.with_ext(crate::router::PeerAddress(addr));
        assert_eq!(request.peer_addr(), Some(addr));
    }

    #[test]
    fn test_path_excludes_query() {
        let request = Request::get("/search?q=a").unwrap();
        assert_eq!(request.path(), "/search");
    }

    #[test]
    fn test_trailing_slash_kept() {
        let request = Request::delete("http://localhost/users/").unwrap();
        assert_eq!(request.path(), "/users/");
        assert_eq!(request.method(), http::Method::DELETE);
    }

    #[test]
    fn test_query_missing() {
        #[derive(serde::Deserialize)]
        struct Page {
            #[allow(dead_code)]
            page: u32,
        }
        let request = Request::get("/").unwrap();
        assert!(request.query::<Page>().is_none());
    }
}
