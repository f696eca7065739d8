use std::convert::TryFrom;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// The HTTP methods a route can be registered for.
///
/// Requests using any other method (`HEAD`, `OPTIONS`, ...) can never match
/// a route, and so always receive a 404.
pub enum Method {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
}

impl Method {
    /// All routable methods, in declaration order.
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    /// Returns the canonical, upper-case name of the method.
    ///
    /// # Examples
    /// ```rust
    /// assert_eq!(turnstile::Method::Patch.as_str(), "PATCH");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The error returned when an [`http::Method`] is not one of the routable
/// methods.
pub struct UnroutableMethod(pub http::Method);

impl std::fmt::Display for UnroutableMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "the method {} cannot be routed", self.0)
    }
}

impl std::error::Error for UnroutableMethod {}

impl TryFrom<&http::Method> for Method {
    type Error = UnroutableMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        match *method {
            http::Method::GET => Ok(Method::Get),
            http::Method::POST => Ok(Method::Post),
            http::Method::PUT => Ok(Method::Put),
            http::Method::PATCH => Ok(Method::Patch),
            http::Method::DELETE => Ok(Method::Delete),
            _ => Err(UnroutableMethod(method.clone())),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http() {
        for method in Method::ALL {
            let http: http::Method = method.into();
            assert_eq!(Method::try_from(&http), Ok(method));
            assert_eq!(http.as_str(), method.as_str());
        }
    }

    #[test]
    fn test_unroutable() {
        let result = Method::try_from(&http::Method::HEAD);
        assert_eq!(result, Err(UnroutableMethod(http::Method::HEAD)));
        assert!(Method::try_from(&http::Method::OPTIONS).is_err());
    }
}
