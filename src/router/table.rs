use super::Endpoint;
use crate::Method;
use std::collections::HashMap;

pub(crate) struct Route {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) endpoint: Endpoint,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// The routes of a router, keyed by method and then by exact path.
///
/// There is at most one route per `(method, path)`; inserting a route for a
/// key that already exists replaces the previous one.  Paths are compared as
/// plain strings, so `/users` and `/users/` are different routes.
#[derive(Debug, Default)]
pub(crate) struct RouteTable {
    routes: HashMap<Method, HashMap<String, Route>>,
}

impl RouteTable {
    /// Inserts the route, returning the route it replaced, if any.
    pub(crate) fn insert(&mut self, route: Route) -> Option<Route> {
        self.routes
            .entry(route.method)
            .or_default()
            .insert(route.path.clone(), route)
    }

    pub(crate) fn lookup(&self, method: Method, path: &str) -> Option<&Route> {
        self.routes.get(&method)?.get(path)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Route> + '_ {
        self.routes.values().flat_map(HashMap::values)
    }

    pub(crate) fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Request, Responder, Response};

    #[allow(clippy::unused_async)]
    async fn simple_handler(_: Request, _: Responder) -> Response {
        unimplemented!()
    }

    fn route(method: Method, path: &str) -> Route {
        Route {
            method,
            path: path.to_owned(),
            endpoint: Endpoint::new(simple_handler),
        }
    }

    fn simple_table() -> RouteTable {
        let mut table = RouteTable::default();
        table.insert(route(Method::Get, "/"));
        table.insert(route(Method::Get, "/alpha"));
        table.insert(route(Method::Post, "/alpha"));
        table.insert(route(Method::Delete, "/beta/"));
        table
    }

    #[test]
    fn test_basic_match() {
        let table = simple_table();
        let result = table.lookup(Method::Get, "/");
        assert!(result.is_some());
        assert_eq!("/", &result.unwrap().path);
    }

    #[test]
    fn test_method_match() {
        let table = simple_table();
        assert_eq!(table.lookup(Method::Post, "/alpha").unwrap().method, Method::Post);
        assert!(table.lookup(Method::Put, "/alpha").is_none());
    }

    #[test]
    fn test_exact_match_only() {
        let table = simple_table();
        assert!(table.lookup(Method::Get, "/alpha/").is_none());
        assert!(table.lookup(Method::Get, "/alph").is_none());
        assert!(table.lookup(Method::Delete, "/beta").is_none());
        assert!(table.lookup(Method::Delete, "/beta/").is_some());
    }

    #[test]
    fn test_replace() {
        let mut table = simple_table();
        let mut replacement = route(Method::Get, "/alpha");
        replacement.endpoint = crate::endpoint()
            .with(crate::middleware::TraceMiddleware::new())
            .then(simple_handler);
        let previous = table.insert(replacement);
        assert!(previous.is_some());
        assert_eq!(table.len(), 4);
        let current = table.lookup(Method::Get, "/alpha").unwrap();
        assert_eq!(current.endpoint.middleware().count(), 1);
    }

    #[test]
    fn test_iter() {
        let table = simple_table();
        assert_eq!(table.iter().count(), table.len());
    }
}
