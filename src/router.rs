//! Path-pattern routing.
//!
//! Patterns are literal paths where a `:name` segment captures exactly one
//! path segment. Routes are tried in registration order and the first match
//! wins, so `/search` must be registered before `/:name` to be reachable.

use std::collections::HashMap;

use regex::Regex;

use crate::http::handler::Handler;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

struct Route {
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
    handler: Box<dyn Handler>,
}

/// An ordered table of routes.
///
/// Built once before serving, then shared read-only across connections.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    ///
    /// Fails only if the compiled pattern is rejected by the regex engine,
    /// e.g. a template that exceeds its size limit.
    ///
    /// # Example
    ///
    /// ```
    /// use wireline::router::Router;
    /// use wireline::http::{Request, ResponseWriter};
    ///
    /// let mut router = Router::new();
    /// router.register("/user/:name", |w: &mut ResponseWriter, r: &Request| {
    ///     w.body(format!("Hello, {}", r.param("name").unwrap_or_default()));
    ///     w.send();
    /// }).unwrap();
    /// assert_eq!(router.len(), 1);
    /// ```
    pub fn register(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), regex::Error> {
        let (regex, param_names) = Self::path_to_regex(pattern)?;
        self.routes.push(Route {
            pattern: pattern.to_string(),
            regex,
            param_names,
            handler: Box::new(handler),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the first route matching `path` and returns its index and captures.
    pub fn route(&self, path: &str) -> Option<(usize, HashMap<String, String>)> {
        for (i, route) in self.routes.iter().enumerate() {
            if let Some(captures) = route.regex.captures(path) {
                let mut params = HashMap::with_capacity(route.param_names.len());
                for (n, name) in route.param_names.iter().enumerate() {
                    if let Some(val) = captures.get(n + 1) {
                        params.insert(name.clone(), val.as_str().to_string());
                    }
                }
                return Some((i, params));
            }
        }
        None
    }

    /// Runs the first matching handler with its captures bound into
    /// `req.params`, or answers `404 Not Found` itself.
    pub fn dispatch(&self, w: &mut ResponseWriter, req: &mut Request) {
        match self.route(&req.path) {
            Some((i, params)) => {
                let route = &self.routes[i];
                tracing::debug!(pattern = %route.pattern, path = %req.path, "route matched");
                req.params = params;
                route.handler.serve(w, req);
            }
            None => {
                w.status(StatusCode::NOT_FOUND);
                w.body("404 Not Found");
                w.send();
            }
        }
    }

    /// Compiles a template into an anchored regex plus its capture names.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::new();

        for (i, segment) in path.split('/').enumerate() {
            if i > 0 {
                pattern.push('/');
            }
            match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => {
                    pattern.push_str("([^/]+)");
                    param_names.push(name.to_string());
                }
                _ => pattern.push_str(&regex::escape(segment)),
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern)?;

        Ok((regex, param_names))
    }
}

impl Handler for Router {
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request) {
        self.dispatch(w, req);
    }
}
