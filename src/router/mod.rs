//! Request routing — map URL patterns and HTTP methods to handler functions.
//!
//! [`Router`] keeps one segment trie per HTTP method plus a flat table of handlers keyed
//! by `"{METHOD}-{pattern}"`. Three segment kinds are supported:
//!
//! | Pattern               | Example match              | Captured params                 |
//! |-----------------------|----------------------------|---------------------------------|
//! | `/users`              | `/users`                   | *(none)*                        |
//! | `/users/:id`          | `/users/42`                | `id → "42"`                     |
//! | `/files/*filepath`    | `/files/docs/readme.txt`   | `filepath → "docs/readme.txt"`  |
//!
//! Empty segments are ignored on both patterns and paths, so `/users/`, `//users` and
//! `/users` are equivalent. A wildcard must be the final segment of its pattern and may
//! capture zero segments (`/files/` binds `filepath → ""`).
//!
//! When a literal and a parameter sibling could both match, the one registered first is
//! tried first. Register literals before parameters at the same depth: a literal added
//! after a wild sibling is folded into that sibling's node.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::context::{Context, Params};
use crate::http::{Method, StatusCode};

pub mod shared;
pub mod trie;

pub use shared::SharedRouter;
pub use trie::Node;

/// Type-erased route handler.
///
/// Handlers receive the request [`Context`] mutably and write their response into it.
/// They are stored behind `Arc` so a [`Router`] can be cloned cheaply when building a
/// new snapshot for [`SharedRouter`].
pub type Handler = Arc<dyn Fn(&mut Context) + Send + Sync + 'static>;

/// Errors raised while registering a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("wildcard must be the last segment in pattern `{pattern}`")]
    WildcardNotLast { pattern: String },
}

/// A registered route, as reported by [`Router::routes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub pattern: String,
}

/// Split a pattern or request path into its non-empty segments.
///
/// Parsing stops after the first segment that starts with `*`; anything following it
/// is dropped.
///
/// # Examples
///
/// ```
/// use rttp_router::router::parse_pattern;
///
/// assert_eq!(parse_pattern("/users/:id/"), vec!["users", ":id"]);
/// assert_eq!(parse_pattern("/static/*path/ignored"), vec!["static", "*path"]);
/// assert!(parse_pattern("/").is_empty());
/// ```
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

/// The handler-table key for a method/pattern pair.
pub fn route_key(method: &Method, pattern: &str) -> String {
    format!("{method}-{pattern}")
}

// Reject patterns that would lose segments to wildcard truncation.
fn validate_pattern(pattern: &str) -> Result<(), RouteError> {
    let mut segments = pattern.split('/').filter(|s| !s.is_empty());
    if segments.any(|s| s.starts_with('*')) && segments.next().is_some() {
        return Err(RouteError::WildcardNotLast {
            pattern: pattern.to_owned(),
        });
    }
    Ok(())
}

/// HTTP request router backed by per-method segment tries.
///
/// # Examples
///
/// ```
/// use rttp_router::{Context, Method, Router, StatusCode};
///
/// let mut router = Router::new();
/// router.get("/users/:id", |ctx: &mut Context| {
///     let id = ctx.param("id").unwrap_or("unknown").to_owned();
///     ctx.string(StatusCode::Ok, id);
/// })?;
///
/// let mut ctx = Context::new(Method::Get, "/users/42");
/// router.handle(&mut ctx);
/// assert_eq!(ctx.response().body_str(), Some("42"));
/// # Ok::<(), rttp_router::RouteError>(())
/// ```
#[derive(Clone, Default)]
pub struct Router {
    roots: HashMap<Method, Node>,
    handlers: HashMap<String, Handler>,
}

impl Router {
    /// Create a new, empty `Router` with no registered routes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rttp_router::Router;
    ///
    /// let router = Router::new();
    /// assert!(router.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// Registering the same method and pattern again replaces the earlier handler.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::WildcardNotLast`] if a `*` segment is followed by further
    /// segments. The router is left unchanged.
    pub fn add_route<F>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        validate_pattern(pattern)?;

        let parts = parse_pattern(pattern);
        let key = route_key(&method, pattern);
        debug!(method = %method, pattern, "route registered");

        self.roots
            .entry(method)
            .or_default()
            .insert(pattern, &parts, 0);
        self.handlers.insert(key, Arc::new(handler));
        Ok(())
    }

    /// Register a handler for `GET` requests matching `pattern`.
    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::Get, pattern, handler)
    }

    /// Register a handler for `POST` requests matching `pattern`.
    pub fn post<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::Post, pattern, handler)
    }

    /// Register a handler for `PUT` requests matching `pattern`.
    pub fn put<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::Put, pattern, handler)
    }

    /// Register a handler for `DELETE` requests matching `pattern`.
    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::Delete, pattern, handler)
    }

    /// Register a handler for `PATCH` requests matching `pattern`.
    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::Patch, pattern, handler)
    }

    /// Register a handler for `HEAD` requests matching `pattern`.
    pub fn head<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::Head, pattern, handler)
    }

    /// Register a handler for `OPTIONS` requests matching `pattern`.
    pub fn options<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::Options, pattern, handler)
    }

    /// Find the route matching `method` and `path`, with its bound parameters.
    ///
    /// Returns `None` when the method has no routes or no pattern matches. On success
    /// the parameter map is present even if empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rttp_router::{Method, Router};
    ///
    /// let mut router = Router::new();
    /// router.get("/user/:name/*action", |_ctx| {})?;
    ///
    /// let path = "/user/alice/delete/confirm";
    /// let (node, params) = router.get_route(&Method::Get, path).unwrap();
    /// assert_eq!(node.pattern(), "/user/:name/*action");
    /// assert_eq!(params.get("name"), Some("alice"));
    /// assert_eq!(params.get("action"), Some("delete/confirm"));
    /// # Ok::<(), rttp_router::RouteError>(())
    /// ```
    pub fn get_route(&self, method: &Method, path: &str) -> Option<(&Node, Params)> {
        let search_parts = parse_pattern(path);
        let root = self.roots.get(method)?;
        let node = root.search(&search_parts, 0)?;

        let mut params = Params::new();
        for (index, part) in parse_pattern(node.pattern()).into_iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if let Some(value) = search_parts.get(index) {
                    params.insert(name, *value);
                }
            } else if let Some(name) = part.strip_prefix('*') {
                if !name.is_empty() {
                    let rest = search_parts.get(index..).unwrap_or_default();
                    params.insert(name, rest.join("/"));
                }
                break;
            }
        }

        Some((node, params))
    }

    /// Every registered node under `method`, depth-first.
    pub fn get_routes(&self, method: &Method) -> Vec<&Node> {
        let mut nodes = Vec::new();
        if let Some(root) = self.roots.get(method) {
            root.travel(&mut nodes);
        }
        nodes
    }

    /// Every registered route across all methods, methods ordered by name.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut methods: Vec<&Method> = self.roots.keys().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        methods
            .into_iter()
            .flat_map(|method| {
                self.get_routes(method).into_iter().map(move |node| RouteInfo {
                    method: method.to_string(),
                    pattern: node.pattern().to_owned(),
                })
            })
            .collect()
    }

    /// Return the number of distinct method/pattern pairs registered.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Return `true` if no routes have been registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch `ctx` to the matching handler.
    ///
    /// On a match the bound parameters are stored in the context before the handler
    /// runs. Otherwise the context receives a `404` with body `404 NOT FOUND: {path}\n`.
    pub fn handle(&self, ctx: &mut Context) {
        let matched = self
            .get_route(ctx.method(), ctx.path())
            .and_then(|(node, params)| {
                let key = route_key(ctx.method(), node.pattern());
                self.handlers
                    .get(&key)
                    .map(|handler| (node.pattern(), handler, params))
            });

        match matched {
            Some((pattern, handler, params)) => {
                debug!(
                    method = %ctx.method(),
                    path = %ctx.path(),
                    pattern,
                    "dispatching request"
                );
                ctx.set_params(params);
                handler(ctx);
            }
            None => {
                debug!(method = %ctx.method(), path = %ctx.path(), "no route matched");
                let body = format!("404 NOT FOUND: {}\n", ctx.path());
                ctx.string(StatusCode::NotFound, body);
            }
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("Router")
            .field("roots", &self.roots)
            .field("handlers", &keys)
            .finish()
    }
}
