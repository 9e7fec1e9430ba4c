//! # rttp-router
//!
//! Trie-based request routing for HTTP-style `(method, path)` pairs, with `:name`
//! parameters and trailing `*name` wildcards.
//!
//! ## Quick Start
//!
//! ```rust
//! use rttp_router::{Context, Method, Router, StatusCode};
//!
//! let mut router = Router::new();
//! router.get("/", |ctx: &mut Context| ctx.string(StatusCode::Ok, "Hello, World!"))?;
//! router.get("/assets/*filepath", |ctx: &mut Context| {
//!     let file = ctx.param("filepath").unwrap_or_default().to_owned();
//!     ctx.string(StatusCode::Ok, file);
//! })?;
//!
//! let mut ctx = Context::new(Method::Get, "/assets/css/site.css");
//! router.handle(&mut ctx);
//! assert_eq!(ctx.response().body_str(), Some("css/site.css"));
//! # Ok::<(), rttp_router::RouteError>(())
//! ```

pub mod context;
pub mod http;
pub mod router;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use context::{Context, Params};
pub use http::{Method, Response, StatusCode};
pub use router::{Handler, Node, RouteError, RouteInfo, Router, SharedRouter};
