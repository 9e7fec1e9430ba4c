//! Hot-reloadable router handle.
//!
//! [`Router`] itself has no internal locking: it is built once and then only read.
//! [`SharedRouter`] lets routes change while requests are being served by publishing
//! whole router snapshots through an [`ArcSwap`]. Readers dispatch against whichever
//! snapshot was current when they started and never block; writers build the next
//! snapshot off to the side and swap it in atomically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tracing::info;

use super::{RouteError, Router};
use crate::context::Context;

/// A [`Router`] that can be replaced or extended while shared across threads.
///
/// # Examples
///
/// ```
/// use rttp_router::{Context, Method, Router, SharedRouter, StatusCode};
///
/// let shared = SharedRouter::new(Router::new());
/// shared.update(|router| {
///     router.get("/ping", |ctx: &mut Context| ctx.string(StatusCode::Ok, "pong"))
/// })?;
///
/// let mut ctx = Context::new(Method::Get, "/ping");
/// shared.handle(&mut ctx);
/// assert_eq!(ctx.response().body_str(), Some("pong"));
/// assert_eq!(shared.epoch(), 1);
/// # Ok::<(), rttp_router::RouteError>(())
/// ```
pub struct SharedRouter {
    epoch: AtomicU64,
    current: ArcSwap<Router>,
    // Serializes writers so concurrent `update` calls never drop each other's routes.
    writer: Mutex<()>,
}

impl SharedRouter {
    /// Wrap `router` as the initial snapshot, at epoch zero.
    pub fn new(router: Router) -> Self {
        Self {
            epoch: AtomicU64::new(0),
            current: ArcSwap::new(Arc::new(router)),
            writer: Mutex::new(()),
        }
    }

    /// The router currently serving requests.
    ///
    /// The returned `Arc` stays valid after later swaps; it simply stops being current.
    pub fn snapshot(&self) -> Arc<Router> {
        self.current.load_full()
    }

    /// Number of snapshots published since construction.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Dispatch `ctx` against the current snapshot.
    pub fn handle(&self, ctx: &mut Context) {
        self.current.load().handle(ctx);
    }

    /// Publish `router` as the new snapshot.
    pub fn replace(&self, router: Router) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.publish(router);
    }

    /// Copy the current router, apply `f`, and publish the result.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns. On error nothing is published and the current
    /// snapshot and epoch are untouched.
    pub fn update<F>(&self, f: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut Router) -> Result<(), RouteError>,
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = Router::clone(&self.current.load());
        f(&mut next)?;
        self.publish(next);
        Ok(())
    }

    fn publish(&self, router: Router) {
        let routes = router.len();
        self.current.store(Arc::new(router));
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        info!(epoch, routes, "router snapshot swapped");
    }
}

impl Default for SharedRouter {
    fn default() -> Self {
        Self::new(Router::new())
    }
}

impl From<Router> for SharedRouter {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::http::{Method, StatusCode};

    fn ok(ctx: &mut Context) {
        ctx.string(StatusCode::Ok, "ok");
    }

    fn status(shared: &SharedRouter, path: &str) -> StatusCode {
        let mut ctx = Context::new(Method::Get, path);
        shared.handle(&mut ctx);
        ctx.response().status()
    }

    #[test]
    fn update_publishes_new_routes() {
        let shared = SharedRouter::default();
        assert_eq!(status(&shared, "/a"), StatusCode::NotFound);

        shared.update(|r| r.get("/a", ok)).unwrap();
        assert_eq!(status(&shared, "/a"), StatusCode::Ok);
        assert_eq!(shared.epoch(), 1);
    }

    #[test]
    fn failed_update_leaves_snapshot_untouched() {
        let shared = SharedRouter::default();
        shared.update(|r| r.get("/a", ok)).unwrap();

        let err = shared.update(|r| {
            r.get("/b", ok)?;
            r.get("/c/*x/y", ok)
        });
        assert!(matches!(err, Err(RouteError::WildcardNotLast { .. })));
        assert_eq!(shared.epoch(), 1);
        assert_eq!(shared.snapshot().len(), 1);
        assert_eq!(status(&shared, "/b"), StatusCode::NotFound);
    }

    #[test]
    fn old_snapshot_survives_swap() {
        let mut initial = Router::new();
        initial.get("/old", ok).unwrap();
        let shared = SharedRouter::from(initial);
        let before = shared.snapshot();

        shared.replace(Router::new());
        assert_eq!(before.len(), 1);
        assert!(shared.snapshot().is_empty());
        assert_eq!(status(&shared, "/old"), StatusCode::NotFound);
    }

    #[test]
    fn concurrent_updates_are_all_kept() {
        let shared = Arc::new(SharedRouter::default());
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    shared
                        .update(|r| r.get(&format!("/worker/{i}"), ok))
                        .unwrap();
                    status(&shared, "/worker/0")
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(shared.epoch(), 8);
        assert_eq!(shared.snapshot().len(), 8);
        for i in 0..8 {
            assert_eq!(status(&shared, &format!("/worker/{i}")), StatusCode::Ok);
        }
    }
}
