//! Teardown-scoped request cancellation.
//!
//! Every request a screen starts is wrapped in an abortable future registered
//! with the screen's `ViewScope`. When the component is cleaned up the scope
//! aborts them, so no callback touches state after the view is gone.

use futures::future::{abortable, AbortHandle};
use leptos::prelude::on_cleanup;
use leptos::task::spawn_local;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ScopeInner {
    disposed: bool,
    handles: Vec<AbortHandle>,
}

#[derive(Clone, Default)]
pub struct ViewScope {
    inner: Arc<Mutex<ScopeInner>>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope disposed together with the current reactive owner.
    pub fn attach() -> Self {
        let scope = Self::new();
        let for_cleanup = scope.clone();
        on_cleanup(move || for_cleanup.dispose());
        scope
    }

    /// Wrap a future; it resolves to `None` if the scope is disposed first.
    pub fn guard<F: Future>(&self, fut: F) -> impl Future<Output = Option<F::Output>> {
        let (fut, handle) = abortable(fut);
        match self.inner.lock() {
            Ok(mut inner) => {
                if inner.disposed {
                    handle.abort();
                } else {
                    inner.handles.retain(|h| !h.is_aborted());
                    inner.handles.push(handle);
                }
            }
            Err(_) => handle.abort(),
        }
        async move { fut.await.ok() }
    }

    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) {
        let guarded = self.guard(fut);
        spawn_local(async move {
            if guarded.await.is_none() {
                log::debug!("request dropped: view disposed");
            }
        });
    }

    pub fn dispose(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.disposed = true;
            for handle in inner.handles.drain(..) {
                handle.abort();
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.lock().map(|inner| inner.disposed).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_guard_passes_result_through() {
        let scope = ViewScope::new();
        assert_eq!(block_on(scope.guard(async { 7 })), Some(7));
    }

    #[test]
    fn test_dispose_aborts_pending_request() {
        let scope = ViewScope::new();
        let pending = scope.guard(futures::future::pending::<()>());
        scope.dispose();
        assert!(scope.is_disposed());
        assert_eq!(block_on(pending), None);
    }

    #[test]
    fn test_guard_after_dispose_never_runs() {
        let scope = ViewScope::new();
        scope.dispose();
        let ran = std::cell::Cell::new(false);
        let result = block_on(scope.guard(async { ran.set(true) }));
        assert_eq!(result, None);
        assert!(!ran.get());
    }
}
