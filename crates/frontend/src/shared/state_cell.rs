//! Access to screen state from async handlers.
//!
//! Handlers are written against `StateCell` instead of `RwSignal` directly so
//! the same code runs in the browser and in native tests.

use leptos::prelude::*;

pub trait StateCell<T>: Clone + 'static {
    /// `None` when the underlying storage is gone (view torn down).
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>;
}

impl<T: Send + Sync + 'static> StateCell<T> for RwSignal<T> {
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.try_update(f)
    }

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.try_with_untracked(f)
    }
}

#[cfg(test)]
impl<T: 'static> StateCell<T> for std::rc::Rc<std::cell::RefCell<T>> {
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }
}
