//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Slices stay small and are mutated only through the pure transition
//!   functions in their own modules; components reduce, never poke fields.
//! - The query cache is deliberately NOT a slice: its interior mutability
//!   and waiter channels live in `services::query`, outside render diffing.

use crate::core::auth::SessionSlice;
use crate::core::reader::{ReaderPreferences, ReadingProgressState};
use yewdux::store::Store;

/// Toasts kept on screen at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 4;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Authentication and hydration state.
    pub session: SessionSlice,
    /// Reader display preferences, persisted on change.
    pub reader: ReaderPreferences,
    /// Per-series reading positions, persisted on change.
    pub progress: ReadingProgressState,
    /// Transient notification queue.
    pub toasts: ToastState,
}

/// Visual flavor of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Neutral notice.
    Info,
    /// Confirmed action.
    Success,
    /// Failed action.
    Error,
}

/// One queued notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Monotonic identifier, used as the render key and for dismissal.
    pub id: u64,
    /// Visual flavor.
    pub kind: ToastKind,
    /// Message shown to the user.
    pub message: String,
}

/// Bounded queue of notifications.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastState {
    /// Oldest first.
    pub items: Vec<Toast>,
    next_id: u64,
}

impl ToastState {
    /// Queue a toast, dropping the oldest once [`MAX_TOASTS`] is reached.
    /// Returns the new toast's id.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        if self.items.len() > MAX_TOASTS {
            self.items.remove(0);
        }
        id
    }

    /// Remove one toast by id; unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_TOASTS, ToastKind, ToastState};

    #[test]
    fn push_caps_queue_dropping_oldest() {
        let mut toasts = ToastState::default();
        for n in 0..=MAX_TOASTS {
            toasts.push(ToastKind::Info, format!("toast {n}"));
        }
        assert_eq!(toasts.items.len(), MAX_TOASTS);
        assert_eq!(toasts.items[0].message, "toast 1");
    }

    #[test]
    fn dismiss_removes_only_target() {
        let mut toasts = ToastState::default();
        let first = toasts.push(ToastKind::Success, "saved");
        let second = toasts.push(ToastKind::Error, "failed");
        toasts.dismiss(first);
        assert_eq!(toasts.items.len(), 1);
        assert_eq!(toasts.items[0].id, second);
        // Unknown ids are a no-op.
        toasts.dismiss(99);
        assert_eq!(toasts.items.len(), 1);
    }
}
