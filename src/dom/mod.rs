//! Page-level side effects tied to overlays: body scroll locking and the
//! Escape key listener.

use leptos::ev;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) trait ScrollHost {
    fn set_scroll_locked(&self, locked: bool);
}

/// Reference-counted scroll lock. The host is locked while at least one
/// guard is alive.
pub(crate) struct ScrollLock<H: ScrollHost> {
    host: H,
    holders: AtomicUsize,
}

impl<H: ScrollHost> ScrollLock<H> {
    pub const fn new(host: H) -> Self {
        Self {
            host,
            holders: AtomicUsize::new(0),
        }
    }

    pub fn acquire(&self) -> ScrollGuard<'_, H> {
        if self.holders.fetch_add(1, Ordering::SeqCst) == 0 {
            self.host.set_scroll_locked(true);
        }
        ScrollGuard { lock: self }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

#[must_use = "the lock is released when the guard is dropped"]
pub(crate) struct ScrollGuard<'a, H: ScrollHost> {
    lock: &'a ScrollLock<H>,
}

impl<H: ScrollHost> Drop for ScrollGuard<'_, H> {
    fn drop(&mut self) {
        if self.lock.holders.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.lock.host.set_scroll_locked(false);
        }
    }
}

/// Locks scrolling on `document.body`.
pub(crate) struct BodyScroll;

impl ScrollHost for BodyScroll {
    fn set_scroll_locked(&self, locked: bool) {
        let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        else {
            return;
        };
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if result.is_err() {
            tracing::warn!(locked, "could not update body scroll lock");
        }
    }
}

static BODY_SCROLL: ScrollLock<BodyScroll> = ScrollLock::new(BodyScroll);

/// Everything a page acquires while an overlay is shown. Dropping it
/// unlocks the body and removes the key listener, whichever way the overlay
/// went away.
pub(crate) struct OverlayScope {
    _scroll: ScrollGuard<'static, BodyScroll>,
    keys: Option<WindowListenerHandle>,
}

impl OverlayScope {
    pub fn acquire(on_escape: impl Fn() + Send + Sync + 'static) -> Self {
        let keys = window_event_listener(ev::keydown, move |e: web_sys::KeyboardEvent| {
            if e.key() == "Escape" {
                e.prevent_default();
                on_escape();
            }
        });
        Self {
            _scroll: BODY_SCROLL.acquire(),
            keys: Some(keys),
        }
    }
}

impl Drop for OverlayScope {
    fn drop(&mut self) {
        if let Some(keys) = self.keys.take() {
            keys.remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHost {
        changes: Mutex<Vec<bool>>,
    }

    impl ScrollHost for RecordingHost {
        fn set_scroll_locked(&self, locked: bool) {
            if let Ok(mut c) = self.changes.lock() {
                c.push(locked);
            }
        }
    }

    fn changes(lock: &ScrollLock<RecordingHost>) -> Vec<bool> {
        lock.host.changes.lock().map(|c| c.to_vec()).unwrap_or_default()
    }

    #[test]
    fn test_guard_locks_and_unlocks() {
        let lock = ScrollLock::new(RecordingHost::default());
        {
            let _g = lock.acquire();
            assert!(lock.is_locked());
        }
        assert!(!lock.is_locked());
        assert_eq!(changes(&lock), [true, false]);
    }

    #[test]
    fn test_nested_guards_unlock_once_all_are_dropped() {
        let lock = ScrollLock::new(RecordingHost::default());
        let viewer = lock.acquire();
        let dialog = lock.acquire();
        drop(viewer);
        assert!(lock.is_locked());
        drop(dialog);
        assert!(!lock.is_locked());
        assert_eq!(changes(&lock), [true, false]);
    }

    #[test]
    fn test_guard_released_on_early_exit() {
        fn interrupted(lock: &ScrollLock<RecordingHost>, fail: bool) -> Result<(), &'static str> {
            let _g = lock.acquire();
            if fail {
                return Err("unmounted");
            }
            Ok(())
        }

        let lock = ScrollLock::new(RecordingHost::default());
        assert!(interrupted(&lock, true).is_err());
        assert!(!lock.is_locked());
    }
}
