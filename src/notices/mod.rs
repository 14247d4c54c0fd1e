use crate::error::{ClientError, TransitionError};
use leptos::prelude::*;
use leptos_dom::helpers::set_timeout;
use std::time::Duration;

/// Older notices are dropped past this many.
const MAX_VISIBLE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum NoticeLevel {
    #[strum(serialize = "success")]
    Success,
    #[strum(serialize = "error")]
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Non-blocking toast queue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Notices {
    items: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.items.push(Notice {
            id: self.next_id,
            level,
            message: message.into(),
        });
        if self.items.len() > MAX_VISIBLE {
            let overflow = self.items.len() - MAX_VISIBLE;
            self.items.drain(..overflow);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }
}

/// App-wide handle for raising notices. Each notice dismisses itself after
/// the configured delay.
#[derive(Clone, Copy)]
pub(crate) struct NoticeCenter {
    pub notices: RwSignal<Notices>,
    timeout_ms: u32,
}

impl NoticeCenter {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            notices: RwSignal::new(Notices::default()),
            timeout_ms,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    /// Shows a failed action. Nothing is shown when the view that started it
    /// has gone away.
    pub fn report(&self, err: &ClientError) {
        if matches!(err, ClientError::Transition(TransitionError::ViewClosed)) {
            return;
        }
        tracing::debug!(error = %err, "reporting failure");
        self.error(err.to_string());
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|n| n.dismiss(id));
    }

    fn push(&self, level: NoticeLevel, message: String) {
        let Some(id) = self.notices.try_update(|n| n.push(level, message)) else {
            return;
        };
        // Zero keeps notices until dismissed.
        if self.timeout_ms == 0 {
            return;
        }
        let notices = self.notices;
        set_timeout(
            move || {
                notices.try_update(|n| n.dismiss(id));
            },
            Duration::from_millis(u64::from(self.timeout_ms)),
        );
    }
}
