mod detail;
mod list;
mod load;
mod session;

pub(crate) use detail::{
    create_note, delete_note, load_notebook, save_note, NotebookPageState, SaveOutcome,
};
pub(crate) use list::{create_notebook, delete_notebook, load_notebooks, NotebookListState};
pub(crate) use load::{FetchMode, Presentation};
pub(crate) use session::{ModalForm, ModalKind, NoteView};

use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::error::TransitionError;
use crate::notices::NoticeCenter;
use leptos::prelude::*;

/// Somewhere a page's state lives while async work runs against it.
///
/// Both methods return `None` once the owning view is gone, so completions
/// that arrive late are dropped instead of touching disposed state.
pub(crate) trait StateCell<T> {
    fn apply<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;

    fn try_apply<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, TransitionError> {
        self.apply(f).ok_or(TransitionError::ViewClosed)
    }
}

impl<T: Send + Sync + 'static> StateCell<T> for RwSignal<T> {
    fn apply<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.try_update(f)
    }
}

#[cfg(test)]
impl<T> StateCell<T> for std::rc::Rc<std::cell::RefCell<T>> {
    fn apply<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,
    pub api_client: ApiClient,
    pub notices: NoticeCenter,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        Self {
            api_client: ApiClient::from_config(&config),
            notices: NoticeCenter::new(config.notice_timeout_ms),
            config,
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
