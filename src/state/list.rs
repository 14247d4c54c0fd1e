use super::load::{present, Fetch, FetchMode, Presentation};
use super::session::{CreateRequest, Page, Session};
use super::StateCell;
use crate::api::{ApiError, RemoteStore};
use crate::cache::{EntityCache, Snapshot};
use crate::error::{ClientError, TransitionError};
use crate::models::NotebookSummary;
use crate::mutation::DeleteController;

/// Everything the notebook list page shows.
#[derive(Clone, Debug)]
pub(crate) struct NotebookListState {
    pub cache: EntityCache,
    pub fetch: Fetch,
    pub deletes: DeleteController,
    pub session: Session,
}

impl Default for NotebookListState {
    fn default() -> Self {
        Self {
            cache: EntityCache::default(),
            fetch: Fetch::default(),
            deletes: DeleteController::default(),
            session: Session::new(Page::NotebookList),
        }
    }
}

impl NotebookListState {
    pub fn presentation(&self) -> Presentation {
        present(&self.fetch, &self.cache)
    }
}

pub(crate) async fn load_notebooks<S: RemoteStore>(
    store: &S,
    cell: &impl StateCell<NotebookListState>,
    mode: FetchMode,
) -> Result<(), ClientError> {
    let ticket = cell.try_apply(|s| s.fetch.begin(mode))?;
    let result = store.list_notebooks().await;

    cell.try_apply(move |s| -> Result<(), ApiError> {
        if !s.fetch.settle(ticket, &result) {
            return Ok(());
        }
        let list = result?;
        tracing::debug!(count = list.len(), "notebooks loaded");
        s.cache.replace(Snapshot::List(list));
        Ok(())
    })?
    .map_err(ClientError::Api)
}

/// Submits the open create-notebook dialog, then refreshes the list.
pub(crate) async fn create_notebook<S: RemoteStore>(
    store: &S,
    cell: &impl StateCell<NotebookListState>,
) -> Result<NotebookSummary, ClientError> {
    let CreateRequest::Notebook(req) = cell.try_apply(|s| s.session.begin_create())?? else {
        return Err(TransitionError::WrongPage.into());
    };

    let result = store.create_notebook(&req).await;
    let settled = result.as_ref().map(|_| ()).map_err(Clone::clone);
    cell.try_apply(|s| s.session.finish_create(settled))?;
    let created = result?;
    tracing::info!(id = %created.id, title = %created.title, "notebook created");

    load_notebooks(store, cell, FetchMode::Background).await?;
    Ok(created)
}

/// Optimistically removes a notebook row, rolling it back if the server
/// refuses.
pub(crate) async fn delete_notebook<S: RemoteStore>(
    store: &S,
    cell: &impl StateCell<NotebookListState>,
    notebook_id: &str,
) -> Result<(), ClientError> {
    let pending = cell.try_apply(|s| s.deletes.begin(&mut s.cache, notebook_id))??;

    let result = store.delete_notebook(&pending.id).await;
    cell.try_apply(move |s| s.deletes.settle(&mut s.cache, pending, result))??;

    tracing::info!(id = notebook_id, "notebook deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::{notebook, MemoryStore};
    use crate::state::session::{ModalForm, ModalKind};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (MemoryStore, Rc<RefCell<NotebookListState>>) {
        let store = MemoryStore::with_notebooks(vec![
            notebook("a", "Work", vec![]),
            notebook("b", "Home", vec![]),
        ]);
        (store, Rc::new(RefCell::new(NotebookListState::default())))
    }

    fn titles(cell: &Rc<RefCell<NotebookListState>>) -> Vec<String> {
        cell.borrow()
            .cache
            .notebooks()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    #[test]
    fn test_load_shows_content() {
        let (store, cell) = setup();
        assert_eq!(cell.borrow().presentation(), Presentation::Skeleton);
        block_on(load_notebooks(&store, &cell, FetchMode::Initial)).expect("load");
        assert_eq!(cell.borrow().presentation(), Presentation::Content);
        assert_eq!(titles(&cell), ["Work", "Home"]);
    }

    #[test]
    fn test_load_failure_shows_error_panel_and_retry_recovers() {
        let (store, cell) = setup();
        store.fail_next(ApiError::timeout(10_000));
        assert!(block_on(load_notebooks(&store, &cell, FetchMode::Initial)).is_err());
        assert_eq!(
            cell.borrow().presentation(),
            Presentation::ErrorPanel("Request timed out after 10s".to_string())
        );

        block_on(load_notebooks(&store, &cell, FetchMode::Initial)).expect("retry");
        assert_eq!(cell.borrow().presentation(), Presentation::Content);
    }

    #[test]
    fn test_empty_server_list_is_empty_state() {
        let store = MemoryStore::default();
        let cell = Rc::new(RefCell::new(NotebookListState::default()));
        block_on(load_notebooks(&store, &cell, FetchMode::Initial)).expect("load");
        assert_eq!(cell.borrow().presentation(), Presentation::Empty);
    }

    #[test]
    fn test_create_closes_dialog_and_refreshes() {
        let (store, cell) = setup();
        block_on(load_notebooks(&store, &cell, FetchMode::Initial)).expect("load");

        {
            let mut s = cell.borrow_mut();
            s.session.open_modal(ModalKind::CreateNotebook).expect("open");
            if let Some(ModalForm::Notebook(d)) = s.session.modal_mut().map(|m| &mut m.form) {
                d.title = " Travel ".to_string();
            }
        }
        let created = block_on(create_notebook(&store, &cell)).expect("create");
        assert_eq!(created.title, "Travel");
        assert!(cell.borrow().session.modal().is_none());
        assert_eq!(titles(&cell), ["Travel", "Work", "Home"]);
    }

    #[test]
    fn test_create_with_blank_title_sends_nothing() {
        let (store, cell) = setup();
        cell.borrow_mut()
            .session
            .open_modal(ModalKind::CreateNotebook)
            .expect("open");
        let err = block_on(create_notebook(&store, &cell)).expect_err("invalid");
        assert!(err.field().is_some());
        assert!(store.calls().is_empty());
        assert!(cell.borrow().session.modal().is_some());
    }

    #[test]
    fn test_create_failure_keeps_dialog_open() {
        let (store, cell) = setup();
        {
            let mut s = cell.borrow_mut();
            s.session.open_modal(ModalKind::CreateNotebook).expect("open");
            if let Some(ModalForm::Notebook(d)) = s.session.modal_mut().map(|m| &mut m.form) {
                d.title = "Travel".to_string();
            }
        }
        store.fail_next(ApiError::http(422, r#"{"detail": "title taken"}"#));
        let err = block_on(create_notebook(&store, &cell)).expect_err("rejected");
        assert_eq!(err.to_string(), "title taken");

        let s = cell.borrow();
        let modal = s.session.modal().expect("still open");
        assert!(!modal.submitting);
        assert!(matches!(&modal.form, ModalForm::Notebook(d) if d.title == "Travel"));
    }

    #[test]
    fn test_delete_rolls_back_on_failure() {
        let (store, cell) = setup();
        block_on(load_notebooks(&store, &cell, FetchMode::Initial)).expect("load");

        store.fail_next(ApiError::http(500, ""));
        assert!(block_on(delete_notebook(&store, &cell, "a")).is_err());
        assert_eq!(titles(&cell), ["Work", "Home"]);

        block_on(delete_notebook(&store, &cell, "a")).expect("delete");
        assert_eq!(titles(&cell), ["Home"]);
        assert_eq!(store.notebooks().len(), 1);
    }

    #[test]
    fn test_delete_placeholder_id_never_reaches_server() {
        let store = MemoryStore::default();
        let cell = Rc::new(RefCell::new(NotebookListState::default()));
        cell.borrow_mut()
            .cache
            .replace(Snapshot::List(vec![notebook("undefined", "Ghost", vec![]).summary()]));

        let err = block_on(delete_notebook(&store, &cell, "undefined")).expect_err("guarded");
        assert!(err.is_invalid_reference());
        assert!(store.calls().is_empty());
        assert_eq!(titles(&cell), ["Ghost"]);
    }
}
