use super::load::{present, Fetch, FetchMode, Presentation};
use super::session::{CreateRequest, Page, SaveStep, Session};
use super::StateCell;
use crate::api::{ApiError, RemoteStore};
use crate::cache::{EntityCache, Snapshot};
use crate::error::{ClientError, TransitionError};
use crate::models::{Note, Notebook};
use crate::mutation::DeleteController;

/// Everything a notebook page shows: the notebook with its notes, the open
/// note, and the create-note dialog.
#[derive(Clone, Debug)]
pub(crate) struct NotebookPageState {
    pub notebook_id: String,
    pub cache: EntityCache,
    pub fetch: Fetch,
    pub deletes: DeleteController,
    pub session: Session,
}

impl NotebookPageState {
    pub fn new(notebook_id: impl Into<String>) -> Self {
        Self {
            notebook_id: notebook_id.into(),
            cache: EntityCache::default(),
            fetch: Fetch::default(),
            deletes: DeleteController::default(),
            session: Session::new(Page::NotebookDetail),
        }
    }

    pub fn notebook(&self) -> Option<&Notebook> {
        self.cache.notebook()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.session
            .selected_note_id()
            .and_then(|id| self.cache.note(id))
    }

    pub fn presentation(&self) -> Presentation {
        present(&self.fetch, &self.cache)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    Unchanged,
    Saved,
}

pub(crate) async fn load_notebook<S: RemoteStore>(
    store: &S,
    cell: &impl StateCell<NotebookPageState>,
    mode: FetchMode,
) -> Result<(), ClientError> {
    let (ticket, notebook_id) = cell.try_apply(|s| (s.fetch.begin(mode), s.notebook_id.clone()))?;
    let result = store.get_notebook(&notebook_id).await;

    cell.try_apply(move |s| -> Result<(), ApiError> {
        if s.notebook_id != notebook_id {
            tracing::debug!(requested = %notebook_id, current = %s.notebook_id, "response for a previous route ignored");
            return Ok(());
        }
        if !s.fetch.settle(ticket, &result) {
            return Ok(());
        }
        let notebook = result?;
        tracing::debug!(id = %notebook.id, notes = notebook.notes.len(), "notebook loaded");
        s.cache.replace(Snapshot::Notebook(notebook));
        s.session.reconcile(&s.cache);
        Ok(())
    })?
    .map_err(ClientError::Api)
}

/// Submits the create-note dialog, then refetches the notebook.
pub(crate) async fn create_note<S: RemoteStore>(
    store: &S,
    cell: &impl StateCell<NotebookPageState>,
) -> Result<Note, ClientError> {
    let (request, notebook_id) = cell.try_apply(|s| {
        s.session
            .begin_create()
            .map(|r| (r, s.notebook_id.clone()))
    })??;
    let CreateRequest::Note(req) = request else {
        return Err(TransitionError::WrongPage.into());
    };

    let result = store.create_note(&notebook_id, &req).await;
    let settled = result.as_ref().map(|_| ()).map_err(Clone::clone);
    cell.try_apply(|s| s.session.finish_create(settled))?;
    let note = result?;
    tracing::info!(notebook_id, note_id = %note.id, "note created");

    load_notebook(store, cell, FetchMode::Background).await?;
    Ok(note)
}

/// Sends only the fields the editor changed. The server does not echo the
/// note back, so the notebook is refetched before the editor closes.
pub(crate) async fn save_note<S: RemoteStore>(
    store: &S,
    cell: &impl StateCell<NotebookPageState>,
) -> Result<SaveOutcome, ClientError> {
    let (step, notebook_id, note_id) = cell.try_apply(|s| -> Result<_, ClientError> {
        let note_id = s
            .session
            .selected_note_id()
            .ok_or(TransitionError::NoNoteSelected)?
            .to_string();
        let note = s
            .cache
            .note(&note_id)
            .cloned()
            .ok_or_else(|| TransitionError::NotLoaded(note_id.clone()))?;
        let step = s.session.begin_save(&note)?;
        Ok((step, s.notebook_id.clone(), note_id))
    })??;

    let patch = match step {
        SaveStep::Unchanged => {
            tracing::debug!(note_id, "no changes, nothing sent");
            return Ok(SaveOutcome::Unchanged);
        }
        SaveStep::Send(patch) => patch,
    };

    if let Err(e) = store.update_note(&notebook_id, &note_id, &patch).await {
        cell.try_apply(|s| s.session.finish_save(Err(e.clone())))?;
        return Err(e.into());
    }
    tracing::info!(note_id, "note updated");

    let refreshed = load_notebook(store, cell, FetchMode::Background).await;
    cell.try_apply(|s| s.session.finish_save(Ok(())))?;
    refreshed?;
    Ok(SaveOutcome::Saved)
}

/// Deletes the open note. The viewer closes and the row disappears at once;
/// both come back if the server refuses.
pub(crate) async fn delete_note<S: RemoteStore>(
    store: &S,
    cell: &impl StateCell<NotebookPageState>,
) -> Result<(), ClientError> {
    let (pending, notebook_id) = cell.try_apply(|s| -> Result<_, TransitionError> {
        let note_id = s.session.begin_delete_note()?;
        match s.deletes.begin(&mut s.cache, &note_id) {
            Ok(p) => Ok((p, s.notebook_id.clone())),
            Err(e) => {
                s.session.finish_delete_note(false);
                Err(e)
            }
        }
    })??;

    let note_id = pending.id.clone();
    let result = store.delete_note(&notebook_id, &note_id).await;
    cell.try_apply(move |s| {
        let settled = s.deletes.settle(&mut s.cache, pending, result);
        s.session.finish_delete_note(settled.is_ok());
        settled
    })??;
    tracing::info!(notebook_id, note_id, "note deleted");

    load_notebook(store, cell, FetchMode::Background).await
}
