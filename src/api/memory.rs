//! In-memory [`RemoteStore`] used by unit tests.

use super::{ensure_ref, ApiError, ApiResult, RemoteStore};
use crate::models::{
    CreateNoteRequest, CreateNotebookRequest, Note, NotePatch, Notebook, NotebookSummary,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Default)]
struct Inner {
    notebooks: Vec<Notebook>,
    calls: Vec<String>,
    failures: VecDeque<ApiError>,
    next_id: u32,
    clock: u32,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn with_notebooks(notebooks: Vec<Notebook>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().notebooks = notebooks;
        store
    }

    /// The next call (of any kind) fails with `err` instead of touching state.
    pub fn fail_next(&self, err: ApiError) {
        self.inner.borrow_mut().failures.push_back(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    pub fn notebooks(&self) -> Vec<Notebook> {
        self.inner.borrow().notebooks.clone()
    }

    fn enter(&self, call: String) -> ApiResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(call);
        match inner.failures.pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        format!("{prefix}{}", inner.next_id)
    }

    fn tick(&self) -> String {
        let mut inner = self.inner.borrow_mut();
        inner.clock += 1;
        format!("2024-06-01T00:00:{:02}", inner.clock)
    }

    fn not_found() -> ApiError {
        ApiError::http(404, r#"{"detail": "Notebook not found"}"#)
    }
}

pub(crate) fn notebook(id: &str, title: &str, notes: Vec<Note>) -> Notebook {
    Notebook {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(String::new()),
        created_at: "2024-05-01T10:00:00".to_string(),
        notes,
    }
}

pub(crate) fn note(id: &str, title: &str, content: &str, tags: &[&str]) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: "2024-05-01T10:00:00".to_string(),
        updated_at: None,
    }
}

impl RemoteStore for MemoryStore {
    async fn list_notebooks(&self) -> ApiResult<Vec<NotebookSummary>> {
        self.enter("GET /notebooks/".to_string())?;
        Ok(self.inner.borrow().notebooks.iter().map(|n| n.summary()).collect())
    }

    async fn get_notebook(&self, notebook_id: &str) -> ApiResult<Notebook> {
        let id = ensure_ref(notebook_id, "notebook")?;
        self.enter(format!("GET /notebooks/{id}"))?;
        self.inner
            .borrow()
            .notebooks
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_notebook(&self, req: &CreateNotebookRequest) -> ApiResult<NotebookSummary> {
        self.enter("POST /notebooks/".to_string())?;
        let nb = Notebook {
            id: self.next_id("nb-"),
            title: req.title.clone(),
            description: req.description.clone(),
            created_at: self.tick(),
            notes: vec![],
        };
        let summary = nb.summary();
        self.inner.borrow_mut().notebooks.insert(0, nb);
        Ok(summary)
    }

    async fn delete_notebook(&self, notebook_id: &str) -> ApiResult<()> {
        let id = ensure_ref(notebook_id, "notebook")?;
        self.enter(format!("DELETE /notebooks/{id}"))?;
        let mut inner = self.inner.borrow_mut();
        let before = inner.notebooks.len();
        inner.notebooks.retain(|n| n.id != id);
        if inner.notebooks.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn create_note(&self, notebook_id: &str, req: &CreateNoteRequest) -> ApiResult<Note> {
        let id = ensure_ref(notebook_id, "notebook")?;
        self.enter(format!("POST /notebooks/{id}/notes/"))?;
        let note = Note {
            id: self.next_id("note-"),
            title: req.title.clone(),
            content: req.content.clone(),
            tags: req.tags.clone(),
            created_at: self.tick(),
            updated_at: None,
        };
        let mut inner = self.inner.borrow_mut();
        let nb = inner
            .notebooks
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(Self::not_found)?;
        nb.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(
        &self,
        notebook_id: &str,
        note_id: &str,
        patch: &NotePatch,
    ) -> ApiResult<()> {
        let nb_id = ensure_ref(notebook_id, "notebook")?;
        let note_id = ensure_ref(note_id, "note")?;
        let body = serde_json::to_string(patch).unwrap_or_default();
        self.enter(format!("PATCH /notebooks/{nb_id}/notes/{note_id} {body}"))?;
        let stamp = self.tick();
        let mut inner = self.inner.borrow_mut();
        let note = inner
            .notebooks
            .iter_mut()
            .find(|n| n.id == nb_id)
            .and_then(|nb| nb.notes.iter_mut().find(|n| n.id == note_id))
            .ok_or_else(Self::not_found)?;
        if let Some(t) = &patch.title {
            note.title = t.clone();
        }
        if let Some(c) = &patch.content {
            note.content = c.clone();
        }
        if let Some(tags) = &patch.tags {
            note.tags = tags.clone();
        }
        note.updated_at = Some(stamp);
        Ok(())
    }

    async fn delete_note(&self, notebook_id: &str, note_id: &str) -> ApiResult<()> {
        let nb_id = ensure_ref(notebook_id, "notebook")?;
        let note_id = ensure_ref(note_id, "note")?;
        self.enter(format!("DELETE /notebooks/{nb_id}/notes/{note_id}"))?;
        let mut inner = self.inner.borrow_mut();
        let nb = inner
            .notebooks
            .iter_mut()
            .find(|n| n.id == nb_id)
            .ok_or_else(Self::not_found)?;
        nb.notes.retain(|n| n.id != note_id);
        Ok(())
    }
}
