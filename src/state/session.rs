use crate::api::ApiError;
use crate::cache::EntityCache;
use crate::drafts::{diff_note, EditBuffer, NoteDraft, NotebookDraft};
use crate::error::{ClientError, TransitionError};
use crate::models::{CreateNoteRequest, CreateNotebookRequest, Note, NotePatch};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Page {
    NotebookList,
    NotebookDetail,
}

/// Which note, if any, is open in the viewer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum NoteView {
    #[default]
    Idle,
    Viewing {
        note_id: String,
    },
    Editing {
        note_id: String,
        buffer: EditBuffer,
    },
}

impl NoteView {
    pub fn note_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Viewing { note_id } | Self::Editing { note_id, .. } => Some(note_id.as_str()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ModalKind {
    CreateNotebook,
    CreateNote,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ModalForm {
    Notebook(NotebookDraft),
    Note(NoteDraft),
}

/// A creation dialog layered over the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Modal {
    pub form: ModalForm,
    pub submitting: bool,
    pub error: Option<ClientError>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SaveStep {
    /// The buffer matches the note; the editor closed without a request.
    Unchanged,
    Send(NotePatch),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CreateRequest {
    Notebook(CreateNotebookRequest),
    Note(CreateNoteRequest),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EscapeOutcome {
    ClosedModal,
    CancelledEdit,
    ClosedViewer,
    Ignored,
}

/// Interaction state of one page: the note viewer/editor and the creation
/// dialog, plus the in-flight flags that gate duplicate submissions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    page: Page,
    view: NoteView,
    modal: Option<Modal>,
    saving: bool,
    deleting: Option<String>,
    editor_error: Option<ClientError>,
}

impl Session {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            view: NoteView::Idle,
            modal: None,
            saving: false,
            deleting: None,
            editor_error: None,
        }
    }

    pub fn view(&self) -> &NoteView {
        &self.view
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn editor_error(&self) -> Option<&ClientError> {
        self.editor_error.as_ref()
    }

    pub fn selected_note_id(&self) -> Option<&str> {
        self.view.note_id()
    }

    /// True while the viewer, editor, or a dialog covers the page.
    pub fn needs_overlay(&self) -> bool {
        self.modal.is_some() || self.view != NoteView::Idle
    }

    pub fn open_note(&mut self, note: &Note) -> Result<(), TransitionError> {
        if self.modal.is_some() {
            return Err(TransitionError::ModalOpen);
        }
        if matches!(self.view, NoteView::Editing { .. }) {
            return Err(TransitionError::EditInProgress);
        }
        self.view = NoteView::Viewing {
            note_id: note.id.clone(),
        };
        self.editor_error = None;
        Ok(())
    }

    /// Closes the viewer, discarding any unsaved edits.
    pub fn close_note(&mut self) {
        self.view = NoteView::Idle;
        self.editor_error = None;
    }

    pub fn start_edit(&mut self, note: &Note) -> Result<(), TransitionError> {
        match &self.view {
            NoteView::Idle => Err(TransitionError::NoNoteSelected),
            NoteView::Editing { .. } => Ok(()),
            NoteView::Viewing { note_id } if *note_id != note.id => {
                Err(TransitionError::NotLoaded(note.id.clone()))
            }
            NoteView::Viewing { .. } => {
                self.view = NoteView::Editing {
                    note_id: note.id.clone(),
                    buffer: EditBuffer::from_note(note),
                };
                self.editor_error = None;
                Ok(())
            }
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match &mut self.view {
            NoteView::Editing { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn cancel_edit(&mut self) -> Result<(), TransitionError> {
        if self.saving {
            return Err(TransitionError::SaveInFlight);
        }
        match &self.view {
            NoteView::Editing { note_id, .. } => {
                self.view = NoteView::Viewing {
                    note_id: note_id.clone(),
                };
                self.editor_error = None;
                Ok(())
            }
            _ => Err(TransitionError::NotEditing),
        }
    }

    /// Validates the buffer against `note`. Invalid input keeps the editor
    /// open with the error recorded; an unchanged buffer closes the editor.
    pub fn begin_save(&mut self, note: &Note) -> Result<SaveStep, ClientError> {
        if self.saving {
            return Err(TransitionError::SaveInFlight.into());
        }
        let NoteView::Editing { note_id, buffer } = &self.view else {
            return Err(TransitionError::NotEditing.into());
        };
        if *note_id != note.id {
            return Err(TransitionError::NotLoaded(note.id.clone()).into());
        }

        let patch = match diff_note(buffer, note) {
            Ok(patch) => patch,
            Err(e) => {
                tracing::debug!(note_id = %note.id, field = %e.field(), error = %e, "save rejected by validation");
                let err = ClientError::from(e);
                self.editor_error = Some(err.clone());
                return Err(err);
            }
        };

        self.editor_error = None;
        if patch.is_empty() {
            self.view = NoteView::Viewing {
                note_id: note_id.clone(),
            };
            return Ok(SaveStep::Unchanged);
        }
        self.saving = true;
        Ok(SaveStep::Send(patch))
    }

    pub fn finish_save(&mut self, result: Result<(), ApiError>) {
        self.saving = false;
        match result {
            Ok(()) => {
                if let NoteView::Editing { note_id, .. } = &self.view {
                    self.view = NoteView::Viewing {
                        note_id: note_id.clone(),
                    };
                }
            }
            Err(e) => {
                if matches!(self.view, NoteView::Editing { .. }) {
                    self.editor_error = Some(e.into());
                }
            }
        }
    }

    /// Starts deleting the open note. The viewer closes at once; it comes
    /// back through [`Session::finish_delete_note`] if the delete fails.
    pub fn begin_delete_note(&mut self) -> Result<String, TransitionError> {
        if self.deleting.is_some() {
            return Err(TransitionError::DeleteInFlight);
        }
        if self.saving {
            return Err(TransitionError::SaveInFlight);
        }
        let note_id = match &self.view {
            NoteView::Viewing { note_id } => note_id.clone(),
            NoteView::Editing { .. } => return Err(TransitionError::EditInProgress),
            NoteView::Idle => return Err(TransitionError::NoNoteSelected),
        };
        self.view = NoteView::Idle;
        self.deleting = Some(note_id.clone());
        Ok(note_id)
    }

    pub fn finish_delete_note(&mut self, succeeded: bool) {
        let Some(note_id) = self.deleting.take() else {
            return;
        };
        if !succeeded && self.view == NoteView::Idle && self.modal.is_none() {
            self.view = NoteView::Viewing { note_id };
        }
    }

    pub fn open_modal(&mut self, kind: ModalKind) -> Result<(), TransitionError> {
        let form = match (kind, self.page) {
            (ModalKind::CreateNotebook, Page::NotebookList) => {
                ModalForm::Notebook(NotebookDraft::default())
            }
            (ModalKind::CreateNote, Page::NotebookDetail) => ModalForm::Note(NoteDraft::default()),
            _ => return Err(TransitionError::WrongPage),
        };
        if self.modal.is_some() {
            return Err(TransitionError::ModalOpen);
        }
        self.modal = Some(Modal {
            form,
            submitting: false,
            error: None,
        });
        Ok(())
    }

    pub fn close_modal(&mut self) -> Result<(), TransitionError> {
        match &self.modal {
            None => Err(TransitionError::NoModal),
            Some(m) if m.submitting => Err(TransitionError::CreateInFlight),
            Some(_) => {
                self.modal = None;
                Ok(())
            }
        }
    }

    pub fn begin_create(&mut self) -> Result<CreateRequest, ClientError> {
        let modal = self.modal.as_mut().ok_or(TransitionError::NoModal)?;
        if modal.submitting {
            return Err(TransitionError::CreateInFlight.into());
        }

        let request = match &modal.form {
            ModalForm::Notebook(d) => d.to_request().map(CreateRequest::Notebook),
            ModalForm::Note(d) => d.to_request().map(CreateRequest::Note),
        };
        match request {
            Ok(req) => {
                modal.submitting = true;
                modal.error = None;
                Ok(req)
            }
            Err(e) => {
                tracing::debug!(field = %e.field(), error = %e, "create rejected by validation");
                let err = ClientError::from(e);
                modal.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Success closes the dialog; failure keeps it open with the draft intact.
    pub fn finish_create(&mut self, result: Result<(), ApiError>) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        modal.submitting = false;
        match result {
            Ok(()) => self.modal = None,
            Err(e) => modal.error = Some(e.into()),
        }
    }

    /// Innermost overlay first: dialog, then edit mode, then the viewer.
    pub fn escape(&mut self) -> EscapeOutcome {
        if self.modal.is_some() {
            return match self.close_modal() {
                Ok(()) => EscapeOutcome::ClosedModal,
                Err(_) => EscapeOutcome::Ignored,
            };
        }
        match self.view {
            NoteView::Editing { .. } => match self.cancel_edit() {
                Ok(()) => EscapeOutcome::CancelledEdit,
                Err(_) => EscapeOutcome::Ignored,
            },
            NoteView::Viewing { .. } => {
                self.close_note();
                EscapeOutcome::ClosedViewer
            }
            NoteView::Idle => EscapeOutcome::Ignored,
        }
    }

    /// Drops the selection when a refresh no longer contains the open note.
    pub fn reconcile(&mut self, cache: &EntityCache) {
        if let Some(id) = self.view.note_id() {
            if cache.note(id).is_none() {
                tracing::debug!(note_id = id, "open note vanished after refresh");
                self.close_note();
            }
        }
    }
}
