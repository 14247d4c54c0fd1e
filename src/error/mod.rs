pub(crate) use crate::api::{ApiError, ApiErrorKind};

/// Editable fields that validation can flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum Field {
    Title,
    Description,
}

/// Client-side input rejection. Never sent to the server.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("{field} is required")]
    Required { field: Field },

    #[error("{field} must be at most {max} characters ({actual} entered)")]
    TooLong {
        field: Field,
        max: usize,
        actual: usize,
    },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::Required { field } | Self::TooLong { field, .. } => *field,
        }
    }
}

/// A session transition that is not allowed from the current state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum TransitionError {
    #[error("a save is already in progress")]
    SaveInFlight,
    #[error("a delete is already in progress")]
    DeleteInFlight,
    #[error("a create request is already in progress")]
    CreateInFlight,
    #[error("no note is open")]
    NoNoteSelected,
    #[error("the note is not being edited")]
    NotEditing,
    #[error("finish or cancel the current edit first")]
    EditInProgress,
    #[error("another dialog is already open")]
    ModalOpen,
    #[error("no dialog is open")]
    NoModal,
    #[error("that dialog is not available on this page")]
    WrongPage,
    #[error("{0} is not loaded on this page")]
    NotLoaded(String),
    #[error("{0} is already being deleted")]
    AlreadyDeleting(String),
    #[error("the view was closed")]
    ViewClosed,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl ClientError {
    /// Validation problems keep the form open with the field flagged.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Validation(v) => Some(v.field()),
            _ => None,
        }
    }

    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::Api(e) if e.kind == ApiErrorKind::InvalidReference)
    }
}
