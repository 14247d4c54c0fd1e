use super::{validate_title, NOTE_TITLE_MAX};
use crate::error::ValidationError;
use crate::models::{CreateNoteRequest, Note, NotePatch};

/// Splits comma-separated tag input. Entries are trimmed and blanks dropped;
/// order and duplicates are kept.
pub(crate) fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Editable shadow of a note while the editor is open.
///
/// Tags are kept as the raw comma-separated text the user is typing and
/// parsed when the buffer is diffed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EditBuffer {
    pub title: String,
    pub content: String,
    pub tags_input: String,
}

impl EditBuffer {
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags_input: format_tags(&note.tags),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        parse_tags(&self.tags_input)
    }
}

/// Validates the buffer and returns only the fields that differ from `note`.
///
/// An empty patch means nothing changed. Tags compare as a whole ordered
/// sequence.
pub(crate) fn diff_note(buffer: &EditBuffer, note: &Note) -> Result<NotePatch, ValidationError> {
    let title = validate_title(&buffer.title, NOTE_TITLE_MAX)?;
    let tags = buffer.tags();

    Ok(NotePatch {
        title: (title != note.title).then_some(title),
        content: (buffer.content != note.content).then(|| buffer.content.clone()),
        tags: (tags != note.tags).then_some(tags),
    })
}

/// Form state of the create-note dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags_input: String,
}

impl NoteDraft {
    pub fn to_request(&self) -> Result<CreateNoteRequest, ValidationError> {
        Ok(CreateNoteRequest {
            title: validate_title(&self.title, NOTE_TITLE_MAX)?,
            content: self.content.clone(),
            tags: parse_tags(&self.tags_input),
        })
    }
}
