mod note;
mod notebook;

pub(crate) use note::{diff_note, EditBuffer, NoteDraft};
pub(crate) use notebook::NotebookDraft;

use crate::error::{Field, ValidationError};

pub(crate) const NOTEBOOK_TITLE_MAX: usize = 100;
pub(crate) const NOTEBOOK_DESCRIPTION_MAX: usize = 500;
pub(crate) const NOTE_TITLE_MAX: usize = 200;

/// Trims a title and checks it is non-empty and within `max` characters.
pub(crate) fn validate_title(raw: &str, max: usize) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::Required {
            field: Field::Title,
        });
    }
    check_len(Field::Title, title, max)?;
    Ok(title.to_string())
}

fn check_len(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    // Bounds count characters, not bytes.
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}
