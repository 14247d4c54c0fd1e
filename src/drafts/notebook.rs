use super::{check_len, validate_title, NOTEBOOK_DESCRIPTION_MAX, NOTEBOOK_TITLE_MAX};
use crate::error::{Field, ValidationError};
use crate::models::CreateNotebookRequest;

/// Form state of the create-notebook dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NotebookDraft {
    pub title: String,
    pub description: String,
}

impl NotebookDraft {
    pub fn to_request(&self) -> Result<CreateNotebookRequest, ValidationError> {
        let title = validate_title(&self.title, NOTEBOOK_TITLE_MAX)?;
        let description = self.description.trim();
        check_len(Field::Description, description, NOTEBOOK_DESCRIPTION_MAX)?;

        Ok(CreateNotebookRequest {
            title,
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
        })
    }
}
