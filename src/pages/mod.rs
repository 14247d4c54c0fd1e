mod notebook;
mod notebooks;

pub use notebook::NotebookPage;
pub use notebooks::NotebooksPage;

use crate::dom::OverlayScope;
use crate::error::ClientError;
use crate::notices::NoticeCenter;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Holds an [`OverlayScope`] for as long as `active` reports true, and
/// releases it when the owning page unmounts.
pub(crate) fn bind_overlay_scope(
    active: impl Fn() -> bool + 'static,
    on_escape: impl Fn() + Clone + Send + Sync + 'static,
) {
    let slot: StoredValue<Option<OverlayScope>> = StoredValue::new(None);

    Effect::new(move |_| {
        let wanted = active();
        slot.update_value(|scope| match (wanted, scope.is_some()) {
            (true, false) => *scope = Some(OverlayScope::acquire(on_escape.clone())),
            (false, true) => *scope = None,
            _ => {}
        });
    });

    on_cleanup(move || {
        slot.try_update_value(|scope| {
            scope.take();
        });
    });
}

/// Reports an action failure unless it is a form validation problem,
/// which the form already shows next to the field.
pub(crate) fn report_unless_inline(notices: NoticeCenter, err: &ClientError) {
    match err.field() {
        None => notices.report(err),
        Some(field) => tracing::debug!(%field, error = %err, "validation error shown inline"),
    }
}

/// Enter in a single-line field submits the surrounding dialog; textareas
/// keep their newline.
pub(crate) fn is_enter_in_text_input(ev: &web_sys::KeyboardEvent) -> bool {
    ev.key() == "Enter"
        && ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .is_some()
}
