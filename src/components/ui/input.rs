use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const FIELD_CLASS: &str = "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground border-input w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2 aria-invalid:ring-destructive/20 aria-invalid:border-destructive";

/// Single-line text field.
///
/// The value lives in the caller's state; every keystroke is handed to
/// `on_change` instead of being stored in a signal of its own.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] autofocus: bool,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(into, optional)] invalid: MaybeProp<bool>,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "flex h-9", class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            on_change.run(input.value());
        }
    };

    view! {
        <input
            data-name="Input"
            type="text"
            class=merged_class
            placeholder=placeholder
            id=id
            autofocus=autofocus
            aria-invalid=move || invalid.get().unwrap_or(false).then_some("true")
            disabled=move || disabled.get().unwrap_or(false)
            prop:value=move || value.get()
            on:input=on_input
        />
    }
}

/// Multi-line counterpart of [`Input`].
#[component]
pub fn Textarea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(default = 6)] rows: u32,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "min-h-24 py-2 resize-y", class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        {
            on_change.run(area.value());
        }
    };

    view! {
        <textarea
            data-name="Textarea"
            class=merged_class
            placeholder=placeholder
            id=id
            rows=rows.to_string()
            disabled=move || disabled.get().unwrap_or(false)
            prop:value=move || value.get()
            on:input=on_input
        ></textarea>
    }
}
