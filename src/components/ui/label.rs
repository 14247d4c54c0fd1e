use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Label(
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] html_for: String,
    children: Children,
) -> impl IntoView {
    let class = tw_merge!(
        "flex items-center gap-2 text-xs leading-none font-medium select-none",
        class
    );

    view! {
        <label class=class r#for=html_for>
            {children()}
        </label>
    }
}

/// Inline message under a form field.
#[component]
pub fn FieldError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some() fallback=|| ()>
            <p class="text-xs text-destructive" role="alert">
                {move || message.get().unwrap_or_default()}
            </p>
        </Show>
    }
}
