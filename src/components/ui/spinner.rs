use icons::LoaderCircle;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Inline busy marker for buttons that are waiting on the server.
#[component]
pub fn SpinnerCircle(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-3.5 animate-spin", class);

    view! { <LoaderCircle class=merged_class attr:aria-hidden="true" /> }
}

/// Pulsing placeholder block sized by `class`.
#[component]
pub fn Skeleton(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("animate-pulse rounded-md bg-muted", class);

    view! { <div data-name="Skeleton" class=merged_class aria-hidden="true"></div> }
}
