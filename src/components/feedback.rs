//! Shared loading, error, empty and notice views used by both pages.

use crate::components::ui::{
    Alert, AlertDescription, AlertTitle, Button, ButtonSize, ButtonVariant, Skeleton,
};
use crate::notices::NoticeLevel;
use crate::state::AppContext;
use icons::{Check, X};
use leptos::prelude::*;

/// Placeholder rows shown while the first fetch is in flight.
#[component]
pub fn LoadingSkeleton(#[prop(default = 3)] rows: usize) -> impl IntoView {
    view! {
        <div class="grid gap-3 sm:grid-cols-2 lg:grid-cols-3" aria-busy="true">
            {(0..rows)
                .map(|_| view! {
                    <div class="space-y-3 rounded-xl border p-4">
                        <Skeleton class="h-5 w-2/3" />
                        <Skeleton class="h-4 w-full" />
                        <Skeleton class="h-3 w-1/3" />
                    </div>
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn ErrorPanel(
    #[prop(into)] message: Signal<String>,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    view! {
        <Alert>
            <AlertTitle>"Could not load this page"</AlertTitle>
            <AlertDescription>{move || message.get()}</AlertDescription>
            <Button
                class="mt-3"
                variant=ButtonVariant::Outline
                size=ButtonSize::Sm
                on:click=move |_| on_retry.run(())
            >
                "Retry"
            </Button>
        </Alert>
    }
}

/// Loaded, but nothing to show. Offers the creation action inline.
#[component]
pub fn EmptyState(
    #[prop(into)] message: String,
    #[prop(into)] action_label: String,
    #[prop(into)] on_action: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center gap-3 rounded-xl border border-dashed px-6 py-12 text-center">
            <p class="text-sm text-muted-foreground">{message}</p>
            <Button size=ButtonSize::Sm on:click=move |_| on_action.run(())>
                {action_label}
            </Button>
        </div>
    }
}

/// Stack of transient notices in the bottom-right corner.
#[component]
pub fn NoticeStack() -> impl IntoView {
    let center = expect_context::<AppContext>().0.notices;

    view! {
        <div
            class="pointer-events-none fixed right-4 bottom-4 z-[70] flex w-full max-w-sm flex-col gap-2"
            aria-live="polite"
        >
            <For
                each=move || center.notices.with(|n| n.items().to_vec())
                key=|n| n.id
                children=move |n| {
                    let tone = match n.level {
                        NoticeLevel::Success => "border-success/40 bg-background",
                        NoticeLevel::Error => "border-destructive/40 bg-background text-destructive",
                    };
                    let id = n.id;
                    view! {
                        <div
                            class=format!("pointer-events-auto flex items-start gap-2 rounded-lg border px-3 py-2 text-sm shadow-md {tone}")
                            role="status"
                            data-level=n.level.to_string()
                        >
                            {matches!(n.level, NoticeLevel::Success).then(|| view! { <Check class="mt-0.5 size-4" /> })}
                            <span class="flex-1">{n.message}</span>
                            <button
                                type="button"
                                class="rounded-sm p-0.5 opacity-70 hover:opacity-100"
                                aria-label="Dismiss"
                                on:click=move |_| center.dismiss(id)
                            >
                                <X class="size-3.5" />
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
