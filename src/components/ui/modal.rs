use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {ModalBody, div, "flex flex-col gap-4"}
    clx! {ModalFooter, footer, "flex flex-col-reverse gap-2 sm:flex-row sm:justify-end"}
}

pub use components::*;

/// Centered dialog over a dimmed backdrop. Clicking the backdrop or the close
/// button calls `on_close`; whether that actually closes is up to the caller.
#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into, optional)] description: String,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "relative w-full max-w-md max-h-[85vh] overflow-y-auto rounded-2xl border bg-background p-6 shadow-lg",
        class
    );
    let has_description = !description.is_empty();

    view! {
        <div
            data-name="ModalBackdrop"
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 px-4"
            on:click=move |_| on_close.run(())
        >
            <div
                data-name="ModalContent"
                role="dialog"
                aria-modal="true"
                class=merged_class
                on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
            >
                <button
                    type="button"
                    class="absolute top-4 right-4 rounded-sm p-1 focus:outline-none focus:ring-2 focus:ring-ring [&_svg:not([class*='size-'])]:size-4"
                    aria-label="Close dialog"
                    on:click=move |_| on_close.run(())
                >
                    <X />
                </button>

                <div class="mb-4 flex flex-col gap-1 pr-6">
                    <h3 class="text-lg leading-none font-semibold">{title}</h3>
                    {has_description.then(|| view! {
                        <p class="text-sm text-muted-foreground">{description}</p>
                    })}
                </div>

                {children()}
            </div>
        </div>
    }
}
