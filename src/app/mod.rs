use crate::components::feedback::NoticeStack;
use crate::config::EnvConfig;
use crate::pages::{NotebookPage, NotebooksPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub(crate) fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext(AppState::new(config)));

    view! {
        <Router>
            <main class="min-h-screen bg-background text-foreground">
                <Routes fallback=|| view! {
                    <div class="mx-auto max-w-5xl space-y-2 px-4 py-8">
                        <p class="text-sm text-muted-foreground">"Page not found"</p>
                        <a href="/" class="text-sm hover:underline">"Back to notebooks"</a>
                    </div>
                }>
                    <Route path=path!("notebook/:id") view=NotebookPage />
                    <Route path=path!("") view=NotebooksPage />
                </Routes>
            </main>
            <NoticeStack />
        </Router>
    }
}
