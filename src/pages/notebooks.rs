use super::{bind_overlay_scope, is_enter_in_text_input, report_unless_inline};
use crate::components::feedback::{EmptyState, ErrorPanel, LoadingSkeleton};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardFooter, CardHeader, CardTitle, FieldError, Input, Label, Modal, ModalBody, ModalFooter, SpinnerCircle,
    Textarea,
};
use crate::drafts::{NotebookDraft, NOTEBOOK_DESCRIPTION_MAX, NOTEBOOK_TITLE_MAX};
use crate::error::Field;
use crate::models::NotebookSummary;
use crate::render::format_timestamp;
use crate::state::{
    create_notebook, delete_notebook, load_notebooks, AppContext, FetchMode, ModalForm,
    ModalKind, NotebookListState, Presentation,
};
use icons::ChevronRight;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn NotebooksPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = StoredValue::new(app_state.0.api_client.clone());
    let notices = app_state.0.notices;

    let state: RwSignal<NotebookListState> = RwSignal::new(NotebookListState::default());
    // Row awaiting a second click to confirm its deletion.
    let confirming: RwSignal<Option<String>> = RwSignal::new(None);

    let load = move |mode: FetchMode| {
        let api = api.get_value();
        spawn_local(async move {
            // Initial-load failures render the error panel instead.
            if let Err(e) = load_notebooks(&api, &state, mode).await {
                if mode == FetchMode::Background {
                    notices.report(&e);
                }
            }
        });
    };
    load(FetchMode::Initial);

    let presentation = Memo::new(move |_| state.with(|s| s.presentation()));
    let notebooks = Memo::new(move |_| state.with(|s| s.cache.notebooks().to_vec()));
    let dialog_open = Memo::new(move |_| state.with(|s| s.session.modal().is_some()));

    bind_overlay_scope(
        move || dialog_open.get(),
        move || {
            state.try_update(|s| s.session.escape());
        },
    );

    let open_create = move || {
        if let Some(Err(e)) = state.try_update(|s| s.session.open_modal(ModalKind::CreateNotebook)) {
            tracing::debug!(error = %e, "create dialog not opened");
        }
    };

    let delete = move |id: String| {
        confirming.set(None);
        let api = api.get_value();
        spawn_local(async move {
            match delete_notebook(&api, &state, &id).await {
                Ok(()) => notices.success("Notebook deleted"),
                Err(e) => notices.report(&e),
            }
        });
    };

    let notebook_card = move |nb: NotebookSummary| {
        let NotebookSummary {
            id,
            title,
            description,
            created_at,
        } = nb;
        let row_id = id.clone();
        let href = format!("/notebook/{id}");
        let created = format_timestamp(&created_at);
        let id_for_confirm = id.clone();
        let id_for_delete = id.clone();
        let is_confirming = move || confirming.get().as_deref() == Some(id_for_confirm.as_str());
        let id_for_pending = id.clone();
        let is_pending = Signal::derive(move || state.with(|s| s.deletes.is_pending(&id_for_pending)));
        let description = description.filter(|d| !d.trim().is_empty());

        view! {
            <Card attr:data-notebook-id=row_id>
                <CardHeader>
                    <a href=href class="group min-w-0 flex-1">
                        <CardTitle class="flex items-center gap-1 group-hover:underline">
                            <span class="truncate">{title}</span>
                            <ChevronRight class="size-4 shrink-0 text-muted-foreground" />
                        </CardTitle>
                    </a>
                </CardHeader>
                {description.map(|d| view! {
                    <CardContent><CardDescription>{d}</CardDescription></CardContent>
                })}
                <CardFooter>
                    <span>"Created on: " {created}</span>
                    <Show
                        when=is_confirming
                        fallback=move || {
                            let id = id.clone();
                            view! {
                                <Button
                                    variant=ButtonVariant::Ghost
                                    size=ButtonSize::Sm
                                    attr:aria-label="Delete notebook"
                                    attr:disabled=move || is_pending.get()
                                    on:click=move |_| confirming.set(Some(id.clone()))
                                >
                                    "Delete"
                                </Button>
                            }
                        }
                    >
                        {
                            let id = id_for_delete.clone();
                            view! {
                                <div class="flex items-center gap-1">
                                    <Button
                                        variant=ButtonVariant::Destructive
                                        size=ButtonSize::Sm
                                        attr:disabled=move || is_pending.get()
                                        on:click=move |_| delete(id.clone())
                                    >
                                        "Confirm"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Ghost
                                        size=ButtonSize::Sm
                                        on:click=move |_| confirming.set(None)
                                    >
                                        "Cancel"
                                    </Button>
                                </div>
                            }
                        }
                    </Show>
                </CardFooter>
            </Card>
        }
    };

    view! {
        <div class="mx-auto max-w-5xl space-y-6 px-4 py-8">
            <div class="flex items-center justify-between gap-3">
                <h1 class="text-2xl font-semibold">"My Notebooks"</h1>
                <Button on:click=move |_| open_create()>"New Notebook"</Button>
            </div>

            {move || match presentation.get() {
                Presentation::Skeleton => view! { <LoadingSkeleton /> }.into_any(),
                Presentation::ErrorPanel(message) => view! {
                    <ErrorPanel message=message on_retry=move |_| load(FetchMode::Initial) />
                }
                .into_any(),
                Presentation::Empty => view! {
                    <EmptyState
                        message="No notebooks found."
                        action_label="Create your first notebook"
                        on_action=move |_| open_create()
                    />
                }
                .into_any(),
                Presentation::Content => view! {
                    <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || notebooks.get()
                            key=|nb| nb.id.clone()
                            children=notebook_card
                        />
                    </div>
                }
                .into_any(),
            }}

            <Show when=move || dialog_open.get() fallback=|| ()>
                <CreateNotebookDialog state=state on_submit=move |_| {
                    let api = api.get_value();
                    spawn_local(async move {
                        match create_notebook(&api, &state).await {
                            Ok(nb) => notices.success(format!("Notebook \"{}\" created", nb.title)),
                            Err(e) => report_unless_inline(notices, &e),
                        }
                    });
                } />
            </Show>
        </div>
    }
}

#[component]
fn CreateNotebookDialog(
    state: RwSignal<NotebookListState>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    let read = move |f: fn(&NotebookDraft) -> String| {
        Signal::derive(move || {
            state.with(|s| match s.session.modal().map(|m| &m.form) {
                Some(ModalForm::Notebook(d)) => f(d),
                _ => String::new(),
            })
        })
    };
    let write = move |f: fn(&mut NotebookDraft, String)| {
        Callback::new(move |value: String| {
            state.update(|s| {
                if let Some(ModalForm::Notebook(d)) = s.session.modal_mut().map(|m| &mut m.form) {
                    f(d, value);
                }
            });
        })
    };

    let title = read(|d| d.title.clone());
    let description = read(|d| d.description.clone());
    let submitting =
        Signal::derive(move || state.with(|s| s.session.modal().is_some_and(|m| m.submitting)));
    let field_error = move |field: Field| {
        Signal::derive(move || {
            state.with(|s| {
                s.session
                    .modal()
                    .and_then(|m| m.error.as_ref())
                    .filter(|e| e.field() == Some(field))
                    .map(|e| e.to_string())
            })
        })
    };
    let request_error = Signal::derive(move || {
        state.with(|s| {
            s.session
                .modal()
                .and_then(|m| m.error.as_ref())
                .filter(|e| e.field().is_none())
                .map(|e| e.to_string())
        })
    });

    let title_error = field_error(Field::Title);
    let close = move || {
        state.update(|s| {
            if let Err(e) = s.session.close_modal() {
                tracing::debug!(error = %e, "dialog kept open");
            }
        });
    };
    let submit = move || {
        if !submitting.get_untracked() {
            on_submit.run(());
        }
    };

    view! {
        <Modal title="New Notebook" description="Group related notes together." on_close=move |_| close()>
            <div on:keydown=move |ev: web_sys::KeyboardEvent| {
                if is_enter_in_text_input(&ev) {
                    ev.prevent_default();
                    submit();
                }
            }>
                <ModalBody>
                    <div class="space-y-1">
                        <Label html_for="notebook-title">"Title"</Label>
                        <Input
                            id="notebook-title"
                            autofocus=true
                            placeholder="e.g. Recipes"
                            value=title
                            on_change=write(|d, v| d.title = v)
                            invalid=Signal::derive(move || title_error.get().is_some())
                            disabled=submitting
                        />
                        <div class="flex justify-between gap-2">
                            <FieldError message=title_error />
                            <span class="ml-auto text-xs text-muted-foreground">
                                {move || format!("{}/{}", title.get().chars().count(), NOTEBOOK_TITLE_MAX)}
                            </span>
                        </div>
                    </div>

                    <div class="space-y-1">
                        <Label html_for="notebook-description">"Description"</Label>
                        <Textarea
                            id="notebook-description"
                            rows=3
                            placeholder="Optional"
                            value=description
                            on_change=write(|d, v| d.description = v)
                            disabled=submitting
                        />
                        <div class="flex justify-between gap-2">
                            <FieldError message=field_error(Field::Description) />
                            <span class="ml-auto text-xs text-muted-foreground">
                                {move || format!("{}/{}", description.get().chars().count(), NOTEBOOK_DESCRIPTION_MAX)}
                            </span>
                        </div>
                    </div>

                    <Show when=move || request_error.get().is_some() fallback=|| ()>
                        <Alert>
                            <AlertDescription>{move || request_error.get().unwrap_or_default()}</AlertDescription>
                        </Alert>
                    </Show>

                    <ModalFooter>
                        <Button
                            variant=ButtonVariant::Outline
                            attr:disabled=move || submitting.get()
                            on:click=move |_| close()
                        >
                            "Cancel"
                        </Button>
                        <Button attr:disabled=move || submitting.get() on:click=move |_| submit()>
                            {move || submitting.get().then(|| view! { <SpinnerCircle /> })}
                            {move || if submitting.get() { "Creating…" } else { "Create" }}
                        </Button>
                    </ModalFooter>
                </ModalBody>
            </div>
        </Modal>
    }
}
