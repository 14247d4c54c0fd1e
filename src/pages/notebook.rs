use super::{bind_overlay_scope, is_enter_in_text_input, report_unless_inline};
use crate::components::feedback::{EmptyState, ErrorPanel, LoadingSkeleton};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardFooter, CardHeader, CardTitle, FieldError, Input, Label, Modal, ModalBody, ModalFooter, Skeleton,
    SpinnerCircle, Textarea,
};
use crate::drafts::{EditBuffer, NoteDraft, NOTE_TITLE_MAX};
use crate::error::Field;
use crate::models::Note;
use crate::render::{format_timestamp, note_content_html, preview};
use crate::state::{
    create_note, delete_note, load_notebook, save_note, AppContext, FetchMode, ModalForm,
    ModalKind, NotebookPageState, NoteView, Presentation, SaveOutcome,
};
use icons::X;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;

const PREVIEW_CHARS: usize = 120;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NotebookRouteParams {
    pub id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewerMode {
    Closed,
    Viewing,
    Editing,
}

#[component]
pub fn NotebookPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = StoredValue::new(app_state.0.api_client.clone());
    let notices = app_state.0.notices;
    let params = use_params::<NotebookRouteParams>();

    // Route params are reactive; the page state is rebuilt when the id changes.
    let route_id = move || params.get().ok().and_then(|p| p.id).unwrap_or_default();
    let state: RwSignal<NotebookPageState> =
        RwSignal::new(NotebookPageState::new(String::new()));

    let load = move |mode: FetchMode| {
        let api = api.get_value();
        spawn_local(async move {
            if let Err(e) = load_notebook(&api, &state, mode).await {
                if mode == FetchMode::Background {
                    notices.report(&e);
                }
            }
        });
    };

    Effect::new(move |prev: Option<String>| {
        let id = route_id();
        if prev.as_deref() != Some(id.as_str()) {
            state.set(NotebookPageState::new(id.clone()));
            load(FetchMode::Initial);
        }
        id
    });

    let presentation = Memo::new(move |_| state.with(|s| s.presentation()));
    let header = Memo::new(move |_| {
        state.with(|s| {
            s.notebook().map(|nb| {
                (
                    nb.title.clone(),
                    nb.description.clone().filter(|d| !d.trim().is_empty()),
                    format_timestamp(&nb.created_at),
                )
            })
        })
    });
    let notes = Memo::new(move |_| {
        state.with(|s| s.notebook().map(|nb| nb.notes.clone()).unwrap_or_default())
    });
    let dialog_open = Memo::new(move |_| state.with(|s| s.session.modal().is_some()));
    let mode = Memo::new(move |_| {
        state.with(|s| match s.session.view() {
            NoteView::Idle => ViewerMode::Closed,
            NoteView::Viewing { .. } => ViewerMode::Viewing,
            NoteView::Editing { .. } => ViewerMode::Editing,
        })
    });

    bind_overlay_scope(
        move || state.with(|s| s.session.needs_overlay()),
        move || {
            state.try_update(|s| s.session.escape());
        },
    );

    let open_create = move || {
        if let Some(Err(e)) = state.try_update(|s| s.session.open_modal(ModalKind::CreateNote)) {
            tracing::debug!(error = %e, "create dialog not opened");
        }
    };

    let open_note = move |note: Note| {
        if let Some(Err(e)) = state.try_update(|s| s.session.open_note(&note)) {
            tracing::debug!(error = %e, note_id = %note.id, "note not opened");
        }
    };

    let note_card = move |note: Note| {
        let title = note.title.clone();
        let excerpt = preview(&note.content, PREVIEW_CHARS);
        let tags = note.tags.clone();
        let created = format_timestamp(&note.created_at);
        let updated = note.updated_at.as_deref().map(format_timestamp);

        view! {
            <Card
                class="cursor-pointer hover:bg-accent/40"
                attr:role="button"
                attr:tabindex="0"
                on:click=move |_| open_note(note.clone())
            >
                <CardHeader>
                    <CardTitle class="truncate">{title}</CardTitle>
                </CardHeader>
                <CardContent class="space-y-2">
                    <CardDescription>{excerpt}</CardDescription>
                    <TagList tags=tags />
                </CardContent>
                <CardFooter class="flex-col items-start gap-0.5">
                    <span>"Created: " {created}</span>
                    {updated.map(|u| view! { <span>"Updated: " {u}</span> })}
                </CardFooter>
            </Card>
        }
    };

    let on_create_submit = move |_| {
        let api = api.get_value();
        spawn_local(async move {
            match create_note(&api, &state).await {
                Ok(note) => notices.success(format!("Note \"{}\" added", note.title)),
                Err(e) => report_unless_inline(notices, &e),
            }
        });
    };

    view! {
        <div class="mx-auto max-w-5xl space-y-6 px-4 py-8">
            <a href="/" class="text-sm text-muted-foreground hover:underline">"← Back to notebooks"</a>

            {move || match presentation.get() {
                Presentation::Skeleton => view! {
                    <div class="space-y-6">
                        <div class="space-y-2">
                            <Skeleton class="h-7 w-1/3" />
                            <Skeleton class="h-4 w-1/2" />
                        </div>
                        <LoadingSkeleton />
                    </div>
                }
                .into_any(),
                Presentation::ErrorPanel(message) => view! {
                    <ErrorPanel message=message on_retry=move |_| load(FetchMode::Initial) />
                }
                .into_any(),
                Presentation::Empty | Presentation::Content => view! {
                    <div class="space-y-6">
                        <div class="flex items-start justify-between gap-3">
                            <div class="min-w-0 space-y-1">
                                <h1 class="text-2xl font-semibold break-words">
                                    {move || header.get().map(|h| h.0).unwrap_or_default()}
                                </h1>
                                {move || header.get().and_then(|h| h.1).map(|d| view! {
                                    <p class="text-sm text-muted-foreground">{d}</p>
                                })}
                                <p class="text-xs text-muted-foreground">
                                    "Created on: " {move || header.get().map(|h| h.2).unwrap_or_default()}
                                </p>
                            </div>
                            <Button on:click=move |_| open_create()>"New Note"</Button>
                        </div>

                        <Show
                            when=move || !notes.get().is_empty()
                            fallback=move || view! {
                                <EmptyState
                                    message="No notes in this notebook yet."
                                    action_label="Add a note"
                                    on_action=move |_| open_create()
                                />
                            }
                        >
                            <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                                <For
                                    each=move || notes.get()
                                    key=|n| (n.id.clone(), n.updated_at.clone())
                                    children=note_card
                                />
                            </div>
                        </Show>
                    </div>
                }
                .into_any(),
            }}

            <Show when=move || mode.get() != ViewerMode::Closed fallback=|| ()>
                <NoteViewer state=state mode=mode />
            </Show>

            <Show when=move || dialog_open.get() fallback=|| ()>
                <CreateNoteDialog state=state on_submit=on_create_submit />
            </Show>
        </div>
    }
}

#[component]
fn TagList(tags: Vec<String>) -> impl IntoView {
    (!tags.is_empty()).then(|| {
        view! {
            <ul class="flex flex-wrap gap-1">
                {tags
                    .into_iter()
                    .map(|t| view! {
                        <li class="rounded-full bg-secondary px-2 py-0.5 text-xs text-secondary-foreground">{t}</li>
                    })
                    .collect_view()}
            </ul>
        }
    })
}

/// Full-screen reader for the selected note, switching to an inline editor
/// in edit mode.
#[component]
fn NoteViewer(state: RwSignal<NotebookPageState>, mode: Memo<ViewerMode>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = StoredValue::new(app_state.0.api_client.clone());
    let notices = app_state.0.notices;

    let note = Memo::new(move |_| state.with(|s| s.selected_note().cloned()));
    let saving = Memo::new(move |_| state.with(|s| s.session.is_saving()));
    let confirm_delete: RwSignal<bool> = RwSignal::new(false);

    let close = move || {
        state.update(|s| s.session.close_note());
    };

    let start_edit = move || {
        state.update(|s| {
            let Some(note) = s.selected_note().cloned() else {
                return;
            };
            if let Err(e) = s.session.start_edit(&note) {
                tracing::debug!(error = %e, "edit not started");
            }
        });
    };

    let delete = move || {
        confirm_delete.set(false);
        let api = api.get_value();
        spawn_local(async move {
            match delete_note(&api, &state).await {
                Ok(()) => notices.success("Note deleted"),
                Err(e) => notices.report(&e),
            }
        });
    };

    view! {
        <div
            data-name="NoteViewer"
            class="fixed inset-0 z-40 overflow-y-auto bg-background"
            role="dialog"
            aria-modal="true"
        >
            <div class="mx-auto max-w-3xl space-y-4 px-4 py-8">
                <div class="flex justify-end">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Close note"
                        attr:disabled=move || saving.get()
                        on:click=move |_| close()
                    >
                        <X />
                    </Button>
                </div>

                <Show
                    when=move || mode.get() == ViewerMode::Editing
                    fallback=move || {
                        view! {
                            {move || note.get().map(|n| view! { <NoteReader note=n /> })}
                            <div class="flex items-center gap-2 border-t pt-4">
                                <Button variant=ButtonVariant::Outline on:click=move |_| start_edit()>
                                    "Edit"
                                </Button>
                                <Show
                                    when=move || confirm_delete.get()
                                    fallback=move || view! {
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            on:click=move |_| confirm_delete.set(true)
                                        >
                                            "Delete"
                                        </Button>
                                    }
                                >
                                    <span class="text-sm text-muted-foreground">"Delete this note?"</span>
                                    <Button variant=ButtonVariant::Destructive on:click=move |_| delete()>
                                        "Delete"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Ghost
                                        on:click=move |_| confirm_delete.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                </Show>
                            </div>
                        }
                    }
                >
                    <NoteEditor state=state />
                </Show>
            </div>
        </div>
    }
}

#[component]
fn NoteReader(note: Note) -> impl IntoView {
    let html = note_content_html(&note.content);
    let created = format_timestamp(&note.created_at);
    let updated = note.updated_at.as_deref().map(format_timestamp);

    view! {
        <article class="space-y-4">
            <h2 class="text-2xl font-semibold break-words">{note.title}</h2>
            <TagList tags=note.tags />
            <div class="text-sm leading-relaxed break-words" inner_html=html></div>
            <div class="space-y-0.5 text-xs text-muted-foreground">
                <p>"Created: " {created}</p>
                {updated.map(|u| view! { <p>"Updated: " {u}</p> })}
            </div>
        </article>
    }
}

#[component]
fn NoteEditor(state: RwSignal<NotebookPageState>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = StoredValue::new(app_state.0.api_client.clone());
    let notices = app_state.0.notices;

    let read = move |f: fn(&EditBuffer) -> String| {
        Signal::derive(move || {
            state.with(|s| match s.session.view() {
                NoteView::Editing { buffer, .. } => f(buffer),
                _ => String::new(),
            })
        })
    };
    let write = move |f: fn(&mut EditBuffer, String)| {
        Callback::new(move |value: String| {
            state.update(|s| {
                if let Some(buffer) = s.session.buffer_mut() {
                    f(buffer, value);
                }
            });
        })
    };

    let title = read(|b| b.title.clone());
    let content = read(|b| b.content.clone());
    let tags = read(|b| b.tags_input.clone());
    let saving = Signal::derive(move || state.with(|s| s.session.is_saving()));
    let error = Signal::derive(move || {
        state.with(|s| s.session.editor_error().map(|e| (e.field(), e.to_string())))
    });
    let title_error = Signal::derive(move || {
        error
            .get()
            .filter(|(field, _)| *field == Some(Field::Title))
            .map(|(_, msg)| msg)
    });
    let request_error = Signal::derive(move || {
        error
            .get()
            .filter(|(field, _)| field.is_none())
            .map(|(_, msg)| msg)
    });

    let cancel = move || {
        state.update(|s| {
            if let Err(e) = s.session.cancel_edit() {
                tracing::debug!(error = %e, "edit not cancelled");
            }
        });
    };

    let save = move || {
        if saving.get_untracked() {
            return;
        }
        let api = api.get_value();
        spawn_local(async move {
            match save_note(&api, &state).await {
                Ok(SaveOutcome::Saved) => notices.success("Note saved"),
                Ok(SaveOutcome::Unchanged) => {}
                Err(e) => report_unless_inline(notices, &e),
            }
        });
    };

    view! {
        <div
            class="space-y-4"
            on:keydown=move |ev: web_sys::KeyboardEvent| {
                if is_enter_in_text_input(&ev) {
                    ev.prevent_default();
                    save();
                }
            }
        >
            <div class="space-y-1">
                <Label html_for="note-title">"Title"</Label>
                <Input
                    id="note-title"
                    autofocus=true
                    value=title
                    on_change=write(|b, v| b.title = v)
                    invalid=Signal::derive(move || title_error.get().is_some())
                    disabled=saving
                />
                <div class="flex justify-between gap-2">
                    <FieldError message=title_error />
                    <span class="ml-auto text-xs text-muted-foreground">
                        {move || format!("{}/{}", title.get().chars().count(), NOTE_TITLE_MAX)}
                    </span>
                </div>
            </div>

            <div class="space-y-1">
                <Label html_for="note-content">"Content"</Label>
                <Textarea
                    id="note-content"
                    rows=12
                    value=content
                    on_change=write(|b, v| b.content = v)
                    disabled=saving
                />
            </div>

            <div class="space-y-1">
                <Label html_for="note-tags">"Tags"</Label>
                <Input
                    id="note-tags"
                    placeholder="Comma separated, e.g. work, ideas"
                    value=tags
                    on_change=write(|b, v| b.tags_input = v)
                    disabled=saving
                />
            </div>

            <Show when=move || request_error.get().is_some() fallback=|| ()>
                <Alert>
                    <AlertDescription>{move || request_error.get().unwrap_or_default()}</AlertDescription>
                </Alert>
            </Show>

            <div class="flex items-center justify-end gap-2 border-t pt-4">
                <Button
                    variant=ButtonVariant::Outline
                    attr:disabled=move || saving.get()
                    on:click=move |_| cancel()
                >
                    "Cancel"
                </Button>
                <Button attr:disabled=move || saving.get() on:click=move |_| save()>
                    {move || saving.get().then(|| view! { <SpinnerCircle /> })}
                    {move || if saving.get() { "Saving…" } else { "Save" }}
                </Button>
            </div>
        </div>
    }
}

#[component]
fn CreateNoteDialog(
    state: RwSignal<NotebookPageState>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    let read = move |f: fn(&NoteDraft) -> String| {
        Signal::derive(move || {
            state.with(|s| match s.session.modal().map(|m| &m.form) {
                Some(ModalForm::Note(d)) => f(d),
                _ => String::new(),
            })
        })
    };
    let write = move |f: fn(&mut NoteDraft, String)| {
        Callback::new(move |value: String| {
            state.update(|s| {
                if let Some(ModalForm::Note(d)) = s.session.modal_mut().map(|m| &mut m.form) {
                    f(d, value);
                }
            });
        })
    };

    let title = read(|d| d.title.clone());
    let content = read(|d| d.content.clone());
    let tags = read(|d| d.tags_input.clone());
    let submitting =
        Signal::derive(move || state.with(|s| s.session.modal().is_some_and(|m| m.submitting)));
    let error = Signal::derive(move || {
        state.with(|s| {
            s.session
                .modal()
                .and_then(|m| m.error.as_ref())
                .map(|e| (e.field(), e.to_string()))
        })
    });
    let title_error = Signal::derive(move || {
        error
            .get()
            .filter(|(field, _)| *field == Some(Field::Title))
            .map(|(_, msg)| msg)
    });
    let request_error = Signal::derive(move || {
        error
            .get()
            .filter(|(field, _)| field.is_none())
            .map(|(_, msg)| msg)
    });

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
        <Modal title="New Note" on_close=move |_| close()>
            <div on:keydown=move |ev: web_sys::KeyboardEvent| {
                if is_enter_in_text_input(&ev) {
                    ev.prevent_default();
                    submit();
                }
            }>
                <ModalBody>
                    <div class="space-y-1">
                        <Label html_for="new-note-title">"Title"</Label>
                        <Input
                            id="new-note-title"
                            autofocus=true
                            value=title
                            on_change=write(|d, v| d.title = v)
                            invalid=Signal::derive(move || title_error.get().is_some())
                            disabled=submitting
                        />
                        <div class="flex justify-between gap-2">
                            <FieldError message=title_error />
                            <span class="ml-auto text-xs text-muted-foreground">
                                {move || format!("{}/{}", title.get().chars().count(), NOTE_TITLE_MAX)}
                            </span>
                        </div>
                    </div>

                    <div class="space-y-1">
                        <Label html_for="new-note-content">"Content"</Label>
                        <Textarea
                            id="new-note-content"
                            value=content
                            on_change=write(|d, v| d.content = v)
                            disabled=submitting
                        />
                    </div>

                    <div class="space-y-1">
                        <Label html_for="new-note-tags">"Tags"</Label>
                        <Input
                            id="new-note-tags"
                            placeholder="Comma separated, e.g. work, ideas"
                            value=tags
                            on_change=write(|d, v| d.tags_input = v)
                            disabled=submitting
                        />
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
                            {move || if submitting.get() { "Adding…" } else { "Add Note" }}
                        </Button>
                    </ModalFooter>
                </ModalBody>
            </div>
        </Modal>
    }
}
