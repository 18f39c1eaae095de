use dioxus::prelude::*;
use gaps_core::model::{QuestionDraft, QuestionId};
use services::{AUTHOR_OPTION_SLOTS, QuestionSet};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{map_question_items, question_count_label};

#[derive(Clone, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Saved(usize),
    Failed(String),
}

#[component]
pub fn QuizSetupView() -> Element {
    let ctx = use_context::<AppContext>();
    let authoring = ctx.authoring();
    let resource = use_resource(move || {
        let authoring = authoring.clone();
        async move { authoring.load().await.map_err(ViewError::from) }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page setup-page",
            header { class: "view-header",
                h2 { class: "view-title", "Quiz Setup" }
                p { class: "view-subtitle", "Write the questions students will answer." }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(set) => rsx! {
                    QuestionEditor { initial: set }
                },
            }
        }
    }
}

#[component]
fn QuestionEditor(initial: QuestionSet) -> Element {
    let ctx = use_context::<AppContext>();
    let mut set = use_signal(|| initial);
    let mut draft = use_signal(|| QuestionDraft::blank(AUTHOR_OPTION_SLOTS));
    let mut form_error = use_signal(|| None::<String>);
    let save_state = use_signal(|| SaveState::Idle);

    let items = map_question_items(set.read().questions());
    let count_label = question_count_label(items.len());
    let editing = set.read().editing();
    let add_label = if editing.is_some() {
        "Update Question"
    } else {
        "Add Question"
    };
    let current = draft();

    let option_inputs = current.options.iter().enumerate().map(|(index, text)| {
        let mut draft = draft;
        let letter = char::from(b'A' + u8::try_from(index).unwrap_or(0));
        let checked = current.correct_answer == Some(index);
        rsx! {
            div { key: "{index}", class: "option-row",
                input {
                    r#type: "radio",
                    name: "correct-answer",
                    checked,
                    onchange: move |_| draft.write().correct_answer = Some(index),
                }
                input {
                    r#type: "text",
                    placeholder: "Option {letter}",
                    value: "{text}",
                    oninput: move |evt| {
                        if let Some(slot) = draft.write().options.get_mut(index) {
                            *slot = evt.value();
                        }
                    },
                }
            }
        }
    });

    let list = items.into_iter().map(|item| {
        let mut set = set;
        let id = item.id;
        rsx! {
            div { key: "{id.value()}", class: "setup-question",
                div { class: "setup-question-header",
                    strong { "{item.heading}" }
                    span { class: "concept-tag", "{item.concept}" }
                }
                ul {
                    for option in item.options.iter() {
                        li { class: "{option.class}",
                            "{option.letter}. {option.text}"
                        }
                    }
                }
                div { class: "setup-question-actions",
                    button {
                        class: "btn btn-small",
                        r#type: "button",
                        onclick: move |_| edit_question(id, set, draft, form_error),
                        "Edit"
                    }
                    button {
                        class: "btn btn-small btn-danger",
                        r#type: "button",
                        onclick: move |_| {
                            if let Err(err) = set.write().delete(id) {
                                tracing::debug!(error = %err, "delete ignored");
                            }
                        },
                        "Delete"
                    }
                }
            }
        }
    });

    rsx! {
        div { class: "setup-form",
            label { class: "field",
                span { "Question" }
                textarea {
                    value: "{current.text}",
                    oninput: move |evt| draft.write().text = evt.value(),
                }
            }
            label { class: "field",
                span { "Concept" }
                input {
                    r#type: "text",
                    placeholder: "e.g. Fractions",
                    value: "{current.concept}",
                    oninput: move |evt| draft.write().concept = evt.value(),
                }
            }
            div { class: "option-list", {option_inputs} }
            if let Some(message) = form_error() {
                p { class: "form-error", "{message}" }
            }
            div { class: "setup-form-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        let result = set.write().add(draft()).map(|question| question.id());
                        match result {
                            Ok(id) => {
                                tracing::debug!(question_id = %id, "question added");
                                draft.set(QuestionDraft::blank(AUTHOR_OPTION_SLOTS));
                                form_error.set(None);
                            }
                            Err(err) => form_error.set(Some(err.to_string())),
                        }
                    },
                    "{add_label}"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| {
                        draft.set(set.write().clear_form());
                        form_error.set(None);
                    },
                    "Clear Form"
                }
            }
        }
        div { class: "setup-list",
            h3 { "{count_label}" }
            {list}
        }
        div { class: "setup-save",
            match save_state() {
                SaveState::Idle => rsx! {},
                SaveState::Saving => rsx! { p { "Saving..." } },
                SaveState::Saved(count) => rsx! {
                    p { class: "notice notice-info", "Saved {count} questions." }
                },
                SaveState::Failed(message) => rsx! {
                    p { class: "form-error", "{message}" }
                },
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: save_state() == SaveState::Saving,
                onclick: move |_| {
                    let authoring = ctx.authoring();
                    let snapshot = set.read().clone();
                    let mut save_state = save_state;
                    save_state.set(SaveState::Saving);
                    spawn(async move {
                        match authoring.save(&snapshot).await {
                            Ok(count) => save_state.set(SaveState::Saved(count)),
                            Err(err) => save_state.set(SaveState::Failed(err.to_string())),
                        }
                    });
                },
                "💾 Save Quiz"
            }
        }
    }
}

fn edit_question(
    id: QuestionId,
    set: Signal<QuestionSet>,
    draft: Signal<QuestionDraft>,
    form_error: Signal<Option<String>>,
) {
    let mut set = set;
    let mut draft = draft;
    let mut form_error = form_error;
    let result = set.write().edit(id);
    match result {
        Ok(loaded) => {
            draft.set(loaded);
            form_error.set(None);
        }
        Err(err) => form_error.set(Some(err.to_string())),
    }
}
