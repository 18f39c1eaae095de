use std::time::Duration;

use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use gaps_core::quiz::{AnswerOutcome, QuizController, QuizPhase};
use gaps_core::{Clock, TaskSlot};

use crate::context::AppContext;
use crate::views::task::{ViewTask, spawn_into, use_task_slot};
use crate::vm::{QuestionVm, QuizScreen, ResultsVm, map_quiz_screen};

const TICK: Duration = Duration::from_secs(1);

/// Keep the display tick alive only while a question is on screen.
fn sync_ticker(
    phase: QuizPhase,
    ticker: Signal<TaskSlot<ViewTask>>,
    now: Signal<DateTime<Utc>>,
    clock: Clock,
) {
    let mut now = now;
    now.set(clock.now());
    match phase {
        QuizPhase::Presenting { .. } => {
            if !ticker.peek().is_active() {
                spawn_into(ticker, tick(ticker, now, clock));
            }
        }
        _ => {
            let mut ticker = ticker;
            ticker.write().cancel();
        }
    }
}

async fn tick(slot: Signal<TaskSlot<ViewTask>>, mut now: Signal<DateTime<Utc>>, clock: Clock) {
    let generation = slot.peek().generation();
    loop {
        tokio::time::sleep(TICK).await;
        if !slot.peek().is_current(generation) {
            break;
        }
        now.set(clock.now());
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let workflow = ctx.quiz();
    let timing = ctx.timing();
    let clock = workflow.clock();
    let controller = use_signal(QuizController::new);
    let now = use_signal(|| clock.now());
    let ticker = use_task_slot();
    let requests = use_task_slot();
    let mut student_id = use_signal(String::new);
    let id_error = use_signal(|| None::<String>);

    // Identify the student and fetch the bank; also used by Retry.
    let start = {
        let workflow = workflow.clone();
        use_callback(move |raw: String| {
            let mut controller = controller;
            let mut id_error = id_error;
            student_id.set(raw.clone());
            let begun = workflow.begin(&mut controller.write(), &raw);
            if let Err(err) = begun {
                id_error.set(Some(format!("Please enter your student ID ({err}).")));
                return;
            }
            id_error.set(None);
            sync_ticker(controller.peek().phase(), ticker, now, clock);
            let workflow = workflow.clone();
            spawn_into(requests, async move {
                let generation = requests.peek().generation();
                let result = workflow.load_questions().await;
                if !requests.peek().is_current(generation) {
                    return;
                }
                let mut guard = controller.write();
                if let Err(err) = workflow.apply_questions(&mut guard, result) {
                    tracing::warn!(error = %err, "question load arrived in the wrong phase");
                }
                let phase = guard.phase();
                drop(guard);
                sync_ticker(phase, ticker, now, clock);
            });
        })
    };

    let submit_answer = {
        let workflow = workflow.clone();
        use_callback(move |()| {
            let mut controller = controller;
            let outcome = workflow.answer(&mut controller.write());
            match outcome {
                Ok(AnswerOutcome::Next { .. }) => {
                    sync_ticker(controller.peek().phase(), ticker, now, clock);
                }
                Ok(AnswerOutcome::Finished) => {
                    sync_ticker(controller.peek().phase(), ticker, now, clock);
                    let submission = match workflow.prepare_submission(&controller.peek()) {
                        Ok(submission) => submission,
                        Err(err) => {
                            tracing::warn!(error = %err, "quiz finished without a submission");
                            return;
                        }
                    };
                    let workflow = workflow.clone();
                    spawn_into(requests, async move {
                        let generation = requests.peek().generation();
                        let result = workflow.send_submission(&submission).await;
                        if !requests.peek().is_current(generation) {
                            return;
                        }
                        if let Err(err) = workflow.apply_submission(&mut controller.write(), result)
                        {
                            tracing::warn!(error = %err, "submission arrived in the wrong phase");
                        }
                    });
                }
                Err(err) => tracing::debug!(error = %err, "answer not recorded"),
            }
        })
    };

    let retry = use_callback(move |()| {
        let mut controller = controller;
        if let Err(err) = controller.write().retry() {
            tracing::warn!(error = %err, "retry rejected");
            return;
        }
        start.call(student_id());
    });

    let retake = use_callback(move |()| {
        let mut controller = controller;
        if let Err(err) = controller.write().retake() {
            tracing::warn!(error = %err, "retake rejected");
        }
        sync_ticker(controller.peek().phase(), ticker, now, clock);
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(QuizHandles {
                    start,
                    submit: submit_answer,
                    retry,
                    retake,
                    controller,
                    ticker,
                });
            }
        }
    }

    let screen = map_quiz_screen(&controller.read(), &timing, now());
    let student_label = controller.read().student_id().map(ToString::to_string);

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "Learning Assessment" }
                if let Some(id) = student_label {
                    p { class: "view-subtitle", "Student: {id}" }
                }
            }
            div { class: "view-divider" }
            match screen {
                QuizScreen::Identify => {
                    rsx! {
                        div { class: "quiz-identify",
                            label { class: "field",
                                span { "Student ID" }
                                input {
                                    r#type: "text",
                                    placeholder: "Enter your student ID",
                                    value: "{student_id}",
                                    oninput: move |evt| student_id.set(evt.value()),
                                }
                            }
                            if let Some(message) = id_error() {
                                p { class: "form-error", "{message}" }
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| start.call(student_id()),
                                "Start Quiz"
                            }
                        }
                    }
                }
                QuizScreen::Loading => rsx! {
                    p { class: "quiz-status", "Loading questions..." }
                },
                QuizScreen::Question(vm) => rsx! {
                    QuestionCard { vm, controller, on_submit: submit_answer }
                },
                QuizScreen::Submitting => rsx! {
                    p { class: "quiz-status", "Analyzing your responses..." }
                },
                QuizScreen::Results(vm) => rsx! {
                    ResultsPanel { vm, on_retake: retake }
                },
                QuizScreen::Error { message } => {
                    rsx! {
                        div { class: "quiz-error",
                            p { class: "form-error", "{message}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| retry.call(()),
                                "Retry"
                            }
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut controller = controller;
                                    if controller.write().retry().is_ok() {
                                        sync_ticker(controller.peek().phase(), ticker, now, clock);
                                    }
                                },
                                "Back"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionCard(
    vm: QuestionVm,
    controller: Signal<QuizController>,
    on_submit: EventHandler<()>,
) -> Element {
    let options = vm.options.iter().map(|option| {
        let index = option.index;
        let class = if option.selected {
            "quiz-option quiz-option--selected"
        } else {
            "quiz-option"
        };
        rsx! {
            button {
                key: "{index}",
                class: "{class}",
                r#type: "button",
                onclick: move |_| {
                    let mut controller = controller;
                    if let Err(err) = controller.write().select_option(index) {
                        tracing::debug!(error = %err, "selection ignored");
                    }
                },
                "{option.text}"
            }
        }
    });
    rsx! {
        div { class: "quiz-card",
            div { class: "quiz-meta",
                span { class: "quiz-counter", "{vm.counter_label}" }
                span { class: "quiz-timer {vm.timer.class}", "{vm.timer.label}" }
            }
            div { class: "quiz-progress",
                div {
                    class: "quiz-progress-fill",
                    style: "width: {vm.progress_percent:.0}%",
                }
            }
            span { class: "concept-tag", "{vm.concept}" }
            h3 { class: "quiz-question", "{vm.text}" }
            div { class: "quiz-options", {options} }
            label { class: "quiz-confidence",
                span { "{vm.confidence_label}" }
                input {
                    r#type: "range",
                    min: "1",
                    max: "5",
                    value: "{vm.confidence}",
                    oninput: move |evt| {
                        let mut controller = controller;
                        if let Ok(value) = evt.value().parse::<i64>() {
                            if let Err(err) = controller.write().set_confidence(value) {
                                tracing::debug!(error = %err, "confidence ignored");
                            }
                        }
                    },
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: !vm.can_submit,
                onclick: move |_| on_submit.call(()),
                "{vm.submit_label}"
            }
        }
    }
}

#[component]
fn ResultsPanel(vm: ResultsVm, on_retake: EventHandler<()>) -> Element {
    let concepts = vm.concepts.iter().map(|concept| {
        rsx! {
            div { key: "{concept.concept}", class: "concept-result",
                span { class: "concept-name", "{concept.concept}" }
                span { class: "risk-badge {concept.badge.class}",
                    "{concept.badge.icon} {concept.badge.label}"
                }
            }
        }
    });
    rsx! {
        div { class: "quiz-results",
            h3 { class: "results-title", "Quiz Complete" }
            div { class: "results-score",
                span { class: "results-score-value", "{vm.score_label}" }
                span { class: "results-score-percent", "{vm.score_percent_label}" }
            }
            div { class: "results-stats",
                div { class: "results-stat",
                    span { class: "results-stat-label", "Average time" }
                    span { "{vm.avg_time_label}" }
                }
                div { class: "results-stat",
                    span { class: "results-stat-label", "Average confidence" }
                    span { "{vm.avg_confidence_label}" }
                }
                div { class: "results-stat",
                    span { class: "results-stat-label", "Learning pattern" }
                    span { "{vm.learning_pattern}" }
                }
                div { class: "results-stat",
                    span { class: "results-stat-label", "Confidence calibration" }
                    span { "{vm.calibration}" }
                }
            }
            div { class: "results-risk",
                span { class: "risk-badge {vm.overall.class}",
                    "{vm.overall.icon} {vm.overall.label}"
                }
                span { class: "results-gap", "Gap score: {vm.gap_label}" }
            }
            if !vm.recommendations.is_empty() {
                div { class: "results-recommendations",
                    h4 { "Recommendations" }
                    ul {
                        for recommendation in vm.recommendations.iter() {
                            li { "{recommendation}" }
                        }
                    }
                }
            }
            div { class: "results-concepts", {concepts} }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_retake.call(()),
                "Take Another Quiz"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Copy)]
pub(crate) struct QuizHandles {
    pub start: Callback<String>,
    pub submit: Callback<()>,
    pub retry: Callback<()>,
    pub retake: Callback<()>,
    pub controller: Signal<QuizController>,
    pub ticker: Signal<TaskSlot<ViewTask>>,
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    handles: std::rc::Rc<std::cell::RefCell<Option<QuizHandles>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, handles: QuizHandles) {
        *self.handles.borrow_mut() = Some(handles);
    }

    pub(crate) fn get(&self) -> QuizHandles {
        (*self.handles.borrow()).expect("quiz handles registered")
    }
}
