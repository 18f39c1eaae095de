use std::time::Duration;

use dioxus::prelude::*;
use gaps_core::TaskSlot;
use gaps_core::dashboard::{
    AiFilter, DashboardView, NO_STUDENTS_MESSAGE, RiskFilter, StudentFilter,
};
use gaps_core::model::StudentId;

use crate::context::AppContext;
use crate::views::task::{ViewTask, spawn_into, use_task_slot};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    StudentDetailVm, map_intervention, map_student_detail, map_student_row, map_summary_cards,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResetState {
    Closed,
    Confirming,
    Resetting,
    Error(ViewError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Notice {
    Info(String),
    Error(String),
}

async fn live_refresh(
    slot: Signal<TaskSlot<ViewTask>>,
    service: std::sync::Arc<services::DashboardService>,
    mut latest: Signal<Option<DashboardView>>,
    mut notice: Signal<Option<Notice>>,
    period: Duration,
) {
    let generation = slot.peek().generation();
    loop {
        tokio::time::sleep(period).await;
        if !slot.peek().is_current(generation) {
            break;
        }
        let result = service.load().await;
        if !slot.peek().is_current(generation) {
            break;
        }
        match result {
            Ok(view) => latest.set(Some(view)),
            Err(err) => {
                notice.set(Some(Notice::Error(format!(
                    "Live refresh failed: {}",
                    ViewError::from(err).message()
                ))));
            }
        }
    }
}

#[component]
pub fn TeacherDashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.dashboard();
    let detail_service = ctx.dashboard();
    let reset_service = ctx.dashboard();
    let period = ctx.live_refresh();
    let export_dir = ctx.export_dir();
    let mut latest = use_signal(|| None::<DashboardView>);
    let mut risk_filter = use_signal(RiskFilter::default);
    let mut ai_filter = use_signal(AiFilter::default);
    let mut reset_state = use_signal(|| ResetState::Closed);
    let mut notice = use_signal(|| None::<Notice>);
    let selected = use_signal(|| None::<StudentId>);
    let live = use_task_slot();
    let details = use_task_slot();
    let detail_state = use_signal(|| ViewState::<StudentDetailVm>::Idle);

    let service_for_resource = service.clone();
    let resource = use_resource(move || {
        let service = service_for_resource.clone();
        async move { service.load().await.map_err(ViewError::from) }
    });

    let state = match latest() {
        Some(view) => ViewState::Ready(view),
        None => view_state_from_resource(&resource),
    };
    let live_on = live.read().is_active();
    let live_label = if live_on {
        "🟢 Live updates on"
    } else {
        "⚪ Live updates off"
    };

    let toggle_live = {
        let service = service.clone();
        use_callback(move |()| {
            let mut live = live;
            if live.peek().is_active() {
                live.write().cancel();
                tracing::debug!("live refresh stopped");
            } else {
                spawn_into(live, live_refresh(live, service.clone(), latest, notice, period));
                tracing::debug!(period_ms = period.as_millis(), "live refresh started");
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<DashboardTestHandles>() {
                handles.register(DashboardHandles { toggle_live, live });
            }
        }
    }

    rsx! {
        div { class: "page dashboard-page",
            header { class: "view-header",
                h2 { class: "view-title", "Teacher Dashboard" }
                p { class: "view-subtitle", "Learning gaps across your class." }
            }
            div { class: "dashboard-toolbar",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        let mut resource = resource;
                        latest.set(None);
                        resource.restart();
                    },
                    "🔄 Refresh"
                }
                button {
                    class: "btn live-toggle",
                    r#type: "button",
                    onclick: move |_| toggle_live.call(()),
                    "{live_label}"
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| reset_state.set(ResetState::Confirming),
                    "🗑️ Reset All Data"
                }
            }
            if let Some(current) = notice() {
                match current {
                    Notice::Info(message) => rsx! { p { class: "notice notice-info", "{message}" } },
                    Notice::Error(message) => rsx! { p { class: "notice notice-error", "{message}" } },
                }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading dashboard..." }
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
                ViewState::Ready(view) => {
                    let filter = StudentFilter {
                        risk: risk_filter(),
                        ai: ai_filter(),
                    };
                    let cards = map_summary_cards(&view.dashboard.summary);
                    let export_dir = export_dir.clone();
                    let service = service.clone();
                    let dashboard = view.dashboard.clone();
                    rsx! {
                        div { class: "summary-cards",
                            for card in cards {
                                div { key: "{card.label}", class: "summary-card {card.class}",
                                    span { class: "summary-value", "{card.value}" }
                                    span { class: "summary-label", "{card.label}" }
                                }
                            }
                        }
                        if view.has_no_students() {
                            p { class: "dashboard-empty", "{NO_STUDENTS_MESSAGE}" }
                        } else {
                            StudentTable {
                                view: view.clone(),
                                filter,
                                on_risk: move |raw: String| risk_filter.set(RiskFilter::parse(&raw)),
                                on_ai: move |raw: String| ai_filter.set(AiFilter::parse(&raw)),
                                on_open: move |id: StudentId| {
                                    open_detail(id, selected, detail_state, details, detail_service.clone());
                                },
                            }
                            ClassAnalysis { view: view.clone() }
                            div { class: "dashboard-export",
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| {
                                        match service.export_report(&dashboard, &export_dir) {
                                            Ok(report) => notice.set(Some(Notice::Info(format!(
                                                "Report saved to {} and {}",
                                                report.csv_path.display(),
                                                report.json_path.display()
                                            )))),
                                            Err(err) => {
                                                tracing::error!(error = %err, "report export failed");
                                                notice.set(Some(Notice::Error(format!(
                                                    "Export failed: {err}"
                                                ))));
                                            }
                                        }
                                    },
                                    "📥 Export Report"
                                }
                            }
                        }
                    }
                }
            }
            if selected().is_some() {
                StudentDetailModal {
                    state: detail_state(),
                    on_close: move |_| {
                        let mut selected = selected;
                        let mut details = details;
                        details.write().cancel();
                        selected.set(None);
                    },
                }
            }
            if reset_state() != ResetState::Closed {
                div {
                    class: "modal-overlay",
                    onclick: move |_| reset_state.set(ResetState::Closed),
                    div {
                        class: "modal",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "modal-title", "Reset all student data?" }
                        p { class: "modal-body",
                            "This permanently deletes every quiz result. This cannot be undone."
                        }
                        if let ResetState::Error(err) = reset_state() {
                            p { class: "form-error", "{err.message()}" }
                        }
                        div { class: "modal-actions",
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| reset_state.set(ResetState::Closed),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-danger",
                                r#type: "button",
                                disabled: reset_state() == ResetState::Resetting,
                                onclick: move |_| {
                                    let mut reset_state = reset_state;
                                    let mut latest = latest;
                                    let mut notice = notice;
                                    let service = reset_service.clone();
                                    spawn(async move {
                                        reset_state.set(ResetState::Resetting);
                                        match service.reset_and_reload().await {
                                            Ok(view) => {
                                                latest.set(Some(view));
                                                reset_state.set(ResetState::Closed);
                                                notice.set(Some(Notice::Info(
                                                    "All student data has been reset.".to_string(),
                                                )));
                                            }
                                            Err(err) => {
                                                reset_state.set(ResetState::Error(ViewError::from(err)));
                                            }
                                        }
                                    });
                                },
                                "Reset"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn open_detail(
    id: StudentId,
    selected: Signal<Option<StudentId>>,
    detail_state: Signal<ViewState<StudentDetailVm>>,
    details: Signal<TaskSlot<ViewTask>>,
    service: std::sync::Arc<services::DashboardService>,
) {
    let mut selected = selected;
    let mut detail_state = detail_state;
    selected.set(Some(id.clone()));
    detail_state.set(ViewState::Loading);
    spawn_into(details, async move {
        let generation = details.peek().generation();
        let result = service.student_detail(&id).await;
        if !details.peek().is_current(generation) {
            return;
        }
        detail_state.set(match result {
            Ok(detail) => ViewState::Ready(map_student_detail(&detail)),
            Err(err) => ViewState::Error(ViewError::from(err)),
        });
    });
}

#[component]
fn StudentTable(
    view: DashboardView,
    filter: StudentFilter,
    on_risk: EventHandler<String>,
    on_ai: EventHandler<String>,
    on_open: EventHandler<StudentId>,
) -> Element {
    let rows = view.visible_rows(&filter);
    let rendered = rows.iter().map(|row| {
        let vm = map_student_row(row);
        let id = row.student.student_id.clone();
        rsx! {
            tr { key: "{vm.student_id}",
                td { class: "student-id", "{vm.student_id}" }
                td {
                    span { class: "risk-badge {vm.badge.class}", "{vm.badge.icon} {vm.badge.label}" }
                }
                td { "{vm.gap_label}" }
                td {
                    div { class: "ai-meter",
                        div {
                            class: "ai-meter-fill {vm.ai_meter_class}",
                            style: "width: {vm.ai_percent}%",
                        }
                    }
                    span { class: "ai-label", "{vm.ai_label}" }
                }
                td { class: "{vm.prediction_class}", "{vm.prediction_label}" }
                td { "{vm.last_assessment}" }
                td { class: "concerns", "{vm.concerns}" }
                td {
                    button {
                        class: "btn btn-small",
                        r#type: "button",
                        onclick: move |_| on_open.call(id.clone()),
                        if vm.flagged { "🚩 Review" } else { "View" }
                    }
                }
            }
        }
    });
    rsx! {
        div { class: "student-filters",
            label {
                span { "Risk" }
                select {
                    value: "{filter.risk.as_value()}",
                    onchange: move |evt| on_risk.call(evt.value()),
                    option { value: "all", "All levels" }
                    option { value: "at_risk", "At risk" }
                    option { value: "watch", "Watch" }
                    option { value: "safe", "Safe" }
                }
            }
            label {
                span { "AI likelihood" }
                select {
                    value: "{filter.ai.as_value()}",
                    onchange: move |evt| on_ai.call(evt.value()),
                    option { value: "all", "All" }
                    option { value: "high", "High" }
                    option { value: "medium", "Medium" }
                    option { value: "low", "Low" }
                }
            }
        }
        if rows.is_empty() {
            p { class: "dashboard-empty", "No students match these filters." }
        } else {
            table { class: "student-table",
                thead {
                    tr {
                        th { "Student" }
                        th { "Risk" }
                        th { "Gap score" }
                        th { "AI likelihood" }
                        th { "Prediction" }
                        th { "Last assessment" }
                        th { "Top concerns" }
                        th { "" }
                    }
                }
                tbody { {rendered} }
            }
        }
    }
}

#[component]
fn ClassAnalysis(view: DashboardView) -> Element {
    let intervention_cards = view.interventions.iter().enumerate().map(|(index, intervention)| {
        let item = map_intervention(intervention);
        let class = if item.urgent {
            "intervention-card intervention-card--urgent"
        } else {
            "intervention-card"
        };
        rsx! {
            div { key: "{index}", class: "{class}",
                h4 { "{item.title}" }
                p { "{item.body}" }
                div { class: "intervention-actions",
                    for action in item.actions {
                        span { class: "intervention-action", "{action}" }
                    }
                }
            }
        }
    });
    let detection = view
        .detection_rate
        .map_or_else(|| "No data".to_string(), |rate| format!("{rate}%"));
    rsx! {
        section { class: "concept-section",
            h3 { "Concept Analysis" }
            div { class: "concept-grid",
                for card in view.concepts.iter() {
                    div { key: "{card.name}", class: "concept-card {card.risk.css_class()}",
                        h4 { "{card.risk.icon()} {card.name}" }
                        p { "Students: {card.total_students}" }
                        p { "Average gap: {card.avg_gap_label}" }
                        p { "At risk: {card.at_risk_count} ({card.risk_rate_label})" }
                    }
                }
            }
            div { class: "heat-map",
                for cell in view.heat_map.iter() {
                    div {
                        key: "{cell.title}",
                        class: "heat-cell {cell.risk.css_class()}",
                        title: "{cell.title}",
                        "{cell.short_name}"
                    }
                }
            }
        }
        section { class: "insights-section",
            h3 { "Insights" }
            div { class: "insight-grid",
                for insight in view.insights.iter() {
                    div { key: "{insight.title}", class: "insight-card",
                        h4 { "{insight.icon} {insight.title}" }
                        p { "{insight.content}" }
                    }
                }
            }
        }
        if !view.alerts.is_empty() {
            section { class: "alerts-section",
                h3 { "Alerts" }
                for alert in view.alerts.iter() {
                    div { key: "{alert.student_id}", class: "alert-card",
                        strong { "⚠️ {alert.student_id}" }
                        span { " gap {alert.gap_label}" }
                        p { "{alert.concerns}" }
                    }
                }
            }
        }
        section { class: "interventions-section",
            h3 { "Recommended Interventions" }
            {intervention_cards}
        }
        section { class: "trends-section",
            h3 { "Learning Trends" }
            div { class: "trend-counts",
                span { class: "trend trend-improving", "📈 Improving: {view.trends.improving}" }
                span { class: "trend trend-stagnant", "➡️ Stagnant: {view.trends.stagnant}" }
                span { class: "trend trend-declining", "📉 Declining: {view.trends.declining}" }
            }
            p { class: "detection-rate", "Early detection rate: {detection}" }
        }
    }
}

#[component]
fn StudentDetailModal(
    state: ViewState<StudentDetailVm>,
    on_close: EventHandler<MouseEvent>,
) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |evt| on_close.call(evt),
            div {
                class: "modal student-detail",
                onclick: move |evt| evt.stop_propagation(),
                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { "Loading student..." }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "form-error", "{err.message()}" }
                    },
                    ViewState::Ready(vm) => rsx! {
                        h3 { class: "modal-title", "{vm.title}" }
                        div { class: "detail-summary",
                            span { class: "risk-badge {vm.overall.class}", "{vm.overall.icon} {vm.overall.label}" }
                            span { " Gap score: {vm.gap_label}" }
                            span { " Assessed: {vm.assessed_at}" }
                        }
                        h4 { "Concept gaps" }
                        for gap in vm.concept_gaps.iter() {
                            div { key: "{gap.concept}", class: "detail-gap",
                                strong { "{gap.concept}" }
                                span { class: "risk-badge {gap.badge.class}", " {gap.badge.label}" }
                                span { " {gap.gap_label}" }
                                ul {
                                    for indicator in gap.indicators.iter() {
                                        li { "{indicator}" }
                                    }
                                }
                            }
                        }
                        if !vm.recommendations.is_empty() {
                            h4 { "Recommendations" }
                            ul {
                                for recommendation in vm.recommendations.iter() {
                                    li { "{recommendation}" }
                                }
                            }
                        }
                        p { class: "detail-history", "{vm.history_summary}" }
                    },
                }
                div { class: "modal-actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |evt| on_close.call(evt),
                        "Close"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Copy)]
pub(crate) struct DashboardHandles {
    pub toggle_live: Callback<()>,
    pub live: Signal<TaskSlot<ViewTask>>,
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct DashboardTestHandles {
    handles: std::rc::Rc<std::cell::RefCell<Option<DashboardHandles>>>,
}

#[cfg(test)]
impl DashboardTestHandles {
    pub(crate) fn register(&self, handles: DashboardHandles) {
        *self.handles.borrow_mut() = Some(handles);
    }

    pub(crate) fn get(&self) -> DashboardHandles {
        (*self.handles.borrow()).expect("dashboard handles registered")
    }
}
