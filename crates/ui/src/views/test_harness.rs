use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use gaps_core::quiz::QuizTiming;
use gaps_core::time::fixed_clock;
use services::{
    AppServices, AuthService, AuthoringService, DashboardService, InMemoryBackend, QuizWorkflow,
};

use crate::context::{SignedIn, UiApp, build_app_context};
use crate::views::dashboard::{DashboardHandles, DashboardTestHandles};
use crate::views::quiz::{QuizHandles, QuizTestHandles};
use crate::views::{LoginView, QuizSetupView, QuizView, TeacherDashboardView};

/// Live refresh period used by the harness, short enough to poll in a test.
pub const TEST_LIVE_REFRESH: Duration = Duration::from_millis(10);

struct TestApp {
    services: AppServices,
    export_dir: PathBuf,
}

impl UiApp for TestApp {
    fn quiz(&self) -> Arc<QuizWorkflow> {
        self.services.quiz()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn authoring(&self) -> Arc<AuthoringService> {
        self.services.authoring()
    }

    fn timing(&self) -> QuizTiming {
        QuizTiming::default()
    }

    fn live_refresh(&self) -> Duration {
        TEST_LIVE_REFRESH
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Quiz,
    Dashboard,
    QuizSetup,
}

/// Lets a test swap the mounted view, unmounting the previous one.
#[derive(Clone, Default)]
struct ViewSwitch {
    current: Rc<RefCell<Option<Signal<ViewKind>>>>,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    switch: ViewSwitch,
    quiz_handles: QuizTestHandles,
    dashboard_handles: DashboardTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| Signal::new(None::<SignedIn>));
    let current = use_context_provider(|| Signal::new(props.view));
    *props.switch.current.borrow_mut() = Some(current);
    use_context_provider(|| props.quiz_handles.clone());
    use_context_provider(|| props.dashboard_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<Signal<ViewKind>>();
    match view() {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Dashboard => rsx! { TeacherDashboardView {} },
        ViewKind::QuizSetup => rsx! { QuizSetupView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    switch: ViewSwitch,
    quiz_handles: QuizTestHandles,
    dashboard_handles: DashboardTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Keep polling tasks and timers until `span` has passed.
    pub async fn drive_for(&mut self, span: Duration) {
        let deadline = tokio::time::Instant::now() + span;
        while tokio::time::Instant::now() < deadline {
            self.drive_async().await;
        }
    }

    /// Run `f` inside the dom's runtime, as an event handler would.
    pub fn in_runtime<O>(&self, f: impl FnOnce() -> O) -> O {
        self.dom.in_runtime(f)
    }

    pub fn quiz(&self) -> QuizHandles {
        self.quiz_handles.get()
    }

    pub fn dashboard(&self) -> DashboardHandles {
        self.dashboard_handles.get()
    }

    /// Mount `view` in place of the current one.
    pub fn show(&mut self, view: ViewKind) {
        let current = *self.switch.current.borrow();
        if let Some(mut current) = current {
            self.dom.in_runtime(|| current.set(view));
        }
        drive_dom(&mut self.dom);
    }

    /// Rebuild, then let pending loads settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, backend: InMemoryBackend) -> ViewHarness {
    let services = AppServices::in_memory(Arc::new(backend.clone()), fixed_clock());
    let app = Arc::new(TestApp {
        services,
        export_dir: std::env::temp_dir().join("gaps-ui-tests"),
    });
    let switch = ViewSwitch::default();
    let quiz_handles = QuizTestHandles::default();
    let dashboard_handles = DashboardTestHandles::default();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            switch: switch.clone(),
            quiz_handles: quiz_handles.clone(),
            dashboard_handles: dashboard_handles.clone(),
        },
    );
    ViewHarness {
        dom,
        backend,
        switch,
        quiz_handles,
        dashboard_handles,
    }
}
