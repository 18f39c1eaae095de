use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use gaps_core::model::Role;

use crate::context::{AppContext, SignedIn, use_signed_in};
use crate::views::{LoginView, QuizSetupView, QuizView, TeacherDashboardView, landing_route};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LoginView)] Login {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/dashboard", TeacherDashboardView)] Dashboard {},
        #[route("/quiz-setup", QuizSetupView)] QuizSetup {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let signed_in = use_signed_in();

    // Pick up the session saved by a previous launch.
    use_hook(move || {
        let auth = ctx.auth();
        let mut signed_in = signed_in;
        spawn(async move {
            match auth.restore().await {
                Ok(Some(session)) => {
                    let restored = SignedIn::from_session(&session);
                    tracing::info!(role = restored.role.as_str(), "session restored");
                    let route = landing_route(restored.role);
                    signed_in.set(Some(restored));
                    let _ = navigator.replace(route);
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "could not restore session"),
            }
        });
    });

    rsx! {
        div { class: "app",
            NavBar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn NavBar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let signed_in = use_signed_in();
    let current = signed_in();

    rsx! {
        nav { class: "navbar",
            h1 { "🧠 Learning Gaps Detector" }
            match current {
                None => rsx! {
                    ul {
                        li { Link { to: Route::Login {}, "Sign in" } }
                    }
                },
                Some(user) => {
                    let name = user.display_name().to_string();
                    rsx! {
                        ul {
                            if user.role == Role::Student {
                                li { Link { to: Route::Quiz {}, "Take Quiz" } }
                            } else {
                                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                                li { Link { to: Route::QuizSetup {}, "Quiz Setup" } }
                            }
                        }
                        span { class: "navbar-user", "{name}" }
                        button {
                            class: "btn btn-small",
                            r#type: "button",
                            onclick: move |_| {
                                let auth = ctx.auth();
                                let mut signed_in = signed_in;
                                spawn(async move {
                                    if let Err(err) = auth.logout().await {
                                        tracing::warn!(error = %err, "could not clear saved session");
                                    }
                                    signed_in.set(None);
                                    let _ = navigator.replace(Route::Login {});
                                });
                            },
                            "Log out"
                        }
                    }
                }
            }
        }
    }
}
