use dioxus::prelude::*;
use dioxus_router::use_navigator;
use gaps_core::model::{AuthTab, LoginForm, Role, SignupForm};

use crate::context::{AppContext, SignedIn, use_signed_in};
use crate::routes::Route;
use crate::vm::{map_auth_copy, map_password_strength};

#[must_use]
pub fn landing_route(role: Role) -> Route {
    match role {
        Role::Student => Route::Quiz {},
        Role::Teacher => Route::Dashboard {},
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let signed_in = use_signed_in();
    let mut role = use_signal(Role::default);
    let mut tab = use_signal(AuthTab::default);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut subject = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let copy = map_auth_copy(role(), tab());
    let strength = if tab() == AuthTab::Signup {
        map_password_strength(&password.read())
    } else {
        None
    };

    let submit = move |_: MouseEvent| {
        if busy() {
            return;
        }
        let auth = ctx.auth();
        let role = role();
        let tab = tab();
        let login = LoginForm {
            email: email(),
            password: password(),
        };
        let signup = SignupForm {
            name: name(),
            email: email(),
            password: password(),
            subject: subject(),
        };
        busy.set(true);
        error.set(None);
        let mut busy = busy;
        let mut error = error;
        let mut signed_in = signed_in;
        spawn(async move {
            let result = match tab {
                AuthTab::Login => auth.login(&login, role).await,
                AuthTab::Signup => auth.signup(&signup, role).await,
            };
            busy.set(false);
            match result {
                Ok(outcome) => {
                    tracing::info!(role = outcome.role.as_str(), "signed in");
                    signed_in.set(Some(SignedIn::from_outcome(&outcome)));
                    let _ = navigator.push(landing_route(outcome.role));
                }
                Err(err) => error.set(Some(err.user_message())),
            }
        });
    };

    let role_button = move |value: Role, label: &'static str| {
        let mut role = role;
        let mut error = error;
        let class = if role() == value {
            "auth-role auth-role--active"
        } else {
            "auth-role"
        };
        rsx! {
            button {
                class: "{class}",
                r#type: "button",
                onclick: move |_| {
                    role.set(value);
                    error.set(None);
                },
                "{label}"
            }
        }
    };
    let tab_button = move |value: AuthTab, label: &'static str| {
        let mut tab = tab;
        let mut error = error;
        let class = if tab() == value {
            "auth-tab auth-tab--active"
        } else {
            "auth-tab"
        };
        rsx! {
            button {
                class: "{class}",
                r#type: "button",
                onclick: move |_| {
                    tab.set(value);
                    error.set(None);
                },
                "{label}"
            }
        }
    };

    rsx! {
        div { class: "page auth-page",
            header { class: "view-header",
                h2 { class: "view-title", "{copy.title}" }
                p { class: "view-subtitle", "Sign in to take a quiz or review your class." }
            }
            div { class: "auth-roles",
                {role_button(Role::Student, "🎓 Student")}
                {role_button(Role::Teacher, "👩‍🏫 Teacher")}
            }
            div { class: "auth-tabs",
                {tab_button(AuthTab::Login, "Log In")}
                {tab_button(AuthTab::Signup, "Sign Up")}
            }
            div { class: "auth-form",
                if tab() == AuthTab::Signup {
                    label { class: "field",
                        span { "Full name" }
                        input {
                            r#type: "text",
                            value: "{name}",
                            oninput: move |evt| name.set(evt.value()),
                        }
                    }
                }
                label { class: "field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                if let Some(meter) = strength {
                    div { class: "strength {meter.class}",
                        span { class: "strength-label", "Password strength: {meter.label}" }
                        progress { max: "4", value: "{meter.score}" }
                    }
                }
                if copy.show_subject {
                    label { class: "field",
                        span { "Subject (optional)" }
                        input {
                            r#type: "text",
                            value: "{subject}",
                            oninput: move |evt| subject.set(evt.value()),
                        }
                    }
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: submit,
                    if busy() { "Please wait..." } else { "{copy.submit_label}" }
                }
            }
        }
    }
}
