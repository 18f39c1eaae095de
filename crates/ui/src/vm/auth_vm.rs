use gaps_core::model::{AuthTab, Role, password_strength};

/// Heading and button text for the current role/tab pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthCopyVm {
    pub title: String,
    pub submit_label: &'static str,
    pub show_subject: bool,
}

#[must_use]
pub fn map_auth_copy(role: Role, tab: AuthTab) -> AuthCopyVm {
    let who = match role {
        Role::Student => "Student",
        Role::Teacher => "Teacher",
    };
    match tab {
        AuthTab::Login => AuthCopyVm {
            title: format!("{who} Login"),
            submit_label: "Log In",
            show_subject: false,
        },
        AuthTab::Signup => AuthCopyVm {
            title: format!("{who} Sign Up"),
            submit_label: "Create Account",
            show_subject: role == Role::Teacher,
        },
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrengthVm {
    pub score: u8,
    pub label: &'static str,
    pub class: &'static str,
}

/// Meter under the signup password field; `None` while the field is empty.
#[must_use]
pub fn map_password_strength(password: &str) -> Option<StrengthVm> {
    if password.is_empty() {
        return None;
    }
    let score = password_strength(password);
    let (label, class) = match score {
        0 | 1 => ("Weak", "strength-weak"),
        2 => ("Fair", "strength-fair"),
        3 => ("Good", "strength-good"),
        _ => ("Strong", "strength-strong"),
    };
    Some(StrengthVm {
        score,
        label,
        class,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_only_for_teacher_signup() {
        assert!(map_auth_copy(Role::Teacher, AuthTab::Signup).show_subject);
        assert!(!map_auth_copy(Role::Student, AuthTab::Signup).show_subject);
        assert!(!map_auth_copy(Role::Teacher, AuthTab::Login).show_subject);
        assert_eq!(map_auth_copy(Role::Student, AuthTab::Login).title, "Student Login");
    }

    #[test]
    fn strength_meter() {
        assert_eq!(map_password_strength(""), None);
        assert_eq!(map_password_strength("abc").unwrap().label, "Weak");
        assert_eq!(map_password_strength("Abcdefg1!").unwrap().label, "Strong");
    }
}
