use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("enter a valid email address")]
    InvalidEmail,
}

/// Who is signing in; decides which screen the app opens afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login vs. signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

/// The signed-in user as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub role: Role,
    pub name: String,
    pub email: String,
}

/// Token plus user, persisted locally between launches.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: AuthUser,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

//
// ─── FORMS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub subject: String,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns `CredentialsError` for blank fields or a malformed email.
    pub fn validate(&self, role: Role) -> Result<LoginRequest, CredentialsError> {
        let email = required(&self.email, "email")?;
        if !is_valid_email(&email) {
            return Err(CredentialsError::InvalidEmail);
        }
        if self.password.trim().is_empty() {
            return Err(CredentialsError::MissingField("password"));
        }
        Ok(LoginRequest {
            email,
            password: self.password.clone(),
            role,
        })
    }
}

impl SignupForm {
    /// Subject is only sent for teachers, and only when filled in.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` for blank fields or a malformed email.
    pub fn validate(&self, role: Role) -> Result<SignupRequest, CredentialsError> {
        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        if !is_valid_email(&email) {
            return Err(CredentialsError::InvalidEmail);
        }
        if self.password.trim().is_empty() {
            return Err(CredentialsError::MissingField("password"));
        }
        let subject = match role {
            Role::Teacher => Some(self.subject.trim().to_string()).filter(|s| !s.is_empty()),
            Role::Student => None,
        };
        Ok(SignupRequest {
            name,
            email,
            password: self.password.clone(),
            role,
            subject,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CredentialsError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CredentialsError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Loose `local@domain.tld` shape check, no whitespace allowed.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Password strength from 0 to 4: length ≥ 8, mixed case, digit, symbol.
#[must_use]
pub fn password_strength(password: &str) -> u8 {
    let mut strength = 0;
    if password.chars().count() >= 8 {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
    {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        strength += 1;
    }
    if password.chars().any(|c| "!@#$%^&*".contains(c)) {
        strength += 1;
    }
    strength
}
