use serde::Deserialize;

use super::{ValidationErrors, optional_text, required_text};
use crate::models::{NewUser, User, UserUpdate};
use crate::types::{Email, UserRole};

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;
const MIN_PASSWORD_LEN: usize = 8;

/// Create/edit user form.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub password: String,
    pub password_confirmation: String,
    /// Checkbox: present when ticked.
    pub is_active: Option<String>,
}

impl std::fmt::Debug for UserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("password", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl UserForm {
    /// Blank form for a new active staff user.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            role: UserRole::default().as_str().to_owned(),
            is_active: Some("on".to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn active(&self) -> bool {
        self.is_active.is_some()
    }

    /// Drop the typed passwords before echoing the form back.
    #[must_use]
    pub fn without_passwords(mut self) -> Self {
        self.password.clear();
        self.password_confirmation.clear();
        self
    }
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone().unwrap_or_default(),
            role: user.role.as_str().to_owned(),
            password: String::new(),
            password_confirmation: String::new(),
            is_active: user.is_active.then(|| "on".to_owned()),
        }
    }
}

struct Profile {
    username: String,
    email: String,
    full_name: Option<String>,
    role: UserRole,
}

fn check_profile(form: &UserForm, errors: &mut ValidationErrors) -> Profile {
    let username = required_text(errors, "username", "Username", &form.username);
    if !username.is_empty() {
        if !USERNAME_LEN.contains(&username.chars().count()) {
            errors.add(
                "username",
                format!(
                    "Username must be {} to {} characters",
                    USERNAME_LEN.start(),
                    USERNAME_LEN.end()
                ),
            );
        } else if username.chars().any(char::is_whitespace) {
            errors.add("username", "Username cannot contain spaces");
        }
    }

    let email = match Email::parse(&form.email) {
        Ok(email) => email.into_inner(),
        Err(err) => {
            errors.add("email", capitalize(&err.to_string()));
            form.email.trim().to_owned()
        }
    };

    let role = if form.role.trim().is_empty() {
        errors.add("role", "Select a role");
        UserRole::default()
    } else {
        form.role.parse::<UserRole>().unwrap_or_else(|_| {
            errors.add("role", "Select a valid role");
            UserRole::default()
        })
    };

    Profile {
        username,
        email,
        full_name: optional_text(&form.full_name),
        role,
    }
}

fn check_password(password: &str, confirmation: &str, errors: &mut ValidationErrors) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    if password != confirmation {
        errors.add("password_confirmation", "Passwords do not match");
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Validate the create-user form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_new_user(form: &UserForm) -> Result<NewUser, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let profile = check_profile(form, &mut errors);
    check_password(&form.password, &form.password_confirmation, &mut errors);
    errors.into_result(NewUser {
        username: profile.username,
        email: profile.email,
        full_name: profile.full_name,
        role: profile.role,
        password: form.password.clone(),
        is_active: form.active(),
    })
}

/// Validate the edit-user form. A blank password keeps the current one.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_user_update(form: &UserForm) -> Result<UserUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let profile = check_profile(form, &mut errors);
    let password = if form.password.is_empty() && form.password_confirmation.is_empty() {
        None
    } else {
        check_password(&form.password, &form.password_confirmation, &mut errors);
        Some(form.password.clone())
    };
    errors.into_result(UserUpdate {
        username: profile.username,
        email: profile.email,
        full_name: profile.full_name,
        role: profile.role,
        password,
        is_active: form.active(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> UserForm {
        UserForm {
            username: "kim".into(),
            email: " kim@depot.example ".into(),
            full_name: "Kim Lee".into(),
            role: "Manager".into(),
            password: "longenough".into(),
            password_confirmation: "longenough".into(),
            is_active: Some("on".into()),
        }
    }

    #[test]
    fn test_accepts_valid_user() {
        let user = validate_new_user(&form()).unwrap();
        assert_eq!(user.email, "kim@depot.example");
        assert_eq!(user.role, UserRole::Manager);
        assert!(user.is_active);
    }

    #[test]
    fn test_rejects_mismatched_passwords() {
        let mut form = form();
        form.password_confirmation = "different1".into();
        let errors = validate_new_user(&form).unwrap_err();
        assert_eq!(
            errors.first("password_confirmation"),
            Some("Passwords do not match")
        );
        assert!(!errors.has("password"));
    }

    #[test]
    fn test_rejects_short_password_bad_email_and_spaces() {
        let form = UserForm {
            username: "a b".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            password_confirmation: "short".into(),
            ..UserForm::blank()
        };
        let errors = validate_new_user(&form).unwrap_err();
        assert_eq!(errors.first("username"), Some("Username cannot contain spaces"));
        assert!(errors.has("email"));
        assert_eq!(
            errors.first("password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_username_length_is_bounded() {
        let mut form = form();
        form.username = "ab".into();
        assert!(validate_new_user(&form).unwrap_err().has("username"));
        form.username = "a".repeat(51);
        assert!(validate_new_user(&form).unwrap_err().has("username"));
    }

    #[test]
    fn test_role_is_required() {
        let mut form = form();
        form.role = String::new();
        let errors = validate_new_user(&form).unwrap_err();
        assert_eq!(errors.first("role"), Some("Select a role"));
    }

    #[test]
    fn test_update_keeps_password_when_blank() {
        let mut form = form();
        form.password.clear();
        form.password_confirmation.clear();
        form.is_active = None;
        let update = validate_user_update(&form).unwrap();
        assert_eq!(update.password, None);
        assert!(!update.is_active);
    }

    #[test]
    fn test_update_checks_new_password() {
        let mut form = form();
        form.password = "newsecret1".into();
        form.password_confirmation = "newsecret2".into();
        assert!(
            validate_user_update(&form)
                .unwrap_err()
                .has("password_confirmation")
        );
    }

    #[test]
    fn test_edit_form_round_trips_user() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "username": "kim", "email": "kim@depot.example", "role": "admin"}"#,
        )
        .unwrap();
        let form = UserForm::from(&user);
        assert_eq!(form.role, "admin");
        assert!(form.active());
        assert!(form.password.is_empty());
    }
}
