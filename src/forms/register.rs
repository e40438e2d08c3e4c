//! Registration form

use serde::{Deserialize, Serialize};

use super::{is_valid_email, FieldErrors};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted username length (matches the column width)
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Raw registration submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl RegisterForm {
    /// Validate the submission shape.
    ///
    /// Username uniqueness is checked later by the user service, against the
    /// database.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", "Username is required");
        } else if username.len() > MAX_USERNAME_LENGTH {
            errors.add("username", "Username is too long");
        }

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Enter a valid email address");
        }

        if self.password.len() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        }

        if self.password != self.password_confirm {
            errors.add("password_confirm", "Passwords do not match");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
