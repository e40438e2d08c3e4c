//! Login form

use serde::{Deserialize, Serialize};

use super::FieldErrors;

/// Raw login submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Validate the submission shape. Credential checking happens in the
    /// user service; a failed check deliberately carries no field detail.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            errors.add("username", "Username is required");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
