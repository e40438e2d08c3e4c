//! Contact form

use serde::{Deserialize, Serialize};

use super::{is_valid_email, FieldErrors};

/// Raw contact submission, including the challenge-response pair
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mail: String,
    /// Opaque token of the issued challenge
    #[serde(default)]
    pub captcha_token: String,
    /// Submitted answer to the challenge
    #[serde(default)]
    pub captcha_answer: String,
}

impl ContactForm {
    /// Validate the submission shape. The captcha answer itself is checked
    /// by the captcha service against the stored challenge.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.subject.trim().is_empty() {
            errors.add("subject", "Subject is required");
        }
        if self.content.trim().is_empty() {
            errors.add("content", "Message is required");
        }
        if self.mail.trim().is_empty() {
            errors.add("mail", "Email is required");
        } else if !is_valid_email(self.mail.trim()) {
            errors.add("mail", "Enter a valid email address");
        }
        if self.captcha_token.trim().is_empty() || self.captcha_answer.trim().is_empty() {
            errors.add("captcha_answer", "Answer the puzzle");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Message body handed to the mailer: content plus sender attribution.
    pub fn message_body(&self) -> String {
        format!("{}\nfrom: {}", self.content.trim(), self.mail.trim())
    }
}
