//! Contact-form validation and mail relay
//!
//! Submissions are validated server-side, then relayed to the first
//! configured provider in priority order: Formspree, then Resend. With no
//! provider configured the message is logged and accepted. A provider HTTP
//! failure is the one hard failure this system surfaces to the end user.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::MailConfig;

const FORMSPREE_BASE: &str = "https://formspree.io/f";
const RESEND_URL: &str = "https://api.resend.com/emails";

/// Hard ceiling on message size, checked before field validation
const MAX_MESSAGE_BYTES: usize = 5000;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// A validated contact-form submission
#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// One failed validation rule
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub path: &'static str,
    pub message: &'static str,
}

impl ContactMessage {
    /// Validate all fields, collecting every violation
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.message.len() > MAX_MESSAGE_BYTES {
            errors.push(FieldError {
                path: "message",
                message: "message is too long",
            });
            return Err(errors);
        }

        let name_len = self.name.chars().count();
        if name_len < 2 || name_len > 50 {
            errors.push(FieldError {
                path: "name",
                message: "name must be 2-50 characters",
            });
        }

        if self.email.chars().count() > 100 || !EMAIL_RE.is_match(&self.email) {
            errors.push(FieldError {
                path: "email",
                message: "a valid email address is required",
            });
        }

        let message_len = self.message.chars().count();
        if message_len < 10 || message_len > 1000 {
            errors.push(FieldError {
                path: "message",
                message: "message must be 10-1000 characters",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Relay failure surfaced to the client as 502
#[derive(Debug, Error)]
pub enum MailError {
    #[error("{provider} returned status {status}")]
    Provider { provider: &'static str, status: u16 },

    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// How a submission was handled
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelayOutcome {
    /// Delivered through a provider
    Sent {
        provider: &'static str,
        id: Option<String>,
    },
    /// No provider configured; message logged only
    LogOnly,
}

/// Mail relay over the configured providers
#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Relay a validated message through the first configured provider
    pub async fn send(&self, msg: &ContactMessage) -> Result<RelayOutcome, MailError> {
        if let Some(form_id) = self.config.formspree_form_id.clone() {
            let id = self.send_formspree(&form_id, msg).await?;
            return Ok(RelayOutcome::Sent {
                provider: "formspree",
                id,
            });
        }

        if let (Some(api_key), Some(to), Some(from)) = (
            self.config.resend_api_key.clone(),
            self.config.contact_to.clone(),
            self.config.contact_from.clone(),
        ) {
            let id = self.send_resend(&api_key, &to, &from, msg).await?;
            return Ok(RelayOutcome::Sent {
                provider: "resend",
                id,
            });
        }

        tracing::warn!(
            name = %msg.name,
            email = %msg.email,
            "no mail provider configured; logging contact message only"
        );
        Ok(RelayOutcome::LogOnly)
    }

    async fn send_formspree(
        &self,
        form_id: &str,
        msg: &ContactMessage,
    ) -> Result<Option<String>, MailError> {
        let response = self
            .http
            .post(format!("{}/{}", FORMSPREE_BASE, form_id))
            .header("Accept", "application/json")
            .json(&json!({
                "name": msg.name,
                "email": msg.email,
                "message": msg.message,
                "_subject": format!("[Contact] message from {}", msg.name),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Provider {
                provider: "formspree",
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let id = body.get("id").and_then(|v| v.as_str()).map(str::to_string);
        Ok(id)
    }

    async fn send_resend(
        &self,
        api_key: &str,
        to: &str,
        from: &str,
        msg: &ContactMessage,
    ) -> Result<Option<String>, MailError> {
        let response = self
            .http
            .post(RESEND_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "from": from,
                "to": [to],
                "reply_to": [msg.email],
                "subject": format!("[Contact] message from {}", msg.name),
                "html": build_email_html(msg),
                "text": format!(
                    "Name: {}\nEmail: {}\n\nMessage:\n{}",
                    msg.name, msg.email, msg.message
                ),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Provider {
                provider: "resend",
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let id = body.get("id").and_then(|v| v.as_str()).map(str::to_string);
        Ok(id)
    }
}

/// Escape interpolated fields against HTML injection in the mail body
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn build_email_html(msg: &ContactMessage) -> String {
    format!(
        r#"<div style="font-family: sans-serif; line-height: 1.6;">
  <h2>New contact message</h2>
  <table style="border-collapse: collapse;">
    <tr><td style="padding: 8px 16px 8px 0; color: #64748b;">Name</td><td>{}</td></tr>
    <tr><td style="padding: 8px 16px 8px 0; color: #64748b;">Email</td><td>{}</td></tr>
    <tr><td style="padding: 8px 16px 8px 0; color: #64748b; vertical-align: top;">Message</td><td style="white-space: pre-wrap;">{}</td></tr>
  </table>
</div>"#,
        escape_html(&msg.name),
        escape_html(&msg.email),
        escape_html(&msg.message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Taro Yamada".to_string(),
            email: "taro@example.com".to_string(),
            message: "Hello, I would like to talk about a project.".to_string(),
        }
    }

    #[test]
    fn test_valid_message() {
        assert!(message().validate().is_ok());
    }

    #[test]
    fn test_short_name_rejected() {
        let mut msg = message();
        msg.name = "T".to_string();
        let errors = msg.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "name");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut msg = message();
        msg.email = "not-an-email".to_string();
        let errors = msg.validate().unwrap_err();
        assert_eq!(errors[0].path, "email");
    }

    #[test]
    fn test_short_message_rejected() {
        let mut msg = message();
        msg.message = "too short".to_string();
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_multiple_errors_collected() {
        let msg = ContactMessage {
            name: String::new(),
            email: "bad".to_string(),
            message: "hi".to_string(),
        };
        let errors = msg.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_oversized_message_rejected_outright() {
        let mut msg = message();
        msg.message = "x".repeat(6000);
        let errors = msg.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "message is too long");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_email_body_escapes_fields() {
        let mut msg = message();
        msg.name = "<b>Bold</b>".to_string();
        let html = build_email_html(&msg);
        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt;"));
        assert!(!html.contains("<b>Bold</b>"));
    }
}
