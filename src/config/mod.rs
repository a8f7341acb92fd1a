//! Application configuration (config.yml + environment)
//!
//! Secrets (CMS credentials, mail provider keys) come from environment
//! variables and override whatever the optional config file carries. Missing
//! CMS credentials are a supported degraded mode, not an error.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub cms: CmsConfig,
    pub mail: MailConfig,
}

/// HTTP server bind configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

/// Listing pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Posts per listing page
    pub per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { per_page: 8 }
    }
}

/// microCMS credentials; both must be present for live mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub service_domain: Option<String>,
    pub api_key: Option<String>,
}

impl CmsConfig {
    /// Whether both credentials are present
    pub fn is_configured(&self) -> bool {
        self.service_domain.is_some() && self.api_key.is_some()
    }
}

/// Contact-form mail relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub formspree_form_id: Option<String>,
    pub resend_api_key: Option<String>,
    pub contact_to: Option<String>,
    pub contact_from: Option<String>,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from an optional config file, then apply environment overrides
    pub fn from_file_and_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => Self::load(p)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Environment variables win over file values for secrets
    pub fn apply_env(&mut self) {
        if let Ok(v) = env::var("MICROCMS_SERVICE_DOMAIN") {
            self.cms.service_domain = Some(v);
        }
        if let Ok(v) = env::var("MICROCMS_API_KEY") {
            self.cms.api_key = Some(v);
        }
        if let Ok(v) = env::var("FORMSPREE_FORM_ID") {
            self.mail.formspree_form_id = Some(v);
        }
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.mail.resend_api_key = Some(v);
        }
        if let Ok(v) = env::var("CONTACT_TO_EMAIL") {
            self.mail.contact_to = Some(v);
        }
        if let Ok(v) = env::var("CONTACT_FROM_EMAIL") {
            self.mail.contact_from = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.pagination.per_page, 8);
        assert!(!config.cms.is_configured());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
server:
  port: 8080
pagination:
  per_page: 12
cms:
  service_domain: my-service
  api_key: test-key
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(config.pagination.per_page, 12);
        assert!(config.cms.is_configured());
    }

    #[test]
    fn test_partial_cms_credentials_not_configured() {
        let config = CmsConfig {
            service_domain: Some("my-service".to_string()),
            api_key: None,
        };
        assert!(!config.is_configured());
    }
}
