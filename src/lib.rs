//! folio-rs: a portfolio/blog content service backed by the microCMS headless API
//!
//! This crate mediates between HTTP routes and an external CMS: it translates
//! domain queries into CMS REST calls, compensates for the CMS's inconsistent
//! relational filter syntax with a candidate-trial strategy, and assembles
//! paginated page payloads. All durable state lives in the CMS; this service
//! only reads it, apart from relaying contact-form submissions to a
//! transactional mail API.

pub mod cms;
pub mod config;
pub mod content;
pub mod mail;
pub mod pages;
pub mod server;

use cms::CmsClient;
use content::{BlogStore, TechStackStore, WorkStore};
use mail::Mailer;

/// The main application: one stateless CMS gateway instance shared by all
/// domain stores, constructed once per process.
#[derive(Clone)]
pub struct App {
    /// Application configuration
    pub config: config::AppConfig,
    /// Blog post store
    pub blog: BlogStore,
    /// Works (project showcase) store
    pub works: WorkStore,
    /// Tech stack store
    pub tech_stack: TechStackStore,
    /// Contact-form mail relay
    pub mailer: Mailer,
}

impl App {
    /// Build the application from configuration
    pub fn new(config: config::AppConfig) -> Self {
        let client = CmsClient::new(&config.cms);
        let mailer = Mailer::new(config.mail.clone());

        Self {
            blog: BlogStore::new(client.clone()),
            works: WorkStore::new(client.clone()),
            tech_stack: TechStackStore::new(client),
            mailer,
            config,
        }
    }
}
