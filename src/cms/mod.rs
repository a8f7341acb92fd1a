//! CMS gateway: typed wrapper over the microCMS REST API
//!
//! The gateway translates [`ContentQuery`] values into query-string
//! parameters, deserializes the JSON list envelope, and fails soft: missing
//! credentials or a failed remote call degrade to empty results instead of
//! propagating errors into page rendering.

mod client;
mod model;
mod query;
mod resolve;

pub use client::{CmsClient, CmsError};
pub use model::{
    BlogPost, Category, ContentPage, ImageRef, RawWorkItem, StringOrList, Tag, TechStack,
    WorkItem, WorkType,
};
pub use query::{ContentQuery, Filter};
pub use resolve::{
    normalize_slug, resolve_filtered, slug_matches, FilterOutcome, ResolvedPage,
    FALLBACK_SCAN_LIMIT,
};
