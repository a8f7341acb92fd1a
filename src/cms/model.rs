//! CMS entity models and wire-shape normalization
//!
//! Entities are immutable snapshots of CMS state; nothing here is ever
//! written back. The works endpoint returns some fields in inconsistent
//! shapes (string or array, comma-separated strings); [`RawWorkItem`] is the
//! wire shape and [`WorkItem::from_raw`] maps it into one canonical form
//! before any domain logic sees it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The microCMS list envelope: one page of entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPage<T> {
    #[serde(rename = "contents")]
    pub items: Vec<T>,

    #[serde(rename = "totalCount")]
    pub total_count: usize,

    pub offset: usize,

    pub limit: usize,
}

impl<T> ContentPage<T> {
    /// The empty page returned in degraded mode and on gateway failures
    pub fn empty(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            offset: 0,
            limit,
        }
    }
}

/// An image reference (thumbnail, avatar, gallery entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A blog tag, denormalized onto fetched posts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
}

/// A blog category, denormalized onto fetched posts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// A blog post as returned by the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    /// Rendered HTML content
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    pub thumbnail: Option<ImageRef>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub category: Option<Category>,
    #[serde(default)]
    pub is_published: bool,
    pub author_name: Option<String>,
    pub author_avatar: Option<ImageRef>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Publication date for display: falls back to creation date
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

/// A field the CMS serves either as a plain string or an array of strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    /// First value, however the field was shaped
    pub fn first(&self) -> Option<&str> {
        match self {
            StringOrList::One(s) => Some(s.as_str()),
            StringOrList::Many(v) => v.first().map(String::as_str),
        }
    }

    /// Flatten into a list, splitting a single string on commas
    pub fn into_list(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => s
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
            StringOrList::Many(v) => v,
        }
    }
}

/// The kind of work entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    WebApp,
    Website,
}

impl WorkType {
    /// Map the CMS's loose wire values ("Webアプリ", "WebApp", ...) onto the
    /// canonical variants; unrecognized values default to `WebApp`.
    pub fn from_wire(value: &str) -> Self {
        let lowered = value.trim().to_lowercase();
        match lowered.as_str() {
            "website" | "webサイト" => WorkType::Website,
            _ => WorkType::WebApp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::WebApp => "WebApp",
            WorkType::Website => "Website",
        }
    }
}

/// A work item exactly as the CMS serves it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWorkItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub thumbnail: Option<ImageRef>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(rename = "type")]
    pub work_type: Option<StringOrList>,
    #[serde(default)]
    pub category: String,
    pub tech_stack: Option<StringOrList>,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub order: Option<i64>,
    pub status: Option<StringOrList>,
    pub duration: Option<String>,
    pub role: Option<String>,
    pub client: Option<String>,
    pub challenge: Option<String>,
    pub solution: Option<String>,
    pub result: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A work item in canonical internal shape
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub thumbnail: Option<ImageRef>,
    pub images: Vec<ImageRef>,
    pub work_type: WorkType,
    pub category: String,
    pub tech_stack: Vec<String>,
    pub year: String,
    pub is_published: bool,
    pub is_featured: bool,
    pub order: Option<i64>,
    pub status: Option<String>,
    pub duration: Option<String>,
    pub role: Option<String>,
    pub client: Option<String>,
    pub challenge: Option<String>,
    pub solution: Option<String>,
    pub result: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    /// Pure mapping from the inconsistent wire representation
    pub fn from_raw(raw: RawWorkItem) -> Self {
        let work_type = raw
            .work_type
            .as_ref()
            .and_then(StringOrList::first)
            .map(WorkType::from_wire)
            .unwrap_or(WorkType::WebApp);

        let tech_stack = raw.tech_stack.map(StringOrList::into_list).unwrap_or_default();

        let status = raw
            .status
            .as_ref()
            .and_then(StringOrList::first)
            .map(str::to_string);

        Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            content: raw.content,
            thumbnail: raw.thumbnail,
            images: raw.images,
            work_type,
            category: raw.category,
            tech_stack,
            year: raw.year,
            is_published: raw.is_published,
            is_featured: raw.is_featured,
            order: raw.order,
            status,
            duration: raw.duration,
            role: raw.role,
            client: raw.client,
            challenge: raw.challenge,
            solution: raw.solution,
            result: raw.result,
            live_url: raw.live_url,
            github_url: raw.github_url,
            published_at: raw.published_at,
            created_at: raw.created_at,
        }
    }
}

/// A tech stack entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStack {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Self-assessed proficiency, 1-100
    pub proficiency_level: u32,
    pub years_of_experience: u32,
    #[serde(default)]
    pub is_active: bool,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_work(json: serde_json::Value) -> RawWorkItem {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_work_type_from_array_wire_shape() {
        let raw = raw_work(serde_json::json!({
            "id": "w1",
            "title": "Shop",
            "type": ["Webサイト"],
            "createdAt": "2024-01-10T00:00:00.000Z"
        }));
        let work = WorkItem::from_raw(raw);
        assert_eq!(work.work_type, WorkType::Website);
    }

    #[test]
    fn test_work_type_from_string_wire_shape() {
        let raw = raw_work(serde_json::json!({
            "id": "w2",
            "title": "Dashboard",
            "type": "Webアプリ",
            "createdAt": "2024-01-10T00:00:00.000Z"
        }));
        let work = WorkItem::from_raw(raw);
        assert_eq!(work.work_type, WorkType::WebApp);
    }

    #[test]
    fn test_tech_stack_from_comma_separated_string() {
        let raw = raw_work(serde_json::json!({
            "id": "w3",
            "title": "Site",
            "techStack": "React, TypeScript, Tailwind CSS",
            "createdAt": "2024-01-10T00:00:00.000Z"
        }));
        let work = WorkItem::from_raw(raw);
        assert_eq!(work.tech_stack, vec!["React", "TypeScript", "Tailwind CSS"]);
    }

    #[test]
    fn test_tech_stack_from_array() {
        let raw = raw_work(serde_json::json!({
            "id": "w4",
            "title": "Site",
            "techStack": ["Rust", "Axum"],
            "status": ["公開中", "保守中"],
            "createdAt": "2024-01-10T00:00:00.000Z"
        }));
        let work = WorkItem::from_raw(raw);
        assert_eq!(work.tech_stack, vec!["Rust", "Axum"]);
        assert_eq!(work.status.as_deref(), Some("公開中"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let raw = raw_work(serde_json::json!({
            "id": "w5",
            "title": "Bare",
            "createdAt": "2024-01-10T00:00:00.000Z"
        }));
        let work = WorkItem::from_raw(raw);
        assert_eq!(work.work_type, WorkType::WebApp);
        assert!(work.tech_stack.is_empty());
        assert!(work.status.is_none());
        assert!(!work.is_published);
    }

    #[test]
    fn test_blog_post_display_date_fallback() {
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "title": "Hello",
            "content": "<p>hi</p>",
            "slug": "hello",
            "isPublished": true,
            "createdAt": "2024-03-01T09:00:00.000Z",
            "updatedAt": "2024-03-02T09:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(post.display_date(), post.created_at);
    }

    #[test]
    fn test_content_page_envelope() {
        let page: ContentPage<BlogPost> = serde_json::from_value(serde_json::json!({
            "contents": [],
            "totalCount": 42,
            "offset": 8,
            "limit": 8
        }))
        .unwrap();
        assert_eq!(page.total_count, 42);
        assert!(page.items.len() <= page.limit);
    }
}
