//! Tech stack store
//!
//! The one store with a static fallback: without CMS credentials the site
//! still renders a representative skill list instead of an empty section.

use crate::cms::{CmsClient, ContentQuery, Filter, TechStack};

const ENDPOINT: &str = "tech-stacks";

/// Tech stack read operations
#[derive(Clone)]
pub struct TechStackStore {
    client: CmsClient,
}

impl TechStackStore {
    pub fn new(client: CmsClient) -> Self {
        Self { client }
    }

    /// All tech stack entries, grouped by category then proficiency
    pub async fn all(&self) -> Vec<TechStack> {
        if !self.client.is_configured() {
            return static_fallback();
        }

        let query = ContentQuery::new()
            .order_asc("category")
            .order_asc("proficiencyLevel");
        self.client.list_all(ENDPOINT, query).await
    }

    /// Entries in one category, strongest first
    pub async fn by_category(&self, category: &str) -> Vec<TechStack> {
        if !self.client.is_configured() {
            return static_fallback()
                .into_iter()
                .filter(|stack| stack.category == category)
                .collect();
        }

        let query = ContentQuery::new()
            .order_desc("proficiencyLevel")
            .filters(Filter::equals("category", category));
        self.client.list_all(ENDPOINT, query).await
    }

    /// Actively-used entries only
    pub async fn active(&self) -> Vec<TechStack> {
        if !self.client.is_configured() {
            return static_fallback()
                .into_iter()
                .filter(|stack| stack.is_active)
                .collect();
        }

        let query = ContentQuery::new()
            .order_desc("proficiencyLevel")
            .filters(Filter::equals("isActive", "true"));
        self.client.list_all(ENDPOINT, query).await
    }
}

fn entry(
    id: &str,
    name: &str,
    category: &str,
    proficiency: u32,
    years: u32,
    color: &str,
) -> TechStack {
    TechStack {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        proficiency_level: proficiency,
        years_of_experience: years,
        is_active: true,
        description: None,
        color: Some(color.to_string()),
    }
}

/// Representative skills shown when the environment is not configured
fn static_fallback() -> Vec<TechStack> {
    vec![
        entry("1", "React", "Frontend", 95, 5, "#61DAFB"),
        entry("2", "Next.js", "Frontend", 90, 3, "#000000"),
        entry("3", "TypeScript", "Frontend", 88, 4, "#3178C6"),
        entry("4", "Tailwind CSS", "Frontend", 85, 2, "#06B6D4"),
        entry("5", "Node.js", "Backend", 80, 4, "#339933"),
        entry("6", "GraphQL", "Backend", 75, 2, "#E10098"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;

    fn unconfigured_store() -> TechStackStore {
        TechStackStore::new(CmsClient::new(&CmsConfig::default()))
    }

    #[tokio::test]
    async fn test_fallback_without_environment() {
        let store = unconfigured_store();
        let all = store.all().await;
        assert!(!all.is_empty());
        assert!(all.iter().any(|stack| stack.name == "React"));
    }

    #[tokio::test]
    async fn test_fallback_category_filter() {
        let store = unconfigured_store();
        let backend = store.by_category("Backend").await;
        assert!(!backend.is_empty());
        assert!(backend.iter().all(|stack| stack.category == "Backend"));
    }
}
