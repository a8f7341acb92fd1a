//! Works (project showcase) store
//!
//! Every list call fetches the raw wire shape and normalizes it through
//! [`WorkItem::from_raw`] before anything downstream sees it.

use crate::cms::{CmsClient, ContentQuery, Filter, RawWorkItem, WorkItem, WorkType};

const ENDPOINT: &str = "works";

/// Works read operations
#[derive(Clone)]
pub struct WorkStore {
    client: CmsClient,
}

impl WorkStore {
    pub fn new(client: CmsClient) -> Self {
        Self { client }
    }

    /// Featured works for the home page: `isFeatured` entries first,
    /// backfilled with the latest published works, de-duplicated by id.
    pub async fn featured(&self, limit: usize) -> Vec<WorkItem> {
        let query = ContentQuery::new()
            .limit(limit)
            .order_desc("publishedAt")
            .order_desc("createdAt")
            .filters(Filter::published().and(Filter::equals("isFeatured", "true")));
        let mut featured = self.list(&query).await;

        if featured.len() < limit {
            let query = ContentQuery::new()
                .limit(limit * 2)
                .order_desc("publishedAt")
                .order_desc("createdAt")
                .filters(Filter::published());
            let latest = self.list(&query).await;

            for work in latest {
                if featured.len() >= limit {
                    break;
                }
                if !featured.iter().any(|existing| existing.id == work.id) {
                    featured.push(work);
                }
            }
        }

        featured.truncate(limit);
        featured
    }

    /// All published works in display order
    pub async fn all(&self) -> Vec<WorkItem> {
        let query = ContentQuery::new()
            .limit(100)
            .order_asc("order")
            .order_desc("createdAt")
            .filters(Filter::published());
        self.list(&query).await
    }

    /// Published works of one type
    pub async fn by_type(&self, work_type: &str) -> Vec<WorkItem> {
        self.filtered(Filter::contains("type", work_type)).await
    }

    /// Published works from one year
    pub async fn by_year(&self, year: &str) -> Vec<WorkItem> {
        self.filtered(Filter::equals("year", year)).await
    }

    /// Published works in one category
    pub async fn by_category(&self, category: &str) -> Vec<WorkItem> {
        self.filtered(Filter::contains("category", category)).await
    }

    /// Distinct years across published works, newest first
    pub async fn available_years(&self) -> Vec<String> {
        let mut years: Vec<String> = Vec::new();
        for work in self.all().await {
            if !work.year.is_empty() && !years.contains(&work.year) {
                years.push(work.year);
            }
        }
        years.sort_by(|a, b| b.cmp(a));
        years
    }

    /// Distinct work types across published works, in display order
    pub async fn available_types(&self) -> Vec<WorkType> {
        let mut types: Vec<WorkType> = Vec::new();
        for work in self.all().await {
            if !types.contains(&work.work_type) {
                types.push(work.work_type);
            }
        }
        types
    }

    async fn filtered(&self, condition: Filter) -> Vec<WorkItem> {
        let query = ContentQuery::new()
            .limit(100)
            .order_asc("order")
            .order_desc("createdAt")
            .filters(Filter::published().and(condition));
        self.list(&query).await
    }

    async fn list(&self, query: &ContentQuery) -> Vec<WorkItem> {
        self.client
            .list::<RawWorkItem>(ENDPOINT, query)
            .await
            .items
            .into_iter()
            .map(WorkItem::from_raw)
            .collect()
    }
}
