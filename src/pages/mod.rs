//! Page assemblers: pagination metadata over store results
//!
//! Assemblers compute the listing envelope the page layer consumes. The
//! not-found contract lives here: an empty first page means the listing does
//! not exist; an empty later page is just "no more results".

use serde::Serialize;

use crate::cms::{BlogPost, FilterOutcome};
use crate::content::{BlogStore, CategoryCount};

/// Recent posts shown in the blog sidebar
pub const SIDEBAR_RECENT_COUNT: usize = 5;

/// One assembled listing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    /// How the listing was filtered, when filter resolution was involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_filter: Option<FilterOutcome>,
}

impl<T> Listing<T> {
    /// The caller should surface a not-found state: nothing matched on the
    /// first page. Empty later pages render as "no more results" instead.
    pub fn is_not_found(&self) -> bool {
        self.current_page == 1 && self.items.is_empty()
    }
}

/// `ceil(total_count / page_size)`
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// The plain published listing (blog index)
pub async fn blog_index(blog: &BlogStore, page: usize, page_size: usize) -> Listing<BlogPost> {
    let page = page.max(1);
    let result = blog.published_page(page, page_size).await;

    Listing {
        total_pages: total_pages(result.total_count, page_size),
        total_count: result.total_count,
        items: result.items,
        current_page: page,
        page_size,
        used_filter: None,
    }
}

/// Category listing via filter resolution
pub async fn category_page(
    blog: &BlogStore,
    slug: &str,
    page: usize,
    page_size: usize,
) -> Listing<BlogPost> {
    let page = page.max(1);
    let resolved = blog.by_category(slug, page, page_size).await;

    Listing {
        total_pages: total_pages(resolved.total_count, page_size),
        total_count: resolved.total_count,
        items: resolved.items,
        current_page: page,
        page_size,
        used_filter: Some(resolved.outcome),
    }
}

/// Tag listing via filter resolution
pub async fn tag_page(
    blog: &BlogStore,
    slug: &str,
    page: usize,
    page_size: usize,
) -> Listing<BlogPost> {
    let page = page.max(1);
    let resolved = blog.by_tag(slug, page, page_size).await;

    Listing {
        total_pages: total_pages(resolved.total_count, page_size),
        total_count: resolved.total_count,
        items: resolved.items,
        current_page: page,
        page_size,
        used_filter: Some(resolved.outcome),
    }
}

/// Sidebar aggregate: recent posts plus category counts. The two needs are
/// independent reads with no ordering dependency, so they run concurrently.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub recent_posts: Vec<RecentPost>,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPost {
    pub title: String,
    pub slug: String,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

pub async fn sidebar(blog: &BlogStore) -> Sidebar {
    let (recent, categories) = tokio::join!(
        blog.latest(SIDEBAR_RECENT_COUNT),
        blog.categories_with_count()
    );

    Sidebar {
        recent_posts: recent
            .into_iter()
            .map(|post| RecentPost {
                published_at: post.display_date(),
                title: post.title,
                slug: post.slug,
            })
            .collect(),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 8), 0);
        assert_eq!(total_pages(1, 8), 1);
        assert_eq!(total_pages(8, 8), 1);
        assert_eq!(total_pages(9, 8), 2);
        assert_eq!(total_pages(5, 8), 1);
    }

    #[test]
    fn test_total_pages_zero_page_size() {
        assert_eq!(total_pages(10, 0), 0);
    }

    fn listing(items: usize, page: usize) -> Listing<u32> {
        Listing {
            items: vec![0; items],
            total_count: items,
            total_pages: total_pages(items, 8),
            current_page: page,
            page_size: 8,
            used_filter: None,
        }
    }

    #[test]
    fn test_not_found_on_empty_first_page() {
        assert!(listing(0, 1).is_not_found());
    }

    #[test]
    fn test_empty_later_page_is_not_not_found() {
        // Page out of range reads as "no more results"
        assert!(!listing(0, 2).is_not_found());
    }

    #[test]
    fn test_populated_first_page() {
        assert!(!listing(3, 1).is_not_found());
    }
}
