//! Blog post store
//!
//! Category and tag listings go through the filter resolution strategy since
//! both are relations the CMS filter DSL handles inconsistently. Everything
//! else is a direct gateway call.

use std::collections::HashMap;

use crate::cms::{
    resolve_filtered, slug_matches, BlogPost, CmsClient, ContentPage, ContentQuery, Filter,
    ResolvedPage, FALLBACK_SCAN_LIMIT,
};

const ENDPOINT: &str = "blog";

/// A category with its published post count, for the sidebar
#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// Blog post read operations
#[derive(Clone)]
pub struct BlogStore {
    client: CmsClient,
}

impl BlogStore {
    pub fn new(client: CmsClient) -> Self {
        Self { client }
    }

    /// One page of posts for an arbitrary query (API passthrough)
    pub async fn posts(&self, query: &ContentQuery) -> ContentPage<BlogPost> {
        self.client.list(ENDPOINT, query).await
    }

    /// Single post by content id
    pub async fn post_by_id(&self, id: &str) -> Option<BlogPost> {
        self.client.fetch_by_id(ENDPOINT, id).await
    }

    /// Single published post by slug
    pub async fn post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        let filter = Filter::equals("slug", slug).and(Filter::published());
        self.client.first_match(ENDPOINT, filter).await
    }

    /// Most recent published posts, newest first
    pub async fn latest(&self, limit: usize) -> Vec<BlogPost> {
        let query = ContentQuery::new()
            .limit(limit)
            .order_desc("publishedAt")
            .filters(Filter::published());
        self.client.list(ENDPOINT, &query).await.items
    }

    /// One page of published posts, newest first
    pub async fn published_page(&self, page: usize, page_size: usize) -> ContentPage<BlogPost> {
        let page = page.max(1);
        let query = ContentQuery::new()
            .limit(page_size)
            .offset((page - 1) * page_size)
            .order_desc("publishedAt")
            .filters(Filter::published());
        self.client.list(ENDPOINT, &query).await
    }

    /// Posts in a category, resolved through the candidate-filter strategy
    pub async fn by_category(
        &self,
        slug: &str,
        page: usize,
        page_size: usize,
    ) -> ResolvedPage<BlogPost> {
        let candidates = category_candidates(slug);
        resolve_filtered(
            &self.client,
            ENDPOINT,
            &candidates,
            |post: &BlogPost| post_matches_category(post, slug),
            page,
            page_size,
        )
        .await
    }

    /// Posts carrying a tag, resolved through the candidate-filter strategy
    pub async fn by_tag(&self, slug: &str, page: usize, page_size: usize) -> ResolvedPage<BlogPost> {
        let candidates = tag_candidates(slug);
        resolve_filtered(
            &self.client,
            ENDPOINT,
            &candidates,
            |post: &BlogPost| post_matches_tag(post, slug),
            page,
            page_size,
        )
        .await
    }

    /// Published posts sharing a tag with the given post, excluding it.
    /// Falls back to the latest posts when the post has no tags.
    pub async fn related(&self, post: &BlogPost, limit: usize) -> Vec<BlogPost> {
        let mut tag_ids = post.tags.iter().map(|tag| tag.id.as_str());

        let Some(first) = tag_ids.next() else {
            let latest = self.latest(limit + 1).await;
            return latest
                .into_iter()
                .filter(|candidate| candidate.id != post.id)
                .take(limit)
                .collect();
        };

        let shared_tags = tag_ids.fold(Filter::contains("tags", first), |filter, id| {
            filter.or(Filter::contains("tags", id))
        });
        let filter = shared_tags
            .and(Filter::not_equals("id", &post.id))
            .and(Filter::published());

        let query = ContentQuery::new()
            .limit(limit)
            .order_desc("publishedAt")
            .filters(filter);
        self.client.list(ENDPOINT, &query).await.items
    }

    /// Published post counts grouped by category, over a bounded scan window
    pub async fn categories_with_count(&self) -> Vec<CategoryCount> {
        let query = ContentQuery::new()
            .limit(FALLBACK_SCAN_LIMIT)
            .order_desc("publishedAt")
            .filters(Filter::published());
        let posts: ContentPage<BlogPost> = self.client.list(ENDPOINT, &query).await;

        let mut counts: HashMap<String, CategoryCount> = HashMap::new();
        for post in &posts.items {
            if let Some(category) = &post.category {
                counts
                    .entry(category.id.clone())
                    .and_modify(|entry| entry.count += 1)
                    .or_insert_with(|| CategoryCount {
                        name: category.name.clone(),
                        slug: category.slug.clone(),
                        count: 1,
                    });
            }
        }

        let mut result: Vec<CategoryCount> = counts.into_values().collect();
        result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        result
    }
}

/// Candidate category filters, most specific first, all published-guarded
fn category_candidates(slug: &str) -> Vec<Filter> {
    [
        Filter::equals("category.slug", slug),
        Filter::equals("category.name", slug),
        Filter::contains("category.slug", slug),
        Filter::contains("category.name", slug),
        Filter::contains("category", slug),
    ]
    .into_iter()
    .map(|candidate| Filter::published().and(candidate))
    .collect()
}

/// Candidate tag filters against the nested array relation
fn tag_candidates(slug: &str) -> Vec<Filter> {
    [
        Filter::contains("tags", slug),
        Filter::equals("tags.slug", slug),
        Filter::contains("tags.slug", slug),
        Filter::contains("tags.name", slug),
    ]
    .into_iter()
    .map(|candidate| Filter::published().and(candidate))
    .collect()
}

fn post_matches_category(post: &BlogPost, slug: &str) -> bool {
    post.category
        .as_ref()
        .is_some_and(|category| slug_matches(slug, &category.slug, &category.name))
}

fn post_matches_tag(post: &BlogPost, slug: &str) -> bool {
    post.tags
        .iter()
        .any(|tag| slug_matches(slug, &tag.slug, &tag.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{Category, Tag};
    use chrono::Utc;

    fn post_with_tags(tags: Vec<Tag>) -> BlogPost {
        BlogPost {
            id: "p1".to_string(),
            title: "Post".to_string(),
            content: String::new(),
            excerpt: None,
            slug: "post".to_string(),
            thumbnail: None,
            tags,
            category: None,
            is_published: true,
            author_name: None,
            author_avatar: None,
            published_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tag(slug: &str, name: &str) -> Tag {
        Tag {
            id: format!("tag-{}", slug),
            name: name.to_string(),
            slug: slug.to_string(),
            color: None,
        }
    }

    #[test]
    fn test_category_candidates_order() {
        let candidates = category_candidates("frontend");
        let exprs: Vec<&str> = candidates.iter().map(Filter::expr).collect();
        assert_eq!(
            exprs,
            vec![
                "isPublished[equals]true[and]category.slug[equals]frontend",
                "isPublished[equals]true[and]category.name[equals]frontend",
                "isPublished[equals]true[and]category.slug[contains]frontend",
                "isPublished[equals]true[and]category.name[contains]frontend",
                "isPublished[equals]true[and]category[contains]frontend",
            ]
        );
    }

    #[test]
    fn test_tag_candidates_are_published_guarded() {
        for candidate in tag_candidates("react") {
            assert!(candidate.expr().starts_with("isPublished[equals]true[and]"));
        }
    }

    #[test]
    fn test_post_matches_tag_case_insensitive() {
        let post = post_with_tags(vec![tag("React", "React")]);
        assert!(post_matches_tag(&post, "react"));
        assert!(!post_matches_tag(&post, "vue"));
    }

    #[test]
    fn test_post_matches_tag_dot_drift() {
        let post = post_with_tags(vec![tag("next.js", "Next.js")]);
        assert!(post_matches_tag(&post, "nextjs"));
    }

    #[test]
    fn test_post_without_tags_never_matches() {
        let post = post_with_tags(vec![]);
        assert!(!post_matches_tag(&post, "react"));
    }

    #[test]
    fn test_post_matches_category() {
        let mut post = post_with_tags(vec![]);
        post.category = Some(Category {
            id: "c1".to_string(),
            name: "Frontend".to_string(),
            slug: "frontend".to_string(),
            description: None,
        });
        assert!(post_matches_category(&post, "frontend"));
        assert!(post_matches_category(&post, "Frontend"));
        assert!(!post_matches_category(&post, "backend"));
    }
}
