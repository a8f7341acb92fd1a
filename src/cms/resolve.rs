//! Filter resolution: prioritized candidate filters with client-side fallback
//!
//! The CMS filter DSL does not reliably support conditions on fields nested
//! inside array-valued relations across content-model versions. Instead of
//! hard failing, resolution tries an ordered list of candidate expressions
//! from most specific to most permissive and accepts the first one whose
//! reported total is non-zero. When every candidate comes back empty, a
//! bounded unfiltered window of published entities is scanned in memory with
//! tolerant matching and paginated locally.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cms::client::CmsClient;
use crate::cms::model::ContentPage;
use crate::cms::query::{ContentQuery, Filter};

/// Hard ceiling on the client-side fallback scan. Entities beyond it are
/// invisible to the fallback filter, a known precision/recall trade-off.
pub const FALLBACK_SCAN_LIMIT: usize = 100;

/// Which path produced a resolved result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "filter", rename_all = "camelCase")]
pub enum FilterOutcome {
    /// A CMS-side candidate filter matched; carries the accepted expression
    Cms(String),
    /// The in-memory fallback over the bounded window matched
    ClientSide,
    /// Every candidate and the fallback came back empty
    Empty,
}

/// One resolved page of entities plus the path that produced it
#[derive(Debug, Clone)]
pub struct ResolvedPage<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub outcome: FilterOutcome,
}

impl<T> ResolvedPage<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            outcome: FilterOutcome::Empty,
        }
    }
}

/// Resolve a logical filter against a list endpoint.
///
/// Candidates are tried in sequence, not in parallel, to preserve early-exit
/// priority semantics; the first candidate with `totalCount > 0` wins and no
/// result sets are merged. A candidate that fails at the gateway looks like
/// an empty page and simply advances the trial.
pub async fn resolve_filtered<T, F>(
    client: &CmsClient,
    endpoint: &str,
    candidates: &[Filter],
    matches: F,
    page: usize,
    page_size: usize,
) -> ResolvedPage<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    let page = page.max(1);
    let offset = (page - 1) * page_size;

    for candidate in candidates {
        let query = ContentQuery::new()
            .limit(page_size)
            .offset(offset)
            .order_desc("publishedAt")
            .filters(candidate.clone());

        let result: ContentPage<T> = client.list(endpoint, &query).await;
        if result.total_count > 0 {
            tracing::debug!(
                filter = candidate.expr(),
                total = result.total_count,
                "CMS-side filter matched"
            );
            return ResolvedPage {
                items: result.items,
                total_count: result.total_count,
                outcome: FilterOutcome::Cms(candidate.expr().to_string()),
            };
        }
    }

    // Client-side fallback over a bounded window of published entities
    let query = ContentQuery::new()
        .limit(FALLBACK_SCAN_LIMIT)
        .order_desc("publishedAt")
        .filters(Filter::published());

    let window: ContentPage<T> = client.list(endpoint, &query).await;
    let filtered: Vec<T> = window.items.into_iter().filter(|item| matches(item)).collect();

    if filtered.is_empty() {
        return ResolvedPage::empty();
    }

    let total_count = filtered.len();
    let items = filtered.into_iter().skip(offset).take(page_size).collect();

    ResolvedPage {
        items,
        total_count,
        outcome: FilterOutcome::ClientSide,
    }
}

/// Normalize a slug or name for tolerant matching: lowercase, dots stripped.
/// Tolerates formatting drift like "Next.js" vs "nextjs".
pub fn normalize_slug(value: &str) -> String {
    value.to_lowercase().replace('.', "")
}

/// Whether a requested slug matches an entity's slug or name, exactly or
/// after normalization
pub fn slug_matches(requested: &str, slug: &str, name: &str) -> bool {
    if slug == requested || name == requested {
        return true;
    }
    let normalized = normalize_slug(requested);
    normalize_slug(slug) == normalized || normalize_slug(name) == normalized
}
