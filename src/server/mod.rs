//! HTTP surface: page routes and the JSON API
//!
//! CMS-layer failures never surface as 500s here; the gateway fails soft and
//! the page layer maps empty first pages to 404. The contact relay is the
//! only route that returns a hard failure status.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cms::ContentQuery;
use crate::mail::{ContactMessage, RelayOutcome};
use crate::pages;
use crate::App;

/// Start the HTTP server
pub async fn start(app: App) -> Result<()> {
    let ip = app.config.server.ip.clone();
    let port = app.config.server.port;

    let router = router(Arc::new(app));

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { &ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!("Server running at http://{}:{}", ip, port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Build the application router
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(home))
        .route("/works", get(works_index))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .route("/blog/category/:slug", get(blog_category))
        .route("/blog/tag/:slug", get(blog_tag))
        .route("/api/blog", post(api_blog))
        .route("/api/blog/sidebar", post(api_sidebar))
        .route("/api/contact", post(api_contact))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WorksQuery {
    #[serde(rename = "type")]
    work_type: Option<String>,
    year: Option<String>,
    category: Option<String>,
}

/// POST /api/blog body: pagination/filter passthrough
#[derive(Debug, Deserialize)]
struct BlogApiRequest {
    #[serde(default)]
    offset: usize,
    limit: Option<usize>,
    orders: Option<String>,
    filters: Option<String>,
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

async fn healthz(State(app): State<Arc<App>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "cmsConfigured": app.config.cms.is_configured(),
    }))
}

/// Home payload: featured works, latest posts, tech stack
async fn home(State(app): State<Arc<App>>) -> Json<serde_json::Value> {
    let (works, posts, stacks) = tokio::join!(
        app.works.featured(3),
        app.blog.latest(3),
        app.tech_stack.active(),
    );

    Json(json!({
        "featuredWorks": works,
        "latestPosts": posts,
        "techStacks": stacks,
    }))
}

/// Works listing with optional type/year/category filters
async fn works_index(
    State(app): State<Arc<App>>,
    Query(query): Query<WorksQuery>,
) -> Json<serde_json::Value> {
    let works = match (&query.work_type, &query.year, &query.category) {
        (Some(work_type), _, _) => app.works.by_type(work_type).await,
        (_, Some(year), _) => app.works.by_year(year).await,
        (_, _, Some(category)) => app.works.by_category(category).await,
        _ => app.works.all().await,
    };

    let (years, types) = tokio::join!(app.works.available_years(), app.works.available_types());

    Json(json!({
        "works": works,
        "availableYears": years,
        "availableTypes": types,
    }))
}

async fn blog_index(State(app): State<Arc<App>>, Query(query): Query<PageQuery>) -> Response {
    let page = query.page.unwrap_or(1);
    let listing = pages::blog_index(&app.blog, page, app.config.pagination.per_page).await;

    if listing.is_not_found() {
        return not_found();
    }
    Json(listing).into_response()
}

async fn blog_post(State(app): State<Arc<App>>, Path(slug): Path<String>) -> Response {
    let Some(post) = app.blog.post_by_slug(&slug).await else {
        return not_found();
    };

    let related = app.blog.related(&post, 3).await;
    Json(json!({ "post": post, "related": related })).into_response()
}

async fn blog_category(
    State(app): State<Arc<App>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = query.page.unwrap_or(1);
    let listing = pages::category_page(&app.blog, &slug, page, app.config.pagination.per_page).await;

    if listing.is_not_found() {
        return not_found();
    }
    Json(listing).into_response()
}

async fn blog_tag(
    State(app): State<Arc<App>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = query.page.unwrap_or(1);
    let listing = pages::tag_page(&app.blog, &slug, page, app.config.pagination.per_page).await;

    if listing.is_not_found() {
        return not_found();
    }
    Json(listing).into_response()
}

async fn api_blog(
    State(app): State<Arc<App>>,
    Json(request): Json<BlogApiRequest>,
) -> Response {
    let mut query = ContentQuery::new()
        .limit(request.limit.unwrap_or(12))
        .offset(request.offset);

    match request.orders {
        Some(orders) => query = query.raw_orders(orders),
        None => query = query.order_desc("publishedAt"),
    }
    if let Some(filters) = request.filters {
        query = query.raw_filters(filters);
    }

    Json(app.blog.posts(&query).await).into_response()
}

async fn api_sidebar(State(app): State<Arc<App>>) -> Json<pages::Sidebar> {
    Json(pages::sidebar(&app.blog).await)
}

async fn api_contact(State(app): State<Arc<App>>, Json(body): Json<serde_json::Value>) -> Response {
    // Hidden honeypot field: accept silently without relaying
    let honeypot = body
        .get("website")
        .and_then(|v| v.as_str())
        .is_some_and(|v| !v.trim().is_empty());
    if honeypot {
        return (StatusCode::ACCEPTED, Json(json!({ "ok": true }))).into_response();
    }

    let message: ContactMessage = match serde_json::from_value(body) {
        Ok(message) => message,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid request body" })),
            )
                .into_response();
        }
    };

    if let Err(details) = message.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "validation failed", "details": details })),
        )
            .into_response();
    }

    match app.mailer.send(&message).await {
        Ok(RelayOutcome::Sent { provider, id }) => {
            Json(json!({ "ok": true, "method": provider, "id": id })).into_response()
        }
        Ok(RelayOutcome::LogOnly) => (
            StatusCode::ACCEPTED,
            Json(json!({ "ok": true, "mode": "log-only" })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "contact relay failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "failed to send message" })),
            )
                .into_response()
        }
    }
}
