//! HTTP API server
//!
//! Serves the RSS feed, newsletter sign-up, rendered blog bodies and the
//! index queries, and falls back to static files from the public directory.

mod error;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use error::ApiError;

use crate::content::{
    ContentItem, ContentType, Difficulty, FrontMatter, ItemView, MarkdownRenderer,
};
use crate::feed::render_rss;
use crate::index::{highlight, newest_first, SearchFilters, SharedIndex};
use crate::newsletter::{self, SubscribeRequest, SubscribeResponse, INVALID_EMAIL};
use crate::Site;

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const RSS_CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=3600";

const BLOG_NOT_FOUND: &str = "Blog post not found";
const BLOG_LOAD_FAILED: &str = "Failed to load blog content";

/// Shared state of the API handlers
pub struct AppState {
    pub site: Site,
    pub index: SharedIndex,
    pub renderer: MarkdownRenderer,
}

impl AppState {
    pub fn new(site: Site, index: SharedIndex) -> Self {
        Self {
            site,
            index,
            renderer: MarkdownRenderer::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BlogContent {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    content_type: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    tag: Option<String>,
    limit: Option<usize>,
}

/// One `/api/search` hit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit<'a> {
    content: ItemView<'a>,
    score: u32,
    highlighted_title: String,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestParams {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LimitParams {
    limit: Option<usize>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = state.site.public_dir.clone();

    Router::new()
        .route("/api/rss", get(rss_handler))
        .route("/api/newsletter", post(newsletter_handler))
        .route("/api/blog-content/:slug", get(blog_content_handler))
        .route("/api/search", get(search_handler))
        .route("/api/search/suggest", get(suggest_handler))
        .route("/api/related/:type/:slug", get(related_handler))
        .route("/api/content/:type", get(content_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the index and serve until interrupted
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let index = SharedIndex::new();
    let loaded = index.reload(&site.loader());
    tracing::info!("Serving {} content items", loaded.len());

    let state = Arc::new(AppState::new(site.clone(), index));
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn rss_handler(State(state): State<Arc<AppState>>) -> Response {
    let index = state.index.current();
    let xml = render_rss(&state.site.config, index.items(), Utc::now());
    (
        [
            (header::CONTENT_TYPE, RSS_CONTENT_TYPE),
            (header::CACHE_CONTROL, RSS_CACHE_CONTROL),
        ],
        xml,
    )
        .into_response()
}

async fn newsletter_handler(
    payload: std::result::Result<Json<SubscribeRequest>, JsonRejection>,
) -> std::result::Result<Json<SubscribeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected newsletter payload: {}", rejection);
        ApiError::BadRequest(INVALID_EMAIL.to_string())
    })?;
    Ok(Json(newsletter::subscribe(&request)?))
}

/// A slug is a single file stem: no separators, no parent references
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.contains(['/', '\\', '\0'])
        && !slug.contains("..")
}

async fn blog_content_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> std::result::Result<Json<BlogContent>, ApiError> {
    let not_found = || ApiError::NotFound(BLOG_NOT_FOUND.to_string());

    if !is_safe_slug(&slug) {
        return Err(not_found());
    }
    let root = state
        .site
        .config
        .root_for(ContentType::Blog)
        .ok_or_else(not_found)?;
    let dir = state.site.loader().root_dir(root);

    for ext in ["mdx", "md"] {
        let path = dir.join(format!("{}.{}", slug, ext));
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::error!("Error loading blog content {:?}: {}", path, e);
                return Err(ApiError::Internal(BLOG_LOAD_FAILED.to_string()));
            }
        };

        let (_, body) = FrontMatter::parse(&raw).map_err(|e| {
            tracing::error!("Error loading blog content {:?}: {}", path, e);
            ApiError::Internal(BLOG_LOAD_FAILED.to_string())
        })?;

        return Ok(Json(BlogContent {
            content: state.renderer.render_mdx(body),
        }));
    }

    Err(not_found())
}

fn parse_type(raw: &str) -> std::result::Result<ContentType, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Response, ApiError> {
    let filters = SearchFilters {
        content_type: params.content_type.as_deref().map(parse_type).transpose()?,
        category: params.category,
        difficulty: params
            .difficulty
            .as_deref()
            .map(|d| d.parse::<Difficulty>().map_err(ApiError::BadRequest))
            .transpose()?,
        tag: params.tag,
        limit: params.limit,
    };

    let query = params.q.as_deref().unwrap_or_default();
    let now = Utc::now();
    let new_days = state.site.config.new_days;
    let index = state.index.current();
    let hits: Vec<SearchHit<'_>> = index
        .search(query, &filters)
        .into_iter()
        .map(|result| SearchHit {
            content: ItemView::new(result.content, &now, new_days),
            score: result.score,
            highlighted_title: highlight(&result.content.title, query),
        })
        .collect();
    Ok(Json(hits).into_response())
}

async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<String>> {
    let index = state.index.current();
    Json(index.suggestions(params.q.as_deref().unwrap_or_default()))
}

async fn related_handler(
    State(state): State<Arc<AppState>>,
    Path((content_type, slug)): Path<(String, String)>,
    Query(params): Query<LimitParams>,
) -> std::result::Result<Response, ApiError> {
    let content_type = parse_type(&content_type)?;
    let index = state.index.current();
    let source = index.require(content_type, &slug)?;

    let limit = params.limit.unwrap_or(state.site.config.related_limit);
    Ok(Json(index.related_to(source, limit)).into_response())
}

async fn content_handler(
    State(state): State<Arc<AppState>>,
    Path(content_type): Path<String>,
) -> std::result::Result<Response, ApiError> {
    let content_type = parse_type(&content_type)?;
    let index = state.index.current();
    let mut items: Vec<&ContentItem> = index.get_content_by_type(content_type);
    items.sort_by(|a, b| newest_first(a, b));

    let now = Utc::now();
    let new_days = state.site.config.new_days;
    let views: Vec<ItemView<'_>> = items
        .into_iter()
        .map(|item| ItemView::new(item, &now, new_days))
        .collect();
    Ok(Json(views).into_response())
}
