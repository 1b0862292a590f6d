//! Post detail view: slug lookup, async body fetch, soft-fail rendering
//!
//! The view state machine is `Loading -> {Loaded, NotFound}`. `NotFound`
//! is terminal and entered without fetching anything. A missing or
//! unreadable body never surfaces as an error: the view loads with a
//! fixed placeholder body and a structured fallback code for diagnostics.

use crate::content::{ContentStore, MarkdownRenderer, Post, RenderedBody};

/// Placeholder body when no Markdown source exists for the slug
pub const MISSING_BODY: &str =
    "# Content not found\n\nThe blog post content could not be loaded.";

/// Placeholder body when reading the Markdown source failed
pub const ERROR_BODY: &str = "# Error\n\nFailed to load the blog post content.";

/// Why a placeholder body was substituted for the real one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFallback {
    /// No body file is mapped to the slug
    Missing,
    /// The body file exists but could not be read
    ReadFailed,
}

/// A fully resolved detail page
#[derive(Debug, Clone)]
pub struct RenderedPost {
    pub post: Post,
    pub body: RenderedBody,
    /// Set when the body is a placeholder rather than real content
    pub fallback: Option<BodyFallback>,
}

/// Detail view state
#[derive(Debug, Clone)]
pub enum DetailState {
    /// Body fetch has not settled yet
    Loading,
    /// No published post matches the slug; terminal, nothing was fetched
    NotFound,
    /// Body fetch settled, possibly with a placeholder
    Loaded(Box<RenderedPost>),
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DetailState::NotFound)
    }
}

/// Resolve a slug into its terminal detail state
pub async fn load(store: &ContentStore, renderer: &MarkdownRenderer, slug: &str) -> DetailState {
    let Some(post) = store.find(slug) else {
        return DetailState::NotFound;
    };

    let (markdown, fallback) = load_body(store, slug).await;
    let body = render_soft(renderer, &markdown);

    DetailState::Loaded(Box::new(RenderedPost {
        post: post.clone(),
        body,
        fallback,
    }))
}

/// Fetch the Markdown body for a slug, substituting placeholders on failure
pub async fn load_body(store: &ContentStore, slug: &str) -> (String, Option<BodyFallback>) {
    let Some(path) = store.body_path(slug) else {
        tracing::warn!("No body file for post {}", slug);
        return (MISSING_BODY.to_string(), Some(BodyFallback::Missing));
    };

    match tokio::fs::read_to_string(path).await {
        Ok(markdown) => (markdown, None),
        Err(e) => {
            tracing::error!("Failed to read body for post {}: {}", slug, e);
            (ERROR_BODY.to_string(), Some(BodyFallback::ReadFailed))
        }
    }
}

/// Render markdown, falling back to a bare error body if rendering fails
pub fn render_soft(renderer: &MarkdownRenderer, markdown: &str) -> RenderedBody {
    match renderer.render(markdown) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Markdown render failed: {}", e);
            RenderedBody {
                html: "<h1>Error</h1><p>Failed to load the blog post content.</p>".to_string(),
                headings: Vec::new(),
            }
        }
    }
}
