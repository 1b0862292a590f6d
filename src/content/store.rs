//! Content store - loads the post index, body mapping, and portfolio data
//!
//! The store is read-only after `load`. Post metadata comes from
//! `blogs.json`, portfolio sections from `portfolio.json`, and Markdown
//! bodies live under `blogs/` addressed by slug. The slug to body-file
//! mapping is precompiled here so the detail renderer never has to probe
//! the filesystem with dynamic paths.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{BlogIndex, Portfolio, Post};

/// Post index file name inside the content directory
const INDEX_FILE: &str = "blogs.json";
/// Portfolio data file name inside the content directory
const PORTFOLIO_FILE: &str = "portfolio.json";
/// Directory of Markdown bodies inside the content directory
const BODIES_DIR: &str = "blogs";

/// Errors raised while loading the content store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed post index {path}: {source}")]
    Index {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("malformed portfolio data {path}: {source}")]
    Portfolio {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("duplicate post slug: {0}")]
    DuplicateSlug(String),
}

/// Immutable content store, loaded once at startup
#[derive(Debug, Clone)]
pub struct ContentStore {
    /// All posts from the index, published or not, newest first
    posts: Vec<Post>,
    /// Slug to Markdown body file, in body-directory order
    bodies: IndexMap<String, PathBuf>,
    /// Portfolio section data
    portfolio: Portfolio,
}

impl ContentStore {
    /// Load the store from a content directory
    pub fn load(content_dir: &Path) -> Result<Self, StoreError> {
        let mut posts = load_index(content_dir)?;
        // Newest first; index file order is not significant
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        let mut seen = std::collections::HashSet::new();
        for post in &posts {
            if !seen.insert(post.slug.clone()) {
                return Err(StoreError::DuplicateSlug(post.slug.clone()));
            }
        }

        let bodies = scan_bodies(&content_dir.join(BODIES_DIR));
        let portfolio = load_portfolio(content_dir)?;

        tracing::info!(
            "Loaded {} posts ({} bodies on disk)",
            posts.len(),
            bodies.len()
        );

        Ok(Self {
            posts,
            bodies,
            portfolio,
        })
    }

    /// All posts, drafts included, newest first
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Published posts, newest first
    pub fn published(&self) -> Vec<&Post> {
        crate::listing::published(&self.posts)
    }

    /// Find a published post by slug
    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug && p.published)
    }

    /// Path of the Markdown body for a slug, if one exists on disk
    pub fn body_path(&self, slug: &str) -> Option<&Path> {
        self.bodies.get(slug).map(PathBuf::as_path)
    }

    /// Portfolio section data
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }
}

fn load_index(content_dir: &Path) -> Result<Vec<Post>, StoreError> {
    let path = content_dir.join(INDEX_FILE);
    if !path.exists() {
        // No index at all is the "no content yet" case, not an error
        tracing::warn!("Post index {:?} not found, starting empty", path);
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
        path: path.clone(),
        source,
    })?;
    let index: BlogIndex =
        serde_json::from_str(&content).map_err(|source| StoreError::Index { path, source })?;
    Ok(index.posts)
}

fn load_portfolio(content_dir: &Path) -> Result<Portfolio, StoreError> {
    let path = content_dir.join(PORTFOLIO_FILE);
    let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Portfolio { path, source })
}

/// Build the slug to body-file mapping
fn scan_bodies(bodies_dir: &Path) -> IndexMap<String, PathBuf> {
    let mut bodies = IndexMap::new();
    if !bodies_dir.exists() {
        return bodies;
    }

    for entry in WalkDir::new(bodies_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_markdown_file(path) {
            if let Some(slug) = path.file_stem().and_then(|s| s.to_str()) {
                bodies.insert(slug.to_string(), path.to_path_buf());
            }
        }
    }

    bodies
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PORTFOLIO_JSON: &str = r#"{
        "hero": {
            "name": "Jane",
            "title": "Engineer",
            "description": "",
            "image": { "src": "/assets/me.png" }
        },
        "skills": { "title": "Skills" },
        "experience": { "title": "Experience" },
        "projects": { "title": "Projects" },
        "contact": { "title": "Contact", "email": "jane@example.com" }
    }"#;

    fn fixture(index: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blogs.json"), index).unwrap();
        fs::write(dir.path().join("portfolio.json"), PORTFOLIO_JSON).unwrap();
        fs::create_dir_all(dir.path().join("blogs")).unwrap();
        dir
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let dir = fixture(
            r#"{"posts": [
                {"slug": "old", "title": "Old", "description": "", "date": "2024-01-01"},
                {"slug": "new", "title": "New", "description": "", "date": "2025-06-01"}
            ]}"#,
        );
        let store = ContentStore::load(dir.path()).unwrap();
        assert_eq!(store.posts()[0].slug, "new");
        assert_eq!(store.posts()[1].slug, "old");
    }

    #[test]
    fn test_find_skips_unpublished() {
        let dir = fixture(
            r#"{"posts": [
                {"slug": "draft", "title": "Draft", "description": "", "date": "2025-01-01", "published": false},
                {"slug": "live", "title": "Live", "description": "", "date": "2025-01-02"}
            ]}"#,
        );
        let store = ContentStore::load(dir.path()).unwrap();
        assert!(store.find("draft").is_none());
        assert!(store.find("live").is_some());
        assert_eq!(store.published().len(), 1);
        assert_eq!(store.posts().len(), 2);
    }

    #[test]
    fn test_body_mapping() {
        let dir = fixture(r#"{"posts": []}"#);
        fs::write(dir.path().join("blogs/hello.md"), "# Hello").unwrap();
        fs::write(dir.path().join("blogs/notes.txt"), "not markdown").unwrap();

        let store = ContentStore::load(dir.path()).unwrap();
        assert!(store.body_path("hello").is_some());
        assert!(store.body_path("notes").is_none());
        assert!(store.body_path("missing").is_none());
    }

    #[test]
    fn test_missing_index_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("portfolio.json"), PORTFOLIO_JSON).unwrap();
        let store = ContentStore::load(dir.path()).unwrap();
        assert!(store.posts().is_empty());
    }

    #[test]
    fn test_malformed_index_is_error() {
        let dir = fixture(r#"{"posts": [{"slug": 42}]}"#);
        let err = ContentStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Index { .. }));
    }

    #[test]
    fn test_duplicate_slug_is_error() {
        let dir = fixture(
            r#"{"posts": [
                {"slug": "dup", "title": "A", "description": "", "date": "2025-01-01"},
                {"slug": "dup", "title": "B", "description": "", "date": "2025-01-02"}
            ]}"#,
        );
        let err = ContentStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(s) if s == "dup"));
    }
}
