//! Site configuration (folio.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub assets_dir: String,
    pub blog_dir: String,
    pub tag_dir: String,

    // Writing
    /// Include posts with `published: false` in generated output
    pub render_unpublished: bool,
    pub syntax_theme: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Date format
    pub date_format: String,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            assets_dir: "assets".to_string(),
            blog_dir: "blog".to_string(),
            tag_dir: "tags".to_string(),

            render_unpublished: false,
            syntax_theme: "base16-ocean.dark".to_string(),
            highlight: HighlightConfig::default(),

            date_format: "LL".to_string(),

            per_page: 4,
            pagination_dir: "page".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { line_number: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.per_page, 4);
        assert_eq!(config.blog_dir, "blog");
        assert!(!config.render_unpublished);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
per_page: 6
render_unpublished: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 6);
        assert!(config.render_unpublished);
        // Unspecified fields keep their defaults
        assert_eq!(config.tag_dir, "tags");
    }
}
