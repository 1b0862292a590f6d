//! Post model and index file format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A blog post record from the post index
///
/// Metadata lives in `blogs.json`; the Markdown body is a separate file
/// addressed by slug. Records are immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique, URL-safe identifier (also the body file name)
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short description shown on listing cards
    pub description: String,

    /// Post tags (case-sensitive as stored)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Publication date
    pub date: NaiveDate,

    /// Display string like "5 min read"
    #[serde(default)]
    pub reading_time: String,

    /// Post author
    #[serde(default)]
    pub author: String,

    /// Cover image path
    #[serde(default)]
    pub cover_image: String,

    /// Whether the post is published (drafts carry `published: false`)
    #[serde(default = "default_published")]
    pub published: bool,
}

/// Posts are published unless the index says otherwise
fn default_published() -> bool {
    true
}

impl Post {
    /// URL path of the detail page, rooted at the blog directory
    pub fn path(&self, blog_dir: &str) -> String {
        format!("/{}/{}/", blog_dir.trim_matches('/'), self.slug)
    }

    /// Get the previous (older) post in a date-descending list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }

    /// Get the next (newer) post in a date-descending list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            posts.get(pos - 1)
        } else {
            None
        }
    }
}

/// On-disk shape of `blogs.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogIndex {
    pub posts: Vec<Post>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, date: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            tags: Vec::new(),
            date: date.parse().unwrap(),
            reading_time: String::new(),
            author: String::new(),
            cover_image: String::new(),
            published: true,
        }
    }

    #[test]
    fn test_parse_index_record() {
        let json = r#"{
            "slug": "intro-to-kubernetes",
            "title": "Intro to Kubernetes",
            "description": "Getting started with k8s",
            "tags": ["Kubernetes", "DevOps"],
            "date": "2025-03-14",
            "readingTime": "7 min read",
            "author": "Jane Doe",
            "coverImage": "/assets/blog/k8s.png"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.slug, "intro-to-kubernetes");
        assert_eq!(post.reading_time, "7 min read");
        assert_eq!(post.cover_image, "/assets/blog/k8s.png");
        // published defaults to true when absent
        assert!(post.published);
    }

    #[test]
    fn test_unpublished_record() {
        let json = r#"{
            "slug": "draft",
            "title": "Draft",
            "description": "",
            "date": "2025-01-01",
            "published": false
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(!post.published);
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_path() {
        let p = post("hello", "2025-01-01");
        assert_eq!(p.path("blog"), "/blog/hello/");
        assert_eq!(p.path("/blog/"), "/blog/hello/");
    }

    #[test]
    fn test_prev_next_in_date_descending_list() {
        let posts = vec![
            post("newest", "2025-03-01"),
            post("middle", "2025-02-01"),
            post("oldest", "2025-01-01"),
        ];

        assert_eq!(posts[1].prev(&posts).unwrap().slug, "oldest");
        assert_eq!(posts[1].next(&posts).unwrap().slug, "newest");
        assert!(posts[0].next(&posts).is_none());
        assert!(posts[2].prev(&posts).is_none());
    }
}
