//! Blog listing engine: publication filter, facet filter, pagination
//!
//! Pure functions over post slices plus an immutable `FilterState`.
//! Presentation builds a `ListingView` from the two and never touches the
//! filtering rules directly.

use crate::content::Post;

/// All posts where `published != false`
pub fn published(posts: &[Post]) -> Vec<&Post> {
    posts.iter().filter(|p| p.published).collect()
}

/// Sorted set of every tag appearing across the given posts
///
/// Lexicographic order, case-sensitive as stored.
pub fn available_tags(posts: &[&Post]) -> Vec<String> {
    let mut tags: Vec<String> = posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Filter posts by free-text query and an optional exact tag
///
/// A non-empty query matches case-insensitively as a substring of the
/// title, the description, or any tag. A selected tag must be contained
/// exactly in the post's tag set. Empty query and no tag are identity
/// filters; an unknown tag yields an empty result, not an error.
pub fn filter<'a>(posts: &[&'a Post], query: &str, tag: Option<&str>) -> Vec<&'a Post> {
    let query = query.to_lowercase();

    posts
        .iter()
        .filter(|post| {
            let matches_query = query.is_empty()
                || post.title.to_lowercase().contains(&query)
                || post.description.to_lowercase().contains(&query)
                || post.tags.iter().any(|t| t.to_lowercase().contains(&query));

            let matches_tag = tag.map_or(true, |t| post.tags.iter().any(|pt| pt == t));

            matches_query && matches_tag
        })
        .copied()
        .collect()
}

/// Slice out one page: `[(page - 1) * size, page * size)`
///
/// An out-of-range page yields an empty slice; callers clamp the page (or
/// tolerate emptiness) themselves.
pub fn paginate<'a>(posts: &[&'a Post], page: usize, page_size: usize) -> Vec<&'a Post> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }
    let start = (page - 1) * page_size;
    if start >= posts.len() {
        return Vec::new();
    }
    let end = (start + page_size).min(posts.len());
    posts[start..end].to_vec()
}

/// Number of pages for `count` items, never less than 1
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Facet and pagination state for the listing view
///
/// Transitions return a new state rather than mutating in place; changing
/// the query or selected tag always resets the page to 1, so stale page
/// numbers can never point past the end of a freshly filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub selected_tag: Option<String>,
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            selected_tag: None,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the free-text query; resets the page to 1
    pub fn with_query(&self, query: &str) -> Self {
        Self {
            query: query.to_string(),
            selected_tag: self.selected_tag.clone(),
            page: 1,
        }
    }

    /// Select a tag, or deselect it if it is already active; resets the
    /// page to 1
    pub fn toggle_tag(&self, tag: &str) -> Self {
        let selected_tag = if self.selected_tag.as_deref() == Some(tag) {
            None
        } else {
            Some(tag.to_string())
        };
        Self {
            query: self.query.clone(),
            selected_tag,
            page: 1,
        }
    }

    /// Clear both facets; resets the page to 1
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Move to another page, keeping the facets
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            query: self.query.clone(),
            selected_tag: self.selected_tag.clone(),
            page,
        }
    }
}

/// Why a listing page has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    /// There are posts, and the current filters matched some
    None,
    /// The store has no published posts at all
    NoPosts,
    /// Filters matched nothing
    NoMatches,
}

/// One renderable page of the blog listing
#[derive(Debug, Clone)]
pub struct ListingView<'a> {
    /// Posts on the current page
    pub entries: Vec<&'a Post>,
    /// All tags across published posts, for the facet list
    pub tags: Vec<String>,
    /// Matches across all pages
    pub total_matches: usize,
    /// Page count over the filtered set, at least 1
    pub total_pages: usize,
    /// Current page, clamped into `[1, total_pages]`
    pub page: usize,
    /// Which empty state applies, if any
    pub empty: EmptyKind,
}

impl<'a> ListingView<'a> {
    /// Build the view for one filter state over the full post collection
    pub fn build(posts: &'a [Post], state: &FilterState, page_size: usize) -> Self {
        let published = published(posts);
        let tags = available_tags(&published);
        let filtered = filter(&published, &state.query, state.selected_tag.as_deref());

        let total_matches = filtered.len();
        let total_pages = total_pages(total_matches, page_size);
        let page = state.page.clamp(1, total_pages);
        let entries = paginate(&filtered, page, page_size);

        let empty = if !entries.is_empty() {
            EmptyKind::None
        } else if published.is_empty() {
            EmptyKind::NoPosts
        } else {
            EmptyKind::NoMatches
        };

        Self {
            entries,
            tags,
            total_matches,
            total_pages,
            page,
            empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, title: &str, description: &str, tags: &[&str], published: bool) -> Post {
        Post {
            slug: slug.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            date: "2025-01-01".parse().unwrap(),
            reading_time: "3 min read".to_string(),
            author: "Jane".to_string(),
            cover_image: String::new(),
            published,
        }
    }

    fn sample_posts() -> Vec<Post> {
        vec![
            post("ci-cd", "CI/CD Pipelines", "Automating builds", &["DevOps", "Jenkins"], true),
            post("k8s", "Kubernetes Basics", "Container orchestration", &["Kubernetes", "DevOps"], true),
            post("aws-1", "AWS Networking", "VPCs explained", &["AWS"], true),
            post("aws-2", "AWS Lambda", "Serverless functions", &["AWS"], true),
            post("rust", "Learning Rust", "Ownership and borrowing", &["Rust"], true),
            post("draft", "Unfinished", "Not ready", &["DevOps"], false),
        ]
    }

    #[test]
    fn test_published_excludes_drafts() {
        let posts = sample_posts();
        let published = published(&posts);
        assert_eq!(published.len(), 5);
        assert!(published.iter().all(|p| p.slug != "draft"));
    }

    #[test]
    fn test_available_tags_sorted_and_deduped() {
        let posts = sample_posts();
        let published = published(&posts);
        assert_eq!(
            available_tags(&published),
            vec!["AWS", "DevOps", "Jenkins", "Kubernetes", "Rust"]
        );
    }

    #[test]
    fn test_empty_query_and_no_tag_is_identity() {
        let posts = sample_posts();
        let published = published(&posts);
        let filtered = filter(&published, "", None);
        assert_eq!(filtered.len(), published.len());
    }

    #[test]
    fn test_query_is_case_insensitive_across_fields() {
        let posts = sample_posts();
        let published = published(&posts);

        // Matches the "DevOps" tag on two published posts
        let by_tag = filter(&published, "devops", None);
        assert_eq!(by_tag.len(), 2);

        // Matches a title
        let by_title = filter(&published, "kubernetes", None);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].slug, "k8s");

        // Matches a description
        let by_description = filter(&published, "OWNERSHIP", None);
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].slug, "rust");
    }

    #[test]
    fn test_whitespace_query_matches_as_substring() {
        // Only the empty string is an identity filter; a bare space is a
        // real substring query.
        let posts = vec![
            post("two-words", "Cloud Networking", "", &["AWS"], true),
            post("one-word", "Serverless", "Functions", &["Lambda"], true),
        ];
        let refs = published(&posts);

        let filtered = filter(&refs, " ", None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].slug, "two-words");
    }

    #[test]
    fn test_tag_match_is_exact() {
        let posts = sample_posts();
        let published = published(&posts);

        let aws = filter(&published, "", Some("AWS"));
        assert_eq!(aws.len(), 2);

        // Tag selection is case-sensitive and exact
        let lowercase = filter(&published, "", Some("aws"));
        assert!(lowercase.is_empty());

        // Unknown tag yields an empty set, not an error
        let unknown = filter(&published, "", Some("Cobol"));
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_query_and_tag_combine() {
        let posts = sample_posts();
        let published = published(&posts);
        let filtered = filter(&published, "lambda", Some("AWS"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].slug, "aws-2");
    }

    #[test]
    fn test_paginate_bounds() {
        let posts = sample_posts();
        let published = published(&posts);

        let page1 = paginate(&published, 1, 4);
        assert_eq!(page1.len(), 4);

        let page2 = paginate(&published, 2, 4);
        assert_eq!(page2.len(), 1);

        // Out of range yields an empty slice
        assert!(paginate(&published, 3, 4).is_empty());
        assert!(paginate(&published, 0, 4).is_empty());
    }

    #[test]
    fn test_paginate_is_idempotent() {
        let posts = sample_posts();
        let published = published(&posts);
        let a = paginate(&published, 1, 2);
        let b = paginate(&published, 1, 2);
        assert_eq!(
            a.iter().map(|p| &p.slug).collect::<Vec<_>>(),
            b.iter().map(|p| &p.slug).collect::<Vec<_>>()
        );
        assert!(a.len() <= 2);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 4), 1);
        assert_eq!(total_pages(4, 4), 1);
        assert_eq!(total_pages(5, 4), 2);
        assert_eq!(total_pages(6, 4), 2);
    }

    #[test]
    fn test_query_change_resets_page() {
        let state = FilterState::new().with_page(3);
        assert_eq!(state.page, 3);
        let state = state.with_query("aws");
        assert_eq!(state.page, 1);
        assert_eq!(state.query, "aws");
    }

    #[test]
    fn test_tag_toggle_resets_page_and_deselects() {
        let state = FilterState::new().with_page(2).toggle_tag("AWS");
        assert_eq!(state.page, 1);
        assert_eq!(state.selected_tag.as_deref(), Some("AWS"));

        // Toggling the active tag clears it
        let state = state.with_page(2).toggle_tag("AWS");
        assert_eq!(state.selected_tag, None);
        assert_eq!(state.page, 1);

        // Toggling a different tag replaces the selection
        let state = state.toggle_tag("Rust").toggle_tag("DevOps");
        assert_eq!(state.selected_tag.as_deref(), Some("DevOps"));
    }

    #[test]
    fn test_view_scenario_six_matches_page_size_four() {
        // Six posts matching tag "AWS" at page size 4: page 1 has 4,
        // page 2 has 2.
        let mut posts = sample_posts();
        posts.push(post("aws-3", "EKS Deep Dive", "", &["AWS"], true));
        posts.push(post("aws-4", "S3 Lifecycle", "", &["AWS"], true));
        posts.push(post("aws-5", "IAM Gotchas", "", &["AWS"], true));
        posts.push(post("aws-6", "CloudFront", "", &["AWS"], true));

        let state = FilterState::new().toggle_tag("AWS");
        let view = ListingView::build(&posts, &state, 4);
        assert_eq!(view.total_matches, 6);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.entries.len(), 4);
        assert_eq!(view.empty, EmptyKind::None);

        let view = ListingView::build(&posts, &state.with_page(2), 4);
        assert_eq!(view.page, 2);
        assert_eq!(view.entries.len(), 2);
    }

    #[test]
    fn test_view_clamps_out_of_range_page() {
        let posts = sample_posts();
        let state = FilterState::new().with_page(99);
        let view = ListingView::build(&posts, &state, 4);
        assert_eq!(view.page, view.total_pages);
        assert!(!view.entries.is_empty());
    }

    #[test]
    fn test_view_distinguishes_empty_states() {
        // No published posts at all
        let drafts = vec![post("d", "Draft", "", &[], false)];
        let view = ListingView::build(&drafts, &FilterState::new(), 4);
        assert_eq!(view.empty, EmptyKind::NoPosts);

        // Posts exist but nothing matches
        let posts = sample_posts();
        let state = FilterState::new().with_query("no such thing");
        let view = ListingView::build(&posts, &state, 4);
        assert_eq!(view.empty, EmptyKind::NoMatches);
        assert_eq!(view.total_matches, 0);
        assert_eq!(view.total_pages, 1);
    }
}
