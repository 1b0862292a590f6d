//! List site content

use anyhow::Result;

use crate::content::ContentStore;
use crate::listing::{EmptyKind, FilterState, ListingView};
use crate::Folio;

/// List site content by type, optionally filtered like the blog listing
pub fn run(folio: &Folio, content_type: &str, query: Option<&str>, tag: Option<&str>) -> Result<()> {
    let store = folio.load_store()?;

    match content_type {
        "post" | "posts" => {
            if query.is_some() || tag.is_some() {
                list_filtered(folio, &store, query.unwrap_or(""), tag)?;
            } else {
                list_posts(&store);
            }
        }
        "tag" | "tags" => {
            list_tags(&store);
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}

fn list_posts(store: &ContentStore) {
    let posts = store.posts();
    println!("Posts ({}):", posts.len());
    for post in posts {
        let marker = if post.published { "" } else { " (draft)" };
        println!(
            "  {} - {} [{}]{}",
            post.date.format("%Y-%m-%d"),
            post.title,
            post.slug,
            marker
        );
    }
}

/// Apply the same filter rules the generated listing uses
fn list_filtered(
    folio: &Folio,
    store: &ContentStore,
    query: &str,
    tag: Option<&str>,
) -> Result<()> {
    let mut state = FilterState::new().with_query(query);
    if let Some(tag) = tag {
        state = state.toggle_tag(tag);
    }

    let view = ListingView::build(store.posts(), &state, folio.config.per_page);

    match view.empty {
        EmptyKind::NoPosts => println!("No blog posts available yet."),
        EmptyKind::NoMatches => println!("No blog posts found matching your criteria."),
        EmptyKind::None => {
            println!(
                "Matches: {} (page {} of {})",
                view.total_matches, view.page, view.total_pages
            );
            for post in &view.entries {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
    }

    Ok(())
}

fn list_tags(store: &ContentStore) {
    let mut tags: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for post in store.published() {
        for tag in &post.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    println!("Tags ({}):", tags.len());
    let mut tags: Vec<_> = tags.into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (tag, count) in tags {
        println!("  {} ({})", tag, count);
    }
}
