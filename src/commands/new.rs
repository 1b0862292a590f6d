//! Create a new post

use anyhow::Result;
use std::fs;

use crate::content::{BlogIndex, Post};
use crate::Folio;

/// Words per minute used for the reading-time estimate
const READING_WPM: usize = 200;

/// Create a new post: a body stub plus an index record
pub fn create_post(folio: &Folio, title: &str, tags: &[String], draft: bool) -> Result<()> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} produces an empty slug", title);
    }

    let index_path = folio.content_dir.join("blogs.json");
    let mut index = if index_path.exists() {
        let content = fs::read_to_string(&index_path)?;
        serde_json::from_str::<BlogIndex>(&content)?
    } else {
        BlogIndex { posts: Vec::new() }
    };

    if index.posts.iter().any(|p| p.slug == slug) {
        anyhow::bail!("A post with slug {:?} already exists", slug);
    }

    let bodies_dir = folio.content_dir.join("blogs");
    fs::create_dir_all(&bodies_dir)?;
    let body_path = bodies_dir.join(format!("{}.md", slug));
    if body_path.exists() {
        anyhow::bail!("File already exists: {:?}", body_path);
    }

    let body = format!("# {}\n\nWrite your post here.\n", title);
    fs::write(&body_path, &body)?;

    let post = Post {
        slug: slug.clone(),
        title: title.to_string(),
        description: String::new(),
        tags: tags.to_vec(),
        date: chrono::Local::now().date_naive(),
        reading_time: estimate_reading_time(&body),
        author: folio.config.author.clone(),
        cover_image: String::new(),
        published: !draft,
    };
    index.posts.push(post);

    fs::write(&index_path, serde_json::to_string_pretty(&index)?)?;

    println!("Created: {:?}", body_path);
    Ok(())
}

/// Estimate reading time from word count, never under one minute
pub fn estimate_reading_time(markdown: &str) -> String {
    let words = markdown.split_whitespace().count();
    let minutes = words.div_ceil(READING_WPM).max(1);
    format!("{} min read", minutes)
}
