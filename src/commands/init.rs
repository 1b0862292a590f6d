//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/blogs"))?;
    fs::create_dir_all(target_dir.join("assets"))?;

    let config_content = r#"# Site
title: Portfolio
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
content_dir: content
public_dir: public
assets_dir: assets
blog_dir: blog
tag_dir: tags

# Writing
render_unpublished: false
syntax_theme: base16-ocean.dark
highlight:
  line_number: true

# Date / Time format
date_format: LL

# Pagination
per_page: 4
pagination_dir: page
"#;
    fs::write(target_dir.join("folio.yml"), config_content)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let index_content = format!(
        r#"{{
  "posts": [
    {{
      "slug": "hello-world",
      "title": "Hello World",
      "description": "Your very first post.",
      "tags": ["Getting Started"],
      "date": "{today}",
      "readingTime": "1 min read"
    }}
  ]
}}
"#
    );
    fs::write(target_dir.join("content/blogs.json"), index_content)?;

    let sample_body = r#"# Hello World

Welcome to your new site. This is your very first post.

## Writing posts

Add a record to `content/blogs.json` and drop the Markdown body into
`content/blogs/<slug>.md`. Code blocks are highlighted:

```bash
folio-rs new "My New Post"
```

## Previewing

```bash
folio-rs server
```
"#;
    fs::write(target_dir.join("content/blogs/hello-world.md"), sample_body)?;

    let portfolio_content = r##"{
  "hero": {
    "name": "John Doe",
    "title": "Software Engineer",
    "description": "I build reliable software.",
    "image": { "src": "/assets/profile.png", "alt": "John Doe" },
    "actions": [
      { "label": "Get in touch", "href": "#contact", "primary": true },
      { "label": "Read the blog", "href": "/blog/" }
    ]
  },
  "skills": {
    "title": "Skills",
    "description": "Tools I work with.",
    "categories": [
      {
        "title": "Languages",
        "items": [{ "name": "Rust" }, { "name": "Python" }]
      }
    ]
  },
  "experience": {
    "title": "Experience",
    "jobs": [
      {
        "role": "Software Engineer",
        "company": "Acme Corp",
        "period": "2021 - Present",
        "achievements": ["Shipped things that stayed up"]
      }
    ]
  },
  "projects": {
    "title": "Projects",
    "items": [
      {
        "title": "My Project",
        "description": "A thing I made.",
        "tags": ["Rust"],
        "link": { "label": "View on GitHub", "href": "https://github.com/" }
      }
    ]
  },
  "contact": {
    "title": "Get in touch",
    "description": "Always happy to talk.",
    "email": "john@example.com",
    "socials": [
      { "platform": "GitHub", "href": "https://github.com/", "icon": "github" }
    ]
  }
}
"##;
    fs::write(target_dir.join("content/portfolio.json"), portfolio_content)?;

    Ok(())
}
