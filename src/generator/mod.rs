//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::Result;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{ContentStore, MarkdownRenderer, Post, RenderedBody};
use crate::detail::{self, BodyFallback};
use crate::listing;
use crate::templates::{
    ConfigData, NavPost, PaginationData, PostCard, TagCount, TemplateRenderer, TocEntry,
};
use crate::Folio;

/// Embedded stylesheet written to `css/style.css` on every generate
const STYLESHEET: &str = include_str!("../templates/site/css/style.css");

/// Atom feed entry limit
const FEED_LIMIT: usize = 20;

/// Static site generator using Tera templates
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

/// A post together with its rendered body
struct RenderedEntry {
    post: Post,
    body: RenderedBody,
    fallback: Option<BodyFallback>,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let markdown = MarkdownRenderer::with_options(
            &folio.config.syntax_theme,
            folio.config.highlight.line_number,
        );

        Ok(Self {
            folio: folio.clone(),
            renderer,
            markdown,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self, store: &ContentStore) -> Result<()> {
        fs::create_dir_all(&self.folio.public_dir)?;

        self.write_stylesheet()?;
        self.copy_assets()?;

        // Drafts are skipped unless the config opts in
        let posts: Vec<Post> = if self.folio.config.render_unpublished {
            store.posts().to_vec()
        } else {
            store.published().into_iter().cloned().collect()
        };

        let config_data = self.build_config_data();

        self.generate_home(store, &posts, &config_data)?;
        self.generate_listing_pages(&posts, &config_data)?;
        self.generate_tag_pages(&posts, &config_data)?;

        let entries = self.render_bodies(store, &posts).await;
        self.generate_post_pages(&entries, &posts, &config_data)?;
        self.generate_atom_feed(&entries)?;
        self.generate_search_index(&posts)?;

        tracing::info!("Generated {} posts", posts.len());
        Ok(())
    }

    fn build_config_data(&self) -> ConfigData {
        let config = &self.folio.config;
        ConfigData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
            blog_dir: config.blog_dir.trim_matches('/').to_string(),
            tag_dir: config.tag_dir.trim_matches('/').to_string(),
            per_page: config.per_page,
        }
    }

    fn post_card(&self, post: &Post) -> PostCard {
        PostCard {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            date: crate::helpers::iso_date(&post.date),
            tags: post.tags.clone(),
            reading_time: non_empty(&post.reading_time),
            cover_image: non_empty(&post.cover_image),
            path: post
                .path(&self.folio.config.blog_dir)
                .trim_start_matches('/')
                .to_string(),
        }
    }

    fn tag_counts(&self, posts: &[Post]) -> Vec<TagCount> {
        let refs: Vec<&Post> = posts.iter().collect();
        listing::available_tags(&refs)
            .into_iter()
            .map(|name| {
                let tag_slug = slug::slugify(&name);
                let count = posts.iter().filter(|p| p.tags.contains(&name)).count();
                let path = crate::helpers::url_for(
                    &self.folio.config,
                    &format!(
                        "{}/{}/{}/",
                        self.folio.config.blog_dir.trim_matches('/'),
                        self.folio.config.tag_dir.trim_matches('/'),
                        crate::helpers::encode_segment(&tag_slug)
                    ),
                );
                TagCount {
                    name,
                    slug: tag_slug,
                    count,
                    path,
                }
            })
            .collect()
    }

    /// Create a base context with common variables
    fn base_context(&self, config_data: &ConfigData, nav_section: &str) -> Context {
        let mut context = Context::new();
        context.insert("config", config_data);
        context.insert("nav_section", nav_section);
        context.insert(
            "current_year",
            &chrono::Utc::now().format("%Y").to_string(),
        );
        context
    }

    /// Generate the home page with portfolio sections and recent posts
    fn generate_home(
        &self,
        store: &ContentStore,
        posts: &[Post],
        config_data: &ConfigData,
    ) -> Result<()> {
        let recent: Vec<PostCard> = posts
            .iter()
            .take(self.folio.config.per_page)
            .map(|p| self.post_card(p))
            .collect();

        let mut context = self.base_context(config_data, "home");
        context.insert("portfolio", store.portfolio());
        context.insert("recent_posts", &recent);

        let html = self.renderer.render("home.html", &context)?;
        self.write_page(Path::new(""), &html)?;
        tracing::info!("Generated home page");
        Ok(())
    }

    /// Generate the paginated blog listing at `<blog_dir>/` and
    /// `<blog_dir>/<pagination_dir>/<n>/`
    fn generate_listing_pages(&self, posts: &[Post], config_data: &ConfigData) -> Result<()> {
        let blog_dir = self.folio.config.blog_dir.trim_matches('/');
        let per_page = self.folio.config.per_page;
        let all_tags = self.tag_counts(posts);

        let refs: Vec<&Post> = posts.iter().collect();
        let total = listing::total_pages(posts.len(), per_page);
        for page_num in 1..=total {
            let page_posts: Vec<PostCard> = listing::paginate(&refs, page_num, per_page)
                .iter()
                .map(|p| self.post_card(p))
                .collect();

            let pagination = self.build_pagination(page_num, total);

            let mut context = self.base_context(config_data, "blog");
            context.insert("page_posts", &page_posts);
            context.insert("all_tags", &all_tags);
            // No tag selected on the main listing; the template still
            // reads the variable
            context.insert("tag_name", "");
            context.insert("pagination", &pagination);
            context.insert("page_title", "Blog");

            let html = self.renderer.render("blog.html", &context)?;

            let rel_path = if page_num == 1 {
                blog_dir.to_string()
            } else {
                format!(
                    "{}/{}/{}",
                    blog_dir,
                    self.folio.config.pagination_dir.trim_matches('/'),
                    page_num
                )
            };
            self.write_page(Path::new(&rel_path), &html)?;
        }

        tracing::info!("Generated {} listing pages", total);
        Ok(())
    }

    fn build_pagination(&self, current: usize, total: usize) -> PaginationData {
        let blog_dir = self.folio.config.blog_dir.trim_matches('/');
        let pagination_dir = self.folio.config.pagination_dir.trim_matches('/');

        let link_for = |page: usize| {
            if page == 1 {
                crate::helpers::url_for(&self.folio.config, &format!("{}/", blog_dir))
            } else {
                crate::helpers::url_for(
                    &self.folio.config,
                    &format!("{}/{}/{}/", blog_dir, pagination_dir, page),
                )
            }
        };

        PaginationData {
            per_page: self.folio.config.per_page,
            total,
            current,
            current_url: link_for(current),
            prev_link: if current > 1 {
                link_for(current - 1)
            } else {
                String::new()
            },
            next_link: if current < total {
                link_for(current + 1)
            } else {
                String::new()
            },
        }
    }

    /// Generate one page per tag at `<blog_dir>/<tag_dir>/<tag-slug>/`
    fn generate_tag_pages(&self, posts: &[Post], config_data: &ConfigData) -> Result<()> {
        let all_tags = self.tag_counts(posts);
        let refs: Vec<&Post> = posts.iter().collect();

        let per_page = self.folio.config.per_page;
        let pagination_dir = self.folio.config.pagination_dir.trim_matches('/');

        for tag in &all_tags {
            let matched = listing::filter(&refs, "", Some(&tag.name));
            let total = listing::total_pages(matched.len(), per_page);

            let tag_base = format!(
                "{}/{}/{}",
                self.folio.config.blog_dir.trim_matches('/'),
                self.folio.config.tag_dir.trim_matches('/'),
                tag.slug
            );

            for page_num in 1..=total {
                let page_posts: Vec<PostCard> = listing::paginate(&matched, page_num, per_page)
                    .iter()
                    .map(|p| self.post_card(p))
                    .collect();

                let link_for = |page: usize| {
                    if page == 1 {
                        crate::helpers::url_for(&self.folio.config, &format!("{}/", tag_base))
                    } else {
                        crate::helpers::url_for(
                            &self.folio.config,
                            &format!("{}/{}/{}/", tag_base, pagination_dir, page),
                        )
                    }
                };

                let pagination = PaginationData {
                    per_page,
                    total,
                    current: page_num,
                    current_url: link_for(page_num),
                    prev_link: if page_num > 1 {
                        link_for(page_num - 1)
                    } else {
                        String::new()
                    },
                    next_link: if page_num < total {
                        link_for(page_num + 1)
                    } else {
                        String::new()
                    },
                };

                let mut context = self.base_context(config_data, "blog");
                context.insert("page_posts", &page_posts);
                context.insert("all_tags", &all_tags);
                context.insert("tag_name", &tag.name);
                context.insert("pagination", &pagination);
                context.insert("page_title", &tag.name);

                let html = self.renderer.render("blog.html", &context)?;

                let rel_path = if page_num == 1 {
                    tag_base.clone()
                } else {
                    format!("{}/{}/{}", tag_base, pagination_dir, page_num)
                };
                self.write_page(Path::new(&rel_path), &html)?;
            }
        }

        tracing::info!("Generated {} tag pages", all_tags.len());
        Ok(())
    }

    /// Render every post body, substituting placeholders on failure
    async fn render_bodies(&self, store: &ContentStore, posts: &[Post]) -> Vec<RenderedEntry> {
        let mut entries = Vec::with_capacity(posts.len());
        for post in posts {
            let (markdown, fallback) = detail::load_body(store, &post.slug).await;
            let body = detail::render_soft(&self.markdown, &markdown);
            entries.push(RenderedEntry {
                post: post.clone(),
                body,
                fallback,
            });
        }
        entries
    }

    /// Generate individual post pages
    fn generate_post_pages(
        &self,
        entries: &[RenderedEntry],
        posts: &[Post],
        config_data: &ConfigData,
    ) -> Result<()> {
        for entry in entries {
            if let Some(fallback) = entry.fallback {
                tracing::warn!(
                    "Post {} generated with placeholder body ({:?})",
                    entry.post.slug,
                    fallback
                );
            }

            let toc: Vec<TocEntry> = entry
                .body
                .headings
                .iter()
                .filter(|h| h.level <= 3)
                .map(|h| TocEntry {
                    level: h.level,
                    id: h.id.clone(),
                    text: h.text.clone(),
                })
                .collect();

            let prev = entry.post.prev(posts).map(|p| NavPost {
                title: p.title.clone(),
                path: p
                    .path(&self.folio.config.blog_dir)
                    .trim_start_matches('/')
                    .to_string(),
            });
            let next = entry.post.next(posts).map(|p| NavPost {
                title: p.title.clone(),
                path: p
                    .path(&self.folio.config.blog_dir)
                    .trim_start_matches('/')
                    .to_string(),
            });

            let mut context = self.base_context(config_data, "blog");
            context.insert("post", &self.post_card(&entry.post));
            context.insert("content", &entry.body.html);
            context.insert("page_title", &entry.post.title);
            context.insert("page_description", &entry.post.description);
            if toc.len() > 1 {
                context.insert("toc", &toc);
            }
            if let Some(ref prev) = prev {
                context.insert("prev_post", prev);
            }
            if let Some(ref next) = next {
                context.insert("next_post", next);
            }

            let html = self.renderer.render("post.html", &context)?;

            let rel_path = entry
                .post
                .path(&self.folio.config.blog_dir)
                .trim_matches('/')
                .to_string();
            self.write_page(Path::new(&rel_path), &html)?;
        }

        Ok(())
    }

    /// Generate the Atom feed at `atom.xml`
    fn generate_atom_feed(&self, entries: &[RenderedEntry]) -> Result<()> {
        let config = &self.folio.config;
        let base_url = config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
            base_url
        ));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Utc::now().to_rfc3339()
        ));
        feed.push_str(&format!("  <id>{}/</id>\n", base_url));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for entry in entries.iter().take(FEED_LIMIT) {
            let url = crate::helpers::full_url_for(config, &entry.post.path(&config.blog_dir));
            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(&entry.post.title)
            ));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", url));
            feed.push_str(&format!("    <id>{}</id>\n", url));
            feed.push_str(&format!(
                "    <published>{}T00:00:00Z</published>\n",
                entry.post.date.format("%Y-%m-%d")
            ));
            feed.push_str(&format!(
                "    <updated>{}T00:00:00Z</updated>\n",
                entry.post.date.format("%Y-%m-%d")
            ));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&entry.post.description)
            ));
            let content = convert_relative_urls_to_absolute(&entry.body.html, base_url);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                content
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");
        fs::write(self.folio.public_dir.join("atom.xml"), feed)?;
        tracing::info!("Generated atom.xml");
        Ok(())
    }

    /// Generate the search index at `<blog_dir>/search.json`
    ///
    /// One record per post with the fields the listing search matches on,
    /// so a client-side search box can reproduce the same results.
    fn generate_search_index(&self, posts: &[Post]) -> Result<()> {
        let config = &self.folio.config;
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "title": p.title,
                    "description": p.description,
                    "tags": p.tags,
                    "date": p.date.format("%Y-%m-%d").to_string(),
                    "url": crate::helpers::url_for(config, &p.path(&config.blog_dir)),
                })
            })
            .collect();

        let output_dir = self
            .folio
            .public_dir
            .join(config.blog_dir.trim_matches('/'));
        fs::create_dir_all(&output_dir)?;
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(output_dir.join("search.json"), json)?;
        tracing::info!("Generated search.json");
        Ok(())
    }

    /// Write the embedded stylesheet
    fn write_stylesheet(&self) -> Result<()> {
        let css_dir = self.folio.public_dir.join("css");
        fs::create_dir_all(&css_dir)?;
        fs::write(css_dir.join("style.css"), STYLESHEET)?;
        Ok(())
    }

    /// Copy the assets directory into the public directory
    fn copy_assets(&self) -> Result<()> {
        let assets_dir = &self.folio.assets_dir;
        if !assets_dir.exists() {
            return Ok(());
        }

        let dest_root = self
            .folio
            .public_dir
            .join(self.folio.config.assets_dir.trim_matches('/'));

        for entry in WalkDir::new(assets_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(assets_dir)?;
                let dest = dest_root.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }

    /// Write a page as `<rel_path>/index.html` under the public directory
    fn write_page(&self, rel_path: &Path, html: &str) -> Result<()> {
        let output_path = self.folio.public_dir.join(rel_path).join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

/// Empty strings in optional index fields mean "absent"
fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Convert relative URLs in HTML content to absolute URLs
fn convert_relative_urls_to_absolute(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
}
