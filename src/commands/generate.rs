//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::cache::{self, CacheDb};
use crate::content::ContentStore;
use crate::generator::Generator;
use crate::Folio;

/// Generate the static site, skipping work when nothing changed
pub async fn run(folio: &Folio) -> Result<()> {
    run_with_options(folio, false).await
}

/// Generate with force option
pub async fn run_with_options(folio: &Folio, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let store = folio.load_store()?;

    let cache = CacheDb::load(&folio.base_dir);
    let current = snapshot(folio, &store);

    let fresh = !force
        && !cache.is_empty()
        && !cache.is_stale(&current)
        && folio.public_dir.join("index.html").exists();
    if fresh {
        tracing::info!("No changes detected, skipping generation");
        return Ok(());
    }

    if force {
        tracing::info!("Full generation (forced)");
    }

    let generator = Generator::new(folio)?;
    generator.generate(&store).await?;

    current.save(&folio.base_dir)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Snapshot the current content state for freshness checks
fn snapshot(folio: &Folio, store: &ContentStore) -> CacheDb {
    let bodies = store.posts().iter().map(|p| {
        let hash = store
            .body_path(&p.slug)
            .map(cache::hash_file_or_zero)
            .unwrap_or(0);
        (p.slug.clone(), hash)
    });
    CacheDb::snapshot(
        &folio.base_dir,
        &folio.content_dir,
        bodies,
        store.posts().len(),
    )
}

/// Watch for content changes and regenerate
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<DebounceEventResult>(16);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            let _ = tx.blocking_send(res);
        },
    )?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::Recursive)?;
    }
    if folio.assets_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.assets_dir, RecursiveMode::Recursive)?;
    }
    let config_path = folio.base_dir.join("folio.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while let Some(res) = rx.recv().await {
        match res {
            Ok(_) => {
                tracing::info!("File changed, regenerating...");
                if let Err(e) = run(folio).await {
                    tracing::error!("Generation failed: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
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

    fn fixture() -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let content_dir = dir.path().join("content");
        fs::create_dir_all(content_dir.join("blogs")).unwrap();
        fs::write(
            content_dir.join("blogs.json"),
            r#"{"posts": [
                {"slug": "hello", "title": "Hello", "description": "", "date": "2025-01-01"}
            ]}"#,
        )
        .unwrap();
        fs::write(content_dir.join("portfolio.json"), PORTFOLIO_JSON).unwrap();
        fs::write(content_dir.join("blogs/hello.md"), "# Hello\n\nFirst post.").unwrap();

        let folio = Folio {
            config: SiteConfig::default(),
            base_dir: dir.path().to_path_buf(),
            content_dir,
            public_dir: dir.path().join("public"),
            assets_dir: dir.path().join("assets"),
        };
        (dir, folio)
    }

    #[tokio::test]
    async fn test_generate_then_skip_when_fresh() {
        let (_dir, folio) = fixture();

        run(&folio).await.unwrap();
        assert!(folio.public_dir.join("blog/hello/index.html").exists());

        // Second run finds the cache fresh and leaves output untouched
        let before = fs::metadata(folio.public_dir.join("blog/hello/index.html"))
            .unwrap()
            .modified()
            .unwrap();
        run(&folio).await.unwrap();
        let after = fs::metadata(folio.public_dir.join("blog/hello/index.html"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_body_edit_triggers_regeneration() {
        let (_dir, folio) = fixture();

        run(&folio).await.unwrap();
        fs::write(
            folio.content_dir.join("blogs/hello.md"),
            "# Hello\n\nEdited body.",
        )
        .unwrap();
        run(&folio).await.unwrap();

        let html = fs::read_to_string(folio.public_dir.join("blog/hello/index.html")).unwrap();
        assert!(html.contains("Edited body."));
    }

    #[tokio::test]
    async fn test_force_regenerates_fresh_site() {
        let (_dir, folio) = fixture();

        run(&folio).await.unwrap();
        fs::remove_dir_all(&folio.public_dir).unwrap();

        run_with_options(&folio, true).await.unwrap();
        assert!(folio.public_dir.join("index.html").exists());
    }
}
