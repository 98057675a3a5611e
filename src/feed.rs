use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use spdlog::{info, warn};

use crate::config::{Config, SiteMeta};
use crate::content::post_source::{load_posts, DirectorySource, LoadedPosts, PostSource};
use crate::content::Post;
use crate::error::Result;
use crate::view::rss_renderer::RssChannel;
use crate::view::sitemap_renderer::{render_sitemap, sitemap_entries};

pub use crate::view::rss_renderer::{MAX_RSS_ITEMS, RSS_FILE_NAME};
pub use crate::view::sitemap_renderer::{sitemap_urls, SitemapUrl, SITEMAP_FILE_NAME, STATIC_ROUTES};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const SITEMAP_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// RSS 2.0 document for `posts`, which are expected newest first.
/// Only the first [`MAX_RSS_ITEMS`] are rendered.
pub fn build_rss(posts: &[Post], site: &SiteMeta, now: DateTime<Utc>) -> Result<String> {
    let channel = RssChannel { site, build_date: now };
    let xml = channel.render(posts)?;
    Ok(String::from_utf8_lossy(&xml).into_owned())
}

/// Sitemap with the static routes followed by every post
pub fn build_sitemap(posts: &[Post], site: &SiteMeta, now: DateTime<Utc>) -> Result<String> {
    let entries = sitemap_entries(posts, site, now);
    let xml = render_sitemap(&entries)?;
    Ok(String::from_utf8_lossy(&xml).into_owned())
}

/// Outcome of a build-time generation run
#[derive(Debug, Default, PartialEq)]
pub struct FeedReport {
    pub post_count: usize,
    /// Post files left out because they could not be read or parsed
    pub skipped_files: usize,
    pub rss_items: usize,
    pub sitemap_urls: usize,
    pub rss_path: Option<PathBuf>,
    pub sitemap_path: Option<PathBuf>,
}

impl FeedReport {
    pub fn is_complete(&self) -> bool {
        self.rss_path.is_some() && self.sitemap_path.is_some()
    }
}

fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn build_and_write<F>(name: &str, path: PathBuf, build: F) -> Option<PathBuf>
where
    F: FnOnce() -> Result<String>,
{
    match build().and_then(|doc| write_document(&path, &doc)) {
        Ok(()) => Some(path),
        Err(e) => {
            warn!("Error generating {} at {}: {}", name, path.display(), e);
            None
        }
    }
}

/// Writes `rss.xml` and `sitemap.xml` into `public_dir`.
///
/// A document that fails is logged and left out of the report; the other one is
/// still written.
pub fn write_feeds(posts: &[Post], site: &SiteMeta, public_dir: &Path, now: DateTime<Utc>) -> FeedReport {
    let rss_path = build_and_write("RSS feed", public_dir.join(RSS_FILE_NAME), || {
        build_rss(posts, site, now)
    });
    let sitemap_path = build_and_write("sitemap", public_dir.join(SITEMAP_FILE_NAME), || {
        build_sitemap(posts, site, now)
    });

    let with_path = posts.iter().filter(|p| !p.path.is_empty()).count();
    FeedReport {
        post_count: posts.len(),
        skipped_files: 0,
        rss_items: with_path.min(MAX_RSS_ITEMS),
        sitemap_urls: STATIC_ROUTES.len() + with_path,
        rss_path,
        sitemap_path,
    }
}

/// Posts from `source`, or none at all when the source cannot be read
pub fn collect_posts<S: PostSource + ?Sized>(source: &S) -> Vec<Post> {
    match source.posts() {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Error collecting blog posts, generating empty feeds: {}", e);
            vec![]
        }
    }
}

/// Build-time entry point: collect posts from the content directory and write both
/// documents into the public directory.
pub fn generate_feeds(config: &Config, now: DateTime<Utc>) -> FeedReport {
    let source = DirectorySource::new(&config.paths.content_dir);
    info!("Reading posts from {}", source.blog_dir().display());
    let loaded = match load_posts(source.blog_dir()) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("Error collecting blog posts, generating empty feeds: {}", e);
            LoadedPosts::default()
        }
    };

    let site = config.site_meta();
    let mut report = write_feeds(&loaded.posts, &site, &config.paths.public_dir, now);
    report.skipped_files = loaded.failures.len();
    if report.rss_path.is_some() {
        info!("Generated RSS feed with {} posts", report.rss_items);
    }
    if report.sitemap_path.is_some() {
        info!("Generated sitemap with {} URLs", report.sitemap_urls);
    }
    report
}
