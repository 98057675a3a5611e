//! sitemap.xml rendering.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://devpy.de/blog/my-post</loc>
//!     <changefreq>monthly</changefreq>
//!     <priority>0.7</priority>
//!     <lastmod>2024-01-02</lastmod>
//!   </url>
//! </urlset>
//! ```

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::Serialize;

use crate::config::SiteMeta;
use crate::content::Post;
use crate::path_utils::{absolute_url, canonicalize, decode_path, post_url};
use crate::text_utils::Timestamp;
use crate::view::push_text;

pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// Routes that exist regardless of the posts: home, about and the blog index
pub const STATIC_ROUTES: [(&str, ChangeFreq, f32); 3] = [
    ("/", ChangeFreq::Weekly, 1.0),
    ("/about", ChangeFreq::Monthly, 0.8),
    ("/blog", ChangeFreq::Daily, 0.9),
];

const POST_CHANGE_FREQ: ChangeFreq = ChangeFreq::Monthly;
const POST_PRIORITY: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: ChangeFreq,
    pub priority: f32,
    pub lastmod: Option<String>,
}

/// Static routes first, then one entry per post that has a path.
///
/// A post's `lastmod` is `date_updated`, else `date`, else the generation date.
pub fn sitemap_entries(posts: &[Post], site: &SiteMeta, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = STATIC_ROUTES.iter()
        .map(|(route, changefreq, priority)| SitemapEntry {
            loc: absolute_url(&site.url, route),
            changefreq: *changefreq,
            priority: *priority,
            lastmod: None,
        })
        .collect();

    let generated = Timestamp::from_date(now.date_naive());
    for post in posts.iter().filter(|p| !p.path.is_empty()) {
        let lastmod = post.last_modified().unwrap_or(generated);
        entries.push(SitemapEntry {
            loc: post_url(&site.url, &post.path),
            changefreq: POST_CHANGE_FREQ,
            priority: POST_PRIORITY,
            lastmod: Some(lastmod.to_w3c()),
        });
    }

    entries
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        push_text(&mut writer, "loc", &entry.loc)?;
        push_text(&mut writer, "changefreq", entry.changefreq.as_str())?;
        push_text(&mut writer, "priority", &format!("{:.1}", entry.priority))?;
        if let Some(ref lastmod) = entry.lastmod {
            push_text(&mut writer, "lastmod", lastmod)?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(writer.into_inner().into_inner())
}

/// Entry of the url list a sitemap module consumes at request time
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

/// Site relative, canonical urls of every post with a path
pub fn sitemap_urls(posts: &[Post]) -> Vec<SitemapUrl> {
    posts.iter()
        .filter(|p| !p.path.is_empty())
        .map(|post| SitemapUrl {
            loc: canonicalize(&decode_path(&post.path)),
            lastmod: post.last_modified().map(|d| d.to_w3c()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str;

    use chrono::TimeZone;

    use crate::text_utils::parse_timestamp;

    use super::*;

    fn post(path: &str, date: Option<&str>, updated: Option<&str>) -> Post {
        Post {
            path: path.to_string(),
            title: "t".to_string(),
            description: String::new(),
            date: date.map(|d| parse_timestamp(d).unwrap()),
            date_updated: updated.map(|d| parse_timestamp(d).unwrap()),
            tags: vec![],
            author: None,
            category: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_entries() {
        let site = SiteMeta::new("https://devpy.de/", "x", "");
        let posts = vec![
            post("/blog/3-updated", Some("2024-01-02"), Some("2024-03-04T08:00:00Z")),
            post("/blog/2-dated", Some("2023-05-06"), None),
            post("/blog/1-undated", None, None),
            post("", Some("2023-01-01"), None),
        ];
        let entries = sitemap_entries(&posts, &site, now());
        assert_eq!(entries.len(), STATIC_ROUTES.len() + 3);

        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, [
            "https://devpy.de/",
            "https://devpy.de/about",
            "https://devpy.de/blog",
            "https://devpy.de/blog/updated",
            "https://devpy.de/blog/dated",
            "https://devpy.de/blog/undated",
        ]);

        let lastmods: Vec<Option<&str>> = entries.iter().map(|e| e.lastmod.as_deref()).collect();
        assert_eq!(lastmods, [
            None,
            None,
            None,
            Some("2024-03-04T08:00:00Z"),
            Some("2023-05-06"),
            Some("2024-06-01"),
        ]);
        assert_eq!(entries[3].changefreq, ChangeFreq::Monthly);
    }

    #[test]
    fn test_render() {
        let entries = vec![
            SitemapEntry {
                loc: "https://devpy.de/".to_string(),
                changefreq: ChangeFreq::Weekly,
                priority: 1.0,
                lastmod: None,
            },
            SitemapEntry {
                loc: "https://devpy.de/blog/a?x=1&y=2".to_string(),
                changefreq: ChangeFreq::Monthly,
                priority: 0.7,
                lastmod: Some("2024-01-02".to_string()),
            },
        ];
        let xml = render_sitemap(&entries).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
            "<url><loc>https://devpy.de/</loc><changefreq>weekly</changefreq><priority>1.0</priority></url>",
            "<url><loc>https://devpy.de/blog/a?x=1&amp;y=2</loc><changefreq>monthly</changefreq><priority>0.7</priority><lastmod>2024-01-02</lastmod></url>",
            "</urlset>"
        ));
    }

    #[test]
    fn test_sitemap_urls() {
        let posts = vec![
            post("/blog/1-hello%20world", Some("2024-01-02"), None),
            post("/blog/2-b", None, Some("2024-02-02")),
            post("/blog/3-c", None, None),
            post("", None, None),
        ];
        let urls = sitemap_urls(&posts);
        assert_eq!(urls, vec![
            SitemapUrl { loc: "/blog/hello world".to_string(), lastmod: Some("2024-01-02".to_string()) },
            SitemapUrl { loc: "/blog/b".to_string(), lastmod: Some("2024-02-02".to_string()) },
            SitemapUrl { loc: "/blog/c".to_string(), lastmod: None },
        ]);

        let json = serde_json::to_string(&urls[2..]).unwrap();
        assert_eq!(json, r#"[{"loc":"/blog/c"}]"#);
    }
}
