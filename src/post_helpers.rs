use chrono::Duration;

use crate::config::SiteMeta;
use crate::content::Post;
use crate::path_utils::post_url;

pub use crate::text_utils::format_date;

pub const DEFAULT_RELATED_LIMIT: usize = 3;
const RELATED_DATE_WINDOW_DAYS: i64 = 90;
/// Category of posts that do not declare one
const DEFAULT_CATEGORY: &str = "tech";

const CATEGORY_SCORE: u32 = 3;
const TAG_SCORE: u32 = 2;
const DATE_SCORE: u32 = 1;

fn category_of(post: &Post) -> &str {
    post.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
}

fn relation_score(current: &Post, other: &Post) -> u32 {
    let mut score = 0;

    if category_of(current) == category_of(other) {
        score += CATEGORY_SCORE;
    }

    let shared_tags = other.tags.iter()
        .filter(|tag| current.tags.contains(tag))
        .count() as u32;
    score += shared_tags * TAG_SCORE;

    if let (Some(a), Some(b)) = (current.date, other.date) {
        let distance = (a.instant - b.instant).abs();
        if distance < Duration::days(RELATED_DATE_WINDOW_DAYS) {
            score += DATE_SCORE;
        }
    }

    score
}

/// Up to `limit` posts most related to `current`, best match first.
///
/// Posts sharing the category, tags or a close date score higher. Posts with equal
/// scores keep the order of `all`. `current` itself is never returned.
pub fn related_posts<'a>(current: &Post, all: &'a [Post], limit: usize) -> Vec<&'a Post> {
    let mut scored: Vec<(u32, &Post)> = all.iter()
        .filter(|post| post.path != current.path)
        .map(|post| (relation_score(current, post), post))
        .collect();

    // stable, ties stay in input order
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));

    scored.into_iter()
        .take(limit)
        .map(|(_, post)| post)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareUrls {
    pub twitter: String,
    pub linkedin: String,
    pub facebook: String,
}

pub fn share_urls(title: &str, url: &str, via: Option<&str>) -> ShareUrls {
    let title = urlencoding::encode(title);
    let url = urlencoding::encode(url);

    let mut twitter = format!("https://twitter.com/intent/tweet?text={}&url={}", title, url);
    if let Some(via) = via.filter(|v| !v.is_empty()) {
        twitter.push_str("&via=");
        twitter.push_str(&urlencoding::encode(via.trim_start_matches('@')));
    }

    ShareUrls {
        twitter,
        linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={}", url),
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
    }
}

/// Share links for a post, using the site's twitter handle when configured
pub fn post_share_urls(post: &Post, site: &SiteMeta) -> ShareUrls {
    let url = post_url(&site.url, &post.path);
    share_urls(&post.title, &url, site.twitter_via.as_deref())
}

#[cfg(test)]
mod tests {
    use crate::text_utils::parse_timestamp;

    use super::*;

    fn post(path: &str, date: &str, category: Option<&str>, tags: &[&str]) -> Post {
        Post {
            path: path.to_string(),
            title: path.to_string(),
            description: String::new(),
            date: Some(parse_timestamp(date).unwrap()),
            date_updated: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: None,
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_related_posts() {
        let current = post("/blog/current", "2024-03-01", Some("rust"), &["async", "tokio"]);
        let all = vec![
            current.clone(),
            post("/blog/old-unrelated", "2020-01-01", None, &[]),
            post("/blog/same-category", "2020-01-01", Some("rust"), &[]),
            post("/blog/two-tags", "2020-01-01", None, &["tokio", "async"]),
            post("/blog/recent", "2024-02-01", None, &[]),
            post("/blog/everything", "2024-02-15", Some("rust"), &["async"]),
        ];

        let related: Vec<&str> = related_posts(&current, &all, DEFAULT_RELATED_LIMIT)
            .iter()
            .map(|p| p.path.as_str())
            .collect();
        assert_eq!(related, ["/blog/everything", "/blog/two-tags", "/blog/same-category"]);
    }

    #[test]
    fn test_related_posts_ties_keep_order() {
        let current = post("/blog/current", "2024-03-01", None, &[]);
        let all = vec![
            post("/blog/a", "2010-01-01", None, &[]),
            post("/blog/b", "2010-01-01", None, &[]),
            post("/blog/c", "2024-03-02", None, &[]),
        ];
        let related: Vec<&str> = related_posts(&current, &all, 5).iter().map(|p| p.path.as_str()).collect();
        assert_eq!(related, ["/blog/c", "/blog/a", "/blog/b"]);
        assert!(related_posts(&current, &all, 0).is_empty());
    }

    #[test]
    fn test_missing_category_counts_as_default() {
        let current = post("/blog/current", "2024-03-01", None, &[]);
        let all = vec![
            post("/blog/other-cat", "2020-01-01", Some("personal"), &[]),
            post("/blog/default-cat", "2020-01-01", None, &[]),
            post("/blog/explicit-tech", "2020-01-01", Some("tech"), &[]),
        ];
        let related: Vec<&str> = related_posts(&current, &all, 2).iter().map(|p| p.path.as_str()).collect();
        assert_eq!(related, ["/blog/default-cat", "/blog/explicit-tech"]);
        assert_eq!(relation_score(&current, &all[0]), 0);
        assert_eq!(relation_score(&current, &all[1]), CATEGORY_SCORE);
    }

    #[test]
    fn test_date_window_is_exclusive() {
        let current = post("/blog/current", "2024-04-01", Some("a"), &[]);
        let just_inside = post("/blog/inside", "2024-01-03", Some("b"), &[]);
        let on_boundary = post("/blog/boundary", "2024-01-02", Some("b"), &[]);
        assert_eq!(relation_score(&current, &just_inside), DATE_SCORE);
        assert_eq!(relation_score(&current, &on_boundary), 0);
    }

    #[test]
    fn test_share_urls() {
        let urls = share_urls("Rust & you", "https://devpy.de/blog/a b", Some("@janedoe"));
        assert_eq!(urls.twitter, "https://twitter.com/intent/tweet?text=Rust%20%26%20you&url=https%3A%2F%2Fdevpy.de%2Fblog%2Fa%20b&via=janedoe");
        assert_eq!(urls.linkedin, "https://www.linkedin.com/sharing/share-offsite/?url=https%3A%2F%2Fdevpy.de%2Fblog%2Fa%20b");
        assert_eq!(urls.facebook, "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fdevpy.de%2Fblog%2Fa%20b");

        let urls = share_urls("t", "u", None);
        assert_eq!(urls.twitter, "https://twitter.com/intent/tweet?text=t&url=u");
    }

    #[test]
    fn test_post_share_urls() {
        let mut site = SiteMeta::new("https://devpy.de", "DevPy", "");
        site.twitter_via = Some("janedoe".to_string());
        let post = post("/blog/4-hello", "2024-01-02", None, &[]);
        let urls = post_share_urls(&post, &site);
        assert_eq!(urls.twitter, "https://twitter.com/intent/tweet?text=%2Fblog%2F4-hello&url=https%3A%2F%2Fdevpy.de%2Fblog%2Fhello&via=janedoe");
    }

    #[test]
    fn test_format_date() {
        let date = parse_timestamp("2024-01-02").unwrap();
        assert_eq!(format_date(&date), "January 2, 2024");
    }
}
