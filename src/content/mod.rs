use std::fmt::{self, Display, Formatter};
use std::path::Path;

use spdlog::warn;

use crate::content::front_matter::FrontMatter;
use crate::error::{FeedError, Result};
use crate::text_utils::{parse_timestamp, Timestamp};

pub mod front_matter;
pub mod post_list;
pub mod post_source;

/// A blog post as seen by the feed builders.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Site relative path, possibly with an ordering prefix (`/blog/12-my-post`)
    pub path: String,
    pub title: String,
    pub description: String,
    pub date: Option<Timestamp>,
    pub date_updated: Option<Timestamp>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let date = self.date.map(|d| d.to_w3c()).unwrap_or_default();
        write!(f, "path={}, date={}, title={}", self.path, date, self.title)
    }
}

impl Post {
    /// Builds a post out of parsed front matter.
    ///
    /// `file_name` is only used for error messages. A post without a title is rejected.
    /// A post without a date is kept, and the builders fall back to the generation time.
    pub fn from_front_matter(file_name: &Path, path: String, fm: FrontMatter) -> Result<Post> {
        let title = match fm.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => {
                return Err(FeedError::MissingField {
                    file: file_name.to_path_buf(),
                    field: "title",
                })
            }
        };

        let date = match fm.date {
            Some(ref date) => Some(parse_timestamp(date)?),
            None => {
                warn!("Post without date, using generation time - file={}", file_name.display());
                None
            }
        };

        let date_updated = match fm.date_updated {
            Some(ref date) => Some(parse_timestamp(date)?),
            None => None,
        };

        let description = fm.description.or(fm.excerpt).unwrap_or_default();
        let tags = fm.tags.map(|t| t.into_vec()).unwrap_or_default();

        Ok(Post {
            path,
            title,
            description,
            date,
            date_updated,
            tags,
            author: fm.author.filter(|a| !a.is_empty()),
            category: fm.category.filter(|c| !c.is_empty()),
        })
    }

    /// `date_updated` when present, otherwise `date`
    pub fn last_modified(&self) -> Option<Timestamp> {
        self.date_updated.or(self.date)
    }
}

/// Newest first. Posts without a date go to the end, keeping their relative order.
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}
