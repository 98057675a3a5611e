use std::path::Path;

use serde::Deserialize;

use crate::error::{FeedError, Result};

const DELIMITER: &str = "---";

/// Tags may be written as a single string or as a list
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Tags {
    One(String),
    Many(Vec<String>),
}

impl Tags {
    pub fn into_vec(self) -> Vec<String> {
        let tags = match self {
            Tags::One(tag) => vec![tag],
            Tags::Many(tags) => tags,
        };
        tags.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Front matter keys the feeds care about. Unknown keys are ignored.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    #[serde(alias = "date_updated", alias = "updated")]
    pub date_updated: Option<String>,
    pub tags: Option<Tags>,
    pub author: Option<String>,
    pub category: Option<String>,
}

/// Splits a markdown file into its YAML front matter and the body after it.
///
/// Example of post
/// ---
/// title: "Shipping a Nuxt blog"
/// date: 2024-04-02
/// tags: [nuxt, seo]
/// ---
///
/// # Shipping a Nuxt blog
pub fn parse_front_matter<'a>(file_name: &Path, content: &'a str) -> Result<(FrontMatter, &'a str)> {
    let invalid = |reason: &str| FeedError::FrontMatter {
        file: file_name.to_path_buf(),
        reason: reason.to_string(),
    };

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next().unwrap_or_default();
    if first.trim() != DELIMITER {
        return Err(invalid("file does not start with ---"));
    }

    let block_start = first.len();
    let mut offset = block_start;
    let mut block_end = None;
    for line in lines {
        if line.trim() == DELIMITER {
            block_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((block_end, body_start)) = block_end else {
        return Err(invalid("closing --- is missing"));
    };

    let block = &content[block_start..block_end];
    let front_matter = if block.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str::<FrontMatter>(block).map_err(|e| invalid(&e.to_string()))?
    };

    Ok((front_matter, &content[body_start..]))
}
