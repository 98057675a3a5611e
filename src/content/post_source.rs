use std::fs;
use std::path::{Path, PathBuf};

use spdlog::{debug, warn};

use crate::content::front_matter::parse_front_matter;
use crate::content::post_list::{PostFile, PostList};
use crate::content::{sort_by_date_desc, Post};
use crate::error::{FeedError, Result};

/// Where the feed builders get their posts from.
pub trait PostSource {
    /// Posts sorted by date, newest first
    fn posts(&self) -> Result<Vec<Post>>;
}

/// Result of a directory scan: the posts that loaded and the files that did not.
#[derive(Debug, Default)]
pub struct LoadedPosts {
    pub posts: Vec<Post>,
    pub failures: Vec<(PathBuf, FeedError)>,
}

pub fn read_post(post_file: &PostFile) -> Result<Post> {
    let raw_content = fs::read_to_string(&post_file.file_path)?;
    let (front_matter, _body) = parse_front_matter(&post_file.file_path, &raw_content)?;
    Post::from_front_matter(&post_file.file_path, post_file.site_path(), front_matter)
}

/// Reads every post in `blog_dir`.
///
/// Failing to list the directory is an error. A post that cannot be read or parsed is
/// logged, recorded in `failures` and left out.
pub fn load_posts(blog_dir: &Path) -> Result<LoadedPosts> {
    let post_files = PostList::new(blog_dir).retrieve_all()?;

    let mut loaded = LoadedPosts::default();
    for post_file in post_files {
        match read_post(&post_file) {
            Ok(post) => {
                debug!("Loaded post {}", post);
                loaded.posts.push(post);
            }
            Err(e) => {
                warn!("Error reading blog file {}: {}", post_file.file_path.display(), e);
                loaded.failures.push((post_file.file_path, e));
            }
        }
    }

    sort_by_date_desc(&mut loaded.posts);
    Ok(loaded)
}

/// Posts stored as markdown files under `<content_dir>/blog`
pub struct DirectorySource {
    blog_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(content_dir: &Path) -> Self {
        DirectorySource {
            blog_dir: content_dir.join("blog"),
        }
    }

    pub fn blog_dir(&self) -> &Path {
        &self.blog_dir
    }
}

impl PostSource for DirectorySource {
    fn posts(&self) -> Result<Vec<Post>> {
        load_posts(&self.blog_dir).map(|loaded| loaded.posts)
    }
}

/// Fixed list of posts, already sorted by the caller
impl PostSource for Vec<Post> {
    fn posts(&self) -> Result<Vec<Post>> {
        Ok(self.clone())
    }
}
