use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const POST_EXTENSION: &str = "md";

/// A markdown file holding a post, and the name its url is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFile {
    pub post_name: String,
    pub file_path: PathBuf,
}

impl PostFile {
    /// Site relative path before canonicalization: `/blog/12-my-post`.
    /// `?` and `#` in the name are escaped so they stay part of the slug.
    pub fn site_path(&self) -> String {
        let name = self.post_name.replace('?', "%3F").replace('#', "%23");
        format!("/blog/{}", name)
    }
}

/// Lists posts in a blog directory. A post is either `<name>.md` directly inside the
/// directory, or a `<name>/` sub-directory holding an index file.
pub struct PostList {
    pub root_dir: PathBuf,
    pub index_file: String,
}

impl PostList {
    pub fn new(root_dir: &Path) -> Self {
        PostList {
            root_dir: root_dir.to_path_buf(),
            index_file: "index.md".to_string(),
        }
    }

    /// Every post, sorted by name so the scan order does not depend on the filesystem
    pub fn retrieve_all(&self) -> io::Result<Vec<PostFile>> {
        let mut posts = self.retrieve_files()?;
        posts.extend(self.retrieve_dirs()?);
        posts.sort_by(|a, b| a.post_name.cmp(&b.post_name));
        Ok(posts)
    }

    pub fn retrieve_files(&self) -> io::Result<Vec<PostFile>> {
        let mut posts = vec![];
        for entry in fs::read_dir(&self.root_dir)? {
            let Ok(entry) = entry else { continue };
            let Ok(file_type) = entry.file_type() else { continue };
            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(POST_EXTENSION) {
                continue;
            }
            if let Some(post_name) = path.file_stem().and_then(|s| s.to_str()) {
                posts.push(PostFile {
                    post_name: post_name.to_string(),
                    file_path: path.clone(),
                });
            }
        }
        Ok(posts)
    }

    pub fn retrieve_dirs(&self) -> io::Result<Vec<PostFile>> {
        let mut posts = vec![];
        for dir in Self::list_dirs(&self.root_dir)? {
            let index_path = dir.join(&self.index_file);
            if !index_path.is_file() {
                continue;
            }
            if let Some(post_name) = dir.file_name().and_then(|s| s.to_str()) {
                posts.push(PostFile {
                    post_name: post_name.to_string(),
                    file_path: index_path,
                });
            }
        }
        Ok(posts)
    }

    fn list_dirs(posts_dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = vec![];
        for entry in fs::read_dir(posts_dir)?.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if file_type.is_dir() {
                    dirs.push(entry.path());
                }
            }
        }
        Ok(dirs)
    }
}
