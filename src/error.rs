use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid front matter in {}: {reason}", file.display())]
    FrontMatter { file: PathBuf, reason: String },

    #[error("missing required field `{field}` in {}", file.display())]
    MissingField { file: PathBuf, field: &'static str },

    #[error("unable to parse date `{value}`")]
    InvalidDate { value: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
