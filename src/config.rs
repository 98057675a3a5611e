use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;

use crate::error::{FeedError, Result};

pub const CFG_FILE_NAME: &str = "blogfeed.toml";
const DEFAULT_GENERATOR: &str = concat!("blogfeed ", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize, Debug, Clone)]
pub struct Site {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub author: String,
    pub generator: Option<String>,
    /// `jane@example.com (Jane Doe)`
    pub managing_editor: Option<String>,
    pub image: Option<String>,
    pub twitter_via: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub server: Option<Server>,
    pub log: Option<Log>,
}

/// Site level values the feed builders need, passed explicitly to every call.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMeta {
    pub url: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub author: String,
    pub generator: String,
    pub managing_editor: Option<String>,
    pub image: Option<String>,
    pub twitter_via: Option<String>,
}

impl SiteMeta {
    pub fn new(url: &str, name: &str, description: &str) -> Self {
        SiteMeta {
            url: url.trim_end_matches('/').to_string(),
            name: name.to_string(),
            description: description.to_string(),
            language: default_language(),
            author: name.to_string(),
            generator: DEFAULT_GENERATOR.to_string(),
            managing_editor: None,
            image: None,
            twitter_via: None,
        }
    }
}

impl Config {
    pub fn site_meta(&self) -> SiteMeta {
        let site = &self.site;
        SiteMeta {
            url: site.url.trim_end_matches('/').to_string(),
            name: site.name.clone(),
            description: site.description.clone(),
            language: site.language.clone(),
            author: site.author.clone(),
            generator: site.generator.clone().unwrap_or_else(|| DEFAULT_GENERATOR.to_string()),
            managing_editor: site.managing_editor.clone(),
            image: site.image.clone(),
            twitter_via: site.twitter_via.clone(),
        }
    }
}

fn parse_path(path: PathBuf, exe_dir: Option<&Path>) -> PathBuf {
    let (Some(exe_dir), Some(str_path)) = (exe_dir, path.to_str()) else {
        return path;
    };
    if str_path.starts_with("${exe_dir}") {
        PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
    } else {
        path
    }
}

pub fn parse_config(cfg_content: &str) -> Result<Config> {
    let mut cfg: Config = toml::from_str(cfg_content)
        .map_err(|e| FeedError::Config(format!("Error parsing configuration file: {}", e)))?;

    if cfg.site.url.trim().is_empty() {
        return Err(FeedError::Config("site.url must not be empty".to_string()));
    }

    let cur_exe = env::current_exe().ok();
    let exe_dir = cur_exe.as_deref().and_then(Path::parent);
    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir, exe_dir),
        public_dir: parse_path(cfg.paths.public_dir, exe_dir),
    };
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(|l| parse_path(l, exe_dir));
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<Config> {
    let cfg_content = fs::read_to_string(cfg_path).map_err(|e| {
        FeedError::Config(format!("Error opening configuration file {}: {}", cfg_path.display(), e))
    })?;
    parse_config(&cfg_content)
}

/// Looks for the configuration next to the executable, then in the current
/// directory, then in the user configuration directory.
pub fn find_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf));
    let cur_dir = env::current_dir().ok();
    let cfg_dir = dirs::config_dir().map(|d| d.join("blogfeed"));

    [exe_dir, cur_dir, cfg_dir]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Reads `cfg_path`, or the first configuration found by [`find_config_path`].
pub fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(find_config_path) {
        Some(path) => path,
        None => return Err(FeedError::Config(format!("Could not find {}", CFG_FILE_NAME))),
    };

    println!("Reading config from {}", config_path.display());
    let config = read_config(&config_path)?;
    match config.log {
        Some(Log { location: Some(ref location), .. }) => {
            println!("Log enabled. Files will be written in {}", location.display())
        }
        _ => println!("Logging to console"),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[site]
url = "https://devpy.de/"
name = "DevPy Blog"
description = "Posts about the web"
author = "Jane Doe"
managing_editor = "jane@example.com (Jane Doe)"

[paths]
content_dir = "content"
public_dir = "${exe_dir}/public"

[server]
address = "127.0.0.1"
port = 8001

[log]
level = "Warn"
log_to_console = true
"#;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config(CONFIG).unwrap();
        assert_eq!(cfg.site.language, "en");
        assert_eq!(cfg.paths.content_dir, PathBuf::from("content"));
        assert!(!cfg.paths.public_dir.to_string_lossy().contains("${exe_dir}"));
        assert!(cfg.paths.public_dir.ends_with("public"));
        assert_eq!(cfg.server.as_ref().map(|s| s.port), Some(8001));
        assert!(matches!(cfg.log.as_ref().map(|l| l.level), Some(LogLevel::Warn)));

        let meta = cfg.site_meta();
        assert_eq!(meta.url, "https://devpy.de");
        assert_eq!(meta.generator, DEFAULT_GENERATOR);
        assert_eq!(meta.managing_editor.as_deref(), Some("jane@example.com (Jane Doe)"));
    }

    #[test]
    fn test_missing_section() {
        let res = parse_config("[site]\nurl = \"https://x\"\nname = \"x\"\nauthor = \"x\"\n");
        assert!(matches!(res, Err(FeedError::Config(_))));
    }

    #[test]
    fn test_empty_url() {
        let cfg = CONFIG.replace("https://devpy.de/", " ");
        assert!(matches!(parse_config(&cfg), Err(FeedError::Config(_))));
    }
}
