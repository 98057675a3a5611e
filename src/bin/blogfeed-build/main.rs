use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use spdlog::{error, info, warn};

use blogfeed::config::open_config;
use blogfeed::feed::{generate_feeds, FeedReport};
use blogfeed::logger::configure_logger;

/// Writes rss.xml and sitemap.xml for the blog into the public directory.
/// A document that cannot be written is reported and the other one is still written.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,
}

fn run(args: Args) -> Result<FeedReport> {
    let config = open_config(args.config_path.map(PathBuf::from))?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Generating feeds into {}", config.paths.public_dir.display());
    let report = generate_feeds(&config, Utc::now());

    match report.rss_path {
        Some(_) => println!("RSS feed: {} posts", report.rss_items),
        None => println!("RSS feed: not written"),
    }
    match report.sitemap_path {
        Some(_) => println!("Sitemap: {} URLs", report.sitemap_urls),
        None => println!("Sitemap: not written"),
    }
    if report.skipped_files > 0 {
        println!("Skipped {} post files, see the warnings above", report.skipped_files);
    }

    Ok(report)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error generating feeds: {:#}", err);
            eprintln!("Please run blogfeed-build --help");
            ExitCode::FAILURE
        }
    }
}
