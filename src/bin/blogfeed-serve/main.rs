use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spdlog::{info, warn};

use blogfeed::config::open_config;
use blogfeed::logger::configure_logger;
use blogfeed::server::server_run;

/// Serves rss.xml, sitemap.xml and the sitemap url list on request
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = match open_config(args.config_path.map(PathBuf::from)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run blogfeed-serve --help");
            std::process::exit(1);
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Starting blogfeed =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
    server_run(config).await?;
    Ok(())
}
