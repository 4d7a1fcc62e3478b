use crate::modules::contests::router::DEFAULT_PLATFORMS;
use crate::modules::contests::scraper::{ContestScraper, ScrapeConfig};
use anyhow::{Context, Result};
use clap::Args;
use contest_watch_libs::snapshot::SnapshotStore;
use std::{env, ffi::OsString, path::PathBuf};
use url::Url;

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    #[arg(long)]
    output_dir: Option<OsString>,
}

pub async fn run(args: ScrapeArgs) -> Result<()> {
    let page_url = env::var("CONTEST_PAGE_URL").unwrap_or_else(|_| {
        tracing::warn!("CONTEST_PAGE_URL environment variable is not set. Default value `https://clist.by/` will be used.");
        String::from("https://clist.by/")
    });

    let output_dir: PathBuf = match args.output_dir {
        Some(path) => PathBuf::from(path),
        None => match env::var("OUTPUT_DIR") {
            Ok(path) => PathBuf::from(path),
            Err(_) => {
                tracing::warn!(
                    "OUTPUT_DIR environment variable is not set. Snapshots will be saved at `output`."
                );
                PathBuf::from("output")
            }
        },
    };

    let store = SnapshotStore::new(&output_dir).with_context(|| {
        let message = format!(
            "failed to prepare snapshot directory {}",
            output_dir.display()
        );
        tracing::error!(message);
        message
    })?;

    let config = ScrapeConfig {
        base_url: Url::parse(&page_url).with_context(|| {
            let message = format!("invalid contest page url {}", page_url);
            tracing::error!(message);
            message
        })?,
        platforms: DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
    };

    let scraper = ContestScraper::new(&config, &store);
    scraper.run().await
}
