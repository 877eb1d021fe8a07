use clap::Parser;
use ebrd_jobs_feed::config::{self, SiteConfig};
use ebrd_jobs_feed::{run, BrowserRenderer, HttpRenderer, Renderer, RunOutcome};
use std::path::PathBuf;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Builds an RSS feed of the current EBRD job vacancies.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Careers site origin; the search URL is derived from it.
    #[arg(long, default_value = config::ORIGIN)]
    origin: String,

    #[arg(long, default_value = config::OUTPUT_PATH)]
    output: PathBuf,

    /// Raw markup dump, rewritten on every run.
    #[arg(long, default_value = config::DEBUG_HTML_PATH)]
    debug_html: PathBuf,

    /// Published location of the feed, used for its self link.
    #[arg(long, default_value = config::FEED_SELF_URL)]
    feed_url: String,

    /// Fetch with a plain GET instead of a headless browser.
    #[arg(long)]
    no_browser: bool,
}

impl Cli {
    fn site_config(&self) -> SiteConfig {
        SiteConfig {
            self_url: self.feed_url.clone(),
            output_path: self.output.clone(),
            debug_html_path: self.debug_html.clone(),
            ..SiteConfig::with_origin(&self.origin)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info,chromiumoxide=warn"
                    .into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let cli = Cli::parse();
    let config = cli.site_config();

    let renderer: Box<dyn Renderer + Send + Sync> = if cli.no_browser {
        Box::new(HttpRenderer::new())
    } else {
        Box::new(BrowserRenderer::new(&config))
    };

    info!("EBRD Job Scraper");
    match run(renderer.as_ref(), &config).await? {
        RunOutcome::NoJobs => info!("Done, no feed written"),
        RunOutcome::Written { path, jobs } => {
            info!("Done, {} jobs written to {}", jobs.len(), path.display())
        }
    }

    Ok(())
}
