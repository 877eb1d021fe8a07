use itertools::Itertools;
use scraper::Html;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod config;
pub mod ebrd;
pub mod feed;
pub mod render;

mod error;
mod utils;

pub use config::SiteConfig;
pub use ebrd::{EbrdExtractor, JobRecord};
pub use error::{RowError, ScraperError};
pub use feed::{build_feed, FeedChannel, FeedItem};
pub use render::{render_in, BrowserRenderer, HttpRenderer, PageSession, WaitPolicy};
pub use utils::{absolute_link, rfc822};

/// Anything with a canonical link that identifies it.
pub trait Listing {
    fn get_link(&self) -> &str;
}

/// Produces the final markup of a page, after any client-side scripts ran.
#[async_trait::async_trait]
pub trait Renderer {
    async fn render(&self, url: &str) -> Result<String, ScraperError>;
}

pub trait Extractor {
    type Record: Listing;

    fn extract(&self, doc: &Html) -> Vec<Self::Record>;
}

/// How a run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing was extracted and no feed was written.
    NoJobs,
    Written { path: PathBuf, jobs: Vec<JobRecord> },
}

/// Keeps the first listing of every link, in the original order.
pub fn dedup_listings<L: Listing>(listings: Vec<L>) -> Vec<L> {
    listings
        .into_iter()
        .unique_by(|l| l.get_link().to_string())
        .collect()
}

/// Renders `url`, dumps the raw markup to `debug_html` and extracts records
/// from it.
pub async fn fetch_listings<R, E>(
    renderer: &R,
    extractor: &E,
    url: &str,
    debug_html: &Path,
) -> Result<Vec<E::Record>, ScraperError>
where
    R: Renderer + ?Sized,
    E: Extractor,
{
    let html = renderer.render(url).await?;

    match tokio::fs::write(debug_html, &html).await {
        Ok(()) => info!("Saved debug HTML to {}", debug_html.display()),
        Err(e) => warn!("Could not save debug HTML to {}: {}", debug_html.display(), e),
    }

    let records = {
        let doc = Html::parse_document(&html);
        extractor.extract(&doc)
    };
    Ok(records)
}

/// One complete pass: render, extract, dedup and write the feed.
pub async fn run<R: Renderer + ?Sized>(
    renderer: &R,
    config: &SiteConfig,
) -> Result<RunOutcome, ScraperError> {
    let extractor = EbrdExtractor::new(config)?;
    let jobs = fetch_listings(
        renderer,
        &extractor,
        &config.search_url(),
        &config.debug_html_path,
    )
    .await?;

    if jobs.is_empty() {
        warn!("No jobs found!");
        return Ok(RunOutcome::NoJobs);
    }

    let jobs = dedup_listings(jobs);
    info!("Unique jobs: {}", jobs.len());

    info!("Generating RSS feed...");
    let channel = FeedChannel::from_config(config);
    let xml = build_feed(&channel, &jobs, utils::get_now())?;
    tokio::fs::write(&config.output_path, xml).await?;

    info!("RSS feed saved to: {}", config.output_path.display());
    info!("Total jobs in feed: {}", jobs.len());
    for (i, job) in jobs.iter().take(5).enumerate() {
        info!("{}. {} - {}", i + 1, job.title, job.location);
        debug!("\n{}", job);
    }

    Ok(RunOutcome::Written {
        path: config.output_path.clone(),
        jobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    struct FixtureRenderer(String);

    impl FixtureRenderer {
        fn from_file(name: &str) -> Self {
            FixtureRenderer(
                fs::read_to_string(format!("tests/htmls/{}", name)).expect("Invalid file url"),
            )
        }
    }

    #[async_trait::async_trait]
    impl Renderer for FixtureRenderer {
        async fn render(&self, _url: &str) -> Result<String, ScraperError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenRenderer;

    #[async_trait::async_trait]
    impl Renderer for BrokenRenderer {
        async fn render(&self, url: &str) -> Result<String, ScraperError> {
            Err(ScraperError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                url.to_string(),
            )))
        }
    }

    fn job(link: &str, title: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            link: link.to_string(),
            location: "London".to_string(),
            posting_date: "2024-01-01".to_string(),
        }
    }

    fn config_in(dir: &Path) -> SiteConfig {
        SiteConfig {
            output_path: dir.join("ebrd_jobs.xml"),
            debug_html_path: dir.join("debug_page.html"),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let jobs = vec![
            job("https://x/a", "first"),
            job("https://x/a", "second"),
            job("https://x/b", "third"),
        ];
        assert_eq!(
            dedup_listings(jobs),
            vec![job("https://x/a", "first"), job("https://x/b", "third")]
        );
    }

    #[test]
    fn dedup_preserves_order_of_distinct_links() {
        let jobs = vec![
            job("https://x/c", "c"),
            job("https://x/a", "a"),
            job("https://x/c", "c again"),
            job("https://x/b", "b"),
            job("https://x/a", "a again"),
        ];
        let links = dedup_listings(jobs)
            .into_iter()
            .map(|j| j.link)
            .collect::<Vec<_>>();
        assert_eq!(links, vec!["https://x/c", "https://x/a", "https://x/b"]);
    }

    #[tokio::test]
    async fn run_writes_feed_and_debug_dump() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let renderer = FixtureRenderer::from_file("search.html");

        let outcome = run(&renderer, &config).await.unwrap();

        let RunOutcome::Written { path, jobs } = outcome else {
            panic!("Expected a written feed");
        };
        assert_eq!(path, config.output_path);
        assert_eq!(jobs.len(), 5);

        let xml = fs::read_to_string(&path).unwrap();
        assert_eq!(xml.matches("<item>").count(), 5);
        assert!(xml.contains("<guid isPermaLink=\"true\">https://jobs.ebrd.com/job/Kyiv-Analyst/1002/</guid>"));

        let dump = fs::read_to_string(&config.debug_html_path).unwrap();
        assert_eq!(dump, renderer.0);
    }

    #[tokio::test]
    async fn run_without_jobs_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.output_path, "previous feed").unwrap();

        let outcome = run(&FixtureRenderer::from_file("no_table.html"), &config)
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::NoJobs);
        assert_eq!(
            fs::read_to_string(&config.output_path).unwrap(),
            "previous feed"
        );
        assert!(config.debug_html_path.is_file());
    }

    #[tokio::test]
    async fn run_without_jobs_writes_no_feed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let outcome = run(&FixtureRenderer("<html></html>".to_string()), &config)
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::NoJobs);
        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn render_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let res = run(&BrokenRenderer, &config).await;

        assert!(matches!(res, Err(ScraperError::Io(_))));
        assert!(!config.output_path.exists());
        assert!(!config.debug_html_path.exists());
    }

    #[tokio::test]
    async fn unwritable_debug_dump_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            debug_html_path: dir.path().join("missing").join("debug_page.html"),
            ..config_in(dir.path())
        };

        let outcome = run(&FixtureRenderer::from_file("fallback.html"), &config)
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Written { ref jobs, .. } if jobs.len() == 2));
    }
}
