use std::path::PathBuf;
use tokio::time::Duration;

pub const ORIGIN: &str = "https://jobs.ebrd.com";
pub const SEARCH_PATH: &str = "/search/?q=&sortColumn=referencedate&sortDirection=desc";
pub const FEED_TITLE: &str = "EBRD Job Vacancies";
pub const FEED_DESCRIPTION: &str =
    "Current job opportunities at the European Bank for Reconstruction and Development";
pub const FEED_LANGUAGE: &str = "en";
pub const FEED_SELF_URL: &str = "https://cinfoposte.github.io/ebrd-jobs/ebrd_jobs.xml";
pub const TABLE_CLASS: &str = "searchResults";
pub const ROW_CLASS: &str = "data-row";
pub const OUTPUT_PATH: &str = "ebrd_jobs.xml";
pub const DEBUG_HTML_PATH: &str = "debug_page.html";

lazy_static::lazy_static! {
    static ref SETTLE_DELAY: Duration = Duration::from_secs(5);
    static ref MARKER_TIMEOUT: Duration = Duration::from_secs(15);
}

/// Everything a run needs to know about the careers site and where to put
/// its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub origin: String,
    pub feed_title: String,
    pub feed_description: String,
    pub language: String,
    pub self_url: String,
    pub table_class: String,
    pub row_class: String,
    pub settle_delay: Duration,
    pub marker_timeout: Duration,
    pub output_path: PathBuf,
    pub debug_html_path: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            origin: ORIGIN.to_string(),
            feed_title: FEED_TITLE.to_string(),
            feed_description: FEED_DESCRIPTION.to_string(),
            language: FEED_LANGUAGE.to_string(),
            self_url: FEED_SELF_URL.to_string(),
            table_class: TABLE_CLASS.to_string(),
            row_class: ROW_CLASS.to_string(),
            settle_delay: *SETTLE_DELAY,
            marker_timeout: *MARKER_TIMEOUT,
            output_path: PathBuf::from(OUTPUT_PATH),
            debug_html_path: PathBuf::from(DEBUG_HTML_PATH),
        }
    }
}

impl SiteConfig {
    pub fn with_origin<S: AsRef<str>>(origin: S) -> Self {
        SiteConfig {
            origin: origin.as_ref().trim_end_matches('/').to_string(),
            ..SiteConfig::default()
        }
    }

    /// Newest postings first.
    pub fn search_url(&self) -> String {
        format!("{}{}", self.origin, SEARCH_PATH)
    }

    /// CSS selector of the element whose presence means the results rendered.
    pub fn marker_selector(&self) -> String {
        format!(".{}", self.table_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_search_url() {
        assert_eq!(
            SiteConfig::default().search_url(),
            "https://jobs.ebrd.com/search/?q=&sortColumn=referencedate&sortDirection=desc"
        );
    }

    #[test]
    fn with_origin_rebases_search_url() {
        let config = SiteConfig::with_origin("http://127.0.0.1:8080/");
        assert_eq!(config.origin, "http://127.0.0.1:8080");
        assert_eq!(
            config.search_url(),
            "http://127.0.0.1:8080/search/?q=&sortColumn=referencedate&sortDirection=desc"
        );
        assert_eq!(config.self_url, FEED_SELF_URL);
        assert_eq!(config.marker_selector(), ".searchResults");
    }
}
