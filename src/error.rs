#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
    #[error("Invalid browser configuration: {0}")]
    BrowserConfig(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid selector `{0}`")]
    Selector(String),
    #[error("Feed is not valid UTF-8")]
    FeedEncoding(#[from] std::string::FromUtf8Error),
}

/// Faults of a single result row. The row is skipped, the batch goes on.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("Link `{0}` is not a valid URL")]
    InvalidLink(String),
}
