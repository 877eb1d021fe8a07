use crate::{config::SiteConfig, Renderer, ScraperError};
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    Page,
};
use futures::StreamExt;
use tokio::{task::JoinHandle, time::Duration};
use tracing::{debug, info, warn};

lazy_static::lazy_static! {
    static ref MARKER_POLL: Duration = Duration::from_millis(250);
}

/// How long to give a page's scripts before its markup is captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    pub settle_delay: Duration,
    /// Selector of the element that appears once the results are rendered.
    pub marker: String,
    pub marker_timeout: Duration,
}

impl WaitPolicy {
    pub fn from_config(config: &SiteConfig) -> Self {
        WaitPolicy {
            settle_delay: config.settle_delay,
            marker: config.marker_selector(),
            marker_timeout: config.marker_timeout,
        }
    }

    async fn wait_for_marker(&self, page: &Page) -> bool {
        let poll = async {
            while page.find_element(self.marker.as_str()).await.is_err() {
                tokio::time::sleep(*MARKER_POLL).await;
            }
        };
        tokio::time::timeout(self.marker_timeout, poll).await.is_ok()
    }
}

/// A live browsing session able to load one page.
#[async_trait::async_trait]
pub trait PageSession: Send + Sync + Sized {
    async fn load(&self, url: &str, wait: &WaitPolicy) -> Result<String, ScraperError>;
    async fn close(self);
}

/// Loads `url` in `session` and closes it, whether loading worked or not.
pub async fn render_in<S: PageSession>(
    session: S,
    url: &str,
    wait: &WaitPolicy,
) -> Result<String, ScraperError> {
    let html = session.load(url, wait).await;
    session.close().await;
    html
}

/// A headless Chromium process together with the task driving its CDP
/// connection.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch() -> Result<Self, ScraperError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .window_size(1920, 1080)
            .build()
            .map_err(ScraperError::BrowserConfig)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler: {}", e);
                }
            }
        });

        Ok(BrowserSession { browser, handler })
    }
}

#[async_trait::async_trait]
impl PageSession for BrowserSession {
    async fn load(&self, url: &str, wait: &WaitPolicy) -> Result<String, ScraperError> {
        info!("Loading {}", url);
        let page = self.browser.new_page(url).await?;

        info!("Waiting for page content to load...");
        tokio::time::sleep(wait.settle_delay).await;

        if wait.wait_for_marker(&page).await {
            info!("Job listings table found");
        } else {
            warn!(
                "Timeout after {:?} waiting for `{}`, using the markup as is",
                wait.marker_timeout, wait.marker
            );
        }

        Ok(page.content().await?)
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        info!("Browser closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Loads pages in headless Chromium so script-built markup is captured.
#[derive(Debug, Clone)]
pub struct BrowserRenderer {
    wait: WaitPolicy,
}

impl BrowserRenderer {
    pub fn new(config: &SiteConfig) -> Self {
        BrowserRenderer {
            wait: WaitPolicy::from_config(config),
        }
    }
}

#[async_trait::async_trait]
impl Renderer for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<String, ScraperError> {
        info!("Starting Chrome browser (headless mode)...");
        let session = BrowserSession::launch().await?;
        render_in(session, url, &self.wait).await
    }
}

/// Plain GET, for servers that send finished markup.
#[derive(Debug, Clone, Default)]
pub struct HttpRenderer {
    client: reqwest::Client,
}

impl HttpRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String, ScraperError> {
        debug!("Visit {}", url);
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}
