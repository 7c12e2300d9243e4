use crate::config::{CrawlConfig, TextSource};
use crate::errors::{CrawlError, CrawlResult};
use crate::parsers::html;
use crate::session::{PageHandle, Session, SessionFactory};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};

/// Endpoints tried when the configured WebDriver URL refuses the connection
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:4444/wd/hub", // Selenium grid
    "http://localhost:9515",        // ChromeDriver default
    "http://127.0.0.1:4444",        // Try with IP instead of localhost
];

/// Opens WebDriver sessions against a remote endpoint
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    webdriver_url: String,
    browser_args: Vec<String>,
    text_source: TextSource,
}

impl WebDriverFactory {
    pub fn new(webdriver_url: &str, browser_args: Vec<String>, text_source: TextSource) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            browser_args,
            text_source,
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(
            &config.webdriver_url,
            config.browser_args.clone(),
            config.text_source,
        )
    }

    /// Capabilities requesting a Chrome instance with the configured arguments
    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": self.browser_args }),
        );
        caps
    }

    async fn connect(&self, webdriver_url: &str) -> Result<Client, String> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        builder
            .connect(webdriver_url)
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    async fn open(&self) -> CrawlResult<Box<dyn Session>> {
        let error = match self.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(Box::new(WebDriverSession::new(client, self.text_source)));
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                e
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = self.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Box::new(WebDriverSession::new(client, self.text_source)));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(CrawlError::Resource(format!(
            "could not connect to WebDriver at {}: {}",
            self.webdriver_url, error
        )))
    }
}

/// A session backed by a WebDriver client
pub struct WebDriverSession {
    client: Option<Client>,
    text_source: TextSource,
}

impl WebDriverSession {
    pub fn new(client: Client, text_source: TextSource) -> Self {
        Self {
            client: Some(client),
            text_source,
        }
    }

    fn client(&self) -> CrawlResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| CrawlError::Resource("WebDriver session already closed".to_string()))
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> CrawlResult<PageHandle> {
        let client = self.client()?;
        ::log::debug!("GOTO: {}", url);
        client
            .goto(url)
            .await
            .map_err(|e| CrawlError::navigation(url, e))?;
        Ok(PageHandle::new(url))
    }

    async fn anchor_targets(&mut self, page: &PageHandle) -> CrawlResult<Vec<String>> {
        let client = self.client()?;
        let anchors = client
            .find_all(Locator::Css("a"))
            .await
            .map_err(|e| CrawlError::navigation(page.url(), e))?;

        let mut targets = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            // The href property is already resolved against the page URL
            let href = match anchor
                .prop("href")
                .await
                .map_err(|e| CrawlError::navigation(page.url(), e))?
            {
                Some(href) => Some(href),
                None => anchor
                    .attr("href")
                    .await
                    .map_err(|e| CrawlError::navigation(page.url(), e))?,
            };
            if let Some(href) = href {
                targets.push(href);
            }
        }
        ::log::debug!("Browser found {} anchors on {}", targets.len(), page.url());
        Ok(targets)
    }

    async fn body_text(&mut self, page: &PageHandle) -> CrawlResult<String> {
        let client = self.client()?;
        match self.text_source {
            TextSource::Rendered => {
                let body = client
                    .find(Locator::Css("body"))
                    .await
                    .map_err(|e| CrawlError::fetch(page.url(), e))?;
                body.text()
                    .await
                    .map_err(|e| CrawlError::fetch(page.url(), e))
            }
            TextSource::Markup => {
                let source = client
                    .source()
                    .await
                    .map_err(|e| CrawlError::fetch(page.url(), e))?;
                html::body_text(&source)
                    .ok_or_else(|| CrawlError::fetch(page.url(), "page has no body element"))
            }
        }
    }

    async fn close(&mut self) -> CrawlResult<()> {
        // Closing twice is a no-op
        let Some(client) = self.client.take() else {
            return Ok(());
        };
        client
            .close()
            .await
            .map_err(|e| CrawlError::Resource(format!("failed to close WebDriver session: {}", e)))
    }
}
