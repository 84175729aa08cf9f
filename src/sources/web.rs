use crate::config::ScraperConfig;
use crate::error::{NavigationError, SetupError, SourceError};
use crate::parsers::html::{self, ScrapedArticle, SearchResultsPage};
use crate::sources::{ArticleSlot, PageDataSource};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::timeout;

const SEARCH_BUTTON: &str = r#"button[data-element="search-button"]"#;
const SEARCH_INPUT: &str = r#"input[data-element="search-form-input"]"#;
const SEARCH_SUBMIT: &str = r#"button[data-element="search-submit-button"]"#;
const SORT_SELECT: &str = "select.select-input";
const SEE_ALL_TOPICS: &str = "span.see-all-text";
const NEWEST_LABEL: &str = "Newest";

/// Time given to the page to re-render after a navigation or filter click
const SETTLE_DELAY: Duration = Duration::from_millis(1500);

/// Search results read from a live WebDriver session.
///
/// The page source is snapshotted once per results page and parsed with
/// [`html::parse_search_results`]; slots index into that snapshot.
pub struct WebPageSource {
    client: Client,
    element_timeout: Duration,
    page_load_timeout: Duration,
    snapshot: Option<SearchResultsPage>,
    current_page: u32,
}

impl WebPageSource {
    /// Connect to WebDriver, trying common local endpoints if the configured
    /// one is unreachable
    pub async fn connect(config: &ScraperConfig) -> Option<Self> {
        let client = connect_to_webdriver(&config.webdriver_url, config.headless).await?;
        Some(Self::from_client(client, config))
    }

    /// Wrap an already connected client
    pub fn from_client(client: Client, config: &ScraperConfig) -> Self {
        Self {
            client,
            element_timeout: Duration::from_secs(config.element_timeout_secs),
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            snapshot: None,
            current_page: 1,
        }
    }

    /// Open the site and submit `phrase` through its search form
    pub async fn open_search(&mut self, start_url: &str, phrase: &str) -> Result<(), SourceError> {
        ::log::info!("Opening {} and searching for {:?}", start_url, phrase);
        self.client.goto(start_url).await?;

        let button = self.wait_for(SEARCH_BUTTON, self.page_load_timeout).await?;
        button.click().await?;

        let input = self.wait_for(SEARCH_INPUT, self.element_timeout).await?;
        input.send_keys(phrase).await?;

        let submit = self.wait_for(SEARCH_SUBMIT, self.element_timeout).await?;
        submit.click().await?;

        self.wait_for(html::RESULTS_SELECTOR, self.page_load_timeout)
            .await?;
        self.invalidate();
        Ok(())
    }

    /// End the browser session
    pub async fn close(self) -> Result<(), SourceError> {
        self.client.close().await?;
        Ok(())
    }

    async fn wait_for(&self, css: &str, limit: Duration) -> Result<Element, SourceError> {
        let wait = self
            .client
            .wait()
            .at_most(limit)
            .for_element(Locator::Css(css));

        // The outer timeout guards against a hung WebDriver connection
        match timeout(limit + Duration::from_secs(5), wait).await {
            Ok(Ok(element)) => Ok(element),
            Ok(Err(e)) => {
                ::log::debug!("Waiting for {} failed: {}", css, e);
                Err(SourceError::Timeout(limit.as_secs(), css.to_string()))
            }
            Err(_) => Err(SourceError::Timeout(limit.as_secs(), css.to_string())),
        }
    }

    async fn settle(&mut self) {
        tokio::time::sleep(SETTLE_DELAY).await;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.snapshot = None;
    }

    async fn snapshot(&mut self) -> Result<&SearchResultsPage, SourceError> {
        if self.snapshot.is_none() {
            if let Err(e) = self
                .wait_for(html::RESULTS_SELECTOR, self.element_timeout)
                .await
            {
                // May be a legitimate "no results" page; parse it anyway
                ::log::warn!("Results list did not appear: {}", e);
            }

            let source = match timeout(self.page_load_timeout, self.client.source()).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(SourceError::Timeout(
                        self.page_load_timeout.as_secs(),
                        "page source".to_string(),
                    ));
                }
            };

            let page = html::parse_search_results(&source);
            ::log::debug!(
                "Snapshot of page {} has {} articles",
                self.current_page,
                page.articles.len()
            );
            self.snapshot = Some(page);
        }

        self.snapshot
            .as_ref()
            .ok_or_else(|| SourceError::Unavailable("no page snapshot".to_string()))
    }

    fn article(&self, slot: ArticleSlot) -> Result<&ScrapedArticle, SourceError> {
        self.snapshot
            .as_ref()
            .and_then(|page| page.articles.get(slot.0))
            .ok_or(SourceError::UnknownSlot(slot.0))
    }
}

#[async_trait]
impl PageDataSource for WebPageSource {
    async fn sort_by_newest(&mut self) -> Result<(), SetupError> {
        let select = self
            .wait_for(SORT_SELECT, self.element_timeout)
            .await
            .map_err(|e| SetupError::SortUnavailable(e.to_string()))?;
        select.select_by_label(NEWEST_LABEL).await?;
        self.settle().await;
        Ok(())
    }

    async fn select_category(&mut self, category: &str) -> Result<(), SetupError> {
        match self.wait_for(SEE_ALL_TOPICS, self.element_timeout).await {
            Ok(see_all) => see_all.click().await?,
            Err(e) => ::log::debug!("No 'see all' toggle for topics: {}", e),
        }

        let xpath = category_xpath(category);
        let checkbox = self
            .client
            .find(Locator::XPath(&xpath))
            .await
            .map_err(|_| SetupError::CategoryNotFound(category.to_string()))?;
        checkbox.click().await?;
        self.settle().await;
        Ok(())
    }

    async fn total_pages(&mut self) -> Result<u32, SourceError> {
        Ok(self.snapshot().await?.page_count())
    }

    async fn article_slots(&mut self, page_index: u32) -> Result<Vec<ArticleSlot>, SourceError> {
        self.current_page = page_index;
        let page = self.snapshot().await?;
        Ok((0..page.articles.len()).map(ArticleSlot).collect())
    }

    async fn read_title(&mut self, slot: ArticleSlot) -> Result<String, SourceError> {
        self.article(slot)?
            .title
            .clone()
            .ok_or_else(|| SourceError::MissingElement(html::TITLE_SELECTOR.to_string()))
    }

    async fn read_date(&mut self, slot: ArticleSlot) -> Result<String, SourceError> {
        self.article(slot)?
            .date
            .clone()
            .ok_or_else(|| SourceError::MissingElement(html::DATE_SELECTOR.to_string()))
    }

    async fn read_description(&mut self, slot: ArticleSlot) -> Result<String, SourceError> {
        self.article(slot)?
            .description
            .clone()
            .ok_or_else(|| SourceError::MissingElement(html::DESCRIPTION_SELECTOR.to_string()))
    }

    async fn read_image_url(&mut self, slot: ArticleSlot) -> Result<Option<String>, SourceError> {
        Ok(self.article(slot)?.image_url.clone())
    }

    async fn go_to_next_page(&mut self) -> Result<(), NavigationError> {
        let current = self.current_page;
        let href = self
            .snapshot()
            .await
            .map_err(|e| NavigationError::Failed(e.to_string()))?
            .next_page_url
            .clone()
            .ok_or(NavigationError::NoNextPage(current))?;

        let base = self
            .client
            .current_url()
            .await
            .map_err(|e| NavigationError::Failed(e.to_string()))?;
        let next = base
            .join(&href)
            .map_err(|e| NavigationError::Failed(format!("bad next link {:?}: {}", href, e)))?;

        ::log::info!("Navigating to results page {}: {}", current + 1, next);
        self.client
            .goto(next.as_str())
            .await
            .map_err(|e| NavigationError::Failed(e.to_string()))?;
        self.settle().await;
        Ok(())
    }
}

/// XPath for the checkbox of a topic whose label contains `category`,
/// compared case-insensitively
pub fn category_xpath(category: &str) -> String {
    let needle = category.to_lowercase().replace('"', "");
    format!(
        r#"(//ul[@class="search-filter-menu"])[1]//span[contains(translate(text(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ", "abcdefghijklmnopqrstuvwxyz"), "{}")]/../input"#,
        needle
    )
}

/// WebDriver capabilities for the requested browser mode
pub fn capabilities(headless: bool) -> Map<String, Value> {
    let mut caps = Map::new();
    if headless {
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless=new", "--window-size=1920,1080"] }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": ["-headless"] }),
        );
    }
    caps
}

async fn try_connect(url: &str, headless: bool) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(headless));
    builder.connect(url).await
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(webdriver_url: &str, headless: bool) -> Option<Client> {
    match try_connect(webdriver_url, headless).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = try_connect(url, headless).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_xpath_lowercases_and_strips_quotes() {
        let xpath = category_xpath("Cali\"fornia");
        assert!(xpath.ends_with(r#""california")]/../input"#));
        assert!(xpath.starts_with(r#"(//ul[@class="search-filter-menu"])[1]"#));
    }

    #[test]
    fn test_headless_capabilities() {
        assert!(capabilities(false).is_empty());

        let caps = capabilities(true);
        let chrome_args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(chrome_args.iter().any(|a| a == "--headless=new"));
        assert!(caps.contains_key("moz:firefoxOptions"));
    }
}
