use crate::config::CrawlConfig;
use crate::crawlers::Crawler;
use crate::error::CrawlError;
use crate::parsers::html;
use crate::results::{ComputedStyles, PageSnapshot};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::{Duration, Instant};
use url::Url;

/// Tallest window used for full-page screenshots
const MAX_FULL_PAGE_HEIGHT: u32 = 16_384;

/// Interval between document.readyState polls
const READY_POLL: Duration = Duration::from_millis(100);

/// Fallback WebDriver servers tried after the configured one
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444",
];

const EMAIL_SELECTORS: &[&str] = &[
    "input[type=\"email\"]",
    "input[name=\"email\"]",
    "input[name=\"username\"]",
    "input[autocomplete=\"username\"]",
    "#email",
];
const PASSWORD_SELECTORS: &[&str] = &["input[type=\"password\"]", "input[name=\"password\"]"];
const SUBMIT_SELECTORS: &[&str] = &[
    "button[type=\"submit\"]",
    "input[type=\"submit\"]",
    "form button",
];

/// Elements whose computed styles are sampled on every page
const STYLE_SELECTORS: &[&str] = &[
    "body",
    "header",
    "nav",
    "aside",
    "main",
    "h1",
    "h2",
    "h3",
    "p",
    "a",
    "button",
    "input",
    "table",
    "li",
    "[class*=\"card\"]",
    "[class*=\"sidebar\"]",
    "[class*=\"modal\"]",
];

const STYLE_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "border-color",
    "border-radius",
    "box-shadow",
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "padding",
    "margin",
    "gap",
    "display",
    "width",
];

const COMPUTED_STYLES_SCRIPT: &str = r#"
const [selectors, properties] = arguments;
const out = {};
for (const selector of selectors) {
  let el;
  try { el = document.querySelector(selector); } catch (e) { continue; }
  if (!el) continue;
  const style = window.getComputedStyle(el);
  const props = {};
  for (const p of properties) {
    const v = style.getPropertyValue(p);
    if (v) props[p] = v;
  }
  out[selector] = props;
}
return out;
"#;

const STYLESHEET_TEXT_SCRIPT: &str = r#"
const chunks = [];
for (const sheet of Array.from(document.styleSheets)) {
  try {
    for (const rule of Array.from(sheet.cssRules)) chunks.push(rule.cssText);
  } catch (e) {
    // cross-origin sheets cannot be read
  }
}
for (const el of Array.from(document.querySelectorAll('[style]'))) {
  chunks.push('* { ' + el.getAttribute('style') + ' }');
}
return chunks.join('\n');
"#;

const MASK_SCRIPT: &str = r#"
const [selectors] = arguments;
let count = 0;
for (const selector of selectors) {
  let nodes;
  try { nodes = document.querySelectorAll(selector); } catch (e) { continue; }
  for (const el of Array.from(nodes)) {
    if ('value' in el && (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA')) {
      el.value = '•••';
    } else {
      el.textContent = '•••';
    }
    count += 1;
  }
}
return count;
"#;

/// WebDriver capabilities for a crawl configuration
pub fn capabilities(config: &CrawlConfig) -> Map<String, Value> {
    let mut args = vec![
        format!(
            "--window-size={},{}",
            config.viewport_width, config.viewport_height
        ),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Window height for a full-page screenshot of a document `document_height` tall
///
/// Never shorter than the viewport and never taller than the screenshot cap,
/// unless the viewport itself is taller than the cap.
pub fn full_page_height(document_height: Option<u64>, viewport_height: u32) -> u32 {
    let cap = viewport_height.max(MAX_FULL_PAGE_HEIGHT);
    match document_height {
        Some(h) => u32::try_from(h).unwrap_or(u32::MAX).clamp(viewport_height, cap),
        None => viewport_height,
    }
}

/// One WebDriver session shared by every page of a crawl
pub struct BrowserSession {
    client: Client,
    timeout: Duration,
    settle_delay: Duration,
    viewport: (u32, u32),
    mask_selectors: Vec<String>,
}

impl BrowserSession {
    /// Connect to the configured WebDriver server, falling back to well-known local ports
    pub async fn connect(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = connect_to_webdriver(config).await?;

        let session = Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            viewport: (config.viewport_width, config.viewport_height),
            mask_selectors: config.mask_selectors.clone(),
        };

        session.reset_window().await?;
        Ok(session)
    }

    /// Size the window back to the configured viewport
    pub async fn reset_window(&self) -> Result<(), CrawlError> {
        self.client
            .set_window_size(self.viewport.0, self.viewport.1)
            .await
            .map_err(|e| CrawlError::command("setting window size", e))
    }

    /// Navigate and wait until the document is loaded and settled
    pub async fn navigate(&self, url: &str) -> Result<(), CrawlError> {
        ::log::debug!("Navigating to {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| CrawlError::command(format!("navigating to {}", url), e))?;
        self.wait_until_ready().await?;
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    async fn wait_until_ready(&self) -> Result<(), CrawlError> {
        let start = Instant::now();
        loop {
            let state = self
                .client
                .execute("return document.readyState;", vec![])
                .await
                .map_err(|e| CrawlError::command("reading document state", e))?;
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            if start.elapsed() >= self.timeout {
                return Err(CrawlError::Timeout(self.timeout.as_secs()));
            }
            tokio::time::sleep(READY_POLL).await;
        }
    }

    /// Fill and submit the login form at `base` + `login_path`
    pub async fn login(&self, base: &Url, config: &CrawlConfig) -> Result<(), CrawlError> {
        let login_url = base
            .join(&config.login_path)
            .map_err(|_| CrawlError::InvalidUrl(config.login_path.clone()))?;
        ::log::info!("Logging in at {}", login_url);
        self.navigate(login_url.as_str()).await?;

        let email = config.login_email.as_deref().unwrap_or_default();
        let password = config.login_password.as_deref().unwrap_or_default();

        self.find_first(EMAIL_SELECTORS, "email field")
            .await?
            .send_keys(email)
            .await
            .map_err(|e| CrawlError::command("typing login email", e))?;
        self.find_first(PASSWORD_SELECTORS, "password field")
            .await?
            .send_keys(password)
            .await
            .map_err(|e| CrawlError::command("typing login password", e))?;
        self.find_first(SUBMIT_SELECTORS, "submit button")
            .await?
            .click()
            .await
            .map_err(|e| CrawlError::command("submitting login form", e))?;

        tokio::time::sleep(self.settle_delay).await;
        self.wait_until_ready().await?;

        let current = self
            .client
            .current_url()
            .await
            .map_err(|e| CrawlError::command("reading url after login", e))?;
        if current.path() == login_url.path() {
            ::log::warn!("Still on {} after login; credentials may be wrong", current);
        } else {
            ::log::info!("Logged in, landed on {}", current);
        }
        Ok(())
    }

    async fn find_first(
        &self,
        selectors: &[&str],
        what: &str,
    ) -> Result<fantoccini::elements::Element, CrawlError> {
        let mut last_error = None;
        for selector in selectors {
            match self.client.find(Locator::Css(*selector)).await {
                Ok(element) => return Ok(element),
                Err(e) => last_error = Some(e),
            }
        }
        match last_error {
            Some(e) => Err(CrawlError::command(format!("locating the {}", what), e)),
            None => Err(CrawlError::Unreachable(format!("no selectors for {}", what))),
        }
    }

    /// Replace the text of every element matching the mask selectors
    pub async fn mask(&self) -> Result<u64, CrawlError> {
        if self.mask_selectors.is_empty() {
            return Ok(0);
        }
        let masked = self
            .client
            .execute(MASK_SCRIPT, vec![json!(self.mask_selectors)])
            .await
            .map_err(|e| CrawlError::command("masking selectors", e))?;
        Ok(masked.as_u64().unwrap_or(0))
    }

    pub async fn title(&self) -> Result<Option<String>, CrawlError> {
        let title = self
            .client
            .title()
            .await
            .map_err(|e| CrawlError::command("reading title", e))?;
        Ok(Some(title).filter(|t| !t.trim().is_empty()))
    }

    pub async fn source(&self) -> Result<String, CrawlError> {
        self.client
            .source()
            .await
            .map_err(|e| CrawlError::command("reading page source", e))
    }

    /// Computed styles of a fixed set of representative elements
    pub async fn computed_styles(&self) -> Result<ComputedStyles, CrawlError> {
        let value = self
            .client
            .execute(
                COMPUTED_STYLES_SCRIPT,
                vec![json!(STYLE_SELECTORS), json!(STYLE_PROPERTIES)],
            )
            .await
            .map_err(|e| CrawlError::command("reading computed styles", e))?;
        Ok(serde_json::from_value(value).unwrap_or_else(|e| {
            ::log::warn!("Unexpected computed style payload: {}", e);
            ComputedStyles::new()
        }))
    }

    /// Text of every same-origin stylesheet rule plus inline style attributes
    pub async fn stylesheet_text(&self) -> Result<String, CrawlError> {
        let value = self
            .client
            .execute(STYLESHEET_TEXT_SCRIPT, vec![])
            .await
            .map_err(|e| CrawlError::command("reading stylesheets", e))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn screenshot(&self) -> Result<Vec<u8>, CrawlError> {
        self.client
            .screenshot()
            .await
            .map_err(|e| CrawlError::command("taking screenshot", e))
    }

    /// Screenshot with the window stretched to the document height
    pub async fn full_page_screenshot(&self) -> Result<Vec<u8>, CrawlError> {
        let document_height = self
            .client
            .execute(
                "return Math.max(document.body.scrollHeight, document.documentElement.scrollHeight);",
                vec![],
            )
            .await
            .map_err(|e| CrawlError::command("measuring document height", e))?
            .as_u64();
        let height = full_page_height(document_height, self.viewport.1);

        self.client
            .set_window_size(self.viewport.0, height)
            .await
            .map_err(|e| CrawlError::command("resizing for full-page screenshot", e))?;
        let png = self.screenshot().await;
        self.reset_window().await?;
        png
    }

    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

impl Crawler for BrowserSession {
    async fn capture(&self, url: &Url) -> Result<PageSnapshot, CrawlError> {
        let started = Instant::now();
        self.navigate(url.as_str()).await?;

        let masked = self.mask().await?;
        if masked > 0 {
            ::log::debug!("Masked {} elements on {}", masked, url);
        }

        let mut page = PageSnapshot::new(url.as_str(), url.path());
        page.title = self.title().await?;
        page.html = self.source().await?;
        page.computed_styles = self.computed_styles().await?;
        page.stylesheet_text = self.stylesheet_text().await?;
        if page.stylesheet_text.trim().is_empty() {
            page.stylesheet_text = html::extract_inline_styles(&page.html);
        }
        page.screenshot = self.screenshot().await?;
        page.full_screenshot = self.full_page_screenshot().await?;
        page.sidebar = html::detect_sidebar(&page.html);

        ::log::debug!(
            "Captured {} in {:.2} seconds",
            url,
            started.elapsed().as_secs_f64()
        );
        Ok(page)
    }

    async fn recover(&self) -> Result<(), CrawlError> {
        self.reset_window().await
    }
}

async fn connect_to_webdriver(config: &CrawlConfig) -> Result<Client, CrawlError> {
    let caps = capabilities(config);
    let mut tried = vec![config.webdriver_url.clone()];

    match ClientBuilder::native()
        .capabilities(caps.clone())
        .connect(&config.webdriver_url)
        .await
    {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                config.webdriver_url,
                e
            );
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS {
        if *url == config.webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        tried.push(url.to_string());
        if let Ok(client) = ClientBuilder::native()
            .capabilities(caps.clone())
            .connect(url)
            .await
        {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(CrawlError::Connect(tried.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_capabilities() {
        let config = CrawlConfig::default();
        let caps = capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--window-size=1440,900")));
        assert_eq!(caps["browserName"], "chrome");
    }

    #[test]
    fn test_headful_capabilities() {
        let config = CrawlConfig {
            headless: false,
            viewport_width: 1280,
            viewport_height: 720,
            ..CrawlConfig::default()
        };
        let caps = capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--window-size=1280,720")));
    }

    #[test]
    fn test_full_page_height_bounds() {
        assert_eq!(full_page_height(Some(3000), 900), 3000);
        assert_eq!(full_page_height(Some(400), 900), 900);
        assert_eq!(full_page_height(Some(50_000), 900), MAX_FULL_PAGE_HEIGHT);
        assert_eq!(full_page_height(None, 900), 900);
    }

    #[test]
    fn test_full_page_height_with_oversize_viewport() {
        assert_eq!(full_page_height(Some(3000), 20_000), 20_000);
        assert_eq!(full_page_height(Some(25_000), 20_000), 20_000);
        assert_eq!(full_page_height(Some(u64::MAX), 900), MAX_FULL_PAGE_HEIGHT);
    }
}
