use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which stages of the pipeline a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Crawl, extract, generate and materialize
    Full,
    /// Crawl and extract only
    Crawl,
    /// Generate from a previous extraction
    Regenerate,
    /// Run the checklist over already generated files
    Validate,
}

impl RunMode {
    /// Whether this mode drives a browser session
    pub fn crawls(&self) -> bool {
        matches!(self, RunMode::Full | RunMode::Crawl)
    }

    /// Whether this mode calls the generation service
    pub fn generates(&self) -> bool {
        matches!(self, RunMode::Full | RunMode::Regenerate)
    }
}

/// Browser and crawl settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Base URL of the application to clone
    #[serde(default)]
    pub target_url: String,

    /// Optional login credentials
    #[serde(default)]
    pub login_email: Option<String>,

    #[serde(default)]
    pub login_password: Option<String>,

    /// Path of the login form, relative to the target
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Paths to visit, relative to the target
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,

    /// Selectors whose text is masked before capture
    #[serde(default)]
    pub mask_selectors: Vec<String>,

    /// Per-page timeout in seconds
    #[serde(default = "default_crawl_timeout")]
    pub timeout_secs: u64,

    /// Extra wait after the document reports ready
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

/// Generation service and retry loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chat-completions style endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Timeout for a single generation call, in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,

    /// Corrective re-prompts allowed after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Attach page screenshots to page prompts
    #[serde(default = "default_true")]
    pub attach_screenshots: bool,

    /// Concurrent generation requests per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between batches
    #[serde(default = "default_batch_delay")]
    pub batch_delay_ms: u64,
}

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    /// Depth cap for the pattern tagger
    #[serde(default = "default_tag_max_depth")]
    pub tag_max_depth: usize,

    /// Extraction output tree
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Generated project tree
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_pages() -> Vec<String> {
    vec!["/".to_string()]
}

fn default_crawl_timeout() -> u64 {
    30
}

fn default_settle_delay() -> u64 {
    1000
}

fn default_viewport_width() -> u32 {
    1440
}

fn default_viewport_height() -> u32 {
    900
}

fn default_true() -> bool {
    true
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_api_timeout() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    3
}

fn default_batch_size() -> usize {
    1
}

fn default_batch_delay() -> u64 {
    1000
}

fn default_tag_max_depth() -> usize {
    6
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("extraction")
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("generated-app")
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            login_email: None,
            login_password: None,
            login_path: default_login_path(),
            pages: default_pages(),
            mask_selectors: Vec::new(),
            timeout_secs: default_crawl_timeout(),
            settle_delay_ms: default_settle_delay(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            headless: true,
            webdriver_url: default_webdriver_url(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_api_timeout(),
            max_retries: default_max_retries(),
            attach_screenshots: true,
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            generation: GenerationConfig::default(),
            tag_max_depth: default_tag_max_depth(),
            output_dir: default_output_dir(),
            project_dir: default_project_dir(),
        }
    }
}

impl CrawlConfig {
    /// Whether both login credentials are present
    pub fn has_credentials(&self) -> bool {
        self.login_email.as_deref().is_some_and(|e| !e.is_empty())
            && self.login_password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment-style keys
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("TARGET_URL") {
            self.crawl.target_url = v.trim().to_string();
        }
        if let Some(v) = get("LOGIN_EMAIL") {
            self.crawl.login_email = Some(v);
        }
        if let Some(v) = get("LOGIN_PASSWORD") {
            self.crawl.login_password = Some(v);
        }
        if let Some(v) = get("LOGIN_PATH") {
            self.crawl.login_path = v;
        }
        if let Some(v) = get("PAGES") {
            self.crawl.pages = split_list(&v);
        }
        if let Some(v) = get("MASK_SELECTORS") {
            self.crawl.mask_selectors = split_list(&v);
        }
        if let Some(v) = get("CRAWL_TIMEOUT") {
            self.crawl.timeout_secs = parse_value("CRAWL_TIMEOUT", &v)?;
        }
        if let Some(v) = get("SETTLE_DELAY_MS") {
            self.crawl.settle_delay_ms = parse_value("SETTLE_DELAY_MS", &v)?;
        }
        if let Some(v) = get("VIEWPORT_WIDTH") {
            self.crawl.viewport_width = parse_value("VIEWPORT_WIDTH", &v)?;
        }
        if let Some(v) = get("VIEWPORT_HEIGHT") {
            self.crawl.viewport_height = parse_value("VIEWPORT_HEIGHT", &v)?;
        }
        if let Some(v) = get("HEADLESS") {
            self.crawl.headless = parse_bool("HEADLESS", &v)?;
        }
        if let Some(v) = get("WEBDRIVER_URL") {
            self.crawl.webdriver_url = v;
        }

        if let Some(v) = get("AI_API_URL") {
            self.generation.api_url = v;
        }
        if let Some(v) = get("AI_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
            self.generation.api_key = Some(v);
        }
        if let Some(v) = get("AI_MODEL") {
            self.generation.model = v;
        }
        if let Some(v) = get("AI_TEMPERATURE") {
            self.generation.temperature = parse_value("AI_TEMPERATURE", &v)?;
        }
        if let Some(v) = get("AI_MAX_TOKENS") {
            self.generation.max_tokens = parse_value("AI_MAX_TOKENS", &v)?;
        }
        if let Some(v) = get("AI_TIMEOUT") {
            self.generation.timeout_secs = parse_value("AI_TIMEOUT", &v)?;
        }
        if let Some(v) = get("MAX_RETRIES") {
            self.generation.max_retries = parse_value("MAX_RETRIES", &v)?;
        }
        if let Some(v) = get("ATTACH_SCREENSHOTS") {
            self.generation.attach_screenshots = parse_bool("ATTACH_SCREENSHOTS", &v)?;
        }
        if let Some(v) = get("BATCH_SIZE") {
            self.generation.batch_size = parse_value("BATCH_SIZE", &v)?;
        }
        if let Some(v) = get("BATCH_DELAY_MS") {
            self.generation.batch_delay_ms = parse_value("BATCH_DELAY_MS", &v)?;
        }

        if let Some(v) = get("TAG_MAX_DEPTH") {
            self.tag_max_depth = parse_value("TAG_MAX_DEPTH", &v)?;
        }
        if let Some(v) = get("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = get("PROJECT_DIR") {
            self.project_dir = PathBuf::from(v);
        }

        Ok(())
    }

    /// Check that the keys needed by `mode` are present and sane
    pub fn validate(&self, mode: RunMode) -> Result<(), ConfigError> {
        if mode.crawls() {
            if self.crawl.target_url.is_empty() {
                return Err(ConfigError::Missing("TARGET_URL"));
            }
            if url::Url::parse(&self.crawl.target_url).is_err() {
                return Err(ConfigError::Invalid {
                    key: "TARGET_URL",
                    value: self.crawl.target_url.clone(),
                });
            }
        }

        if mode.generates() {
            if self.generation.api_key.is_none() {
                return Err(ConfigError::Missing("AI_API_KEY"));
            }
            if !(0.0..=2.0).contains(&self.generation.temperature) {
                return Err(ConfigError::Invalid {
                    key: "AI_TEMPERATURE",
                    value: self.generation.temperature.to_string(),
                });
            }
            if self.generation.batch_size == 0 {
                return Err(ConfigError::Invalid {
                    key: "BATCH_SIZE",
                    value: "0".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Split a comma separated list, dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
