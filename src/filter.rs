use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for scoping the pages a crawl visits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Whether pages on other hosts may be visited
    #[serde(default)]
    pub allow_external: bool,

    /// Regex patterns for URLs to exclude
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![r"\.(jpg|jpeg|png|gif|css|js|ico|svg|woff|woff2|ttf|eot|pdf)$".to_string()]
}

impl Default for UrlFilterConfig {
    fn default() -> Self {
        Self {
            allow_external: false,
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Resolves configured page paths against the target and drops the ones a crawl should skip
#[derive(Debug)]
pub struct UrlFilter {
    base: Url,
    config: UrlFilterConfig,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter for a target base URL
    pub fn new(base: Url, config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            base,
            config,
            exclude_regexes,
        })
    }

    /// Create a filter with the default exclusions
    pub fn for_base(base: Url) -> Self {
        let config = UrlFilterConfig::default();
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self {
            base,
            config,
            exclude_regexes,
        }
    }

    /// Determine if a URL should be visited
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if !self.config.allow_external && url.origin() != self.base.origin() {
            return false;
        }

        let url_str = url.as_str();
        !self.exclude_regexes.iter().any(|re| re.is_match(url_str))
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }

    /// Resolve page paths into unique absolute URLs, preserving order
    ///
    /// An empty list resolves to the target root.
    pub fn resolve_pages(&self, paths: &[String]) -> Vec<Url> {
        let root = ["/".to_string()];
        let paths = if paths.is_empty() { &root[..] } else { paths };

        let mut resolved: Vec<Url> = Vec::with_capacity(paths.len());
        for path in paths {
            let url = match self.base.join(path.trim()) {
                Ok(url) => self.normalize_url(&url),
                Err(e) => {
                    ::log::warn!("Skipping unparseable page path {:?}: {}", path, e);
                    continue;
                }
            };

            if !self.should_crawl(&url) {
                ::log::warn!("URL filter rejected: {}", url);
                continue;
            }

            if resolved.contains(&url) {
                ::log::debug!("Skipping duplicate page: {}", url);
                continue;
            }

            resolved.push(url);
        }
        resolved
    }
}
