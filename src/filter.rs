use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration for filtering discovered links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkFilterConfig {
    /// Regex patterns for links to include (if empty, all links are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for links to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Link filter built from include and exclude regex patterns
///
/// Patterns are matched against the resolved link text, which is not
/// necessarily a well-formed URL under path-join resolution.
#[derive(Debug, Default)]
pub struct LinkFilter {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new link filter from configuration
    pub fn new(config: &LinkFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a link should be crawled
    pub fn should_crawl(&self, link: &str) -> bool {
        // Exclusions take precedence
        if self.exclude_regexes.iter().any(|regex| regex.is_match(link)) {
            return false;
        }

        // If include patterns are specified, at least one must match
        self.include_regexes.is_empty()
            || self
                .include_regexes
                .iter()
                .any(|regex| regex.is_match(link))
    }
}
