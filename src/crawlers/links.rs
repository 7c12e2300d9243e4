use crate::config::{CrawlConfig, LinkResolution};
use crate::errors::{CrawlError, CrawlResult};
use crate::filter::{LinkFilter, LinkFilterConfig};
use crate::session::Session;
use url::Url;

/// Scheme prefix of inline-script anchor targets, which are never crawled
const SCRIPT_PREFIX: &str = "javascript:";

/// Rules turning raw anchor targets into the crawl's link list
#[derive(Debug, Default)]
pub struct LinkPolicy {
    resolution: LinkResolution,
    filter: LinkFilter,
}

impl LinkPolicy {
    pub fn new(resolution: LinkResolution, filter: LinkFilter) -> Self {
        Self { resolution, filter }
    }

    /// Builds the policy from the crawl configuration
    pub fn from_config(config: &CrawlConfig) -> CrawlResult<Self> {
        let filter = LinkFilter::new(&LinkFilterConfig {
            include_patterns: config.include_patterns.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
        })
        .map_err(|e| CrawlError::Config(format!("invalid link pattern: {}", e)))?;

        Ok(Self::new(config.link_resolution, filter))
    }

    /// Normalizes raw anchor targets in document order
    ///
    /// Empty and `javascript:` targets are dropped, relative targets are
    /// resolved against `root_url`, and duplicates are kept.
    pub fn normalize<I, S>(&self, root_url: &str, targets: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = match self.resolution {
            LinkResolution::Standard => match Url::parse(root_url) {
                Ok(base) => Some(base),
                Err(e) => {
                    ::log::warn!("Root URL {} cannot be used as a base: {}", root_url, e);
                    None
                }
            },
            LinkResolution::PathJoin => None,
        };

        targets
            .into_iter()
            .filter_map(|target| {
                let target = target.as_ref();
                if target.is_empty() || target.starts_with(SCRIPT_PREFIX) {
                    return None;
                }
                if target.starts_with("http") {
                    return Some(target.to_string());
                }

                match self.resolution {
                    LinkResolution::PathJoin => Some(path_join(root_url, target)),
                    LinkResolution::Standard => {
                        let resolved = base.as_ref().and_then(|base| base.join(target).ok());
                        if resolved.is_none() {
                            ::log::warn!("Dropping unresolvable link: {}", target);
                        }
                        resolved.map(String::from)
                    }
                }
            })
            .filter(|link| {
                let keep = self.filter.should_crawl(link);
                if !keep {
                    ::log::debug!("Link filter rejected: {}", link);
                }
                keep
            })
            .collect()
    }
}

/// Joins `target` onto `base` the way a filesystem path is joined
///
/// A target starting with `/` replaces the base entirely, so this is not
/// URL resolution: `path_join("https://example.com/docs", "/about")` yields
/// `/about`.
pub fn path_join(base: &str, target: &str) -> String {
    if target.starts_with('/') || base.is_empty() {
        target.to_string()
    } else if base.ends_with('/') {
        format!("{}{}", base, target)
    } else {
        format!("{}/{}", base, target)
    }
}

/// Loads the root page and returns the links it references, in document order
pub async fn extract_links(
    session: &mut dyn Session,
    root_url: &str,
    policy: &LinkPolicy,
) -> CrawlResult<Vec<String>> {
    let page = session.navigate(root_url).await?;
    let targets = session.anchor_targets(&page).await?;
    ::log::debug!("Found {} anchors on {}", targets.len(), root_url);

    Ok(policy.normalize(root_url, targets))
}
