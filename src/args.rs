use clap::{Parser, ValueEnum};
use crawl_digest::{CrawlConfig, CrawlResult, LinkResolution, TextSource};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crawl-digest")]
#[command(
    about = "Create a Markdown file from the text content of all links on a given webpage"
)]
#[command(version)]
pub struct Args {
    /// The root URL to start scraping from
    #[arg(short, long)]
    pub url: String,

    /// Output filename (defaults to {date}_{host}.md)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output folder [default: processed]
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint [default: http://localhost:4444, or $WEBDRIVER_URL]
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Number of pages fetched at once, each with its own browser session
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Resolve relative links per RFC 3986 instead of joining them as paths
    #[arg(long)]
    pub standard_urls: bool,

    /// Where page text is read from
    #[arg(long, value_enum)]
    pub text_source: Option<TextSourceArg>,

    /// Save the pages fetched so far if the crawl fails
    #[arg(long)]
    pub persist_partial: bool,

    /// Only crawl links matching this regex (repeatable)
    #[arg(long = "include")]
    pub include_patterns: Vec<String>,

    /// Skip links matching this regex (repeatable)
    #[arg(long = "exclude")]
    pub exclude_patterns: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TextSourceArg {
    Rendered,
    Markup,
}

impl From<TextSourceArg> for TextSource {
    fn from(arg: TextSourceArg) -> Self {
        match arg {
            TextSourceArg::Rendered => TextSource::Rendered,
            TextSourceArg::Markup => TextSource::Markup,
        }
    }
}

impl Args {
    /// Builds the crawl configuration: config file, then environment, then flags
    pub fn into_config(self) -> CrawlResult<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = CrawlConfig::from_file(path)?;
                config.root_url = self.url.clone();
                config
            }
            None => CrawlConfig::new(&self.url),
        }
        .with_env_overrides();

        if let Some(output) = self.output {
            config.output_filename = Some(output);
        }
        if let Some(folder) = self.folder {
            config.output_folder = folder;
        }
        if let Some(webdriver_url) = self.webdriver_url {
            config.webdriver_url = webdriver_url;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if self.standard_urls {
            config.link_resolution = LinkResolution::Standard;
        }
        if let Some(text_source) = self.text_source {
            config.text_source = text_source.into();
        }
        if self.persist_partial {
            config.persist_partial = true;
        }
        config.include_patterns.extend(self.include_patterns);
        config.exclude_patterns.extend(self.exclude_patterns);

        config.validate()?;
        Ok(config)
    }
}
