pub mod crawler;
pub mod fetch;
pub mod links;

pub use crawler::Crawler;
pub use fetch::{crawl_step, fetch_text};
pub use links::{LinkPolicy, extract_links, path_join};

#[cfg(test)]
mod tests;
