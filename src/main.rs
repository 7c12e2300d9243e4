use clap::Parser;
use crawl_digest::SiteDigest;
use std::process::ExitCode;
use std::time::Instant;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging, info level unless RUST_LOG is set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    ::log::info!("Starting crawl for URL: {}", config.root_url);
    ::log::debug!("Using WebDriver at {}", config.webdriver_url);

    let start_time = Instant::now();
    match SiteDigest::with_config(config).write().await {
        Ok(_) => {
            ::log::info!(
                "Total time taken: {:.2} ms",
                start_time.elapsed().as_secs_f64() * 1000.0
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
