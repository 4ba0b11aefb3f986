use anyhow::Context;
use std::env;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use shopping_results::{query, types::*, ExtractorConfig};

const USAGE: &str = "usage: shopping-extract [HTML_FILE|-] [QUERY]";

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("Extraction failed: {:#}", e);
        let body = ErrorResponse {
            error: format!("{:#}", e),
        };
        match serde_json::to_string_pretty(&body) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{{\"error\": \"{}\"}}", e),
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "-".to_string());
    if source == "-h" || source == "--help" {
        eprintln!("{}", USAGE);
        return Ok(());
    }
    let shopping_query = args.next().unwrap_or_default();

    let config = ExtractorConfig::from_env();
    info!("Starting shopping extraction");
    info!("Config: {:?}", config);

    if !shopping_query.is_empty() {
        match query::build_search_url(&config.query_input(&shopping_query)) {
            Ok(url) => info!("Search URL: {}", url),
            Err(e) => warn!("{}", e),
        }
    }

    let extractor = config.extractor().context("Failed to build extractor")?;
    let html = read_document(&source).await?;
    let result = extractor.extract_result(&shopping_query, &html);

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize products")?;
    println!("{}", json);
    Ok(())
}

async fn read_document(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut html = String::new();
        tokio::io::stdin()
            .read_to_string(&mut html)
            .await
            .context("Failed to read results page from stdin")?;
        Ok(html)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read results page from {}", source))
    }
}
