use std::env;

use raglab_core::config::Config;
use raglab_llm::image::{ImageClient, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE};

/// One-shot image generation; any service failure aborts the run.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let prompt = if args.is_empty() {
        "a cute cat sitting on a sofa".to_string()
    } else {
        args.join(" ")
    };
    let model: String = config
        .get("images.model")
        .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());
    let size: String = config
        .get("images.size")
        .unwrap_or_else(|_| DEFAULT_IMAGE_SIZE.to_string());

    let client = ImageClient::new(Config::api_key()?, model)?;
    println!("🎨 Generating: {}", prompt);
    let url = client.generate(&prompt, &size).await?;
    println!("Image URL:");
    println!("{}", url);
    Ok(())
}
