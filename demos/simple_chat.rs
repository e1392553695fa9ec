//! Minimal example: one completion and one embedding batch.
//!
//! ```bash
//! export OPENAI_API_KEY=your_api_key_here
//! cargo run --example simple_chat
//! ```

use openai_service::OpenAIService;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let service = OpenAIService::from_env()?;

    let text = service.complete("What is the capital of France?").await?;
    println!("AI: {text}");

    let vectors = service
        .embed(["Paris", "Berlin"], "text-embedding-3-small")
        .await?;
    for (input, vector) in ["Paris", "Berlin"].iter().zip(&vectors) {
        println!("{input}: {} dimensions", vector.len());
    }

    Ok(())
}
