//! Streams a completion to stdout as fragments arrive.
//!
//! ```bash
//! export OPENAI_API_KEY=your_api_key_here
//! RUST_LOG=openai_service=debug cargo run --example streaming_chat -- "Tell me a short story"
//! ```

use futures_util::StreamExt;
use openai_service::OpenAIService;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Tell me a short story about a robot learning to paint.".to_string());

    let service = OpenAIService::from_env()?;
    let mut stream = service.complete_stream(&prompt);

    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await {
        print!("{}", fragment?);
        stdout.flush()?;
    }
    println!();

    Ok(())
}
