//! resp3-inspect: decode a RESP3 byte stream and print what it holds.
//!
//! Reads a capture file (or stdin) in fixed-size chunks, the way a network
//! read loop would receive it, and prints one line per top-level reply.

use resp3_token::config::Config;
use resp3_token::runtime::{StreamError, TokenReader};
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        input = ?config.input,
        chunk_size = config.decoder.chunk_size,
        max_depth = config.decoder.max_depth,
        max_buffer_size = config.decoder.max_buffer_size,
        "Starting resp3-inspect"
    );

    let tokens = match &config.input {
        Some(path) => inspect(tokio::fs::File::open(path).await?, &config).await?,
        None => inspect(tokio::io::stdin(), &config).await?,
    };

    info!(tokens, "Input fully decoded");
    Ok(())
}

/// Print every token read from `source`, returning how many there were.
async fn inspect<R: AsyncRead + Unpin>(source: R, config: &Config) -> Result<usize, StreamError> {
    let mut reader = TokenReader::new(source, &config.decoder);
    let mut stdout = tokio::io::stdout();
    let mut count = 0;

    while let Some(token) = reader.read_token().await? {
        let line = if config.raw {
            format!("{:?}", String::from_utf8_lossy(token.as_bytes()))
        } else {
            token.value().to_string()
        };
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        count += 1;
    }

    stdout.flush().await?;
    Ok(count)
}
