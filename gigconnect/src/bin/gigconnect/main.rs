//! GigConnect API server.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use gigconnect::{
    MemoryStore, RedisStore,
    server::{self, ServerConfig},
};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = ServerConfig::parse();

    if let Err(err) = execute(config).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn execute(config: ServerConfig) -> Result<()> {
    match config.redis_url.as_deref() {
        Some(url) => {
            let store = RedisStore::connect(url, config.prefix.clone())
                .await
                .with_context(|| format!("failed to connect to Redis at {url}"))?;
            server::serve(&config, store).await?;
        }
        None => {
            warn!("REDIS_URL not set; workers are kept in memory and lost on shutdown");
            server::serve(&config, MemoryStore::new()).await?;
        }
    }

    info!("Goodbye");
    Ok(())
}
