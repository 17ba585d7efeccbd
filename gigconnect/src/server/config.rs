use clap::Parser;

/// Server settings, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "gigconnect")]
#[command(about = "Worker search and registration API for GigConnect")]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "GIGCONNECT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Redis connection URL; the in-memory store is used when unset
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Key prefix for Redis documents
    #[arg(long, env = "GIGCONNECT_PREFIX", default_value = "gig")]
    pub prefix: String,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
