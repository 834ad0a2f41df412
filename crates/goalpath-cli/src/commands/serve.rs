//! Server command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use goalpath_core::{config::CONFIG_PATH_ENV, EngineConfig};

pub async fn cmd_serve(config_path: Option<&Path>, host: &str, port: u16) -> Result<()> {
    // --config wins over the environment
    let env_path = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);
    let config_path = config_path.map(Path::to_path_buf).or(env_path);

    let config = EngineConfig::load(config_path.as_deref()).context("Failed to load engine config")?;

    println!("🚀 Starting Goalpath API server...");
    println!("   Config: {}", config.source);
    println!("   Investment options: {}", config.catalog.len());
    println!("   Listening: http://{}:{}", host, port);
    println!();
    println!("   ⚠️  No authentication - bind to localhost or put a proxy in front");
    println!();

    goalpath_server::serve(config, host, port).await
}
