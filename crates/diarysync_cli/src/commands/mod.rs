//! CLI command implementations.

pub mod compact;
pub mod info;
pub mod list;
pub mod save;
pub mod sync;

use diarysync_server::{ServerConfig, SyncServer};
use diarysync_storage::FileStore;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Builds the server configuration from CLI flags.
pub fn server_config(default_app_id: &str) -> ServerConfig {
    ServerConfig::default().with_default_app_id(default_app_id)
}

/// Opens the store at `path` and wraps it in a server.
pub fn open_server(
    path: &Path,
    config: ServerConfig,
) -> Result<SyncServer, Box<dyn std::error::Error>> {
    debug!("Opening store at {:?}", path);
    let store = FileStore::open(path)?;
    Ok(SyncServer::new(config, Arc::new(store)))
}

/// Reads a request body from a file, or stdin for `-`.
pub fn read_input(input: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(fs::read(input)?)
}

/// Prints a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
