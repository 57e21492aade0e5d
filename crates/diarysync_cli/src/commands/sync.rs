//! Sync command implementation.

use super::{open_server, print_json, read_input};
use diarysync_protocol::{Record, SyncRequest};
use diarysync_server::ServerConfig;
use std::path::Path;
use tracing::info;

/// Runs the sync command.
pub fn run(
    path: &Path,
    config: ServerConfig,
    app_id: &str,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Syncing {:?} with partition {}", input, app_id);
    let local_entries: Vec<Record> = serde_json::from_slice(&read_input(input)?)?;

    let server = open_server(path, config)?;
    let response = server.handle_sync(SyncRequest::new(app_id, local_entries))?;
    info!(
        "Uploaded {}, {} to download",
        response.uploaded,
        response.downloaded.len()
    );
    print_json(&response)
}
