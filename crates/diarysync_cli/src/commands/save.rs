//! Save command implementation.

use super::{open_server, print_json, read_input};
use diarysync_protocol::{SaveRequest, WireMessage};
use diarysync_server::ServerConfig;
use std::path::Path;
use tracing::info;

/// Runs the save command.
pub fn run(
    path: &Path,
    config: ServerConfig,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Saving records from {:?}", input);
    let request = SaveRequest::decode(&read_input(input)?)?;

    let server = open_server(path, config)?;
    let response = server.handle_save(request)?;
    print_json(&response)
}
