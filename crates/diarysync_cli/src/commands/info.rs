//! Info command implementation.

use super::print_json;
use diarysync_protocol::ServiceInfo;
use diarysync_server::ServerConfig;

/// Runs the info command.
pub fn run(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&ServiceInfo::running(&config.default_app_id))
}
