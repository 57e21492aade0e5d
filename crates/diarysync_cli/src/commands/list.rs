//! List command implementation.

use super::{open_server, print_json};
use diarysync_protocol::{ListRequest, Record, SortKey};
use diarysync_server::ServerConfig;
use std::path::Path;
use tracing::info;

/// Runs the list command.
pub fn run(
    path: &Path,
    config: ServerConfig,
    app_id: Option<String>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let server = open_server(path, config)?;
    let response = server.handle_list(ListRequest { app_id })?;
    info!("Listed {} records", response.entries.len());

    match format {
        "json" => print_json(&response)?,
        _ => print_text_output(&response.entries),
    }
    Ok(())
}

fn print_text_output(entries: &[Record]) {
    if entries.is_empty() {
        println!("(no records)");
        return;
    }
    for record in entries {
        let when = match &record.timestamp {
            Some(SortKey::Int(t)) => t.to_string(),
            Some(SortKey::Float(t)) => t.to_string(),
            Some(SortKey::Text(t)) => t.clone(),
            None => "-".to_string(),
        };
        let tags = if record.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", record.tags.join(", "))
        };
        println!(
            "{:<24} {:<16} {}{}",
            record.key().unwrap_or("?"),
            when,
            first_line(record.content.as_deref().unwrap_or("")),
            tags
        );
    }
}

fn first_line(content: &str) -> &str {
    content.lines().next().unwrap_or("")
}
