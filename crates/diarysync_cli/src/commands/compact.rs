//! Compact command implementation.

use diarysync_storage::FileStore;
use std::path::Path;
use tracing::info;

/// Runs the compact command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Compacting record log at {:?}", path);
    let store = FileStore::open(path)?;
    let stats = store.compact()?;

    let saved = stats.bytes_before.saturating_sub(stats.bytes_after);
    println!("Compaction complete:");
    println!("  Rows kept:   {}", stats.rows);
    println!("  Size before: {} bytes", stats.bytes_before);
    println!("  Size after:  {} bytes", stats.bytes_after);
    println!(
        "  Space saved: {} bytes ({:.1}%)",
        saved,
        if stats.bytes_before > 0 {
            saved as f64 / stats.bytes_before as f64 * 100.0
        } else {
            0.0
        }
    );
    Ok(())
}
