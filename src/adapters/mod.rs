// Adapters layer: concrete readers and writers behind the domain ports.

pub mod readers;
pub mod writers;

use std::path::Path;

/// Lowercased extension without the dot; empty when the path has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
