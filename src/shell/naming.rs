//! Output file names

use std::path::Path;

use chrono::{DateTime, Local, TimeZone};

/// `<prefix>-<YYYYmmdd-HHMMSS>.pdf`
pub fn merge_filename<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}-{}.pdf", prefix, at.format("%Y%m%d-%H%M%S"))
}

/// Merge output name stamped with the current local time
pub fn merge_filename_now(prefix: &str) -> String {
    merge_filename(prefix, &Local::now())
}

/// Source filename without its final extension
pub fn base_name(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => filename,
        Some(dot) => &filename[..dot],
    }
}

/// Name of part `index` (1-based) of `total` parts cut from `source_name`
///
/// A single part means nothing was split, so it is named as trimmed. Any
/// directory in `source_name` is dropped.
pub fn part_filename(source_name: &str, index: usize, total: usize) -> String {
    let file_name = Path::new(source_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source_name);
    let base = base_name(file_name);
    if total <= 1 {
        format!("{}-trimmed.pdf", base)
    } else {
        format!("{}-part{}.pdf", base, index)
    }
}
