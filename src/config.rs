//! Tunable limits and shell options
//!
//! Nothing here is persisted. The CLI fills these from flags and everything
//! else uses the defaults.

use std::time::Duration;

/// Default maximum number of cut points in one split session (yields up to 5 parts)
pub const DEFAULT_MAX_CUT_POINTS: usize = 4;

/// Default maximum number of sources in one merge session
pub const DEFAULT_MAX_MERGE_SOURCES: usize = 20;

/// Session limits enforced on discrete user actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of distinct cut points
    pub max_cut_points: usize,
    /// Maximum number of documents in a merge
    pub max_merge_sources: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_cut_points: DEFAULT_MAX_CUT_POINTS,
            max_merge_sources: DEFAULT_MAX_MERGE_SOURCES,
        }
    }
}

/// Options for assembling and delivering output files
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pause between consecutive deliveries of a multi-file export
    pub pacing: Duration,
    /// Filename prefix for merged output
    pub merge_prefix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(500),
            merge_prefix: "merged".to_string(),
        }
    }
}

/// Options for thumbnail rendering
#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    /// Scale factor relative to the page's natural size in points
    pub scale: f32,
    /// Maximum number of pages rendered at the same time
    pub max_concurrent: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            scale: 0.3,
            max_concurrent: 4,
        }
    }
}
