//! Source document handles as seen by the planners

use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity token for an ingested document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

impl SourceId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A document whose page count is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: SourceId,
    /// Original filename, used for display and output naming
    pub name: String,
    /// Always at least 1
    pub page_count: u32,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, page_count: u32) -> Self {
        Self {
            id: SourceId::next(),
            name: name.into(),
            page_count,
        }
    }
}
