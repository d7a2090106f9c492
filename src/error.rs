//! Error types for the page kit library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the page kit library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task failed to complete
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Wrong file type, or no usable file in a selection
    #[error("Input rejected: {0}")]
    InputRejected(String),

    /// File could not be opened as a PDF
    #[error("Could not read {name}: {reason}")]
    DecodeFailure { name: String, reason: String },

    /// A session limit would be exceeded
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Cut point outside `[1, page_count - 1]`
    #[error("Invalid cut point after page {page} (document has {page_count} pages)")]
    InvalidCutPoint { page: u32, page_count: u32 },

    /// Page ordinal outside `[1, page_count]`
    #[error("Page {page} does not exist (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },

    /// Every page of the document is marked for deletion
    #[error("All pages are deleted; at least one page must remain")]
    AllPagesDeleted,

    /// Output document could not be produced
    #[error("Could not assemble output: {0}")]
    AssemblyFailure(String),

    /// A multi-part export stopped after delivering some parts
    #[error("Export incomplete: {delivered} of {total} files were saved before an error: {reason}")]
    IncompleteExport {
        delivered: usize,
        total: usize,
        reason: String,
    },

    /// Thumbnail rendering error
    #[error("Render error: {0}")]
    Render(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No PDF files found matching pattern: {0}")]
    NoFilesMatched(String),
}
