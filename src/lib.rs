//! PDF Page Kit Library
//!
//! Merge PDFs, or split and trim a single PDF while deleting and rotating
//! pages, entirely on the local machine. This library provides:
//! - Pure planners that turn page counts and user edits into page sequences
//! - Session values for cut points, deletions, rotations and source order
//! - lopdf-backed probing and assembly of output documents
//! - An async shell for previews and paced delivery of output files
//!
//! # Example
//!
//! ```no_run
//! use pdf_pagekit::plan::SplitSession;
//!
//! let session = SplitSession::new(5)
//!     .toggle_cut(2)?
//!     .toggle_delete(3)?
//!     .rotate(4)?;
//!
//! for part in session.plan()? {
//!     println!("part {}: {:?}", part.index, part.ordinals());
//! }
//! # Ok::<(), pdf_pagekit::Error>(())
//! ```

pub mod error;
pub mod config;
pub mod plan;
pub mod pdf;
pub mod shell;

// Re-export commonly used items
pub use error::{Error, Result};
pub use config::{ExportOptions, Limits, PreviewOptions};
