//! Orchestration around the planners: ingestion, previews, export and
//! delivery

pub mod ingest;
pub mod naming;
pub mod sink;
pub mod export;
pub mod preview;
pub mod status;

// Re-export commonly used items
pub use ingest::{accept, ingest, IngestOutcome, InputFile, LoadedSource};
pub use naming::{merge_filename, part_filename};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
pub use export::{Assembler, ExportReport, Exporter, LopdfAssembler};
pub use preview::{render_previews, PageRenderer, PreviewSet, Thumbnail};
pub use status::{describe, StatusLine};
