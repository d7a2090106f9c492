//! PDF collaborators: probing, assembly and (optionally) rendering

pub mod metadata;
pub mod assemble;
#[cfg(feature = "pdfium")]
pub mod thumbnail;

// Re-export commonly used items
pub use metadata::{extract_metadata, probe_page_count, PdfMetadata};
pub use assemble::{assemble_merge, extract_part};
#[cfg(feature = "pdfium")]
pub use thumbnail::{save_png, PdfiumRenderer};
