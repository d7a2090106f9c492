//! Accepting user-supplied files

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::pdf::probe_page_count;
use crate::plan::SourceDocument;

/// MIME type accepted for input documents
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file offered by the user, before validation
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    /// Content type reported by the host, if any
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Read a file from disk; the content type is left to the extension
    pub fn read(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, std::fs::read(path)?))
    }
}

/// A probed document together with its bytes
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub document: SourceDocument,
    pub bytes: Arc<[u8]>,
}

impl AsRef<SourceDocument> for LoadedSource {
    fn as_ref(&self) -> &SourceDocument {
        &self.document
    }
}

/// Whether the content type or file extension says PDF
pub fn looks_like_pdf(name: &str, content_type: Option<&str>) -> bool {
    let by_type = content_type
        .map(|t| t.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);
    let by_extension = std::path::Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    by_type || by_extension
}

/// Validate one file and probe its page count
pub fn accept(file: InputFile) -> Result<LoadedSource> {
    if !looks_like_pdf(&file.name, file.content_type.as_deref()) {
        return Err(Error::InputRejected(format!("{} is not a PDF file", file.name)));
    }

    let page_count = probe_page_count(&file.name, &file.bytes)?;
    log::info!("Loaded {} ({} pages)", file.name, page_count);

    Ok(LoadedSource {
        document: SourceDocument::new(file.name, page_count),
        bytes: Arc::from(file.bytes),
    })
}

/// Outcome of ingesting a selection of files
#[derive(Debug)]
pub struct IngestOutcome {
    /// Accepted files, in selection order
    pub accepted: Vec<LoadedSource>,
    /// One message per file that was skipped
    pub rejected: Vec<String>,
}

/// Ingest a selection, keeping every usable file
///
/// Fails with [`Error::InputRejected`] only if nothing could be used.
pub fn ingest(files: Vec<InputFile>) -> Result<IngestOutcome> {
    if files.is_empty() {
        return Err(Error::InputRejected("no files selected".to_string()));
    }

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for file in files {
        let name = file.name.clone();
        match accept(file) {
            Ok(source) => accepted.push(source),
            Err(e) => {
                log::warn!("Skipping {}: {}", name, e);
                rejected.push(e.to_string());
            }
        }
    }

    if accepted.is_empty() {
        return Err(Error::InputRejected(format!(
            "none of the selected files could be used ({})",
            rejected.join("; ")
        )));
    }

    Ok(IngestOutcome { accepted, rejected })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf("report.pdf", None));
        assert!(looks_like_pdf("REPORT.PDF", None));
        assert!(looks_like_pdf("download", Some("application/pdf")));
        assert!(looks_like_pdf("download", Some("Application/PDF; charset=binary")));
        assert!(!looks_like_pdf("notes.txt", Some("text/plain")));
        assert!(!looks_like_pdf("pdf", None));
    }

    #[test]
    fn test_accept_rejects_wrong_type() {
        let result = accept(InputFile::new("notes.txt", b"hello".to_vec()));
        assert!(matches!(result, Err(Error::InputRejected(_))));
    }

    #[test]
    fn test_accept_reports_decode_failure() {
        let result = accept(InputFile::new("broken.pdf", b"%PDF-1.4 garbage".to_vec()));
        assert!(matches!(result, Err(Error::DecodeFailure { .. })));
    }

    #[test]
    fn test_ingest_nothing_usable() {
        let result = ingest(vec![
            InputFile::new("a.txt", vec![]),
            InputFile::new("b.doc", vec![]),
        ]);
        assert!(matches!(result, Err(Error::InputRejected(_))));
        assert!(matches!(ingest(vec![]), Err(Error::InputRejected(_))));
    }
}
