//! Page-count probing and PDF metadata extraction

use lopdf::{Document, Object};
use crate::error::{Error, Result};

/// Page count declared by the Count field of the root Pages dictionary
fn declared_page_count(doc: &Document) -> Option<i64> {
    let pages_id = doc.catalog().ok()?.get(b"Pages").ok()?.as_reference().ok()?;
    doc.get_dictionary(pages_id).ok()?.get(b"Count").ok()?.as_i64().ok()
}

/// Number of pages reachable through the page tree
///
/// Assembly resolves pages by walking the tree, so the walk is authoritative.
/// A root Count that disagrees is only logged.
pub(crate) fn page_count(doc: &Document) -> usize {
    let walked = doc.get_pages().len();
    match declared_page_count(doc) {
        Some(declared) if declared != walked as i64 => {
            log::warn!(
                "Pages dictionary declares {} pages but the page tree holds {}; using {}",
                declared, walked, walked
            );
        }
        None => log::debug!("Pages dictionary has no usable Count"),
        _ => {}
    }
    walked
}

/// Page count as a u32, rejecting documents without pages
fn checked_page_count(name: &str, doc: &Document) -> Result<u32> {
    let count = page_count(doc);

    if count == 0 {
        return Err(Error::DecodeFailure {
            name: name.to_string(),
            reason: "document has no pages".to_string(),
        });
    }

    u32::try_from(count).map_err(|_| Error::DecodeFailure {
        name: name.to_string(),
        reason: format!("unsupported page count {}", count),
    })
}

/// Load a document from memory, mapping any parse error to a decode failure
pub(crate) fn load_document(name: &str, bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| Error::DecodeFailure {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    // Encrypted files are read permissively: the page tree is not encrypted,
    // so counting and re-parenting pages still works.
    if doc.is_encrypted() {
        log::warn!("{} is encrypted; reading its page structure without decrypting", name);
    }

    Ok(doc)
}

/// Determine how many pages a PDF has
///
/// Fails with [`Error::DecodeFailure`] if the bytes are not a readable PDF
/// or the document has no pages.
pub fn probe_page_count(name: &str, bytes: &[u8]) -> Result<u32> {
    let doc = load_document(name, bytes)?;
    checked_page_count(name, &doc)
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: u32,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
    /// Whether the file carries an encryption dictionary
    pub encrypted: bool,
}

/// Read a text entry of the Info dictionary
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// Extract metadata from an in-memory PDF
pub fn extract_metadata(name: &str, bytes: &[u8]) -> Result<PdfMetadata> {
    let doc = load_document(name, bytes)?;
    let page_count = checked_page_count(name, &doc)?;

    Ok(PdfMetadata {
        page_count,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
        encrypted: doc.is_encrypted(),
    })
}
