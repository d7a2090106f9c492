//! Output document assembly using lopdf
//!
//! Both split parts and merges are built the same way: renumber each source
//! so object ids cannot collide, pick the selected page objects, and hang
//! them off a fresh flat page tree. Unreferenced objects are pruned before
//! saving.

use std::collections::{BTreeMap, HashMap};
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::pdf::metadata::load_document;
use crate::plan::{MergeEntry, PageOrdinal, PlannedPage, Rotation};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic Parent chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// A page to place in the output
#[derive(Debug, Clone, Copy)]
struct Selection {
    /// Index of the source document
    doc: usize,
    page: PageOrdinal,
    rotation: Option<Rotation>,
}

/// Build a document containing `pages` of one source, in the given order
///
/// `pages` must be non-empty with strictly increasing ordinals, as produced
/// by the partition planner. Rotations replace whatever rotation the page
/// had before.
pub fn extract_part(name: &str, bytes: &[u8], pages: &[PlannedPage]) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(Error::AssemblyFailure("No pages selected".to_string()));
    }
    if pages.windows(2).any(|w| w[0].page >= w[1].page) {
        return Err(Error::AssemblyFailure(
            "Pages must be in strictly increasing order".to_string(),
        ));
    }

    let doc = load_document(name, bytes)?;
    let selection: Vec<Selection> = pages
        .iter()
        .map(|p| Selection {
            doc: 0,
            page: p.page,
            rotation: p.rotation,
        })
        .collect();

    assemble(vec![doc], &selection).map_err(into_assembly_failure)
}

/// Build one document from several sources following a merge plan
///
/// `sources` are `(name, bytes)` pairs; `sequence` indexes into them.
pub fn assemble_merge<B: AsRef<[u8]>>(
    sources: &[(String, B)],
    sequence: &[MergeEntry],
) -> Result<Vec<u8>> {
    if sequence.is_empty() {
        return Err(Error::AssemblyFailure("No pages selected".to_string()));
    }

    let mut documents = Vec::with_capacity(sources.len());
    for (name, bytes) in sources {
        documents.push(load_document(name, bytes.as_ref())?);
    }

    let selection: Vec<Selection> = sequence
        .iter()
        .map(|e| Selection {
            doc: e.source,
            page: e.page,
            rotation: None,
        })
        .collect();

    assemble(documents, &selection).map_err(into_assembly_failure)
}

/// Report lopdf and IO problems during assembly as assembly failures
fn into_assembly_failure(e: Error) -> Error {
    match e {
        Error::Pdf(e) => Error::AssemblyFailure(e.to_string()),
        Error::Io(e) => Error::AssemblyFailure(e.to_string()),
        other => other,
    }
}

fn assemble(documents: Vec<Document>, selection: &[Selection]) -> Result<Vec<u8>> {
    if let Some(bad) = selection.iter().find(|s| s.doc >= documents.len()) {
        return Err(Error::AssemblyFailure(format!(
            "Source {} does not exist ({} sources)",
            bad.doc,
            documents.len()
        )));
    }

    // Define a starting max_id for the output document
    let mut max_id = 1;
    let mut resolved: HashMap<(usize, PageOrdinal), ObjectId> = HashMap::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for (index, mut doc) in documents.into_iter().enumerate() {
        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = doc.get_pages();
        for entry in selection.iter().filter(|s| s.doc == index) {
            let page_id = *pages.get(&entry.page).ok_or_else(|| {
                Error::AssemblyFailure(format!(
                    "Page {} missing from source {} ({} pages)",
                    entry.page,
                    index + 1,
                    pages.len()
                ))
            })?;

            // Must happen while the page can still see its original ancestors
            materialize_inherited(&mut doc, page_id)?;
            if let Some(rotation) = entry.rotation {
                set_rotation(&mut doc, page_id, rotation)?;
            }
            resolved.insert((index, entry.page), page_id);
        }

        objects.extend(doc.objects);
    }

    let page_ids: Vec<ObjectId> = selection
        .iter()
        .map(|s| resolved[&(s.doc, s.page)])
        .collect();

    let mut output = Document::with_version("1.5");

    // Add all collected objects FIRST
    output.objects.extend(objects);

    // Keep new_object_id() above every id we just added
    output.max_id = max_id - 1;

    let pages_id = output.new_object_id();

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = output.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    output.objects.insert(catalog_id, Object::Dictionary(catalog));
    output.objects.insert(pages_id, Object::Dictionary(pages_object));
    output.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = output.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    // Drops the source catalogs, page tree nodes and unselected pages
    output.prune_objects();
    output.compress();

    let mut buffer = Vec::new();
    output.save_to(&mut buffer)?;

    log::debug!("Assembled {} pages into {} bytes", page_ids.len(), buffer.len());
    Ok(buffer)
}

/// Look up an inheritable attribute on the ancestors of a page
fn find_inherited(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Copy inherited attributes onto the page itself so it keeps its size,
/// resources and rotation once re-parented under the new page tree
fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let inherited: Vec<(&[u8], Object)> = {
        let page = doc.get_dictionary(page_id)?;
        INHERITABLE_KEYS
            .iter()
            .filter(|key| !page.has(key))
            .filter_map(|key| find_inherited(doc, page, key).map(|value| (*key, value)))
            .collect()
    };

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page.set(key.to_vec(), value);
    }

    Ok(())
}

/// Set the page's rotation, replacing any existing value
fn set_rotation(doc: &mut Document, page_id: ObjectId, rotation: Rotation) -> Result<()> {
    let page = doc.get_dictionary_mut(page_id)?;
    page.set("Rotate", Object::Integer(i64::from(rotation.degrees())));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_part_rejects_empty_selection() {
        let result = extract_part("a.pdf", b"%PDF-1.5", &[]);
        assert!(matches!(result, Err(Error::AssemblyFailure(_))));
    }

    #[test]
    fn test_extract_part_rejects_unordered_pages() {
        let pages = [
            PlannedPage { page: 2, rotation: None },
            PlannedPage { page: 1, rotation: None },
        ];
        let result = extract_part("a.pdf", b"%PDF-1.5", &pages);
        assert!(matches!(result, Err(Error::AssemblyFailure(_))));
    }

    #[test]
    fn test_assemble_merge_rejects_empty_sequence() {
        let sources: Vec<(String, Vec<u8>)> = vec![];
        let result = assemble_merge(&sources, &[]);
        assert!(matches!(result, Err(Error::AssemblyFailure(_))));
    }

    // Assembly of real documents is covered in tests/integration.rs
}
