//! PDF fixtures generated in-test with lopdf

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};

/// Width of page `n` in generated documents; lets tests identify pages
pub fn page_width(n: u32) -> i64 {
    600 + n as i64
}

/// Build a PDF with `num_pages` pages, each tagged by its MediaBox width
pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    build_pdf(num_pages, false, None)
}

/// Like [`create_test_pdf`] but the MediaBox is only given on the page tree
/// root, together with an inherited rotation
pub fn create_inherited_pdf(num_pages: u32, inherited_rotate: i64) -> Vec<u8> {
    build_pdf(num_pages, true, Some(inherited_rotate))
}

fn build_pdf(num_pages: u32, inherit: bool, rotate: Option<i64>) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for n in 1..=num_pages {
        let content = format!("BT /F1 12 Tf 100 700 Td (Page {}) Tj ET", n);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        if !inherit {
            page.set("MediaBox", media_box(page_width(n)));
        }
        page_ids.push(doc.add_object(page));
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(num_pages as i64));
    pages.set(
        "Kids",
        Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
    );
    if inherit {
        pages.set("MediaBox", media_box(612));
    }
    if let Some(rotate) = rotate {
        pages.set("Rotate", Object::Integer(rotate));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to save test PDF");
    buffer
}

/// Rewrite the Count of the page tree root without touching its Kids
pub fn with_declared_count(bytes: &[u8], count: i64) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).expect("Fixture is not a readable PDF");
    let pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .expect("Catalog has no Pages reference");
    doc.get_dictionary_mut(pages_id)
        .expect("Pages is not a dictionary")
        .set("Count", Object::Integer(count));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to save test PDF");
    buffer
}

fn media_box(width: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(792),
    ])
}

/// MediaBox widths of the pages of `bytes`, in page order
pub fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("Output is not a readable PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("Page is not a dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("Page has no MediaBox");
            media_box[2].as_i64().expect("MediaBox width is not an integer")
        })
        .collect()
}

/// Own /Rotate value of each page, `None` where absent
pub fn page_rotations(bytes: &[u8]) -> Vec<Option<i64>> {
    let doc = Document::load_mem(bytes).expect("Output is not a readable PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .ok()
                .and_then(|page| page.get(b"Rotate").ok())
                .and_then(|rotate| rotate.as_i64().ok())
        })
        .collect()
}
