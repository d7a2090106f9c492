//! Page thumbnails rendered with pdfium

use pdfium_render::prelude::*;
use crate::error::{Error, Result};
use crate::plan::PageOrdinal;
use crate::shell::preview::{PageRenderer, Thumbnail};

/// Initialize Pdfium, trying a vendored library first, then the system one
pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Renders thumbnails through a pdfium shared library
///
/// Pdfium handles are not shared across threads, so every render binds its
/// own instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRenderer;

impl PageRenderer for PdfiumRenderer {
    fn render_thumbnail(&self, bytes: &[u8], page: PageOrdinal, scale: f32) -> Result<Thumbnail> {
        let index = page
            .checked_sub(1)
            .and_then(|i| u16::try_from(i).ok())
            .ok_or_else(|| Error::Render(format!("Page {} cannot be rendered", page)))?;

        let render = || -> std::result::Result<Thumbnail, PdfiumError> {
            let pdfium = init_pdfium()?;
            let document = pdfium.load_pdf_from_byte_slice(bytes, None)?;
            let pdf_page = document.pages().get(index)?;

            let config = PdfRenderConfig::new().scale_page_by_factor(scale);
            let bitmap = pdf_page.render_with_config(&config)?;

            Ok(Thumbnail {
                page,
                width: bitmap.width() as u32,
                height: bitmap.height() as u32,
                rgba: bitmap.as_rgba_bytes().to_vec(),
            })
        };

        render().map_err(|e| Error::Render(e.to_string()))
    }
}

/// Encode a thumbnail as PNG at `path`
pub fn save_png(thumbnail: &Thumbnail, path: &std::path::Path) -> Result<()> {
    let image = image::RgbaImage::from_raw(thumbnail.width, thumbnail.height, thumbnail.rgba.clone())
        .ok_or_else(|| Error::Render("Bitmap size does not match its dimensions".to_string()))?;
    image
        .save(path)
        .map_err(|e| Error::Render(e.to_string()))
}
