//! Thumbnail previews rendered with bounded concurrency
//!
//! Pages render on the blocking pool, at most `max_concurrent` at a time.
//! Results are collected by page ordinal, so their order never depends on
//! which render finished first.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use crate::config::PreviewOptions;
use crate::error::{Error, Result};
use crate::plan::PageOrdinal;

/// RGBA raster of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub page: PageOrdinal,
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

/// Renders a single page of a document to a raster image
pub trait PageRenderer: Send + Sync + 'static {
    fn render_thumbnail(&self, bytes: &[u8], page: PageOrdinal, scale: f32) -> Result<Thumbnail>;
}

/// Per-page render outcome, ordered by page
pub type PreviewSet = BTreeMap<PageOrdinal, Result<Thumbnail>>;

/// Render every page of a document
///
/// A failed page does not stop the others; its entry holds the error.
pub async fn render_previews<R: PageRenderer>(
    renderer: Arc<R>,
    bytes: Arc<[u8]>,
    page_count: u32,
    options: PreviewOptions,
) -> PreviewSet {
    let semaphore = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for page in 1..=page_count {
        let semaphore = Arc::clone(&semaphore);
        let renderer = Arc::clone(&renderer);
        let bytes = Arc::clone(&bytes);
        let scale = options.scale;

        tasks.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => tokio::task::spawn_blocking(move || {
                    renderer.render_thumbnail(&bytes, page, scale)
                })
                .await
                .map_err(Error::from)
                .and_then(|r| r),
                Err(e) => Err(Error::Render(e.to_string())),
            };
            (page, result)
        });
    }

    let mut previews = PreviewSet::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((page, result)) => {
                if let Err(e) = &result {
                    log::warn!("Preview of page {} failed: {}", page, e);
                }
                previews.insert(page, result);
            }
            Err(e) => log::warn!("Preview task failed: {}", e),
        }
    }

    // A panicked task leaves a hole; fill it so every page has an entry
    for page in 1..=page_count {
        previews
            .entry(page)
            .or_insert_with(|| Err(Error::Render(format!("Page {} was not rendered", page))));
    }

    log::debug!("Rendered {} previews", previews.len());
    previews
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Renders later pages faster and tracks peak concurrency
    #[derive(Default)]
    struct SlowRenderer {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl PageRenderer for SlowRenderer {
        fn render_thumbnail(&self, _bytes: &[u8], page: PageOrdinal, _scale: f32) -> Result<Thumbnail> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(u64::from(40 - page * 4)));
            self.active.fetch_sub(1, Ordering::SeqCst);

            if page == 3 {
                return Err(Error::Render("bad page".to_string()));
            }
            Ok(Thumbnail {
                page,
                width: 1,
                height: 1,
                rgba: vec![page as u8; 4],
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_previews_ordered_and_bounded() {
        let renderer = Arc::new(SlowRenderer::default());
        let options = PreviewOptions {
            scale: 0.5,
            max_concurrent: 2,
        };

        let previews = render_previews(Arc::clone(&renderer), Arc::from(vec![0u8]), 8, options).await;

        assert_eq!(previews.keys().copied().collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());
        assert!(previews[&3].is_err());
        assert_eq!(previews[&5].as_ref().unwrap().rgba, vec![5; 4]);
        assert!(renderer.peak.load(Ordering::SeqCst) <= 2);
    }
}
