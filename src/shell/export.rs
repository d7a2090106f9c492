//! Turning plans into delivered files
//!
//! Assembly is CPU-bound and runs on the blocking pool. Parts of a split are
//! assembled and delivered one after another, with a pause between
//! deliveries so consecutive downloads are not dropped by the host.

use std::sync::Arc;
use crate::config::ExportOptions;
use crate::error::{Error, Result};
use crate::pdf;
use crate::plan::{MergeEntry, MergeSession, PlannedPage, SplitSession};
use crate::shell::ingest::LoadedSource;
use crate::shell::naming::{merge_filename_now, part_filename};
use crate::shell::sink::ArtifactSink;

/// Produces output document bytes from source bytes and a plan
pub trait Assembler: Send + Sync + 'static {
    fn extract_part(&self, name: &str, bytes: &[u8], pages: &[PlannedPage]) -> Result<Vec<u8>>;

    fn assemble_merge(
        &self,
        sources: &[(String, Arc<[u8]>)],
        sequence: &[MergeEntry],
    ) -> Result<Vec<u8>>;
}

/// Assembler backed by lopdf
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfAssembler;

impl Assembler for LopdfAssembler {
    fn extract_part(&self, name: &str, bytes: &[u8], pages: &[PlannedPage]) -> Result<Vec<u8>> {
        pdf::extract_part(name, bytes, pages)
    }

    fn assemble_merge(
        &self,
        sources: &[(String, Arc<[u8]>)],
        sequence: &[MergeEntry],
    ) -> Result<Vec<u8>> {
        pdf::assemble_merge(sources, sequence)
    }
}

/// Files delivered by a successful export, in delivery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub files: Vec<String>,
}

/// Runs exports with a given assembler and options
#[derive(Debug, Clone)]
pub struct Exporter<A = LopdfAssembler> {
    assembler: Arc<A>,
    options: ExportOptions,
}

impl Exporter<LopdfAssembler> {
    pub fn new(options: ExportOptions) -> Self {
        Self::with_assembler(LopdfAssembler, options)
    }
}

impl<A: Assembler> Exporter<A> {
    pub fn with_assembler(assembler: A, options: ExportOptions) -> Self {
        Self {
            assembler: Arc::new(assembler),
            options,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Split/trim `source` according to `session` and deliver every part
    ///
    /// If a part fails after earlier parts were delivered, those stay
    /// delivered and the error reports how many made it.
    pub async fn export_partition<S: ArtifactSink>(
        &self,
        source: &LoadedSource,
        session: &SplitSession,
        sink: &mut S,
    ) -> Result<ExportReport> {
        if session.page_count() != source.document.page_count {
            return Err(Error::InputRejected(format!(
                "edits are for a {}-page document but {} has {} pages",
                session.page_count(),
                source.document.name,
                source.document.page_count
            )));
        }

        let parts = session.plan()?;
        let total = parts.len();
        let mut files = Vec::with_capacity(total);
        log::info!("Exporting {} as {} file(s)", source.document.name, total);

        for part in parts {
            if !files.is_empty() {
                tokio::time::sleep(self.options.pacing).await;
            }

            let filename = part_filename(&source.document.name, part.index, total);
            let assembler = Arc::clone(&self.assembler);
            let name = source.document.name.clone();
            let bytes = Arc::clone(&source.bytes);
            let pages = part.pages;

            let result = tokio::task::spawn_blocking(move || {
                assembler.extract_part(&name, &bytes, &pages)
            })
            .await
            .map_err(Error::from)
            .and_then(|r| r)
            .and_then(|output| sink.deliver(&filename, output));

            if let Err(e) = result {
                log::warn!("Export of {} failed at part {}: {}", filename, part.index, e);
                if files.is_empty() {
                    return Err(e);
                }
                return Err(Error::IncompleteExport {
                    delivered: files.len(),
                    total,
                    reason: e.to_string(),
                });
            }

            files.push(filename);
        }

        Ok(ExportReport { files })
    }

    /// Merge all sources of `session` in order and deliver the result
    pub async fn export_merge<S: ArtifactSink>(
        &self,
        session: &MergeSession<LoadedSource>,
        sink: &mut S,
    ) -> Result<ExportReport> {
        if !session.ready() {
            return Err(Error::InputRejected(
                "select at least two PDF files to merge".to_string(),
            ));
        }

        let sequence = session.plan();
        let sources: Vec<(String, Arc<[u8]>)> = session
            .sources()
            .iter()
            .map(|s| (s.document.name.clone(), Arc::clone(&s.bytes)))
            .collect();
        log::info!("Merging {} files into {} pages", sources.len(), sequence.len());

        let assembler = Arc::clone(&self.assembler);
        let output = tokio::task::spawn_blocking(move || {
            assembler.assemble_merge(&sources, &sequence)
        })
        .await??;

        let filename = merge_filename_now(&self.options.merge_prefix);
        sink.deliver(&filename, output)?;

        Ok(ExportReport {
            files: vec![filename],
        })
    }
}
