//! Merge planning: concatenate every page of every source in user order

use crate::plan::source::SourceDocument;
use crate::plan::validate::PageOrdinal;

/// One page of the merged output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeEntry {
    /// Index into the source list passed to [`plan_merge`]
    pub source: usize,
    pub page: PageOrdinal,
}

/// Merged output, in output page order
pub type MergeOutputSequence = Vec<MergeEntry>;

/// Plan the page sequence of a merge
///
/// Emits pages `1..=page_count` of each source, sources in the given order.
/// Callers only merge two or more sources; the planner itself accepts any
/// number.
///
/// # Example
///
/// ```
/// use pdf_pagekit::plan::{plan_merge, SourceDocument};
///
/// let sources = vec![SourceDocument::new("a.pdf", 3), SourceDocument::new("b.pdf", 2)];
/// let plan = plan_merge(&sources);
/// assert_eq!(plan.len(), 5);
/// assert_eq!((plan[3].source, plan[3].page), (1, 1));
/// ```
pub fn plan_merge(sources: &[SourceDocument]) -> MergeOutputSequence {
    let total: usize = sources.iter().map(|s| s.page_count as usize).sum();
    let mut sequence = Vec::with_capacity(total);

    for (index, source) in sources.iter().enumerate() {
        sequence.extend((1..=source.page_count).map(|page| MergeEntry {
            source: index,
            page,
        }));
    }

    log::debug!("Planned merge of {} sources into {} pages", sources.len(), sequence.len());
    sequence
}
