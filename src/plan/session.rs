//! Editing state for split/trim and merge sessions
//!
//! Both sessions are plain values. Every user action takes `&self` and
//! returns the next state, so a failed action leaves the caller's state
//! untouched.

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::plan::merge::{plan_merge, MergeOutputSequence};
use crate::plan::partition::{plan_partition, OutputPart};
use crate::plan::source::{SourceDocument, SourceId};
use crate::plan::validate::{
    check_cut_point, check_page, CutPointSet, DeletedPageSet, PageOrdinal, Rotation, RotationMap,
};

/// Cut points, deletions and rotations for one document being split or trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSession {
    page_count: u32,
    cut_points: CutPointSet,
    deleted: DeletedPageSet,
    rotations: RotationMap,
    limits: Limits,
}

impl SplitSession {
    /// Fresh session for a document with `page_count` pages
    pub fn new(page_count: u32) -> Self {
        Self::with_limits(page_count, Limits::default())
    }

    pub fn with_limits(page_count: u32, limits: Limits) -> Self {
        Self {
            page_count,
            cut_points: CutPointSet::new(),
            deleted: DeletedPageSet::new(),
            rotations: RotationMap::new(),
            limits,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn cut_points(&self) -> &CutPointSet {
        &self.cut_points
    }

    pub fn deleted(&self) -> &DeletedPageSet {
        &self.deleted
    }

    pub fn rotations(&self) -> &RotationMap {
        &self.rotations
    }

    /// Number of pages that will appear in the output
    pub fn surviving_count(&self) -> u32 {
        self.page_count - self.deleted.len() as u32
    }

    pub fn rotation_of(&self, page: PageOrdinal) -> Option<Rotation> {
        self.rotations.get(&page).copied()
    }

    /// Whether a new cut after `page` should be offered: both the page and
    /// its successor must survive. Existing cuts can always be toggled off.
    pub fn cut_available(&self, page: PageOrdinal) -> bool {
        check_cut_point(page, self.page_count).is_ok()
            && !self.deleted.contains(&page)
            && !self.deleted.contains(&(page + 1))
    }

    /// Add or remove the cut point after `page`
    pub fn toggle_cut(&self, page: PageOrdinal) -> Result<Self> {
        let mut next = self.clone();
        if next.cut_points.remove(&page) {
            log::debug!("Removed cut after page {}", page);
            return Ok(next);
        }

        check_cut_point(page, self.page_count)?;
        if self.cut_points.len() >= self.limits.max_cut_points {
            return Err(Error::LimitExceeded(format!(
                "at most {} split points are allowed",
                self.limits.max_cut_points
            )));
        }

        next.cut_points.insert(page);
        log::debug!("Added cut after page {}", page);
        Ok(next)
    }

    /// Mark `page` deleted, or restore it if already deleted
    ///
    /// Rotation and cut state of the page are kept either way.
    pub fn toggle_delete(&self, page: PageOrdinal) -> Result<Self> {
        check_page(page, self.page_count)?;

        let mut next = self.clone();
        if next.deleted.remove(&page) {
            log::debug!("Restored page {}", page);
            return Ok(next);
        }

        if self.deleted.len() + 1 >= self.page_count as usize {
            return Err(Error::LimitExceeded(
                "at least one page must remain".to_string(),
            ));
        }

        next.deleted.insert(page);
        log::debug!("Deleted page {}", page);
        Ok(next)
    }

    /// Rotate `page` a quarter turn clockwise
    pub fn rotate(&self, page: PageOrdinal) -> Result<Self> {
        self.rotate_by(page, 90)
    }

    /// Rotate `page` by a multiple of 90 degrees (negative is counter-clockwise)
    pub fn rotate_by(&self, page: PageOrdinal, degrees: i32) -> Result<Self> {
        check_page(page, self.page_count)?;
        if degrees % 90 != 0 {
            return Err(Error::InputRejected(format!(
                "rotation must be a multiple of 90 degrees, got {}",
                degrees
            )));
        }

        let mut next = self.clone();
        match Rotation::compose(self.rotation_of(page), degrees) {
            Some(rotation) => {
                next.rotations.insert(page, rotation);
            }
            None => {
                next.rotations.remove(&page);
            }
        }
        Ok(next)
    }

    /// Discard all edits, keeping the document
    pub fn reset(&self) -> Self {
        Self::with_limits(self.page_count, self.limits)
    }

    /// Output parts for the current edits
    pub fn plan(&self) -> Result<Vec<OutputPart>> {
        plan_partition(self.page_count, &self.cut_points, &self.deleted, &self.rotations)
    }
}

/// Ordered list of documents to merge
#[derive(Debug, Clone)]
pub struct MergeSession<S = SourceDocument> {
    sources: Vec<S>,
    limits: Limits,
}

impl<S: AsRef<SourceDocument> + Clone> Default for MergeSession<S> {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl<S: AsRef<SourceDocument> + Clone> MergeSession<S> {
    pub fn new(limits: Limits) -> Self {
        Self {
            sources: Vec::new(),
            limits,
        }
    }

    pub fn sources(&self) -> &[S] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whether there is enough to merge
    pub fn ready(&self) -> bool {
        self.sources.len() >= 2
    }

    /// Append sources in the given order; all or nothing
    pub fn add(&self, added: impl IntoIterator<Item = S>) -> Result<Self> {
        let mut next = self.clone();
        next.sources.extend(added);
        if next.sources.len() > self.limits.max_merge_sources {
            return Err(Error::LimitExceeded(format!(
                "at most {} files can be merged",
                self.limits.max_merge_sources
            )));
        }
        Ok(next)
    }

    /// Drop the source with the given id; unknown ids are ignored
    pub fn remove(&self, id: SourceId) -> Self {
        let mut next = self.clone();
        next.sources.retain(|s| s.as_ref().id != id);
        next
    }

    /// Move the source at `from` to position `to`
    pub fn move_source(&self, from: usize, to: usize) -> Result<Self> {
        let len = self.sources.len();
        if from >= len || to >= len {
            return Err(Error::InputRejected(format!(
                "position out of range (have {} files)",
                len
            )));
        }
        let mut next = self.clone();
        let source = next.sources.remove(from);
        next.sources.insert(to, source);
        Ok(next)
    }

    /// Reorder by a full permutation of current positions
    pub fn reorder(&self, order: &[usize]) -> Result<Self> {
        let len = self.sources.len();
        let mut seen = vec![false; len];
        if order.len() != len {
            return Err(Error::InputRejected(format!(
                "order must list all {} files exactly once",
                len
            )));
        }
        for &i in order {
            if i >= len || seen[i] {
                return Err(Error::InputRejected(format!(
                    "order must list all {} files exactly once",
                    len
                )));
            }
            seen[i] = true;
        }

        let mut next = self.clone();
        next.sources = order.iter().map(|&i| self.sources[i].clone()).collect();
        Ok(next)
    }

    /// Merged page sequence; indices refer to [`MergeSession::sources`]
    pub fn plan(&self) -> MergeOutputSequence {
        let documents: Vec<SourceDocument> =
            self.sources.iter().map(|s| s.as_ref().clone()).collect();
        plan_merge(&documents)
    }
}

impl AsRef<SourceDocument> for SourceDocument {
    fn as_ref(&self) -> &SourceDocument {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cut_adds_and_removes() {
        let session = SplitSession::new(5);
        let with_cut = session.toggle_cut(2).unwrap();
        assert!(with_cut.cut_points().contains(&2));
        let without = with_cut.toggle_cut(2).unwrap();
        assert!(without.cut_points().is_empty());
        // Original value untouched
        assert!(session.cut_points().is_empty());
    }

    #[test]
    fn test_cut_cap() {
        let mut session = SplitSession::new(10);
        for page in 1..=4 {
            session = session.toggle_cut(page).unwrap();
        }
        let result = session.toggle_cut(5);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
        assert_eq!(session.cut_points().len(), 4);
        // Removing still works at the cap
        assert!(session.toggle_cut(4).is_ok());
    }

    #[test]
    fn test_cut_after_last_page_rejected() {
        let session = SplitSession::new(3);
        assert!(matches!(session.toggle_cut(3), Err(Error::InvalidCutPoint { .. })));
    }

    #[test]
    fn test_deletion_floor() {
        let session = SplitSession::new(3)
            .toggle_delete(1)
            .unwrap()
            .toggle_delete(2)
            .unwrap();
        let result = session.toggle_delete(3);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
        assert_eq!(session.deleted().len(), 2);
        assert_eq!(session.surviving_count(), 1);
    }

    #[test]
    fn test_single_page_cannot_be_deleted() {
        let session = SplitSession::new(1);
        assert!(matches!(session.toggle_delete(1), Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_rotate_four_times_clears_entry() {
        let mut session = SplitSession::new(2);
        for _ in 0..4 {
            session = session.rotate(1).unwrap();
        }
        assert!(session.rotations().is_empty());
    }

    #[test]
    fn test_rotation_survives_delete_and_restore() {
        let session = SplitSession::new(3)
            .rotate(2)
            .unwrap()
            .rotate(2)
            .unwrap()
            .toggle_delete(2)
            .unwrap();
        assert_eq!(session.rotation_of(2), Some(Rotation::Half));

        let restored = session.toggle_delete(2).unwrap();
        assert_eq!(restored.rotation_of(2), Some(Rotation::Half));
        let parts = restored.plan().unwrap();
        assert_eq!(parts[0].pages[1].degrees(), 180);
    }

    #[test]
    fn test_rotating_deleted_page_applies_after_restore() {
        let deleted = SplitSession::new(3).toggle_delete(2).unwrap();
        let rotated = deleted.rotate(2).unwrap();
        assert_eq!(rotated.rotation_of(2), Some(Rotation::Quarter));
        assert_eq!(rotated.plan().unwrap()[0].ordinals(), vec![1, 3]);

        let restored = rotated.toggle_delete(2).unwrap();
        let parts = restored.plan().unwrap();
        assert_eq!(parts[0].ordinals(), vec![1, 2, 3]);
        assert_eq!(parts[0].pages[1].degrees(), 90);
        assert_eq!(parts[0].pages[0].degrees(), 0);
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let session = SplitSession::new(1).rotate_by(1, -90).unwrap();
        assert_eq!(session.rotation_of(1), Some(Rotation::ThreeQuarter));
        assert!(session.rotate_by(1, 45).is_err());
    }

    #[test]
    fn test_cut_on_deleted_page_kept_but_inert() {
        let session = SplitSession::new(5)
            .toggle_cut(3)
            .unwrap()
            .toggle_delete(3)
            .unwrap();
        assert!(session.cut_points().contains(&3));
        assert!(!session.cut_available(3));
        assert!(!session.cut_available(2));
        assert!(session.cut_available(1));

        let parts = session.plan().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].ordinals(), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_reset_keeps_page_count() {
        let session = SplitSession::new(4).toggle_cut(1).unwrap().rotate(2).unwrap();
        let reset = session.reset();
        assert_eq!(reset, SplitSession::new(4));
    }

    #[test]
    fn test_merge_session_limit() {
        let limits = Limits {
            max_merge_sources: 2,
            ..Limits::default()
        };
        let session = MergeSession::new(limits)
            .add([SourceDocument::new("a.pdf", 1), SourceDocument::new("b.pdf", 1)])
            .unwrap();
        let result = session.add([SourceDocument::new("c.pdf", 1)]);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_merge_session_reorder_and_remove() {
        let a = SourceDocument::new("a.pdf", 2);
        let b = SourceDocument::new("b.pdf", 1);
        let c = SourceDocument::new("c.pdf", 1);
        let session = MergeSession::default()
            .add([a.clone(), b.clone(), c.clone()])
            .unwrap();

        let moved = session.move_source(2, 0).unwrap();
        let names: Vec<&str> = moved.sources().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c.pdf", "a.pdf", "b.pdf"]);

        let reordered = session.reorder(&[1, 0, 2]).unwrap();
        assert_eq!(reordered.sources()[0].id, b.id);
        assert!(session.reorder(&[0, 0, 1]).is_err());
        assert!(session.reorder(&[0, 1]).is_err());

        let removed = session.remove(a.id);
        assert_eq!(removed.len(), 2);
        assert!(removed.ready());
        let plan = removed.plan();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].source, 0);
    }
}
