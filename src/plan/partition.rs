//! Partition planning: split and trim one document into output parts

use crate::error::{Error, Result};
use crate::plan::validate::{
    check_cut_point, effective_degrees, surviving_sequence, CutPointSet, DeletedPageSet,
    PageOrdinal, Rotation, RotationMap,
};

/// A page placed in an output part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedPage {
    /// Ordinal in the original document
    pub page: PageOrdinal,
    /// Rotation to apply, `None` for unrotated
    pub rotation: Option<Rotation>,
}

impl PlannedPage {
    pub fn degrees(&self) -> u16 {
        effective_degrees(self.rotation)
    }
}

/// One output document of a split or trim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPart {
    /// 1-based, contiguous across the returned parts
    pub index: usize,
    /// Never empty; ordinals strictly increasing
    pub pages: Vec<PlannedPage>,
}

impl OutputPart {
    /// Original ordinals of the part's pages
    pub fn ordinals(&self) -> Vec<PageOrdinal> {
        self.pages.iter().map(|p| p.page).collect()
    }
}

/// Plan the output parts of a split/trim
///
/// Walks the surviving pages in order and closes a part after each page
/// that carries a cut point. A cut point on a deleted page never produces a
/// boundary, and parts left empty by deletions are dropped.
///
/// # Example
///
/// ```
/// use pdf_pagekit::plan::{plan_partition, CutPointSet, DeletedPageSet, RotationMap};
///
/// let cuts: CutPointSet = [2, 3].into_iter().collect();
/// let deleted: DeletedPageSet = [3].into_iter().collect();
/// let parts = plan_partition(5, &cuts, &deleted, &RotationMap::new()).unwrap();
///
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[0].ordinals(), vec![1, 2]);
/// assert_eq!(parts[1].ordinals(), vec![4, 5]);
/// ```
pub fn plan_partition(
    page_count: u32,
    cut_points: &CutPointSet,
    deleted_pages: &DeletedPageSet,
    rotations: &RotationMap,
) -> Result<Vec<OutputPart>> {
    for &cut in cut_points {
        check_cut_point(cut, page_count)?;
    }

    let surviving = surviving_sequence(page_count, deleted_pages);
    if surviving.is_empty() {
        return Err(Error::AllPagesDeleted);
    }

    let mut runs: Vec<Vec<PlannedPage>> = Vec::new();
    let mut current: Vec<PlannedPage> = Vec::new();

    for page in surviving {
        current.push(PlannedPage {
            page,
            rotation: rotations.get(&page).copied(),
        });
        if cut_points.contains(&page) {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    // Runs are closed only right after a push, so none can be empty
    let parts: Vec<OutputPart> = runs
        .into_iter()
        .enumerate()
        .map(|(i, pages)| OutputPart { index: i + 1, pages })
        .collect();

    log::debug!(
        "Planned {} part(s) from {} pages ({} cut points, {} deleted)",
        parts.len(),
        page_count,
        cut_points.len(),
        deleted_pages.len()
    );

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pages: &[u32]) -> CutPointSet {
        pages.iter().copied().collect()
    }

    fn ordinals(parts: &[OutputPart]) -> Vec<Vec<u32>> {
        parts.iter().map(|p| p.ordinals()).collect()
    }

    #[test]
    fn test_no_cuts_single_part() {
        let parts = plan_partition(4, &set(&[]), &set(&[2]), &RotationMap::new()).unwrap();
        assert_eq!(ordinals(&parts), vec![vec![1, 3, 4]]);
        assert_eq!(parts[0].index, 1);
    }

    #[test]
    fn test_cuts_without_deletions() {
        let parts = plan_partition(5, &set(&[2, 3]), &set(&[]), &RotationMap::new()).unwrap();
        assert_eq!(ordinals(&parts), vec![vec![1, 2], vec![3], vec![4, 5]]);
        assert_eq!(parts.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_cut_on_deleted_page_is_inert() {
        let parts = plan_partition(5, &set(&[2, 3]), &set(&[3]), &RotationMap::new()).unwrap();
        assert_eq!(ordinals(&parts), vec![vec![1, 2], vec![4, 5]]);
        assert_eq!(parts[1].index, 2);
    }

    #[test]
    fn test_part_emptied_by_deletions_is_dropped() {
        // Cut after 2 and after 4, pages 3 and 4 deleted: the middle part vanishes
        let parts = plan_partition(6, &set(&[2, 4]), &set(&[3, 4]), &RotationMap::new()).unwrap();
        assert_eq!(ordinals(&parts), vec![vec![1, 2], vec![5, 6]]);
        assert_eq!(parts[1].index, 2);
    }

    #[test]
    fn test_trailing_deletions_leave_no_empty_part() {
        let parts = plan_partition(4, &set(&[2]), &set(&[3, 4]), &RotationMap::new()).unwrap();
        assert_eq!(ordinals(&parts), vec![vec![1, 2]]);
    }

    #[test]
    fn test_rotations_attached() {
        let mut rotations = RotationMap::new();
        rotations.insert(2, Rotation::Quarter);
        rotations.insert(3, Rotation::Half);
        let parts = plan_partition(3, &set(&[1]), &set(&[]), &rotations).unwrap();
        assert_eq!(parts[0].pages[0].rotation, None);
        assert_eq!(parts[1].pages[0].degrees(), 90);
        assert_eq!(parts[1].pages[1].degrees(), 180);
    }

    #[test]
    fn test_invalid_cut_point() {
        let result = plan_partition(3, &set(&[3]), &set(&[]), &RotationMap::new());
        assert!(matches!(result, Err(Error::InvalidCutPoint { page: 3, page_count: 3 })));

        let result = plan_partition(3, &set(&[0]), &set(&[]), &RotationMap::new());
        assert!(matches!(result, Err(Error::InvalidCutPoint { .. })));
    }

    #[test]
    fn test_all_pages_deleted() {
        let result = plan_partition(2, &set(&[]), &set(&[1, 2]), &RotationMap::new());
        assert!(matches!(result, Err(Error::AllPagesDeleted)));
    }
}
