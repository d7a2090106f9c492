//! Shared page-ordinal types and invariant checks used by both planners
//! and the session values

use std::collections::{BTreeMap, BTreeSet};
use crate::error::{Error, Result};

/// 1-based position of a page in its original source document
pub type PageOrdinal = u32;

/// Cut points: "start a new output part after this page"
pub type CutPointSet = BTreeSet<PageOrdinal>;

/// Pages excluded from output
pub type DeletedPageSet = BTreeSet<PageOrdinal>;

/// Per-page rotation; a page with no entry is not rotated
pub type RotationMap = BTreeMap<PageOrdinal, Rotation>;

/// Clockwise page rotation. Zero is never stored; it is the absence of a
/// `Rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Rotation in degrees (90, 180 or 270)
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// Normalize any multiple of 90 degrees. Returns `None` for a full turn
    /// and for angles that are not multiples of 90.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            90 => Some(Rotation::Quarter),
            180 => Some(Rotation::Half),
            270 => Some(Rotation::ThreeQuarter),
            _ => None,
        }
    }

    /// Compose an optional rotation with a further turn of `delta` degrees
    pub fn compose(current: Option<Rotation>, delta: i32) -> Option<Rotation> {
        let base = current.map_or(0, |r| i32::from(r.degrees()));
        Rotation::from_degrees(base + delta)
    }
}

/// Degrees for an optional rotation, 0 when absent
pub fn effective_degrees(rotation: Option<Rotation>) -> u16 {
    rotation.map_or(0, Rotation::degrees)
}

/// Ensure `page` names a page of a `page_count`-page document
pub fn check_page(page: PageOrdinal, page_count: u32) -> Result<()> {
    if page == 0 || page > page_count {
        return Err(Error::PageOutOfRange { page, page_count });
    }
    Ok(())
}

/// Ensure `page` is a legal cut point: a cut after the last page means nothing
pub fn check_cut_point(page: PageOrdinal, page_count: u32) -> Result<()> {
    if page == 0 || page >= page_count {
        return Err(Error::InvalidCutPoint { page, page_count });
    }
    Ok(())
}

/// Ordinals `1..=page_count` minus `deleted`, in original order
pub fn surviving_sequence(page_count: u32, deleted: &DeletedPageSet) -> Vec<PageOrdinal> {
    (1..=page_count).filter(|p| !deleted.contains(p)).collect()
}
