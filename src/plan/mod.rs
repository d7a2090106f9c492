//! Page selection and reassembly planning
//!
//! Pure functions and values: no I/O and no hidden state. The shell feeds
//! page counts in and hands the planned sequences to the assembler.

pub mod validate;
pub mod source;
pub mod merge;
pub mod partition;
pub mod session;

// Re-export commonly used items
pub use validate::{CutPointSet, DeletedPageSet, PageOrdinal, Rotation, RotationMap};
pub use source::{SourceDocument, SourceId};
pub use merge::{plan_merge, MergeEntry, MergeOutputSequence};
pub use partition::{plan_partition, OutputPart, PlannedPage};
pub use session::{MergeSession, SplitSession};
