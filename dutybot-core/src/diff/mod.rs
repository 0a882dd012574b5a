//! Semantic difference between two calendar snapshots.

mod calendar_diff;
mod change;

pub use calendar_diff::diff_indexes;
pub use change::{ChangeEntry, ChangeKind};
