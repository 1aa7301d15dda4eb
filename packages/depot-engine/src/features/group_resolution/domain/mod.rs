//! Group resolution domain types

mod existence_memo;
mod update_outcome;

pub use existence_memo::{ExistenceMemo, MemoState};
pub use update_outcome::UpdateOutcome;
