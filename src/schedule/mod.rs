//! Annealing schedules.
//!
//! An [`AnnealSchedule`] yields one inverse temperature per annealing step;
//! an [`SqaSchedule`] yields one (beta, gamma) pair per step.

mod anneal;
mod sqa;

pub use anneal::{AnnealSchedule, ScheduleKind};
pub use sqa::SqaSchedule;
