//! Runtime services shared by both components.

mod time;

pub use time::{Clock, EpochMillis, ManualClock, SystemClock};
