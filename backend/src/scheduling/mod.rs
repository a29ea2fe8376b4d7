//! Slot scheduling engine
//!
//! This module is the pure core of the platform: it turns recurring
//! availability rules into concrete lesson slots, refuses rules that collide
//! with already-published slots, and builds the calendar views teachers and
//! students browse.
//!
//! Everything here is synchronous and I/O free. Callers fetch a snapshot of
//! stored slots, run the engine, and persist whatever it returns.

pub mod availability;
pub mod error;
pub mod expand;
pub mod overlap;

pub use availability::{filter_open, filter_unbooked, group_by_date, group_by_week};
pub use error::{SchedulingError, SchedulingResult};
pub use expand::{expand, expand_with_policy};
pub use overlap::{find_conflict, has_overlap, OverlapPolicy};
