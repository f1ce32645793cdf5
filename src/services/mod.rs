//! Background engines that own desk state.
//!
//! ARCHITECTURE
//! ============
//! Each engine owns a disjoint desk collection and runs as one tokio task
//! wrapped in a [`task::TaskGuard`]. Route handlers only read snapshots and
//! subscribe to revision counters; they never mutate desks directly.

pub mod desk_api;
pub mod live_status;
pub mod simulator;
pub mod task;
