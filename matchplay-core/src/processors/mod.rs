//! Background processors.
//!
//! - `TimeoutSweeper`: resolves overdue matches and drains the queue

pub mod timeout_sweeper;

pub use timeout_sweeper::{SweepReport, SweepTick, TimeoutSweeper};
