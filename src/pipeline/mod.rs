//! Image loading pipeline.
//!
//! - `build_candidates`: recipe request to ordered candidate list
//! - `FallbackLoader`: retry/fallback state machine over that list
//! - `drive`: async execution with timeouts, retry delays and prefetch
//! - `ImageSlot`: per-entity owner that resets on identity change

pub mod candidates;
pub mod driver;
pub mod fallback;
pub mod slot;

pub use candidates::build_candidates;
pub use driver::drive;
pub use fallback::{
    FailureCause, FailureEntry, FallbackLoader, LoadReport, LoadState, LoadTicket, Transition,
};
pub use slot::ImageSlot;
