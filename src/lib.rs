// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod clock;
pub mod config;
pub mod counterbalance;
pub mod page;
pub mod passages;
pub mod permutation;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod ui;

pub use counterbalance::{
    date_select_for, resolve_arrangement, resolve_step, steps_for_technique, AssignError,
};
pub use speed_test::{Callbacks, ScorerError, SpeedTest};

/// Host loop tick; the refresh timer advances by this much per tick
pub const TICK_RATE_MS: u64 = 100;
