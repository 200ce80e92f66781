use std::time::Instant;

use serde::{Deserialize, Serialize};

fn yes() -> bool {
    true
}

/// Options accepted when attaching a speed test to a page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScorerOptions {
    /// suppress paste events on the input
    #[serde(default = "yes")]
    pub disable_paste: bool,
    /// refresh the speed display once a second while typing
    #[serde(default = "yes")]
    pub auto_update: bool,
}

impl Default for ScorerOptions {
    fn default() -> Self {
        Self {
            disable_paste: true,
            auto_update: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InProgress,
    Completed,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub started_at: Instant,
    pub key_count: usize,
    pub error_count: usize,
    /// chars of the longest correct prefix seen at the last evaluation
    pub correct_count: usize,
    pub has_error: bool,
    pub is_started: bool,
    pub is_completed: bool,
}

impl SessionState {
    pub fn new(now: Instant) -> Self {
        Self {
            started_at: now,
            key_count: 0,
            error_count: 0,
            correct_count: 0,
            has_error: false,
            is_started: false,
            is_completed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.is_started, self.is_completed) {
            (_, true) => Phase::Completed,
            (true, false) => Phase::InProgress,
            (false, false) => Phase::Idle,
        }
    }
}
