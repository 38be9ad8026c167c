//! Mission configuration - pure data consumed by the simulation engine.

use serde::{Deserialize, Serialize};

use crate::constants::{session, timing};

/// Mission parameters. Defaults match the standard five-minute run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Mission length in seconds.
    pub mission_secs: u32,
    /// Maximum concurrent events in the active lane.
    pub max_active: usize,
    /// Ticks between event arrivals.
    pub spawn_interval_ticks: u64,
    /// RNG seed; `None` seeds from the OS for a fresh mission.
    pub seed: Option<u64>,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            mission_secs: timing::MISSION_SECONDS,
            max_active: session::MAX_ACTIVE_EVENTS,
            spawn_interval_ticks: timing::SPAWN_INTERVAL_TICKS,
            seed: None,
        }
    }
}
