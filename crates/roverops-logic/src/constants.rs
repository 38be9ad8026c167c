//! Game tuning constants - mission timing, lane capacity, generator
//! ranges, and penalty values.
//!
//! Plain numeric constants with no engine dependency. Both the simulation
//! engine and the headless simtest use these.

pub mod timing {
    /// Simulation steps per second.
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Length of one tick in seconds.
    pub const TICK_SECONDS: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Total mission length in seconds.
    pub const MISSION_SECONDS: u32 = 300;
    /// A new event arrives every this many ticks (3 s at 60 Hz).
    pub const SPAWN_INTERVAL_TICKS: u64 = 180;
    /// Flavor console lines appear every this many ticks (~2 Hz).
    pub const LOG_INTERVAL_TICKS: u64 = 30;
}

pub mod session {
    /// Health at mission start.
    pub const STARTING_HEALTH: i32 = 100;
    /// Healing never raises health above this.
    pub const HEALTH_CAP: i32 = 100;
    /// Maximum concurrent events in the active lane.
    pub const MAX_ACTIVE_EVENTS: usize = 5;
    /// Below this health the healing mini-game reschedules sooner.
    pub const LOW_HEALTH_THRESHOLD: i32 = 30;
    /// Most recent console lines kept for display.
    pub const LOG_HISTORY: usize = 30;
}

pub mod priority {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;
}

pub mod generator {
    /// Active workload duration in seconds (uniform real, half-open).
    pub const DURATION_SECS: (f32, f32) = (5.0, 15.0);
    /// Time until an incoming event expires, in seconds (uniform real).
    pub const EXPIRE_SECS: (f32, f32) = (8.0, 20.0);
    /// Health penalty for a missed event (uniform integer, inclusive).
    pub const IMPACT: (i32, i32) = (5, 15);
    /// Score reward for a completed event (uniform integer, inclusive).
    pub const BENEFIT: (i32, i32) = (10, 25);
}

pub mod penalties {
    /// Flat health cost of rejecting an incoming event, regardless of its
    /// impact value.
    pub const REJECT: i32 = 5;
    /// Chance that honoring an event interrupts the console with a
    /// mini-game.
    pub const HONOR_MINIGAME_CHANCE: f64 = 0.3;
    /// Score awarded when the honor mini-game succeeds.
    pub const HONOR_MINIGAME_SCORE: i32 = 10;
    /// Health lost when the honor mini-game fails.
    pub const HONOR_MINIGAME_PENALTY: i32 = 10;
    /// Health restored by a successful healing mini-game.
    pub const HEAL_AMOUNT: i32 = 15;
}
