//! Pure balance formulas: termination damage, priority clamping, and the
//! healing reschedule windows.
//!
//! The game runs three distinct penalty schedules - a flat cost for
//! rejecting, the event's own impact for letting it expire, and a blended
//! formula for terminating mid-run. They are separate balance decisions,
//! not a single rule, and each lives here as its own function.

use crate::constants::{penalties, priority, session};

/// Health damage for terminating an active event before it finishes.
///
/// With `f = 1 - remaining/total` (the fraction already completed), the
/// damage is `round(10*(1 - f) + 3*f)`: interrupting a nearly finished
/// task costs less than interrupting a fresh one.
pub fn termination_damage(remaining_secs: f32, total_secs: f32) -> i32 {
    if total_secs <= 0.0 {
        return 0;
    }
    let fraction = (1.0 - remaining_secs / total_secs).clamp(0.0, 1.0);
    (10.0 * (1.0 - fraction) + 3.0 * fraction).round() as i32
}

/// Apply a priority delta, clamped to the allowed range.
pub fn adjust_priority(current: u8, delta: i8) -> u8 {
    let shifted = i16::from(current) + i16::from(delta);
    shifted.clamp(i16::from(priority::MIN), i16::from(priority::MAX)) as u8
}

/// Inclusive bounds in seconds for scheduling the next healing mini-game.
///
/// The window tightens when health is low - the console offers repair
/// attempts more often when the rover is close to failing.
pub fn heal_window(health: i32) -> (u32, u32) {
    if health < session::LOW_HEALTH_THRESHOLD {
        (10, 20)
    } else {
        (20, 40)
    }
}

/// Health after a successful healing mini-game, capped.
pub fn healed(health: i32) -> i32 {
    (health + penalties::HEAL_AMOUNT).min(session::HEALTH_CAP)
}
