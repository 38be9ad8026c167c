//! Skill-challenge mini-games: kind selection and the outcome contract.
//!
//! The triage core only ever sees a boolean. Which challenge runs, and how
//! it resolves, sits behind [`OutcomeProvider`]; the bundled
//! [`SimulatedMinigames`] resolves challenges headlessly inside each
//! kind's time box, which is what the simtest harness and the engine tests
//! use. A windowed frontend substitutes its own provider.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// The eight console challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinigameKind {
    /// Hit a target that appears at a random position before it fades.
    TargetClick,
    /// Stop a sweeping marker inside the highlighted zone.
    TimingBar,
    /// Steer a tray under a falling object.
    CatchObject,
    /// Win or draw a 3x3 board against a random-mover.
    TicTacToe,
    /// Recall a briefly shown digit sequence.
    NumberMemory,
    /// Solve a one-line arithmetic prompt.
    QuickMath,
    /// Retype the displayed word exactly.
    TypingChallenge,
    /// Pick the color a word names, not the color it is drawn in.
    ColorMatch,
}

impl MinigameKind {
    /// All challenge kinds, in selection order.
    pub const ALL: [MinigameKind; 8] = [
        MinigameKind::TargetClick,
        MinigameKind::TimingBar,
        MinigameKind::CatchObject,
        MinigameKind::TicTacToe,
        MinigameKind::NumberMemory,
        MinigameKind::QuickMath,
        MinigameKind::TypingChallenge,
        MinigameKind::ColorMatch,
    ];

    /// Hard time box in seconds. A provider must resolve (or give up)
    /// within this budget.
    pub fn time_limit_secs(self) -> f32 {
        match self {
            MinigameKind::TargetClick => 3.0,
            MinigameKind::TimingBar => 10.0,
            MinigameKind::CatchObject => 5.0,
            MinigameKind::TicTacToe => 15.0,
            MinigameKind::NumberMemory => 4.0,
            MinigameKind::QuickMath => 4.0,
            MinigameKind::TypingChallenge => 4.0,
            MinigameKind::ColorMatch => 4.0,
        }
    }
}

/// Success odds the headless resolver uses per challenge.
fn simulated_odds(kind: MinigameKind) -> f64 {
    match kind {
        MinigameKind::TargetClick => 0.65,
        MinigameKind::TimingBar => 0.6,
        MinigameKind::CatchObject => 0.7,
        MinigameKind::TicTacToe => 0.8,
        MinigameKind::NumberMemory => 0.7,
        MinigameKind::QuickMath => 0.8,
        MinigameKind::TypingChallenge => 0.75,
        MinigameKind::ColorMatch => 0.7,
    }
}

/// Uniform choice over the challenge kinds, never repeating the previous
/// pick back-to-back.
#[derive(Debug, Default)]
pub struct MinigamePicker {
    last: Option<MinigameKind>,
}

impl MinigamePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick(&mut self, rng: &mut impl Rng) -> MinigameKind {
        let choices: Vec<MinigameKind> = MinigameKind::ALL
            .iter()
            .copied()
            .filter(|kind| Some(*kind) != self.last)
            .collect();
        let kind = choices[rng.gen_range(0..choices.len())];
        self.last = Some(kind);
        kind
    }
}

/// Resolves one modal skill challenge to pass/fail.
///
/// The call is synchronous and owns the frame budget while it runs;
/// implementations keep their own internal timing and must stay within
/// the kind's time box.
pub trait OutcomeProvider {
    fn attempt(&mut self, kind: MinigameKind) -> bool;
}

/// Headless challenge resolver.
///
/// Steps an internal 60 Hz frame loop up to the kind's time box, polling
/// the cancel flag on every frame the way a windowed challenge polls for
/// quit. The decisive input lands on a random frame; whether it succeeds
/// follows the per-kind odds. Cancellation counts as failure.
pub struct SimulatedMinigames {
    rng: StdRng,
    cancel: Arc<AtomicBool>,
    /// Seconds the last attempt consumed, for drivers that display it.
    pub last_attempt_secs: f32,
}

impl SimulatedMinigames {
    pub fn new() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cancel: Arc::new(AtomicBool::new(false)),
            last_attempt_secs: 0.0,
        }
    }

    /// Handle a driver can set to abort a challenge in flight.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }
}

impl Default for SimulatedMinigames {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeProvider for SimulatedMinigames {
    fn attempt(&mut self, kind: MinigameKind) -> bool {
        let frames = (kind.time_limit_secs() * 60.0) as u32;
        let resolve_frame = self.rng.gen_range(0..frames.max(1));
        let success = self.rng.gen_bool(simulated_odds(kind));

        for frame in 0..frames {
            if self.cancel.load(Ordering::Relaxed) {
                self.last_attempt_secs = frame as f32 / 60.0;
                return false;
            }
            if frame >= resolve_frame {
                self.last_attempt_secs = frame as f32 / 60.0;
                return success;
            }
        }

        // Time box elapsed without a decisive input.
        self.last_attempt_secs = kind.time_limit_secs();
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_never_repeats_last() {
        let mut rng = rand::thread_rng();
        let mut picker = MinigamePicker::new();

        let mut previous = picker.pick(&mut rng);
        for _ in 0..500 {
            let kind = picker.pick(&mut rng);
            assert_ne!(kind, previous);
            previous = kind;
        }
    }

    #[test]
    fn test_picker_covers_all_kinds() {
        let mut rng = rand::thread_rng();
        let mut picker = MinigamePicker::new();

        let picked: std::collections::HashSet<MinigameKind> =
            (0..200).map(|_| picker.pick(&mut rng)).collect();
        assert_eq!(picked.len(), MinigameKind::ALL.len());
    }

    #[test]
    fn test_simulated_attempt_stays_in_time_box() {
        let mut provider = SimulatedMinigames::seeded(7);
        for kind in MinigameKind::ALL {
            let _ = provider.attempt(kind);
            assert!(provider.last_attempt_secs <= kind.time_limit_secs());
        }
    }

    #[test]
    fn test_cancel_fails_the_attempt() {
        let mut provider = SimulatedMinigames::seeded(7);
        provider.cancel_handle().store(true, Ordering::Relaxed);

        for kind in MinigameKind::ALL {
            assert!(!provider.attempt(kind));
            assert_eq!(provider.last_attempt_secs, 0.0);
        }
    }

    #[test]
    fn test_simulated_outcomes_mixed() {
        // Over many attempts the resolver should produce both results.
        let mut provider = SimulatedMinigames::seeded(42);
        let results: Vec<bool> = (0..200)
            .map(|_| provider.attempt(MinigameKind::QuickMath))
            .collect();
        assert!(results.iter().any(|r| *r));
        assert!(results.iter().any(|r| !*r));
    }
}
