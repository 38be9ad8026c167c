//! Random event generation - the stream of work the player triages.

use rand::Rng;
use roverops_logic::constants::{generator, priority};

use crate::components::Category;

// Fixed task name pool. Cosmetic only - names carry no behavior.
static EVENT_NAMES: &[&str] = &[
    "Analyze Soil",
    "Radiation Spike",
    "Camera Malfunction",
    "Solar Panel Clean",
    "Antenna Recalibration",
    "Path Obstruction",
    "Thermal Regulation Check",
    "Battery Drain Alert",
    "Sample Preservation",
    "Gyroscope Drift",
];

/// A fully rolled event, ready to enter the incoming lane.
#[derive(Debug, Clone)]
pub struct EventSpec {
    pub id: u32,
    pub name: &'static str,
    pub category: Category,
    pub priority: u8,
    /// Seconds of processing once active.
    pub duration_secs: f32,
    /// Seconds until the event expires out of the incoming lane.
    pub expire_secs: f32,
    /// Health lost if the event is missed.
    pub impact: i32,
    /// Score gained if the event completes.
    pub benefit: i32,
}

/// Rolls random events with unique, monotonically increasing ids.
#[derive(Debug)]
pub struct EventGenerator {
    next_id: u32,
}

impl EventGenerator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Roll one event. Ids are never reused; the only other side effect is
    /// entropy consumption.
    pub fn generate(&mut self, rng: &mut impl Rng) -> EventSpec {
        let id = self.next_id;
        self.next_id += 1;

        EventSpec {
            id,
            name: EVENT_NAMES[rng.gen_range(0..EVENT_NAMES.len())],
            category: Category::ALL[rng.gen_range(0..Category::ALL.len())],
            priority: rng.gen_range(priority::MIN..=priority::MAX),
            duration_secs: rng.gen_range(generator::DURATION_SECS.0..generator::DURATION_SECS.1),
            expire_secs: rng.gen_range(generator::EXPIRE_SECS.0..generator::EXPIRE_SECS.1),
            impact: rng.gen_range(generator::IMPACT.0..=generator::IMPACT.1),
            benefit: rng.gen_range(generator::BENEFIT.0..=generator::BENEFIT.1),
        }
    }
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut rng = rand::thread_rng();
        let mut generator = EventGenerator::new();

        let ids: Vec<u32> = (0..50).map(|_| generator.generate(&mut rng).id).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(ids[0], 1);
    }

    #[test]
    fn test_fields_within_bounds() {
        let mut rng = rand::thread_rng();
        let mut generator = EventGenerator::new();

        for _ in 0..500 {
            let spec = generator.generate(&mut rng);
            assert!(spec.priority <= 5);
            assert!((5.0..15.0).contains(&spec.duration_secs));
            assert!((8.0..20.0).contains(&spec.expire_secs));
            assert!((5..=15).contains(&spec.impact));
            assert!((10..=25).contains(&spec.benefit));
            assert!(EVENT_NAMES.contains(&spec.name));
        }
    }

    #[test]
    fn test_generation_variety() {
        let mut rng = rand::thread_rng();
        let mut generator = EventGenerator::new();

        let specs: Vec<EventSpec> = (0..200).map(|_| generator.generate(&mut rng)).collect();

        // Check we draw from the whole pools (not stuck on one entry)
        let unique_names: std::collections::HashSet<_> = specs.iter().map(|s| s.name).collect();
        let unique_categories: std::collections::HashSet<_> =
            specs.iter().map(|s| s.category).collect();

        assert!(unique_names.len() > 5);
        assert!(unique_categories.len() > 3);
    }
}
