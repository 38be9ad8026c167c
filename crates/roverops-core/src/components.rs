//! Event components for the triage world.
//!
//! Components are pure data attached to event entities.
//! They have no behavior - that lives in the triage systems and the engine.

use roverops_logic::balance;
use serde::{Deserialize, Serialize};

/// Vague relevance hint shown to the player. Display only - it carries no
/// mechanical weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Power,
    Navigation,
    Comms,
    Thermal,
    Sensors,
    SampleOps,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Power,
        Category::Navigation,
        Category::Comms,
        Category::Thermal,
        Category::Sensors,
        Category::SampleOps,
    ];

    /// Label used by the console panels and the flavor log stream.
    pub fn label(self) -> &'static str {
        match self {
            Category::Power => "Power",
            Category::Navigation => "Navigation",
            Category::Comms => "Communication",
            Category::Thermal => "Thermal",
            Category::Sensors => "Sensors",
            Category::SampleOps => "Sample Ops",
        }
    }
}

/// Identity of a triaged event. The id is unique for the lifetime of a
/// session and never reused; the name is cosmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: u32,
    pub name: String,
    pub category: Category,
}

/// Urgency rank in [0,5], adjustable only while the event sits in the
/// queued lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority(pub u8);

impl Priority {
    /// Shift by `delta`, clamped to the valid range.
    pub fn adjust(&mut self, delta: i8) {
        self.0 = balance::adjust_priority(self.0, delta);
    }
}

/// Processing time for an event. `remaining` counts down only while the
/// event is active; `total` is fixed at creation and anchors the
/// completion fraction on early termination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Workload {
    pub remaining: f32,
    pub total: f32,
}

impl Workload {
    pub fn new(total: f32) -> Self {
        Self {
            remaining: total,
            total,
        }
    }

    /// Fraction of the work already done, in [0,1].
    pub fn fraction_completed(&self) -> f32 {
        if self.total <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.total).clamp(0.0, 1.0)
    }
}

/// What an event is worth: health lost if it expires unhandled, score
/// gained if it runs to completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stakes {
    pub impact: i32,
    pub benefit: i32,
}

/// Lane marker: waiting for a triage decision. `expire_in` counts down
/// every tick; the event is discarded the moment it crosses zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Incoming {
    pub expire_in: f32,
    /// Lane sequence number, used only to keep display order stable.
    pub arrived: u64,
}

/// Lane marker: being processed. The workload countdown runs while this
/// marker is present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Active {
    pub entered: u64,
}

/// Lane marker: parked for later execution. No timers run here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Queued {
    pub entered: u64,
}

/// The three mutually exclusive lanes an event can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Incoming,
    Active,
    Queued,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_adjust_clamps() {
        let mut priority = Priority(5);
        priority.adjust(1);
        assert_eq!(priority.0, 5);

        let mut priority = Priority(0);
        priority.adjust(-1);
        assert_eq!(priority.0, 0);

        let mut priority = Priority(2);
        priority.adjust(1);
        assert_eq!(priority.0, 3);
    }

    #[test]
    fn test_workload_fraction() {
        let workload = Workload::new(10.0);
        assert!((workload.fraction_completed() - 0.0).abs() < f32::EPSILON);

        let workload = Workload {
            remaining: 2.0,
            total: 10.0,
        };
        assert!((workload.fraction_completed() - 0.8).abs() < 0.001);

        let workload = Workload {
            remaining: 0.0,
            total: 0.0,
        };
        assert!((workload.fraction_completed() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::ALL.len(), 6);
        for category in Category::ALL {
            assert!(!category.label().is_empty());
        }
        assert_eq!(Category::SampleOps.label(), "Sample Ops");
    }
}
