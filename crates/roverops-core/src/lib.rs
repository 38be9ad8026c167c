//! RoverOps Core - Rover Console Triage Engine
//!
//! A fixed-timestep (60 Hz) arcade core: randomly generated console events
//! stream into an incoming lane, and the player honors, rejects, queues,
//! executes, or terminates them, balancing a health meter and a score
//! against a mission countdown. Timed skill mini-games interrupt the loop
//! when honoring an event and on a periodic healing trigger.
//!
//! # Architecture
//!
//! Events are `hecs` entities. Lane membership (incoming / active /
//! queued) is a marker component carrying that lane's timer, so the three
//! lanes stay disjoint by construction:
//! - **Components**: Pure data attached to event entities (EventInfo,
//!   Priority, Workload, Stakes, lane markers)
//! - **Systems**: Free functions over the world (`triage`)
//! - **Engine**: [`engine::SessionEngine`] drives the tick loop and owns
//!   health, score, selection, and the mini-game seam
//!
//! # Example
//!
//! ```rust,no_run
//! use roverops_core::prelude::*;
//!
//! let mut engine = SessionEngine::new(MissionConfig::default());
//!
//! loop {
//!     // a frontend would poll input here and feed engine.apply(...)
//!     if let Some(outcome) = engine.tick() {
//!         println!("mission over: {:?}", outcome);
//!         break;
//!     }
//! }
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod logs;
pub mod minigame;
pub mod snapshot;
pub mod triage;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::{Category, Lane};
    pub use crate::engine::{Command, MissionConfig, MissionOutcome, MissionResult, SessionEngine};
    pub use crate::snapshot::MissionSnapshot;
}
