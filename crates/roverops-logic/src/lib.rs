//! Pure game logic for RoverOps.
//!
//! This crate contains the triage game's tuning numbers and balance
//! formulas, independent of any engine, ECS, or randomness source.
//! Functions take plain data and return results, making them unit-testable
//! and portable between the simulation engine and the headless simtest.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`balance`] | Termination damage, priority clamping, healing schedule |
//! | [`constants`] | Mission timing, lane capacities, generator ranges |
//! | [`mission`] | Mission configuration consumed by the engine |

pub mod balance;
pub mod constants;
pub mod mission;
