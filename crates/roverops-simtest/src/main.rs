//! RoverOps Headless Mission Harness
//!
//! Validates the triage core end to end without a renderer: balance
//! formula sweeps, generator bounds, picker behavior, and full seeded
//! missions driven by a random triage policy with the invariants checked
//! every tick.
//!
//! Usage:
//!   cargo run -p roverops-simtest
//!   cargo run -p roverops-simtest -- --verbose
//!   cargo run -p roverops-simtest -- --json

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use roverops_core::generation::EventGenerator;
use roverops_core::minigame::{MinigameKind, MinigamePicker};
use roverops_core::prelude::*;
use roverops_logic::balance;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    println!("=== RoverOps Mission Harness ===\n");

    let mut results = Vec::new();

    // 1. Balance formula sweep
    results.extend(validate_balance(verbose));

    // 2. Generator bounds and id discipline
    results.extend(validate_generator(verbose));

    // 3. Mini-game picker behavior
    results.extend(validate_picker(verbose));

    // 4. Full seeded missions under a random policy
    let mut reports = Vec::new();
    for seed in [101u64, 202, 303] {
        let (mission_results, report) = run_mission(seed, verbose);
        results.extend(mission_results);
        reports.push(report);
    }

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(serialized) => println!("{}", serialized),
            Err(e) => eprintln!("report serialization failed: {}", e),
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Balance formulas ─────────────────────────────────────────────────

fn validate_balance(_verbose: bool) -> Vec<TestResult> {
    println!("--- Balance Formulas ---");
    let mut results = Vec::new();

    // Termination damage stays inside its band and hits the known point
    let mut in_band = true;
    for tenths in 0..=100 {
        let damage = balance::termination_damage(tenths as f32 / 10.0, 10.0);
        if !(3..=10).contains(&damage) {
            in_band = false;
        }
    }
    results.push(TestResult {
        name: "termination_damage_band".into(),
        passed: in_band,
        detail: "damage within [3, 10] across the full run".into(),
    });
    results.push(TestResult {
        name: "termination_damage_partial".into(),
        passed: balance::termination_damage(2.0, 10.0) == 4,
        detail: format!(
            "remaining=2 total=10 -> {}",
            balance::termination_damage(2.0, 10.0)
        ),
    });

    // Priority clamp under a hostile delta sequence
    let mut priority = 3u8;
    let mut clamped = true;
    for delta in [1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1, 1, 1] {
        priority = balance::adjust_priority(priority, delta);
        if priority > 5 {
            clamped = false;
        }
    }
    results.push(TestResult {
        name: "priority_clamped".into(),
        passed: clamped,
        detail: format!("final priority {}", priority),
    });

    // Healing windows tighten below the low-health threshold
    let tightens = balance::heal_window(29) == (10, 20) && balance::heal_window(30) == (20, 40);
    results.push(TestResult {
        name: "heal_window_tightens".into(),
        passed: tightens,
        detail: "29 HP -> [10,20], 30 HP -> [20,40]".into(),
    });

    results.push(TestResult {
        name: "heal_caps_at_100".into(),
        passed: balance::healed(95) == 100 && balance::healed(100) == 100,
        detail: "healed(95) == healed(100) == 100".into(),
    });

    results
}

// ── 2. Generator ────────────────────────────────────────────────────────

fn validate_generator(_verbose: bool) -> Vec<TestResult> {
    println!("--- Event Generator ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(404);
    let mut generator = EventGenerator::new();

    let mut bounds_ok = true;
    let mut ids_ok = true;
    let mut last_id = 0u32;
    for _ in 0..1000 {
        let spec = generator.generate(&mut rng);
        if spec.priority > 5
            || !(5.0..15.0).contains(&spec.duration_secs)
            || !(8.0..20.0).contains(&spec.expire_secs)
            || !(5..=15).contains(&spec.impact)
            || !(10..=25).contains(&spec.benefit)
        {
            bounds_ok = false;
        }
        if spec.id <= last_id {
            ids_ok = false;
        }
        last_id = spec.id;
    }

    results.push(TestResult {
        name: "generator_bounds".into(),
        passed: bounds_ok,
        detail: "1000 rolls within the generator ranges".into(),
    });
    results.push(TestResult {
        name: "generator_ids_monotonic".into(),
        passed: ids_ok,
        detail: format!("last id {}", last_id),
    });

    results
}

// ── 3. Mini-game picker ─────────────────────────────────────────────────

fn validate_picker(_verbose: bool) -> Vec<TestResult> {
    println!("--- Mini-Game Picker ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(505);
    let mut picker = MinigamePicker::new();

    let mut previous = picker.pick(&mut rng);
    let mut no_repeats = true;
    let mut seen = std::collections::HashSet::new();
    seen.insert(previous);
    for _ in 0..1000 {
        let kind = picker.pick(&mut rng);
        if kind == previous {
            no_repeats = false;
        }
        seen.insert(kind);
        previous = kind;
    }

    results.push(TestResult {
        name: "picker_no_back_to_back".into(),
        passed: no_repeats,
        detail: "1000 picks, never twice in a row".into(),
    });
    results.push(TestResult {
        name: "picker_covers_all".into(),
        passed: seen.len() == MinigameKind::ALL.len(),
        detail: format!("{}/{} kinds seen", seen.len(), MinigameKind::ALL.len()),
    });

    results
}

// ── 4. Full missions ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MissionReport {
    seed: u64,
    ticks: u64,
    commands_issued: u64,
    outcome: MissionOutcome,
}

/// Drive one seeded mission with a random triage policy, checking the
/// core invariants after every tick.
fn run_mission(seed: u64, verbose: bool) -> (Vec<TestResult>, MissionReport) {
    println!("--- Mission (seed {}) ---", seed);
    let mut results = Vec::new();

    let mut engine = SessionEngine::new(MissionConfig {
        seed: Some(seed),
        ..Default::default()
    });
    let mut policy_rng = StdRng::seed_from_u64(seed.wrapping_mul(31));

    let mut invariants_ok = true;
    let mut score_monotonic = true;
    let mut capacity_ok = true;
    let mut last_score = 0;
    let mut ticks = 0u64;
    let mut commands_issued = 0u64;
    let max_ticks: u64 = 301 * 60;

    let outcome = loop {
        if let Some(outcome) = engine.tick() {
            break Some(outcome);
        }
        ticks += 1;
        if ticks > max_ticks {
            break None;
        }

        // A jittery player: occasionally pick something and act on it
        if policy_rng.gen_bool(0.05) {
            let snapshot = engine.snapshot();
            if let Some(command) = random_command(&snapshot, &mut policy_rng) {
                engine.apply(command);
                commands_issued += 1;
            }
        }

        if !engine.lanes_disjoint() {
            invariants_ok = false;
        }
        if engine.score() < last_score {
            score_monotonic = false;
        }
        last_score = engine.score();
        if engine.active_count() > 5 {
            capacity_ok = false;
        }
    };

    results.push(TestResult {
        name: format!("mission_{}_terminates", seed),
        passed: outcome.is_some(),
        detail: match outcome {
            Some(outcome) => format!(
                "{:?} after {:.1}s, health {}, score {}",
                outcome.result, outcome.elapsed_secs, outcome.health, outcome.score
            ),
            None => "tick budget exhausted".into(),
        },
    });
    results.push(TestResult {
        name: format!("mission_{}_lanes_disjoint", seed),
        passed: invariants_ok,
        detail: "three lanes pairwise disjoint every tick".into(),
    });
    results.push(TestResult {
        name: format!("mission_{}_score_monotonic", seed),
        passed: score_monotonic,
        detail: "score never decreased".into(),
    });
    results.push(TestResult {
        name: format!("mission_{}_capacity", seed),
        passed: capacity_ok,
        detail: "active lane never exceeded capacity".into(),
    });

    let outcome = outcome.unwrap_or(MissionOutcome {
        result: MissionResult::Failure,
        health: engine.health(),
        score: engine.score(),
        elapsed_secs: engine.elapsed_secs(),
    });

    if verbose {
        println!(
            "  {} commands, outcome {:?}, final health {}",
            commands_issued, outcome.result, outcome.health
        );
    }

    (
        results,
        MissionReport {
            seed,
            ticks,
            commands_issued,
            outcome,
        },
    )
}

/// Pick a random visible event and a random action for it.
fn random_command(snapshot: &MissionSnapshot, rng: &mut StdRng) -> Option<Command> {
    // Bias toward acting on selection when one exists
    if snapshot.selection.is_some() && rng.gen_bool(0.7) {
        return Some(match rng.gen_range(0..6) {
            0 => Command::Honor,
            1 => Command::Reject,
            2 => Command::Enqueue,
            3 => Command::Execute,
            4 => Command::Terminate,
            _ => Command::AdjustPriority {
                delta: if rng.gen_bool(0.5) { 1 } else { -1 },
            },
        });
    }

    let (lane, rows) = match rng.gen_range(0..3) {
        0 => (Lane::Incoming, &snapshot.incoming),
        1 => (Lane::Active, &snapshot.active),
        _ => (Lane::Queued, &snapshot.queued),
    };
    if rows.is_empty() {
        return None;
    }
    let id = rows[rng.gen_range(0..rows.len())].id;
    Some(Command::Select { lane, id })
}
