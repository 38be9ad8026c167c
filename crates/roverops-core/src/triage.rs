//! Triage state machine - lane transitions and the per-tick timer scans.
//!
//! Every event entity carries exactly one lane marker ([`Incoming`],
//! [`Active`], [`Queued`]). Player commands swap markers with a
//! remove-then-insert inside a single call, and retirement despawns the
//! entity outright, so the three lanes stay pairwise disjoint and no lane
//! ever holds a dead event.

use hecs::{Entity, World};
use roverops_logic::balance;

use crate::components::{Active, Category, EventInfo, Incoming, Lane, Priority, Queued, Stakes, Workload};
use crate::generation::EventSpec;

fn find_in_lane<M: hecs::Component>(world: &World, id: u32) -> Option<Entity> {
    world
        .query::<(&EventInfo, &M)>()
        .iter()
        .find(|(_, (info, _))| info.id == id)
        .map(|(entity, _)| entity)
}

/// Find the event with `id` in `lane`, if it is still there.
///
/// This is how weak selections are resolved: a `(lane, id)` pair that no
/// longer resolves means the referent moved on, and the command holding it
/// should treat that as a silent no-op.
pub fn resolve(world: &World, lane: Lane, id: u32) -> Option<Entity> {
    match lane {
        Lane::Incoming => find_in_lane::<Incoming>(world, id),
        Lane::Active => find_in_lane::<Active>(world, id),
        Lane::Queued => find_in_lane::<Queued>(world, id),
    }
}

/// Number of events currently in the active lane.
pub fn active_count(world: &World) -> usize {
    world.query::<&Active>().iter().count()
}

/// Number of events currently in the incoming lane.
pub fn incoming_count(world: &World) -> usize {
    world.query::<&Incoming>().iter().count()
}

/// Number of events currently in the queued lane.
pub fn queued_count(world: &World) -> usize {
    world.query::<&Queued>().iter().count()
}

/// Spawn a rolled event into the incoming lane.
pub fn spawn_incoming(world: &mut World, spec: &EventSpec, arrived: u64) -> Entity {
    world.spawn((
        EventInfo {
            id: spec.id,
            name: spec.name.to_string(),
            category: spec.category,
        },
        Priority(spec.priority),
        Workload::new(spec.duration_secs),
        Stakes {
            impact: spec.impact,
            benefit: spec.benefit,
        },
        Incoming {
            expire_in: spec.expire_secs,
            arrived,
        },
    ))
}

/// Incoming -> Active. Returns false if the event was not incoming.
pub fn begin(world: &mut World, entity: Entity, entered: u64) -> bool {
    if world.remove_one::<Incoming>(entity).is_err() {
        return false;
    }
    let _ = world.insert_one(entity, Active { entered });
    true
}

/// Incoming -> Queued. Returns false if the event was not incoming.
pub fn park(world: &mut World, entity: Entity, entered: u64) -> bool {
    if world.remove_one::<Incoming>(entity).is_err() {
        return false;
    }
    let _ = world.insert_one(entity, Queued { entered });
    true
}

/// Queued -> Active. Returns false if the event was not queued.
pub fn resume(world: &mut World, entity: Entity, entered: u64) -> bool {
    if world.remove_one::<Queued>(entity).is_err() {
        return false;
    }
    let _ = world.insert_one(entity, Active { entered });
    true
}

/// Remove an event from the session entirely, whatever lane it is in.
/// Used for reject and for dropping events out of the queue.
pub fn discard(world: &mut World, entity: Entity) {
    let _ = world.despawn(entity);
}

/// Active -> Terminated. Despawns the event and returns the health damage
/// for interrupting it mid-run, or `None` if the event was not active.
pub fn terminate_active(world: &mut World, entity: Entity) -> Option<i32> {
    let workload = *world.get::<&Workload>(entity).ok()?;
    if world.remove_one::<Active>(entity).is_err() {
        return None;
    }
    let damage = balance::termination_damage(workload.remaining, workload.total);
    let _ = world.despawn(entity);
    Some(damage)
}

/// An incoming event that ran out of expiry time this tick.
#[derive(Debug, Clone)]
pub struct ExpiredEvent {
    pub id: u32,
    pub category: Category,
    pub impact: i32,
}

/// An active event whose workload finished this tick.
#[derive(Debug, Clone)]
pub struct CompletedEvent {
    pub id: u32,
    pub category: Category,
    pub benefit: i32,
}

/// Count down incoming expiry timers and retire the events crossing zero.
///
/// The crossing set is collected before any despawn, so removals cannot
/// skip or double-visit entries mid-scan.
pub fn expire_incoming(world: &mut World, dt: f32) -> Vec<ExpiredEvent> {
    let mut crossed = Vec::new();
    for (entity, incoming) in world.query_mut::<&mut Incoming>() {
        incoming.expire_in -= dt;
        if incoming.expire_in <= 0.0 {
            crossed.push(entity);
        }
    }

    let mut expired = Vec::with_capacity(crossed.len());
    for entity in crossed {
        if let Ok((info, stakes)) = world.query_one_mut::<(&EventInfo, &Stakes)>(entity) {
            expired.push(ExpiredEvent {
                id: info.id,
                category: info.category,
                impact: stakes.impact,
            });
        }
        let _ = world.despawn(entity);
    }
    expired
}

/// Count down active workloads and retire the events crossing zero.
///
/// Same snapshot discipline as [`expire_incoming`].
pub fn complete_active(world: &mut World, dt: f32) -> Vec<CompletedEvent> {
    let mut crossed = Vec::new();
    for (entity, (_, workload)) in world.query_mut::<(&Active, &mut Workload)>() {
        workload.remaining -= dt;
        if workload.remaining <= 0.0 {
            crossed.push(entity);
        }
    }

    let mut completed = Vec::with_capacity(crossed.len());
    for entity in crossed {
        if let Ok((info, stakes)) = world.query_one_mut::<(&EventInfo, &Stakes)>(entity) {
            completed.push(CompletedEvent {
                id: info.id,
                category: info.category,
                benefit: stakes.benefit,
            });
        }
        let _ = world.despawn(entity);
    }
    completed
}

/// True when every live event sits in exactly one lane and no id repeats.
///
/// Transitions cannot violate this by construction; the check exists for
/// tests and the simtest harness.
pub fn lanes_disjoint(world: &World) -> bool {
    let mut seen = std::collections::HashSet::new();
    for (entity, info) in world.query::<&EventInfo>().iter() {
        let mut lanes = 0u8;
        lanes += world.satisfies::<&Incoming>(entity).unwrap_or(false) as u8;
        lanes += world.satisfies::<&Active>(entity).unwrap_or(false) as u8;
        lanes += world.satisfies::<&Queued>(entity).unwrap_or(false) as u8;
        if lanes != 1 {
            return false;
        }
        if !seen.insert(info.id) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use roverops_logic::constants::timing;

    fn spec(id: u32, duration_secs: f32, expire_secs: f32, impact: i32, benefit: i32) -> EventSpec {
        EventSpec {
            id,
            name: "Analyze Soil",
            category: Category::SampleOps,
            priority: 2,
            duration_secs,
            expire_secs,
            impact,
            benefit,
        }
    }

    #[test]
    fn test_spawn_lands_in_incoming() {
        let mut world = World::new();
        let entity = spawn_incoming(&mut world, &spec(1, 10.0, 12.0, 8, 20), 0);

        assert_eq!(incoming_count(&world), 1);
        assert_eq!(active_count(&world), 0);
        assert_eq!(queued_count(&world), 0);
        assert_eq!(resolve(&world, Lane::Incoming, 1), Some(entity));
        assert!(lanes_disjoint(&world));
    }

    #[test]
    fn test_transitions_move_between_lanes() {
        let mut world = World::new();
        let entity = spawn_incoming(&mut world, &spec(1, 10.0, 12.0, 8, 20), 0);

        assert!(park(&mut world, entity, 1));
        assert_eq!(resolve(&world, Lane::Incoming, 1), None);
        assert_eq!(resolve(&world, Lane::Queued, 1), Some(entity));
        assert!(lanes_disjoint(&world));

        assert!(resume(&mut world, entity, 2));
        assert_eq!(resolve(&world, Lane::Queued, 1), None);
        assert_eq!(resolve(&world, Lane::Active, 1), Some(entity));
        assert!(lanes_disjoint(&world));

        // Wrong-lane transitions refuse
        assert!(!begin(&mut world, entity, 3));
        assert!(!park(&mut world, entity, 3));
        assert!(lanes_disjoint(&world));
    }

    #[test]
    fn test_expiry_boundary_one_tick() {
        let mut world = World::new();
        spawn_incoming(&mut world, &spec(1, 10.0, timing::TICK_SECONDS, 9, 20), 0);

        let expired = expire_incoming(&mut world, timing::TICK_SECONDS);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, 1);
        assert_eq!(expired[0].impact, 9);
        assert_eq!(incoming_count(&world), 0);
    }

    #[test]
    fn test_expiry_does_not_fire_early() {
        let mut world = World::new();
        spawn_incoming(&mut world, &spec(1, 10.0, 1.0, 9, 20), 0);

        // 59 ticks: just under a second, still alive
        for _ in 0..59 {
            assert!(expire_incoming(&mut world, timing::TICK_SECONDS).is_empty());
        }
        let expired = expire_incoming(&mut world, timing::TICK_SECONDS);
        assert_eq!(expired.len(), 1);
    }

    #[test]
    fn test_completion_boundary_one_tick() {
        let mut world = World::new();
        let entity = spawn_incoming(&mut world, &spec(1, timing::TICK_SECONDS, 12.0, 9, 21), 0);
        assert!(begin(&mut world, entity, 1));

        let completed = complete_active(&mut world, timing::TICK_SECONDS);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].benefit, 21);
        assert_eq!(active_count(&world), 0);
    }

    #[test]
    fn test_workload_frozen_until_active() {
        let mut world = World::new();
        let entity = spawn_incoming(&mut world, &spec(1, 5.0, 30.0, 9, 21), 0);
        assert!(park(&mut world, entity, 1));

        // Ten seconds pass; queued events do no work.
        for _ in 0..600 {
            assert!(complete_active(&mut world, timing::TICK_SECONDS).is_empty());
        }
        let workload = *world.get::<&Workload>(entity).unwrap();
        assert!((workload.remaining - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_terminate_active_damage() {
        let mut world = World::new();
        let entity = spawn_incoming(&mut world, &spec(1, 10.0, 12.0, 9, 21), 0);
        assert!(begin(&mut world, entity, 1));

        // Run 8 of the 10 seconds, then pull the plug.
        let completed = complete_active(&mut world, 8.0);
        assert!(completed.is_empty());

        let damage = terminate_active(&mut world, entity);
        assert_eq!(damage, Some(4)); // round(10*0.2 + 3*0.8)
        assert_eq!(active_count(&world), 0);
    }

    #[test]
    fn test_terminate_refuses_non_active() {
        let mut world = World::new();
        let entity = spawn_incoming(&mut world, &spec(1, 10.0, 12.0, 9, 21), 0);

        assert_eq!(terminate_active(&mut world, entity), None);
        assert_eq!(incoming_count(&world), 1);
    }

    #[test]
    fn test_scan_handles_multiple_removals() {
        let mut world = World::new();
        for id in 1..=4 {
            spawn_incoming(&mut world, &spec(id, 10.0, 0.5, 5, 10), id as u64);
        }
        spawn_incoming(&mut world, &spec(5, 10.0, 9.0, 5, 10), 5);

        // One big step expires the four short-fuse events in a single scan.
        let expired = expire_incoming(&mut world, 1.0);
        assert_eq!(expired.len(), 4);
        assert_eq!(incoming_count(&world), 1);
        assert!(lanes_disjoint(&world));
    }

    #[test]
    fn test_resolve_is_lane_scoped() {
        let mut world = World::new();
        let entity = spawn_incoming(&mut world, &spec(7, 10.0, 12.0, 5, 10), 0);

        assert_eq!(resolve(&world, Lane::Active, 7), None);
        assert_eq!(resolve(&world, Lane::Queued, 7), None);
        assert_eq!(resolve(&world, Lane::Incoming, 7), Some(entity));
    }
}
