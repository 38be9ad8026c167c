//! Read-only view of a session for the presentation layer.
//!
//! Captured once per frame by whatever renders the console. Everything
//! here is plain serializable data - nothing borrows the world.

use hecs::World;
use serde::{Deserialize, Serialize};

use crate::components::{Active, Category, EventInfo, Incoming, Lane, Priority, Queued, Workload};
use crate::logs::{LogFeed, LogLine};

/// One event row in a lane list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventView {
    pub id: u32,
    pub name: String,
    pub priority: u8,
    /// Lane-appropriate countdown: time to expiry for incoming, remaining
    /// work for active, the workload estimate for queued.
    pub remaining_secs: f32,
    pub hint: Category,
}

/// The current selection, echoed back so the renderer can highlight it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionView {
    pub lane: Lane,
    pub id: u32,
}

/// Everything a frontend needs to draw one frame of the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionSnapshot {
    pub incoming: Vec<EventView>,
    pub active: Vec<EventView>,
    pub queued: Vec<EventView>,
    pub selection: Option<SelectionView>,
    pub health: i32,
    pub score: i32,
    pub remaining_mission_secs: f32,
    pub logs: Vec<LogLine>,
}

pub(crate) fn capture(
    world: &World,
    selection: Option<(Lane, u32)>,
    health: i32,
    score: i32,
    remaining_mission_secs: f32,
    logs: &LogFeed,
) -> MissionSnapshot {
    let mut incoming: Vec<(u64, EventView)> = world
        .query::<(&EventInfo, &Priority, &Incoming)>()
        .iter()
        .map(|(_, (info, priority, lane))| {
            (
                lane.arrived,
                EventView {
                    id: info.id,
                    name: info.name.clone(),
                    priority: priority.0,
                    remaining_secs: lane.expire_in,
                    hint: info.category,
                },
            )
        })
        .collect();

    let mut active: Vec<(u64, EventView)> = world
        .query::<(&EventInfo, &Priority, &Workload, &Active)>()
        .iter()
        .map(|(_, (info, priority, workload, lane))| {
            (
                lane.entered,
                EventView {
                    id: info.id,
                    name: info.name.clone(),
                    priority: priority.0,
                    remaining_secs: workload.remaining,
                    hint: info.category,
                },
            )
        })
        .collect();

    let mut queued: Vec<(u64, EventView)> = world
        .query::<(&EventInfo, &Priority, &Workload, &Queued)>()
        .iter()
        .map(|(_, (info, priority, workload, lane))| {
            (
                lane.entered,
                EventView {
                    id: info.id,
                    name: info.name.clone(),
                    priority: priority.0,
                    remaining_secs: workload.total,
                    hint: info.category,
                },
            )
        })
        .collect();

    // Arrival/entry order, oldest first
    incoming.sort_by_key(|(order, _)| *order);
    active.sort_by_key(|(order, _)| *order);
    queued.sort_by_key(|(order, _)| *order);

    MissionSnapshot {
        incoming: incoming.into_iter().map(|(_, view)| view).collect(),
        active: active.into_iter().map(|(_, view)| view).collect(),
        queued: queued.into_iter().map(|(_, view)| view).collect(),
        selection: selection.map(|(lane, id)| SelectionView { lane, id }),
        health,
        score,
        remaining_mission_secs,
        logs: logs.lines().cloned().collect(),
    }
}
