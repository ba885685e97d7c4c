//! Interaction and delivery: picking up collectibles, routing the interact
//! key to the boat, filling delivery slots in the house, and the storage
//! chest.

use crate::protocol::{Feedback, Hint};
use crate::service::GameState;
use crate::structure::World;
use crate::transit::{Boarding, Shore};
use crate::types::GameMode;
use log::{debug, info};

/// Collectibles within this planar distance are picked up.
pub const PICKUP_RADIUS: f32 = 4.0;
/// Reach of the storage chest.
pub const CHEST_RADIUS: f32 = 4.0;
/// Dock prompts show a little further out than boarding works.
pub const DOCK_HINT_RADIUS: f32 = 15.0;

/// Handle one press of the interact key. Returns the feedback produced, in
/// order; the same messages are queued on the state.
pub fn interact(state: &mut GameState, world: &World) -> Vec<Feedback> {
    let mut out = Vec::new();
    if state.mode != GameMode::Playing {
        return out;
    }

    // Pick up everything in reach.
    let player_pos = state.player.position;
    for agent in &mut state.agents.collectibles {
        let in_reach = agent.pose.position.planar_distance(&player_pos) < PICKUP_RADIUS;
        let Some(c) = agent.as_collectible_mut() else {
            continue;
        };
        if c.available() && in_reach {
            c.collected = true;
            c.visible = false;
            state.collected += 1;
            out.push(Feedback::Collected {
                carrying: state.collected,
            });
        }
    }

    if !state.player.on_boat && !state.boat.phase.in_transit() {
        match state
            .boat
            .request_departure(&mut state.player, state.collected, world)
        {
            Boarding::Departed(destination) => out.push(Feedback::Departed { destination }),
            Boarding::Rejected(feedback) => out.push(feedback),
            Boarding::NotAvailable => {}
        }
    }

    state.player.refresh_structure_flags(world);
    if state.player.inside_house {
        if state.collected > 0 {
            deliver(state, &mut out);
        } else if out.is_empty() {
            out.push(Feedback::NothingToDeliver);
        }
    }

    for fb in &out {
        state.push_feedback(fb.clone());
    }
    out
}

/// Move one carried collectible into the first empty slot.
fn deliver(state: &mut GameState, out: &mut Vec<Feedback>) {
    let Some(slot) = state.slots.iter().position(|filled| !filled) else {
        debug!("Delivery refused: all {} slots filled", state.slots.len());
        out.push(Feedback::SlotsFull);
        return;
    };
    state.slots[slot] = true;
    state.delivered += 1;
    state.collected -= 1;
    info!(
        "Delivered into slot {} ({}/{})",
        slot, state.delivered, state.total
    );
    out.push(Feedback::Delivered {
        delivered: state.delivered,
        total: state.total,
    });
    if state.delivered >= state.total {
        state.finish(GameMode::Win);
        out.push(Feedback::Won);
    }
}

/// Handle one press of the chest key: deposit when carrying, otherwise take
/// one back out.
pub fn use_chest(state: &mut GameState, world: &World) -> Option<Feedback> {
    if state.mode != GameMode::Playing || state.player.on_boat {
        return None;
    }
    if state.player.position.planar_distance(&world.landmarks.chest) >= CHEST_RADIUS {
        return None;
    }

    let feedback = if state.collected > 0 {
        state.collected -= 1;
        state.chest += 1;
        Feedback::ChestDeposited {
            stored: state.chest,
        }
    } else if state.chest > 0 {
        state.chest -= 1;
        state.collected += 1;
        Feedback::ChestWithdrawn {
            stored: state.chest,
        }
    } else {
        Feedback::ChestEmpty
    };
    state.push_feedback(feedback.clone());
    Some(feedback)
}

/// The prompt for what the interact or chest key would do right now.
pub fn hint(state: &GameState, world: &World) -> Option<Hint> {
    if state.mode != GameMode::Playing || state.player.on_boat {
        return None;
    }
    let pos = &state.player.position;

    let pickup = state
        .agents
        .collectibles
        .iter()
        .filter(|a| a.as_collectible().is_some_and(|c| c.available()))
        .any(|a| a.pose.position.planar_distance(pos) < PICKUP_RADIUS);
    if pickup {
        return Some(Hint::Collect);
    }

    if !state.boat.phase.in_transit() && state.boat.within(pos, world, DOCK_HINT_RADIUS) {
        return Some(match state.boat.shore(world) {
            Shore::Mainland if state.collected > 0 => Hint::BoardToIsland,
            Shore::Mainland => Hint::NeedCollectible,
            Shore::Island => Hint::BoardToMainland,
        });
    }

    if state.player.inside_house && state.collected > 0 {
        return Some(Hint::Deliver);
    }

    let near_chest = pos.planar_distance(&world.landmarks.chest) < CHEST_RADIUS;
    if near_chest && (state.collected > 0 || state.chest > 0) {
        return Some(Hint::UseChest);
    }
    None
}
