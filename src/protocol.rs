//! Snapshot, render-frame and event types.
//!
//! This module owns **every value that leaves the simulation core**: the
//! JSON debug snapshot, the per-frame render output and the gameplay
//! feedback messages.
//!
//! ## Design rules
//!
//! 1. Every struct is `Serialize + Deserialize` with snake_case JSON.
//! 2. Renderer-facing transforms are plain poses; no behaviour data leaks.
//! 3. Terrain is **never** sent as height arrays; renderers sample
//!    [`crate::terrain::TerrainSource`] themselves.

use crate::daynight::LightingFrame;
use crate::transit::{BoatPhase, Shore};
use crate::types::{GameMode, Pose, Vec3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// User-facing outcome of an action or a frame. Rule violations are
/// feedback, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feedback {
    Collected { carrying: u32 },
    NeedCollectible,
    Departed { destination: Shore },
    Arrived { shore: Shore },
    Delivered { delivered: u32, total: u32 },
    SlotsFull,
    NothingToDeliver,
    ChestDeposited { stored: usize },
    ChestWithdrawn { stored: usize },
    ChestEmpty,
    Caught,
    Won,
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::Collected { carrying } => {
                write!(f, "Picked up a collectible! Carrying {}", carrying)
            }
            Feedback::NeedCollectible => {
                f.write_str("You need at least one collectible to take the boat")
            }
            Feedback::Departed { destination } => write!(f, "Sailing to the {}...", destination),
            Feedback::Arrived { shore } => write!(f, "Arrived at the {}", shore),
            Feedback::Delivered { delivered, total } => {
                write!(f, "Delivered! {}/{}", delivered, total)
            }
            Feedback::SlotsFull => f.write_str("Every slot is full"),
            Feedback::NothingToDeliver => f.write_str("Nothing to deliver"),
            Feedback::ChestDeposited { stored } => {
                write!(f, "Stored in the chest ({} inside)", stored)
            }
            Feedback::ChestWithdrawn { stored } => {
                write!(f, "Took one from the chest ({} left)", stored)
            }
            Feedback::ChestEmpty => f.write_str("The chest is empty"),
            Feedback::Caught => f.write_str("Caught by the police!"),
            Feedback::Won => f.write_str("Every slot filled. You win!"),
        }
    }
}

/// Contextual prompt for the action available where the player stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    Collect,
    BoardToIsland,
    NeedCollectible,
    BoardToMainland,
    Deliver,
    UseChest,
}

impl std::fmt::Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Hint::Collect => "Press E to pick up",
            Hint::BoardToIsland => "Press E to sail to the island",
            Hint::NeedCollectible => "Collect something before sailing",
            Hint::BoardToMainland => "Press E to sail to the mainland",
            Hint::Deliver => "Press E to deliver",
            Hint::UseChest => "Press F to use the chest",
        })
    }
}

// ---------------------------------------------------------------------------
// Snapshot  (debug / test seam)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearbyCollectible {
    pub index: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoatSnapshot {
    pub phase: BoatPhase,
    pub position: Vec3,
}

/// Point-in-time view of the session for external inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimSnapshot {
    pub tick: u64,
    pub elapsed_seconds: f64,
    pub mode: GameMode,
    /// Feet position.
    pub player_position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub eye_height: f32,
    pub stamina: f32,
    pub on_boat: bool,
    pub inside_house: bool,
    pub inside_villa: bool,
    pub day_phase: f32,
    pub collected: u32,
    pub delivered: u32,
    pub total: u32,
    pub chest: usize,
    pub boat: BoatSnapshot,
    pub nearby_collectibles: Vec<NearbyCollectible>,
    pub police_near: bool,
    pub hint: Option<Hint>,
    pub last_feedback: Option<String>,
}

// ---------------------------------------------------------------------------
// Render frame  (per-frame renderer output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentTransform {
    pub id: usize,
    pub kind: String,
    pub pose: Pose,
    /// Kind-specific animation angle: limb swing, wing flap or wheel spin.
    pub animation: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerPose {
    /// Camera position, bob included.
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub carrying_bag: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoatPose {
    pub position: Vec3,
    pub rotation_x: f32,
    pub rotation_z: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderFrame {
    pub tick: u64,
    pub player: PlayerPose,
    pub boat: BoatPose,
    pub agents: Vec<AgentTransform>,
    pub lighting: LightingFrame,
    /// Filled delivery slots, in slot order.
    pub slots: Vec<bool>,
    /// Time fed to [`crate::terrain::water_wave`].
    pub water_time: f32,
}

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// Final result of a session, for the menu layer to reward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub outcome: GameMode,
    pub delivered: u32,
    pub total: u32,
    pub elapsed_seconds: f64,
    pub boat_trips: u32,
}

/// Events produced by a single [`crate::service::SimulationService::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// The tick counter that produced this set of events.
    pub tick: u64,
    pub feedback: Vec<Feedback>,
    /// Set on the frame a session ends.
    pub summary: Option<RunSummary>,
    pub sky_regenerated: bool,
}
