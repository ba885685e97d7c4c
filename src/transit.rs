//! Transit: the ferry between the mainland dock and the island dock.
//!
//! The boat is idle at one side or in transit to the other. While in transit
//! the player rides it: locomotion is suspended and the player's position
//! is copied from the deck every frame.

use crate::locomotion::PlayerState;
use crate::protocol::Feedback;
use crate::structure::World;
use crate::types::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// m/s along the boat lane.
pub const BOAT_SPEED: f32 = 18.0;
/// Player must be this close to the boat or its dock to board.
pub const DOCK_PROXIMITY: f32 = 12.0;
/// Player feet height while riding.
pub const DECK_HEIGHT: f32 = 4.0;
/// Resting hull height before bob.
const HULL_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shore {
    Mainland,
    Island,
}

impl std::fmt::Display for Shore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Shore::Mainland => "mainland",
            Shore::Island => "island",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoatPhase {
    IdleMainland,
    IdleIsland,
    ToIsland,
    ToMainland,
}

impl BoatPhase {
    pub fn in_transit(&self) -> bool {
        matches!(self, BoatPhase::ToIsland | BoatPhase::ToMainland)
    }
}

impl std::fmt::Display for BoatPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BoatPhase::IdleMainland => "idle@mainland",
            BoatPhase::IdleIsland => "idle@island",
            BoatPhase::ToIsland => "transit->island",
            BoatPhase::ToMainland => "transit->mainland",
        })
    }
}

/// Result of an interaction routed to the boat.
#[derive(Debug, Clone, PartialEq)]
pub enum Boarding {
    Departed(Shore),
    Rejected(Feedback),
    /// Player was not near a dock, or the boat is already under way.
    NotAvailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoatState {
    pub phase: BoatPhase,
    pub position: Vec3,
    /// Cosmetic pitch and roll.
    pub rotation_x: f32,
    pub rotation_z: f32,
    pub trips: u32,
}

impl BoatState {
    /// Moored at the island, where the player starts.
    pub fn moored_at_island(world: &World) -> Self {
        let lm = &world.landmarks;
        Self {
            phase: BoatPhase::IdleIsland,
            position: Vec3::new(lm.boat_island_x, HULL_HEIGHT, lm.boat_lane_z),
            rotation_x: 0.0,
            rotation_z: 0.0,
            trips: 0,
        }
    }

    pub fn moored_at_mainland(world: &World) -> Self {
        let lm = &world.landmarks;
        Self {
            phase: BoatPhase::IdleMainland,
            position: Vec3::new(lm.boat_mainland_x, HULL_HEIGHT, lm.boat_lane_z),
            ..Self::moored_at_island(world)
        }
    }

    /// Which shore the idle boat is at, decided by its `x`.
    pub fn shore(&self, world: &World) -> Shore {
        if self.position.x >= world.landmarks.boat_island_side_x {
            Shore::Island
        } else {
            Shore::Mainland
        }
    }

    /// True when `player` is close enough to board from the boat's side.
    pub fn player_in_range(&self, player: &Vec3, world: &World) -> bool {
        self.within(player, world, DOCK_PROXIMITY)
    }

    /// True when `player` is within `radius` of the boat or the dock at
    /// the boat's side.
    pub fn within(&self, player: &Vec3, world: &World, radius: f32) -> bool {
        let dock = match self.shore(world) {
            Shore::Island => &world.landmarks.island_dock,
            Shore::Mainland => &world.landmarks.mainland_dock,
        };
        player.planar_distance(&self.position) < radius || player.planar_distance(dock) < radius
    }

    /// Board if the player is in range. Leaving the mainland needs cargo.
    pub fn request_departure(
        &mut self,
        player: &mut PlayerState,
        carrying: u32,
        world: &World,
    ) -> Boarding {
        if self.phase.in_transit() || player.on_boat {
            return Boarding::NotAvailable;
        }
        if !self.player_in_range(&player.position, world) {
            return Boarding::NotAvailable;
        }

        let destination = match self.shore(world) {
            Shore::Mainland if carrying == 0 => {
                debug!("Boarding refused: nothing carried");
                return Boarding::Rejected(Feedback::NeedCollectible);
            }
            Shore::Mainland => {
                self.phase = BoatPhase::ToIsland;
                Shore::Island
            }
            Shore::Island => {
                self.phase = BoatPhase::ToMainland;
                Shore::Mainland
            }
        };

        player.on_boat = true;
        player.airborne = false;
        player.vertical_velocity = 0.0;
        player.sprinting = false;
        player.moving = false;
        player.bob_offset = 0.0;
        self.carry(player);
        info!("Boat departing for the {} carrying {}", destination, carrying);
        Boarding::Departed(destination)
    }

    /// Advance one frame. Returns arrival feedback on the frame the boat
    /// reaches its destination.
    pub fn step(
        &mut self,
        player: &mut PlayerState,
        world: &World,
        dt: f32,
        elapsed: f32,
    ) -> Option<Feedback> {
        self.position.y = HULL_HEIGHT + (elapsed * 2.0).sin() * 0.15;
        self.rotation_z = (elapsed * 1.5).sin() * 0.03;
        self.rotation_x = (elapsed * 1.8).sin() * 0.02;

        let lm = &world.landmarks;
        let (target_x, arrived_phase, shore, disembark) = match self.phase {
            BoatPhase::ToIsland => (
                lm.boat_island_x,
                BoatPhase::IdleIsland,
                Shore::Island,
                lm.island_disembark,
            ),
            BoatPhase::ToMainland => (
                lm.boat_mainland_x,
                BoatPhase::IdleMainland,
                Shore::Mainland,
                lm.mainland_disembark,
            ),
            BoatPhase::IdleMainland | BoatPhase::IdleIsland => return None,
        };

        let remaining = target_x - self.position.x;
        let travel = BOAT_SPEED * dt;
        if remaining.abs() <= travel {
            self.position.x = target_x;
            self.phase = arrived_phase;
            self.trips += 1;

            let (x, z) = disembark;
            player.on_boat = false;
            player.position = Vec3::new(x, world.ground_level(x, player.position.y, z), z);
            player.airborne = false;
            player.vertical_velocity = 0.0;
            player.refresh_structure_flags(world);
            info!("Boat arrived at the {} (trip {})", shore, self.trips);
            return Some(Feedback::Arrived { shore });
        }

        self.position.x += travel * remaining.signum();
        self.carry(player);
        None
    }

    fn carry(&self, player: &mut PlayerState) {
        player.position = Vec3::new(self.position.x, DECK_HEIGHT, self.position.z);
    }
}
