//! Player locomotion: stamina, yaw-relative movement with axis-separated
//! collision sliding, jump/gravity, terrain following, head bob and the
//! mainland / island boundaries.

use crate::collision::CollisionGate;
use crate::input::InputState;
use crate::structure::{StructureKind, World};
use crate::types::{GameMode, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Base walking speed, m/s.
pub const WALK_SPEED: f32 = 9.0;
pub const SPRINT_MULTIPLIER: f32 = 1.8;
/// m/s².
pub const GRAVITY: f32 = 54.0;
/// Upward velocity at take-off, m/s.
pub const JUMP_IMPULSE: f32 = 15.0;

pub const STAMINA_MAX: f32 = 100.0;
/// Stamina per second while sprinting.
pub const STAMINA_DRAIN: f32 = 30.0;
/// Stamina per second while not sprinting.
pub const STAMINA_REGEN: f32 = 18.0;
/// Sprinting is allowed again once stamina recovers past this.
pub const SPRINT_REGRANT: f32 = 30.0;

/// Camera height above the feet.
pub const EYE_HEIGHT: f32 = 3.5;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    /// Feet position.
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub vertical_velocity: f32,
    pub airborne: bool,
    pub stamina: f32,
    pub sprint_permitted: bool,
    /// Sprint actually applied on the last step.
    pub sprinting: bool,
    pub moving: bool,
    pub on_boat: bool,
    pub inside_house: bool,
    pub inside_villa: bool,
    /// Cosmetic camera offset; never affects collision.
    pub bob_offset: f32,
}

impl PlayerState {
    pub fn spawn(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            vertical_velocity: 0.0,
            airborne: false,
            stamina: STAMINA_MAX,
            sprint_permitted: true,
            sprinting: false,
            moving: false,
            on_boat: false,
            inside_house: false,
            inside_villa: false,
            bob_offset: 0.0,
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + EYE_HEIGHT + self.bob_offset,
            self.position.z,
        )
    }

    /// World-space forward and right vectors in the ground plane.
    pub fn basis(&self) -> ((f32, f32), (f32, f32)) {
        let (sin, cos) = self.yaw.sin_cos();
        ((-sin, -cos), (cos, -sin))
    }

    pub fn refresh_structure_flags(&mut self, world: &World) {
        let (x, z) = (self.position.x, self.position.z);
        self.inside_house = world.inside(StructureKind::House, x, z);
        self.inside_villa = world.inside(StructureKind::Villa, x, z);
    }
}

/// Drain while sprinting, otherwise regenerate with hysteresis.
pub fn update_stamina(player: &mut PlayerState, sprint_held: bool, moving: bool, dt: f32) {
    if sprint_held && moving && player.sprint_permitted {
        player.stamina -= STAMINA_DRAIN * dt;
        if player.stamina <= 0.0 {
            player.stamina = 0.0;
            player.sprint_permitted = false;
        }
    } else {
        player.stamina += STAMINA_REGEN * dt;
        if player.stamina >= STAMINA_MAX {
            player.stamina = STAMINA_MAX;
            player.sprint_permitted = true;
        }
        if player.stamina > SPRINT_REGRANT {
            player.sprint_permitted = true;
        }
    }
}

/// Normalised ground-plane move direction for the held keys.
pub fn move_direction(player: &PlayerState, input: &InputState) -> Option<(f32, f32)> {
    let ((fx, fz), (rx, rz)) = player.basis();
    let mut dx = 0.0;
    let mut dz = 0.0;
    if input.forward {
        dx += fx;
        dz += fz;
    }
    if input.backward {
        dx -= fx;
        dz -= fz;
    }
    if input.right {
        dx += rx;
        dz += rz;
    }
    if input.left {
        dx -= rx;
        dz -= rz;
    }
    let len = (dx * dx + dz * dz).sqrt();
    (len > 1e-4).then(|| (dx / len, dz / len))
}

/// Advance the player by `dt` seconds. Callers skip this while the player
/// rides the boat.
pub fn step(player: &mut PlayerState, input: &InputState, world: &World, dt: f32, elapsed: f32) {
    let ground = world.ground_level(player.position.x, player.position.y, player.position.z);

    let moving = input.is_moving();
    update_stamina(player, input.sprint, moving, dt);
    let sprinting = input.sprint && player.sprint_permitted && player.stamina > 0.0 && moving;
    player.sprinting = sprinting;

    let direction = move_direction(player, input);
    player.moving = direction.is_some();
    if let Some((dx, dz)) = direction {
        let speed = WALK_SPEED * if sprinting { SPRINT_MULTIPLIER } else { 1.0 };
        let (x, z) = (player.position.x, player.position.z);
        let gate = CollisionGate::new(world.structures.footprints());
        let (nx, nz) = gate.resolve(x, z, x + dx * speed * dt, z + dz * speed * dt);
        player.position.x = nx;
        player.position.z = nz;
    }

    if player.airborne {
        player.position.y += player.vertical_velocity * dt;
        player.vertical_velocity -= GRAVITY * dt;
        if player.position.y <= ground {
            player.position.y = ground;
            player.airborne = false;
            player.vertical_velocity = 0.0;
        }
    } else {
        player.position.y = ground;
    }

    player.bob_offset = if player.moving && !player.airborne {
        let (freq, amount) = if sprinting { (14.0, 0.05) } else { (10.0, 0.03) };
        (elapsed * freq).sin() * amount
    } else {
        0.0
    };

    clamp_to_bounds(player, world);
    player.refresh_structure_flags(world);
}

/// Rectangular bound on the mainland, circular on the island.
pub fn clamp_to_bounds(player: &mut PlayerState, world: &World) {
    let lm = &world.landmarks;
    if !world.on_island(player.position.x) {
        let h = lm.mainland_half_extent;
        player.position.x = player.position.x.clamp(-h, h);
        player.position.z = player.position.z.clamp(-h, h);
    } else {
        let (cx, cz) = lm.island_center;
        let dx = player.position.x - cx;
        let dz = player.position.z - cz;
        let dist = (dx * dx + dz * dz).sqrt();
        if dist > lm.island_radius {
            let angle = dz.atan2(dx);
            player.position.x = cx + angle.cos() * lm.island_radius;
            player.position.z = cz + angle.sin() * lm.island_radius;
        }
    }
}

/// Edge-triggered jump. Returns whether the jump started.
pub fn jump(player: &mut PlayerState, mode: GameMode) -> bool {
    if mode != GameMode::Playing || player.airborne || player.on_boat {
        return false;
    }
    player.airborne = true;
    player.vertical_velocity = JUMP_IMPULSE;
    true
}

/// Mouse-look. `scale` is radians per pixel.
pub fn look(player: &mut PlayerState, dx: f32, dy: f32, scale: f32, invert_y: bool) {
    let dy = if invert_y { -dy } else { dy };
    player.yaw -= dx * scale;
    player.pitch = (player.pitch - dy * scale).clamp(-PITCH_LIMIT, PITCH_LIMIT);
}
