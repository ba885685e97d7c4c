//! Core world types shared across all modules.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Basic math
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Distance in the ground plane, ignoring height.
    pub fn planar_distance(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Unit vector in the ground plane from `from` towards `to`, plus the
/// distance between them. Returns a zero direction when the points coincide.
pub fn planar_heading(from: &Vec3, to: &Vec3) -> (f32, f32, f32) {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    let len = (dx * dx + dz * dz).sqrt();
    if len > f32::EPSILON {
        (dx / len, dz / len, len)
    } else {
        (0.0, 0.0, 0.0)
    }
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub type Rgb = [f32; 3];

pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

/// Convert a `0xRRGGBB` literal into linear-ish `[0, 1]` components.
pub const fn hex_rgb(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

// ---------------------------------------------------------------------------
// Poses and rectangles
// ---------------------------------------------------------------------------

/// Position plus heading, the unit every renderer-facing transform uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    /// Rotation about the vertical axis in radians.
    pub rotation_y: f32,
}

impl Pose {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            rotation_y: 0.0,
        }
    }
}

/// Axis-aligned rectangle in the ground plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Rect {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Rectangle of the given size centred on `(x, z)`.
    pub fn centered(x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self::new(
            x - width / 2.0,
            x + width / 2.0,
            z - depth / 2.0,
            z + depth / 2.0,
        )
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x > self.min_x && x < self.max_x && z > self.min_z && z < self.max_z
    }

    /// Grow (positive) or shrink (negative) on every side.
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.min_x - margin,
            self.max_x + margin,
            self.min_z - margin,
            self.max_z + margin,
        )
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) * 0.5,
            (self.min_z + self.max_z) * 0.5,
        )
    }
}

// ---------------------------------------------------------------------------
// Game mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// World built, waiting for the first `reset`.
    Start,
    Playing,
    Paused,
    /// Caught by police while carrying.
    GameOver,
    /// Every delivery slot filled.
    Win,
}

impl GameMode {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameMode::GameOver | GameMode::Win)
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GameMode::Start => "start",
            GameMode::Playing => "playing",
            GameMode::Paused => "paused",
            GameMode::GameOver => "gameover",
            GameMode::Win => "win",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Stats & config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimStats {
    pub total_ticks: u64,
    pub elapsed_seconds: f32,
    pub agents: usize,
    pub sky_regenerations: u64,
    pub boat_trips: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for every random choice (world layout and agent wandering).
    pub seed: u64,
    /// Real seconds per full day-night cycle.
    pub day_length: f32,
    /// Day phase in `[0, 1)` at session start.
    pub start_phase: f32,
    /// Collectibles in the world; also the number of delivery slots.
    pub total_collectibles: u32,
    pub police_count: usize,
    pub civilian_count: usize,
    pub dog_count: usize,
    pub cat_count: usize,
    pub bird_count: usize,
    pub sea_creature_count: usize,
    pub decorative_boat_count: usize,
    pub vehicle_count: usize,
    pub parked_vehicle_count: usize,
    /// Driver frame rate in Hz.
    pub tick_rate_hz: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            day_length: 300.0,
            start_phase: 0.3,
            total_collectibles: 8,
            police_count: 5,
            civilian_count: 20,
            dog_count: 5,
            cat_count: 5,
            bird_count: 25,
            sea_creature_count: 12,
            decorative_boat_count: 4,
            vehicle_count: 15,
            parked_vehicle_count: 8,
            tick_rate_hz: 60.0,
        }
    }
}
