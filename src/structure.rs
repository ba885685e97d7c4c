//! Structure subsystem: building footprints, the walk-in named structures
//! (house, villa) with their floors and stairs, fixed landmarks, and the
//! top-level `World` data container with its ground-level resolver.

use crate::terrain::TerrainSource;
use crate::types::{Rect, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inward padding applied to structure bounds so doorway transitions are
/// decided slightly inside the walls.
pub const STRUCTURE_PADDING: f32 = 0.3;

/// How far below the feet a floor may sit and still count as "the floor
/// I'm standing on" (absorbs float drift after landing).
pub const STEP_TOLERANCE: f32 = 0.6;

/// Highest a stair ramp may sit above the feet and still be stepped onto.
/// Only the bottom steps of a flight are this close to a floor, so walking
/// under the flight keeps the player on the floor below.
pub const STAIR_CATCH: f32 = 0.35;

// ---------------------------------------------------------------------------
// Footprints
// ---------------------------------------------------------------------------

/// Collidable extent of one building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footprint {
    pub id: String,
    pub rect: Rect,
}

impl Footprint {
    pub fn new(id: impl Into<String>, x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self {
            id: id.into(),
            rect: Rect::centered(x, z, width, depth),
        }
    }
}

// ---------------------------------------------------------------------------
// Named structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    House,
    Villa,
}

/// A straight flight of stairs. Every floor pair of the structure shares the
/// same footprint (stacked flights).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stairs {
    pub area: Rect,
    /// `z` where the climb starts.
    pub start_z: f32,
    /// Horizontal length of one flight.
    pub run: f32,
    /// `+1.0` when climbing towards +z, `-1.0` towards −z.
    pub direction: f32,
}

impl Stairs {
    pub fn progress(&self, z: f32) -> f32 {
        (self.direction * (z - self.start_z) / self.run).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedStructure {
    pub name: String,
    pub kind: StructureKind,
    pub center_x: f32,
    pub center_z: f32,
    pub width: f32,
    pub depth: f32,
    /// Floor surfaces above the terrain reference, lowest first.
    pub floor_offsets: Vec<f32>,
    pub stairs: Option<Stairs>,
    /// Veranda outside the walls that stands at ground-floor level.
    pub porch: Option<Rect>,
    /// Terrain height under the centre, fixed at registration.
    #[serde(default)]
    pub base_elevation: f32,
}

impl NamedStructure {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.center_x, self.center_z, self.width, self.depth)
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        self.bounds().inflate(-STRUCTURE_PADDING).contains(x, z)
    }

    pub fn on_porch(&self, x: f32, z: f32) -> bool {
        self.porch.is_some_and(|p| p.contains(x, z))
    }

    /// Absolute floor elevations, lowest first.
    pub fn floor_elevations(&self) -> Vec<f32> {
        self.floor_offsets
            .iter()
            .map(|off| self.base_elevation + off)
            .collect()
    }

    pub fn ground_floor(&self) -> f32 {
        self.base_elevation + self.floor_offsets.first().copied().unwrap_or(0.0)
    }

    /// Standing elevation for a point already known to be inside.
    pub fn floor_level(&self, x: f32, feet_y: f32, z: f32) -> f32 {
        let floors = self.floor_elevations();
        let Some(&lowest) = floors.first() else {
            return self.base_elevation;
        };

        if let Some(stairs) = self.stairs.as_ref().filter(|s| s.area.contains(x, z)) {
            if floors.len() >= 2 {
                let progress = stairs.progress(z);
                // Pick the flight whose ramp surface is nearest the feet so a
                // climber keeps following the ramp until the next floor. A
                // ramp far above the feet is the underside of a flight.
                let ramp = floors
                    .windows(2)
                    .map(|w| w[0] + progress * (w[1] - w[0]))
                    .filter(|r| *r <= feet_y + STAIR_CATCH)
                    .min_by(|a, b| (a - feet_y).abs().total_cmp(&(b - feet_y).abs()));
                if let Some(ramp) = ramp {
                    return ramp;
                }
            }
        }

        floors
            .iter()
            .rev()
            .find(|&&f| feet_y + STEP_TOLERANCE >= f)
            .copied()
            .unwrap_or(lowest)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds every static footprint and named structure placed in the world.
pub struct StructureRegistry {
    footprints: Vec<Footprint>,
    named: Vec<NamedStructure>,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self {
            footprints: Vec::new(),
            named: Vec::new(),
        }
    }

    pub fn insert_footprint(&mut self, footprint: Footprint) {
        self.footprints.push(footprint);
    }

    pub fn footprint(&self, id: &str) -> Option<&Footprint> {
        self.footprints.iter().find(|f| f.id == id)
    }

    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    pub fn insert_named(&mut self, structure: NamedStructure) {
        self.named.push(structure);
    }

    pub fn named(&self) -> &[NamedStructure] {
        &self.named
    }

    pub fn named_of_kind(&self, kind: StructureKind) -> Option<&NamedStructure> {
        self.named.iter().find(|s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// Return all footprints overlapping the given world rectangle (used by
    /// the world builder to keep buildings apart).
    pub fn query_rect(&self, area: &Rect) -> Vec<&Footprint> {
        self.footprints
            .iter()
            .filter(|f| {
                f.rect.max_x >= area.min_x
                    && f.rect.min_x <= area.max_x
                    && f.rect.max_z >= area.min_z
                    && f.rect.min_z <= area.max_z
            })
            .collect()
    }
}

impl Default for StructureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Landmarks
// ---------------------------------------------------------------------------

/// Fixed positions the simulation core consumes from the world builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmarks {
    pub mainland_dock: Vec3,
    pub island_dock: Vec3,
    /// Boat `x` when moored at each side; the boat runs along `boat_lane_z`.
    pub boat_mainland_x: f32,
    pub boat_island_x: f32,
    pub boat_lane_z: f32,
    /// Boat `x` at or beyond which it counts as moored at the island.
    pub boat_island_side_x: f32,
    /// `(x, z)` where the player steps off the boat.
    pub mainland_disembark: (f32, f32),
    pub island_disembark: (f32, f32),
    /// Player `x` beyond which the island's circular bound applies.
    pub island_threshold_x: f32,
    /// Player `x` below which police consider the player on the mainland.
    pub mainland_edge_x: f32,
    pub mainland_half_extent: f32,
    pub island_center: (f32, f32),
    pub island_radius: f32,
    /// Half-size of the square collectibles, civilians and animals roam.
    pub city_half_extent: f32,
    pub chest: Vec3,
    pub delivery_slots: Vec<Vec3>,
    /// Sidewalk points civilians walk between.
    pub street_points: Vec<(f32, f32)>,
    /// Road centre lines (same coordinates on both axes).
    pub roads: Vec<f32>,
    pub spawn: (f32, f32),
}

// ---------------------------------------------------------------------------
// World (data container)
// ---------------------------------------------------------------------------

/// The immutable world data layer the simulation steps against.
pub struct World {
    pub terrain: Arc<dyn TerrainSource>,
    pub structures: StructureRegistry,
    pub landmarks: Landmarks,
}

impl World {
    pub fn new(terrain: Arc<dyn TerrainSource>, landmarks: Landmarks) -> Self {
        Self {
            terrain,
            structures: StructureRegistry::new(),
            landmarks,
        }
    }

    /// Register a walk-in structure, fixing its terrain reference height.
    pub fn add_named_structure(&mut self, mut structure: NamedStructure) {
        structure.base_elevation = self
            .terrain
            .height_at(structure.center_x, structure.center_z);
        self.structures.insert_named(structure);
    }

    /// The named structure containing `(x, z)`; first registered wins.
    pub fn structure_at(&self, x: f32, z: f32) -> Option<&NamedStructure> {
        self.structures.named().iter().find(|s| s.contains(x, z))
    }

    pub fn inside(&self, kind: StructureKind, x: f32, z: f32) -> bool {
        self.structure_at(x, z).is_some_and(|s| s.kind == kind)
    }

    /// Standing elevation at `(x, z)` for feet currently at `feet_y`.
    pub fn ground_level(&self, x: f32, feet_y: f32, z: f32) -> f32 {
        if let Some(structure) = self.structure_at(x, z) {
            return structure.floor_level(x, feet_y, z);
        }
        if let Some(structure) = self.structures.named().iter().find(|s| s.on_porch(x, z)) {
            return structure.ground_floor();
        }
        self.terrain.height_at(x, z)
    }

    pub fn on_island(&self, x: f32) -> bool {
        x > self.landmarks.island_threshold_x
    }
}
