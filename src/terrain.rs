//! Terrain subsystem: TerrainSource trait and the IslandTerrain height field
//! (rolling noise, city-bowl flattening, rim rise, river and lake carving,
//! and the island plateau).

use crate::types::{smoothstep, Vec3};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Anything that can provide a terrain height and surface normal.
pub trait TerrainSource: Send + Sync {
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Finite-difference normal (y-up, not normalised).
    fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let eps = 0.5;
        let h_l = self.height_at(x - eps, z);
        let h_r = self.height_at(x + eps, z);
        let h_d = self.height_at(x, z - eps);
        let h_u = self.height_at(x, z + eps);
        Vec3::new(h_l - h_r, 2.0 * eps, h_d - h_u)
    }

    /// Gradient magnitude (rise over run).
    fn slope_at(&self, x: f32, z: f32) -> f32 {
        let eps = 0.5;
        let gx = (self.height_at(x + eps, z) - self.height_at(x - eps, z)) / (2.0 * eps);
        let gz = (self.height_at(x, z + eps) - self.height_at(x, z - eps)) / (2.0 * eps);
        (gx * gx + gz * gz).sqrt()
    }

    /// True when the point is dry and flatter than `max_slope`.
    fn is_buildable(&self, x: f32, z: f32, max_slope: f32) -> bool;
}

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// The flat city bowl: no noise inside this radius.
pub const CITY_RADIUS: f32 = 120.0;
/// Full noise amplitude from this radius outwards.
pub const NOISE_FULL_RADIUS: f32 = 170.0;
pub const EDGE_START: f32 = 170.0;
pub const EDGE_END: f32 = 280.0;
pub const EDGE_HEIGHT: f32 = 14.0;

/// Half-size of the mainland slab before the coast drops into the sea.
pub const COAST_START: f32 = 200.0;
pub const COAST_END: f32 = 215.0;
pub const SEA_FLOOR: f32 = -3.0;
pub const SEA_LEVEL: f32 = 0.0;

pub const ISLAND_CENTER_X: f32 = 280.0;
pub const ISLAND_CENTER_Z: f32 = 0.0;
pub const ISLAND_TOP: f32 = 2.0;
pub const ISLAND_PLATEAU_RADIUS: f32 = 40.0;
pub const ISLAND_BEACH_RADIUS: f32 = 48.0;

/// Polyline samples per spline segment.
const RIVER_SAMPLES_PER_SEGMENT: usize = 12;

// ---------------------------------------------------------------------------
// Water descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RiverDescriptor {
    /// Spline control points in the ground plane (`y` is ignored).
    pub control_points: Vec<Vec3>,
    pub half_width: f32,
    pub depth: f32,
}

impl Default for RiverDescriptor {
    fn default() -> Self {
        Self {
            control_points: vec![
                Vec3::new(-205.0, 0.0, 95.0),
                Vec3::new(-165.0, 0.0, 120.0),
                Vec3::new(-125.0, 0.0, 172.0),
                Vec3::new(-80.0, 0.0, 188.0),
                Vec3::new(-30.0, 0.0, 205.0),
            ],
            half_width: 7.0,
            depth: 3.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LakeDescriptor {
    pub center: Vec3,
    pub radius: f32,
    pub depth: f32,
}

impl Default for LakeDescriptor {
    fn default() -> Self {
        Self {
            center: Vec3::new(-160.0, 0.0, -45.0),
            radius: 18.0,
            depth: 4.0,
        }
    }
}

/// Sample a Catmull-Rom spline through `points` into a dense polyline.
fn sample_spline(points: &[Vec3], samples_per_segment: usize) -> Vec<Vec3> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity((points.len() - 1) * samples_per_segment + 1);
    for i in 0..points.len() - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(points.len() - 1)];

        for s in 0..samples_per_segment {
            let t = s as f32 / samples_per_segment as f32;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let f = |a: f32, b: f32, c: f32, d: f32| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Vec3::new(
        f(p0.x, p1.x, p2.x, p3.x),
        f(p0.y, p1.y, p2.y, p3.y),
        f(p0.z, p1.z, p2.z, p3.z),
    )
}

fn distance_to_segment(px: f32, pz: f32, a: &Vec3, b: &Vec3) -> f32 {
    let abx = b.x - a.x;
    let abz = b.z - a.z;
    let len_sq = abx * abx + abz * abz;
    let t = if len_sq > f32::EPSILON {
        (((px - a.x) * abx + (pz - a.z) * abz) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = a.x + abx * t;
    let cz = a.z + abz * t;
    ((px - cx).powi(2) + (pz - cz).powi(2)).sqrt()
}

// ---------------------------------------------------------------------------
// Island terrain
// ---------------------------------------------------------------------------

/// The world height field. Immutable after construction; every query is
/// recomputed from scratch.
pub struct IslandTerrain {
    river: RiverDescriptor,
    river_polyline: Vec<Vec3>,
    lake: LakeDescriptor,
}

impl IslandTerrain {
    pub fn new(river: RiverDescriptor, lake: LakeDescriptor) -> Self {
        let river_polyline = sample_spline(&river.control_points, RIVER_SAMPLES_PER_SEGMENT);
        Self {
            river,
            river_polyline,
            lake,
        }
    }

    pub fn river(&self) -> &RiverDescriptor {
        &self.river
    }

    pub fn lake(&self) -> &LakeDescriptor {
        &self.lake
    }

    // -----------------------------------------------------------------------
    // Components
    // -----------------------------------------------------------------------

    pub fn noise(x: f32, z: f32) -> f32 {
        (x * 0.021).sin() * (z * 0.017).cos() * 1.6
            + ((x + z) * 0.043).sin() * 0.7
            + (x * 0.09 - z * 0.05).cos() * 0.3
            + (z * 0.031 + 1.3).sin() * 0.9
    }

    pub fn edge_rise(x: f32, z: f32) -> f32 {
        let d = (x * x + z * z).sqrt();
        smoothstep(EDGE_START, EDGE_END, d) * EDGE_HEIGHT
    }

    /// 0 inside the flat city bowl, 1 where noise is at full amplitude.
    pub fn noise_blend(x: f32, z: f32) -> f32 {
        let d = (x * x + z * z).sqrt();
        smoothstep(CITY_RADIUS, NOISE_FULL_RADIUS, d)
    }

    pub fn distance_to_river(&self, x: f32, z: f32) -> f32 {
        self.river_polyline
            .windows(2)
            .map(|w| distance_to_segment(x, z, &w[0], &w[1]))
            .fold(f32::INFINITY, f32::min)
    }

    pub fn river_cut(&self, x: f32, z: f32) -> f32 {
        let d = self.distance_to_river(x, z);
        if d >= self.river.half_width {
            return 0.0;
        }
        let t = d / self.river.half_width;
        self.river.depth * (1.0 - t * t)
    }

    pub fn lake_cut(&self, x: f32, z: f32) -> f32 {
        let dx = x - self.lake.center.x;
        let dz = z - self.lake.center.z;
        let d = (dx * dx + dz * dz).sqrt();
        if d >= self.lake.radius {
            return 0.0;
        }
        let t = d / self.lake.radius;
        self.lake.depth * (1.0 - t * t)
    }

    /// True inside the river or lake carve.
    pub fn is_wet(&self, x: f32, z: f32) -> bool {
        let dx = x - self.lake.center.x;
        let dz = z - self.lake.center.z;
        (dx * dx + dz * dz).sqrt() < self.lake.radius
            || self.distance_to_river(x, z) < self.river.half_width
    }

    fn mainland_height(&self, x: f32, z: f32) -> f32 {
        Self::noise(x, z) * Self::noise_blend(x, z) + Self::edge_rise(x, z)
            - self.river_cut(x, z)
            - self.lake_cut(x, z)
    }

    fn island_height(x: f32, z: f32) -> f32 {
        let dx = x - ISLAND_CENTER_X;
        let dz = z - ISLAND_CENTER_Z;
        let d = (dx * dx + dz * dz).sqrt();
        if d <= ISLAND_PLATEAU_RADIUS {
            return ISLAND_TOP;
        }
        let t = ((d - ISLAND_PLATEAU_RADIUS) / (ISLAND_BEACH_RADIUS - ISLAND_PLATEAU_RADIUS))
            .clamp(0.0, 1.0);
        ISLAND_TOP + (SEA_FLOOR - ISLAND_TOP) * t * t
    }
}

impl Default for IslandTerrain {
    fn default() -> Self {
        Self::new(RiverDescriptor::default(), LakeDescriptor::default())
    }
}

// ---------------------------------------------------------------------------
// TerrainSource impl
// ---------------------------------------------------------------------------

impl TerrainSource for IslandTerrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let coast = smoothstep(COAST_START, COAST_END, x.abs().max(z.abs()));
        let mainland = self.mainland_height(x, z);
        let shore = mainland + (SEA_FLOOR - mainland) * coast;
        shore.max(Self::island_height(x, z))
    }

    fn is_buildable(&self, x: f32, z: f32, max_slope: f32) -> bool {
        !self.is_wet(x, z) && self.slope_at(x, z) < max_slope
    }
}

/// Cosmetic sea-surface displacement at `(x, z)` after `t` seconds.
pub fn water_wave(x: f32, z: f32, t: f32) -> f32 {
    (x * 0.03 + t * 1.5).sin() * 0.5 + (z * 0.03 + t).cos() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_passes_through_control_points() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(20.0, 0.0, 10.0),
        ];
        let line = sample_spline(&pts, 4);
        assert_eq!(line.len(), 2 * 4 + 1);
        assert_eq!(line[0], pts[0]);
        assert!((line[4].x - 10.0).abs() < 1e-4);
        assert_eq!(*line.last().unwrap(), pts[2]);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 0.0, 0.0);
        assert!((distance_to_segment(5.0, 3.0, &a, &b) - 3.0).abs() < 1e-5);
        assert!((distance_to_segment(-4.0, 3.0, &a, &b) - 5.0).abs() < 1e-5);
    }
}
