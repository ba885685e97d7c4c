//! Collision gate: point-with-margin tests against building footprints.
//!
//! The player's extent is treated as its bounding square rather than a true
//! circle; at a few dozen footprints a linear scan is all we need.

use crate::structure::Footprint;

/// Horizontal extent of the player.
pub const PLAYER_RADIUS: f32 = 1.0;

pub struct CollisionGate<'a> {
    footprints: &'a [Footprint],
    radius: f32,
}

impl<'a> CollisionGate<'a> {
    pub fn new(footprints: &'a [Footprint]) -> Self {
        Self::with_radius(footprints, PLAYER_RADIUS)
    }

    pub fn with_radius(footprints: &'a [Footprint], radius: f32) -> Self {
        Self { footprints, radius }
    }

    /// True when the player centred at `(x, z)` would overlap any footprint.
    pub fn collides(&self, x: f32, z: f32) -> bool {
        self.blocking(x, z).is_some()
    }

    /// The first footprint the player centred at `(x, z)` would overlap.
    pub fn blocking(&self, x: f32, z: f32) -> Option<&'a Footprint> {
        let r = self.radius;
        self.footprints.iter().find(|f| {
            x + r > f.rect.min_x
                && x - r < f.rect.max_x
                && z + r > f.rect.min_z
                && z - r < f.rect.max_z
        })
    }

    /// Axis-separated slide from `(x, z)` towards `(new_x, new_z)`: the full
    /// move, else X only, else Z only, else stay put.
    pub fn resolve(&self, x: f32, z: f32, new_x: f32, new_z: f32) -> (f32, f32) {
        if !self.collides(new_x, new_z) {
            (new_x, new_z)
        } else if !self.collides(new_x, z) {
            (new_x, z)
        } else if !self.collides(x, new_z) {
            (x, new_z)
        } else {
            (x, z)
        }
    }
}
