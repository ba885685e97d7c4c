//! Day/Night Cycle
//!
//! One scalar clock, wrapped by the day length into a phase in `[0, 1)`.
//! Phase 0 is midnight, 0.25 sunrise, 0.5 noon, 0.75 sunset. Every light,
//! fog, exposure and emissive value is a pure function of the phase; the
//! only other state is the throttle on sky-gradient regeneration and the
//! registered emissive records.

use crate::settings::Settings;
use crate::types::{hex_rgb, lerp, lerp_rgb, smoothstep, Rgb, Vec3};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Sky gradient is rebuilt only once the sun height moved this much.
pub const SKY_REGEN_THRESHOLD: f32 = 0.02;
/// Below this day blend, windows and lamps count as lit.
pub const DARK_THRESHOLD: f32 = 0.35;

const SUN_DAY: Rgb = hex_rgb(0xfff5e6);
const SUN_NIGHT: Rgb = hex_rgb(0x8fa6d6);
const SUN_SUNSET: Rgb = hex_rgb(0xff9a4d);
const FILL_DAY: Rgb = hex_rgb(0x8899cc);
const FILL_NIGHT: Rgb = hex_rgb(0x223355);
const AMBIENT_DAY: Rgb = hex_rgb(0x404050);
const AMBIENT_NIGHT: Rgb = hex_rgb(0x101828);
const HEMI_SKY_DAY: Rgb = hex_rgb(0x87ceeb);
const HEMI_SKY_NIGHT: Rgb = hex_rgb(0x0b1026);
const HEMI_SKY_SUNSET: Rgb = hex_rgb(0xffb070);
const HEMI_GROUND_DAY: Rgb = hex_rgb(0x4a7c4a);
const HEMI_GROUND_NIGHT: Rgb = hex_rgb(0x0a140a);
const FOG_DAY: Rgb = hex_rgb(0xa8c8e8);
const FOG_NIGHT: Rgb = hex_rgb(0x0a0f1e);
const FOG_SUNSET: Rgb = hex_rgb(0xe8a070);
const WATER_DAY: Rgb = hex_rgb(0x006994);
const WATER_NIGHT: Rgb = hex_rgb(0x02182a);
const ZENITH_DAY: Rgb = hex_rgb(0x3a7bd5);
const ZENITH_NIGHT: Rgb = hex_rgb(0x02040c);

// ---------------------------------------------------------------------------
// Pure phase functions
// ---------------------------------------------------------------------------

pub fn phase_at(elapsed: f64, day_length: f64) -> f32 {
    (elapsed.rem_euclid(day_length) / day_length) as f32
}

pub fn sun_angle(phase: f32) -> f32 {
    phase * TAU - FRAC_PI_2
}

pub fn sun_height(phase: f32) -> f32 {
    sun_angle(phase).sin()
}

/// 0 at night, 1 in full daylight.
pub fn day_blend(sun_height: f32) -> f32 {
    smoothstep(-0.08, 0.35, sun_height)
}

/// Peaks at sunrise and sunset.
pub fn warm_blend(sun_height: f32) -> f32 {
    (1.0 - 2.2 * sun_height.abs()).max(0.0)
}

// ---------------------------------------------------------------------------
// Emissive records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissiveKind {
    StreetLamp,
    Window,
    VehicleLight,
}

/// A light or emissive material registered at world-build time. `base` is
/// the designer-authored value; `current` is rewritten from it every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissiveRecord {
    pub kind: EmissiveKind,
    pub base: f32,
    pub current: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmissiveHandle(usize);

// ---------------------------------------------------------------------------
// Per-frame output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
    pub casts_shadows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyGradient {
    pub zenith: Rgb,
    pub horizon: Rgb,
    /// Strength of the warm glow around the sun.
    pub sun_glow: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingFrame {
    pub phase: f32,
    pub sun_height: f32,
    pub day_blend: f32,
    pub warm_blend: f32,
    pub is_dark: bool,
    pub sun: DirectionalLight,
    pub fill: DirectionalLight,
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub hemisphere_sky: Rgb,
    pub hemisphere_ground: Rgb,
    pub hemisphere_intensity: f32,
    pub fog_color: Rgb,
    pub fog_density: f32,
    pub fog_far: f32,
    pub exposure: f32,
    pub water_color: Rgb,
    pub street_lamp_multiplier: f32,
    pub window_multiplier: f32,
    pub vehicle_light_multiplier: f32,
    /// Set only on frames where the sky texture must be rebuilt.
    pub sky: Option<SkyGradient>,
}

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DayNightCycle {
    elapsed: f64,
    day_length: f64,
    emissives: Vec<EmissiveRecord>,
    last_sky_height: Option<f32>,
    sky_regenerations: u64,
    shadows: bool,
    view_distance: f32,
}

impl DayNightCycle {
    pub fn new(day_length: f32, start_phase: f32) -> Self {
        let day_length = f64::from(day_length);
        Self {
            elapsed: f64::from(start_phase) * day_length,
            day_length,
            emissives: Vec::new(),
            last_sky_height: None,
            sky_regenerations: 0,
            shadows: true,
            view_distance: 500.0,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.shadows = settings.shadows;
        self.view_distance = settings.view_distance;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn day_length(&self) -> f32 {
        self.day_length as f32
    }

    pub fn phase(&self) -> f32 {
        phase_at(self.elapsed, self.day_length)
    }

    pub fn sky_regenerations(&self) -> u64 {
        self.sky_regenerations
    }

    pub fn register(&mut self, kind: EmissiveKind, base: f32) -> EmissiveHandle {
        self.emissives.push(EmissiveRecord {
            kind,
            base,
            current: base,
        });
        EmissiveHandle(self.emissives.len() - 1)
    }

    pub fn emissive(&self, handle: EmissiveHandle) -> Option<&EmissiveRecord> {
        self.emissives.get(handle.0)
    }

    pub fn emissives(&self) -> &[EmissiveRecord] {
        &self.emissives
    }

    /// Advance the clock by `dt` seconds and compute this frame's lighting.
    pub fn update(&mut self, dt: f32) -> LightingFrame {
        self.elapsed += f64::from(dt);
        let mut frame = self.lighting();

        for rec in &mut self.emissives {
            let multiplier = match rec.kind {
                EmissiveKind::StreetLamp => frame.street_lamp_multiplier,
                EmissiveKind::Window => frame.window_multiplier,
                EmissiveKind::VehicleLight => frame.vehicle_light_multiplier,
            };
            rec.current = rec.base * multiplier;
        }

        let regenerate = self
            .last_sky_height
            .map_or(true, |last| (frame.sun_height - last).abs() > SKY_REGEN_THRESHOLD);
        if regenerate {
            self.last_sky_height = Some(frame.sun_height);
            self.sky_regenerations += 1;
            frame.sky = Some(sky_gradient(frame.day_blend, frame.warm_blend));
            debug!(
                "Sky regenerated at phase {:.3} (sun height {:.3})",
                frame.phase, frame.sun_height
            );
        }

        trace!("Lighting phase={:.4} day={:.3}", frame.phase, frame.day_blend);
        frame
    }

    /// Lighting for the current clock without advancing it.
    pub fn lighting(&self) -> LightingFrame {
        let phase = self.phase();
        let angle = sun_angle(phase);
        let sh = angle.sin();
        let day = day_blend(sh);
        let warm = warm_blend(sh);

        let sun_color = lerp_rgb(lerp_rgb(SUN_NIGHT, SUN_DAY, day), SUN_SUNSET, warm * 0.8);
        let sun = DirectionalLight {
            color: sun_color,
            intensity: lerp(0.15, 1.5, day),
            position: Vec3::new(angle.cos() * 300.0, sh.abs() * 300.0 + 20.0, 100.0),
            casts_shadows: self.shadows,
        };
        let fill = DirectionalLight {
            color: lerp_rgb(FILL_NIGHT, FILL_DAY, day),
            intensity: lerp(0.1, 0.4, day),
            position: Vec3::new(-100.0, 100.0, -50.0),
            casts_shadows: false,
        };

        LightingFrame {
            phase,
            sun_height: sh,
            day_blend: day,
            warm_blend: warm,
            is_dark: day < DARK_THRESHOLD,
            sun,
            fill,
            ambient_color: lerp_rgb(AMBIENT_NIGHT, AMBIENT_DAY, day),
            ambient_intensity: lerp(0.25, 0.5, day),
            hemisphere_sky: lerp_rgb(
                lerp_rgb(HEMI_SKY_NIGHT, HEMI_SKY_DAY, day),
                HEMI_SKY_SUNSET,
                warm * 0.5,
            ),
            hemisphere_ground: lerp_rgb(HEMI_GROUND_NIGHT, HEMI_GROUND_DAY, day),
            hemisphere_intensity: lerp(0.2, 0.6, day),
            fog_color: lerp_rgb(lerp_rgb(FOG_NIGHT, FOG_DAY, day), FOG_SUNSET, warm * 0.6),
            fog_density: lerp(0.004, 0.0015, day),
            fog_far: self.view_distance,
            exposure: lerp(0.7, 1.1, day),
            water_color: lerp_rgb(WATER_NIGHT, WATER_DAY, day),
            street_lamp_multiplier: 1.0 - day,
            window_multiplier: lerp(1.0, 0.15, day),
            vehicle_light_multiplier: lerp(1.0, 0.2, day),
            sky: None,
        }
    }
}

fn sky_gradient(day: f32, warm: f32) -> SkyGradient {
    SkyGradient {
        zenith: lerp_rgb(ZENITH_NIGHT, ZENITH_DAY, day),
        horizon: lerp_rgb(lerp_rgb(FOG_NIGHT, FOG_DAY, day), SUN_SUNSET, warm),
        sun_glow: warm,
    }
}
