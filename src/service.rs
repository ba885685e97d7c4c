//! SimulationService – owns the session state and runs the frame order.

use crate::agents::{AgentKind, AgentRoster, StepContext};
use crate::daynight::{DayNightCycle, EmissiveKind, LightingFrame};
use crate::error::{Result, SimError};
use crate::input::{Action, InputEvent, InputState};
use crate::interaction;
use crate::layout::default_town;
use crate::locomotion::{self, PlayerState, EYE_HEIGHT};
use crate::protocol::{
    AgentTransform, BoatPose, BoatSnapshot, Feedback, NearbyCollectible, PlayerPose, RenderFrame,
    RunSummary, SimSnapshot, TickEvents,
};
use crate::settings::Settings;
use crate::structure::World;
use crate::transit::BoatState;
use crate::types::{GameMode, SimConfig, SimStats, Vec3};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Fixed sub-step used by [`SimulationService::advance`].
pub const FIXED_STEP: f32 = 1.0 / 60.0;
/// Collectibles within this distance appear in the snapshot.
pub const NEARBY_RADIUS: f32 = 30.0;
/// Feedback messages kept for the UI before the oldest is dropped.
const FEEDBACK_CAPACITY: usize = 32;

const WINDOW_BASE_INTENSITY: f32 = 0.6;
const STREET_LAMP_BASE_INTENSITY: f32 = 1.0;
const HEADLIGHT_BASE_INTENSITY: f32 = 2.0;

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// Every piece of mutable session state. Steppers receive the parts they
/// touch by reference; nothing lives in globals.
pub struct GameState {
    pub mode: GameMode,
    pub player: PlayerState,
    pub input: InputState,
    pub boat: BoatState,
    pub agents: AgentRoster,
    pub daynight: DayNightCycle,
    /// Collectibles carried.
    pub collected: u32,
    pub delivered: u32,
    pub total: u32,
    /// Fill state of each delivery slot.
    pub slots: Vec<bool>,
    /// Collectibles stored in the chest.
    pub chest: usize,
    pub police_near: bool,
    pub feedback: VecDeque<Feedback>,
    pub last_feedback: Option<Feedback>,
    pub summary: Option<RunSummary>,
    pub elapsed: f64,
    pub tick: u64,
    pub rng: StdRng,
}

impl GameState {
    pub fn new(config: &SimConfig, settings: &Settings, world: &World) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (sx, sz) = world.landmarks.spawn;
        let mut player = PlayerState::spawn(Vec3::new(sx, world.terrain.height_at(sx, sz), sz));
        player.position.y = world.ground_level(sx, player.position.y, sz);
        player.refresh_structure_flags(world);

        let agents = AgentRoster::spawn(config, world, &mut rng);

        let mut daynight = DayNightCycle::new(config.day_length, config.start_phase);
        daynight.apply_settings(settings);
        for _ in world.structures.footprints() {
            daynight.register(EmissiveKind::Window, WINDOW_BASE_INTENSITY);
        }
        for _ in &world.landmarks.street_points {
            daynight.register(EmissiveKind::StreetLamp, STREET_LAMP_BASE_INTENSITY);
        }
        for agent in &agents.vehicles {
            if matches!(&agent.kind, AgentKind::Vehicle(v) if !v.parked) {
                daynight.register(EmissiveKind::VehicleLight, HEADLIGHT_BASE_INTENSITY);
            }
        }

        let total = config.total_collectibles;
        Self {
            mode: GameMode::Start,
            player,
            input: InputState::default(),
            boat: BoatState::moored_at_island(world),
            agents,
            daynight,
            collected: 0,
            delivered: 0,
            total,
            slots: vec![false; total as usize],
            chest: 0,
            police_near: false,
            feedback: VecDeque::new(),
            last_feedback: None,
            summary: None,
            elapsed: 0.0,
            tick: 0,
            rng,
        }
    }

    pub fn push_feedback(&mut self, feedback: Feedback) {
        if self.feedback.len() >= FEEDBACK_CAPACITY {
            self.feedback.pop_front();
        }
        self.last_feedback = Some(feedback.clone());
        self.feedback.push_back(feedback);
    }

    /// Enter a terminal mode and record the run summary.
    pub fn finish(&mut self, outcome: GameMode) {
        self.mode = outcome;
        self.input.release_all();
        let summary = RunSummary {
            outcome,
            delivered: self.delivered,
            total: self.total,
            elapsed_seconds: self.elapsed,
            boat_trips: self.boat.trips,
        };
        info!(
            "Session ended: {} ({}/{} delivered, {:.1}s)",
            outcome, summary.delivered, summary.total, summary.elapsed_seconds
        );
        self.summary = Some(summary);
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct SimulationService {
    config: SimConfig,
    settings: Settings,
    world: Arc<World>,
    state: GameState,
    lighting: LightingFrame,
    water_time: f32,
    /// Trigger actions currently held, so key repeat fires them once.
    held_triggers: Vec<Action>,
}

impl SimulationService {
    /// Build the default town for `config` and wait in [`GameMode::Start`].
    pub fn new(config: SimConfig, settings: Settings) -> Self {
        let world = Arc::new(default_town(&config));
        Self::with_world(config, settings, world)
    }

    pub fn with_world(config: SimConfig, settings: Settings, world: Arc<World>) -> Self {
        let state = GameState::new(&config, &settings, &world);
        let lighting = state.daynight.lighting();
        Self {
            config,
            settings,
            world,
            state,
            lighting,
            water_time: 0.0,
            held_triggers: Vec::new(),
        }
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.state.summary.as_ref()
    }

    /// Settings changed in the menu: re-read view distance, shadows and
    /// bindings.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.daynight.apply_settings(&settings);
        self.lighting = self.state.daynight.lighting();
        self.settings = settings;
    }

    // -----------------------------------------------------------------------
    // Session control
    // -----------------------------------------------------------------------

    /// Start a fresh session: counters, agents, boat and clock all return
    /// to their initial values and the mode becomes `Playing`. Pointer lock
    /// belongs to the input device and carries over.
    pub fn reset(&mut self) {
        let pointer_locked = self.state.input.pointer_locked;
        self.state = GameState::new(&self.config, &self.settings, &self.world);
        self.state.input.pointer_locked = pointer_locked;
        self.state.mode = GameMode::Playing;
        self.lighting = self.state.daynight.lighting();
        self.water_time = 0.0;
        self.held_triggers.clear();
        info!("Session started (seed {})", self.config.seed);
    }

    pub fn pause(&mut self) {
        if self.state.mode == GameMode::Playing {
            self.state.mode = GameMode::Paused;
            self.state.input.release_all();
            self.held_triggers.clear();
            debug!("Paused at tick {}", self.state.tick);
        }
    }

    pub fn resume(&mut self) {
        if self.state.mode == GameMode::Paused {
            self.state.mode = GameMode::Playing;
            debug!("Resumed at tick {}", self.state.tick);
        }
    }

    // -----------------------------------------------------------------------
    // Main tick
    // -----------------------------------------------------------------------

    /// Advance one frame of `dt` seconds.
    ///
    /// Frame order: day-night → player → boat → police → collectibles →
    /// civilians → animals → vehicles → sea life → water. Outside `Playing`
    /// nothing moves, the clock included.
    pub fn tick(&mut self, dt: f32) -> TickEvents {
        if self.state.mode != GameMode::Playing {
            return TickEvents {
                tick: self.state.tick,
                ..TickEvents::default()
            };
        }

        let state = &mut self.state;
        let world = self.world.as_ref();
        state.tick += 1;
        state.elapsed += f64::from(dt);
        let elapsed = state.elapsed as f32;
        let mut feedback = Vec::new();

        self.lighting = state.daynight.update(dt);
        let sky_regenerated = self.lighting.sky.is_some();

        if !state.player.on_boat {
            locomotion::step(&mut state.player, &state.input, world, dt, elapsed);
        }

        if let Some(fb) = state.boat.step(&mut state.player, world, dt, elapsed) {
            feedback.push(fb);
        }

        let ctx = StepContext {
            world,
            player: &state.player,
            carrying: state.collected,
            dt,
            elapsed,
        };
        let outcome = state.agents.step(&ctx, &mut state.rng);
        state.police_near = outcome.police_near;

        self.water_time = elapsed;

        for fb in &feedback {
            state.push_feedback(fb.clone());
        }
        let mut summary = None;
        if outcome.captured {
            state.finish(GameMode::GameOver);
            state.push_feedback(Feedback::Caught);
            feedback.push(Feedback::Caught);
            summary = state.summary.clone();
        }

        trace!(
            "Tick {} player={} boat={}",
            state.tick,
            state.player.position,
            state.boat.phase
        );
        TickEvents {
            tick: state.tick,
            feedback,
            summary,
            sky_regenerated,
        }
    }

    /// Advance by `duration` in fixed 1/60 s sub-steps. Stops early once
    /// the session ends. Returns every feedback message produced.
    pub fn advance(&mut self, duration: Duration) -> Vec<Feedback> {
        let steps = (duration.as_secs_f64() / f64::from(FIXED_STEP)).round() as u64;
        let mut feedback = Vec::new();
        for _ in 0..steps {
            if self.state.mode != GameMode::Playing {
                break;
            }
            feedback.extend(self.tick(FIXED_STEP).feedback);
        }
        feedback
    }

    // -----------------------------------------------------------------------
    // Input & actions
    // -----------------------------------------------------------------------

    /// Apply one input event. Trigger actions fire once per key press.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<Feedback> {
        match event {
            InputEvent::KeyDown { code } => {
                let Some(action) = self.settings.key_bindings.action_for(&code) else {
                    return Vec::new();
                };
                if !action.is_trigger() {
                    if self.state.mode == GameMode::Playing {
                        self.state.input.set(action, true);
                    }
                    return Vec::new();
                }
                if self.held_triggers.contains(&action) {
                    return Vec::new();
                }
                self.held_triggers.push(action);
                match action {
                    Action::Jump => {
                        self.jump();
                        Vec::new()
                    }
                    Action::Interact => self.interact(),
                    Action::Chest => self.use_chest().into_iter().collect(),
                    _ => Vec::new(),
                }
            }
            InputEvent::KeyUp { code } => {
                if let Some(action) = self.settings.key_bindings.action_for(&code) {
                    self.held_triggers.retain(|a| *a != action);
                    self.state.input.set(action, false);
                }
                Vec::new()
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.state.mode == GameMode::Playing && self.state.input.pointer_locked {
                    locomotion::look(
                        &mut self.state.player,
                        dx,
                        dy,
                        self.settings.mouse_scale(),
                        self.settings.invert_y,
                    );
                }
                Vec::new()
            }
            InputEvent::PointerLock { locked } => {
                self.state.input.pointer_locked = locked;
                if !locked {
                    self.pause();
                }
                Vec::new()
            }
        }
    }

    pub fn interact(&mut self) -> Vec<Feedback> {
        interaction::interact(&mut self.state, &self.world)
    }

    pub fn use_chest(&mut self) -> Option<Feedback> {
        interaction::use_chest(&mut self.state, &self.world)
    }

    pub fn jump(&mut self) -> bool {
        locomotion::jump(&mut self.state.player, self.state.mode)
    }

    /// Drain queued feedback, oldest first.
    pub fn take_feedback(&mut self) -> Vec<Feedback> {
        self.state.feedback.drain(..).collect()
    }

    // -----------------------------------------------------------------------
    // Debug hooks
    // -----------------------------------------------------------------------

    /// Place the player's feet on the ground at `(x, z)`.
    pub fn teleport_player(&mut self, x: f32, z: f32) {
        let player = &mut self.state.player;
        let terrain_y = self.world.terrain.height_at(x, z);
        player.position = Vec3::new(x, self.world.ground_level(x, terrain_y, z), z);
        player.airborne = false;
        player.vertical_velocity = 0.0;
        player.refresh_structure_flags(&self.world);
        debug!("Teleported player to {}", player.position);
    }

    /// Move collectible `index` to `(x, z)` and make it linger there.
    pub fn place_collectible(&mut self, index: usize, x: f32, z: f32) -> Result<()> {
        let world = &self.world;
        let agent = self
            .state
            .agents
            .collectibles
            .get_mut(index)
            .ok_or(SimError::UnknownAgent {
                kind: "collectible",
                index,
            })?;
        if let AgentKind::Collectible(c) = &mut agent.kind {
            c.target = (x, z);
        }
        agent.pose.position = Vec3::new(
            x,
            world.terrain.height_at(x, z) + crate::agents::COLLECTIBLE_HOVER,
            z,
        );
        Ok(())
    }

    /// Move officer `index` to `(x, z)` and point its patrol there.
    pub fn place_police(&mut self, index: usize, x: f32, z: f32) -> Result<()> {
        let world = &self.world;
        let agent = self
            .state
            .agents
            .police
            .get_mut(index)
            .ok_or(SimError::UnknownAgent {
                kind: "police",
                index,
            })?;
        if let AgentKind::Police(p) = &mut agent.kind {
            p.patrol_target = (x, z);
        }
        agent.pose.position = Vec3::new(x, world.terrain.height_at(x, z), z);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Snapshot & render output
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> SimSnapshot {
        let state = &self.state;
        let player = &state.player;

        let mut nearby: Vec<NearbyCollectible> = state
            .agents
            .collectibles
            .iter()
            .enumerate()
            .filter(|(_, a)| a.as_collectible().is_some_and(|c| c.available()))
            .map(|(index, a)| NearbyCollectible {
                index,
                distance: a.pose.position.planar_distance(&player.position),
            })
            .filter(|n| n.distance < NEARBY_RADIUS)
            .collect();
        nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        SimSnapshot {
            tick: state.tick,
            elapsed_seconds: state.elapsed,
            mode: state.mode,
            player_position: player.position,
            yaw: player.yaw,
            pitch: player.pitch,
            eye_height: EYE_HEIGHT,
            stamina: player.stamina,
            on_boat: player.on_boat,
            inside_house: player.inside_house,
            inside_villa: player.inside_villa,
            day_phase: state.daynight.phase(),
            collected: state.collected,
            delivered: state.delivered,
            total: state.total,
            chest: state.chest,
            boat: BoatSnapshot {
                phase: state.boat.phase,
                position: state.boat.position,
            },
            nearby_collectibles: nearby,
            police_near: state.police_near,
            hint: interaction::hint(state, &self.world),
            last_feedback: state.last_feedback.as_ref().map(|f| f.to_string()),
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Hex md5 of the JSON snapshot; equal digests mean equal runs.
    pub fn snapshot_digest(&self) -> Result<String> {
        let json = self.snapshot_json()?;
        Ok(format!("{:x}", md5::compute(json.as_bytes())))
    }

    pub fn frame(&self) -> RenderFrame {
        let state = &self.state;
        let agents = state
            .agents
            .iter()
            .map(|a| {
                let (animation, visible) = match &a.kind {
                    AgentKind::Collectible(c) => (0.0, c.available()),
                    AgentKind::Civilian(c) => (c.limb_swing, true),
                    AgentKind::Bird(b) => (b.wing_angle, true),
                    AgentKind::Vehicle(v) => (v.wheel_rotation, true),
                    _ => (0.0, true),
                };
                AgentTransform {
                    id: a.id,
                    kind: a.kind.label().to_string(),
                    pose: a.pose,
                    animation,
                    visible,
                }
            })
            .collect();

        RenderFrame {
            tick: state.tick,
            player: PlayerPose {
                eye: state.player.eye_position(),
                yaw: state.player.yaw,
                pitch: state.player.pitch,
                carrying_bag: state.collected > 0,
            },
            boat: BoatPose {
                position: state.boat.position,
                rotation_x: state.boat.rotation_x,
                rotation_z: state.boat.rotation_z,
            },
            agents,
            lighting: self.lighting.clone(),
            slots: state.slots.clone(),
            water_time: self.water_time,
        }
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            total_ticks: self.state.tick,
            elapsed_seconds: self.state.elapsed as f32,
            agents: self.state.agents.len(),
            sky_regenerations: self.state.daynight.sky_regenerations(),
            boat_trips: self.state.boat.trips,
        }
    }
}
