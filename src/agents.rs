//! Agent Steppers
//!
//! Every non-player actor is an [`Agent`]: an id, a pose and an
//! [`AgentKind`] carrying only the data its behaviour needs. The roster
//! keeps one list per group and steps the groups in a fixed order:
//!
//! police → collectibles → civilians → animals → vehicles → sea life
//!
//! Lists never reference each other; the only cross-group output is the
//! [`StepOutcome`] produced by the police.

use crate::locomotion::PlayerState;
use crate::structure::World;
use crate::types::{planar_heading, Pose, SimConfig, Vec3};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

// Collectibles
pub const COLLECTIBLE_SPEED: f32 = 1.2;
/// Chance per second of picking a fresh target before arriving.
pub const COLLECTIBLE_RETARGET_RATE: f32 = 0.18;
pub const COLLECTIBLE_ARRIVAL: f32 = 3.0;
pub const COLLECTIBLE_HOVER: f32 = 1.0;
pub const COLLECTIBLE_BOB: f32 = 0.4;

// Civilians
/// Walk-cycle radians per second.
pub const WALK_CYCLE_RATE: f32 = 9.0;
pub const CIVILIAN_ARRIVAL: f32 = 2.0;
const CIVILIAN_STEP_BOB: f32 = 0.05;
const CIVILIAN_LIMB_SWING: f32 = 0.5;

// Police
pub const PURSUIT_MULTIPLIER: f32 = 2.5;
pub const CAPTURE_RADIUS: f32 = 2.0;
pub const POLICE_NEAR_RADIUS: f32 = 20.0;
pub const PATROL_ARRIVAL: f32 = 2.0;
pub const PATROL_EXTENT: f32 = 150.0;

// Animals
pub const ANIMAL_RETARGET_RATE: f32 = 0.3;
const ANIMAL_STOP_DISTANCE: f32 = 1.0;
/// Orbit radians per second.
pub const BIRD_ORBIT_RATE: f32 = 0.6;

// Vehicles
pub const ROAD_WRAP: f32 = 200.0;
pub const LANE_OFFSET: f32 = 3.0;
const PARKED_OFFSET: f32 = 7.0;
pub const TURN_PROBABILITY: f32 = 0.3;
/// Seconds before a vehicle may consider another intersection.
pub const TURN_COOLDOWN: f32 = 3.0;
const WHEEL_SPIN_FACTOR: f32 = 0.3;

// Sea
/// Radial band around the world origin where boats and sea life roam.
pub const SEA_INNER_RADIUS: f32 = 340.0;
pub const SEA_OUTER_RADIUS: f32 = 450.0;
const DECORATIVE_BOAT_SPEED: f32 = 3.0;

// ---------------------------------------------------------------------------
// Agent data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Police {
    pub speed: f32,
    pub patrol_target: (f32, f32),
    pub pursuing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collectible {
    pub speed: f32,
    pub target: (f32, f32),
    pub bob_phase: f32,
    pub collected: bool,
    pub visible: bool,
}

impl Collectible {
    pub fn available(&self) -> bool {
        self.visible && !self.collected
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Civilian {
    pub speed: f32,
    pub target: (f32, f32),
    pub walk_phase: f32,
    /// Arm/leg swing angle for the renderer.
    pub limb_swing: f32,
}

/// Dogs and cats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    pub speed: f32,
    pub target: (f32, f32),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bird {
    pub swarm_center: (f32, f32),
    pub radius: f32,
    pub angle: f32,
    pub fly_height: f32,
    pub wing_angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Z,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub axis: Axis,
    /// `+1.0` or `-1.0` along `axis`.
    pub direction: f32,
    /// Road centre line the vehicle drives along.
    pub road: f32,
    pub speed: f32,
    pub turn_cooldown: f32,
    pub wheel_rotation: f32,
    pub parked: bool,
}

impl Vehicle {
    /// Perpendicular offset from the road centre: keep right.
    pub fn lane(&self) -> f32 {
        if self.parked {
            PARKED_OFFSET
        } else {
            LANE_OFFSET * self.direction
        }
    }

    fn heading(&self) -> f32 {
        match (self.axis, self.direction > 0.0) {
            (Axis::X, true) => FRAC_PI_2,
            (Axis::X, false) => -FRAC_PI_2,
            (Axis::Z, true) => 0.0,
            (Axis::Z, false) => PI,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeaCreature {
    pub shark: bool,
    pub center: (f32, f32),
    pub radius: f32,
    pub angle: f32,
    /// Radians per second; negative orbits clockwise.
    pub angular_speed: f32,
    pub depth: f32,
    pub wobble_phase: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecorativeBoat {
    pub heading: f32,
    pub speed: f32,
    pub drift_phase: f32,
    /// Seconds until the heading is re-randomised.
    pub retarget_timer: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentKind {
    Police(Police),
    Collectible(Collectible),
    Civilian(Civilian),
    Dog(Animal),
    Cat(Animal),
    Bird(Bird),
    Vehicle(Vehicle),
    FishOrShark(SeaCreature),
    DecorativeBoat(DecorativeBoat),
}

impl AgentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AgentKind::Police(_) => "police",
            AgentKind::Collectible(_) => "collectible",
            AgentKind::Civilian(_) => "civilian",
            AgentKind::Dog(_) => "dog",
            AgentKind::Cat(_) => "cat",
            AgentKind::Bird(_) => "bird",
            AgentKind::Vehicle(_) => "vehicle",
            AgentKind::FishOrShark(c) if c.shark => "shark",
            AgentKind::FishOrShark(_) => "fish",
            AgentKind::DecorativeBoat(_) => "decorative_boat",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub id: usize,
    pub pose: Pose,
    pub kind: AgentKind,
}

impl Agent {
    pub fn as_collectible(&self) -> Option<&Collectible> {
        match &self.kind {
            AgentKind::Collectible(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collectible_mut(&mut self) -> Option<&mut Collectible> {
        match &mut self.kind {
            AgentKind::Collectible(c) => Some(c),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Stepping context
// ---------------------------------------------------------------------------

/// Read-only view of the frame the steppers run in.
pub struct StepContext<'a> {
    pub world: &'a World,
    pub player: &'a PlayerState,
    pub carrying: u32,
    pub dt: f32,
    pub elapsed: f32,
}

impl StepContext<'_> {
    fn player_on_mainland(&self) -> bool {
        self.player.position.x < self.world.landmarks.mainland_edge_x
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// An officer reached the player while pursuing.
    pub captured: bool,
    /// An officer is close to the player on the mainland.
    pub police_near: bool,
}

fn random_point(rng: &mut StdRng, extent: f32) -> (f32, f32) {
    (rng.gen_range(-extent..extent), rng.gen_range(-extent..extent))
}

/// Move `pose` towards `target` by `speed * dt`, facing the travel
/// direction. Returns the remaining distance before the move.
fn seek(pose: &mut Pose, target: (f32, f32), speed: f32, dt: f32) -> f32 {
    let goal = Vec3::new(target.0, pose.position.y, target.1);
    let (dx, dz, dist) = planar_heading(&pose.position, &goal);
    if dist > 0.0 {
        let travel = (speed * dt).min(dist);
        pose.position.x += dx * travel;
        pose.position.z += dz * travel;
        pose.rotation_y = dx.atan2(dz);
    }
    dist
}

fn clamp_square(pose: &mut Pose, half: f32) {
    pose.position.x = pose.position.x.clamp(-half, half);
    pose.position.z = pose.position.z.clamp(-half, half);
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentRoster {
    pub police: Vec<Agent>,
    pub collectibles: Vec<Agent>,
    pub civilians: Vec<Agent>,
    /// Dogs, cats and birds.
    pub animals: Vec<Agent>,
    pub vehicles: Vec<Agent>,
    /// Fish, sharks and decorative boats.
    pub sea_life: Vec<Agent>,
}

impl AgentRoster {
    /// Populate every group from `config` counts.
    pub fn spawn(config: &SimConfig, world: &World, rng: &mut StdRng) -> Self {
        let mut roster = Self::default();
        let mut next_id = 0usize;
        let mut make = |pose: Pose, kind: AgentKind| {
            next_id += 1;
            Agent {
                id: next_id - 1,
                pose,
                kind,
            }
        };
        let ground = |x: f32, z: f32| world.terrain.height_at(x, z);
        let half = world.landmarks.city_half_extent;

        for _ in 0..config.police_count {
            let (x, z) = random_point(rng, PATROL_EXTENT);
            let police = Police {
                speed: rng.gen_range(3.0..4.8),
                patrol_target: random_point(rng, PATROL_EXTENT),
                pursuing: false,
            };
            roster
                .police
                .push(make(Pose::at(x, ground(x, z), z), AgentKind::Police(police)));
        }

        for _ in 0..config.total_collectibles {
            let (x, z) = random_point(rng, half);
            let c = Collectible {
                speed: COLLECTIBLE_SPEED,
                target: random_point(rng, half),
                bob_phase: rng.gen_range(0.0..TAU),
                collected: false,
                visible: true,
            };
            let y = ground(x, z) + COLLECTIBLE_HOVER;
            roster
                .collectibles
                .push(make(Pose::at(x, y, z), AgentKind::Collectible(c)));
        }

        let streets = &world.landmarks.street_points;
        let pick_street = |rng: &mut StdRng| -> (f32, f32) {
            if streets.is_empty() {
                (0.0, 0.0)
            } else {
                streets[rng.gen_range(0..streets.len())]
            }
        };
        for _ in 0..config.civilian_count {
            let (x, z) = pick_street(rng);
            let civ = Civilian {
                speed: rng.gen_range(1.8..3.0),
                target: pick_street(rng),
                walk_phase: rng.gen_range(0.0..TAU),
                limb_swing: 0.0,
            };
            roster
                .civilians
                .push(make(Pose::at(x, ground(x, z), z), AgentKind::Civilian(civ)));
        }

        for _ in 0..config.dog_count {
            let (x, z) = random_point(rng, half);
            let dog = Animal {
                speed: rng.gen_range(3.0..4.8),
                target: random_point(rng, half),
            };
            roster
                .animals
                .push(make(Pose::at(x, ground(x, z), z), AgentKind::Dog(dog)));
        }
        for _ in 0..config.cat_count {
            let (x, z) = random_point(rng, half);
            let cat = Animal {
                speed: rng.gen_range(2.4..3.6),
                target: random_point(rng, half),
            };
            roster
                .animals
                .push(make(Pose::at(x, ground(x, z), z), AgentKind::Cat(cat)));
        }
        for _ in 0..config.bird_count {
            let bird = Bird {
                swarm_center: random_point(rng, PATROL_EXTENT),
                radius: rng.gen_range(20.0..50.0),
                angle: rng.gen_range(0.0..TAU),
                fly_height: rng.gen_range(30.0..50.0),
                wing_angle: 0.0,
            };
            let (cx, cz) = bird.swarm_center;
            let pose = Pose::at(
                cx + bird.angle.cos() * bird.radius,
                bird.fly_height,
                cz + bird.angle.sin() * bird.radius,
            );
            roster.animals.push(make(pose, AgentKind::Bird(bird)));
        }

        let roads = &world.landmarks.roads;
        for i in 0..config.vehicle_count + config.parked_vehicle_count {
            if roads.is_empty() {
                break;
            }
            let parked = i >= config.vehicle_count;
            let vehicle = Vehicle {
                axis: if rng.gen_bool(0.5) { Axis::X } else { Axis::Z },
                direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
                road: roads[rng.gen_range(0..roads.len())],
                speed: if parked { 0.0 } else { rng.gen_range(9.0..15.0) },
                turn_cooldown: 0.0,
                wheel_rotation: 0.0,
                parked,
            };
            let along = rng.gen_range(-180.0..180.0);
            let pose = vehicle_pose(&vehicle, along, world);
            roster.vehicles.push(make(pose, AgentKind::Vehicle(vehicle)));
        }

        for i in 0..config.sea_creature_count {
            let center = random_sea_point(rng);
            let creature = SeaCreature {
                shark: i % 4 == 0,
                center,
                radius: rng.gen_range(5.0..15.0),
                angle: rng.gen_range(0.0..TAU),
                angular_speed: rng.gen_range(0.3..0.9) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
                depth: if i % 4 == 0 { -0.8 } else { -1.5 },
                wobble_phase: rng.gen_range(0.0..TAU),
            };
            let pose = Pose::at(center.0 + creature.radius, creature.depth, center.1);
            roster
                .sea_life
                .push(make(pose, AgentKind::FishOrShark(creature)));
        }
        for _ in 0..config.decorative_boat_count {
            let (x, z) = random_sea_point(rng);
            let boat = DecorativeBoat {
                heading: rng.gen_range(0.0..TAU),
                speed: DECORATIVE_BOAT_SPEED,
                drift_phase: rng.gen_range(0.0..TAU),
                retarget_timer: rng.gen_range(10.0..20.0),
            };
            roster
                .sea_life
                .push(make(Pose::at(x, 0.0, z), AgentKind::DecorativeBoat(boat)));
        }

        debug!(
            "Spawned {} agents ({} police, {} collectibles)",
            roster.len(),
            roster.police.len(),
            roster.collectibles.len()
        );
        roster
    }

    pub fn len(&self) -> usize {
        self.groups().map(|g| g.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every group in stepping order.
    pub fn groups(&self) -> impl Iterator<Item = &Vec<Agent>> {
        [
            &self.police,
            &self.collectibles,
            &self.civilians,
            &self.animals,
            &self.vehicles,
            &self.sea_life,
        ]
        .into_iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.groups().flatten()
    }

    /// Step every group once, in order.
    pub fn step(&mut self, ctx: &StepContext<'_>, rng: &mut StdRng) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        for agent in &mut self.police {
            step_police(agent, ctx, rng, &mut outcome);
        }
        for agent in &mut self.collectibles {
            step_collectible(agent, ctx, rng);
        }
        for agent in &mut self.civilians {
            step_civilian(agent, ctx, rng);
        }
        for agent in &mut self.animals {
            step_animal(agent, ctx, rng);
        }
        for agent in &mut self.vehicles {
            step_vehicle(agent, ctx, rng);
        }
        for agent in &mut self.sea_life {
            step_sea_life(agent, ctx, rng);
        }
        if outcome.captured {
            info!("Player captured by police");
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Steppers
// ---------------------------------------------------------------------------

pub fn step_police(
    agent: &mut Agent,
    ctx: &StepContext<'_>,
    rng: &mut StdRng,
    outcome: &mut StepOutcome,
) {
    let AgentKind::Police(police) = &mut agent.kind else {
        return;
    };
    let player = &ctx.player.position;
    let on_mainland = ctx.player_on_mainland();
    let pursue = on_mainland && ctx.carrying > 0 && !ctx.player.on_boat;
    police.pursuing = pursue;

    if pursue {
        if agent.pose.position.planar_distance(player) < CAPTURE_RADIUS {
            outcome.captured = true;
        }
        seek(
            &mut agent.pose,
            (player.x, player.z),
            police.speed * PURSUIT_MULTIPLIER,
            ctx.dt,
        );
        if agent.pose.position.planar_distance(player) < CAPTURE_RADIUS {
            outcome.captured = true;
        }
    } else {
        let remaining = seek(&mut agent.pose, police.patrol_target, police.speed, ctx.dt);
        if remaining < PATROL_ARRIVAL {
            police.patrol_target = random_point(rng, PATROL_EXTENT);
        }
    }

    clamp_square(&mut agent.pose, ctx.world.landmarks.mainland_half_extent);
    let (x, z) = (agent.pose.position.x, agent.pose.position.z);
    agent.pose.position.y = ctx.world.terrain.height_at(x, z);

    if on_mainland && agent.pose.position.planar_distance(player) < POLICE_NEAR_RADIUS {
        outcome.police_near = true;
    }
}

pub fn step_collectible(agent: &mut Agent, ctx: &StepContext<'_>, rng: &mut StdRng) {
    let AgentKind::Collectible(c) = &mut agent.kind else {
        return;
    };
    if !c.available() {
        return;
    }
    let half = ctx.world.landmarks.city_half_extent;
    let remaining = seek(&mut agent.pose, c.target, c.speed, ctx.dt);
    let bored = rng.gen::<f32>() < COLLECTIBLE_RETARGET_RATE * ctx.dt;
    if remaining < COLLECTIBLE_ARRIVAL || bored {
        c.target = random_point(rng, half);
    }
    clamp_square(&mut agent.pose, half + 5.0);
    let (x, z) = (agent.pose.position.x, agent.pose.position.z);
    agent.pose.position.y = ctx.world.terrain.height_at(x, z)
        + COLLECTIBLE_HOVER
        + (ctx.elapsed * 3.0 + c.bob_phase).sin() * COLLECTIBLE_BOB;
}

pub fn step_civilian(agent: &mut Agent, ctx: &StepContext<'_>, rng: &mut StdRng) {
    let AgentKind::Civilian(civ) = &mut agent.kind else {
        return;
    };
    let remaining = seek(&mut agent.pose, civ.target, civ.speed, ctx.dt);
    let streets = &ctx.world.landmarks.street_points;
    if remaining < CIVILIAN_ARRIVAL && !streets.is_empty() {
        civ.target = streets[rng.gen_range(0..streets.len())];
    }
    civ.walk_phase = (civ.walk_phase + WALK_CYCLE_RATE * ctx.dt) % TAU;
    civ.limb_swing = civ.walk_phase.sin() * CIVILIAN_LIMB_SWING;

    clamp_square(&mut agent.pose, ctx.world.landmarks.city_half_extent + 5.0);
    let (x, z) = (agent.pose.position.x, agent.pose.position.z);
    agent.pose.position.y =
        ctx.world.terrain.height_at(x, z) + civ.walk_phase.sin().abs() * CIVILIAN_STEP_BOB;
}

pub fn step_animal(agent: &mut Agent, ctx: &StepContext<'_>, rng: &mut StdRng) {
    let half = ctx.world.landmarks.city_half_extent;
    match &mut agent.kind {
        AgentKind::Dog(a) | AgentKind::Cat(a) => {
            let goal = Vec3::new(a.target.0, agent.pose.position.y, a.target.1);
            if agent.pose.position.planar_distance(&goal) > ANIMAL_STOP_DISTANCE {
                seek(&mut agent.pose, a.target, a.speed, ctx.dt);
            }
            if rng.gen::<f32>() < ANIMAL_RETARGET_RATE * ctx.dt {
                a.target = random_point(rng, half);
            }
            clamp_square(&mut agent.pose, half + 5.0);
            let (x, z) = (agent.pose.position.x, agent.pose.position.z);
            agent.pose.position.y = ctx.world.terrain.height_at(x, z);
        }
        AgentKind::Bird(b) => {
            let t = ctx.elapsed;
            b.angle = (b.angle + BIRD_ORBIT_RATE * ctx.dt) % TAU;
            let r = b.radius + (t * 0.5).sin() * 10.0;
            let (cx, cz) = b.swarm_center;
            agent.pose.position = Vec3::new(
                cx + b.angle.cos() * r,
                b.fly_height + (t * 2.0).sin() * 2.0,
                cz + b.angle.sin() * r,
            );
            agent.pose.rotation_y = -b.angle;
            b.wing_angle = (t * 15.0).sin() * 0.5;
        }
        _ => {}
    }
}

fn vehicle_pose(v: &Vehicle, along: f32, world: &World) -> Pose {
    let across = v.road + v.lane();
    let (x, z) = match v.axis {
        Axis::X => (along, across),
        Axis::Z => (across, along),
    };
    Pose {
        position: Vec3::new(x, world.terrain.height_at(x, z), z),
        rotation_y: v.heading(),
    }
}

pub fn step_vehicle(agent: &mut Agent, ctx: &StepContext<'_>, rng: &mut StdRng) {
    let AgentKind::Vehicle(v) = &mut agent.kind else {
        return;
    };
    if v.parked {
        return;
    }

    let pos = agent.pose.position;
    let before = match v.axis {
        Axis::X => pos.x,
        Axis::Z => pos.z,
    };
    let mut along = before + v.speed * v.direction * ctx.dt;
    let wrapped = along.abs() > ROAD_WRAP;
    if along > ROAD_WRAP {
        along = -ROAD_WRAP;
    } else if along < -ROAD_WRAP {
        along = ROAD_WRAP;
    }
    v.wheel_rotation = (v.wheel_rotation + v.speed * WHEEL_SPIN_FACTOR * ctx.dt) % TAU;
    v.turn_cooldown = (v.turn_cooldown - ctx.dt).max(0.0);

    if v.turn_cooldown <= 0.0 && !wrapped {
        // First lane line of a crossing road passed this frame. Turning onto
        // it keeps the car on the segment it just drove.
        let passed = ctx
            .world
            .landmarks
            .roads
            .iter()
            .flat_map(|&road| [(road, 1.0), (road, -1.0)])
            .find(|&(road, dir)| {
                let line = road + LANE_OFFSET * dir;
                (before - line) * (along - line) <= 0.0
            });
        if let Some((road, dir)) = passed {
            v.turn_cooldown = TURN_COOLDOWN;
            if rng.gen::<f32>() < TURN_PROBABILITY {
                let across = v.road + v.lane();
                v.axis = match v.axis {
                    Axis::X => Axis::Z,
                    Axis::Z => Axis::X,
                };
                v.road = road;
                v.direction = dir;
                along = across;
                debug!("Vehicle {} turned onto road {}", agent.id, road);
            }
        }
    }

    agent.pose = vehicle_pose(v, along, ctx.world);
}

fn random_sea_point(rng: &mut StdRng) -> (f32, f32) {
    let angle = rng.gen_range(0.0..TAU);
    let r = rng.gen_range(SEA_INNER_RADIUS..SEA_OUTER_RADIUS);
    (angle.cos() * r, angle.sin() * r)
}

pub fn step_sea_life(agent: &mut Agent, ctx: &StepContext<'_>, rng: &mut StdRng) {
    let t = ctx.elapsed;
    match &mut agent.kind {
        AgentKind::FishOrShark(c) => {
            c.angle = (c.angle + c.angular_speed * ctx.dt).rem_euclid(TAU);
            let r = c.radius + (t * 0.5 + c.wobble_phase).sin() * 3.0;
            let (cx, cz) = c.center;
            agent.pose.position = Vec3::new(
                cx + c.angle.cos() * r,
                c.depth + (t + c.wobble_phase).sin() * 0.2,
                cz + c.angle.sin() * r,
            );
            agent.pose.rotation_y = -c.angle - c.angular_speed.signum() * FRAC_PI_2;
        }
        AgentKind::DecorativeBoat(b) => {
            b.heading += (t * 0.1 + b.drift_phase).sin() * 0.05 * ctx.dt;
            b.retarget_timer -= ctx.dt;

            let pos = agent.pose.position;
            let r = (pos.x * pos.x + pos.z * pos.z).sqrt();
            let outward = pos.x.atan2(pos.z);
            if r < SEA_INNER_RADIUS {
                b.heading = outward + rng.gen_range(-0.6..0.6);
            } else if r > SEA_OUTER_RADIUS {
                b.heading = outward + PI + rng.gen_range(-0.6..0.6);
            } else if b.retarget_timer <= 0.0 {
                b.heading = rng.gen_range(0.0..TAU);
                b.retarget_timer = rng.gen_range(10.0..20.0);
            }

            agent.pose.position.x += b.heading.sin() * b.speed * ctx.dt;
            agent.pose.position.z += b.heading.cos() * b.speed * ctx.dt;
            agent.pose.position.y = (t * 1.2 + b.drift_phase).sin() * 0.2;
            agent.pose.rotation_y = b.heading;
        }
        _ => {}
    }
}
