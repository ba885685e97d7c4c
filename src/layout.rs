//! Default town layout: the civic buildings, seeded residential blocks, the
//! island house, the mainland villa and every landmark the simulation
//! reads. Stands in for the procedural world generator.

use crate::structure::{Footprint, Landmarks, NamedStructure, Stairs, StructureKind, World};
use crate::terrain::{IslandTerrain, TerrainSource, ISLAND_CENTER_X, ISLAND_CENTER_Z};
use crate::types::{Rect, SimConfig, Vec3};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Steepest ground a building may be placed on.
pub const MAX_BUILD_SLOPE: f32 = 0.35;

const RESIDENTIAL_WIDTH: f32 = 12.0;
const RESIDENTIAL_DEPTH: f32 = 14.0;
const PLACEMENT_ATTEMPTS: usize = 10;

/// `(id, x, z, width, depth)` of the fixed civic buildings.
const CIVIC_BUILDINGS: &[(&str, f32, f32, f32, f32)] = &[
    ("town_hall", 0.0, 0.0, 32.0, 27.0),
    ("church", -80.0, -80.0, 17.0, 32.0),
    ("hospital", 80.0, -60.0, 42.0, 32.0),
    ("school", -70.0, 70.0, 52.0, 27.0),
    ("kindergarten", 50.0, 80.0, 27.0, 22.0),
    ("police_station", -120.0, 0.0, 27.0, 22.0),
    ("fire_station", 120.0, 0.0, 32.0, 27.0),
    ("shopping_mall", 0.0, -100.0, 52.0, 37.0),
    ("office_ne", 60.0, 40.0, 20.0, 20.0),
    ("office_nw", -60.0, 40.0, 20.0, 20.0),
    ("office_se", 100.0, -120.0, 20.0, 20.0),
    ("office_sw", -100.0, -120.0, 20.0, 20.0),
];

/// `(x, z, count)` of the residential blocks.
const RESIDENTIAL_AREAS: &[(f32, f32, usize)] = &[
    (-140.0, -140.0, 6),
    (140.0, -140.0, 6),
    (-140.0, 140.0, 6),
    (140.0, 140.0, 6),
    (0.0, 130.0, 4),
    (-100.0, 100.0, 4),
    (100.0, 100.0, 4),
];

const ROADS: [f32; 3] = [-100.0, 0.0, 100.0];

pub fn default_landmarks(rng: &mut StdRng, slots: u32) -> Landmarks {
    let mut street_points = Vec::new();
    for &main in &ROADS {
        let mut i = -180.0;
        while i <= 180.0 {
            street_points.push((main + rng.gen_range(-4.0..4.0), i));
            street_points.push((i, main + rng.gen_range(-4.0..4.0)));
            i += 40.0;
        }
    }

    // Cages in two rows along the back wall of the house.
    let delivery_slots = (0..slots)
        .map(|i| {
            let col = (i % 4) as f32;
            let row = (i / 4) as f32;
            Vec3::new(273.0 + col * 3.0, 2.5, -15.0 + row * 3.0)
        })
        .collect();

    Landmarks {
        mainland_dock: Vec3::new(200.0, 1.5, 0.0),
        island_dock: Vec3::new(235.0, 1.5, 0.0),
        boat_mainland_x: 205.0,
        boat_island_x: 240.0,
        boat_lane_z: 0.0,
        boat_island_side_x: 225.0,
        mainland_disembark: (195.0, 0.0),
        island_disembark: (243.0, 5.0),
        island_threshold_x: 220.0,
        mainland_edge_x: 200.0,
        mainland_half_extent: 195.0,
        island_center: (ISLAND_CENTER_X, ISLAND_CENTER_Z),
        island_radius: 38.0,
        city_half_extent: 175.0,
        chest: Vec3::new(273.0, 2.5, -5.0),
        delivery_slots,
        street_points,
        roads: ROADS.to_vec(),
        spawn: (280.0, 10.0),
    }
}

pub fn island_house() -> NamedStructure {
    NamedStructure {
        name: "house".into(),
        kind: StructureKind::House,
        center_x: 280.0,
        center_z: -10.0,
        width: 18.0,
        depth: 14.0,
        floor_offsets: vec![0.5, 4.5],
        stairs: Some(Stairs {
            area: Rect::new(284.0, 287.5, -15.5, -6.5),
            start_z: -15.0,
            run: 8.0,
            direction: 1.0,
        }),
        porch: Some(Rect::new(274.0, 286.0, -3.0, 0.0)),
        base_elevation: 0.0,
    }
}

pub fn mainland_villa() -> NamedStructure {
    NamedStructure {
        name: "villa".into(),
        kind: StructureKind::Villa,
        center_x: 160.0,
        center_z: -40.0,
        width: 16.0,
        depth: 12.0,
        floor_offsets: vec![0.3, 4.3, 8.3],
        stairs: Some(Stairs {
            area: Rect::new(163.0, 166.5, -45.5, -37.5),
            start_z: -45.0,
            run: 7.0,
            direction: 1.0,
        }),
        porch: Some(Rect::new(152.0, 168.0, -34.0, -31.0)),
        base_elevation: 0.0,
    }
}

fn near_road(rect: &Rect) -> bool {
    ROADS.iter().any(|&road| {
        (rect.min_x - 6.0..=rect.max_x + 6.0).contains(&road)
            || (rect.min_z - 6.0..=rect.max_z + 6.0).contains(&road)
    })
}

/// Build the default town for `config`. Identical seeds give identical
/// layouts.
pub fn default_town(config: &SimConfig) -> World {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let terrain = Arc::new(IslandTerrain::default());
    let landmarks = default_landmarks(&mut rng, config.total_collectibles);
    let mut world = World::new(terrain.clone(), landmarks);

    for &(id, x, z, w, d) in CIVIC_BUILDINGS {
        world.structures.insert_footprint(Footprint::new(id, x, z, w, d));
    }

    let villa_area = mainland_villa().bounds().inflate(4.0);
    let mut rejected = 0usize;
    for (area_idx, &(ax, az, count)) in RESIDENTIAL_AREAS.iter().enumerate() {
        for n in 0..count {
            let placed = (0..PLACEMENT_ATTEMPTS).find_map(|_| {
                let x = ax + rng.gen_range(-20.0..20.0);
                let z = az + rng.gen_range(-20.0..20.0);
                let rect = Rect::centered(x, z, RESIDENTIAL_WIDTH, RESIDENTIAL_DEPTH);
                let clear = world.structures.query_rect(&rect.inflate(2.0)).is_empty()
                    && !near_road(&rect)
                    && !villa_area.contains(x, z)
                    && terrain.is_buildable(x, z, MAX_BUILD_SLOPE);
                clear.then_some((x, z))
            });
            match placed {
                Some((x, z)) => world.structures.insert_footprint(Footprint::new(
                    format!("residential_{}_{}", area_idx, n),
                    x,
                    z,
                    RESIDENTIAL_WIDTH,
                    RESIDENTIAL_DEPTH,
                )),
                None => rejected += 1,
            }
        }
    }

    world.add_named_structure(island_house());
    world.add_named_structure(mainland_villa());

    debug!(
        "Built town: {} footprints ({} residential placements rejected), {} named structures",
        world.structures.len(),
        rejected,
        world.structures.named().len()
    );
    world
}
