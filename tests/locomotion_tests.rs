//! Locomotion tests

#[cfg(test)]
mod tests {
    use ferry_world::collision::CollisionGate;
    use ferry_world::input::InputState;
    use ferry_world::layout::default_town;
    use ferry_world::locomotion::{
        jump, look, step, PlayerState, STAMINA_MAX, SPRINT_REGRANT, WALK_SPEED,
    };
    use ferry_world::structure::{StructureKind, World, STAIR_CATCH};
    use ferry_world::types::{GameMode, SimConfig, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::{FRAC_PI_2, PI};

    const DT: f32 = 1.0 / 60.0;

    fn town() -> World {
        default_town(&SimConfig::default())
    }

    fn player_at(world: &World, x: f32, z: f32) -> PlayerState {
        PlayerState::spawn(Vec3::new(x, world.ground_level(x, 0.0, z), z))
    }

    fn forward() -> InputState {
        InputState {
            forward: true,
            ..InputState::default()
        }
    }

    // -----------------------------------------------------------------------
    // Stamina
    // -----------------------------------------------------------------------

    #[test]
    fn stamina_stays_in_bounds_for_random_inputs() {
        let world = town();
        let mut p = player_at(&world, 40.0, -60.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut input = InputState::default();

        for i in 0..6000 {
            if i % 20 == 0 {
                input.forward = rng.gen_bool(0.7);
                input.left = rng.gen_bool(0.2);
                input.sprint = rng.gen_bool(0.8);
                p.yaw = rng.gen_range(-3.0..3.0);
            }
            step(&mut p, &input, &world, DT, i as f32 * DT);
            assert!(p.stamina >= 0.0 && p.stamina <= STAMINA_MAX);
            assert!(!p.sprinting || (p.sprint_permitted && p.stamina > 0.0));
        }
    }

    #[test]
    fn exhausted_sprint_waits_for_regrant() {
        let world = town();
        let mut p = player_at(&world, 40.0, -60.0);
        let input = InputState {
            forward: true,
            sprint: true,
            ..InputState::default()
        };
        // 100 stamina at 30/s drains in a bit over three seconds.
        let mut t = 0.0;
        while p.sprint_permitted {
            step(&mut p, &input, &world, DT, t);
            t += DT;
            assert!(t < 5.0, "sprint never exhausted");
        }
        assert_eq!(p.stamina, 0.0);

        // Still holding sprint: regenerates, but no sprinting until regrant.
        loop {
            step(&mut p, &input, &world, DT, t);
            t += DT;
            if p.sprint_permitted {
                break;
            }
            assert!(!p.sprinting);
            assert!(p.stamina <= SPRINT_REGRANT);
        }
        assert!(p.stamina > SPRINT_REGRANT);
    }

    // -----------------------------------------------------------------------
    // Movement and collision
    // -----------------------------------------------------------------------

    #[test]
    fn walking_covers_walk_speed() {
        let world = town();
        let mut p = player_at(&world, 40.0, -60.0);
        for i in 0..60 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
        }
        assert!((p.position.z - (-60.0 - WALK_SPEED)).abs() < 0.05);
        assert!((p.position.x - 40.0).abs() < 1e-3);
    }

    #[test]
    fn walking_into_town_hall_stops_at_the_wall() {
        let world = town();
        let mut p = player_at(&world, 0.0, 30.0);
        let gate = CollisionGate::new(world.structures.footprints());
        for i in 0..240 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
            assert!(!gate.collides(p.position.x, p.position.z));
        }
        assert!(p.position.z > 14.0 && p.position.z < 15.0);
    }

    #[test]
    fn mainland_edge_clamps() {
        let world = town();
        let mut p = player_at(&world, 190.0, 0.0);
        p.yaw = -FRAC_PI_2;
        for i in 0..120 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
        }
        assert_eq!(p.position.x, world.landmarks.mainland_half_extent);
    }

    #[test]
    fn island_edge_clamps_to_radius() {
        let world = town();
        let mut p = player_at(&world, 300.0, 10.0);
        p.yaw = -FRAC_PI_2;
        for i in 0..240 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
        }
        let (cx, cz) = world.landmarks.island_center;
        let d = ((p.position.x - cx).powi(2) + (p.position.z - cz).powi(2)).sqrt();
        assert!(d <= world.landmarks.island_radius + 1e-3);
        assert!(d > world.landmarks.island_radius - 0.5);
    }

    #[test]
    fn head_bob_only_while_walking() {
        let world = town();
        let mut p = player_at(&world, 40.0, -60.0);
        let mut saw_bob = false;
        for i in 0..30 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
            saw_bob |= p.bob_offset.abs() > 1e-4;
        }
        assert!(saw_bob);
        step(&mut p, &InputState::default(), &world, DT, 1.0);
        assert_eq!(p.bob_offset, 0.0);
        assert_eq!(p.eye_position().y, p.position.y + 3.5);
    }

    // -----------------------------------------------------------------------
    // Stairs
    // -----------------------------------------------------------------------

    #[test]
    fn walking_up_the_house_stairs_reaches_the_upper_floor() {
        let world = town();
        let house = world.structures.named_of_kind(StructureKind::House).unwrap();
        let floors = house.floor_elevations();
        let mut p = player_at(&world, 285.75, -16.2);
        assert_eq!(p.position.y, floors[0]);
        p.yaw = PI;

        let mut last = p.position.y;
        for i in 0..70 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
            let rise = p.position.y - last;
            assert!((-1e-4..0.2).contains(&rise), "rise {} at z {}", rise, p.position.z);
            last = p.position.y;
        }
        assert!(p.position.z > -6.5 && p.inside_house);
        assert_eq!(p.position.y, floors[1]);
    }

    #[test]
    fn walking_under_the_flight_stays_on_the_ground_floor() {
        let world = town();
        let house = world.structures.named_of_kind(StructureKind::House).unwrap();
        let floors = house.floor_elevations();
        // Enter the stair rectangle at its top end, at ground level.
        let mut p = player_at(&world, 285.75, -5.0);
        assert_eq!(p.position.y, floors[0]);

        for i in 0..60 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
            assert_eq!(p.position.y, floors[0], "lifted at z {}", p.position.z);
        }
        // Reaching the bottom steps is at most a small step up.
        let mut last = p.position.y;
        for i in 60..72 {
            step(&mut p, &forward(), &world, DT, i as f32 * DT);
            assert!(p.position.y - last <= STAIR_CATCH + 1e-4);
            last = p.position.y;
        }
        assert!(p.inside_house);
    }

    // -----------------------------------------------------------------------
    // Jumping
    // -----------------------------------------------------------------------

    #[test]
    fn jump_rises_and_lands() {
        let world = town();
        let mut p = player_at(&world, 40.0, -60.0);
        let ground = p.position.y;

        assert!(jump(&mut p, GameMode::Playing));
        assert!(!jump(&mut p, GameMode::Playing), "no double jump");

        let mut peak = ground;
        for i in 0..90 {
            step(&mut p, &InputState::default(), &world, DT, i as f32 * DT);
            peak = peak.max(p.position.y);
        }
        assert!(peak > ground + 1.5);
        assert!(!p.airborne);
        assert_eq!(p.position.y, ground);
    }

    #[test]
    fn jump_refused_when_paused_or_riding() {
        let world = town();
        let mut p = player_at(&world, 40.0, -60.0);
        assert!(!jump(&mut p, GameMode::Paused));
        p.on_boat = true;
        assert!(!jump(&mut p, GameMode::Playing));
    }

    // -----------------------------------------------------------------------
    // Look
    // -----------------------------------------------------------------------

    #[test]
    fn invert_y_flips_pitch_direction() {
        let mut a = PlayerState::spawn(Vec3::zero());
        let mut b = PlayerState::spawn(Vec3::zero());
        look(&mut a, 10.0, 20.0, 0.003, false);
        look(&mut b, 10.0, 20.0, 0.003, true);
        assert_eq!(a.yaw, b.yaw);
        assert!(a.pitch < 0.0 && b.pitch > 0.0);
        assert!((a.pitch + b.pitch).abs() < 1e-6);
    }
}
