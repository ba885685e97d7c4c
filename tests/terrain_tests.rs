//! Terrain unit tests

#[cfg(test)]
mod tests {
    use ferry_world::terrain::{
        water_wave, IslandTerrain, TerrainSource, ISLAND_CENTER_X, ISLAND_TOP, SEA_FLOOR,
        SEA_LEVEL,
    };

    fn make_terrain() -> IslandTerrain {
        IslandTerrain::default()
    }

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------

    #[test]
    fn height_is_deterministic() {
        let t = make_terrain();
        let h1 = t.height_at(10.0, 10.0);
        let h2 = t.height_at(10.0, 10.0);
        assert_eq!(h1, h2);
        assert_eq!(
            make_terrain().height_at(-150.0, 77.0),
            t.height_at(-150.0, 77.0)
        );
    }

    // -----------------------------------------------------------------------
    // Shape
    // -----------------------------------------------------------------------

    #[test]
    fn city_centre_is_flat() {
        let t = make_terrain();
        assert!(t.height_at(0.0, 0.0).abs() < 1e-6);
        assert!(t.height_at(40.0, -60.0).abs() < 1e-6);
        let n = t.normal_at(0.0, 0.0);
        assert!(n.x.abs() < 1e-6 && n.z.abs() < 1e-6);
        assert!(n.y > 0.0);
    }

    #[test]
    fn island_plateau_and_open_sea() {
        let t = make_terrain();
        assert_eq!(t.height_at(ISLAND_CENTER_X, 0.0), ISLAND_TOP);
        assert_eq!(t.height_at(ISLAND_CENTER_X + 20.0, 10.0), ISLAND_TOP);
        let sea = t.height_at(400.0, 0.0);
        assert!(sea < SEA_LEVEL, "open sea should be below the water line");
        assert!((sea - SEA_FLOOR).abs() < 1e-4);
    }

    #[test]
    fn channel_between_mainland_and_island_is_under_water() {
        let t = make_terrain();
        assert!(t.height_at(225.0, 60.0) < SEA_LEVEL);
    }

    #[test]
    fn lake_and_river_are_carved_and_wet() {
        let t = make_terrain();
        let lake = t.lake().center;
        assert!(t.is_wet(lake.x, lake.z));
        assert!((t.lake_cut(lake.x, lake.z) - t.lake().depth).abs() < 1e-5);
        assert!(!t.is_buildable(lake.x, lake.z, 10.0));

        let p = t.river().control_points[1];
        assert!(t.distance_to_river(p.x, p.z) < 1e-3);
        assert!(t.is_wet(p.x, p.z));
        assert!(t.river_cut(p.x, p.z) > t.river().depth * 0.99);

        assert!(!t.is_wet(0.0, 0.0));
        assert!(t.is_buildable(0.0, 0.0, 0.35));
    }

    #[test]
    fn carves_fade_to_zero_at_their_rim() {
        let t = make_terrain();
        let lake = t.lake().center;
        let r = t.lake().radius;
        assert_eq!(t.lake_cut(lake.x + r, lake.z), 0.0);
        assert!(t.lake_cut(lake.x + r - 0.01, lake.z) < 0.01);
    }

    // -----------------------------------------------------------------------
    // Continuity
    // -----------------------------------------------------------------------

    #[test]
    fn height_is_continuous_under_small_steps() {
        let t = make_terrain();
        let step = 0.05;
        let mut x = -320.0f32;
        while x < 340.0 {
            let mut z = -320.0f32;
            while z < 320.0 {
                let h = t.height_at(x, z);
                let dx = (t.height_at(x + step, z) - h).abs();
                let dz = (t.height_at(x, z + step) - h).abs();
                assert!(
                    dx < 0.25 && dz < 0.25,
                    "jump of ({}, {}) at ({}, {})",
                    dx,
                    dz,
                    x,
                    z
                );
                z += 7.3;
            }
            x += 7.3;
        }
    }

    #[test]
    fn water_wave_is_bounded() {
        for i in 0..200 {
            let f = i as f32;
            let w = water_wave(f * 3.1, -f * 1.7, f * 0.13);
            assert!(w.abs() <= 1.0 + 1e-6);
        }
    }
}
