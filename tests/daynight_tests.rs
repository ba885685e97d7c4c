//! Day-night cycle tests

#[cfg(test)]
mod tests {
    use ferry_world::daynight::{
        day_blend, phase_at, sun_height, warm_blend, DayNightCycle, EmissiveKind,
    };
    use ferry_world::settings::Settings;

    const DAY: f32 = 300.0;

    // -----------------------------------------------------------------------
    // Phase
    // -----------------------------------------------------------------------

    #[test]
    fn phase_wraps_after_one_day() {
        assert_eq!(phase_at(37.5, 300.0), phase_at(337.5, 300.0));
        assert_eq!(phase_at(0.0, 300.0), 0.0);
        for i in 0..500 {
            let t = i as f64 * 13.37;
            let a = phase_at(t, 300.0);
            let b = phase_at(t + 300.0, 300.0);
            assert!((a - b).abs() < 1e-6, "{} vs {} at {}", a, b, t);
            assert!((0.0..1.0).contains(&a));
        }
    }

    #[test]
    fn blends_at_key_times() {
        // Midnight
        assert!((sun_height(0.0) + 1.0).abs() < 1e-6);
        assert_eq!(day_blend(sun_height(0.0)), 0.0);
        // Sunrise
        assert!(sun_height(0.25).abs() < 1e-6);
        assert!((warm_blend(sun_height(0.25)) - 1.0).abs() < 1e-5);
        // Noon
        assert!((sun_height(0.5) - 1.0).abs() < 1e-6);
        assert_eq!(day_blend(sun_height(0.5)), 1.0);
        assert_eq!(warm_blend(sun_height(0.5)), 0.0);
    }

    // -----------------------------------------------------------------------
    // Cycle
    // -----------------------------------------------------------------------

    #[test]
    fn update_advances_the_clock() {
        let mut cycle = DayNightCycle::new(DAY, 0.0);
        assert_eq!(cycle.day_length(), DAY);
        assert_eq!(cycle.phase(), 0.0);
        cycle.update(DAY / 2.0);
        assert!((cycle.phase() - 0.5).abs() < 1e-6);
        cycle.update(DAY / 2.0);
        assert!(cycle.phase() < 1e-6);
        assert_eq!(cycle.elapsed(), f64::from(DAY));
    }

    #[test]
    fn start_phase_offsets_the_clock() {
        let cycle = DayNightCycle::new(DAY, 0.25);
        assert_eq!(cycle.elapsed(), f64::from(DAY) * 0.25);
        assert!((cycle.phase() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn every_registration_gets_a_record() {
        let mut cycle = DayNightCycle::new(DAY, 0.5);
        cycle.register(EmissiveKind::Window, 1.0);
        cycle.register(EmissiveKind::StreetLamp, 2.0);
        cycle.register(EmissiveKind::VehicleLight, 3.0);
        cycle.update(1.0 / 60.0);

        let bases: Vec<f32> = cycle.emissives().iter().map(|r| r.base).collect();
        assert_eq!(bases, vec![1.0, 2.0, 3.0]);
        // Multipliers never exceed one.
        assert!(cycle.emissives().iter().all(|r| r.current <= r.base));
    }

    #[test]
    fn night_is_dark_and_lamps_are_lit() {
        let mut cycle = DayNightCycle::new(DAY, 0.0);
        let lamp = cycle.register(EmissiveKind::StreetLamp, 2.0);
        let window = cycle.register(EmissiveKind::Window, 1.0);

        let night = cycle.update(0.0);
        assert!(night.is_dark);
        assert_eq!(night.street_lamp_multiplier, 1.0);
        assert_eq!(cycle.emissive(lamp).unwrap().current, 2.0);
        assert_eq!(cycle.emissive(lamp).unwrap().base, 2.0);

        let noon = cycle.update(DAY / 2.0);
        assert!(!noon.is_dark);
        assert!(noon.sun.intensity > night.sun.intensity);
        assert!(noon.exposure > night.exposure);
        assert_eq!(cycle.emissive(lamp).unwrap().current, 0.0);
        let w = cycle.emissive(window).unwrap();
        assert!(w.current < w.base && w.current > 0.0);
        // The authored value survives repeated scaling.
        assert_eq!(w.base, 1.0);
    }

    #[test]
    fn sky_regeneration_is_throttled() {
        let mut cycle = DayNightCycle::new(DAY, 0.3);
        assert!(cycle.update(0.0).sky.is_some());
        assert_eq!(cycle.sky_regenerations(), 1);

        for _ in 0..10 {
            assert!(cycle.update(0.001).sky.is_none());
        }
        assert_eq!(cycle.sky_regenerations(), 1);

        // A full day at 60 Hz rebuilds the sky about once per 0.02 of sun
        // height travelled (4.0 in total), not every frame.
        let frames = (DAY * 60.0) as usize;
        for _ in 0..frames {
            cycle.update(1.0 / 60.0);
        }
        let n = cycle.sky_regenerations();
        assert!(n > 150 && n < 220, "{} regenerations", n);
    }

    #[test]
    fn settings_drive_shadows_and_fog_distance() {
        let mut cycle = DayNightCycle::new(DAY, 0.5);
        let settings = Settings {
            shadows: false,
            view_distance: 250.0,
            ..Settings::default()
        };
        cycle.apply_settings(&settings);
        let frame = cycle.lighting();
        assert!(!frame.sun.casts_shadows);
        assert_eq!(frame.fog_far, 250.0);
    }
}
