//! SimulationService unit tests

#[cfg(test)]
mod tests {
    use ferry_world::input::InputEvent;
    use ferry_world::interaction;
    use ferry_world::layout::default_town;
    use ferry_world::protocol::{Feedback, Hint};
    use ferry_world::service::{GameState, SimulationService};
    use ferry_world::settings::Settings;
    use ferry_world::structure::World;
    use ferry_world::transit::{BoatPhase, Shore};
    use ferry_world::types::{GameMode, SimConfig, Vec3};
    use std::time::Duration;

    fn make_service(seed: u64) -> SimulationService {
        let config = SimConfig {
            seed,
            ..SimConfig::default()
        };
        let mut svc = SimulationService::new(config, Settings::default());
        svc.reset();
        svc
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    /// Ride from the island dock to the mainland disembark point.
    fn cross_to_mainland(svc: &mut SimulationService) {
        svc.teleport_player(235.0, 0.0);
        let fb = svc.interact();
        assert_eq!(
            fb,
            vec![Feedback::Departed {
                destination: Shore::Mainland
            }]
        );
        let fb = svc.advance(secs(3.0));
        assert!(fb.contains(&Feedback::Arrived {
            shore: Shore::Mainland
        }));
        assert_eq!(svc.state().boat.phase, BoatPhase::IdleMainland);
    }

    /// A playing `GameState` with the player standing inside the island house.
    fn state_in_house(world: &World) -> GameState {
        let mut state = GameState::new(&SimConfig::default(), &Settings::default(), world);
        state.mode = GameMode::Playing;
        let y = world.ground_level(278.0, 2.0, -10.0);
        state.player.position = Vec3::new(278.0, y, -10.0);
        state.player.refresh_structure_flags(world);
        assert!(state.player.inside_house);
        state
    }

    // -----------------------------------------------------------------------
    // Session control
    // -----------------------------------------------------------------------

    #[test]
    fn new_service_waits_for_reset() {
        let mut svc = SimulationService::new(SimConfig::default(), Settings::default());
        assert_eq!(svc.mode(), GameMode::Start);
        svc.advance(secs(1.0));
        assert_eq!(svc.state().tick, 0);

        svc.reset();
        assert_eq!(svc.mode(), GameMode::Playing);
        assert_eq!(svc.state().boat.phase, BoatPhase::IdleIsland);
        assert_eq!(svc.state().collected, 0);
        assert_eq!(svc.state().delivered, 0);
        assert_eq!(svc.state().slots, vec![false; 8]);
    }

    #[test]
    fn pause_freezes_the_clock() {
        let mut svc = make_service(42);
        svc.advance(secs(1.0));
        let before = svc.snapshot();
        assert_eq!(before.tick, 60);

        svc.pause();
        assert_eq!(svc.mode(), GameMode::Paused);
        svc.advance(secs(5.0));
        assert_eq!(svc.tick(1.0 / 60.0).tick, 60);
        let paused = svc.snapshot();
        assert_eq!(paused.elapsed_seconds, before.elapsed_seconds);
        assert_eq!(paused.day_phase, before.day_phase);

        svc.resume();
        svc.advance(secs(1.0));
        assert_eq!(svc.state().tick, 120);
    }

    #[test]
    fn losing_pointer_lock_pauses() {
        let mut svc = make_service(42);
        svc.handle_input(InputEvent::PointerLock { locked: true });
        svc.handle_input(InputEvent::PointerLock { locked: false });
        assert_eq!(svc.mode(), GameMode::Paused);
    }

    #[test]
    fn pointer_lock_survives_reset() {
        let mut svc = SimulationService::new(SimConfig::default(), Settings::default());
        svc.handle_input(InputEvent::PointerLock { locked: true });
        svc.reset();
        assert!(svc.state().input.pointer_locked);

        let yaw = svc.snapshot().yaw;
        svc.handle_input(InputEvent::MouseMove { dx: 100.0, dy: 0.0 });
        assert!(svc.snapshot().yaw < yaw);

        svc.reset();
        let yaw = svc.snapshot().yaw;
        svc.handle_input(InputEvent::MouseMove { dx: 100.0, dy: 0.0 });
        assert!(svc.snapshot().yaw < yaw);
    }

    #[test]
    fn reset_restores_a_fresh_session() {
        let mut svc = make_service(42);
        cross_to_mainland(&mut svc);
        svc.reset();
        let snap = svc.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.boat.phase, BoatPhase::IdleIsland);
        assert!(!snap.on_boat);
        assert!(snap.last_feedback.is_none());
        assert_eq!(svc.stats().boat_trips, 0);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    #[test]
    fn interact_key_fires_once_per_press() {
        let mut svc = make_service(42);
        svc.teleport_player(235.0, 0.0);
        let down = || InputEvent::KeyDown {
            code: "KeyE".into(),
        };
        assert_eq!(svc.handle_input(down()).len(), 1);
        // Key repeat while held does nothing.
        assert!(svc.handle_input(down()).is_empty());
        svc.handle_input(InputEvent::KeyUp {
            code: "KeyE".into(),
        });
        assert_eq!(svc.state().boat.phase, BoatPhase::ToMainland);
    }

    #[test]
    fn held_keys_move_the_player() {
        let mut svc = make_service(42);
        svc.teleport_player(280.0, 10.0);
        let start = svc.snapshot().player_position;
        svc.handle_input(InputEvent::KeyDown {
            code: "KeyW".into(),
        });
        svc.advance(secs(0.5));
        svc.handle_input(InputEvent::KeyUp {
            code: "KeyW".into(),
        });
        let moved = svc.snapshot().player_position;
        assert!(moved.z < start.z - 3.0);

        svc.advance(secs(0.5));
        assert_eq!(svc.snapshot().player_position, moved);
    }

    // -----------------------------------------------------------------------
    // Full loop
    // -----------------------------------------------------------------------

    #[test]
    fn collect_ferry_and_deliver() {
        let mut svc = make_service(42);
        cross_to_mainland(&mut svc);
        let (mx, mz) = svc.world().landmarks.mainland_disembark;
        let p = svc.snapshot().player_position;
        assert_eq!((p.x, p.z), (mx, mz));

        // Boarding empty-handed is refused and leaves the player ashore.
        assert_eq!(svc.interact(), vec![Feedback::NeedCollectible]);
        let snap = svc.snapshot();
        assert_eq!(snap.hint, Some(Hint::NeedCollectible));
        assert_eq!(snap.player_position, p);
        assert!(!snap.on_boat);
        assert_eq!(snap.boat.phase, BoatPhase::IdleMainland);

        svc.place_collectible(0, mx, mz).unwrap();
        assert_eq!(svc.snapshot().hint, Some(Hint::Collect));
        let fb = svc.interact();
        assert_eq!(fb[0], Feedback::Collected { carrying: 1 });
        assert_eq!(
            fb.last(),
            Some(&Feedback::Departed {
                destination: Shore::Island
            })
        );
        let carrying = svc.state().collected;
        assert!(carrying >= 1);
        assert!(svc.snapshot().on_boat);

        let fb = svc.advance(secs(3.0));
        assert!(fb.contains(&Feedback::Arrived {
            shore: Shore::Island
        }));
        let p = svc.snapshot().player_position;
        assert_eq!((p.x, p.z), (243.0, 5.0));

        svc.teleport_player(278.0, -10.0);
        assert!(svc.snapshot().inside_house);
        assert_eq!(svc.snapshot().hint, Some(Hint::Deliver));
        let fb = svc.interact();
        assert_eq!(
            fb,
            vec![Feedback::Delivered {
                delivered: 1,
                total: 8
            }]
        );
        assert_eq!(svc.state().collected, carrying - 1);
        assert!(svc.state().slots[0]);
        assert_eq!(svc.stats().boat_trips, 2);
    }

    #[test]
    fn feedback_queue_drains_oldest_first() {
        let mut svc = make_service(42);
        cross_to_mainland(&mut svc);
        assert_eq!(
            svc.take_feedback(),
            vec![
                Feedback::Departed {
                    destination: Shore::Mainland
                },
                Feedback::Arrived {
                    shore: Shore::Mainland
                },
            ]
        );
        assert!(svc.take_feedback().is_empty());
        // The latest message stays visible after draining.
        assert_eq!(
            svc.snapshot().last_feedback,
            Some(Feedback::Arrived {
                shore: Shore::Mainland
            }
            .to_string())
        );
    }

    #[test]
    fn police_catch_a_carrying_player() {
        let mut svc = make_service(42);
        svc.teleport_player(40.0, -60.0);
        svc.place_collectible(0, 40.0, -60.0).unwrap();
        svc.interact();
        assert!(svc.state().collected >= 1);

        svc.place_police(0, 40.5, -60.0).unwrap();
        let events = svc.tick(1.0 / 60.0);
        assert!(events.feedback.contains(&Feedback::Caught));
        assert_eq!(svc.mode(), GameMode::GameOver);
        let summary = events.summary.unwrap();
        assert_eq!(summary.outcome, GameMode::GameOver);
        assert_eq!(summary.delivered, 0);

        // Terminal: nothing moves any more.
        let tick = svc.state().tick;
        svc.advance(secs(1.0));
        assert_eq!(svc.state().tick, tick);
        assert!(svc.interact().is_empty());
    }

    #[test]
    fn unknown_agent_index_is_an_error() {
        let mut svc = make_service(42);
        assert!(svc.place_collectible(99, 0.0, 0.0).is_err());
        assert!(svc.place_police(99, 0.0, 0.0).is_err());
    }

    // -----------------------------------------------------------------------
    // Delivery and chest
    // -----------------------------------------------------------------------

    #[test]
    fn deliveries_fill_slots_in_order_until_win() {
        let world = default_town(&SimConfig::default());
        let mut state = state_in_house(&world);
        state.collected = 8;

        for n in 1..=7u32 {
            let fb = interaction::interact(&mut state, &world);
            assert_eq!(
                fb,
                vec![Feedback::Delivered {
                    delivered: n,
                    total: 8
                }]
            );
            assert_eq!(state.slots.iter().filter(|s| **s).count(), n as usize);
            assert!(state.slots[..n as usize].iter().all(|s| *s));
        }

        let fb = interaction::interact(&mut state, &world);
        assert_eq!(
            fb,
            vec![
                Feedback::Delivered {
                    delivered: 8,
                    total: 8
                },
                Feedback::Won
            ]
        );
        assert_eq!(state.mode, GameMode::Win);
        assert_eq!(state.summary.as_ref().map(|s| s.outcome), Some(GameMode::Win));
        assert!(interaction::interact(&mut state, &world).is_empty());
        assert_eq!(state.delivered, 8);
    }

    #[test]
    fn full_slots_refuse_delivery() {
        let world = default_town(&SimConfig::default());
        let mut state = state_in_house(&world);
        state.slots = vec![true; 8];
        state.delivered = 5;
        state.collected = 1;
        let fb = interaction::interact(&mut state, &world);
        assert_eq!(fb, vec![Feedback::SlotsFull]);
        assert_eq!(state.collected, 1);
        assert_eq!(state.delivered, 5);
    }

    #[test]
    fn empty_handed_in_the_house() {
        let world = default_town(&SimConfig::default());
        let mut state = state_in_house(&world);
        let fb = interaction::interact(&mut state, &world);
        assert_eq!(fb, vec![Feedback::NothingToDeliver]);
        assert_eq!(state.last_feedback, Some(Feedback::NothingToDeliver));
    }

    #[test]
    fn chest_deposits_and_withdraws() {
        let world = default_town(&SimConfig::default());
        let mut state = state_in_house(&world);
        let chest = world.landmarks.chest;
        state.player.position = Vec3::new(chest.x + 1.0, state.player.position.y, chest.z);

        assert_eq!(
            interaction::use_chest(&mut state, &world),
            Some(Feedback::ChestEmpty)
        );

        state.collected = 2;
        assert_eq!(
            interaction::use_chest(&mut state, &world),
            Some(Feedback::ChestDeposited { stored: 1 })
        );
        assert_eq!(state.collected, 1);
        interaction::use_chest(&mut state, &world);
        assert_eq!((state.collected, state.chest), (0, 2));

        assert_eq!(
            interaction::use_chest(&mut state, &world),
            Some(Feedback::ChestWithdrawn { stored: 1 })
        );
        assert_eq!((state.collected, state.chest), (1, 1));

        state.player.position = Vec3::new(280.0, 2.0, 10.0);
        assert_eq!(interaction::use_chest(&mut state, &world), None);
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    #[test]
    fn same_seed_same_digest() {
        let mut a = make_service(7);
        let mut b = make_service(7);
        a.advance(secs(5.0));
        b.advance(secs(5.0));
        assert_eq!(a.snapshot_json().unwrap(), b.snapshot_json().unwrap());
        assert_eq!(a.snapshot_digest().unwrap(), b.snapshot_digest().unwrap());
        assert_eq!(a.snapshot_digest().unwrap().len(), 32);
    }

    #[test]
    fn snapshot_lists_nearby_collectibles_closest_first() {
        let mut svc = make_service(42);
        svc.teleport_player(0.0, -60.0);
        svc.place_collectible(0, 10.0, -60.0).unwrap();
        svc.place_collectible(1, 3.0, -60.0).unwrap();
        let snap = svc.snapshot();
        let rank = |index: usize| {
            snap.nearby_collectibles
                .iter()
                .position(|n| n.index == index)
                .unwrap()
        };
        assert!(rank(1) < rank(0));
        assert!(snap
            .nearby_collectibles
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance));
        assert!(snap
            .nearby_collectibles
            .iter()
            .all(|n| n.distance < ferry_world::service::NEARBY_RADIUS));
    }

    #[test]
    fn frame_carries_every_agent() {
        let mut svc = make_service(42);
        svc.advance(secs(0.5));
        let frame = svc.frame();
        assert_eq!(frame.agents.len(), svc.state().agents.len());
        assert_eq!(frame.slots.len(), 8);
        assert!(frame.agents.iter().any(|a| a.kind == "shark"));
        assert!(!frame.player.carrying_bag);
    }
}
