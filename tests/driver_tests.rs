//! SimDriver tests

#[cfg(all(test, feature = "server"))]
mod tests {
    use ferry_world::driver::{DriverConfig, SimDriver};
    use ferry_world::input::InputEvent;
    use ferry_world::service::SimulationService;
    use ferry_world::settings::Settings;
    use ferry_world::types::{GameMode, SimConfig};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn make_service() -> Arc<Mutex<SimulationService>> {
        Arc::new(Mutex::new(SimulationService::new(
            SimConfig::default(),
            Settings::default(),
        )))
    }

    #[test]
    fn driver_publishes_frames_after_reset() {
        tokio_test::block_on(async {
            let service = make_service();
            let (driver, handle) = SimDriver::new(DriverConfig::default(), service.clone());
            let task = tokio::spawn(driver.run());

            handle.reset().await.unwrap();
            let mut frames = handle.frames();
            let mut seen = 0;
            while seen < 5 {
                frames.changed().await.unwrap();
                seen += 1;
            }
            assert!(handle.latest_frame().is_some());

            let snapshot = handle.snapshot().await.unwrap();
            assert_eq!(snapshot.mode, GameMode::Playing);
            assert!(snapshot.tick > 0);

            handle.pause().await.unwrap();
            let stats = handle.stats().await.unwrap();
            assert_eq!(service.lock().mode(), GameMode::Paused);

            handle.shutdown().await.unwrap();
            let ticks = task.await.unwrap().unwrap();
            assert!(ticks >= 5);
            assert_eq!(service.lock().stats().total_ticks, stats.total_ticks);
        });
    }

    #[test]
    fn input_sent_through_the_handle_reaches_the_service() {
        tokio_test::block_on(async {
            let service = make_service();
            service.lock().reset();
            let (driver, handle) = SimDriver::new(DriverConfig::default(), service.clone());
            let task = tokio::spawn(driver.run());

            handle
                .input(InputEvent::PointerLock { locked: false })
                .await
                .unwrap();
            // Commands are applied in order, so the stats reply comes after it.
            handle.stats().await.unwrap();
            assert_eq!(service.lock().mode(), GameMode::Paused);

            handle.shutdown().await.unwrap();
            task.await.unwrap().unwrap();
        });
    }

    #[test]
    fn driver_stops_at_max_ticks() {
        tokio_test::block_on(async {
            let service = make_service();
            service.lock().reset();
            let config = DriverConfig {
                tick_rate_hz: 240.0,
                max_ticks: Some(12),
            };
            let (driver, _handle) = SimDriver::new(config, service.clone());
            let ticks = driver.run().await.unwrap();
            assert_eq!(ticks, 12);
            assert_eq!(service.lock().state().tick, 12);
        });
    }

    #[test]
    fn zero_rate_is_rejected() {
        tokio_test::block_on(async {
            let config = DriverConfig {
                tick_rate_hz: 0.0,
                max_ticks: None,
            };
            let (driver, _handle) = SimDriver::new(config, make_service());
            assert!(driver.run().await.is_err());
        });
    }

    #[test]
    fn handle_reports_closed_driver() {
        tokio_test::block_on(async {
            let (driver, handle) = SimDriver::new(DriverConfig::default(), make_service());
            drop(driver);
            assert!(handle.reset().await.is_err());
        });
    }
}
