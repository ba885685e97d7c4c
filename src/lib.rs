//! Ferry World
//!
//! Renderer-agnostic simulation core for an island ferry town: a bowl-shaped
//! mainland city cut by a river and a lake, an island with a two-floor
//! house, and a ferry between them. The player collects wandering
//! collectibles on the mainland, sails them to the island and delivers them
//! into the house while the police patrol.
//!
//! ## Architecture
//!
//! ```text
//! SimDriver  (driver.rs)                    ← tokio frame loop, command channel
//!   └── SimulationService  (service.rs)     ← GameState, frame order, snapshot
//!         ├── locomotion / transit / agents / interaction / daynight
//!         └── World  (structure.rs)         ← immutable data layer
//!               ├── IslandTerrain      (terrain.rs)
//!               └── StructureRegistry  (structure.rs, built by layout.rs)
//! ```
//!
//! The core never blocks and has no I/O: a frame is one synchronous
//! [`SimulationService::tick`]. [`SimulationService::snapshot_json`] and
//! [`SimulationService::advance`] are the seam tests drive.

pub mod agents;
pub mod collision;
pub mod daynight;
pub mod error;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod locomotion;
pub mod protocol;
pub mod service;
pub mod settings;
pub mod structure;
pub mod terrain;
pub mod transit;
pub mod types;

// The frame driver requires the `server` feature.
#[cfg(feature = "server")]
pub mod driver;

// Convenience re-exports
#[cfg(feature = "server")]
pub use driver::{DriverCommand, DriverConfig, DriverHandle, SimDriver};
pub use error::{Result, SimError};
pub use protocol::{Feedback, RenderFrame, SimSnapshot, TickEvents};
pub use service::{GameState, SimulationService};
pub use settings::{FileConfig, Settings};
pub use structure::{StructureRegistry, World};
pub use terrain::{IslandTerrain, TerrainSource};
pub use transit::BoatPhase;
pub use types::{GameMode, SimConfig, SimStats, Vec3};
