//! Four-layer cellular automaton world simulation core: geosphere
//! (mantle energy + dynamic landmass), atmosphere (temperature + storms),
//! resource (Alpha/Beta crystals with an energy-sharing network) and
//! biosphere (settlements, migrants, species, mutation), advancing in
//! lockstep per discrete tick.
//!
//! This crate is a library, not a binary: no renderer, no control panel,
//! no save/load, no frame-rate loop. A host process links it, owns the
//! render loop, and calls [`Engine::tick`] as often as it likes.

pub mod automaton;
pub mod engine;
pub mod error;
pub mod params;
pub mod rng;

pub use automaton::grid::{BioAttributes, Cell, CrystalState, EnergyFlowRecord, Grid, Migrant};
pub use engine::Engine;
pub use error::EngineError;
pub use params::{Params, SpawnPoint};
pub use rng::EngineRng;
