//! The top-level engine: owns the grid and every piece of process-wide
//! state, and drives the four updaters in lockstep each tick
//! (`spec.md §2`, §3 "Engine state").

use crate::automaton::bio::{self, BioState};
use crate::automaton::climate;
use crate::automaton::crystal;
use crate::automaton::grid::{Cell, CrystalState, Grid};
use crate::automaton::mantle;
use crate::automaton::noise_field::{NoiseField, SupplyPoint};
use crate::error::EngineError;
use crate::params::Params;
use crate::rng::EngineRng;

use std::f64::consts::TAU;

/// A running simulation: grid plus every piece of process-wide engine
/// state (`spec.md §3`). Construct with [`Engine::new`] or
/// [`Engine::new_seeded`], then call [`Engine::tick`] as often as the host
/// likes.
pub struct Engine {
    grid: Grid,
    params: Params,
    rng: EngineRng,
    noise: NoiseField,
    supply_points: Vec<SupplyPoint>,
    bio_state: BioState,
    time_step: u64,
    cycle_count: u64,
}

impl Engine {
    /// Construct with an entropy-seeded RNG.
    pub fn new(width: u16, height: u16, params: Params) -> Result<Self, EngineError> {
        Self::build(width, height, params, EngineRng::from_entropy())
    }

    /// Construct with an explicit RNG seed, for replayable tests
    /// (`spec.md §9`: "RNG").
    pub fn new_seeded(width: u16, height: u16, params: Params, seed: u64) -> Result<Self, EngineError> {
        Self::build(width, height, params, EngineRng::from_seed(seed))
    }

    fn build(width: u16, height: u16, params: Params, mut rng: EngineRng) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }

        let params = params.sanitized();
        let mut grid = Grid::new(width, height);
        seed_initial_landmass(&mut grid, &params, &mut rng);

        let noise_seed = rng.index(i32::MAX as usize).unwrap_or(0) as i32;
        let noise = NoiseField::new(noise_seed);

        let supply_points = (0..params.edge_supply_point_count)
            .map(|i| {
                let angle = (i as f64 / params.edge_supply_point_count.max(1) as f64) * TAU;
                SupplyPoint::new(angle, params.edge_supply_point_speed, 0.1, &mut rng)
            })
            .collect();

        Ok(Self {
            grid,
            params,
            rng,
            noise,
            supply_points,
            bio_state: BioState::new(),
            time_step: 0,
            cycle_count: 0,
        })
    }

    /// Advance the simulation by one tick: `timeStep++; updateMantle();
    /// updateClimate(); updateCrystal(); updateBio();` (`spec.md §2`).
    pub fn tick(&mut self) {
        self.time_step += 1;
        self.cycle_count = self.time_step / 1000;

        mantle::update(&mut self.grid, &self.params, &mut self.noise, &mut self.supply_points, &mut self.rng);
        climate::update(&mut self.grid, &self.params, &mut self.rng);
        crystal::update(&mut self.grid, &self.params, &mut self.rng);
        bio::update(&mut self.grid, &self.params, &mut self.rng, &mut self.bio_state, self.time_step);

        tracing::trace!(time_step = self.time_step, cycle = self.cycle_count, "tick complete");
    }

    pub fn read_cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.grid.try_get(x, y)
    }

    pub fn width(&self) -> u16 {
        self.grid.width
    }

    pub fn height(&self) -> u16 {
        self.grid.height
    }

    /// Hot-swap the parameter block; takes effect on the next `tick()`.
    /// `edgeSupplyPointCount` is construction-only — the supply-point list
    /// is not re-initialized here (`spec.md §6`, `DESIGN.md`).
    pub fn replace_params(&mut self, params: Params) {
        self.params = params.sanitized();
    }

    /// Set or clear the forced human spawn point (`humanSpawnPoint`).
    pub fn set_spawn_point(&mut self, point: Option<(u16, u16)>) {
        self.params.human_spawn_point =
            point.map(|(x, y)| crate::params::SpawnPoint { x, y });
    }

    /// Direct-write brush edit: clear the resource layer in a square brush
    /// around `(x, y)` (`spec.md §6`).
    pub fn erase_crystal(&mut self, x: u16, y: u16, brush_size: u16) {
        let half = brush_size as i32 / 2;
        for dy in -half..=half {
            for dx in -half..=half {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if !self.grid.in_bounds(nx, ny) {
                    continue;
                }
                let cell = self.grid.get_mut(nx as u16, ny as u16);
                if cell.crystal_state != CrystalState::Bio {
                    cell.crystal_state = CrystalState::Empty;
                    cell.stored_energy = 0.0;
                    cell.is_absorbing = false;
                }
            }
        }
    }

    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}

/// `spec.md §3` "Lifecycle": a disk of radius `0.4 * min(width, height)`
/// around center becomes land with `mantleEnergy ≈ 60±10`; the innermost
/// 3-radius disk seeds an Alpha crystal. Widened to `minRadius` when that
/// parameter exceeds the nominal disk, so the "always land within
/// minRadius" invariant (`spec.md §8`) holds from construction onward.
fn seed_initial_landmass(grid: &mut Grid, params: &Params, rng: &mut EngineRng) {
    let radius = (0.4 * grid.width.min(grid.height) as f64).max(params.min_radius);
    for y in 0..grid.height {
        for x in 0..grid.width {
            let d = grid.distance_from_center(x, y);
            if d <= radius {
                let cell = grid.get_mut(x, y);
                cell.exists = true;
                cell.mantle_energy = 60.0 + rng.range(-10.0, 10.0);
                if d <= 3.0 {
                    cell.crystal_state = CrystalState::Alpha;
                    cell.stored_energy = 10.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(Engine::new_seeded(0, 10, Params::default(), 1).is_err());
        assert!(Engine::new_seeded(10, 0, Params::default(), 1).is_err());
    }

    #[test]
    fn construction_seeds_a_central_landmass_with_an_alpha_core() {
        let engine = Engine::new_seeded(20, 20, Params::default(), 42).unwrap();
        let center = engine.read_cell(10, 10).unwrap();
        assert!(center.exists);
        assert_eq!(center.crystal_state, CrystalState::Alpha);

        let corner = engine.read_cell(0, 0).unwrap();
        assert!(!corner.exists);
    }

    #[test]
    fn time_step_and_cycle_count_advance_as_specified() {
        let mut engine = Engine::new_seeded(10, 10, Params::default(), 1).unwrap();
        for _ in 0..1500 {
            engine.tick();
        }
        assert_eq!(engine.time_step(), 1500);
        assert_eq!(engine.cycle_count(), 1);
    }

    #[test]
    fn erase_crystal_clears_a_brush_but_spares_bio_cells() {
        let mut engine = Engine::new_seeded(10, 10, Params::default(), 3).unwrap();
        engine.grid.get_mut(5, 5).crystal_state = CrystalState::Alpha;
        engine.grid.get_mut(5, 5).stored_energy = 50.0;
        engine.grid.get_mut(5, 6).crystal_state = CrystalState::Bio;
        engine.grid.get_mut(5, 6).bio_attributes = Some(crate::automaton::grid::BioAttributes {
            min_temp: 0.0,
            max_temp: 10.0,
            survival_min_temp: -10.0,
            survival_max_temp: 20.0,
            prosperity_growth: 1.0,
            prosperity_decay: 1.0,
            expansion_threshold: 80.0,
            migration_threshold: 10.0,
            mining_reward: 5.0,
            alpha_radiation_damage: 0.3,
            species_id: 0,
            color: (1, 2, 3),
        });

        engine.erase_crystal(5, 5, 3);

        assert_eq!(engine.read_cell(5, 5).unwrap().crystal_state, CrystalState::Empty);
        assert_eq!(engine.read_cell(5, 6).unwrap().crystal_state, CrystalState::Bio);
    }

    #[test]
    fn set_spawn_point_forces_a_human_settlement_at_next_fifty_ticks() {
        let mut engine = Engine::new_seeded(10, 10, Params::default(), 7).unwrap();
        engine.set_spawn_point(Some((10, 10)));
        // Off-grid spawn point is a bounds-checked no-op, never panics.
        for _ in 0..50 {
            engine.tick();
        }
        assert!(engine.read_cell(10, 10).is_none());
    }
}
