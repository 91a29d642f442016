//! The crystal updater: `spec.md §4.4`, three sub-passes in order.

use crate::automaton::grid::{CrystalState, EnergyFlowRecord, Grid};
use crate::params::Params;
use crate::rng::EngineRng;

pub fn update(grid: &mut Grid, params: &Params, rng: &mut EngineRng) {
    tracing::trace!(phase = "crystal", "updating");
    metabolism(grid, params);
    network_flow(grid, params);
    propagation(grid, params, rng);
}

/// Sub-pass 1: absorption, storm burst, maintenance, Alpha exhaustion.
fn metabolism(grid: &mut Grid, params: &Params) {
    for y in 0..grid.height {
        for x in 0..grid.width {
            let cell = grid.get_mut(x, y);
            if !cell.exists || matches!(cell.crystal_state, CrystalState::Empty | CrystalState::Bio) {
                continue;
            }

            cell.is_absorbing = false;

            if cell.crystal_state == CrystalState::Alpha && cell.mantle_energy > 10.0 {
                let absorbed = params.mantle_absorption * cell.mantle_energy;
                cell.stored_energy += absorbed;
                cell.is_absorbing = true;
            }

            if cell.has_thunderstorm {
                cell.stored_energy += params.thunderstorm_energy;
            }

            cell.stored_energy -= match cell.crystal_state {
                CrystalState::Alpha => params.alpha_energy_demand,
                CrystalState::Beta => params.beta_energy_demand,
                _ => 0.0,
            };

            cell.stored_energy = cell.stored_energy.min(params.max_crystal_energy);

            if cell.crystal_state == CrystalState::Alpha && cell.stored_energy <= 0.0 {
                cell.crystal_state = CrystalState::Beta;
                cell.stored_energy = 0.0;
            }
        }
    }
}

/// Sub-pass 2: Alpha-network flow balance, read from a pre-pass snapshot
/// and committed via an accumulated delta map (order-independent totals,
/// per `spec.md §5`).
fn network_flow(grid: &mut Grid, params: &Params) {
    for y in 0..grid.height {
        for x in 0..grid.width {
            grid.get_mut(x, y).energy_flow.clear();
        }
    }

    let size = grid.width as usize * grid.height as usize;
    let snapshot: Vec<f64> = grid.cells().iter().map(|c| c.stored_energy).collect();
    let mut delta = vec![0.0f64; size];

    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.get(x, y).crystal_state != CrystalState::Alpha {
                continue;
            }
            let c_idx = grid.index_of(x, y);
            let c_energy = snapshot[c_idx];

            for (nx, ny) in grid.neighbor_coords(x, y, false) {
                if grid.get(nx, ny).crystal_state != CrystalState::Alpha {
                    continue;
                }
                let n_idx = grid.index_of(nx, ny);
                let n_energy = snapshot[n_idx];
                if c_energy <= n_energy {
                    continue;
                }

                let diff = c_energy - n_energy;
                let mut transfer = (diff * 0.1 * params.energy_sharing_rate).min(5.0);
                if c_energy - transfer < n_energy + transfer {
                    transfer = diff * 0.4;
                }
                if transfer > 0.1 {
                    delta[c_idx] -= transfer;
                    delta[n_idx] += transfer * (1.0 - params.energy_decay_rate);
                    grid.get_mut(x, y)
                        .energy_flow
                        .push(EnergyFlowRecord { to: (nx, ny), amount: transfer });
                }
            }
        }
    }

    for y in 0..grid.height {
        for x in 0..grid.width {
            let idx = grid.index_of(x, y);
            if delta[idx] == 0.0 {
                continue;
            }
            let cell = grid.get_mut(x, y);
            if cell.crystal_state == CrystalState::Alpha {
                cell.stored_energy =
                    (cell.stored_energy + delta[idx]).clamp(0.0, params.max_crystal_energy);
            }
        }
    }
}

/// Sub-pass 3: Alpha propagation into empty adjacent land.
fn propagation(grid: &mut Grid, params: &Params, rng: &mut EngineRng) {
    let mut targets: Vec<(u16, u16)> = Vec::new();

    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.get(x, y).crystal_state != CrystalState::Alpha {
                continue;
            }
            if grid.get(x, y).stored_energy <= 2.0 * params.expansion_cost {
                continue;
            }

            let candidates: Vec<(u16, u16)> = grid
                .neighbor_coords(x, y, false)
                .into_iter()
                .filter(|&(nx, ny)| grid.get(nx, ny).crystal_state == CrystalState::Empty)
                .collect();

            if let Some(&target) = rng.choose(&candidates) {
                targets.push(target);
                grid.get_mut(x, y).stored_energy -= params.expansion_cost;
            }
        }
    }

    for (x, y) in targets {
        let cell = grid.get_mut(x, y);
        if cell.crystal_state == CrystalState::Empty {
            cell.crystal_state = CrystalState::Alpha;
            cell.stored_energy = 10.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_demotes_to_beta_on_exhaustion() {
        let mut grid = Grid::new(1, 1);
        let cell = grid.get_mut(0, 0);
        cell.exists = true;
        cell.crystal_state = CrystalState::Alpha;
        cell.stored_energy = 3.0;
        cell.mantle_energy = 0.0;
        cell.has_thunderstorm = false;

        let params = Params {
            alpha_energy_demand: 4.5,
            ..Params::default()
        };
        let mut rng = EngineRng::from_seed(1);
        update(&mut grid, &params, &mut rng);

        let cell = grid.get(0, 0);
        assert_eq!(cell.crystal_state, CrystalState::Beta);
        assert_eq!(cell.stored_energy, 0.0);
    }

    #[test]
    fn alpha_propagates_into_one_empty_neighbor() {
        let mut grid = Grid::new(3, 3);
        for cell in grid.cells_mut() {
            cell.exists = true;
        }
        grid.get_mut(1, 1).crystal_state = CrystalState::Alpha;
        grid.get_mut(1, 1).stored_energy = 30.0;

        let params = Params {
            expansion_cost: 8.0,
            mantle_absorption: 0.0,
            alpha_energy_demand: 0.0,
            ..Params::default()
        };
        for cell in grid.cells_mut() {
            cell.mantle_energy = 0.0;
        }
        let mut rng = EngineRng::from_seed(7);
        update(&mut grid, &params, &mut rng);

        let parent = grid.get(1, 1);
        assert_eq!(parent.stored_energy, 22.0);

        let alpha_children = grid
            .cells()
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != grid.index_of(1, 1) && c.crystal_state == CrystalState::Alpha)
            .count();
        assert_eq!(alpha_children, 1);
    }

    #[test]
    fn network_flow_moves_energy_toward_poorer_neighbor() {
        let mut grid = Grid::new(2, 1);
        for cell in grid.cells_mut() {
            cell.exists = true;
            cell.crystal_state = CrystalState::Alpha;
        }
        grid.get_mut(0, 0).stored_energy = 50.0;
        grid.get_mut(1, 0).stored_energy = 0.0;
        for cell in grid.cells_mut() {
            cell.mantle_energy = 0.0;
        }

        let params = Params {
            alpha_energy_demand: 0.0,
            expansion_cost: 1000.0, // disable propagation for this test
            ..Params::default()
        };
        let mut rng = EngineRng::from_seed(4);
        update(&mut grid, &params, &mut rng);

        assert!(grid.get(0, 0).stored_energy < 50.0);
        assert!(grid.get(1, 0).stored_energy > 0.0);
        assert!(!grid.get(0, 0).energy_flow.is_empty());
    }
}
