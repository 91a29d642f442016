//! The mantle updater: `spec.md §4.2`.
//!
//! Two phases against one land-cell sweep each: Phase A restages the
//! energy field (noise forcing, relaxation, diffusion, edge supply, Alpha
//! draw) into a staging buffer and commits it; Phase B walks the committed
//! field and queues terrain expand/shrink events, applied after the sweep.
//! Both phases follow the teacher's `field_step`/`stepping::step_automaton`
//! shape: snapshot, compute into a fresh buffer, commit once.

use std::f64::consts::{FRAC_PI_4, TAU};

use crate::automaton::grid::{CrystalState, Grid};
use crate::automaton::noise_field::{circular_distance, NoiseField, SupplyPoint};
use crate::params::Params;
use crate::rng::EngineRng;

enum TerrainEvent {
    Expand { x: u16, y: u16 },
    Shrink { x: u16, y: u16 },
}

pub fn update(
    grid: &mut Grid,
    params: &Params,
    noise: &mut NoiseField,
    supply_points: &mut [SupplyPoint],
    rng: &mut EngineRng,
) {
    tracing::trace!(phase = "mantle", "updating");
    phase_a_energy_field(grid, params, noise, supply_points, rng);
    phase_b_terrain(grid, params, rng);
}

fn phase_a_energy_field(
    grid: &mut Grid,
    params: &Params,
    noise: &mut NoiseField,
    supply_points: &mut [SupplyPoint],
    rng: &mut EngineRng,
) {
    let size = grid.width as usize * grid.height as usize;
    let mut staged: Vec<f64> = (0..size).map(|i| grid.cells()[i].mantle_energy).collect();

    let band_outer = params.max_radius - params.edge_generation_offset;
    let band_inner = band_outer - params.edge_generation_width;
    let (cx, cy) = grid.center();

    for y in 0..grid.height {
        for x in 0..grid.width {
            if !grid.get(x, y).exists {
                continue;
            }
            let idx = grid.index_of(x, y);
            let current = grid.get(x, y).mantle_energy;

            // 1. Noise forcing.
            let n = noise.sample(x, y);
            let target = params.mantle_energy_level * (1.0 + 0.1 * n);

            // 2. Relaxation to target.
            let mut e = (1.0 - params.mantle_time_scale) * current + params.mantle_time_scale * target;

            // 3. Diffusion blend over existing neighbors, read from the
            //    pre-phase grid (not the staging buffer being built).
            let neighbors = grid.neighbor_coords(x, y, false);
            if !neighbors.is_empty() {
                let mean: f64 = neighbors
                    .iter()
                    .map(|&(nx, ny)| grid.get(nx, ny).mantle_energy)
                    .sum::<f64>()
                    / neighbors.len() as f64;
                e = 0.6 * e + 0.4 * mean;
            }

            // 4. NaN/inf guard.
            if !e.is_finite() {
                e = params.mantle_energy_level;
            }

            // 5. Edge supply injection.
            let d = grid.distance_from_center(x, y);
            if d >= band_inner && d <= band_outer && !supply_points.is_empty() {
                let dy = y as f64 + 0.5 - cy;
                let dx = x as f64 + 0.5 - cx;
                let angle = dy.atan2(dx).rem_euclid(TAU);

                let mut max_contribution: Option<f64> = None;
                for point in supply_points.iter() {
                    let delta = circular_distance(angle, point.angle);
                    if delta < FRAC_PI_4 {
                        let contribution = (4.0 * delta).cos();
                        max_contribution = Some(match max_contribution {
                            Some(m) if m >= contribution => m,
                            _ => contribution,
                        });
                    }
                }
                if let Some(c) = max_contribution {
                    e += params.edge_generation_energy * c;
                }
            }

            // 6. Alpha-crystal draw.
            if grid.get(x, y).crystal_state == CrystalState::Alpha {
                e -= params.mantle_absorption * e;
            }

            staged[idx] = e;
        }
    }

    for point in supply_points.iter_mut() {
        point.advance(rng);
    }
    noise.advance(params.distortion_speed);

    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.get(x, y).exists {
                grid.get_mut(x, y).mantle_energy = staged[grid.index_of(x, y)];
            }
        }
    }
}

fn phase_b_terrain(grid: &mut Grid, params: &Params, rng: &mut EngineRng) {
    let mut events = Vec::new();

    for y in 0..grid.height {
        for x in 0..grid.width {
            if !grid.get(x, y).exists {
                continue;
            }
            let d = grid.distance_from_center(x, y);
            let energy = grid.get(x, y).mantle_energy;

            // Shrink arm / protected core.
            if d > params.min_radius {
                if energy < params.shrink_threshold {
                    let cell = grid.get_mut(x, y);
                    cell.shrink_accumulator += params.shrink_threshold - energy;
                    if cell.shrink_accumulator > 200.0 {
                        events.push(TerrainEvent::Shrink { x, y });
                        grid.get_mut(x, y).shrink_accumulator = 0.0;
                    }
                } else {
                    let cell = grid.get_mut(x, y);
                    cell.shrink_accumulator = (cell.shrink_accumulator - 2.0).max(0.0);
                }
            } else {
                grid.get_mut(x, y).shrink_accumulator = 0.0;
            }

            // Expand arm.
            if energy > params.expansion_threshold && d < params.max_radius {
                let cell = grid.get_mut(x, y);
                cell.expansion_accumulator += energy - params.expansion_threshold;
                if cell.expansion_accumulator > 100.0 {
                    let void_neighbors: Vec<(u16, u16)> = grid
                        .neighbor_coords(x, y, true)
                        .into_iter()
                        .filter(|&(nx, ny)| !grid.get(nx, ny).exists)
                        .collect();
                    if let Some(&target) = rng.choose(&void_neighbors) {
                        events.push(TerrainEvent::Expand {
                            x: target.0,
                            y: target.1,
                        });
                    }
                    let cell = grid.get_mut(x, y);
                    cell.mantle_energy -= 20.0;
                    cell.expansion_accumulator = 0.0;
                }
            } else {
                let cell = grid.get_mut(x, y);
                cell.expansion_accumulator = (cell.expansion_accumulator - 1.0).max(0.0);
            }
        }
    }

    for event in events {
        match event {
            TerrainEvent::Expand { x, y } => {
                let cell = grid.get_mut(x, y);
                if !cell.exists {
                    cell.exists = true;
                    cell.mantle_energy = 30.0;
                    tracing::debug!(x, y, "land expanded");
                }
            }
            TerrainEvent::Shrink { x, y } => {
                *grid.get_mut(x, y) = crate::automaton::grid::Cell::default();
                tracing::debug!(x, y, "land collapsed");
            }
        }
    }
}
