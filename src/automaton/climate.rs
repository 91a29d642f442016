//! The climate updater: `spec.md §4.3`.
//!
//! Every sub-step reads the pre-sweep snapshot (the grid as mantle left
//! it); only the commit loop at the end writes `temperature`/
//! `has_thunderstorm` back, so neighborhood reads within the sweep never
//! see a partially-updated tick (`spec.md §4.3` "Ordering note").

use crate::automaton::grid::{Grid, NEIGHBOR_OFFSETS};
use crate::params::Params;
use crate::rng::EngineRng;

struct Staged {
    temperature: f64,
    has_thunderstorm: bool,
}

pub fn update(grid: &mut Grid, params: &Params, rng: &mut EngineRng) {
    tracing::trace!(phase = "climate", "updating");

    let width = grid.width;
    let height = grid.height;
    let mut staged: Vec<Option<Staged>> = vec![None; width as usize * height as usize];

    for y in 0..height {
        for x in 0..width {
            if !grid.get(x, y).exists {
                continue;
            }

            let t = grid.get(x, y).temperature;

            // 1. Diffusion blend over all 8 neighbor slots; off-grid and
            //    void neighbors both contribute 0 (spec.md §4.3 step 1).
            let mean: f64 = NEIGHBOR_OFFSETS
                .iter()
                .map(|&(dx, dy)| {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if grid.in_bounds(nx, ny) {
                        grid.get(nx as u16, ny as u16).temperature
                    } else {
                        0.0
                    }
                })
                .sum::<f64>()
                / 8.0;
            let mut tp = (1.0 - params.diffusion_rate) * t + params.diffusion_rate * mean;

            // 2. Mantle coupling.
            let target = -100.0 + (grid.get(x, y).mantle_energy / 100.0) * params.mantle_heat_factor;
            tp = 0.995 * tp + 0.005 * target;

            // 3. Upwind advection, read from the pre-step grid.
            let xm1 = x.saturating_sub(1);
            let xp1 = (x + 1).min(width - 1);
            let ym1 = y.saturating_sub(1);
            let yp1 = (y + 1).min(height - 1);
            let gx = (grid.get(xp1, y).temperature - grid.get(xm1, y).temperature) / 2.0;
            let gy = (grid.get(x, yp1).temperature - grid.get(x, ym1).temperature) / 2.0;
            let vx = -2.0 * gx;
            let vy = -2.0 * gy;
            let px = (x as f64 - vx).clamp(0.0, width as f64 - 1.0);
            let py = (y as f64 - vy).clamp(0.0, height as f64 - 1.0);
            let t_up = bilinear_temperature(grid, px, py);
            tp = 0.6 * tp + 0.4 * t_up;

            // 4. Radiative cooling.
            tp -= 0.01 * (tp - (-100.0));

            // 5. Storm trigger, using step 1's pre-step diff.
            let diff = (t - mean).abs();
            let has_storm = if t > -50.0 && diff > params.thunderstorm_threshold {
                rng.chance(0.15)
            } else {
                false
            };

            let idx = grid.index_of(x, y);
            staged[idx] = Some(Staged {
                temperature: tp,
                has_thunderstorm: has_storm,
            });
        }
    }

    for y in 0..height {
        for x in 0..width {
            let idx = grid.index_of(x, y);
            if let Some(s) = staged[idx].take() {
                let cell = grid.get_mut(x, y);
                cell.temperature = s.temperature;
                cell.has_thunderstorm = s.has_thunderstorm;
            }
        }
    }
}

fn bilinear_temperature(grid: &Grid, px: f64, py: f64) -> f64 {
    let x0 = px.floor() as u16;
    let y0 = py.floor() as u16;
    let x1 = (x0 + 1).min(grid.width - 1);
    let y1 = (y0 + 1).min(grid.height - 1);
    let fx = px - x0 as f64;
    let fy = py - y0 as f64;

    let t00 = grid.get(x0, y0).temperature;
    let t10 = grid.get(x1, y0).temperature;
    let t01 = grid.get(x0, y1).temperature;
    let t11 = grid.get(x1, y1).temperature;

    let top = t00 * (1.0 - fx) + t10 * fx;
    let bottom = t01 * (1.0 - fx) + t11 * fx;
    top * (1.0 - fy) + bottom * fy
}
