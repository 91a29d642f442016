//! The bio updater: `spec.md §4.5`, four stages.
//!
//! Stage 3 (per-cell evolution) reads bio-neighbor prosperity/species from a
//! pre-stage snapshot and writes through a queued-event commit, the same
//! "stage then commit" shape as the other three updaters; membership
//! conflicts resolve by the rule the spec gives explicitly: `SetEmpty`
//! always wins over a same-tick `NewBio` on the same cell, and a later
//! queued write to an already-resolved target is a no-op.

use crate::automaton::grid::{BioAttributes, Cell, CrystalState, Grid};
use crate::params::Params;
use crate::rng::EngineRng;

/// Engine-owned bookkeeping the bio updater needs across ticks, separate
/// from per-cell grid state (`spec.md §3`: "Engine state").
#[derive(Debug, Clone, Default)]
pub struct BioState {
    pub is_first_spawn: bool,
    pub bio_extinction_step: Option<u64>,
}

impl BioState {
    pub fn new() -> Self {
        Self {
            is_first_spawn: true,
            bio_extinction_step: None,
        }
    }
}

const HUMAN_SPECIES_ID: u32 = 0;
const HUMAN_COLOR: (u8, u8, u8) = (230, 220, 200);
const CHEBYSHEV_ALPHA_EXCLUSION_RADIUS: i32 = 3;

fn human_template(params: &Params) -> BioAttributes {
    BioAttributes {
        min_temp: params.human_min_temp,
        max_temp: params.human_max_temp,
        survival_min_temp: params.human_survival_min_temp,
        survival_max_temp: params.human_survival_max_temp,
        prosperity_growth: params.human_prosperity_growth,
        prosperity_decay: params.human_prosperity_decay,
        expansion_threshold: params.human_expansion_threshold,
        migration_threshold: params.human_migration_threshold,
        mining_reward: params.human_mining_reward,
        alpha_radiation_damage: params.alpha_radiation_damage,
        species_id: HUMAN_SPECIES_ID,
        color: HUMAN_COLOR,
    }
}

pub fn update(
    grid: &mut Grid,
    params: &Params,
    rng: &mut EngineRng,
    bio_state: &mut BioState,
    time_step: u64,
) {
    tracing::trace!(phase = "bio", "updating");

    // Stage 1: census.
    let mut species_ids: Vec<u32> = Vec::new();
    let mut human_exists = false;
    for cell in grid.cells() {
        if let Some(attrs) = &cell.bio_attributes {
            if attrs.species_id == HUMAN_SPECIES_ID {
                human_exists = true;
            } else if !species_ids.contains(&attrs.species_id) {
                species_ids.push(attrs.species_id);
            }
        }
    }

    // Stage 2: scheduled spawns.
    if species_ids.len() < params.bio_auto_spawn_count as usize
        && params.bio_auto_spawn_interval > 0
        && time_step % params.bio_auto_spawn_interval == 0
    {
        spawn_random_species(grid, params, rng);
    }

    if !human_exists && bio_state.is_first_spawn && time_step >= 50 {
        spawn_humans(grid, params, rng);
        bio_state.is_first_spawn = false;
    } else if !human_exists {
        let since = *bio_state.bio_extinction_step.get_or_insert(time_step);
        if time_step.saturating_sub(since) >= params.human_respawn_delay {
            spawn_humans(grid, params, rng);
            bio_state.bio_extinction_step = None;
        }
    } else {
        bio_state.bio_extinction_step = None;
    }

    // Stage 3.
    let events = stage3_per_cell_evolution(grid, params, rng);

    // Stage 4 (plans built against the post-stage-3 grid).
    let plans = stage4_build_migrant_plans(grid);

    commit_events(grid, params, events);
    commit_migrant_plans(grid, plans);
}

// ---------------------------------------------------------------------
// Stage 3
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct BioSnapshotEntry {
    crystal_state: CrystalState,
    prosperity: f64,
    species_id: Option<u32>,
}

enum BioEvent {
    SetEmpty { x: u16, y: u16 },
    NewBio { x: u16, y: u16, prosperity: f64, attrs: BioAttributes },
    MigrationConvert { x: u16, y: u16, prosperity: f64, attrs: BioAttributes },
    EnergyBonus { x: u16, y: u16, amount: f64 },
    ProsperityBonus { x: u16, y: u16, amount: f64 },
    MigrantAdd { x: u16, y: u16, prosperity: f64, attrs: BioAttributes },
    SetMining { x: u16, y: u16, value: bool },
}

fn stage3_per_cell_evolution(grid: &Grid, params: &Params, rng: &mut EngineRng) -> Vec<BioEvent> {
    let snapshot: Vec<BioSnapshotEntry> = grid
        .cells()
        .iter()
        .map(|c| BioSnapshotEntry {
            crystal_state: c.crystal_state,
            prosperity: c.prosperity,
            species_id: c.bio_attributes.as_ref().map(|a| a.species_id),
        })
        .collect();

    let mut events = Vec::new();
    let bio_cells: Vec<(u16, u16)> = (0..grid.height)
        .flat_map(|y| (0..grid.width).map(move |x| (x, y)))
        .filter(|&(x, y)| grid.get(x, y).crystal_state == CrystalState::Bio)
        .collect();

    for (x, y) in bio_cells {
        let cell = grid.get(x, y);
        let a = cell.bio_attributes.expect("Bio cell must carry attributes");
        let t = cell.temperature;
        let self_idx = grid.index_of(x, y);
        let self_prosperity = snapshot[self_idx].prosperity;

        // 1. Survival band.
        if t < a.survival_min_temp || t > a.survival_max_temp {
            events.push(BioEvent::SetEmpty { x, y });
            distribute_extinction_bonus(grid, x, y, params, &mut events);
            continue;
        }

        // 2. Prosperity delta.
        let mut dp = 0.0;
        let g = if a.species_id != HUMAN_SPECIES_ID {
            a.prosperity_growth.max(params.min_prosperity_growth)
        } else {
            a.prosperity_growth
        };
        if t >= a.min_temp && t <= a.max_temp {
            dp += g;
        } else {
            let deviation = if t < a.min_temp {
                a.min_temp - t
            } else {
                t - a.max_temp
            };
            dp += g - deviation * a.prosperity_decay;
        }

        let mut alpha_neighbors = 0u32;
        for (nx, ny) in grid.neighbor_coords(x, y, false) {
            let n_idx = grid.index_of(nx, ny);
            match snapshot[n_idx].crystal_state {
                CrystalState::Alpha => alpha_neighbors += 1,
                CrystalState::Bio => {
                    let n_species = snapshot[n_idx].species_id.unwrap();
                    if n_species == a.species_id {
                        dp += params.same_species_bonus;
                    } else {
                        let n_prosperity = snapshot[n_idx].prosperity;
                        if n_prosperity > self_prosperity {
                            dp -= params.competition_penalty
                                * (1.0 + (n_prosperity - self_prosperity) / 100.0);
                        }
                    }
                }
                _ => {}
            }
        }

        let base = (a.prosperity_growth + 0.2).max(a.alpha_radiation_damage);
        let immunity = (1.0 - self_prosperity / params.radiation_immunity_threshold).max(0.0);
        dp -= alpha_neighbors as f64 * base * immunity;

        // 3. Mining.
        let beta_neighbors: Vec<(u16, u16)> = grid
            .neighbor_coords(x, y, false)
            .into_iter()
            .filter(|&(nx, ny)| grid.get(nx, ny).crystal_state == CrystalState::Beta)
            .collect();
        let is_mining = if let Some(&(bx, by)) = rng.choose(&beta_neighbors) {
            events.push(BioEvent::SetEmpty { x: bx, y: by });
            dp += a.mining_reward;
            true
        } else {
            false
        };
        events.push(BioEvent::SetMining { x, y, value: is_mining });

        // 4. Stage prosperity.
        let new_prosperity = self_prosperity + dp;

        // 5. Death by exhaustion.
        if new_prosperity <= 0.0 {
            events.push(BioEvent::SetEmpty { x, y });
            distribute_extinction_bonus(grid, x, y, params, &mut events);
            continue;
        }

        events.push(BioEvent::ProsperityBonus {
            x,
            y,
            amount: new_prosperity - self_prosperity,
        });

        // 6. Expansion.
        if new_prosperity > a.expansion_threshold {
            let mutated = mutate_attributes(&a, params, rng);

            if rng.chance(params.migrant_expansion_prob) {
                if cell.migrant.is_none() {
                    events.push(BioEvent::MigrantAdd { x, y, prosperity: 30.0, attrs: mutated });
                    events.push(BioEvent::ProsperityBonus { x, y, amount: -30.0 });
                } else {
                    let slots: Vec<(u16, u16)> = grid
                        .neighbor_coords(x, y, false)
                        .into_iter()
                        .filter(|&(nx, ny)| grid.get(nx, ny).migrant.is_none())
                        .collect();
                    if let Some(&(nx, ny)) = rng.choose(&slots) {
                        events.push(BioEvent::MigrantAdd { x: nx, y: ny, prosperity: 30.0, attrs: mutated });
                        events.push(BioEvent::ProsperityBonus { x, y, amount: -30.0 });
                    }
                }
            } else {
                let empty_neighbors: Vec<(u16, u16)> = grid
                    .neighbor_coords(x, y, false)
                    .into_iter()
                    .filter(|&(nx, ny)| grid.get(nx, ny).crystal_state == CrystalState::Empty)
                    .collect();
                if let Some(&(nx, ny)) = rng.choose(&empty_neighbors) {
                    events.push(BioEvent::NewBio { x: nx, y: ny, prosperity: 30.0, attrs: mutated });
                    events.push(BioEvent::ProsperityBonus { x, y, amount: -30.0 });
                } else if cell.migrant.is_none() {
                    events.push(BioEvent::MigrantAdd { x, y, prosperity: 30.0, attrs: mutated });
                    events.push(BioEvent::ProsperityBonus { x, y, amount: -30.0 });
                }
            }
        }

        // 7. Migration conversion.
        if new_prosperity < a.migration_threshold && new_prosperity > 0.0 {
            events.push(BioEvent::MigrationConvert { x, y, prosperity: new_prosperity, attrs: a });
        }
    }

    events
}

/// Mutate a genome on expansion: per-field `mutationRate` chance of a
/// `±value * mutationStrength` nudge; any field whose relative change
/// exceeds `newSpeciesThreshold` promotes the child to a fresh species.
fn mutate_attributes(base: &BioAttributes, params: &Params, rng: &mut EngineRng) -> BioAttributes {
    let mut out = *base;
    let mut is_new_species = false;

    macro_rules! mutate_field {
        ($field:ident) => {
            if rng.chance(params.mutation_rate) {
                let before = out.$field;
                let delta = before * params.mutation_strength * rng.sign();
                out.$field = before + delta;
                if before != 0.0 && (delta / before).abs() > params.new_species_threshold {
                    is_new_species = true;
                }
            }
        };
    }

    mutate_field!(min_temp);
    mutate_field!(max_temp);
    mutate_field!(prosperity_growth);
    mutate_field!(prosperity_decay);
    mutate_field!(expansion_threshold);
    mutate_field!(mining_reward);
    mutate_field!(migration_threshold);

    if is_new_species {
        out.species_id = rng.species_id();
        out.color = rng.color();
    }
    out
}

fn distribute_extinction_bonus(grid: &Grid, x: u16, y: u16, params: &Params, events: &mut Vec<BioEvent>) {
    let neighbors = grid.neighbor_coords(x, y, true);
    if neighbors.is_empty() {
        return;
    }
    let share = params.extinction_bonus / neighbors.len() as f64;
    for (nx, ny) in neighbors {
        let n = grid.get(nx, ny);
        if !n.exists {
            continue;
        }
        match n.crystal_state {
            CrystalState::Alpha | CrystalState::Beta => {
                events.push(BioEvent::EnergyBonus { x: nx, y: ny, amount: share })
            }
            CrystalState::Bio => events.push(BioEvent::ProsperityBonus { x: nx, y: ny, amount: share }),
            CrystalState::Empty => {}
        }
    }
}

fn commit_events(grid: &mut Grid, params: &Params, events: Vec<BioEvent>) {
    for event in &events {
        if let BioEvent::SetEmpty { x, y } = *event {
            clear_bio_and_resource(grid.get_mut(x, y));
        }
    }
    for event in &events {
        if let BioEvent::NewBio { x, y, prosperity, attrs } = *event {
            let cell = grid.get_mut(x, y);
            if cell.crystal_state == CrystalState::Empty {
                cell.crystal_state = CrystalState::Bio;
                cell.bio_attributes = Some(attrs);
                cell.prosperity = prosperity;
                tracing::debug!(x, y, species = attrs.species_id, "settlement founded");
            }
        }
    }
    for event in &events {
        if let BioEvent::MigrationConvert { x, y, prosperity, attrs } = *event {
            let cell = grid.get_mut(x, y);
            clear_bio_and_resource(cell);
            cell.migrant = Some(crate::automaton::grid::Migrant { prosperity, attributes: attrs });
        }
    }
    for event in &events {
        if let BioEvent::SetMining { x, y, value } = *event {
            let cell = grid.get_mut(x, y);
            if cell.crystal_state == CrystalState::Bio {
                cell.is_mining = value;
            }
        }
    }
    for event in &events {
        match *event {
            BioEvent::EnergyBonus { x, y, amount } => {
                let cell = grid.get_mut(x, y);
                if matches!(cell.crystal_state, CrystalState::Alpha | CrystalState::Beta) {
                    cell.stored_energy = (cell.stored_energy + amount).clamp(0.0, params.max_crystal_energy);
                }
            }
            BioEvent::ProsperityBonus { x, y, amount } => {
                let cell = grid.get_mut(x, y);
                if cell.crystal_state == CrystalState::Bio {
                    cell.prosperity += amount;
                }
            }
            _ => {}
        }
    }
    for event in &events {
        if let BioEvent::MigrantAdd { x, y, prosperity, attrs } = *event {
            let cell = grid.get_mut(x, y);
            if cell.migrant.is_none() {
                cell.migrant = Some(crate::automaton::grid::Migrant { prosperity, attributes: attrs });
            }
        }
    }
}

fn clear_bio_and_resource(cell: &mut Cell) {
    cell.crystal_state = CrystalState::Empty;
    cell.stored_energy = 0.0;
    cell.is_absorbing = false;
    cell.bio_attributes = None;
    cell.prosperity = 0.0;
    cell.is_mining = false;
}

// ---------------------------------------------------------------------
// Stage 4
// ---------------------------------------------------------------------

enum MigrantPlan {
    Remove { at: (u16, u16) },
    Settle { at: (u16, u16), prosperity: f64, attrs: BioAttributes },
    Stay { at: (u16, u16), prosperity: f64, attrs: BioAttributes },
    Move { from: (u16, u16), to: (u16, u16), prosperity: f64, attrs: BioAttributes },
}

fn stage4_build_migrant_plans(grid: &Grid) -> Vec<MigrantPlan> {
    let mut plans = Vec::new();
    for y in 0..grid.height {
        for x in 0..grid.width {
            let cell = grid.get(x, y);
            let Some(migrant) = cell.migrant else { continue };

            let prosperity = migrant.prosperity - 1.0;
            if prosperity <= 0.0 {
                plans.push(MigrantPlan::Remove { at: (x, y) });
                continue;
            }

            let t = cell.temperature;
            let attrs = migrant.attributes;
            if cell.crystal_state == CrystalState::Empty
                && t >= attrs.min_temp
                && t <= attrs.max_temp
            {
                plans.push(MigrantPlan::Settle { at: (x, y), prosperity, attrs });
                continue;
            }

            let midpoint = (attrs.min_temp + attrs.max_temp) / 2.0;
            let best = grid
                .neighbor_coords(x, y, false)
                .into_iter()
                .min_by(|&(ax, ay), &(bx, by)| {
                    let da = (grid.get(ax, ay).temperature - midpoint).abs();
                    let db = (grid.get(bx, by).temperature - midpoint).abs();
                    da.partial_cmp(&db).unwrap()
                });

            match best {
                Some((nx, ny)) => plans.push(MigrantPlan::Move { from: (x, y), to: (nx, ny), prosperity, attrs }),
                None => plans.push(MigrantPlan::Stay { at: (x, y), prosperity, attrs }),
            }
        }
    }
    plans
}

fn commit_migrant_plans(grid: &mut Grid, plans: Vec<MigrantPlan>) {
    for plan in &plans {
        let source = match plan {
            MigrantPlan::Remove { at } => *at,
            MigrantPlan::Settle { at, .. } => *at,
            MigrantPlan::Stay { at, .. } => *at,
            MigrantPlan::Move { from, .. } => *from,
        };
        grid.get_mut(source.0, source.1).migrant = None;
    }
    for plan in plans {
        match plan {
            MigrantPlan::Remove { .. } => {}
            MigrantPlan::Settle { at, prosperity, attrs } => {
                let cell = grid.get_mut(at.0, at.1);
                cell.crystal_state = CrystalState::Bio;
                cell.bio_attributes = Some(attrs);
                cell.prosperity = prosperity;
            }
            MigrantPlan::Stay { at, prosperity, attrs } => {
                grid.get_mut(at.0, at.1).migrant =
                    Some(crate::automaton::grid::Migrant { prosperity, attributes: attrs });
            }
            MigrantPlan::Move { to, prosperity, attrs, .. } => {
                let cell = grid.get_mut(to.0, to.1);
                if cell.migrant.is_none() {
                    cell.migrant = Some(crate::automaton::grid::Migrant { prosperity, attributes: attrs });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------
// §4.5.1 — random species spawn
// ---------------------------------------------------------------------

fn spawn_random_species(grid: &mut Grid, params: &Params, rng: &mut EngineRng) {
    let candidates: Vec<(u16, u16)> = (0..grid.height)
        .flat_map(|y| (0..grid.width).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let cell = grid.get(x, y);
            cell.exists && cell.crystal_state == CrystalState::Empty && !has_nearby_alpha(grid, x, y)
        })
        .collect();

    let Some(&(x, y)) = rng.choose(&candidates) else { return };

    let human = human_template(params);
    let mut attrs = BioAttributes {
        min_temp: human.min_temp * rng.range(0.5, 1.5),
        max_temp: human.max_temp * rng.range(0.5, 1.5),
        survival_min_temp: human.survival_min_temp,
        survival_max_temp: human.survival_max_temp,
        prosperity_growth: human.prosperity_growth * rng.range(0.5, 1.5),
        prosperity_decay: human.prosperity_decay * rng.range(0.5, 1.5),
        expansion_threshold: human.expansion_threshold * rng.range(0.5, 1.5),
        migration_threshold: human.migration_threshold * rng.range(0.5, 1.5),
        mining_reward: human.mining_reward * rng.range(0.5, 1.5),
        alpha_radiation_damage: human.alpha_radiation_damage * rng.range(0.5, 1.5),
        species_id: rng.species_id(),
        color: rng.color(),
    };
    if attrs.min_temp > attrs.max_temp {
        std::mem::swap(&mut attrs.min_temp, &mut attrs.max_temp);
    }

    let cell = grid.get_mut(x, y);
    cell.crystal_state = CrystalState::Bio;
    cell.bio_attributes = Some(attrs);
    cell.prosperity = 50.0;
    tracing::info!(x, y, species = attrs.species_id, "new species spawned");
}

fn has_nearby_alpha(grid: &Grid, x: u16, y: u16) -> bool {
    for dy in -CHEBYSHEV_ALPHA_EXCLUSION_RADIUS..=CHEBYSHEV_ALPHA_EXCLUSION_RADIUS {
        for dx in -CHEBYSHEV_ALPHA_EXCLUSION_RADIUS..=CHEBYSHEV_ALPHA_EXCLUSION_RADIUS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if grid.in_bounds(nx, ny)
                && grid.get(nx as u16, ny as u16).crystal_state == CrystalState::Alpha
            {
                return true;
            }
        }
    }
    false
}

// ---------------------------------------------------------------------
// §4.5.3 — human spawn
// ---------------------------------------------------------------------

fn spawn_humans(grid: &mut Grid, params: &Params, rng: &mut EngineRng) {
    let attrs = human_template(params);

    if let Some(point) = params.human_spawn_point {
        if grid.try_get(point.x, point.y).is_some() {
            let cell = grid.get_mut(point.x, point.y);
            cell.exists = true;
            cell.crystal_state = CrystalState::Bio;
            cell.bio_attributes = Some(attrs);
            cell.prosperity = 50.0;
            tracing::info!(x = point.x, y = point.y, "humans force-spawned");
        }
        return;
    }

    let candidates: Vec<(u16, u16)> = (0..grid.height)
        .flat_map(|y| (0..grid.width).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let cell = grid.get(x, y);
            cell.exists
                && cell.crystal_state == CrystalState::Empty
                && cell.temperature >= attrs.min_temp
                && cell.temperature <= attrs.max_temp
        })
        .collect();

    if let Some(&(x, y)) = rng.choose(&candidates) {
        let cell = grid.get_mut(x, y);
        cell.crystal_state = CrystalState::Bio;
        cell.bio_attributes = Some(attrs);
        cell.prosperity = 50.0;
        tracing::info!(x, y, "humans spawned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bio_growth_in_band_increases_prosperity() {
        let mut grid = Grid::new(3, 3);
        for cell in grid.cells_mut() {
            cell.exists = true;
        }
        let params = Params {
            human_prosperity_growth: 0.5,
            ..Params::default()
        };
        let attrs = human_template(&params);
        let cell = grid.get_mut(1, 1);
        cell.crystal_state = CrystalState::Bio;
        cell.bio_attributes = Some(attrs);
        cell.prosperity = 10.0;
        cell.temperature = 20.0;

        let mut rng = EngineRng::from_seed(9);
        let mut bio_state = BioState::new();
        update(&mut grid, &params, &mut rng, &mut bio_state, 100);

        let cell = grid.get(1, 1);
        assert!((cell.prosperity - 10.5).abs() < 1e-6);
    }

    #[test]
    fn survival_band_excursion_kills_and_distributes_bonus() {
        let mut grid = Grid::new(3, 3);
        for cell in grid.cells_mut() {
            cell.exists = true;
        }
        let params = Params {
            extinction_bonus: 8.0,
            ..Params::default()
        };
        let attrs = human_template(&params);
        let cell = grid.get_mut(1, 1);
        cell.crystal_state = CrystalState::Bio;
        cell.bio_attributes = Some(attrs);
        cell.prosperity = 10.0;
        cell.temperature = 1000.0; // well outside survival band

        grid.get_mut(0, 1).crystal_state = CrystalState::Beta;
        grid.get_mut(0, 1).stored_energy = 0.0;

        let mut rng = EngineRng::from_seed(11);
        let mut bio_state = BioState::new();
        update(&mut grid, &params, &mut rng, &mut bio_state, 100);

        let cell = grid.get(1, 1);
        assert_eq!(cell.crystal_state, CrystalState::Empty);
        assert!(cell.bio_attributes.is_none());

        let neighbor = grid.get(0, 1);
        assert!(neighbor.stored_energy > 0.0);
    }

    #[test]
    fn migrant_settles_at_preferred_temperature() {
        let mut grid = Grid::new(3, 3);
        for cell in grid.cells_mut() {
            cell.exists = true;
        }
        let params = Params::default();
        let attrs = human_template(&params);
        let mid = (attrs.min_temp + attrs.max_temp) / 2.0;
        let cell = grid.get_mut(1, 1);
        cell.temperature = mid;
        cell.migrant = Some(crate::automaton::grid::Migrant { prosperity: 5.0, attributes: attrs });

        let mut rng = EngineRng::from_seed(3);
        let mut bio_state = BioState::new();
        update(&mut grid, &params, &mut rng, &mut bio_state, 100);

        let cell = grid.get(1, 1);
        assert_eq!(cell.crystal_state, CrystalState::Bio);
        assert!(cell.migrant.is_none());
    }

    #[test]
    fn human_respawn_after_delay() {
        let mut grid = Grid::new(5, 5);
        for cell in grid.cells_mut() {
            cell.exists = true;
            cell.temperature = 20.0;
        }
        let params = Params {
            human_respawn_delay: 10,
            ..Params::default()
        };
        let mut rng = EngineRng::from_seed(5);
        let mut bio_state = BioState::new();

        update(&mut grid, &params, &mut rng, &mut bio_state, 50);
        assert!(grid.cells().iter().any(|c| c.crystal_state == CrystalState::Bio));

        // Force-kill all humans.
        for cell in grid.cells_mut() {
            if cell.crystal_state == CrystalState::Bio {
                cell.crystal_state = CrystalState::Empty;
                cell.bio_attributes = None;
                cell.prosperity = 0.0;
            }
        }

        for step in 51..=60 {
            update(&mut grid, &params, &mut rng, &mut bio_state, step);
        }

        assert!(grid.cells().iter().any(|c| c.crystal_state == CrystalState::Bio));
    }
}
