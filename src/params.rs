//! The parameter block: ~50 numeric knobs read by all four layers.
//!
//! `Params` is supplied by the host and is immutable for the duration of a
//! tick (`spec.md §3`). It derives `Serialize`/`Deserialize` so a host can
//! hand it to whatever persistence layer it owns — the crate itself never
//! touches a file (`SPEC_FULL.md §6`: "Parameter persistence is external").

use serde::{Deserialize, Serialize};

/// A spawn-point override in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    // --- Mantle ---------------------------------------------------------
    pub mantle_time_scale: f64,
    pub expansion_threshold: f64,
    pub shrink_threshold: f64,
    pub mantle_energy_level: f64,
    pub max_radius: f64,
    pub min_radius: f64,
    pub distortion_speed: f64,
    pub edge_generation_width: f64,
    pub edge_generation_energy: f64,
    pub edge_generation_offset: f64,
    /// Construction-only: changes after `Engine::new` have no effect, since
    /// the supply-point list is fixed at construction (`spec.md §6`,
    /// `DESIGN.md`).
    pub edge_supply_point_count: u32,
    pub edge_supply_point_speed: f64,
    pub mantle_heat_factor: f64,

    // --- Climate ----------------------------------------------------------
    pub diffusion_rate: f64,
    /// Reserved: advection uses a fixed internal coefficient (`spec.md
    /// §4.3` step 3). Not read by any updater.
    pub advection_rate: f64,
    pub thunderstorm_threshold: f64,
    /// Reserved: no seasonal forcing is implemented. Not read by any
    /// updater.
    pub seasonal_amplitude: f64,

    // --- Crystal ----------------------------------------------------------
    pub alpha_energy_demand: f64,
    pub beta_energy_demand: f64,
    pub mantle_absorption: f64,
    pub thunderstorm_energy: f64,
    pub expansion_cost: f64,
    pub max_crystal_energy: f64,
    pub energy_sharing_rate: f64,
    /// Reserved: no cap on per-tick shared energy is enforced beyond the
    /// per-edge `5.0` ceiling in `spec.md §4.4`. Not read by any updater.
    pub energy_sharing_limit: f64,
    pub energy_decay_rate: f64,
    /// Reserved: no harvesting threshold gate is implemented. Not read by
    /// any updater.
    pub harvest_threshold: f64,

    // --- Bio (global) -------------------------------------------------------
    pub extinction_bonus: f64,
    pub competition_penalty: f64,
    pub mutation_rate: f64,
    pub mutation_strength: f64,
    pub new_species_threshold: f64,
    pub min_prosperity_growth: f64,
    pub same_species_bonus: f64,
    pub migrant_expansion_prob: f64,
    pub radiation_immunity_threshold: f64,
    pub bio_auto_spawn_count: u32,
    pub bio_auto_spawn_interval: u64,

    // --- Human template -----------------------------------------------------
    pub human_min_temp: f64,
    pub human_max_temp: f64,
    pub human_survival_min_temp: f64,
    pub human_survival_max_temp: f64,
    pub human_prosperity_growth: f64,
    pub human_prosperity_decay: f64,
    pub human_expansion_threshold: f64,
    pub human_mining_reward: f64,
    pub human_migration_threshold: f64,
    pub alpha_radiation_damage: f64,
    pub human_respawn_delay: u64,
    pub human_spawn_point: Option<SpawnPoint>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mantle_time_scale: 0.1,
            expansion_threshold: 120.0,
            shrink_threshold: 20.0,
            mantle_energy_level: 100.0,
            max_radius: 200.0,
            min_radius: 5.0,
            distortion_speed: 0.01,
            edge_generation_width: 10.0,
            edge_generation_energy: 5.0,
            edge_generation_offset: 0.0,
            edge_supply_point_count: 4,
            edge_supply_point_speed: 0.02,
            mantle_heat_factor: 160.0,

            diffusion_rate: 0.2,
            advection_rate: 1.0,
            thunderstorm_threshold: 15.0,
            seasonal_amplitude: 0.0,

            alpha_energy_demand: 0.5,
            beta_energy_demand: 0.1,
            mantle_absorption: 0.05,
            thunderstorm_energy: 5.0,
            expansion_cost: 5.0,
            max_crystal_energy: 100.0,
            energy_sharing_rate: 1.0,
            energy_sharing_limit: 5.0,
            energy_decay_rate: 0.1,
            harvest_threshold: 0.0,

            extinction_bonus: 10.0,
            competition_penalty: 0.5,
            mutation_rate: 0.1,
            mutation_strength: 0.1,
            new_species_threshold: 0.3,
            min_prosperity_growth: 0.1,
            same_species_bonus: 0.2,
            migrant_expansion_prob: 0.3,
            radiation_immunity_threshold: 50.0,
            bio_auto_spawn_count: 5,
            bio_auto_spawn_interval: 500,

            human_min_temp: 7.0,
            human_max_temp: 34.0,
            human_survival_min_temp: -20.0,
            human_survival_max_temp: 55.0,
            human_prosperity_growth: 0.5,
            human_prosperity_decay: 0.1,
            human_expansion_threshold: 80.0,
            human_mining_reward: 5.0,
            human_migration_threshold: 10.0,
            alpha_radiation_damage: 0.3,
            human_respawn_delay: 200,
            human_spawn_point: None,
        }
    }
}

impl Params {
    /// Replace non-finite fields with their default value. Out-of-range
    /// (but finite) values are left alone — the caller's choice, per
    /// `spec.md §7` ("Parameter out of range... never rejected").
    pub fn sanitized(mut self) -> Self {
        let default = Self::default();

        macro_rules! fix {
            ($field:ident) => {
                if !self.$field.is_finite() {
                    self.$field = default.$field;
                }
            };
        }

        fix!(mantle_time_scale);
        fix!(expansion_threshold);
        fix!(shrink_threshold);
        fix!(mantle_energy_level);
        fix!(max_radius);
        fix!(min_radius);
        fix!(distortion_speed);
        fix!(edge_generation_width);
        fix!(edge_generation_energy);
        fix!(edge_generation_offset);
        fix!(edge_supply_point_speed);
        fix!(mantle_heat_factor);

        fix!(diffusion_rate);
        fix!(advection_rate);
        fix!(thunderstorm_threshold);
        fix!(seasonal_amplitude);

        fix!(alpha_energy_demand);
        fix!(beta_energy_demand);
        fix!(mantle_absorption);
        fix!(thunderstorm_energy);
        fix!(expansion_cost);
        fix!(max_crystal_energy);
        fix!(energy_sharing_rate);
        fix!(energy_sharing_limit);
        fix!(energy_decay_rate);
        fix!(harvest_threshold);

        fix!(extinction_bonus);
        fix!(competition_penalty);
        fix!(mutation_rate);
        fix!(mutation_strength);
        fix!(new_species_threshold);
        fix!(min_prosperity_growth);
        fix!(same_species_bonus);
        fix!(migrant_expansion_prob);
        fix!(radiation_immunity_threshold);

        fix!(human_min_temp);
        fix!(human_max_temp);
        fix!(human_survival_min_temp);
        fix!(human_survival_max_temp);
        fix!(human_prosperity_growth);
        fix!(human_prosperity_decay);
        fix!(human_expansion_threshold);
        fix!(human_mining_reward);
        fix!(human_migration_threshold);
        fix!(alpha_radiation_damage);

        self
    }
}
