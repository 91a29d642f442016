//! Property sweep over randomized small grids/parameter perturbations,
//! asserting the invariants of `spec.md §8` hold after arbitrary tick
//! counts.

use proptest::prelude::*;
use tessera_engine::{CrystalState, Engine, Params};

fn check_invariants(engine: &Engine, params: &Params) {
    for y in 0..engine.height() {
        for x in 0..engine.width() {
            let cell = engine.read_cell(x, y).unwrap();

            if !cell.exists {
                assert_eq!(cell.mantle_energy, 0.0);
                assert_eq!(cell.crystal_state, CrystalState::Empty);
                assert!(cell.bio_attributes.is_none());
            }

            if cell.crystal_state == CrystalState::Bio {
                assert!(cell.bio_attributes.is_some());
                assert!(cell.prosperity > 0.0);
            } else {
                assert!(cell.bio_attributes.is_none());
            }

            assert!(cell.stored_energy >= 0.0);
            assert!(cell.stored_energy <= params.max_crystal_energy);

            if engine_distance_from_center(engine, x, y) <= params.min_radius {
                assert!(cell.exists, "cell ({x},{y}) within min_radius should never vanish");
            }
        }
    }
}

fn engine_distance_from_center(engine: &Engine, x: u16, y: u16) -> f64 {
    let cx = engine.width() as f64 / 2.0;
    let cy = engine.height() as f64 / 2.0;
    let dx = x as f64 + 0.5 - cx;
    let dy = y as f64 + 0.5 - cy;
    (dx * dx + dy * dy).sqrt()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_after_arbitrary_ticks(
        width in 4u16..16,
        height in 4u16..16,
        seed in any::<u64>(),
        ticks in 1usize..40,
        mantle_time_scale in 0.0f64..1.0,
        min_radius in 1.0f64..4.0,
    ) {
        let mut params = Params::default();
        params.min_radius = min_radius;
        params.mantle_time_scale = mantle_time_scale;
        let mut engine = Engine::new_seeded(width, height, params.clone(), seed).unwrap();

        for _ in 0..ticks {
            engine.tick();
            check_invariants(&engine, &params);
        }
    }
}

#[test]
fn time_step_monotonicity_holds_over_a_long_run() {
    let mut engine = Engine::new_seeded(12, 12, Params::default(), 123).unwrap();
    let mut previous = engine.time_step();
    for _ in 0..3000 {
        engine.tick();
        assert_eq!(engine.time_step(), previous + 1);
        assert_eq!(engine.cycle_count(), engine.time_step() / 1000);
        previous = engine.time_step();
    }
}
