//! Grid, cell record and neighborhood queries.
//!
//! One flat row-major `Vec<Cell>` backs the grid (`x` is the fast axis, per
//! `spec.md §3`), the same flat-buffer-plus-`index_of` shape the teacher
//! uses for its own grid and field types. The cell record is a single flat
//! struct with optional bio/migrant payloads (`spec.md §9`: "variants +
//! plain data win here"), not a class hierarchy.

use serde::{Deserialize, Serialize};

/// The resource-layer state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrystalState {
    Empty,
    Alpha,
    Beta,
    Bio,
}

/// One outbound Alpha-network energy transfer this tick, kept for display
/// only (`spec.md §3`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyFlowRecord {
    pub to: (u16, u16),
    pub amount: f64,
}

/// Per-settlement genome (`spec.md §3`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BioAttributes {
    pub min_temp: f64,
    pub max_temp: f64,
    pub survival_min_temp: f64,
    pub survival_max_temp: f64,
    pub prosperity_growth: f64,
    pub prosperity_decay: f64,
    pub expansion_threshold: f64,
    pub migration_threshold: f64,
    pub mining_reward: f64,
    pub alpha_radiation_damage: f64,
    /// `0` is reserved for humans.
    pub species_id: u32,
    pub color: (u8, u8, u8),
}

/// A mobile bio entity coexisting with any resource-layer state on its cell
/// (`spec.md §3`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Migrant {
    pub prosperity: f64,
    pub attributes: BioAttributes,
}

/// Every layer's state for one grid location. Inactive layers carry zeroed
/// / empty / absent fields rather than being modeled separately — this
/// keeps the per-tick sweep uniform (`spec.md §3`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    // Geosphere
    pub exists: bool,
    pub mantle_energy: f64,
    pub expansion_accumulator: f64,
    pub shrink_accumulator: f64,

    // Atmosphere
    pub temperature: f64,
    pub has_thunderstorm: bool,

    // Resource
    pub crystal_state: CrystalState,
    pub stored_energy: f64,
    pub is_absorbing: bool,
    pub energy_flow: Vec<EnergyFlowRecord>,

    // Biosphere
    pub prosperity: f64,
    pub is_mining: bool,
    pub bio_attributes: Option<BioAttributes>,
    pub migrant: Option<Migrant>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            exists: false,
            mantle_energy: 0.0,
            expansion_accumulator: 0.0,
            shrink_accumulator: 0.0,
            temperature: 0.0,
            has_thunderstorm: false,
            crystal_state: CrystalState::Empty,
            stored_energy: 0.0,
            is_absorbing: false,
            energy_flow: Vec::new(),
            prosperity: 0.0,
            is_mining: false,
            bio_attributes: None,
            migrant: None,
        }
    }
}

impl Cell {
    pub fn is_bio(&self) -> bool {
        self.crystal_state == CrystalState::Bio
    }
}

/// The eight Moore-neighborhood offsets, in a stable, implementation-fixed
/// order (`spec.md §4.1`: "order is implementation-defined but must be
/// stable across calls in one tick").
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone)]
pub struct Grid {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: (0..size).map(|_| Cell::default()).collect(),
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u16) < self.width && (y as u16) < self.height
    }

    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u16, y: u16) -> &Cell {
        &self.cells[self.index_of(x, y)]
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> &mut Cell {
        let idx = self.index_of(x, y);
        &mut self.cells[idx]
    }

    pub fn try_get(&self, x: u16, y: u16) -> Option<&Cell> {
        if (x as u32) < self.width as u32 && (y as u32) < self.height as u32 {
            Some(self.get(x, y))
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// The grid's logical origin, per `spec.md §3`.
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Euclidean distance from `(x, y)` to the grid's center.
    pub fn distance_from_center(&self, x: u16, y: u16) -> f64 {
        let (cx, cy) = self.center();
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        (dx * dx + dy * dy).sqrt()
    }

    /// In-bounds Moore-neighborhood coordinates of `(x, y)`, in the fixed
    /// order of `NEIGHBOR_OFFSETS`. When `include_void` is `false`, cells
    /// with `exists == false` are filtered out.
    ///
    /// Returns coordinates rather than cloned `Cell`s (the spec's `list
    /// <Cell>` signature) so callers read through a staging snapshot
    /// without an extra clone per neighbor — a borrow-friendly
    /// restatement of the same semantics, not a behavior change.
    pub fn neighbor_coords(&self, x: u16, y: u16, include_void: bool) -> Vec<(u16, u16)> {
        let mut out = Vec::with_capacity(8);
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if !self.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as u16, ny as u16);
            if include_void || self.get(nx, ny).exists {
                out.push((nx, ny));
            }
        }
        out
    }
}
