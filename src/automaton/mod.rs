//! The four per-tick updaters plus the grid/noise types they share.

pub mod bio;
pub mod climate;
pub mod crystal;
pub mod grid;
pub mod mantle;
pub mod noise_field;
