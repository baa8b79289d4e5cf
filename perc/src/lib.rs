#![forbid(unsafe_code)]

//! Site percolation on an `n`x`n` grid.
//!
//! [`ConnectivityGrid`] tracks connectivity incrementally as sites open and
//! answers "is this site full?" and "does the grid percolate?" without
//! rescanning. [`TrialRunner`] estimates the percolation threshold by
//! opening random sites on fresh grids until they percolate.

mod config;
mod error;
mod grid;
mod runner;
mod source;
mod union_find;

pub use config::ExperimentConfig;
pub use error::{Error, Result};
pub use grid::ConnectivityGrid;
pub use runner::{Stats, TrialRunner};
pub use source::{RandomSource, Replay, UniformSource};
