//! **mazecarver** is a perfect maze generation library.
//!
//! A rectangular [`Grid`](grid/struct.Grid.html) of cells carries explicit
//! per-cell wall flags. The [`generators`](generators/index.html) module
//! carves a spanning tree of passages into a fresh grid with a seeded
//! iterative recursive backtracker and picks a boundary spawn cell. Mapping
//! the wall flags to any physical or visual representation is left to the
//! caller.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod units;
mod utils;
