//! Mathematical utilities: local covariance, least squares, and grids.

pub mod covariance;
pub mod grid;
pub mod ols;

pub use covariance::*;
pub use grid::*;
pub use ols::*;
