//! Curve fitting.
//!
//! Responsibilities:
//!
//! - order edge candidates along x
//! - solve the polynomial least-squares problem
//! - report fit diagnostics

pub mod fitter;

pub use fitter::*;
