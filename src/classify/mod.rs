//! Neighbourhood classification of point-cloud samples into edge candidates.

pub mod classifier;

pub use classifier::*;
