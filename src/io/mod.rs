//! Input/output helpers.
//!
//! - point-cloud CSV ingest + validation (`ingest`)
//! - edge / point-cloud CSV exports (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
