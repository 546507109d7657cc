//! finfun-core: shared types and pure competition logic
//!
//! Everything in this crate is free of I/O so the web front-end and its tests
//! can derive listing state for any point in time.

pub mod errors;
pub mod lifecycle;
pub mod listing;
pub mod types;
pub mod validation;

pub use errors::*;
pub use lifecycle::*;
pub use listing::*;
pub use types::*;
pub use validation::*;
