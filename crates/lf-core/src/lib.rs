//! lost-found/crates/lf-core/src/lib.rs
//!
//! The central domain model and interface definitions for the lost-and-found
//! board.

pub mod error;
pub mod models;
pub mod query;
pub mod seed;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use query::*;
pub use seed::*;
pub use traits::*;
