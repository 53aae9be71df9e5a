//! Configuration for snowglobe renders
//!
//! Provides types and parsing for `snowglobe.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
