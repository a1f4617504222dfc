//! Data loading modules.

pub mod loader;

pub use loader::*;
