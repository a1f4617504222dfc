//! Git synchronization modules.

pub mod sync;

pub use sync::*;
