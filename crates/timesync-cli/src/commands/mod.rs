//! Command implementations

mod sync;

pub use sync::run_sync;
