//! wayline-io: storage backends and timestamp formatting.
//!
//! Binds the sans-IO engine in `wayline-core` to the outside world:
//! a filesystem-backed [`Gateway`](wayline_core::Gateway)
//! implementation, an in-memory one for tests and ephemeral sessions,
//! and the `DD/MM/YY, HH:MM` labels shown in the saved-routes list.

pub mod fs;
pub mod memory;
pub mod timestamp;

pub use fs::FsGateway;
pub use memory::MemoryGateway;
