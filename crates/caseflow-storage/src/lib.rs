//! Storage boundary for the caseflow escalation engine.
//!
//! Defines the narrow [`EscalationStore`] interface the engine depends on,
//! plus two backends:
//!
//! - [`MemoryStore`] - in-process maps behind a `tokio::sync::RwLock`; the
//!   default backend and the test double.
//! - [`RedbStore`] - persistent storage on redb, one write transaction per
//!   mutation.

pub mod backends;
pub mod error;
pub mod memory;
pub mod store;

pub use backends::RedbStore;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use store::EscalationStore;
