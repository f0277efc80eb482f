//! Session management and process-level setup.
//!
//! - [`RetainedHolder`]: keeps coordinators alive across controller rebuilds
//!   and persists their state between sessions.
//! - [`setup_tracing`](tracing::setup_tracing): installs the log subscriber.

pub mod holder;
pub mod tracing;

pub use holder::*;
pub use self::tracing::*;
