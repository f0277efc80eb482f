//! # Coordinator
//!
//! One coordinator per detail screen. It merges the item, its rating and the
//! optional photo and review lists into a single [`AggregateSnapshot`] and
//! reports progress to the current [`ItemListener`].
//!
//! - [`ItemCoordinator`]: the synchronous state machine.
//! - [`CoordinatorActor`] / [`CoordinatorClient`]: runs it on a Tokio task and
//!   exposes it through message passing.
//! - [`ListenerSlot`]: the re-bindable listener reference.

pub mod actor;
pub mod client;
pub mod config;
pub mod core;
pub mod listener;
pub mod state;

pub use actor::*;
pub use client::*;
pub use config::*;
pub use self::core::*;
pub use listener::*;
pub use state::*;
