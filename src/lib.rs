//! # Item Resource
//!
//! > **Session-scoped loading for an item detail screen.**
//!
//! A detail screen shows one item together with its rating, its photo album
//! and its reviews. Each of those comes from a different endpoint, arrives in
//! any order and may fail independently. This crate loads them concurrently,
//! merges them into one snapshot once everything required is present, and
//! keeps that work alive while the screen's controller is torn down and rebuilt.
//!
//! ## 🏗️ Design
//!
//! ### One actor per screen
//! Each screen gets an [`ItemCoordinator`](coordinator::ItemCoordinator) running
//! on its own Tokio task. Sub-resources fetch on separate tasks and post
//! [`Envelope`](framework::Envelope)s back into the coordinator's mailbox, so all
//! state changes happen on one task and no locks guard the coordinator state.
//!
//! ### Listeners are borrowed, never owned
//! The coordinator reports through a [`ListenerSlot`](coordinator::ListenerSlot)
//! that holds a `Weak` reference. A controller being rebuilt unregisters, the
//! new one registers, and later callbacks reach only the new one.
//!
//! ### Errors
//! [`ApiError`](framework::ApiError) is what the remote service reports and is
//! passed through to the listener, once per coordinator.
//! [`CoordinatorError`](framework::CoordinatorError) covers channels, sessions and
//! saved state.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! `Item`, `SimpleItem`, `Rating`, `Photo`, `Review`.
//!
//! ### 2. The Plumbing ([`framework`])
//! The [`SubResource`](framework::SubResource) contract, events, the
//! [`ItemApi`](framework::ItemApi) seam and its [`MockApi`](framework::mock::MockApi).
//!
//! ### 3. The Loaders ([`resources`])
//! One sub-resource per endpoint: item, rating, photo list, review list.
//!
//! ### 4. The Aggregate ([`coordinator`])
//! The state machine, its actor and the client used to talk to it.
//!
//! ### 5. The Sessions ([`lifecycle`])
//! [`RetainedHolder`](lifecycle::RetainedHolder) and tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! cargo test
//! ```

pub mod coordinator;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod resources;
