//! # Resource Framework
//!
//! The plumbing every sub-resource is built on, independent of what it loads.
//!
//! ## Key Types
//!
//! - [`SubResource`] / [`Attachment`]: the attach, load, apply and detach contract.
//! - [`ResourceEvent`] / [`Envelope`] / [`Mailbox`]: how fetch tasks report back.
//! - [`ItemApi`]: the remote service, with [`mock::MockApi`] for tests.
//! - [`ApiError`] / [`CoordinatorError`]: the two error layers.

pub mod api;
pub mod error;
pub mod event;
pub mod mock;
pub mod resource;

pub use api::*;
pub use error::*;
pub use event::*;
pub use resource::*;
