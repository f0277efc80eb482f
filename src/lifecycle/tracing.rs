//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter whose
//! level is taken from `RUST_LOG`.
//!
//! ```bash
//! # Coordinator start/stop, attach and detach
//! RUST_LOG=info cargo run
//!
//! # Every phase change, load request and listener notification
//! RUST_LOG=debug cargo run
//!
//! # Every envelope, including the ones ignored after detach
//! RUST_LOG=trace cargo run
//!
//! # Only the coordinator
//! RUST_LOG=item_resource::coordinator=debug cargo run
//! ```
//!
//! Every event carries structured fields rather than formatted text, so the
//! same logs can be filtered by `item_id` or `slot` in a log pipeline:
//!
//! ```text
//! INFO Coordinator attached item_id=7 item_type=movie phase=Loading
//! DEBUG Load requested slot=rating item_id=7
//! DEBUG Phase changed item_id=7 from=Loading to=PartiallyLoaded
//! DEBUG Aggregate changed item_id=7 delivered=true
//! ```
//!
//! Client operations are wrapped in `#[instrument]` spans, which the compact
//! format prints inline (`remove_review{item_id=7 review_id=10}: ...`).

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
