//! # scamwatch-core
//!
//! Shared vocabulary for the scamwatch crates:
//!
//! - **Session IDs**: [`ids::SessionId`], the opaque key a caller supplies per monitored call
//! - **Text**: [`text::truncate_str`] and friends for UTF-8–safe log previews
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by every other scamwatch crate.

#![deny(unsafe_code)]

pub mod ids;
pub mod logging;
pub mod text;

pub use ids::SessionId;
