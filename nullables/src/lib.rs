//! Nullable infrastructure for deterministic testing.
//!
//! The election's two external collaborators, the administrator capability
//! and the event observer, get test-friendly implementations here that:
//! - Can be controlled programmatically
//! - Record what they were asked
//! - Never touch the filesystem or network
//!
//! Usage: pass a [`FixedAdmin`] to `Election::new` and subscribe a
//! [`RecordingSink`] to assert on emitted events.

pub mod admin;
pub mod sink;

pub use admin::FixedAdmin;
pub use sink::RecordingSink;
