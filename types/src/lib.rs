//! Fundamental types for the ballot workspace.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! caller identities, the workflow phase enum, and proposal identifiers.

pub mod address;
pub mod error;
pub mod phase;

pub use address::Address;
pub use error::TypesError;
pub use phase::WorkflowPhase;

/// Position of a proposal in the append-only proposal sequence.
///
/// Assigned at submission time and never reused.
pub type ProposalId = usize;
