//! Foundation types for repshare.
//!
//! This crate provides the data model shared by the storage boundary and the
//! scan engine. Every other repshare crate depends on `repshare-types`.
//!
//! # Key Types
//!
//! - [`ContentDigest`] — Content digest of a representation (BLAKE3 hash)
//! - [`Revision`] — Revision number within the append-only store
//! - [`NodeId`] — Identifier of one node record, stable for the run
//! - [`NodeRecord`] — Per-path, per-revision record naming the data/prop
//!   representations backing that path
//! - [`RepDescriptor`] — Physical location (+ optional digest) of one
//!   representation
//! - [`ChangedPathEntry`] — One path's change within a revision's change set

pub mod change;
pub mod digest;
pub mod error;
pub mod node;

pub use change::{ChangeKind, ChangedPathEntry};
pub use digest::ContentDigest;
pub use error::TypeError;
pub use node::{NodeId, NodeKind, NodeRecord, RepDescriptor, Revision};
