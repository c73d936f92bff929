//! Core data structures shared by the decomposition pipeline.
//!
//! - [`types`] – Interaction kinds, particle types, solvent classes and local atom references.
//! - [`topology`] – The global topology: particles, clusters, exclusions and interaction lists.
//! - [`buffer`] – Growable per-domain storage with an explicit growth policy.
//! - [`local`] – Per-domain output: local interaction lists and exclusions.
//!
//! The global topology ([`GlobalTopology`]) is immutable once built; everything in
//! [`local`] is rebuilt by [`crate::make_local_topology`] whenever the spatial
//! decomposition changes.
//!
//! [`GlobalTopology`]: topology::GlobalTopology

pub mod buffer;
pub mod local;
pub mod topology;
pub mod types;
