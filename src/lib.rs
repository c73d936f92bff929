//! Distribution of a bonded molecular topology over spatial-decomposition
//! domains.
//!
//! Each domain owns a set of home atoms and sees a halo of neighbor atoms in
//! shifted zones. This crate decides which bonded interactions, virtual-site
//! constructions and exclusions every domain evaluates, such that each one is
//! evaluated exactly once over all domains, and verifies that property with a
//! single collective reduction.
//!
//! # Features
//!
//! - **Reverse topology** — Every bonded interaction is linked once to a
//!   representative home atom, so a domain only visits the atoms it holds
//! - **Exactly-once assignment** — Among all periodic images of an interaction,
//!   only the one with zero minimum zone shift is taken
//! - **Exclusion lists** — Local exclusions stored once per pair, with fast
//!   paths for rigid three- and four-site solvent
//! - **Consistency check** — Reduced local counts are compared against the
//!   global counts, with a per-kind breakdown on mismatch
//!
//! # Quick Start
//!
//! ```
//! use dd_topology::{
//!     DomainLayout, DomdecConfig, GlobalToLocal, GlobalTopology, IZone, InteractionKind,
//!     LocalTopology, SingleDomain, check_partition, link_topology, make_local_topology,
//! };
//!
//! // Propane backbone: two bonds and an angle
//! let mut topology = GlobalTopology::new(3);
//! topology.add(InteractionKind::Bond, 0, &[0, 1]);
//! topology.add(InteractionKind::Bond, 0, &[1, 2]);
//! topology.add(InteractionKind::Angle, 1, &[0, 1, 2]);
//!
//! let config = DomdecConfig::default();
//! let (reverse, counts) = link_topology(&topology, &config)?;
//!
//! // One domain owning every atom, one cluster per atom
//! let layout = DomainLayout {
//!     rank: 0,
//!     global_atoms: vec![0, 1, 2],
//!     cluster_index: vec![0, 1, 2, 3],
//!     zone_clusters: vec![0, 3],
//!     zone_shifts: vec![[0, 0, 0]],
//!     i_zones: vec![IZone { j_clusters: 0..3 }],
//!     solvent: vec![0; 3],
//! };
//! let ga2la = GlobalToLocal::from_layout(&layout, topology.atom_count());
//! let mut local = LocalTopology::new(config.interaction_chunk, config.exclusion_chunk);
//!
//! let local_count =
//!     make_local_topology(&layout, &ga2la, &topology, &reverse, &counts, &mut local)?;
//! assert_eq!(local_count, 3);
//! assert_eq!(local.count(InteractionKind::Bond), 2);
//!
//! check_partition(&SingleDomain, &local, local_count, &counts)?;
//! # Ok::<(), dd_topology::Error>(())
//! ```
//!
//! # Data Types
//!
//! ## Global Input
//!
//! - [`GlobalTopology`] — Particles, clusters, exclusions and interaction lists
//! - [`InteractionKind`] — Bonded, virtual-site, settle and constraint kinds
//! - [`DomainLayout`] — Atoms, clusters and zones present on one domain
//! - [`GlobalToLocal`] — Where a global atom lives on a domain
//!
//! ## Per-Domain Output
//!
//! - [`LocalTopology`] — Local interaction lists and exclusions
//! - [`LocalInteraction`] — One interaction with local (or deferred) atoms
//! - [`LocalExclusions`] — Excluded pairs, each stored once
//!
//! ## Checking
//!
//! - [`GlobalCounts`] — Reference totals
//! - [`Collective`] — The reduction used by [`check_partition`]
//! - [`PartitionReport`] — Breakdown of a failed check

mod domdec;
mod model;

pub use model::buffer::{DEFAULT_CHUNK, GrowBuffer};
pub use model::local::{LocalExclusions, LocalInteraction, LocalTopology};
pub use model::topology::{Block, GlobalTopology, InteractionList, InteractionRef};
pub use model::types::{
    AtomRef, InteractionKind, MAX_INTERACTION_ATOMS, ParseInteractionKindError,
    ParseParticleTypeError, ParticleType, SolventType,
};

pub use domdec::{
    Bucket, Collective, Direction, DomainLayout, DomdecConfig, Electrostatics, Error,
    GlobalCounts, GlobalToLocal, GroupMember, HomedInteraction, IZone, LocalAtom,
    PartitionReport, ReportRow, ReverseTopology, SingleDomain, UnsupportedTopology,
    check_partition, link_topology, load_config, make_local_topology, thread_group,
};
