//! Error types for domain-decomposed topology assignment.
//!
//! Errors are categorized by source: malformed inputs (topology, layout,
//! configuration), topologies the decomposition cannot distribute, and
//! partitions that failed the cross-domain consistency check.

use thiserror::Error;

use super::report::PartitionReport;

/// Topology features the decomposition cannot distribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedTopology {
    /// A virtual site spanning several clusters is constructed from another
    /// virtual site.
    ///
    /// The position of such a site cannot be built before the constructing
    /// site itself has been communicated from its owner.
    #[error(
        "virtual site {site} of cluster {cluster} spans multiple clusters and is constructed from virtual site(s) {constructing:?}; recursive inter-cluster virtual sites are not supported"
    )]
    RecursiveVirtualSite {
        /// Global index of the virtual site.
        site: usize,
        /// Global cluster the site belongs to.
        cluster: usize,
        /// Global indices of the constructing atoms that are virtual sites.
        constructing: Vec<usize>,
    },

    /// A local cluster carries a solvent classification outside the known set.
    #[error("unknown solvent type {code} for local cluster {cluster}")]
    UnknownSolventType {
        /// Local cluster index.
        cluster: usize,
        /// The unrecognized classification code.
        code: u8,
    },
}

/// Errors that can occur while distributing the topology over domains.
#[derive(Debug, Error)]
pub enum Error {
    /// The topology cannot be distributed by the domain decomposition.
    #[error("unsupported topology: {0}")]
    UnsupportedTopology(#[from] UnsupportedTopology),

    /// The reduced local interaction counts do not match the global counts.
    ///
    /// Carries the full per-kind breakdown; its display includes the likely
    /// cause of the mismatch.
    #[error("{0}")]
    PartitionInconsistency(Box<PartitionReport>),

    /// The global topology is malformed.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A domain layout handed over by the decomposition is malformed.
    #[error("invalid layout for domain {domain}: {detail}")]
    InvalidLayout {
        /// Rank of the domain whose layout was rejected.
        domain: usize,
        /// Description of the problem.
        detail: String,
    },

    /// Failed to parse the decomposition configuration TOML.
    #[error("failed to parse decomposition configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates an [`InvalidLayout`](Error::InvalidLayout) error.
    ///
    /// # Arguments
    ///
    /// * `domain` — Rank of the offending domain
    /// * `details` — Description of the problem
    pub fn invalid_layout(domain: usize, details: impl Into<String>) -> Self {
        Self::InvalidLayout {
            domain,
            detail: details.into(),
        }
    }

    /// Creates an [`InvalidTopology`](Error::InvalidTopology) error.
    pub fn invalid_topology(details: impl Into<String>) -> Self {
        Self::InvalidTopology(details.into())
    }

    /// Returns `true` for errors that require changing the decomposition
    /// (cell count, cut-off or halo width) before another attempt.
    pub fn is_fatal_partition(&self) -> bool {
        matches!(
            self,
            Error::PartitionInconsistency(_) | Error::UnsupportedTopology(_)
        )
    }
}

impl From<PartitionReport> for Error {
    fn from(report: PartitionReport) -> Self {
        Error::PartitionInconsistency(Box::new(report))
    }
}
