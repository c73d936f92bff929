//! Atom-indexed inversion of the global interaction lists.
//!
//! Every homed interaction is stored exactly once, in the bucket of its
//! representative atom. Assignment then only has to visit the buckets of the
//! atoms present on a domain instead of scanning the full topology.

use super::config::DomdecConfig;
use super::error::{Error, UnsupportedTopology};
use crate::model::topology::GlobalTopology;
use crate::model::types::{InteractionKind, ParticleType};

/// One interaction found in a reverse-topology bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomedInteraction<'a> {
    pub kind: InteractionKind,
    pub param: usize,
    pub atoms: &'a [usize],
}

/// Iterator over the interactions homed on one atom.
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    slots: &'a [usize],
}

impl<'a> Iterator for Bucket<'a> {
    type Item = HomedInteraction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&kind_slot, rest) = self.slots.split_first()?;
        let kind = InteractionKind::from_index(kind_slot)?;
        let (record, rest) = rest.split_at(1 + kind.atom_count());
        self.slots = rest;
        Some(HomedInteraction {
            kind,
            param: record[0],
            atoms: &record[1..],
        })
    }
}

/// Compressed `atom → homed interactions` index.
///
/// The bucket of atom `a` is `payload[index[a]..index[a + 1]]`, a sequence of
/// `kind, param, a0, .., an` records (`arity + 2` slots each).
#[derive(Debug, Clone)]
pub struct ReverseTopology {
    index: Vec<usize>,
    payload: Vec<usize>,
    homed: usize,
    intercluster_vsites: usize,
}

impl ReverseTopology {
    /// Links every bonded, virtual-site and settle interaction to its home atom.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTopology`] for malformed input and
    /// [`UnsupportedTopology::RecursiveVirtualSite`] when a virtual site that
    /// spans several clusters is constructed from another virtual site.
    pub fn build(topology: &GlobalTopology) -> Result<Self, Error> {
        validate_topology(topology)?;

        let n_atoms = topology.atom_count();

        let mut count = vec![0usize; n_atoms];
        for list in topology.lists().filter(|l| l.kind().is_homed()) {
            let kind = list.kind();
            for ia in list.iter() {
                count[ia.home_atom(kind)] += kind.atom_count() + 2;
            }
        }

        let mut index = Vec::with_capacity(n_atoms + 1);
        index.push(0);
        for c in count.iter_mut() {
            let next = index[index.len() - 1] + *c;
            index.push(next);
            *c = 0;
        }

        let mut payload = vec![0usize; index[n_atoms]];
        let mut homed = 0;
        for list in topology.lists().filter(|l| l.kind().is_homed()) {
            let kind = list.kind();
            let nral = kind.atom_count();
            for ia in list.iter() {
                let home = ia.home_atom(kind);
                let at = index[home] + count[home];
                payload[at] = kind.index();
                payload[at + 1] = ia.param;
                payload[at + 2..at + 2 + nral].copy_from_slice(ia.atoms);
                count[home] += nral + 2;
                homed += 1;
            }
        }

        let mut reverse = Self {
            index,
            payload,
            homed,
            intercluster_vsites: 0,
        };
        reverse.intercluster_vsites = reverse.count_intercluster_vsites(topology)?;

        Ok(reverse)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.index.len() - 1
    }

    /// Number of interactions linked into the index.
    #[inline]
    pub fn homed_count(&self) -> usize {
        self.homed
    }

    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Virtual sites whose constructing atoms are not all in the site's cluster.
    #[inline]
    pub fn intercluster_vsites(&self) -> usize {
        self.intercluster_vsites
    }

    #[inline]
    pub fn bucket(&self, atom: usize) -> Bucket<'_> {
        Bucket {
            slots: &self.payload[self.index[atom]..self.index[atom + 1]],
        }
    }

    fn count_intercluster_vsites(&self, topology: &GlobalTopology) -> Result<usize, Error> {
        let mut n_intercluster = 0;
        for cluster in 0..topology.cluster_count() {
            let range = topology.cluster_range(cluster);
            for a in range.clone() {
                for hi in self.bucket(a).filter(|hi| hi.kind.is_virtual_site()) {
                    let constructing = &hi.atoms[1..];
                    let outside = constructing.iter().any(|j| !range.contains(j));
                    if !outside {
                        continue;
                    }
                    n_intercluster += 1;
                    let vsites: Vec<usize> = constructing
                        .iter()
                        .copied()
                        .filter(|&j| topology.particles[j] == ParticleType::VirtualSite)
                        .collect();
                    if !vsites.is_empty() {
                        return Err(UnsupportedTopology::RecursiveVirtualSite {
                            site: hi.atoms[0],
                            cluster,
                            constructing: vsites,
                        }
                        .into());
                    }
                }
            }
        }
        Ok(n_intercluster)
    }
}

/// Global interaction and exclusion counts, the reference for the
/// cross-domain consistency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalCounts {
    /// Global number of interactions per kind, indexed by [`InteractionKind::index`].
    pub per_kind: [usize; InteractionKind::COUNT],
    /// Excluded atom pairs, each pair counted once, self-exclusions not counted.
    pub exclusions: usize,
    /// Excluded pairs whose atoms are in different clusters.
    pub intercluster_exclusions: usize,
    /// See [`ReverseTopology::intercluster_vsites`].
    pub intercluster_vsites: usize,
    /// Whether exclusions are part of the checked total.
    pub counts_exclusions: bool,
}

impl GlobalCounts {
    pub fn new(topology: &GlobalTopology, reverse: &ReverseTopology, config: &DomdecConfig) -> Self {
        let mut per_kind = [0; InteractionKind::COUNT];
        for list in topology.lists() {
            per_kind[list.kind().index()] = list.len();
        }
        let (exclusions, intercluster_exclusions) = count_exclusions(topology);

        Self {
            per_kind,
            exclusions,
            intercluster_exclusions,
            intercluster_vsites: reverse.intercluster_vsites(),
            counts_exclusions: config.counts_exclusions(),
        }
    }

    #[inline]
    pub fn count(&self, kind: InteractionKind) -> usize {
        self.per_kind[kind.index()]
    }

    /// Interactions that enter the checked total (homed, not virtual sites).
    pub fn interactions(&self) -> usize {
        InteractionKind::ALL
            .iter()
            .filter(|k| k.is_counted())
            .map(|k| self.count(*k))
            .sum()
    }

    /// The total that the reduced local counts must reproduce.
    pub fn total(&self) -> usize {
        self.interactions() + if self.counts_exclusions { self.exclusions } else { 0 }
    }

    /// Whether exclusion forces of pairs spanning clusters need an extra
    /// communication step with full electrostatics.
    #[inline]
    pub fn needs_exclusion_correction(&self) -> bool {
        self.counts_exclusions && self.intercluster_exclusions > 0
    }
}

/// Counts excluded pairs `(at, atj)` with `atj > at`, and how many of those
/// cross a cluster boundary.
fn count_exclusions(topology: &GlobalTopology) -> (usize, usize) {
    let mut n = 0;
    let mut n_intercluster = 0;
    for cluster in 0..topology.cluster_count() {
        let range = topology.cluster_range(cluster);
        for at in range.clone() {
            for &atj in topology.exclusions.get(at) {
                if atj > at {
                    n += 1;
                    if !range.contains(&atj) {
                        n_intercluster += 1;
                    }
                }
            }
        }
    }
    (n, n_intercluster)
}

fn validate_topology(topology: &GlobalTopology) -> Result<(), Error> {
    let n_atoms = topology.atom_count();

    let ci = &topology.cluster_index;
    if ci.first() != Some(&0) || ci.last() != Some(&n_atoms) || ci.windows(2).any(|w| w[0] > w[1]) {
        return Err(Error::invalid_topology(format!(
            "cluster index must rise monotonically from 0 to {}",
            n_atoms
        )));
    }

    if topology.exclusions.len() != n_atoms {
        return Err(Error::invalid_topology(format!(
            "exclusions given for {} atoms (n_atoms = {})",
            topology.exclusions.len(),
            n_atoms
        )));
    }
    let xi = &topology.exclusions.index;
    if xi.first() != Some(&0)
        || xi.last() != Some(&topology.exclusions.entries.len())
        || xi.windows(2).any(|w| w[0] > w[1])
    {
        return Err(Error::invalid_topology(format!(
            "exclusion index must rise monotonically from 0 to {}",
            topology.exclusions.entries.len()
        )));
    }
    if let Some(&bad) = topology.exclusions.entries.iter().find(|&&a| a >= n_atoms) {
        return Err(Error::invalid_topology(format!(
            "exclusion partner {} out of bounds (n_atoms = {})",
            bad, n_atoms
        )));
    }

    for list in topology.lists() {
        if list.raw().len() % list.stride() != 0 {
            return Err(Error::invalid_topology(format!(
                "{} list has a truncated record",
                list.kind()
            )));
        }
        for ia in list.iter() {
            if let Some(&bad) = ia.atoms.iter().find(|&&a| a >= n_atoms) {
                return Err(Error::invalid_topology(format!(
                    "{} references atom {} (n_atoms = {})",
                    list.kind(),
                    bad,
                    n_atoms
                )));
            }
        }
    }

    Ok(())
}
