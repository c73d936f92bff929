//! Shared fixtures: periodic chains decomposed into 1-D slabs along x.

#![allow(dead_code)]

use std::thread;

use dd_topology::{
    AtomRef, DomainLayout, DomdecConfig, Error, GlobalCounts, GlobalToLocal, GlobalTopology,
    IZone, InteractionKind, LocalTopology, ReverseTopology, check_partition, link_topology,
    make_local_topology, thread_group,
};

/// Splits `n_atoms` single-atom clusters evenly over `n_domains` slabs.
///
/// Every domain sees the first `halo` atoms of its +x neighbor (periodic) as
/// zone 1 with shift `[1, 0, 0]`. A single i-zone spans all local clusters.
pub fn slab_layouts(n_atoms: usize, n_domains: usize, halo: usize) -> Vec<DomainLayout> {
    let bounds: Vec<usize> = (0..=n_domains).map(|d| d * n_atoms / n_domains).collect();

    (0..n_domains)
        .map(|d| {
            let own: Vec<usize> = (bounds[d]..bounds[d + 1]).collect();
            let mut global_atoms = own.clone();
            let mut zone_clusters = vec![0, own.len()];
            let mut zone_shifts = vec![[0, 0, 0]];

            if n_domains > 1 {
                let next = (d + 1) % n_domains;
                let next_atoms = bounds[next]..bounds[next + 1];
                let take = halo.min(next_atoms.len());
                global_atoms.extend(next_atoms.take(take));
                zone_clusters.push(global_atoms.len());
                zone_shifts.push([1, 0, 0]);
            }

            let n = global_atoms.len();
            DomainLayout {
                rank: d,
                global_atoms,
                cluster_index: (0..=n).collect(),
                zone_clusters,
                zone_shifts,
                i_zones: vec![IZone { j_clusters: 0..n }],
                solvent: vec![0; n],
            }
        })
        .collect()
}

/// A linear chain of bonds `(i, i + 1)`; closed into a ring when `periodic`.
pub fn chain_bonds(n_atoms: usize, periodic: bool) -> GlobalTopology {
    let mut topology = GlobalTopology::new(n_atoms);
    let n_bonds = if periodic { n_atoms } else { n_atoms - 1 };
    for i in 0..n_bonds {
        topology.add(InteractionKind::Bond, 0, &[i, (i + 1) % n_atoms]);
    }
    topology
}

/// A ring with bonds, angles and proper dihedrals, and 1-2 exclusions.
pub fn ring_polymer(n_atoms: usize) -> GlobalTopology {
    let mut topology = chain_bonds(n_atoms, true);
    let at = |i: usize| i % n_atoms;
    for i in 0..n_atoms {
        topology.add(InteractionKind::Angle, 1, &[at(i), at(i + 1), at(i + 2)]);
        topology.add(
            InteractionKind::ProperDihedral,
            2,
            &[at(i), at(i + 1), at(i + 2), at(i + 3)],
        );
    }
    let exclusions: Vec<Vec<usize>> = (0..n_atoms)
        .map(|i| {
            let mut list = vec![at(i + n_atoms - 1), i, at(i + 1)];
            list.sort_unstable();
            list
        })
        .collect();
    topology.set_exclusions(&exclusions);
    topology
}

pub struct DomainResult {
    pub layout: DomainLayout,
    pub local: LocalTopology,
    pub local_count: usize,
}

impl DomainResult {
    /// Global atoms of every local interaction of `kind`.
    pub fn global_interactions(&self, kind: InteractionKind) -> Vec<Vec<usize>> {
        self.local
            .list(kind)
            .iter()
            .map(|li| {
                li.atoms()
                    .iter()
                    .map(|a| match *a {
                        AtomRef::Resolved(la) => self.layout.global_atoms[la],
                        AtomRef::Deferred(ga) => ga,
                    })
                    .collect()
            })
            .collect()
    }

    /// Global atom pairs of the stored exclusions, smaller index first.
    pub fn global_exclusions(&self) -> Vec<(usize, usize)> {
        self.local
            .exclusions
            .pairs()
            .map(|(la, jla)| {
                let (a, b) = (self.layout.global_atoms[la], self.layout.global_atoms[jla]);
                (a.min(b), a.max(b))
            })
            .collect()
    }
}

pub struct Run {
    pub counts: GlobalCounts,
    pub reverse: ReverseTopology,
    pub domains: Vec<DomainResult>,
    /// Outcome of the collective check on every domain, by rank.
    pub checks: Vec<Result<(), Error>>,
}

/// Links the topology, builds every domain, then checks the partition with
/// one thread per domain.
pub fn run_domains(
    topology: &GlobalTopology,
    layouts: Vec<DomainLayout>,
    config: &DomdecConfig,
) -> Run {
    let (reverse, counts) = link_topology(topology, config).unwrap();

    let domains: Vec<DomainResult> = layouts
        .into_iter()
        .map(|layout| {
            let ga2la = GlobalToLocal::from_layout(&layout, topology.atom_count());
            let mut local = LocalTopology::new(16, 16);
            let local_count =
                make_local_topology(&layout, &ga2la, topology, &reverse, &counts, &mut local)
                    .unwrap();
            DomainResult {
                layout,
                local,
                local_count,
            }
        })
        .collect();

    let members = thread_group(domains.len());
    let checks: Vec<Result<(), Error>> = thread::scope(|s| {
        let handles: Vec<_> = domains
            .iter()
            .zip(&members)
            .map(|(d, comm)| {
                let counts = &counts;
                s.spawn(move || check_partition(comm, &d.local, d.local_count, counts))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    Run {
        counts,
        reverse,
        domains,
        checks,
    }
}
