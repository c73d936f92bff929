mod common;

use std::collections::HashMap;

use dd_topology::{
    AtomRef, Direction, DomdecConfig, Electrostatics, Error, GlobalToLocal, InteractionKind,
    LocalTopology, ParticleType, link_topology, make_local_topology,
};

use common::{chain_bonds, ring_polymer, run_domains, slab_layouts};

fn pme() -> DomdecConfig {
    DomdecConfig {
        electrostatics: Electrostatics::Pme,
        ..Default::default()
    }
}

fn report_of(err: &Error) -> &dd_topology::PartitionReport {
    match err {
        Error::PartitionInconsistency(report) => report,
        other => panic!("expected a partition inconsistency, got {other}"),
    }
}

#[test]
fn every_interaction_is_assigned_exactly_once() {
    let mut topology = ring_polymer(24);
    topology.particles[5] = ParticleType::VirtualSite;
    topology.add(InteractionKind::VirtualSite2, 3, &[5, 4, 6]);

    let run = run_domains(&topology, slab_layouts(24, 4, 3), &pme());
    assert!(run.checks.iter().all(Result::is_ok));

    for kind in [
        InteractionKind::Bond,
        InteractionKind::Angle,
        InteractionKind::ProperDihedral,
        InteractionKind::VirtualSite2,
    ] {
        let mut seen: HashMap<Vec<usize>, usize> = HashMap::new();
        for domain in &run.domains {
            for atoms in domain.global_interactions(kind) {
                *seen.entry(atoms).or_default() += 1;
            }
        }
        let global: Vec<Vec<usize>> = topology
            .list(kind)
            .iter()
            .map(|ia| ia.atoms.to_vec())
            .collect();
        assert_eq!(seen.len(), global.len(), "{kind} coverage");
        for atoms in &global {
            assert_eq!(seen.get(atoms), Some(&1), "{kind} {atoms:?}");
        }
    }
}

#[test]
fn exclusion_pairs_are_stored_once_across_domains() {
    let topology = ring_polymer(24);
    let run = run_domains(&topology, slab_layouts(24, 4, 3), &pme());

    let mut pairs: Vec<(usize, usize)> = run
        .domains
        .iter()
        .flat_map(|d| d.global_exclusions())
        .collect();
    pairs.sort_unstable();
    let expected: Vec<(usize, usize)> = {
        let mut v: Vec<_> = (0..24).map(|i| (i.min((i + 1) % 24), i.max((i + 1) % 24))).collect();
        v.sort_unstable();
        v
    };
    assert_eq!(pairs, expected);
    assert_eq!(run.counts.exclusions, 24);
    assert_eq!(run.counts.total(), 24 * 3 + 24);
}

#[test]
fn virtual_site_keeps_remote_constructors_deferred() {
    let mut topology = ring_polymer(24);
    topology.particles[5] = ParticleType::VirtualSite;
    topology.add(InteractionKind::VirtualSite2, 3, &[5, 4, 6]);

    let run = run_domains(&topology, slab_layouts(24, 4, 3), &pme());
    assert_eq!(run.counts.intercluster_vsites, 1);

    let owner = &run.domains[0];
    let vs = owner.local.list(InteractionKind::VirtualSite2);
    assert_eq!(vs.len(), 1);
    assert_eq!(
        vs[0].atoms(),
        &[AtomRef::Resolved(5), AtomRef::Resolved(4), AtomRef::Deferred(6)]
    );
}

#[test]
fn ten_bonds_split_with_crossing_bonds_into_the_halo() {
    // Slabs of 10 atoms, each seeing the first two atoms of its +x neighbor.
    // Domain 0 owns (0,1) .. (8,9). Domain 1 owns five bonds from its atoms
    // 15..19 to atoms 20 and 21, which it only sees as halo. Domain 2 holds
    // 20 and 21 at home but never has 15..19, and sees (0,1) only shifted.
    let mut topology = dd_topology::GlobalTopology::new(30);
    for i in (0..10).step_by(2) {
        topology.add(InteractionKind::Bond, 0, &[i, i + 1]);
    }
    for i in 0..5 {
        topology.add(InteractionKind::Bond, 0, &[15 + i, 20 + i % 2]);
    }

    let run = run_domains(&topology, slab_layouts(30, 3, 2), &DomdecConfig::default());
    assert!(run.checks.iter().all(Result::is_ok));

    let per_domain: Vec<usize> = run
        .domains
        .iter()
        .map(|d| d.local.count(InteractionKind::Bond))
        .collect();
    assert_eq!(per_domain, [5, 5, 0]);

    let crossing = run.domains[1].global_interactions(InteractionKind::Bond);
    assert!(crossing.iter().all(|atoms| atoms[0] >= 15 && atoms[1] >= 20));
    assert!(!run.domains[2].layout.global_atoms.contains(&15));

    let reduced: usize = run.domains.iter().map(|d| d.local_count).sum();
    assert_eq!(reduced, 10);
    assert_eq!(run.counts.total(), 10);
}

#[test]
fn malformed_layout_is_rejected_before_assignment() {
    let topology = chain_bonds(10, false);
    let (reverse, counts) = link_topology(&topology, &DomdecConfig::default()).unwrap();

    let mut layout = slab_layouts(10, 1, 0).remove(0);
    layout.global_atoms[3] = 99;
    layout.cluster_index.push(40);

    let ga2la = GlobalToLocal::from_layout(&layout, topology.atom_count());
    let mut local = LocalTopology::new(16, 16);
    let err = make_local_topology(&layout, &ga2la, &topology, &reverse, &counts, &mut local)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLayout { domain: 0, .. }));
}

#[test]
fn two_domains_with_full_halo_over_count_the_straddling_bond() {
    let topology = chain_bonds(20, false);
    // Each halo covers the whole other slab: bond (9, 10) is complete with a
    // zero minimum shift on both domains.
    let run = run_domains(&topology, slab_layouts(20, 2, 10), &DomdecConfig::default());

    for check in &run.checks {
        let err = check.as_ref().unwrap_err();
        assert!(err.is_fatal_partition());
        let report = report_of(err);
        assert_eq!(report.direction, Direction::OverCount);
        assert_eq!(report.total_diff, 1);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].name, "Bond");
        assert_eq!(report.rows[0].diff, 1);
    }
}

#[test]
fn missing_halo_under_counts_boundary_bonds() {
    let topology = chain_bonds(20, false);
    let run = run_domains(&topology, slab_layouts(20, 2, 0), &DomdecConfig::default());

    let report = report_of(run.checks[0].as_ref().unwrap_err());
    assert_eq!(report.direction, Direction::UnderCount);
    assert_eq!(report.total_diff, -1);
    assert!(report.to_string().contains("could not be calculated"));
}

#[test]
fn three_domains_do_not_over_count() {
    let topology = chain_bonds(30, true);
    let run = run_domains(&topology, slab_layouts(30, 3, 10), &DomdecConfig::default());
    assert!(run.checks.iter().all(Result::is_ok));
    let total: usize = run.domains.iter().map(|d| d.local_count).sum();
    assert_eq!(total, 30);
}
