//! Selection of the interactions a domain evaluates.
//!
//! Every present atom's reverse-topology bucket is visited once. Virtual
//! sites go to the domain that owns the site as a home atom. Any other
//! interaction is taken only when all of its atoms are present and the
//! per-dimension minimum of their zone shifts is zero: of all periodic images
//! of an interaction that are complete on some domain, exactly one has that
//! property.

use tracing::debug;

use super::layout::{DomainLayout, GlobalToLocal, LocalAtom};
use super::reverse::ReverseTopology;
use crate::model::local::{LocalInteraction, LocalTopology};
use crate::model::types::{AtomRef, MAX_INTERACTION_ATOMS};

/// Fills the interaction lists of `local` for one domain, replacing their
/// previous contents.
///
/// Returns the number of accepted interactions that enter the checked
/// totals, i.e. everything except virtual sites.
pub fn assign_interactions(
    layout: &DomainLayout,
    ga2la: &GlobalToLocal,
    reverse: &ReverseTopology,
    local: &mut LocalTopology,
) -> usize {
    local.clear_interactions();

    let nat_home = layout.home_atom_count();
    let mut tiatoms = [AtomRef::default(); MAX_INTERACTION_ATOMS];
    let mut count = 0;

    for (i, &gat) in layout.global_atoms.iter().enumerate() {
        for hi in reverse.bucket(gat) {
            let nral = hi.kind.atom_count();
            let accepted = if hi.kind.is_virtual_site() {
                // The construction goes where the site itself is home.
                i < nat_home && {
                    place_vsite(i, hi.atoms, ga2la, &mut tiatoms);
                    true
                }
            } else {
                place_bonded(hi.atoms, ga2la, &layout.zone_shifts, &mut tiatoms)
            };

            if accepted {
                local.push(hi.kind, LocalInteraction::new(hi.param, &tiatoms[..nral]));
                if hi.kind.is_counted() {
                    count += 1;
                }
            }
        }
    }

    debug!(
        domain = layout.rank,
        atoms = layout.atom_count(),
        home = nat_home,
        accepted = count,
        "assigned local interactions"
    );

    count
}

fn place_vsite(site: usize, atoms: &[usize], ga2la: &GlobalToLocal, tiatoms: &mut [AtomRef]) {
    tiatoms[0] = AtomRef::Resolved(site);
    for (slot, &ga) in tiatoms[1..].iter_mut().zip(&atoms[1..]) {
        *slot = match ga2la.get(ga) {
            Some(LocalAtom { index, zone: 0 }) => AtomRef::Resolved(index),
            _ => AtomRef::Deferred(ga),
        };
    }
}

fn place_bonded(
    atoms: &[usize],
    ga2la: &GlobalToLocal,
    zone_shifts: &[[i32; 3]],
    tiatoms: &mut [AtomRef],
) -> bool {
    let mut shift_min = [i32::MAX; 3];
    for (slot, &ga) in tiatoms.iter_mut().zip(atoms) {
        let Some(la) = ga2la.get(ga) else {
            return false;
        };
        *slot = AtomRef::Resolved(la.index);
        for (min, &s) in shift_min.iter_mut().zip(&zone_shifts[la.zone]) {
            *min = (*min).min(s);
        }
    }
    shift_min == [0, 0, 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domdec::layout::IZone;
    use crate::model::topology::GlobalTopology;
    use crate::model::types::{InteractionKind, ParticleType};

    /// Domain with home atoms 0,1 (zone 0), halo atom 2 in zone 1 (+x) and
    /// halo atom 3 in zone 2 (+y). Atom 4 is absent.
    fn make_layout() -> DomainLayout {
        DomainLayout {
            rank: 0,
            global_atoms: vec![0, 1, 2, 3],
            cluster_index: vec![0, 1, 2, 3, 4],
            zone_clusters: vec![0, 2, 3, 4],
            zone_shifts: vec![[0, 0, 0], [1, 0, 0], [0, 1, 0]],
            i_zones: vec![IZone { j_clusters: 0..4 }],
            solvent: vec![0, 0],
        }
    }

    fn run(top: &GlobalTopology) -> (LocalTopology, usize) {
        let layout = make_layout();
        let ga2la = GlobalToLocal::from_layout(&layout, top.atom_count());
        let reverse = ReverseTopology::build(top).unwrap();
        let mut local = LocalTopology::new(16, 16);
        let count = assign_interactions(&layout, &ga2la, &reverse, &mut local);
        (local, count)
    }

    #[test]
    fn accepts_fully_home_bond() {
        let mut top = GlobalTopology::new(5);
        top.add(InteractionKind::Bond, 7, &[0, 1]);
        let (local, count) = run(&top);
        assert_eq!(count, 1);
        let bond = local.list(InteractionKind::Bond)[0];
        assert_eq!(bond.param, 7);
        assert_eq!(bond.local_atoms(), Some(vec![0, 1]));
    }

    #[test]
    fn skips_interaction_with_absent_atom() {
        let mut top = GlobalTopology::new(5);
        top.add(InteractionKind::Bond, 0, &[1, 4]);
        let (local, count) = run(&top);
        assert_eq!(count, 0);
        assert!(local.list(InteractionKind::Bond).is_empty());
    }

    #[test]
    fn accepts_home_to_halo_bond() {
        let mut top = GlobalTopology::new(5);
        top.add(InteractionKind::Bond, 0, &[2, 1]);
        let (local, count) = run(&top);
        assert_eq!(count, 1);
        assert_eq!(local.list(InteractionKind::Bond)[0].local_atoms(), Some(vec![2, 1]));
    }

    #[test]
    fn accepts_halo_pair_with_zero_minimum_shift() {
        // Shifts (1,0,0) and (0,1,0) have a zero minimum in every dimension.
        let mut top = GlobalTopology::new(5);
        top.add(InteractionKind::Bond, 0, &[2, 3]);
        let (_, count) = run(&top);
        assert_eq!(count, 1);
    }

    #[test]
    fn rejects_interaction_entirely_in_shifted_zone() {
        let mut top = GlobalTopology::new(5);
        top.add(InteractionKind::PositionRestraint, 0, &[2]);
        top.add(InteractionKind::PositionRestraint, 0, &[0]);
        let (local, count) = run(&top);
        assert_eq!(count, 1);
        assert_eq!(
            local.list(InteractionKind::PositionRestraint)[0].local_atoms(),
            Some(vec![0])
        );
    }

    #[test]
    fn angle_homed_on_halo_center_is_still_found() {
        let mut top = GlobalTopology::new(5);
        top.add(InteractionKind::Angle, 0, &[0, 2, 1]);
        let (local, count) = run(&top);
        assert_eq!(count, 1);
        assert_eq!(local.list(InteractionKind::Angle)[0].local_atoms(), Some(vec![0, 2, 1]));
    }

    #[test]
    fn vsite_on_home_atom_defers_remote_constructors() {
        let mut top = GlobalTopology::new(5);
        top.particles[1] = ParticleType::VirtualSite;
        top.add(InteractionKind::VirtualSite3, 0, &[1, 0, 2, 4]);
        let (local, count) = run(&top);

        assert_eq!(count, 0, "virtual sites do not enter the checked count");
        let vs = local.list(InteractionKind::VirtualSite3);
        assert_eq!(vs.len(), 1);
        assert_eq!(
            vs[0].atoms(),
            &[
                AtomRef::Resolved(1),
                AtomRef::Resolved(0),
                AtomRef::Deferred(2),
                AtomRef::Deferred(4),
            ]
        );
    }

    #[test]
    fn vsite_on_halo_atom_is_left_to_its_owner() {
        let mut top = GlobalTopology::new(5);
        top.particles[2] = ParticleType::VirtualSite;
        top.add(InteractionKind::VirtualSite2, 0, &[2, 0, 1]);
        let (local, _) = run(&top);
        assert!(local.list(InteractionKind::VirtualSite2).is_empty());
    }

    #[test]
    fn rebuild_replaces_previous_assignment() {
        let mut top = GlobalTopology::new(5);
        top.add(InteractionKind::Bond, 0, &[0, 1]);
        let layout = make_layout();
        let ga2la = GlobalToLocal::from_layout(&layout, 5);
        let reverse = ReverseTopology::build(&top).unwrap();
        let mut local = LocalTopology::new(4, 4);

        assign_interactions(&layout, &ga2la, &reverse, &mut local);
        let count = assign_interactions(&layout, &ga2la, &reverse, &mut local);
        assert_eq!(count, 1);
        assert_eq!(local.count(InteractionKind::Bond), 1);
    }
}
