//! Local exclusion lists.
//!
//! Exclusions are looped over explicitly by reaction-field and Ewald-type
//! electrostatics, so every excluded pair must be stored exactly once. The
//! lists follow the neighbor-search zone scheme: an atom of i-zone `k` only
//! keeps partners inside that zone's j-cluster window, and a pair is always
//! stored under its smaller local index.

use tracing::debug;

use super::error::{Error, UnsupportedTopology};
use super::layout::{DomainLayout, GlobalToLocal};
use crate::model::local::LocalExclusions;
use crate::model::topology::Block;
use crate::model::types::SolventType;

/// Builds the local exclusions of one domain into `out`, replacing its
/// previous contents.
///
/// When `has_intercluster` is `false` no exclusion crosses a cluster boundary
/// anywhere in the system; only the home clusters are visited and
/// [`LocalExclusions::nr`] is limited to the home atoms.
///
/// Returns the number of stored pairs, for the consistency check.
///
/// # Errors
///
/// Returns [`UnsupportedTopology::UnknownSolventType`] for an unrecognized
/// cluster classification and [`Error::InvalidLayout`] when a rigid solvent
/// cluster does not have the expected number of atoms.
pub fn build_exclusions(
    layout: &DomainLayout,
    ga2la: &GlobalToLocal,
    exclusions: &Block,
    has_intercluster: bool,
    out: &mut LocalExclusions,
) -> Result<usize, Error> {
    out.clear();

    let n_izones = if has_intercluster { layout.i_zones.len() } else { 1 };
    let nr = layout.i_zone_atom_count(layout.i_zones.len());
    out.index.resize(nr + 1, 0);

    let mut count = 0;
    for ic in 0..n_izones {
        let j_window = layout.j_atom_window(ic);
        for cg in layout.zone_cluster_range(ic) {
            let atoms = layout.cluster_atoms(cg);
            let code = layout.solvent[cg];
            let solvent = SolventType::from_code(code)
                .ok_or(UnsupportedTopology::UnknownSolventType { cluster: cg, code })?;

            match solvent.rigid_size() {
                None => {
                    for la in atoms {
                        out.index[la] = out.partners.len();
                        let a = layout.global_atoms[la];
                        for &ga in exclusions.get(a) {
                            let Some(j) = ga2la.get(ga) else {
                                continue;
                            };
                            if j.index > la && j_window.contains(&j.index) {
                                out.partners.push(j.index);
                                count += 1;
                            }
                        }
                    }
                }
                Some(size) => {
                    if atoms.len() != size {
                        return Err(Error::invalid_layout(
                            layout.rank,
                            format!(
                                "rigid solvent cluster {} has {} atoms, expected {}",
                                cg,
                                atoms.len(),
                                size
                            ),
                        ));
                    }
                    // All intra-cluster pairs, written from the home i-zone only.
                    for la in atoms.clone() {
                        out.index[la] = out.partners.len();
                        if ic == 0 {
                            for jla in la + 1..atoms.end {
                                out.partners.push(jla);
                            }
                        }
                    }
                    if ic == 0 {
                        count += size * (size - 1) / 2;
                    }
                }
            }
        }
    }

    let n = out.partners.len();
    let visited = layout.i_zone_atom_count(n_izones);
    for la in visited..nr {
        out.index[la] = n;
    }
    out.index[nr] = n;
    out.nr = if has_intercluster { nr } else { visited };

    debug!(
        domain = layout.rank,
        stored = n,
        check = count,
        "built local exclusions"
    );

    Ok(count)
}
