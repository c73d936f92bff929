mod assign;
mod collective;
mod config;
mod error;
mod exclusions;
mod layout;
mod report;
mod reverse;

pub use collective::{Collective, GroupMember, SingleDomain, thread_group};
pub use config::{DomdecConfig, Electrostatics, load_config};
pub use error::{Error, UnsupportedTopology};
pub use layout::{DomainLayout, GlobalToLocal, IZone, LocalAtom};
pub use report::{Direction, PartitionReport, ReportRow, check_partition};
pub use reverse::{Bucket, GlobalCounts, HomedInteraction, ReverseTopology};

use tracing::info;

use crate::model::local::LocalTopology;
use crate::model::topology::GlobalTopology;

/// Indexes the global topology by home atom and computes the global counts
/// the consistency check compares against. Done once per topology.
pub fn link_topology(
    topology: &GlobalTopology,
    config: &DomdecConfig,
) -> Result<(ReverseTopology, GlobalCounts), Error> {
    info!("Linking all bonded interactions to atoms");

    let reverse = ReverseTopology::build(topology)?;
    let counts = GlobalCounts::new(topology, &reverse, config);

    if counts.intercluster_vsites > 0 {
        info!(
            count = counts.intercluster_vsites,
            "There are {} inter charge-group virtual sites, will use an extra communication step for the constructing atoms",
            counts.intercluster_vsites
        );
    }
    if counts.needs_exclusion_correction() {
        info!(
            count = counts.intercluster_exclusions,
            "There are {} inter charge-group exclusions, will use an extra communication step for exclusion forces",
            counts.intercluster_exclusions
        );
    }

    Ok((reverse, counts))
}

/// Builds the local topology of one domain: its interactions and its
/// exclusions.
///
/// Returns the domain's checked local count, the value to pass to
/// [`check_partition`].
pub fn make_local_topology(
    layout: &DomainLayout,
    ga2la: &GlobalToLocal,
    topology: &GlobalTopology,
    reverse: &ReverseTopology,
    counts: &GlobalCounts,
    local: &mut LocalTopology,
) -> Result<usize, Error> {
    layout.validate(topology.atom_count())?;

    let mut local_count = assign::assign_interactions(layout, ga2la, reverse, local);

    let n_excl = exclusions::build_exclusions(
        layout,
        ga2la,
        &topology.exclusions,
        counts.intercluster_exclusions > 0,
        &mut local.exclusions,
    )?;
    if counts.counts_exclusions {
        local_count += n_excl;
    }

    Ok(local_count)
}
