//! TOML scenario files: a global topology plus the layout of every domain.
//!
//! ```toml
//! [config]
//! electrostatics = "pme"
//!
//! [topology]
//! atoms = 4
//! clusters = [0, 2, 4]
//! virtual_sites = [3]
//! exclude_within_clusters = true
//!
//! [[topology.interactions]]
//! kind = "bond"
//! atoms = [0, 1]
//!
//! [[domains]]
//! global_atoms = [0, 1, 2, 3]
//! cluster_index = [0, 2, 4]
//! zone_clusters = [0, 2]
//! i_zones = [[0, 2]]
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use dd_topology::{
    DomainLayout, DomdecConfig, GlobalTopology, IZone, InteractionKind, ParticleType,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub config: Option<DomdecConfig>,
    pub topology: TopologySpec,
    #[serde(default)]
    pub domains: Vec<DomainSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopologySpec {
    pub atoms: usize,
    /// Cluster boundaries; one cluster per atom when omitted.
    #[serde(default)]
    pub clusters: Option<Vec<usize>>,
    #[serde(default)]
    pub virtual_sites: Vec<usize>,
    /// Per-atom exclusion lists, self included.
    #[serde(default)]
    pub exclusions: Option<Vec<Vec<usize>>>,
    /// Exclude all pairs within every cluster instead of listing exclusions.
    #[serde(default)]
    pub exclude_within_clusters: bool,
    #[serde(default)]
    pub interactions: Vec<InteractionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionSpec {
    pub kind: String,
    #[serde(default)]
    pub param: usize,
    pub atoms: Vec<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainSpec {
    pub global_atoms: Vec<usize>,
    pub cluster_index: Vec<usize>,
    pub zone_clusters: Vec<usize>,
    /// Defaults to a zero shift for every zone.
    #[serde(default)]
    pub zone_shifts: Option<Vec<[i32; 3]>>,
    /// j-cluster window `[start, end)` of every i-zone.
    pub i_zones: Vec<[usize; 2]>,
    /// Defaults to generic (0) for every cluster.
    #[serde(default)]
    pub solvent: Option<Vec<u8>>,
}

impl Scenario {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse scenario file")
    }

    pub fn build_topology(&self) -> Result<GlobalTopology> {
        let spec = &self.topology;
        let mut topology = GlobalTopology::new(spec.atoms);

        if let Some(clusters) = &spec.clusters {
            topology.set_clusters(clusters.clone());
        }
        for &site in &spec.virtual_sites {
            let Some(particle) = topology.particles.get_mut(site) else {
                bail!("virtual site {} out of range (atoms = {})", site, spec.atoms);
            };
            *particle = ParticleType::VirtualSite;
        }

        match (&spec.exclusions, spec.exclude_within_clusters) {
            (Some(_), true) => {
                bail!("set either 'exclusions' or 'exclude_within_clusters', not both")
            }
            (Some(lists), false) => topology.set_exclusions(lists),
            (None, true) => topology.exclude_within_clusters(),
            (None, false) => {}
        }

        for (i, ia) in spec.interactions.iter().enumerate() {
            let kind: InteractionKind = ia
                .kind
                .parse()
                .with_context(|| format!("interaction {}", i))?;
            if ia.atoms.len() != kind.atom_count() {
                bail!(
                    "interaction {} ({}) has {} atoms, expected {}",
                    i,
                    kind,
                    ia.atoms.len(),
                    kind.atom_count()
                );
            }
            topology.add(kind, ia.param, &ia.atoms);
        }

        Ok(topology)
    }

    pub fn layouts(&self) -> Vec<DomainLayout> {
        self.domains
            .iter()
            .enumerate()
            .map(|(rank, d)| {
                let n_zones = d.zone_clusters.len().saturating_sub(1);
                let n_clusters = d.cluster_index.len().saturating_sub(1);
                DomainLayout {
                    rank,
                    global_atoms: d.global_atoms.clone(),
                    cluster_index: d.cluster_index.clone(),
                    zone_clusters: d.zone_clusters.clone(),
                    zone_shifts: d.zone_shifts.clone().unwrap_or_else(|| vec![[0; 3]; n_zones]),
                    i_zones: d
                        .i_zones
                        .iter()
                        .map(|&[start, end]| IZone {
                            j_clusters: start..end,
                        })
                        .collect(),
                    solvent: d.solvent.clone().unwrap_or_else(|| vec![0; n_clusters]),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_PAIR: &str = r#"
        [config]
        electrostatics = "pme"

        [topology]
        atoms = 4
        clusters = [0, 2, 4]
        virtual_sites = [3]
        exclude_within_clusters = true

        [[topology.interactions]]
        kind = "bond"
        atoms = [0, 1]

        [[topology.interactions]]
        kind = "vsite2"
        param = 1
        atoms = [3, 2, 0]

        [[domains]]
        global_atoms = [0, 1, 2, 3]
        cluster_index = [0, 2, 4]
        zone_clusters = [0, 2]
        i_zones = [[0, 2]]
    "#;

    #[test]
    fn parses_topology_and_domains() {
        let scenario = Scenario::parse(WATER_PAIR).unwrap();
        let topology = scenario.build_topology().unwrap();

        assert_eq!(topology.atom_count(), 4);
        assert_eq!(topology.cluster_count(), 2);
        assert_eq!(topology.particles[3], ParticleType::VirtualSite);
        assert_eq!(topology.list(InteractionKind::Bond).len(), 1);
        assert_eq!(topology.list(InteractionKind::VirtualSite2).len(), 1);
        assert_eq!(topology.exclusions.get(2), &[2, 3]);
        assert!(scenario.config.unwrap().counts_exclusions());
    }

    #[test]
    fn layout_defaults_fill_shifts_and_solvent() {
        let scenario = Scenario::parse(WATER_PAIR).unwrap();
        let layouts = scenario.layouts();
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].zone_shifts, vec![[0, 0, 0]]);
        assert_eq!(layouts[0].solvent, vec![0, 0]);
        assert_eq!(layouts[0].i_zones[0].j_clusters, 0..2);
    }

    #[test]
    fn rejects_wrong_arity() {
        let text = r#"
            [topology]
            atoms = 3
            [[topology.interactions]]
            kind = "angle"
            atoms = [0, 1]
        "#;
        let err = Scenario::parse(text).unwrap().build_topology().unwrap_err();
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn rejects_unknown_kind() {
        let text = r#"
            [topology]
            atoms = 2
            [[topology.interactions]]
            kind = "spring"
            atoms = [0, 1]
        "#;
        assert!(Scenario::parse(text).unwrap().build_topology().is_err());
    }
}
