//! Inputs handed over by the spatial decomposition.
//!
//! A [`DomainLayout`] describes the atoms present on one domain: home atoms
//! first, then the halo grouped by zone, always in whole clusters. The
//! [`GlobalToLocal`] map answers where (and whether) a global atom lives on the
//! domain. Both are produced outside this crate; they are only read here.

use std::ops::Range;

use super::error::Error;

/// One neighbor-search i-zone.
///
/// Clusters of zone `k` are the i-clusters of the `k`-th i-zone; they are
/// paired with the local clusters in `j_clusters`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IZone {
    pub j_clusters: Range<usize>,
}

/// Atoms, clusters and zones present on one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainLayout {
    /// Rank of the domain, used for diagnostics only.
    pub rank: usize,
    /// Global index of every local atom; home atoms come first.
    pub global_atoms: Vec<usize>,
    /// First local atom of every local cluster, plus the end sentinel.
    pub cluster_index: Vec<usize>,
    /// First local cluster of every zone, plus the end sentinel. Zone 0 is home.
    pub zone_clusters: Vec<usize>,
    /// Periodic shift of every zone relative to the home cell.
    pub zone_shifts: Vec<[i32; 3]>,
    /// Neighbor-search i-zones, in zone order starting with zone 0.
    pub i_zones: Vec<IZone>,
    /// Solvent classification code of every local cluster of the i-zones.
    pub solvent: Vec<u8>,
}

impl DomainLayout {
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.global_atoms.len()
    }

    #[inline]
    pub fn cluster_count(&self) -> usize {
        self.cluster_index.len().saturating_sub(1)
    }

    #[inline]
    pub fn zone_count(&self) -> usize {
        self.zone_clusters.len().saturating_sub(1)
    }

    #[inline]
    pub fn home_cluster_count(&self) -> usize {
        self.zone_clusters[1]
    }

    #[inline]
    pub fn home_atom_count(&self) -> usize {
        self.cluster_index[self.home_cluster_count()]
    }

    #[inline]
    pub fn cluster_atoms(&self, cluster: usize) -> Range<usize> {
        self.cluster_index[cluster]..self.cluster_index[cluster + 1]
    }

    #[inline]
    pub fn zone_cluster_range(&self, zone: usize) -> Range<usize> {
        self.zone_clusters[zone]..self.zone_clusters[zone + 1]
    }

    /// Local atoms within the j-cluster window of an i-zone.
    #[inline]
    pub fn j_atom_window(&self, izone: usize) -> Range<usize> {
        let j = &self.i_zones[izone].j_clusters;
        self.cluster_index[j.start]..self.cluster_index[j.end]
    }

    /// Number of local atoms covered by the clusters of the first `n_izones`
    /// i-zones.
    #[inline]
    pub fn i_zone_atom_count(&self, n_izones: usize) -> usize {
        self.cluster_index[self.zone_clusters[n_izones]]
    }

    /// Checks the structural invariants the assignment relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] describing the first violation found.
    pub fn validate(&self, n_global: usize) -> Result<(), Error> {
        let fail = |detail: String| Err(Error::invalid_layout(self.rank, detail));

        if self.cluster_index.first() != Some(&0) {
            return fail("cluster index must start at 0".into());
        }
        if self.cluster_index.windows(2).any(|w| w[0] > w[1]) {
            return fail("cluster index is not monotonic".into());
        }
        if self.cluster_index.last() != Some(&self.atom_count()) {
            return fail(format!(
                "cluster index ends at {:?} but the domain has {} atoms",
                self.cluster_index.last(),
                self.atom_count()
            ));
        }
        if self.zone_clusters.len() < 2 || self.zone_clusters[0] != 0 {
            return fail("zone clusters must start at 0 and contain the home zone".into());
        }
        if self.zone_clusters.windows(2).any(|w| w[0] > w[1]) {
            return fail("zone clusters are not monotonic".into());
        }
        if self.zone_clusters.last() != Some(&self.cluster_count()) {
            return fail(format!(
                "zones cover {:?} clusters but the domain has {}",
                self.zone_clusters.last(),
                self.cluster_count()
            ));
        }
        if self.zone_shifts.len() != self.zone_count() {
            return fail(format!(
                "{} zone shifts given for {} zones",
                self.zone_shifts.len(),
                self.zone_count()
            ));
        }
        if self.zone_shifts[0] != [0, 0, 0] {
            return fail("the home zone must have a zero shift".into());
        }
        if self.i_zones.is_empty() || self.i_zones.len() > self.zone_count() {
            return fail(format!(
                "{} i-zones given for {} zones",
                self.i_zones.len(),
                self.zone_count()
            ));
        }
        for (ic, izone) in self.i_zones.iter().enumerate() {
            let j = &izone.j_clusters;
            if j.start > j.end || j.end > self.cluster_count() {
                return fail(format!("j-cluster window {:?} of i-zone {} is out of range", j, ic));
            }
        }
        let i_clusters = self.zone_clusters[self.i_zones.len()];
        if self.solvent.len() < i_clusters {
            return fail(format!(
                "solvent classification given for {} clusters, i-zones hold {}",
                self.solvent.len(),
                i_clusters
            ));
        }

        let mut seen = vec![false; n_global];
        for (la, &ga) in self.global_atoms.iter().enumerate() {
            if ga >= n_global {
                return fail(format!(
                    "local atom {} maps to global atom {} (n_atoms = {})",
                    la, ga, n_global
                ));
            }
            if std::mem::replace(&mut seen[ga], true) {
                return fail(format!("global atom {} is present twice", ga));
            }
        }

        Ok(())
    }
}

/// Location of a global atom on a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalAtom {
    pub index: usize,
    pub zone: usize,
}

/// Global→local atom map of one domain.
#[derive(Debug, Clone, Default)]
pub struct GlobalToLocal {
    entries: Vec<Option<LocalAtom>>,
}

impl GlobalToLocal {
    pub fn new(n_global: usize) -> Self {
        Self {
            entries: vec![None; n_global],
        }
    }

    /// Builds the map for a layout.
    pub fn from_layout(layout: &DomainLayout, n_global: usize) -> Self {
        let mut map = Self::new(n_global);
        map.fill(layout);
        map
    }

    /// Replaces the contents with the atoms of `layout`, keeping the allocation.
    ///
    /// Zones, clusters and atoms outside the bounds of a malformed layout are
    /// skipped; [`DomainLayout::validate`] reports them.
    pub fn fill(&mut self, layout: &DomainLayout) {
        self.clear();
        for (zone, bounds) in layout.zone_clusters.windows(2).enumerate() {
            let (Some(&start), Some(&end)) = (
                layout.cluster_index.get(bounds[0]),
                layout.cluster_index.get(bounds[1]),
            ) else {
                continue;
            };
            let atoms = layout.global_atoms.get(start..end).unwrap_or_default();
            for (offset, &global) in atoms.iter().enumerate() {
                if let Some(entry) = self.entries.get_mut(global) {
                    *entry = Some(LocalAtom {
                        index: start + offset,
                        zone,
                    });
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    #[inline]
    pub fn get(&self, global: usize) -> Option<LocalAtom> {
        self.entries.get(global).copied().flatten()
    }

    #[inline]
    pub fn is_present(&self, global: usize) -> bool {
        self.get(global).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two home clusters (atoms 4,5 and 6) and one halo cluster (atom 0)
    /// shifted along x.
    fn make_layout() -> DomainLayout {
        DomainLayout {
            rank: 1,
            global_atoms: vec![4, 5, 6, 0],
            cluster_index: vec![0, 2, 3, 4],
            zone_clusters: vec![0, 2, 3],
            zone_shifts: vec![[0, 0, 0], [1, 0, 0]],
            i_zones: vec![IZone { j_clusters: 0..3 }],
            solvent: vec![0, 0],
        }
    }

    #[test]
    fn layout_counts() {
        let layout = make_layout();
        assert_eq!(layout.atom_count(), 4);
        assert_eq!(layout.cluster_count(), 3);
        assert_eq!(layout.zone_count(), 2);
        assert_eq!(layout.home_atom_count(), 3);
        assert_eq!(layout.cluster_atoms(0), 0..2);
        assert_eq!(layout.j_atom_window(0), 0..4);
        assert_eq!(layout.i_zone_atom_count(1), 3);
    }

    #[test]
    fn valid_layout_passes() {
        assert!(make_layout().validate(8).is_ok());
    }

    #[test]
    fn rejects_out_of_range_global_atom() {
        let layout = make_layout();
        let err = layout.validate(5).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { domain: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_global_atom() {
        let mut layout = make_layout();
        layout.global_atoms[3] = 4;
        assert!(layout.validate(8).is_err());
    }

    #[test]
    fn rejects_shifted_home_zone() {
        let mut layout = make_layout();
        layout.zone_shifts[0] = [0, 1, 0];
        assert!(layout.validate(8).is_err());
    }

    #[test]
    fn rejects_missing_solvent_codes() {
        let mut layout = make_layout();
        layout.solvent.clear();
        assert!(layout.validate(8).is_err());
    }

    #[test]
    fn map_records_zone_and_local_index() {
        let layout = make_layout();
        let map = GlobalToLocal::from_layout(&layout, 8);
        assert_eq!(map.get(5), Some(LocalAtom { index: 1, zone: 0 }));
        assert_eq!(map.get(0), Some(LocalAtom { index: 3, zone: 1 }));
        assert_eq!(map.get(7), None);
        assert!(!map.is_present(1));
        assert_eq!(map.get(100), None);
    }

    #[test]
    fn fill_replaces_previous_contents() {
        let mut layout = make_layout();
        let mut map = GlobalToLocal::from_layout(&layout, 8);
        layout.global_atoms = vec![1, 2, 3, 7];
        map.fill(&layout);
        assert!(!map.is_present(4));
        assert_eq!(map.get(7), Some(LocalAtom { index: 3, zone: 1 }));
    }

    #[test]
    fn malformed_layout_maps_without_panicking() {
        let mut layout = make_layout();
        layout.global_atoms[1] = 42;
        layout.cluster_index = vec![0, 2, 9, 4];
        layout.zone_clusters.push(7);
        let map = GlobalToLocal::from_layout(&layout, 8);
        assert_eq!(map.get(42), None);
        assert!(layout.validate(8).is_err());
    }
}
