use super::types::{InteractionKind, ParticleType};

/// Borrowed view of one interaction: parameter index plus its global atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionRef<'a> {
    pub param: usize,
    pub atoms: &'a [usize],
}

impl InteractionRef<'_> {
    #[inline]
    pub fn home_atom(&self, kind: InteractionKind) -> usize {
        self.atoms[kind.home_position()]
    }
}

/// All interactions of one kind, stored flat as `param, a0, .., an` records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionList {
    kind: InteractionKind,
    iatoms: Vec<usize>,
}

impl InteractionList {
    pub fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            iatoms: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    #[inline]
    pub fn stride(&self) -> usize {
        1 + self.kind.atom_count()
    }

    pub fn push(&mut self, param: usize, atoms: &[usize]) {
        debug_assert_eq!(atoms.len(), self.kind.atom_count());
        self.iatoms.push(param);
        self.iatoms.extend_from_slice(atoms);
    }

    /// Number of complete interactions in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.iatoms.len() / self.stride()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.iatoms.is_empty()
    }

    /// Raw flat storage; its length is a multiple of [`stride`](Self::stride)
    /// for a well-formed list.
    #[inline]
    pub fn raw(&self) -> &[usize] {
        &self.iatoms
    }

    pub fn iter(&self) -> impl Iterator<Item = InteractionRef<'_>> {
        self.iatoms
            .chunks_exact(self.stride())
            .map(|record| InteractionRef {
                param: record[0],
                atoms: &record[1..],
            })
    }
}

/// Compressed list of lists: entries of item `i` are
/// `entries[index[i]..index[i + 1]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub index: Vec<usize>,
    pub entries: Vec<usize>,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            index: vec![0],
            entries: Vec::new(),
        }
    }
}

impl Block {
    pub fn from_lists<L: AsRef<[usize]>>(lists: &[L]) -> Self {
        let mut index = Vec::with_capacity(lists.len() + 1);
        let mut entries = Vec::new();
        index.push(0);
        for list in lists {
            entries.extend_from_slice(list.as_ref());
            index.push(entries.len());
        }
        Self { index, entries }
    }

    /// Empty lists for `n` items.
    pub fn empty(n: usize) -> Self {
        Self {
            index: vec![0; n + 1],
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, i: usize) -> &[usize] {
        &self.entries[self.index[i]..self.index[i + 1]]
    }
}

/// The global, immutable description of the simulated system.
///
/// Atoms are partitioned into contiguous clusters (charge groups) through
/// `cluster_index`; `exclusions` holds, for every atom, the global indices of
/// atoms it must not interact with through the non-bonded kernels (the atom
/// itself included, both directions listed).
#[derive(Debug, Clone)]
pub struct GlobalTopology {
    pub particles: Vec<ParticleType>,
    pub cluster_index: Vec<usize>,
    pub exclusions: Block,
    interactions: Vec<InteractionList>,
}

impl GlobalTopology {
    /// Creates a topology of `n_atoms` plain atoms, one cluster per atom and no
    /// exclusions or interactions.
    pub fn new(n_atoms: usize) -> Self {
        Self {
            particles: vec![ParticleType::Atom; n_atoms],
            cluster_index: (0..=n_atoms).collect(),
            exclusions: Block::empty(n_atoms),
            interactions: InteractionKind::ALL
                .iter()
                .map(|&kind| InteractionList::new(kind))
                .collect(),
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn cluster_count(&self) -> usize {
        self.cluster_index.len().saturating_sub(1)
    }

    #[inline]
    pub fn cluster_range(&self, cluster: usize) -> std::ops::Range<usize> {
        self.cluster_index[cluster]..self.cluster_index[cluster + 1]
    }

    #[inline]
    pub fn list(&self, kind: InteractionKind) -> &InteractionList {
        &self.interactions[kind.index()]
    }

    pub fn lists(&self) -> impl Iterator<Item = &InteractionList> {
        self.interactions.iter()
    }

    pub fn add(&mut self, kind: InteractionKind, param: usize, atoms: &[usize]) {
        self.interactions[kind.index()].push(param, atoms);
    }

    pub fn set_clusters(&mut self, cluster_index: Vec<usize>) {
        self.cluster_index = cluster_index;
    }

    pub fn set_exclusions<L: AsRef<[usize]>>(&mut self, lists: &[L]) {
        self.exclusions = Block::from_lists(lists);
    }

    /// Builds symmetric exclusion lists (self included) where every cluster
    /// excludes all of its own atom pairs, as rigid solvent molecules do.
    pub fn exclude_within_clusters(&mut self) {
        let lists: Vec<Vec<usize>> = (0..self.cluster_count())
            .flat_map(|c| {
                let range = self.cluster_range(c);
                range.clone().map(move |_| range.clone().collect())
            })
            .collect();
        self.set_exclusions(&lists);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_propane() -> GlobalTopology {
        let mut top = GlobalTopology::new(3);
        top.add(InteractionKind::Bond, 0, &[0, 1]);
        top.add(InteractionKind::Bond, 0, &[1, 2]);
        top.add(InteractionKind::Angle, 1, &[0, 1, 2]);
        top
    }

    #[test]
    fn new_topology_has_one_cluster_per_atom() {
        let top = GlobalTopology::new(4);
        assert_eq!(top.atom_count(), 4);
        assert_eq!(top.cluster_count(), 4);
        assert_eq!(top.cluster_range(2), 2..3);
        assert_eq!(top.exclusions.len(), 4);
        assert!(top.exclusions.get(3).is_empty());
    }

    #[test]
    fn interaction_list_iterates_records() {
        let top = make_propane();
        let bonds: Vec<_> = top.list(InteractionKind::Bond).iter().collect();
        assert_eq!(bonds.len(), 2);
        assert_eq!(bonds[1].atoms, &[1, 2]);
        assert_eq!(top.list(InteractionKind::Angle).len(), 1);
        assert!(top.list(InteractionKind::Settle).is_empty());
    }

    #[test]
    fn angle_is_homed_on_center_atom() {
        let top = make_propane();
        let angle = top.list(InteractionKind::Angle).iter().next().unwrap();
        assert_eq!(angle.param, 1);
        assert_eq!(angle.home_atom(InteractionKind::Angle), 1);
    }

    #[test]
    fn block_from_lists() {
        let block = Block::from_lists(&[vec![0, 1], vec![], vec![2]]);
        assert_eq!(block.len(), 3);
        assert_eq!(block.index, vec![0, 2, 2, 3]);
        assert_eq!(block.get(0), &[0, 1]);
        assert!(block.get(1).is_empty());
    }

    #[test]
    fn exclude_within_clusters_is_symmetric() {
        let mut top = GlobalTopology::new(5);
        top.set_clusters(vec![0, 3, 5]);
        top.exclude_within_clusters();
        assert_eq!(top.exclusions.get(0), &[0, 1, 2]);
        assert_eq!(top.exclusions.get(2), &[0, 1, 2]);
        assert_eq!(top.exclusions.get(4), &[3, 4]);
    }
}
