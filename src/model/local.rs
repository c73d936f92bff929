use super::buffer::GrowBuffer;
use super::types::{AtomRef, InteractionKind, MAX_INTERACTION_ATOMS};

/// One interaction selected for evaluation on a domain, with its atoms
/// translated to local references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalInteraction {
    pub param: usize,
    len: u8,
    atoms: [AtomRef; MAX_INTERACTION_ATOMS],
}

impl LocalInteraction {
    pub fn new(param: usize, atoms: &[AtomRef]) -> Self {
        debug_assert!(atoms.len() <= MAX_INTERACTION_ATOMS);
        let mut stored = [AtomRef::default(); MAX_INTERACTION_ATOMS];
        stored[..atoms.len()].copy_from_slice(atoms);
        Self {
            param,
            len: atoms.len() as u8,
            atoms: stored,
        }
    }

    #[inline]
    pub fn atoms(&self) -> &[AtomRef] {
        &self.atoms[..self.len as usize]
    }

    /// Local indices of all atoms, or `None` while any atom is still deferred.
    pub fn local_atoms(&self) -> Option<Vec<usize>> {
        self.atoms().iter().map(AtomRef::local).collect()
    }
}

/// Exclusions of the local atoms in compressed form.
///
/// Partners of local atom `la` are `partners[index[la]..index[la + 1]]`, for
/// `la < atom_count()`. Every excluded pair is stored once, under its smaller
/// local index.
#[derive(Debug, Clone)]
pub struct LocalExclusions {
    pub index: Vec<usize>,
    pub partners: GrowBuffer<usize>,
    pub nr: usize,
}

impl LocalExclusions {
    pub fn new(chunk: usize) -> Self {
        Self {
            index: vec![0],
            partners: GrowBuffer::new(chunk),
            nr: 0,
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.nr
    }

    #[inline]
    pub fn get(&self, la: usize) -> &[usize] {
        &self.partners[self.index[la]..self.index[la + 1]]
    }

    #[inline]
    pub fn pair_count(&self) -> usize {
        self.partners.len()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.nr).flat_map(move |la| self.get(la).iter().map(move |&jla| (la, jla)))
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.index.push(0);
        self.partners.clear();
        self.nr = 0;
    }
}

/// Everything one domain evaluates: interactions per kind and exclusions.
#[derive(Debug, Clone)]
pub struct LocalTopology {
    lists: Vec<GrowBuffer<LocalInteraction>>,
    pub exclusions: LocalExclusions,
}

impl LocalTopology {
    pub fn new(interaction_chunk: usize, exclusion_chunk: usize) -> Self {
        Self {
            lists: (0..InteractionKind::COUNT)
                .map(|_| GrowBuffer::new(interaction_chunk))
                .collect(),
            exclusions: LocalExclusions::new(exclusion_chunk),
        }
    }

    #[inline]
    pub fn list(&self, kind: InteractionKind) -> &[LocalInteraction] {
        &self.lists[kind.index()]
    }

    #[inline]
    pub fn push(&mut self, kind: InteractionKind, interaction: LocalInteraction) {
        self.lists[kind.index()].push(interaction);
    }

    #[inline]
    pub fn count(&self, kind: InteractionKind) -> usize {
        self.lists[kind.index()].len()
    }

    /// Interaction counts indexed by [`InteractionKind::index`].
    pub fn counts(&self) -> [usize; InteractionKind::COUNT] {
        let mut counts = [0; InteractionKind::COUNT];
        for (slot, list) in counts.iter_mut().zip(&self.lists) {
            *slot = list.len();
        }
        counts
    }

    /// Drops all interactions but keeps the backing allocations.
    pub fn clear_interactions(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }
}
