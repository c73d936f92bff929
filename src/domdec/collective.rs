//! Collective operations across domains.
//!
//! The consistency check needs exactly one collective: an element-wise sum of
//! an integer vector over all domains, with the result available everywhere.
//! [`SingleDomain`] covers the undecomposed case; [`thread_group`] connects
//! domains that run as threads of one process.

use std::sync::{Arc, Barrier};

use parking_lot::Mutex;

/// Communication among the domains of one decomposition.
pub trait Collective {
    /// Rank of the calling domain, `0..size()`.
    fn rank(&self) -> usize;

    /// Number of domains.
    fn size(&self) -> usize;

    /// The master domain reports diagnostics on behalf of all.
    fn is_master(&self) -> bool {
        self.rank() == 0
    }

    /// Replaces `values` with its element-wise sum over all domains.
    ///
    /// Every domain must call this with a slice of the same length.
    fn sum(&self, values: &mut [i64]);
}

/// A decomposition with a single domain; the sum is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleDomain;

impl Collective for SingleDomain {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sum(&self, _values: &mut [i64]) {}
}

#[derive(Debug)]
struct Shared {
    size: usize,
    accumulator: Mutex<Vec<i64>>,
    barrier: Barrier,
}

/// One domain's handle into a group of threads.
#[derive(Debug, Clone)]
pub struct GroupMember {
    rank: usize,
    shared: Arc<Shared>,
}

/// Creates `size` connected handles, one per domain thread.
///
/// Collectives block until every member has entered them, so each member must
/// run on its own thread.
pub fn thread_group(size: usize) -> Vec<GroupMember> {
    let size = size.max(1);
    let shared = Arc::new(Shared {
        size,
        accumulator: Mutex::new(Vec::new()),
        barrier: Barrier::new(size),
    });
    (0..size)
        .map(|rank| GroupMember {
            rank,
            shared: Arc::clone(&shared),
        })
        .collect()
}

impl Collective for GroupMember {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn sum(&self, values: &mut [i64]) {
        {
            let mut acc = self.shared.accumulator.lock();
            if acc.len() < values.len() {
                acc.resize(values.len(), 0);
            }
            for (a, v) in acc.iter_mut().zip(values.iter()) {
                *a += *v;
            }
        }
        self.shared.barrier.wait();

        values.copy_from_slice(&self.shared.accumulator.lock()[..values.len()]);

        // Nobody may start the next sum before everyone has read this one.
        if self.shared.barrier.wait().is_leader() {
            self.shared.accumulator.lock().clear();
        }
        self.shared.barrier.wait();
    }
}
