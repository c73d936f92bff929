//! Cross-domain consistency check of the assignment.
//!
//! Each domain contributes its per-kind counts and its checked total to one
//! collective sum. When the reduced total differs from the global total, the
//! breakdown tells which kinds were lost or duplicated.

use std::fmt;

use tracing::error;

use super::collective::Collective;
use super::error::Error;
use super::reverse::GlobalCounts;
use crate::model::local::LocalTopology;
use crate::model::types::InteractionKind;

/// Whether interactions were duplicated or lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Some interactions were evaluated on more than one domain.
    OverCount,
    /// Some interactions were evaluated nowhere.
    UnderCount,
}

impl Direction {
    fn label(&self) -> &'static str {
        match self {
            Direction::OverCount => "evaluated more than once",
            Direction::UnderCount => "missing",
        }
    }

    fn sign(&self) -> i64 {
        match self {
            Direction::OverCount => 1,
            Direction::UnderCount => -1,
        }
    }
}

/// One line of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Long interaction name, or `"exclusions"` for the remainder.
    pub name: &'static str,
    /// Global count of that kind.
    pub global: usize,
    /// Reduced local count minus the global count.
    pub diff: i64,
}

/// Breakdown of a failed consistency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionReport {
    pub direction: Direction,
    /// Reduced local total minus the global total; never zero.
    pub total_diff: i64,
    pub global_total: usize,
    /// Kinds whose counts differ, then the exclusion remainder if it differs.
    pub rows: Vec<ReportRow>,
}

impl PartitionReport {
    /// Compares a reduced count vector (as produced by [`reduction_vector`]
    /// and summed over all domains) against the global counts.
    ///
    /// Returns `None` when the totals agree.
    pub fn build(reduced: &[i64], counts: &GlobalCounts) -> Option<Self> {
        let global_total = counts.total();
        let total_diff = reduced[InteractionKind::COUNT] - global_total as i64;
        if total_diff == 0 {
            return None;
        }
        let direction = if total_diff > 0 {
            Direction::OverCount
        } else {
            Direction::UnderCount
        };

        let mut rows = Vec::new();
        let mut rest_diff = total_diff;
        for kind in InteractionKind::ALL.iter().filter(|k| k.is_counted()) {
            let global = counts.count(*kind);
            let diff = reduced[kind.index()] - global as i64;
            rest_diff -= diff;
            if diff != 0 {
                rows.push(ReportRow {
                    name: kind.long_name(),
                    global,
                    diff,
                });
            }
        }
        if rest_diff != 0 {
            rows.push(ReportRow {
                name: "exclusions",
                global: global_total - counts.interactions(),
                diff: rest_diff,
            });
        }

        Some(Self {
            direction,
            total_diff,
            global_total,
            rows,
        })
    }

    /// The likely cause, phrased for the user.
    pub fn explanation(&self) -> String {
        let n = self.total_diff.abs();
        match self.direction {
            Direction::OverCount => format!(
                "{} of the {} bonded interactions were evaluated multiple times. This can occur when \
                 the number of domain decomposition cells in a direction is 2 and a cell is not much \
                 larger than the cut-off length. The solution is to use 1 or 3 or more cells in such \
                 a direction.",
                n, self.global_total
            ),
            Direction::UnderCount => format!(
                "{} of the {} bonded interactions could not be calculated because some atoms involved \
                 moved further apart than the cut-off distance",
                n, self.global_total
            ),
        }
    }
}

impl fmt::Display for PartitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Not all bonded interactions have been properly assigned to the domain decomposition cells"
        )?;
        writeln!(f, "A list of {} interactions:", self.direction.label())?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>20} of {:>6} {} {:>6}",
                row.name,
                row.global,
                self.direction.label(),
                self.direction.sign() * row.diff
            )?;
        }
        write!(f, "{}", self.explanation())
    }
}

/// Per-kind local counts followed by the checked local total.
pub fn reduction_vector(local: &LocalTopology, local_count: usize) -> Vec<i64> {
    let mut values: Vec<i64> = local.counts().iter().map(|&n| n as i64).collect();
    values.push(local_count as i64);
    values
}

/// Verifies that the domains together assigned every interaction exactly
/// once. Must be called by every domain of `comm`.
///
/// `local_count` is the checked local total: counted interactions, plus
/// stored exclusion pairs when exclusions are counted.
///
/// # Errors
///
/// Returns [`Error::PartitionInconsistency`] on every domain when the reduced
/// total differs from [`GlobalCounts::total`]; the master domain also logs the
/// breakdown.
pub fn check_partition<C: Collective>(
    comm: &C,
    local: &LocalTopology,
    local_count: usize,
    counts: &GlobalCounts,
) -> Result<(), Error> {
    let mut reduced = reduction_vector(local, local_count);
    comm.sum(&mut reduced);

    match PartitionReport::build(&reduced, counts) {
        None => Ok(()),
        Some(report) => {
            if comm.is_master() {
                error!(
                    domains = comm.size(),
                    expected = report.global_total,
                    diff = report.total_diff,
                    "{}",
                    report
                );
            }
            Err(report.into())
        }
    }
}
