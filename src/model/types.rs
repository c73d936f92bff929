use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of atoms any interaction kind references.
pub const MAX_INTERACTION_ATOMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported interaction kind: '{0}'")]
pub struct ParseInteractionKindError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid particle type: '{0}'")]
pub struct ParseParticleTypeError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum InteractionKind {
    Bond,
    G96Bond,
    Morse,
    Angle,
    G96Angle,
    UreyBradley,
    ProperDihedral,
    RyckaertBellemans,
    ImproperDihedral,
    Pair14,
    PositionRestraint,
    Settle,
    VirtualSite2,
    VirtualSite3,
    VirtualSite3Fd,
    VirtualSite3Fad,
    VirtualSite3Out,
    VirtualSite4Fd,
    Constraint,
    ConstraintNoConnect,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 20] = [
        InteractionKind::Bond,
        InteractionKind::G96Bond,
        InteractionKind::Morse,
        InteractionKind::Angle,
        InteractionKind::G96Angle,
        InteractionKind::UreyBradley,
        InteractionKind::ProperDihedral,
        InteractionKind::RyckaertBellemans,
        InteractionKind::ImproperDihedral,
        InteractionKind::Pair14,
        InteractionKind::PositionRestraint,
        InteractionKind::Settle,
        InteractionKind::VirtualSite2,
        InteractionKind::VirtualSite3,
        InteractionKind::VirtualSite3Fd,
        InteractionKind::VirtualSite3Fad,
        InteractionKind::VirtualSite3Out,
        InteractionKind::VirtualSite4Fd,
        InteractionKind::Constraint,
        InteractionKind::ConstraintNoConnect,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Number of atoms one interaction of this kind references.
    pub fn atom_count(&self) -> usize {
        match self {
            InteractionKind::PositionRestraint => 1,
            InteractionKind::Bond
            | InteractionKind::G96Bond
            | InteractionKind::Morse
            | InteractionKind::Pair14
            | InteractionKind::Constraint
            | InteractionKind::ConstraintNoConnect => 2,
            InteractionKind::Angle
            | InteractionKind::G96Angle
            | InteractionKind::UreyBradley
            | InteractionKind::Settle
            | InteractionKind::VirtualSite2 => 3,
            InteractionKind::ProperDihedral
            | InteractionKind::RyckaertBellemans
            | InteractionKind::ImproperDihedral
            | InteractionKind::VirtualSite3
            | InteractionKind::VirtualSite3Fd
            | InteractionKind::VirtualSite3Fad
            | InteractionKind::VirtualSite3Out => 4,
            InteractionKind::VirtualSite4Fd => 5,
        }
    }

    pub fn is_bonded(&self) -> bool {
        !matches!(
            self,
            InteractionKind::Settle
                | InteractionKind::Constraint
                | InteractionKind::ConstraintNoConnect
        ) && !self.is_virtual_site()
    }

    pub fn is_virtual_site(&self) -> bool {
        matches!(
            self,
            InteractionKind::VirtualSite2
                | InteractionKind::VirtualSite3
                | InteractionKind::VirtualSite3Fd
                | InteractionKind::VirtualSite3Fad
                | InteractionKind::VirtualSite3Out
                | InteractionKind::VirtualSite4Fd
        )
    }

    #[inline]
    pub fn is_settle(&self) -> bool {
        matches!(self, InteractionKind::Settle)
    }

    /// Whether interactions of this kind are linked into the reverse topology
    /// and distributed by the domain decomposition.
    #[inline]
    pub fn is_homed(&self) -> bool {
        self.is_bonded() || self.is_virtual_site() || self.is_settle()
    }

    /// Whether accepted interactions of this kind enter the checked totals.
    #[inline]
    pub fn is_counted(&self) -> bool {
        self.is_homed() && !self.is_virtual_site()
    }

    /// Position of the representative atom within the interaction's atom list.
    ///
    /// Bonded terms over more than two atoms are coupled to their second atom
    /// (the center of an angle, the central bond of a dihedral); everything
    /// else, including virtual sites and settles, to the first.
    #[inline]
    pub fn home_position(&self) -> usize {
        if self.is_bonded() && self.atom_count() > 2 {
            1
        } else {
            0
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            InteractionKind::Bond => "Bond",
            InteractionKind::G96Bond => "G96Bond",
            InteractionKind::Morse => "Morse",
            InteractionKind::Angle => "Angle",
            InteractionKind::G96Angle => "G96Angle",
            InteractionKind::UreyBradley => "Urey-Bradley",
            InteractionKind::ProperDihedral => "Proper Dih.",
            InteractionKind::RyckaertBellemans => "Ryckaert-Bell.",
            InteractionKind::ImproperDihedral => "Improper Dih.",
            InteractionKind::Pair14 => "LJ-14",
            InteractionKind::PositionRestraint => "Position Rest.",
            InteractionKind::Settle => "Settle",
            InteractionKind::VirtualSite2 => "Virtual site 2",
            InteractionKind::VirtualSite3 => "Virtual site 3",
            InteractionKind::VirtualSite3Fd => "Virtual site 3fd",
            InteractionKind::VirtualSite3Fad => "Virtual site 3fad",
            InteractionKind::VirtualSite3Out => "Virtual site 3out",
            InteractionKind::VirtualSite4Fd => "Virtual site 4fd",
            InteractionKind::Constraint => "Constraint",
            InteractionKind::ConstraintNoConnect => "Constr. No Conn.",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            InteractionKind::Bond => "bond",
            InteractionKind::G96Bond => "g96_bond",
            InteractionKind::Morse => "morse",
            InteractionKind::Angle => "angle",
            InteractionKind::G96Angle => "g96_angle",
            InteractionKind::UreyBradley => "urey_bradley",
            InteractionKind::ProperDihedral => "proper_dihedral",
            InteractionKind::RyckaertBellemans => "ryckaert_bellemans",
            InteractionKind::ImproperDihedral => "improper_dihedral",
            InteractionKind::Pair14 => "pair14",
            InteractionKind::PositionRestraint => "position_restraint",
            InteractionKind::Settle => "settle",
            InteractionKind::VirtualSite2 => "vsite2",
            InteractionKind::VirtualSite3 => "vsite3",
            InteractionKind::VirtualSite3Fd => "vsite3fd",
            InteractionKind::VirtualSite3Fad => "vsite3fad",
            InteractionKind::VirtualSite3Out => "vsite3out",
            InteractionKind::VirtualSite4Fd => "vsite4fd",
            InteractionKind::Constraint => "constraint",
            InteractionKind::ConstraintNoConnect => "constraint_nc",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

impl FromStr for InteractionKind {
    type Err = ParseInteractionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_lowercase().replace('-', "_");
        match key.as_str() {
            "dihedral" => Ok(InteractionKind::ProperDihedral),
            "improper" => Ok(InteractionKind::ImproperDihedral),
            "lj14" | "pair" => Ok(InteractionKind::Pair14),
            "posres" => Ok(InteractionKind::PositionRestraint),
            other => InteractionKind::ALL
                .iter()
                .find(|kind| kind.key() == other)
                .copied()
                .ok_or_else(|| ParseInteractionKindError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleType {
    #[default]
    Atom,
    VirtualSite,
    Shell,
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticleType::Atom => write!(f, "Atom"),
            ParticleType::VirtualSite => write!(f, "VSite"),
            ParticleType::Shell => write!(f, "Shell"),
        }
    }
}

impl FromStr for ParticleType {
    type Err = ParseParticleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atom" | "a" => Ok(ParticleType::Atom),
            "vsite" | "virtual_site" | "v" => Ok(ParticleType::VirtualSite),
            "shell" | "s" => Ok(ParticleType::Shell),
            _ => Err(ParseParticleTypeError(s.to_string())),
        }
    }
}

/// Solvent classification of a cluster, selecting the exclusion fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SolventType {
    #[default]
    Generic = 0,
    /// Rigid 3-point water (SPC, TIP3P).
    Rigid3 = 1,
    /// Rigid 4-point water (TIP4P).
    Rigid4 = 2,
}

impl SolventType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SolventType::Generic),
            1 => Some(SolventType::Rigid3),
            2 => Some(SolventType::Rigid4),
            _ => None,
        }
    }

    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Atoms per cluster for the rigid fast paths.
    pub fn rigid_size(&self) -> Option<usize> {
        match self {
            SolventType::Generic => None,
            SolventType::Rigid3 => Some(3),
            SolventType::Rigid4 => Some(4),
        }
    }
}

/// Local reference to an interaction atom.
///
/// Virtual-site construction atoms that are not present in the home zone are
/// kept as their global index until the vsite communication pass maps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomRef {
    Resolved(usize),
    Deferred(usize),
}

impl AtomRef {
    #[inline]
    pub fn local(&self) -> Option<usize> {
        match self {
            AtomRef::Resolved(la) => Some(*la),
            AtomRef::Deferred(_) => None,
        }
    }

    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, AtomRef::Deferred(_))
    }
}

impl Default for AtomRef {
    fn default() -> Self {
        AtomRef::Resolved(0)
    }
}
