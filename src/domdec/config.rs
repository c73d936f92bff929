//! Configuration for the domain-decomposed topology pipeline.
//!
//! [`DomdecConfig`] controls which quantities enter the cross-domain
//! consistency check and the growth policy of the per-domain buffers. It can
//! be constructed in code or deserialized from TOML with [`load_config`].

use serde::Deserialize;

use super::error::Error;
use crate::model::buffer::DEFAULT_CHUNK;

/// Treatment of long-range electrostatics.
///
/// Only full long-range methods evaluate every excluded pair explicitly, so
/// only they require exclusions to be distributed loss-free and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Electrostatics {
    /// Plain cut-off; exclusions beyond the cut-off may go missing.
    #[default]
    CutOff,
    /// Reaction field with a cut-off.
    ReactionField,
    /// Ewald summation.
    Ewald,
    /// Particle-mesh Ewald.
    Pme,
}

impl Electrostatics {
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Electrostatics::Ewald | Electrostatics::Pme)
    }
}

/// Main configuration for topology distribution.
///
/// # Examples
///
/// ```
/// use dd_topology::{DomdecConfig, Electrostatics};
///
/// let pme = DomdecConfig {
///     electrostatics: Electrostatics::Pme,
///     ..Default::default()
/// };
/// assert!(pme.counts_exclusions());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DomdecConfig {
    /// Electrostatics treatment; decides whether exclusions are checked.
    pub electrostatics: Electrostatics,

    /// Minimum growth step of the per-kind local interaction buffers.
    pub interaction_chunk: usize,

    /// Minimum growth step of the local exclusion partner buffer.
    pub exclusion_chunk: usize,
}

impl Default for DomdecConfig {
    fn default() -> Self {
        Self {
            electrostatics: Electrostatics::CutOff,
            interaction_chunk: DEFAULT_CHUNK,
            exclusion_chunk: DEFAULT_CHUNK,
        }
    }
}

impl DomdecConfig {
    /// Whether local exclusion counts are added to the checked totals.
    #[inline]
    pub fn counts_exclusions(&self) -> bool {
        self.electrostatics.is_full()
    }
}

/// Loads a configuration from TOML, or the defaults when `None`.
pub fn load_config(custom_toml: Option<&str>) -> Result<DomdecConfig, Error> {
    match custom_toml {
        Some(toml) => {
            let config: DomdecConfig = toml::from_str(toml)?;
            Ok(config)
        }
        None => Ok(DomdecConfig::default()),
    }
}
