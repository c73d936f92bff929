use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "ddtop",
    about = "Domain-decomposed topology assignment and consistency checking",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Distribute a scenario's topology over its domains and verify the partition
    #[command(visible_alias = "c")]
    Check(CheckArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Scenario file (TOML: topology plus one layout per domain)
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Decomposition configuration (TOML), overrides the scenario's [config]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Electrostatics treatment, overrides any configuration file
    #[arg(long, value_name = "METHOD")]
    pub electrostatics: Option<Electrostatics>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Electrostatics {
    /// Plain cut-off
    CutOff,
    /// Reaction field
    ReactionField,
    /// Ewald summation
    Ewald,
    /// Particle-mesh Ewald
    Pme,
}

impl From<Electrostatics> for dd_topology::Electrostatics {
    fn from(value: Electrostatics) -> Self {
        match value {
            Electrostatics::CutOff => Self::CutOff,
            Electrostatics::ReactionField => Self::ReactionField,
            Electrostatics::Ewald => Self::Ewald,
            Electrostatics::Pme => Self::Pme,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
