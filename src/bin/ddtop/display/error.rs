use std::io::{self, Write};

use anyhow::Error;
use dd_topology::{Direction, Error as DomdecError, UnsupportedTopology};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔════════════════════════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                                       ║");
    let _ = writeln!(stderr, "   ╟────────────────────────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 77) {
        let _ = writeln!(stderr, "   ║  {:<77} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟────────────────────────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                                    ║");
        for line in wrap(&cause.to_string(), 75) {
            let _ = writeln!(stderr, "   ║    {:<75} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟────────────────────────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                                        ║");
        for hint in hints {
            let wrapped = wrap(&hint, 73);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<73} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<73} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚════════════════════════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_io_hints(err);
        collector.collect_scenario_hints(err);
        collector.collect_domdec_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use std::io::ErrorKind;

        let Some(io_err) = err.downcast_ref::<std::io::Error>() else {
            return;
        };

        self.mark_typed();

        match io_err.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File is not valid UTF-8 text");
                self.add("Scenario and configuration files must be TOML");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check the file path and permissions");
            }
        }
    }

    fn collect_scenario_hints(&mut self, err: &Error) {
        if err.downcast_ref::<toml::de::Error>().is_none() {
            return;
        }

        self.mark_typed();
        self.add("Scenario file has invalid TOML or unknown keys");
        self.add("Top-level tables: [config], [topology], [[topology.interactions]], [[domains]]");
        self.add("Domain keys: global_atoms, cluster_index, zone_clusters, zone_shifts, i_zones, solvent");
    }

    fn collect_domdec_hints(&mut self, err: &Error) {
        let Some(dd_err) = err.downcast_ref::<DomdecError>() else {
            return;
        };

        self.mark_typed();

        match dd_err {
            DomdecError::PartitionInconsistency(report) => match report.direction {
                Direction::OverCount => {
                    self.add("Some interactions were assigned to more than one domain");
                    self.add("Use 1 or 3 or more domains along any periodic direction that has 2");
                    self.add("Or make the domains larger relative to the cut-off");
                }
                Direction::UnderCount => {
                    self.add("Some interactions were assigned to no domain");
                    self.add("Widen the halo so every interaction is complete on at least one domain");
                    self.add("Check that every atom is home on exactly one domain");
                }
            },

            DomdecError::UnsupportedTopology(UnsupportedTopology::RecursiveVirtualSite {
                site,
                ..
            }) => {
                self.add(format!(
                    "Virtual site {} is built from another virtual site in a different cluster",
                    site
                ));
                self.add("Put the site and all of its constructing atoms into one cluster");
            }

            DomdecError::UnsupportedTopology(UnsupportedTopology::UnknownSolventType {
                code,
                ..
            }) => {
                self.add(format!("Solvent code {} is not recognized", code));
                self.add("Valid codes: 0 (generic), 1 (rigid 3-site), 2 (rigid 4-site)");
            }

            DomdecError::InvalidTopology(msg) => {
                self.add("The global topology is malformed");
                if msg.contains("cluster") {
                    self.add("'clusters' must start at 0 and end at the atom count");
                } else if msg.contains("exclusion") {
                    self.add("Give one exclusion list per atom with indices below the atom count");
                } else {
                    self.add("Check atom indices in [[topology.interactions]]");
                }
            }

            DomdecError::InvalidLayout { domain, .. } => {
                self.add(format!("Check entry {} of [[domains]] (counting from 0)", domain));
                self.add("Home clusters come first; cluster_index and zone_clusters end at the totals");
            }

            DomdecError::ConfigParse(_) => {
                self.add("Decomposition configuration has invalid TOML syntax");
                self.add("Known keys: electrostatics, interaction_chunk, exclusion_chunk");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("interaction kind") {
            self.add("Kinds use snake_case names such as bond, angle, proper_dihedral, vsite3");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("domain") && msg.contains("panicked") {
            self.add("A domain thread terminated unexpectedly");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
