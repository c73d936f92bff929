use std::thread;

use anyhow::{Context, Result, anyhow, bail};

use dd_topology::{
    DomainLayout, DomdecConfig, Error as DomdecError, GlobalCounts, GlobalToLocal,
    GlobalTopology, InteractionKind, LocalTopology, ReverseTopology, check_partition,
    link_topology, load_config, make_local_topology, thread_group,
};

use crate::cli::CheckArgs;
use crate::display::{
    Context as DisplayContext, DomainSummary, Progress, print_domain_table, print_report,
    print_topology_summary,
};
use crate::io::{Scenario, read_text};

const TOTAL_STEPS: u8 = 3;

struct Domain {
    local: LocalTopology,
    local_count: usize,
}

pub fn run_check(args: CheckArgs, ctx: DisplayContext) -> Result<()> {
    let scenario = Scenario::parse(&read_text(&args.scenario)?)?;
    let config = resolve_config(&args, &scenario)?;

    let layouts = scenario.layouts();
    if layouts.is_empty() {
        bail!("Scenario defines no [[domains]]");
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Linking topology");
    let topology = scenario
        .build_topology()
        .context("Invalid scenario topology")?;
    let (reverse, counts) = link_topology(&topology, &config).context("Failed to link topology")?;
    progress.complete_step(
        "Linking topology",
        &[
            format!("{} interactions linked to home atoms", reverse.homed_count()),
            format!(
                "Exclusions {}",
                if counts.counts_exclusions {
                    "counted (full electrostatics)"
                } else {
                    "not counted"
                }
            ),
        ],
    );
    if ctx.interactive {
        print_topology_summary(&topology, &counts);
    }

    progress.step("Assigning interactions");
    let domains = match build_domains(&layouts, &topology, &reverse, &counts, &config) {
        Ok(domains) => domains,
        Err(e) => {
            progress.abort();
            return Err(e);
        }
    };
    let summaries: Vec<DomainSummary> = layouts
        .iter()
        .zip(&domains)
        .map(|(layout, domain)| summarize(layout, domain))
        .collect();
    progress.complete_step(
        "Assigning interactions",
        &[format!("{} domains on {} threads", domains.len(), domains.len())],
    );
    if ctx.interactive {
        print_domain_table(&summaries);
    }

    progress.step("Checking consistency");
    if let Err(e) = check_domains(&domains, &counts) {
        progress.abort();
        if ctx.interactive {
            if let Some(DomdecError::PartitionInconsistency(report)) = e.downcast_ref::<DomdecError>() {
                print_report(report);
            }
        }
        return Err(e.context("Consistency check failed"));
    }
    let assigned: usize = domains.iter().map(|d| d.local_count).sum();
    progress.complete_step(
        "Checking consistency",
        &[format!("{} of {} assigned exactly once", assigned, counts.total())],
    );
    progress.finish();

    if !ctx.interactive {
        println!(
            "consistent: {} domains, {} of {} checked interactions",
            domains.len(),
            assigned,
            counts.total()
        );
    }

    Ok(())
}

fn resolve_config(args: &CheckArgs, scenario: &Scenario) -> Result<DomdecConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = read_text(path)?;
            load_config(Some(&text)).context("Failed to load decomposition configuration")?
        }
        None => scenario.config.clone().unwrap_or_default(),
    };
    if let Some(electrostatics) = args.electrostatics {
        config.electrostatics = electrostatics.into();
    }
    Ok(config)
}

/// Builds every domain's local topology on its own thread.
fn build_domains(
    layouts: &[DomainLayout],
    topology: &GlobalTopology,
    reverse: &ReverseTopology,
    counts: &GlobalCounts,
    config: &DomdecConfig,
) -> Result<Vec<Domain>> {
    let n_atoms = topology.atom_count();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = layouts
            .iter()
            .map(|layout| {
                s.spawn(move || -> Result<Domain, DomdecError> {
                    let ga2la = GlobalToLocal::from_layout(layout, n_atoms);
                    let mut local =
                        LocalTopology::new(config.interaction_chunk, config.exclusion_chunk);
                    let local_count =
                        make_local_topology(layout, &ga2la, topology, reverse, counts, &mut local)?;
                    Ok(Domain { local, local_count })
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    results
        .into_iter()
        .enumerate()
        .map(|(rank, joined)| {
            joined
                .map_err(|_| anyhow!("domain {} thread panicked", rank))?
                .with_context(|| format!("Failed to build local topology of domain {}", rank))
        })
        .collect()
}

/// Runs the collective check with one thread per domain.
fn check_domains(domains: &[Domain], counts: &GlobalCounts) -> Result<()> {
    let members = thread_group(domains.len());

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = domains
            .iter()
            .zip(&members)
            .map(|(domain, comm)| {
                s.spawn(move || check_partition(comm, &domain.local, domain.local_count, counts))
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    for (rank, joined) in results.into_iter().enumerate() {
        joined.map_err(|_| anyhow!("domain {} thread panicked", rank))??;
    }
    Ok(())
}

fn summarize(layout: &DomainLayout, domain: &Domain) -> DomainSummary {
    let local = &domain.local;
    let mut summary = DomainSummary {
        rank: layout.rank,
        home_atoms: layout.home_atom_count(),
        atoms: layout.atom_count(),
        exclusions: local.exclusions.pair_count(),
        ..Default::default()
    };

    for kind in InteractionKind::ALL {
        if kind.is_virtual_site() {
            let list = local.list(kind);
            summary.vsites += list.len();
            summary.deferred += list
                .iter()
                .flat_map(|vs| vs.atoms())
                .filter(|a| a.is_deferred())
                .count();
        } else if kind.is_counted() {
            summary.interactions += local.count(kind);
        }
    }

    summary
}
