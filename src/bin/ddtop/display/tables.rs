use std::io::{self, Write};

use dd_topology::{GlobalCounts, GlobalTopology, InteractionKind, PartitionReport};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// What one domain ended up with after assignment.
#[derive(Debug, Clone, Default)]
pub struct DomainSummary {
    pub rank: usize,
    pub home_atoms: usize,
    pub atoms: usize,
    pub interactions: usize,
    pub vsites: usize,
    pub deferred: usize,
    pub exclusions: usize,
}

pub fn print_topology_summary(topology: &GlobalTopology, counts: &GlobalCounts) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Atoms", format!("{}", topology.atom_count())),
        ("Clusters", format!("{}", topology.cluster_count())),
    ];
    for kind in InteractionKind::ALL {
        let n = counts.count(kind);
        if n > 0 {
            rows.push((kind.long_name(), format!("{}", n)));
        }
    }
    rows.push(("Exclusions", format!("{}", counts.exclusions)));
    rows.push((
        "Inter-cluster",
        format!(
            "{} excl, {} vsites",
            counts.intercluster_exclusions, counts.intercluster_vsites
        ),
    ));
    rows.push(("Checked total", format!("{}", counts.total())));

    print_kv_table(&mut out, "Global Topology", &rows);
}

pub fn print_domain_table(summaries: &[DomainSummary]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let _ = writeln!(out, "{}┌─ Domains ─┐", INDENT);
    let _ = writeln!(out, "{}┌──────┬───────┬───────┬────────┬────────┬────────┐", INDENT);
    let _ = writeln!(out, "{}│ Rank │  Home │ Atoms │ Bonded │ VSites │  Excl. │", INDENT);
    let _ = writeln!(out, "{}├──────┼───────┼───────┼────────┼────────┼────────┤", INDENT);

    for s in summaries {
        let vsites = if s.deferred > 0 {
            format!("{}*", s.vsites)
        } else {
            format!("{}", s.vsites)
        };
        let _ = writeln!(
            out,
            "{}│ {:>4} │ {:>5} │ {:>5} │ {:>6} │ {:>6} │ {:>6} │",
            INDENT, s.rank, s.home_atoms, s.atoms, s.interactions, vsites, s.exclusions
        );
    }

    let _ = writeln!(out, "{}└──────┴───────┴───────┴────────┴────────┴────────┘", INDENT);
    if summaries.iter().any(|s| s.deferred > 0) {
        let _ = writeln!(
            out,
            "{}* constructing atoms awaiting communication",
            INDENT
        );
    }
}

pub fn print_report(report: &PartitionReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let name_w = 20usize;
    let global_w = 8usize;
    let sep_overhead = 6;
    let diff_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + global_w + sep_overhead);

    let _ = writeln!(out, "{}┌─ Assignment Mismatch ─┐", INDENT);
    let _ = writeln!(
        out,
        "{}┌{n_line}┬{g_line}┬{d_line}┐",
        INDENT,
        n_line = "─".repeat(name_w + 2),
        g_line = "─".repeat(global_w + 2),
        d_line = "─".repeat(diff_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>global_w$} │ {:>diff_w$} │",
        INDENT,
        "Interaction",
        "Global",
        "Diff",
        name_w = name_w,
        global_w = global_w,
        diff_w = diff_w
    );
    let _ = writeln!(
        out,
        "{}├{n_line}┼{g_line}┼{d_line}┤",
        INDENT,
        n_line = "─".repeat(name_w + 2),
        g_line = "─".repeat(global_w + 2),
        d_line = "─".repeat(diff_w + 2)
    );

    for row in &report.rows {
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>global_w$} │ {:>+diff_w$} │",
            INDENT,
            truncate(row.name, name_w),
            row.global,
            row.diff,
            name_w = name_w,
            global_w = global_w,
            diff_w = diff_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{n_line}┴{g_line}┴{d_line}┘",
        INDENT,
        n_line = "─".repeat(name_w + 2),
        g_line = "─".repeat(global_w + 2),
        d_line = "─".repeat(diff_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT,
        "Metric",
        "Value",
        key_w = key_w,
        val_w = val_w
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
            key_w = key_w,
            val_w = val_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}
