//! Box-drawing rendering of snapshot and diff trees for the run log.

use flist::Tree;
use logging::Reporter;
use runner::SyncReport;

/// Renders `tree` under `title`, one string per line.
///
/// A directory's self-entry is shown as a `.` child ahead of its other
/// children. With `show_times` each file and self-entry is followed by its
/// `(access, modify)` seconds.
#[must_use]
pub fn tree_lines(title: &str, tree: &Tree, show_times: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut finals = Vec::new();
    push_lines(title, tree, show_times, &mut finals, &mut lines);
    lines
}

fn prefix(finals: &[bool]) -> String {
    let Some((last, ancestors)) = finals.split_last() else {
        return String::new();
    };
    let mut prefix: String = ancestors
        .iter()
        .map(|&done| if done { ' ' } else { '│' })
        .collect();
    prefix.push(if *last { '└' } else { '├' });
    prefix
}

fn push_lines(
    name: &str,
    tree: &Tree,
    show_times: bool,
    finals: &mut Vec<bool>,
    lines: &mut Vec<String>,
) {
    let prefix = prefix(finals);
    match tree {
        Tree::Absent => {}
        Tree::Leaf(times) if show_times => {
            lines.push(format!("{prefix}{name}: ({}, {})", times.accessed, times.modified));
        }
        Tree::Leaf(_) => lines.push(format!("{prefix}{name}")),
        Tree::Branch(branch) => {
            lines.push(format!("{prefix}{name}"));
            let own = branch.own().map(|times| (".", Tree::Leaf(times)));
            let entries: Vec<(&str, &Tree)> = own
                .iter()
                .map(|(name, tree)| (*name, tree))
                .chain(
                    branch
                        .children()
                        .iter()
                        .map(|(name, child)| (name.as_str(), child)),
                )
                .collect();
            let count = entries.len();
            for (index, (child_name, child)) in entries.into_iter().enumerate() {
                finals.push(index + 1 == count);
                push_lines(child_name, child, show_times, finals, lines);
                finals.pop();
            }
        }
    }
}

fn log_section(reporter: &dyn Reporter, heading: &str, title: &str, tree: &Tree, show_times: bool) {
    reporter.info(format_args!("{heading}"));
    for line in tree_lines(title, tree, show_times) {
        reporter.info(format_args!("{line}"));
    }
    reporter.info(format_args!(""));
}

/// Logs both snapshots and every diff tree of `report` at info level.
pub fn log_report(report: &SyncReport, reporter: &dyn Reporter) {
    let plan = &report.plan;
    let source = plan.source_root.as_str();
    let destination = plan.destination_root.as_str();

    log_section(reporter, "Source tree:", source, &report.source, true);
    log_section(reporter, "Destination tree:", destination, &report.destination, true);
    log_section(reporter, "Delete tree:", destination, &plan.delete, false);
    log_section(
        reporter,
        "Copy tree:",
        &format!("{source} --> {destination}"),
        &plan.copy,
        false,
    );
    log_section(reporter, "Source excluded tree:", source, &plan.excluded_source, false);
    log_section(
        reporter,
        "Destination unaccounted tree:",
        destination,
        &plan.unaccounted_destination,
        false,
    );
    log_section(
        reporter,
        "Destination excluded tree:",
        destination,
        &plan.excluded_destination,
        false,
    );
    log_section(
        reporter,
        "Non-excluded-supporting destination unaccounted tree:",
        destination,
        &plan.protected_unaccounted,
        false,
    );
}
