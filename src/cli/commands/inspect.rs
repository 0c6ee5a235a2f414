//! Inspect command - Summarize a stored Q-table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    adapters::JsonFileRepository,
    cli::output::{format_number, print_kv, print_section, print_subsection},
    ports::QTableRepository,
    q_learning::QTable,
    types::{Action, DiscreteState, NUM_ACTIONS, NUM_STATES},
};

#[derive(Parser, Debug)]
#[command(about = "Summarize a stored Q-table")]
pub struct InspectArgs {
    /// Q-table file to inspect
    pub table: PathBuf,
}

/// Aggregate view of one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    pub entries: usize,
    pub visited_states: usize,
    /// Visited states whose greedy action is each of [`Action::ALL`]
    pub greedy_counts: [usize; NUM_ACTIONS],
    /// Smallest and largest stored value
    pub value_range: Option<(f64, f64)>,
}

impl TableStats {
    pub fn from_table(table: &QTable) -> Self {
        let mut greedy_counts = [0; NUM_ACTIONS];
        for state in DiscreteState::all() {
            if let Some(action) = table.greedy_action(state) {
                greedy_counts[action.index()] += 1;
            }
        }

        let value_range = table.entries().fold(None, |range, (_, _, value)| match range {
            None => Some((value, value)),
            Some((lo, hi)) => Some((f64::min(lo, value), f64::max(hi, value))),
        });

        Self {
            entries: table.len(),
            visited_states: table.visited_states(),
            greedy_counts,
            value_range,
        }
    }
}

pub(crate) fn load_existing(path: &Path) -> Result<QTable> {
    JsonFileRepository::new()
        .load(path)
        .with_context(|| format!("failed to load {}", path.display()))?
        .ok_or_else(|| anyhow!("Q-table file {} does not exist", path.display()))
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let table = load_existing(&args.table)?;
    let stats = TableStats::from_table(&table);

    print_section(&format!("Q-table {}", args.table.display()));
    print_kv("Entries", &format_number(stats.entries as u64));
    print_kv("Visited states", &format!("{} / {}", stats.visited_states, NUM_STATES));
    match stats.value_range {
        Some((lo, hi)) => print_kv("Value range", &format!("{lo:.4} .. {hi:.4}")),
        None => print_kv("Value range", "-"),
    }

    print_subsection("Greedy action per visited state");
    for action in Action::ALL {
        print_kv(
            &action.to_string(),
            &format_number(stats.greedy_counts[action.index()] as u64),
        );
    }

    Ok(())
}
