//! Export command - Write a Q-table as CSV

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use super::inspect::load_existing;
use crate::{
    q_learning::QTable,
    types::{Action, Alignment, DiscreteState, Sign, Third},
};

#[derive(Parser, Debug)]
#[command(about = "Export a Q-table as CSV")]
pub struct ExportArgs {
    /// Q-table file to export
    pub table: PathBuf,

    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

/// One stored entry with its state decoded
#[derive(Debug, Serialize)]
struct EntryRecord {
    state: u16,
    ball_x: Third,
    ball_y: Third,
    paddle_y: Third,
    ball_vel_x: Sign,
    ball_vel_y: Sign,
    relative: Alignment,
    action: Action,
    q_value: f64,
}

impl EntryRecord {
    fn new(state: DiscreteState, action: Action, q_value: f64) -> Self {
        let features = state.features();
        Self {
            state: state.value(),
            ball_x: features.ball_x,
            ball_y: features.ball_y,
            paddle_y: features.paddle_y,
            ball_vel_x: features.ball_vel_x,
            ball_vel_y: features.ball_vel_y,
            relative: features.relative,
            action,
            q_value,
        }
    }
}

/// Write every stored entry of `table` to `path`, returning the row count
pub fn export_table(table: &QTable, path: &Path) -> crate::Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut rows = 0;
    for (state, action, value) in table.entries() {
        writer.serialize(EntryRecord::new(state, action, value))?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let table = load_existing(&args.table)?;
    let rows = export_table(&table, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Exported {rows} entries to {}", args.output.display());
    Ok(())
}
