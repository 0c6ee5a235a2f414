//! Output formatting and progress bars for CLI

use std::fmt::Display;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Error, Result};

fn style(template: &str) -> Result<ProgressStyle> {
    ProgressStyle::default_bar()
        .template(template)
        .map_err(|e| Error::ProgressBarTemplate {
            message: e.to_string(),
        })
}

/// Create a progress bar for a run with a tick budget
pub fn create_tick_progress(total_ticks: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_ticks);
    pb.set_style(
        style("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks ({msg})")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Create a spinner for an open-ended run
pub fn create_tick_spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(style("{spinner:.green} {pos} ticks ({msg})")?);
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value row aligned under a section header
pub fn print_kv(key: impl Display, value: impl Display) {
    println!("  {:20} {value}", format!("{key}:"));
}
