//! Train command - Run self-play training for both paddles

use std::{
    fs::File,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::JsonFileRepository,
    cli::output::{format_number, print_kv, print_section, print_subsection},
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver,
        StopHandle, TrainingConfig, TrainingPipeline, TrainingResult, TrainingSession,
    },
    types::PaddleId,
};

#[derive(Parser, Debug)]
#[command(about = "Train both paddles against each other")]
pub struct TrainArgs {
    /// Number of ticks to run; without it training runs until Ctrl-C
    #[arg(long, short = 't')]
    pub ticks: Option<u64>,

    /// Q-table file for the left paddle
    #[arg(long, default_value = "agent1_q_table.json")]
    pub agent1_table: PathBuf,

    /// Q-table file for the right paddle
    #[arg(long, default_value = "agent2_q_table.json")]
    pub agent2_table: PathBuf,

    /// JSON training configuration; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate (α)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor (γ)
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Initial exploration rate (ε)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Optional file for JSONL point observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    metrics: &'a MetricsSummary,
    config: &'a TrainingConfig,
}

fn build_config(args: &TrainArgs) -> Result<TrainingConfig> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => TrainingConfig::default(),
    };

    if let Some(ticks) = args.ticks {
        config.max_ticks = Some(ticks);
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(alpha) = args.alpha {
        config.learning.learning_rate = alpha;
    }
    if let Some(gamma) = args.gamma {
        config.learning.discount_factor = gamma;
    }
    if let Some(epsilon) = args.epsilon {
        config.exploration.initial_epsilon = epsilon;
    }

    config.validate().context("invalid training configuration")?;
    Ok(config)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let stop = StopHandle::new();
    let handle = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || handle.request_stop()) {
        log::warn!("could not install Ctrl-C handler: {e}");
    }
    train(&args, &stop)?;
    Ok(())
}

/// Load both tables, run until the tick budget or `stop`, then save
fn train(args: &TrainArgs, stop: &StopHandle) -> Result<TrainingResult> {
    let config = build_config(args)?;
    let repository = JsonFileRepository::new();
    let table_paths = [&args.agent1_table, &args.agent2_table];

    let mut session = TrainingSession::new(&config)?;
    for paddle in PaddleId::BOTH {
        let path = table_paths[paddle.slot()];
        session
            .agent_mut(paddle)
            .load_table(&repository, path)
            .with_context(|| format!("failed to load Q-table for {paddle}"))?;
    }

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline = TrainingPipeline::new(config.max_ticks)
        .with_observer(Box::new(SharedObserver::new(Arc::clone(&metrics))));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(ref observations_path) = args.observations {
        let observer = JsonlObserver::new(observations_path).with_context(|| {
            format!("failed to create observations file {}", observations_path.display())
        })?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    if config.max_ticks.is_none() {
        log::info!("training until interrupted; press Ctrl-C to stop and save");
    }
    let result = pipeline.run(&mut session, stop)?;
    if result.stopped {
        log::info!("stopped after {} ticks", result.ticks);
    }

    for paddle in PaddleId::BOTH {
        let path = table_paths[paddle.slot()];
        if let Err(e) = session.agent(paddle).save_table(&repository, path) {
            log::warn!("could not save Q-table for {paddle}: {e}");
        }
    }

    let metrics = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();
    print_summary(&result, &metrics);

    if let Some(ref summary_path) = args.summary {
        let file = File::create(summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(
            file,
            &TrainingSummaryFile {
                training: &result,
                metrics: &metrics,
                config: &config,
            },
        )?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(result)
}

fn print_summary(result: &TrainingResult, metrics: &MetricsSummary) {
    print_section("Training Results");
    print_kv("Ticks", &format_number(result.ticks));
    print_kv("Points", &format_number(result.points));
    print_kv("Score", &format!("{} - {}", result.scores[0], result.scores[1]));
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Avg rally", &format!("{:.1} ticks", metrics.avg_rally_length));

    for paddle in PaddleId::BOTH {
        let slot = paddle.slot();
        print_subsection(&format!("Agent {}", paddle.number()));
        print_kv("Contacts", &format_number(result.contacts[slot]));
        print_kv("Win rate", &format!("{:.1}%", metrics.win_rate[slot] * 100.0));
        print_kv("Total reward", &format!("{:.2}", metrics.cumulative_reward[slot]));
        print_kv("Epsilon", &format!("{:.3}", result.epsilons[slot]));
        print_kv("Table entries", &format_number(result.table_entries[slot] as u64));
    }
}
