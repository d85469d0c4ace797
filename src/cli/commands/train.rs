//! Train command - the agent plays the heuristic teacher for N episodes

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    app::{App, PreparedAgent, RunConfig},
    cli::output,
    pipeline::{
        MetricsObserver, MetricsSummary, ProgressObserver, RepositoryCheckpointer,
        TrainingPipeline, TrainingResult,
    },
    q_learning::Hyperparameters,
    teacher::Teacher,
};

/// Presentation options for a training run
#[derive(Debug, Clone, Default)]
pub struct TrainOptions {
    /// Show a progress bar
    pub progress: bool,
    /// Optional path for writing a summary JSON file
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    metrics: &'a MetricsSummary,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    agent: String,
    agent_path: PathBuf,
    ability_level: f64,
    hyperparameters: Hyperparameters,
    total_teacher_episodes: usize,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Train `prepared` against the teacher for `episodes` episodes.
///
/// The agent is written to the configured path every checkpoint interval
/// and once at the end.
pub fn execute(
    app: &App,
    config: &RunConfig,
    prepared: PreparedAgent,
    episodes: usize,
    options: &TrainOptions,
) -> Result<()> {
    let PreparedAgent {
        mut agent,
        metadata,
    } = prepared;
    let path = config.resolved_path();
    let repository = app.repository();
    let mut rng = app.rng(config.seed);
    let mut teacher = Teacher::new(config.ability_level);
    let metrics = MetricsObserver::new();

    info!(
        agent = agent.name(),
        path = %path.display(),
        ability_level = config.ability_level,
        "training against teacher"
    );

    let checkpointer = RepositoryCheckpointer::new(&*repository, path.clone(), metadata.clone())
        .with_ability_level(config.ability_level);
    let mut pipeline = TrainingPipeline::new(config.training_config(episodes))
        .with_observer(Box::new(metrics.clone()))
        .with_checkpointer(Box::new(checkpointer));
    if options.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let result = pipeline
        .run(agent.as_mut(), &mut teacher, &mut rng)
        .with_context(|| format!("training failed; last checkpoint is at {}", path.display()))?;
    let metrics = metrics.summary();

    output::print_training_result(&result, &metrics);
    output::print_kv("Saved to", &path.display().to_string());

    if let Some(raw) = &options.summary {
        let summary_path = sanitize_summary_path(raw);
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            training: &result,
            metrics: &metrics,
            metadata: SummaryMetadata {
                agent: agent.name().to_string(),
                agent_path: path,
                ability_level: config.ability_level,
                hyperparameters: agent.hyperparameters(),
                total_teacher_episodes: metadata.teacher_episodes + episodes,
                seed: config.seed,
            },
        };
        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary).context("failed to write training summary")?;
        output::print_kv("Summary", &summary_path.display().to_string());
    }

    Ok(())
}
