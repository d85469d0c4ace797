//! Output formatting for the CLI

use crate::{
    pipeline::{EpisodeSummary, MetricsSummary, TrainingResult},
    tictactoe::{GameOutcome, Mark},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
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

/// Format a rate in [0, 1] as a percentage
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// One-line announcement of a finished interactive game.
pub fn game_result_message(summary: &EpisodeSummary) -> &'static str {
    match summary.outcome {
        GameOutcome::Win(Mark::Player) => "You win!",
        GameOutcome::Win(Mark::Agent) => "The RL agent wins!",
        GameOutcome::Draw => "It's a draw!",
    }
}

/// Print the outcome of a training run.
pub fn print_training_result(result: &TrainingResult, metrics: &MetricsSummary) {
    print_section("Training complete");
    print_kv("Episodes", &format_number(result.total_episodes));
    print_kv(
        "Agent wins",
        &format!("{} ({})", format_number(result.wins), format_percent(result.win_rate)),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", format_number(result.draws), format_percent(result.draw_rate)),
    );
    print_kv(
        "Teacher wins",
        &format!("{} ({})", format_number(result.losses), format_percent(result.loss_rate)),
    );
    print_kv(
        "Win rate (1st/2nd)",
        &format!(
            "{} / {}",
            format_percent(metrics.win_rate_moving_first),
            format_percent(metrics.win_rate_moving_second)
        ),
    );
    print_kv("Avg. game length", &format!("{:.1} plies", metrics.avg_episode_length));
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    print_kv("Checkpoints", &result.checkpoints.to_string());
}
