//! Benchmark command
//!
//! Plays many agent games in parallel against one shared session registry.

use crate::agent::{AgentLoop, CandidateGuesser, StopReason, ToolContext, ToolRegistry};
use crate::game::{GameStatus, Statistics};
use crate::session::{SessionRegistry, Unlimited};
use crate::wordlists::WordLists;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub stats: Statistics,
    /// Runs that stopped without finishing their game
    pub unfinished: usize,
    /// Tool cycles across all runs, rejected guesses included
    pub tool_calls: usize,
    pub duration: Duration,
    pub games_per_second: f64,
}

/// Outcome of a single benchmark game
#[derive(Debug, Clone, Copy)]
struct GameResult {
    status: Option<GameStatus>,
    guesses: usize,
    tool_calls: usize,
}

fn play_one(
    tools: &ToolRegistry,
    lexicon: &Arc<WordLists>,
    seed: u64,
    index: usize,
) -> Result<GameResult> {
    let session = format!("bench-{index}");
    let mut model = CandidateGuesser::seeded(Arc::clone(lexicon), seed.wrapping_add(index as u64));
    let ctx = ToolContext::new(&session, "benchmark");
    let run = AgentLoop::new(tools).run(&mut model, &ctx, "Play one game of Wordle.")?;

    let status = match run.stop_reason {
        StopReason::GameOver(status) => Some(status),
        StopReason::IterationLimit | StopReason::ModelFinished => None,
    };
    let guesses = run
        .last_outcome()
        .and_then(|outcome| outcome.game_state)
        .map_or(0, |progress| progress.guess_number);

    Ok(GameResult {
        status,
        guesses,
        tool_calls: run.iterations,
    })
}

/// Play `games` agent games in parallel
///
/// # Errors
///
/// Returns an error if any agent run fails.
#[allow(clippy::cast_precision_loss)]
pub fn run_benchmark(
    lexicon: Arc<WordLists>,
    games: usize,
    seed: u64,
    show_progress: bool,
) -> Result<BenchmarkResult> {
    let sessions = Arc::new(SessionRegistry::in_memory(Arc::clone(&lexicon)).with_seed(seed));
    let tools = ToolRegistry::wordle(sessions, Arc::new(Unlimited));

    let pb = if show_progress {
        ProgressBar::new(games as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░"),
    );

    let start = Instant::now();
    let results: Vec<GameResult> = (0..games)
        .into_par_iter()
        .map(|index| {
            let result = play_one(&tools, &lexicon, seed, index);
            pb.inc(1);
            result
        })
        .collect::<Result<_>>()?;
    pb.finish_with_message("Complete!");

    let duration = start.elapsed();
    let mut stats = Statistics::default();
    let mut unfinished = 0;
    for result in &results {
        match result.status {
            Some(GameStatus::Won) => stats.record_win(result.guesses),
            Some(GameStatus::Lost) => stats.record_loss(),
            Some(GameStatus::Playing) | None => unfinished += 1,
        }
    }

    tracing::info!(games, won = stats.games_won, unfinished, "benchmark finished");

    Ok(BenchmarkResult {
        stats,
        unfinished,
        tool_calls: results.iter().map(|r| r.tool_calls).sum(),
        duration,
        games_per_second: games as f64 / duration.as_secs_f64().max(f64::EPSILON),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlists::test_lexicon;

    fn lexicon() -> Arc<WordLists> {
        Arc::new(test_lexicon(
            &["crane", "slate", "irate", "plate", "grate", "trace", "brave", "flame"],
            &["salet"],
        ))
    }

    #[test]
    fn benchmark_finishes_every_game() {
        let result = run_benchmark(lexicon(), 12, 5, false).unwrap();

        assert_eq!(result.stats.total_games, 12);
        assert_eq!(result.unfinished, 0);
        assert!(result.tool_calls >= 12);
    }

    #[test]
    fn benchmark_distribution_sums_to_wins() {
        let result = run_benchmark(lexicon(), 10, 9, false).unwrap();

        let distribution_sum: usize = result.stats.guess_distribution.iter().sum();
        assert_eq!(distribution_sum, result.stats.games_won);
        assert_eq!(result.stats.guess_distribution[0], 0);
    }

    #[test]
    fn benchmark_with_no_games() {
        let result = run_benchmark(lexicon(), 0, 1, false).unwrap();
        assert_eq!(result.stats.total_games, 0);
        assert_eq!(result.tool_calls, 0);
    }
}
