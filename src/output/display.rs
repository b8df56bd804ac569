//! Display functions for command results

use super::formatters::{colored_guess, create_progress_bar};
use crate::agent::{AgentRun, Role, StopReason};
use crate::commands::BenchmarkResult;
use crate::game::{GameStatus, GuessOutcome, MAX_GUESSES, Statistics};
use colored::Colorize;

/// Print an agent transcript: reasoning, guesses with tiles, final reply
pub fn print_transcript(run: &AgentRun) {
    println!("\n{}", "─".repeat(60).cyan());
    println!("{}", "AGENT GAME".bright_cyan().bold());
    println!("{}", "─".repeat(60).cyan());

    for message in &run.messages {
        match message.role {
            Role::System => {}
            Role::User => println!("\n{} {}", "user:".bright_black(), message.content),
            Role::Assistant => {
                if !message.content.is_empty() {
                    println!("\n{} {}", "agent:".bright_yellow().bold(), message.content);
                }
            }
            Role::Tool => print_tool_result(&message.content),
        }
    }

    println!();
    let calls = run.iterations;
    let summary = match run.stop_reason {
        StopReason::GameOver(GameStatus::Won) => format!("✅ Won after {calls} tool calls").green(),
        StopReason::GameOver(_) => "❌ Lost".red(),
        StopReason::IterationLimit => format!("⏹ Stopped after {calls} tool calls").yellow(),
        StopReason::ModelFinished => "⏹ The agent stopped before the game ended".yellow(),
    };
    println!("{}", summary.bold());
}

fn print_tool_result(content: &str) {
    let Ok(outcome) = serde_json::from_str::<GuessOutcome>(content) else {
        println!("  {}", content.bright_black());
        return;
    };

    if let Some(message) = &outcome.message {
        println!("  {}", format!("✗ {message}").red());
        return;
    }

    let Some(progress) = &outcome.game_state else {
        return;
    };
    if let (Some(guess), Some(feedback)) = (progress.guesses.last(), progress.feedback.last()) {
        println!(
            "  {}  {}/{MAX_GUESSES}",
            colored_guess(guess, feedback),
            progress.guess_number
        );
    }
    if let Some(answer) = &progress.answer {
        println!("  The word was {}", answer.text().to_uppercase().bright_white().bold());
    }
}

/// Print win rate and guess distribution
pub fn print_statistics(stats: &Statistics) {
    println!("\n📊 {}", "Results:".bright_cyan().bold());
    println!("   Games played:     {}", stats.total_games);
    println!(
        "   Win rate:         {}",
        format!("{:.1}%", stats.win_rate()).bright_yellow().bold()
    );
    println!(
        "   Average guesses:  {}",
        format!("{:.2}", stats.average_guesses()).bright_yellow().bold()
    );
    println!("   Best streak:      {}", stats.max_streak);

    println!("\n📈 {}", "Distribution:".bright_cyan().bold());
    let max = stats.guess_distribution.iter().copied().max().unwrap_or(0);
    for (guesses, &count) in stats.guess_distribution.iter().enumerate().skip(1) {
        let bar = create_progress_bar(count as f64, max as f64, 40);
        println!("   {guesses}: {} {count:4}", bar.green());
    }
}

/// Print the result of a benchmark
pub fn print_benchmark_result(result: &BenchmarkResult) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", "BENCHMARK RESULTS".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    print_statistics(&result.stats);

    println!("\n⏱  {}", "Throughput:".bright_cyan().bold());
    println!("   Unfinished runs:  {}", result.unfinished);
    println!("   Tool calls:       {}", result.tool_calls);
    println!("   Time taken:       {:.2}s", result.duration.as_secs_f64());
    println!("   Games/second:     {:.1}", result.games_per_second);
}
