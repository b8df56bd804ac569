//! Simple line-mode play
//!
//! Type whole words at a prompt; the board is printed with colored tiles
//! after every guess.

use crate::game::{GameState, GameStatus, MAX_GUESSES, Statistics};
use crate::interactive::celebration;
use crate::output::formatters::{colored_guess, colored_keyboard, emoji_row};
use crate::wordlists::WordLists;
use anyhow::Result;
use colored::Colorize;
use rand::Rng;
use std::io::{BufRead, Write};

/// Play on stdin/stdout until the player quits or input ends
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run_simple<R: Rng + ?Sized>(lexicon: &WordLists, rng: &mut R) -> Result<Statistics> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play_lines(lexicon, rng, &mut stdin.lock(), &mut stdout.lock())
}

fn print_board<W: Write>(out: &mut W, game: &GameState) -> Result<()> {
    writeln!(out)?;
    for (guess, feedback) in game.guesses().iter().zip(game.feedback()) {
        writeln!(out, "  {}", colored_guess(guess, feedback))?;
    }
    writeln!(out)?;
    for row in colored_keyboard(&game.keyboard_status()) {
        writeln!(out, "  {row}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_summary<W: Write>(out: &mut W, game: &GameState, stats: &Statistics) -> Result<()> {
    let used = game.guesses().len();
    match game.status() {
        GameStatus::Won => writeln!(
            out,
            "{}",
            format!("🎉 {}! Solved in {used}/{MAX_GUESSES}", celebration(used))
                .green()
                .bold()
        )?,
        _ => writeln!(
            out,
            "{}",
            format!("❌ The word was {}", game.answer().text().to_uppercase())
                .red()
                .bold()
        )?,
    }

    for (guess, feedback) in game.guesses().iter().zip(game.feedback()) {
        writeln!(out, "    {}", emoji_row(guess, feedback))?;
    }
    writeln!(
        out,
        "\nPlayed: {} | Win rate: {:.0}% | Streak: {}\n",
        stats.total_games,
        stats.win_rate(),
        stats.current_streak
    )?;
    Ok(())
}

/// Read guesses line by line from `input`
///
/// `quit` ends the session and `new` abandons the current game. After a game
/// ends any non-`no` answer to the prompt starts another one.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn play_lines<R, I, W>(
    lexicon: &WordLists,
    rng: &mut R,
    input: &mut I,
    out: &mut W,
) -> Result<Statistics>
where
    R: Rng + ?Sized,
    I: BufRead,
    W: Write,
{
    writeln!(out, "\n{}", "═".repeat(40).bright_cyan())?;
    writeln!(out, "{}", "  W O R D L E".bright_green().bold())?;
    writeln!(out, "{}", "═".repeat(40).bright_cyan())?;
    writeln!(out, "Guess the 5-letter word in {MAX_GUESSES} tries. Commands: 'new', 'quit'\n")?;

    let mut stats = Statistics::default();
    let mut game = GameState::start(lexicon, rng);
    let mut line = String::new();

    loop {
        if game.status().is_over() {
            stats.record(&game);
            print_summary(out, &game, &stats)?;

            write!(out, "Play again? (yes/no): ")?;
            out.flush()?;
            line.clear();
            let ended = input.read_line(&mut line)? == 0;
            if ended || matches!(line.trim(), "no" | "n" | "quit" | "q") {
                break;
            }
            game = GameState::start(lexicon, rng);
            continue;
        }

        write!(out, "Guess {}/{MAX_GUESSES}: ", game.guesses().len() + 1)?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match line.trim().to_lowercase().as_str() {
            "" => {}
            "quit" | "exit" => break,
            "new" => {
                game = GameState::start(lexicon, rng);
                writeln!(out, "\n🔄 New game started!\n")?;
            }
            word => {
                let outcome = game.submit_word(word, lexicon);
                if let Some(message) = &outcome.message {
                    writeln!(out, "{}", format!("✗ {message}").red())?;
                } else {
                    print_board(out, &game)?;
                }
            }
        }
    }

    writeln!(out, "\n👋 Thanks for playing!\n")?;
    Ok(stats)
}
