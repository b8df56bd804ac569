//! Wordle Arena - CLI
//!
//! Play Wordle in the terminal, or let the built-in agent play it through
//! the same tool interface a language model would use.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use wordle_arena::{
    agent::{DEFAULT_MAX_ITERATIONS, ToolRegistry},
    commands::{AgentConfig, ToolServer, run_agent, run_benchmark, run_simple},
    observability::init_tracing,
    output::{print_benchmark_result, print_statistics, print_transcript},
    session::{GameQuota, PerClientQuota, SessionRegistry, Unlimited},
    wordlists::WordLists,
};

#[derive(Parser)]
#[command(
    name = "wordle_arena",
    about = "Wordle engine with an interactive board and a tool-driven agent player",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Answer list (one word per line) instead of the embedded one
    #[arg(long, global = true, env = "WORDLE_ANSWERS")]
    answers: Option<PathBuf>,

    /// Extra allowed guesses instead of the embedded list
    #[arg(long, global = true, env = "WORDLE_ALLOWED")]
    allowed: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI board (default)
    Play,

    /// Line-mode game with a colored board
    Simple,

    /// Let the agent play one game and print its transcript
    Agent {
        /// Stop after this many tool calls
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,

        /// Seed for the answer and the agent's choices
        #[arg(short, long)]
        seed: Option<u64>,

        /// Session id used for the game
        #[arg(long, default_value = "cli")]
        session: String,
    },

    /// Serve tool calls as JSON lines on stdin/stdout
    Tool {
        /// Games each client may start; unlimited when omitted
        #[arg(long)]
        max_games: Option<usize>,
    },

    /// Play many agent games in parallel
    Benchmark {
        /// Number of games
        #[arg(short = 'n', long, default_value = "100")]
        games: usize,

        /// Seed for answers and guesses
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play);

    // The TUI owns the terminal; everything else logs to stderr
    if !matches!(command, Commands::Play) {
        init_tracing(cli.verbose);
    }

    let lexicon = WordLists::load(cli.answers.as_deref(), cli.allowed.as_deref())
        .context("failed to load word lists")?;
    tracing::debug!(
        answers = lexicon.answers().len(),
        allowed = lexicon.allowed_count(),
        "word lists ready"
    );

    match command {
        Commands::Play => run_play_command(&lexicon),
        Commands::Simple => run_simple_command(&lexicon),
        Commands::Agent {
            max_iterations,
            seed,
            session,
        } => run_agent_command(
            lexicon,
            &AgentConfig {
                session,
                max_iterations,
                seed,
            },
        ),
        Commands::Tool { max_games } => run_tool_command(lexicon, max_games),
        Commands::Benchmark { games, seed } => run_benchmark_command(lexicon, games, seed),
    }
}

fn run_play_command(lexicon: &WordLists) -> Result<()> {
    use wordle_arena::interactive::{App, run_tui};

    let app = App::new(lexicon);
    run_tui(app)
}

fn run_simple_command(lexicon: &WordLists) -> Result<()> {
    let mut rng = StdRng::from_os_rng();
    let stats = run_simple(lexicon, &mut rng)?;
    if stats.total_games > 0 {
        print_statistics(&stats);
    }
    Ok(())
}

fn run_agent_command(lexicon: WordLists, config: &AgentConfig) -> Result<()> {
    let run = run_agent(Arc::new(lexicon), config)?;
    print_transcript(&run);
    Ok(())
}

fn run_tool_command(lexicon: WordLists, max_games: Option<usize>) -> Result<()> {
    let sessions = Arc::new(SessionRegistry::in_memory(Arc::new(lexicon)));
    let quota: Arc<dyn GameQuota> = match max_games {
        Some(limit) => Arc::new(PerClientQuota::new(limit)),
        None => Arc::new(Unlimited),
    };
    tracing::info!(?max_games, "tool server ready");

    let server = ToolServer::new(ToolRegistry::wordle(sessions, quota));
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    server.serve(stdin.lock(), stdout.lock())
}

fn run_benchmark_command(lexicon: WordLists, games: usize, seed: u64) -> Result<()> {
    println!("Running benchmark on {games} agent games...");
    let result = run_benchmark(Arc::new(lexicon), games, seed, true)?;
    print_benchmark_result(&result);
    Ok(())
}
