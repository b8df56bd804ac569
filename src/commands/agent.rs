//! Agent command
//!
//! Lets the local guesser play one game through the tool interface.

use crate::agent::{AgentLoop, AgentRun, CandidateGuesser, Combined, ToolContext, ToolRegistry};
use crate::session::{SessionRegistry, Unlimited};
use crate::wordlists::WordLists;
use anyhow::Result;
use std::sync::Arc;

/// Settings for one agent game
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub session: String,
    pub max_iterations: usize,
    /// Seed for both the answer and the guesser
    pub seed: Option<u64>,
}

/// Run one agent game and return its transcript
///
/// # Errors
///
/// Returns an error if the agent loop fails.
pub fn run_agent(lexicon: Arc<WordLists>, config: &AgentConfig) -> Result<AgentRun> {
    let registry = SessionRegistry::in_memory(Arc::clone(&lexicon));
    let (registry, mut model) = match config.seed {
        Some(seed) => (
            registry.with_seed(seed),
            CandidateGuesser::seeded(lexicon, seed),
        ),
        None => (registry, CandidateGuesser::new(lexicon)),
    };
    let tools = ToolRegistry::wordle(Arc::new(registry), Arc::new(Unlimited));

    let run = AgentLoop::new(&tools)
        .with_strategy(Combined::wordle(config.max_iterations))
        .run(
            &mut model,
            &ToolContext::new(&config.session, &config.session),
            "Let's play Wordle! Start a new game and make your first guess.",
        )?;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{MAKE_GUESS, StopReason};
    use crate::wordlists::test_lexicon;

    fn config(max_iterations: usize) -> AgentConfig {
        AgentConfig {
            session: "cli".to_string(),
            max_iterations,
            seed: Some(4),
        }
    }

    #[test]
    fn agent_plays_to_the_end() {
        let lexicon = Arc::new(test_lexicon(&["crane", "slate", "irate"], &["salet"]));
        let run = run_agent(lexicon, &config(20)).unwrap();

        assert!(matches!(run.stop_reason, StopReason::GameOver(_)));
        let first_call = run.messages.iter().find_map(|m| m.tool_call.as_ref()).unwrap();
        assert_eq!(first_call.name, MAKE_GUESS);
        assert_eq!(first_call.arguments["newGame"], true);
    }

    #[test]
    fn iteration_cap_is_honored() {
        let lexicon = Arc::new(test_lexicon(
            &["crane", "slate", "irate", "plate", "grate", "trace"],
            &["salet"],
        ));
        let run = run_agent(lexicon, &config(1)).unwrap();

        assert_eq!(run.iterations, 1);
        assert!(matches!(
            run.stop_reason,
            StopReason::IterationLimit | StopReason::GameOver(_)
        ));
    }
}
