//! Agent continuation policy
//!
//! After every tool cycle the loop asks whether to keep going. The game-over
//! check reads the latest guess result and fails open: anything it cannot
//! understand means "continue", and [`MaxIterations`] bounds the loop.

use super::message::{ChatMessage, Role};
use super::tools::MAKE_GUESS;
use crate::game::GameStatus;
use serde::Deserialize;

/// Default cap on tool cycles per run
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The latest guess finished the game
    GameOver(GameStatus),
    /// The iteration cap was reached
    IterationLimit,
    /// The model answered without calling a tool
    ModelFinished,
}

/// Verdict of a [`LoopStrategy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDecision {
    Continue,
    Stop(StopReason),
}

/// What a strategy sees after each tool cycle
#[derive(Debug, Clone, Copy)]
pub struct LoopState<'a> {
    /// Completed tool cycles, starting at 1
    pub iteration: usize,
    pub messages: &'a [ChatMessage],
}

/// Decides whether the agent loop runs another cycle
pub trait LoopStrategy: Send + Sync {
    fn decide(&self, state: &LoopState<'_>) -> LoopDecision;
}

/// Status of the most recent guess result, if it can be read
#[must_use]
pub fn latest_guess_status(messages: &[ChatMessage]) -> Option<GameStatus> {
    #[derive(Deserialize)]
    struct StatusOnly {
        status: Option<GameStatus>,
    }

    let latest = messages.iter().rev().find(|m| {
        m.role == Role::Tool && m.tool_name.as_deref().is_none_or(|name| name == MAKE_GUESS)
    })?;

    serde_json::from_str::<StatusOnly>(&latest.content)
        .ok()
        .and_then(|parsed| parsed.status)
}

/// `false` once the latest guess result says the game is won or lost
///
/// Missing or unparseable results keep the loop going.
#[must_use]
pub fn should_continue(messages: &[ChatMessage]) -> bool {
    !latest_guess_status(messages).is_some_and(GameStatus::is_over)
}

/// Stops when the game is over
#[derive(Debug, Default, Clone, Copy)]
pub struct GameOver;

impl LoopStrategy for GameOver {
    fn decide(&self, state: &LoopState<'_>) -> LoopDecision {
        match latest_guess_status(state.messages) {
            Some(status) if status.is_over() => LoopDecision::Stop(StopReason::GameOver(status)),
            _ => LoopDecision::Continue,
        }
    }
}

/// Stops after a fixed number of tool cycles
#[derive(Debug, Clone, Copy)]
pub struct MaxIterations(pub usize);

impl LoopStrategy for MaxIterations {
    fn decide(&self, state: &LoopState<'_>) -> LoopDecision {
        if state.iteration >= self.0 {
            LoopDecision::Stop(StopReason::IterationLimit)
        } else {
            LoopDecision::Continue
        }
    }
}

/// Continues only while every strategy continues; the first stop wins
#[derive(Default)]
pub struct Combined(Vec<Box<dyn LoopStrategy>>);

impl Combined {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, strategy: impl LoopStrategy + 'static) -> Self {
        self.0.push(Box::new(strategy));
        self
    }

    /// Game-over check bounded by `max_iterations`
    #[must_use]
    pub fn wordle(max_iterations: usize) -> Self {
        Self::new().with(GameOver).with(MaxIterations(max_iterations))
    }
}

impl LoopStrategy for Combined {
    fn decide(&self, state: &LoopState<'_>) -> LoopDecision {
        self.0
            .iter()
            .map(|strategy| strategy.decide(state))
            .find(|decision| matches!(decision, LoopDecision::Stop(_)))
            .unwrap_or(LoopDecision::Continue)
    }
}
