//! Agent loop
//!
//! The model is asked for a turn; a tool call is executed and its result
//! appended to the transcript, then the [`LoopStrategy`] decides whether to
//! ask again. A plain text reply ends the run. When the game ends the model
//! gets one more turn for a closing remark, which is kept only if it is text.

use super::message::{ChatMessage, Role};
use super::model::{ChatModel, ModelError, ModelTurn};
use super::policy::{
    Combined, DEFAULT_MAX_ITERATIONS, LoopDecision, LoopState, LoopStrategy, StopReason,
};
use super::tools::{MAKE_GUESS, ToolContext, ToolRegistry};
use crate::game::GuessOutcome;
use serde_json::json;
use thiserror::Error;

/// Instructions given to the model before the user's request
pub const WORDLE_SYSTEM_PROMPT: &str = "\
You are playing Wordle. Find the secret 5-letter word in at most six guesses.

Call make_guess with one word per turn. Each result marks every letter as \
correct (right spot), present (elsewhere in the word) or absent. A letter \
guessed twice is only marked as often as it appears in the answer. Words that \
are not in the word list are refused without using up a guess.

Before each guess, say briefly what you know and why you picked the word. \
Keep guessing until the game is won or lost. If you win, be insufferably smug \
about it. If you lose, admit which clue you should have read better.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model failed: {0}")]
    Model(#[from] ModelError),
}

/// Transcript and outcome of one run
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub messages: Vec<ChatMessage>,
    pub stop_reason: StopReason,
    /// Tool cycles executed
    pub iterations: usize,
}

impl AgentRun {
    /// Latest accepted guess result
    #[must_use]
    pub fn last_outcome(&self) -> Option<GuessOutcome> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.role == Role::Tool && m.tool_name.as_deref() == Some(MAKE_GUESS))
            .filter_map(|m| serde_json::from_str::<GuessOutcome>(&m.content).ok())
            .find(|outcome| outcome.success)
    }

    /// Final text reply of the model, if it gave one
    #[must_use]
    pub fn reply(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == Role::Assistant && m.tool_call.is_none())
            .map(|m| m.content.as_str())
    }
}

/// Drives a [`ChatModel`] against a [`ToolRegistry`]
pub struct AgentLoop<'a> {
    tools: &'a ToolRegistry,
    strategy: Box<dyn LoopStrategy>,
    system_prompt: String,
}

impl<'a> AgentLoop<'a> {
    /// Loop with the default game-over strategy and prompt
    #[must_use]
    pub fn new(tools: &'a ToolRegistry) -> Self {
        Self {
            tools,
            strategy: Box::new(Combined::wordle(DEFAULT_MAX_ITERATIONS)),
            system_prompt: WORDLE_SYSTEM_PROMPT.to_string(),
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: impl LoopStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    fn system_message(&self) -> ChatMessage {
        let schema = serde_json::to_string_pretty(&self.tools.schema())
            .unwrap_or_else(|_| "[]".to_string());
        ChatMessage::system(format!("{}\n\nAvailable tools:\n{schema}", self.system_prompt))
    }

    /// Run until the model stops calling tools or the strategy stops the loop
    ///
    /// Tool failures do not abort the run: they are handed back to the model
    /// as `{"error": ...}` results.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Model`] when the model cannot produce a turn.
    pub fn run<M: ChatModel + ?Sized>(
        &self,
        model: &mut M,
        ctx: &ToolContext<'_>,
        user_input: &str,
    ) -> Result<AgentRun, AgentError> {
        let mut messages = vec![self.system_message(), ChatMessage::user(user_input)];
        let mut iterations = 0;

        tracing::info!(session = ctx.session_id, "agent run started");

        loop {
            let (thought, call) = match model.respond(&messages)? {
                ModelTurn::Reply(text) => {
                    messages.push(ChatMessage::assistant(text));
                    return Ok(finish(messages, StopReason::ModelFinished, iterations));
                }
                ModelTurn::Call { thought, call } => (thought, call),
            };

            let content = match self.tools.execute(&call.name, ctx, call.arguments.clone()) {
                Ok(result) => result.to_string(),
                Err(err) => {
                    tracing::warn!(tool = %call.name, error = %err, "tool call failed");
                    json!({ "error": err.to_string() }).to_string()
                }
            };
            let tool_name = call.name.clone();
            messages.push(ChatMessage::assistant_tool_call(thought, call));
            messages.push(ChatMessage::tool(tool_name, content));
            iterations += 1;

            tracing::debug!(iteration = iterations, "tool cycle complete");

            let state = LoopState {
                iteration: iterations,
                messages: &messages,
            };
            if let LoopDecision::Stop(reason) = self.strategy.decide(&state) {
                if matches!(reason, StopReason::GameOver(_)) {
                    match model.respond(&messages) {
                        Ok(ModelTurn::Reply(text)) => messages.push(ChatMessage::assistant(text)),
                        Ok(ModelTurn::Call { .. }) => {}
                        Err(err) => tracing::debug!(error = %err, "no closing remark"),
                    }
                }
                return Ok(finish(messages, reason, iterations));
            }
        }
    }
}

fn finish(messages: Vec<ChatMessage>, stop_reason: StopReason, iterations: usize) -> AgentRun {
    tracing::info!(?stop_reason, iterations, "agent run finished");
    AgentRun {
        messages,
        stop_reason,
        iterations,
    }
}
