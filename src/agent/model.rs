//! Model abstraction driven by the agent loop

use super::message::{ChatMessage, ToolCall};
use std::collections::VecDeque;
use thiserror::Error;

/// What the model wants to do next
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// Run a tool, with optional reasoning shown before it
    Call { thought: String, call: ToolCall },
    /// Answer in text and stop calling tools
    Reply(String),
}

impl ModelTurn {
    #[must_use]
    pub fn call(thought: impl Into<String>, call: ToolCall) -> Self {
        Self::Call {
            thought: thought.into(),
            call,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Something that reads a transcript and produces the next turn
pub trait ChatModel {
    /// # Errors
    ///
    /// Returns [`ModelError`] when no turn can be produced.
    fn respond(&mut self, messages: &[ChatMessage]) -> Result<ModelTurn, ModelError>;
}

/// Replays a fixed list of turns
#[derive(Debug, Default)]
pub struct ScriptedModel {
    turns: VecDeque<ModelTurn>,
}

impl ScriptedModel {
    #[must_use]
    pub fn new(turns: impl IntoIterator<Item = ModelTurn>) -> Self {
        Self {
            turns: turns.into_iter().collect(),
        }
    }

    /// Turns not yet played
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.turns.len()
    }
}

impl ChatModel for ScriptedModel {
    fn respond(&mut self, _messages: &[ChatMessage]) -> Result<ModelTurn, ModelError> {
        self.turns
            .pop_front()
            .ok_or_else(|| ModelError("script exhausted".to_string()))
    }
}
