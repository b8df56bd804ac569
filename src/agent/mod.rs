//! Agent-driven play
//!
//! A model plays through tools: [`tools`] exposes the game, [`runner`] drives
//! the conversation and [`policy`] decides when to stop.

pub mod guesser;
pub mod message;
pub mod model;
pub mod policy;
pub mod runner;
pub mod tools;

pub use guesser::CandidateGuesser;
pub use message::{ChatMessage, Role, ToolCall};
pub use model::{ChatModel, ModelError, ModelTurn, ScriptedModel};
pub use policy::{
    Combined, DEFAULT_MAX_ITERATIONS, GameOver, LoopDecision, LoopState, LoopStrategy,
    MaxIterations, StopReason, latest_guess_status, should_continue,
};
pub use runner::{AgentError, AgentLoop, AgentRun, WORDLE_SYSTEM_PROMPT};
pub use tools::{
    GET_GAME_STATE, GameStateTool, MAKE_GUESS, MakeGuessTool, Tool, ToolContext, ToolError,
    ToolRegistry,
};
