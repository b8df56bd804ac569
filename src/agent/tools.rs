//! Tools the agent can call
//!
//! Every tool implements [`Tool`] (name, description, JSON schema for its
//! arguments, execute). [`ToolRegistry`] stores them by name and is the only
//! thing the agent loop talks to.

use crate::session::{
    GameOptions, GameQuota, GameStore, MemoryGameStore, QuotaExceeded, SessionRegistry, Unlimited,
    lock_game,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Name of the guessing tool
pub const MAKE_GUESS: &str = "make_guess";
/// Name of the read-only board tool
pub const GET_GAME_STATE: &str = "get_game_state";

/// Who is calling a tool
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// Conversation the game belongs to
    pub session_id: &'a str,
    /// Account charged for new games
    pub client_id: &'a str,
}

impl<'a> ToolContext<'a> {
    #[must_use]
    pub const fn new(session_id: &'a str, client_id: &'a str) -> Self {
        Self {
            session_id,
            client_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no game for session {0}")]
    NoGame(String),

    #[error(transparent)]
    Quota(#[from] QuotaExceeded),

    #[error("failed to encode tool result: {0}")]
    Encode(serde_json::Error),
}

/// A callable tool
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Shown to the model
    fn description(&self) -> &str;

    /// JSON schema for the arguments
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    /// Run the tool
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] when the arguments are unusable or the call is
    /// refused. Game-level rejections are successful results.
    fn execute(&self, ctx: &ToolContext<'_>, args: Value) -> Result<Value, ToolError>;
}

/// Tools keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: FxHashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with both game tools over `sessions`
    #[must_use]
    pub fn wordle<S: GameStore + 'static>(
        sessions: Arc<SessionRegistry<S>>,
        quota: Arc<dyn GameQuota>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(MakeGuessTool::new(Arc::clone(&sessions), quota));
        registry.register(GameStateTool::new(sessions));
        registry
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Run the tool called `name`
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for unregistered names, otherwise
    /// whatever the tool returns.
    pub fn execute(&self, name: &str, ctx: &ToolContext<'_>, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(ctx, args)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name, description and parameter schema of every tool, sorted by name
    #[must_use]
    pub fn schema(&self) -> Value {
        let tools: Vec<Value> = self
            .tool_names()
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema(),
                })
            })
            .collect();
        Value::Array(tools)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MakeGuessArgs {
    word: String,
    #[serde(default)]
    new_game: bool,
}

/// Submits a guess to the session's game
///
/// Every game the call creates (first call of a session, `newGame: true`, or
/// a stale-game restart) is charged against the quota. The result is the serialized [`crate::game::GuessOutcome`].
pub struct MakeGuessTool<S = MemoryGameStore> {
    sessions: Arc<SessionRegistry<S>>,
    quota: Arc<dyn GameQuota>,
}

impl<S: GameStore> MakeGuessTool<S> {
    #[must_use]
    pub fn new(sessions: Arc<SessionRegistry<S>>, quota: Arc<dyn GameQuota>) -> Self {
        Self { sessions, quota }
    }

    /// Tool without any game limit
    #[must_use]
    pub fn unlimited(sessions: Arc<SessionRegistry<S>>) -> Self {
        Self::new(sessions, Arc::new(Unlimited))
    }
}

impl<S: GameStore> Tool for MakeGuessTool<S> {
    fn name(&self) -> &str {
        MAKE_GUESS
    }

    fn description(&self) -> &str {
        "Submit a 5-letter guess. Returns per-letter feedback (correct, present, absent) \
         and the game status. Set newGame to start over with a new secret word."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "word": {
                    "type": "string",
                    "description": "The 5-letter word to guess"
                },
                "newGame": {
                    "type": "boolean",
                    "description": "Start a new game before guessing"
                }
            },
            "required": ["word"]
        })
    }

    fn execute(&self, ctx: &ToolContext<'_>, args: Value) -> Result<Value, ToolError> {
        let args: MakeGuessArgs =
            serde_json::from_value(args).map_err(|source| ToolError::InvalidArguments {
                tool: MAKE_GUESS.to_string(),
                source,
            })?;

        let options = GameOptions {
            new_game: args.new_game,
        };
        let game = self.sessions.try_get_playable(ctx.session_id, options, || {
            self.quota.try_acquire(ctx.client_id)
        })?;
        let outcome = lock_game(&game).submit_word(&args.word, self.sessions.lexicon());

        tracing::debug!(
            session = ctx.session_id,
            word = %args.word,
            success = outcome.success,
            status = %outcome.status,
            "guess submitted"
        );

        serde_json::to_value(&outcome).map_err(ToolError::Encode)
    }
}

/// Reports the board without changing it
pub struct GameStateTool<S = MemoryGameStore> {
    sessions: Arc<SessionRegistry<S>>,
}

impl<S: GameStore> GameStateTool<S> {
    #[must_use]
    pub const fn new(sessions: Arc<SessionRegistry<S>>) -> Self {
        Self { sessions }
    }
}

impl<S: GameStore> Tool for GameStateTool<S> {
    fn name(&self) -> &str {
        GET_GAME_STATE
    }

    fn description(&self) -> &str {
        "Show the current board: previous guesses with feedback, the status of every \
         letter tried so far, and how many guesses remain."
    }

    fn execute(&self, ctx: &ToolContext<'_>, _args: Value) -> Result<Value, ToolError> {
        let game = self
            .sessions
            .get_game(ctx.session_id)
            .ok_or_else(|| ToolError::NoGame(ctx.session_id.to_string()))?;
        let snapshot = lock_game(&game).snapshot();
        serde_json::to_value(&snapshot).map_err(ToolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use crate::session::PerClientQuota;
    use crate::wordlists::test_lexicon;
    use std::sync::Mutex;
    use std::thread;

    fn sessions() -> Arc<SessionRegistry> {
        let lexicon = test_lexicon(&["crane"], &["salet", "adieu"]);
        Arc::new(SessionRegistry::in_memory(Arc::new(lexicon)).with_seed(7))
    }

    fn ctx() -> ToolContext<'static> {
        ToolContext::new("conv", "client")
    }

    #[test]
    fn make_guess_reports_feedback() {
        let tools = ToolRegistry::wordle(sessions(), Arc::new(Unlimited));

        let result = tools
            .execute(MAKE_GUESS, &ctx(), json!({"word": "salet"}))
            .unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["status"], "playing");
        assert_eq!(
            result["feedback"],
            json!(["absent", "present", "absent", "present", "absent"])
        );
        assert_eq!(result["gameState"]["guessNumber"], 1);
        assert_eq!(result["gameState"]["guessesRemaining"], 5);
    }

    #[test]
    fn make_guess_win_ends_game() {
        let tools = ToolRegistry::wordle(sessions(), Arc::new(Unlimited));

        let result = tools
            .execute(MAKE_GUESS, &ctx(), json!({"word": "CRANE"}))
            .unwrap();
        assert_eq!(result["status"], "won");
        assert_eq!(
            result["feedback"],
            json!(["correct", "correct", "correct", "correct", "correct"])
        );
        assert_eq!(result["gameState"]["guessesRemaining"], 0);
    }

    #[test]
    fn rejected_guess_is_a_result_not_an_error() {
        let tools = ToolRegistry::wordle(sessions(), Arc::new(Unlimited));

        let result = tools
            .execute(MAKE_GUESS, &ctx(), json!({"word": "zzzzz"}))
            .unwrap();
        assert_eq!(result["success"], false);
        assert_eq!(result["message"], "Not in word list");
        assert!(result.get("feedback").is_none());
    }

    #[test]
    fn bad_arguments_are_errors() {
        let tools = ToolRegistry::wordle(sessions(), Arc::new(Unlimited));

        let err = tools
            .execute(MAKE_GUESS, &ctx(), json!({"guess": "crane"}))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));

        let err = tools.execute("shout", &ctx(), json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "shout"));
    }

    #[test]
    fn new_game_flag_resets_board() {
        let sessions = sessions();
        let tools = ToolRegistry::wordle(Arc::clone(&sessions), Arc::new(Unlimited));

        tools.execute(MAKE_GUESS, &ctx(), json!({"word": "crane"})).unwrap();
        let result = tools
            .execute(MAKE_GUESS, &ctx(), json!({"word": "adieu", "newGame": true}))
            .unwrap();
        assert_eq!(result["status"], "playing");
        assert_eq!(result["gameState"]["guessNumber"], 1);
    }

    #[test]
    fn quota_charges_only_new_games() {
        let quota = Arc::new(PerClientQuota::new(1));
        let tools = ToolRegistry::wordle(sessions(), Arc::clone(&quota) as Arc<dyn GameQuota>);

        tools.execute(MAKE_GUESS, &ctx(), json!({"word": "salet"})).unwrap();
        tools.execute(MAKE_GUESS, &ctx(), json!({"word": "adieu"})).unwrap();
        assert_eq!(quota.used("client"), 1);

        let err = tools
            .execute(MAKE_GUESS, &ctx(), json!({"word": "crane", "newGame": true}))
            .unwrap_err();
        assert!(matches!(err, ToolError::Quota(_)));

        let other = ToolContext::new("conv-2", "client");
        assert!(tools.execute(MAKE_GUESS, &other, json!({"word": "crane"})).is_err());
    }

    #[test]
    fn stale_restart_is_charged() {
        let sessions = sessions();
        let stale: GameState = serde_json::from_value(json!({
            "answer": "crane",
            "guesses": [],
            "feedback": [],
            "status": "won"
        }))
        .unwrap();
        sessions.store().set("conv", Arc::new(Mutex::new(stale)));

        let empty = Arc::new(PerClientQuota::new(0));
        let tools = ToolRegistry::wordle(Arc::clone(&sessions), empty as Arc<dyn GameQuota>);
        let err = tools
            .execute(MAKE_GUESS, &ctx(), json!({"word": "salet"}))
            .unwrap_err();
        assert!(matches!(err, ToolError::Quota(_)));

        let quota = Arc::new(PerClientQuota::new(1));
        let tools = ToolRegistry::wordle(sessions, Arc::clone(&quota) as Arc<dyn GameQuota>);
        let result = tools
            .execute(MAKE_GUESS, &ctx(), json!({"word": "salet"}))
            .unwrap();
        assert_eq!(result["gameState"]["guessNumber"], 1);
        assert_eq!(quota.used("client"), 1);
    }

    #[test]
    fn concurrent_first_calls_charge_once() {
        let quota = Arc::new(PerClientQuota::new(5));
        let tools = ToolRegistry::wordle(sessions(), Arc::clone(&quota) as Arc<dyn GameQuota>);

        let accepted = thread::scope(|scope| {
            let handles: Vec<_> = ["salet", "adieu", "salet", "adieu"]
                .into_iter()
                .map(|word| {
                    let tools = &tools;
                    scope.spawn(move || tools.execute(MAKE_GUESS, &ctx(), json!({"word": word})))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap().unwrap())
                .filter(|result| result["success"] == true)
                .count()
        });

        assert_eq!(accepted, 4);
        assert_eq!(quota.used("client"), 1);
    }

    #[test]
    fn game_state_reads_without_mutating() {
        let tools = ToolRegistry::wordle(sessions(), Arc::new(Unlimited));

        let err = tools.execute(GET_GAME_STATE, &ctx(), json!({})).unwrap_err();
        assert!(matches!(err, ToolError::NoGame(_)));

        tools.execute(MAKE_GUESS, &ctx(), json!({"word": "salet"})).unwrap();
        let board = tools.execute(GET_GAME_STATE, &ctx(), json!({})).unwrap();
        let again = tools.execute(GET_GAME_STATE, &ctx(), json!({})).unwrap();

        assert_eq!(board, again);
        assert_eq!(board["guesses"], json!(["salet"]));
        assert_eq!(board["keyboardStatus"]["a"], "present");
        assert_eq!(board["guessesRemaining"], 5);
    }

    #[test]
    fn schema_lists_tools_in_name_order() {
        let tools = ToolRegistry::wordle(sessions(), Arc::new(Unlimited));
        assert_eq!(tools.tool_names(), vec![GET_GAME_STATE, MAKE_GUESS]);

        let schema = tools.schema();
        assert_eq!(schema[1]["name"], MAKE_GUESS);
        assert_eq!(schema[1]["parameters"]["required"], json!(["word"]));
    }
}
