//! Local model that plays by narrowing the answer list
//!
//! It only sees what a remote model would see: the transcript. Past guesses
//! and their feedback come from the latest `make_guess` result, and every
//! answer that would not have produced the same feedback is discarded.

use super::message::{ChatMessage, Role, ToolCall};
use super::model::{ChatModel, ModelError, ModelTurn};
use super::tools::MAKE_GUESS;
use crate::core::{Feedback, Word};
use crate::game::{GameStatus, GuessOutcome};
use crate::wordlists::WordLists;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::json;
use std::sync::Arc;

/// Strong first guess, used when the lexicon accepts it
pub const DEFAULT_OPENER: &str = "salet";

/// Above this many candidates a random one is picked instead of scoring all
const MINIMAX_LIMIT: usize = 250;

/// Guesses words consistent with all feedback seen so far
pub struct CandidateGuesser {
    lexicon: Arc<WordLists>,
    opener: Option<Word>,
    rng: StdRng,
}

impl CandidateGuesser {
    #[must_use]
    pub fn new(lexicon: Arc<WordLists>) -> Self {
        Self::with_rng(lexicon, StdRng::from_os_rng())
    }

    /// Reproducible guesser
    #[must_use]
    pub fn seeded(lexicon: Arc<WordLists>, seed: u64) -> Self {
        Self::with_rng(lexicon, StdRng::seed_from_u64(seed))
    }

    fn with_rng(lexicon: Arc<WordLists>, rng: StdRng) -> Self {
        let opener = Word::new(DEFAULT_OPENER)
            .ok()
            .filter(|word| lexicon.is_allowed(word));
        Self {
            lexicon,
            opener,
            rng,
        }
    }

    /// Answers that match every `(guess, feedback)` pair
    #[must_use]
    pub fn candidates(&self, history: &[(Word, Feedback)]) -> Vec<&Word> {
        filter_candidates(self.lexicon.answers(), history)
    }
}

fn filter_candidates<'a>(answers: &'a [Word], history: &[(Word, Feedback)]) -> Vec<&'a Word> {
    answers
        .iter()
        .filter(|&candidate| {
            history
                .iter()
                .all(|(guess, observed)| Feedback::score(guess, candidate) == *observed)
        })
        .collect()
}

/// Next guess among `candidates`
fn pick<R: Rng + ?Sized>(rng: &mut R, candidates: &[&Word]) -> Option<Word> {
    if candidates.len() > MINIMAX_LIMIT {
        let index = rng.random_range(0..candidates.len());
        return Some(candidates[index].clone());
    }

    // Smallest worst-case partition; first candidate wins ties
    candidates
        .iter()
        .copied()
        .min_by_key(|guess| worst_partition(guess, candidates))
        .cloned()
}

/// Largest group of candidates sharing one feedback pattern for `guess`
fn worst_partition(guess: &Word, candidates: &[&Word]) -> usize {
    let mut counts: FxHashMap<Feedback, usize> = FxHashMap::default();
    for &candidate in candidates {
        *counts.entry(Feedback::score(guess, candidate)).or_insert(0) += 1;
    }
    counts.values().max().copied().unwrap_or(0)
}

/// Parsed `make_guess` results, oldest first
fn guess_results(messages: &[ChatMessage]) -> impl Iterator<Item = GuessOutcome> + '_ {
    messages
        .iter()
        .filter(|m| m.role == Role::Tool && m.tool_name.as_deref() == Some(MAKE_GUESS))
        .filter_map(|m| serde_json::from_str(&m.content).ok())
}

/// Words the game refused in this transcript
fn rejected_words(messages: &[ChatMessage]) -> FxHashSet<String> {
    messages
        .windows(2)
        .filter_map(|pair| {
            let call = pair[0].tool_call.as_ref().filter(|c| c.name == MAKE_GUESS)?;
            let outcome: GuessOutcome = serde_json::from_str(&pair[1].content).ok()?;
            if outcome.success {
                return None;
            }
            call.arguments["word"].as_str().map(str::to_lowercase)
        })
        .collect()
}

fn closing_remark(outcome: &GuessOutcome) -> String {
    let progress = outcome.game_state.as_ref();
    let guesses = progress.map_or(0, |p| p.guess_number);
    match outcome.status {
        GameStatus::Won => {
            let word = progress
                .and_then(|p| p.guesses.last())
                .map_or_else(String::new, |w| w.text().to_uppercase());
            format!("{word} in {guesses}. Frankly it never stood a chance against me.")
        }
        _ => {
            let answer = progress
                .and_then(|p| p.answer.as_ref())
                .map_or_else(|| "a mystery".to_string(), |w| w.text().to_uppercase());
            format!("Out of guesses. It was {answer}, and I really should have seen that coming.")
        }
    }
}

impl ChatModel for CandidateGuesser {
    fn respond(&mut self, messages: &[ChatMessage]) -> Result<ModelTurn, ModelError> {
        let results: Vec<GuessOutcome> = guess_results(messages).collect();

        if let Some(latest) = results.last()
            && latest.status.is_over()
        {
            return Ok(ModelTurn::Reply(closing_remark(latest)));
        }

        let history: Vec<(Word, Feedback)> = results
            .iter()
            .rev()
            .find_map(|outcome| outcome.game_state.as_ref())
            .map(|p| p.guesses.iter().cloned().zip(p.feedback.iter().copied()).collect())
            .unwrap_or_default();
        let rejected = rejected_words(messages);
        let tried = |word: &Word| {
            rejected.contains(word.text()) || history.iter().any(|(guess, _)| guess == word)
        };

        let (word, thought) = if history.is_empty()
            && let Some(opener) = self.opener.clone().filter(|w| !tried(w))
        {
            let thought = format!("Opening with {}.", opener.text().to_uppercase());
            (opener, thought)
        } else {
            let lexicon = Arc::clone(&self.lexicon);
            let candidates: Vec<&Word> = filter_candidates(lexicon.answers(), &history)
                .into_iter()
                .filter(|&w| !tried(w))
                .collect();
            let Some(word) = pick(&mut self.rng, &candidates) else {
                return Ok(ModelTurn::Reply(
                    "Nothing in my word list fits that feedback. I give up.".to_string(),
                ));
            };
            let count = candidates.len();
            let thought = format!(
                "{count} candidate{} left. Trying {}.",
                if count == 1 { "" } else { "s" },
                word.text().to_uppercase()
            );
            (word, thought)
        };

        let mut arguments = json!({ "word": word.text() });
        if results.is_empty() && rejected.is_empty() {
            arguments["newGame"] = json!(true);
        }

        Ok(ModelTurn::call(
            thought,
            ToolCall {
                name: MAKE_GUESS.to_string(),
                arguments,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LetterResult::{Absent, Correct};
    use crate::wordlists::test_lexicon;

    fn guesser(answers: &[&str], extra: &[&str]) -> CandidateGuesser {
        CandidateGuesser::seeded(Arc::new(test_lexicon(answers, extra)), 1)
    }

    fn word(text: &str) -> Word {
        Word::new(text).unwrap()
    }

    fn called_word(turn: &ModelTurn) -> &str {
        match turn {
            ModelTurn::Call { call, .. } => call.arguments["word"].as_str().unwrap(),
            ModelTurn::Reply(text) => panic!("expected a call, got reply {text:?}"),
        }
    }

    fn result_message(value: serde_json::Value) -> ChatMessage {
        ChatMessage::tool(MAKE_GUESS, value.to_string())
    }

    #[test]
    fn opens_with_default_opener_and_new_game() {
        let mut model = guesser(&["crane", "slate"], &["salet"]);
        let turn = model.respond(&[ChatMessage::user("play")]).unwrap();

        assert_eq!(called_word(&turn), "salet");
        let ModelTurn::Call { call, .. } = turn else { unreachable!() };
        assert_eq!(call.arguments["newGame"], true);
    }

    #[test]
    fn opens_with_candidate_when_opener_unknown() {
        let mut model = guesser(&["crane"], &[]);
        let turn = model.respond(&[]).unwrap();
        assert_eq!(called_word(&turn), "crane");
    }

    #[test]
    fn candidates_respect_feedback() {
        let model = guesser(&["crane", "slate", "irate", "plate"], &["salet"]);
        let history = vec![(
            word("crane"),
            Feedback::new([Absent, Absent, Correct, Absent, Correct]),
        )];

        let remaining: Vec<&str> = model
            .candidates(&history)
            .iter()
            .map(|w| w.text())
            .collect();
        assert_eq!(remaining, vec!["slate", "plate"]);
    }

    #[test]
    fn follows_up_with_consistent_word() {
        let mut model = guesser(&["crane", "slate", "irate"], &["salet"]);
        // Only crane scores absent/present/absent/present/absent against salet
        let messages = vec![
            ChatMessage::user("play"),
            result_message(json!({
                "success": true,
                "status": "playing",
                "feedback": ["absent", "present", "absent", "present", "absent"],
                "gameState": {
                    "guesses": ["salet"],
                    "feedback": [["absent", "present", "absent", "present", "absent"]],
                    "guessNumber": 1,
                    "guessesRemaining": 5
                }
            })),
        ];

        let turn = model.respond(&messages).unwrap();
        assert_eq!(called_word(&turn), "crane");
        let ModelTurn::Call { thought, .. } = turn else { unreachable!() };
        assert_eq!(thought, "1 candidate left. Trying CRANE.");
    }

    #[test]
    fn skips_rejected_words() {
        let mut model = guesser(&["crane", "slate"], &["salet"]);
        let messages = vec![
            ChatMessage::assistant_tool_call(
                "",
                ToolCall {
                    name: MAKE_GUESS.to_string(),
                    arguments: json!({"word": "salet", "newGame": true}),
                },
            ),
            result_message(json!({
                "success": false,
                "status": "playing",
                "message": "Not in word list"
            })),
        ];

        let turn = model.respond(&messages).unwrap();
        assert_ne!(called_word(&turn), "salet");
        let ModelTurn::Call { call, .. } = turn else { unreachable!() };
        assert!(call.arguments.get("newGame").is_none());
    }

    #[test]
    fn gloats_after_winning() {
        let mut model = guesser(&["crane"], &[]);
        let messages = vec![result_message(json!({
            "success": true,
            "status": "won",
            "feedback": ["correct", "correct", "correct", "correct", "correct"],
            "gameState": {
                "guesses": ["crane"],
                "feedback": [["correct", "correct", "correct", "correct", "correct"]],
                "guessNumber": 1,
                "guessesRemaining": 0
            }
        }))];

        let ModelTurn::Reply(text) = model.respond(&messages).unwrap() else {
            panic!("expected a reply");
        };
        assert!(text.starts_with("CRANE in 1."));
    }

    #[test]
    fn owns_up_after_losing() {
        let mut model = guesser(&["crane"], &[]);
        let messages = vec![result_message(json!({
            "success": true,
            "status": "lost",
            "gameState": {
                "guesses": [],
                "feedback": [],
                "guessNumber": 6,
                "guessesRemaining": 0,
                "answer": "crane"
            }
        }))];

        let ModelTurn::Reply(text) = model.respond(&messages).unwrap() else {
            panic!("expected a reply");
        };
        assert!(text.contains("CRANE"));
    }

    #[test]
    fn gives_up_when_nothing_fits() {
        let mut model = guesser(&["crane"], &["salet"]);
        let messages = vec![result_message(json!({
            "success": true,
            "status": "playing",
            "gameState": {
                "guesses": ["salet"],
                "feedback": [["correct", "correct", "correct", "correct", "absent"]],
                "guessNumber": 1,
                "guessesRemaining": 5
            }
        }))];

        assert!(matches!(model.respond(&messages).unwrap(), ModelTurn::Reply(_)));
    }

    #[test]
    fn worst_partition_counts_largest_group() {
        let crane = word("crane");
        let slate = word("slate");
        let plate = word("plate");
        let candidates = vec![&crane, &slate, &plate];

        // slate and plate both score the same against crane
        assert_eq!(worst_partition(&crane, &candidates), 2);
        assert_eq!(worst_partition(&slate, &candidates), 1);
    }
}
