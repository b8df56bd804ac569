//! Interactive board transitions
//!
//! The board is driven by a closed set of [`Transition`]s. [`transition`] is
//! the pure form; [`GameState::apply`] mutates in place for front ends that
//! own their state.

use super::state::GameState;
use crate::core::{WORD_LENGTH, Word};
use crate::wordlists::WordLists;

/// Shown when Enter is pressed with fewer than five letters
pub const NOT_ENOUGH_LETTERS: &str = "Not enough letters";
/// Shown when the pending word is not an allowed guess
pub const NOT_IN_WORD_LIST: &str = "Not in word list";

/// Everything the interactive board can ask of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Append a letter to the pending guess
    AddLetter(char),
    /// Drop the last pending letter
    RemoveLetter,
    /// Score the pending guess
    SubmitGuess,
    /// Replace the game with a fresh one
    NewGame { answer: Word },
    /// Set or clear the transient message
    SetMessage(Option<String>),
}

/// Apply `action` to a copy of `state`
#[must_use]
pub fn transition(state: &GameState, action: Transition, lexicon: &WordLists) -> GameState {
    let mut next = state.clone();
    next.apply(action, lexicon);
    next
}

impl GameState {
    /// Apply one transition in place
    ///
    /// Letter and submit transitions are no-ops once the game is over.
    pub fn apply(&mut self, action: Transition, lexicon: &WordLists) {
        match action {
            Transition::AddLetter(letter) => {
                if self.status().is_over() || self.current_guess().len() >= WORD_LENGTH {
                    return;
                }
                let letter = letter.to_ascii_lowercase();
                if !letter.is_ascii_lowercase() {
                    return;
                }
                self.push_letter(letter);
                self.set_message(None);
            }
            Transition::RemoveLetter => {
                if self.status().is_over() {
                    return;
                }
                if self.pop_letter().is_some() {
                    self.set_message(None);
                }
            }
            Transition::SubmitGuess => self.submit_pending(lexicon),
            Transition::NewGame { answer } => *self = Self::new(answer),
            Transition::SetMessage(message) => self.set_message(message),
        }
    }

    fn submit_pending(&mut self, lexicon: &WordLists) {
        if self.status().is_over() {
            return;
        }

        if self.current_guess().len() != WORD_LENGTH {
            self.set_message(Some(NOT_ENOUGH_LETTERS.to_string()));
            return;
        }

        match self.validate(self.current_guess(), lexicon) {
            Ok(guess) => {
                self.accept_guess(guess);
            }
            Err(_) => self.set_message(Some(NOT_IN_WORD_LIST.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameStatus, MAX_GUESSES};
    use crate::wordlists::test_lexicon;

    fn lexicon() -> WordLists {
        test_lexicon(
            &["crane", "slate", "irate", "plumb", "speed", "erase"],
            &["salet", "adieu"],
        )
    }

    fn type_word(state: &GameState, word: &str, lexicon: &WordLists) -> GameState {
        let mut next = state.clone();
        for letter in word.chars() {
            next = transition(&next, Transition::AddLetter(letter), lexicon);
        }
        transition(&next, Transition::SubmitGuess, lexicon)
    }

    fn game(answer: &str) -> GameState {
        GameState::new(Word::new(answer).unwrap())
    }

    #[test]
    fn add_letter_lowercases_and_caps_at_word_length() {
        let lexicon = lexicon();
        let mut state = game("crane");
        for letter in "SLATES".chars() {
            state = transition(&state, Transition::AddLetter(letter), &lexicon);
        }
        assert_eq!(state.current_guess(), "slate");
    }

    #[test]
    fn add_letter_ignores_non_letters() {
        let lexicon = lexicon();
        let state = transition(&game("crane"), Transition::AddLetter('7'), &lexicon);
        assert_eq!(state.current_guess(), "");
    }

    #[test]
    fn remove_letter_on_empty_is_noop() {
        let lexicon = lexicon();
        let state = game("crane");
        assert_eq!(transition(&state, Transition::RemoveLetter, &lexicon), state);

        let typed = transition(&state, Transition::AddLetter('c'), &lexicon);
        let removed = transition(&typed, Transition::RemoveLetter, &lexicon);
        assert_eq!(removed.current_guess(), "");
    }

    #[test]
    fn submit_short_guess_sets_message() {
        let lexicon = lexicon();
        let state = type_word(&game("crane"), "cra", &lexicon);

        assert_eq!(state.message(), Some(NOT_ENOUGH_LETTERS));
        assert!(state.guesses().is_empty());
        assert_eq!(state.current_guess(), "cra");
    }

    #[test]
    fn submit_unknown_word_sets_message() {
        let lexicon = lexicon();
        let state = type_word(&game("crane"), "qwert", &lexicon);

        assert_eq!(state.message(), Some(NOT_IN_WORD_LIST));
        assert!(state.guesses().is_empty());
        assert_eq!(state.status(), GameStatus::Playing);

        // Typing again clears the message
        let edited = transition(&state, Transition::RemoveLetter, &lexicon);
        assert_eq!(edited.message(), None);
    }

    #[test]
    fn winning_submission() {
        let lexicon = lexicon();
        let before = game("crane");
        let after = type_word(&before, "crane", &lexicon);

        assert_eq!(after.status(), GameStatus::Won);
        assert_eq!(after.guesses().len(), before.guesses().len() + 1);
        assert_eq!(after.current_guess(), "");
    }

    #[test]
    fn six_misses_lose_then_board_is_frozen() {
        let lexicon = lexicon();
        let mut state = game("crane");
        for word in ["slate", "irate", "plumb", "speed", "erase", "salet"] {
            state = type_word(&state, word, &lexicon);
        }
        assert_eq!(state.status(), GameStatus::Lost);
        assert_eq!(state.guesses().len(), MAX_GUESSES);

        let frozen = type_word(&state, "adieu", &lexicon);
        assert_eq!(frozen, state);
    }

    #[test]
    fn new_game_resets_everything() {
        let lexicon = lexicon();
        let mut state = type_word(&game("crane"), "slate", &lexicon);
        state = transition(&state, Transition::AddLetter('x'), &lexicon);
        state = transition(
            &state,
            Transition::SetMessage(Some("hello".to_string())),
            &lexicon,
        );

        let fresh = transition(
            &state,
            Transition::NewGame {
                answer: Word::new("plumb").unwrap(),
            },
            &lexicon,
        );

        assert_eq!(fresh, game("plumb"));
    }

    #[test]
    fn transition_does_not_touch_input_state() {
        let lexicon = lexicon();
        let state = game("crane");
        let _ = transition(&state, Transition::AddLetter('a'), &lexicon);
        assert_eq!(state.current_guess(), "");
    }
}
