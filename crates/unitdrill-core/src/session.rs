//! Drill session engine.
//!
//! A [`DrillEngine`] owns the dataset and at most one active [`Session`].
//! The session walks a unit's words as a FIFO queue. A word answered
//! `unknown` goes back to the tail, so a unit completes only after every
//! word has been judged `known` once.
//!
//! ```text
//! Idle --start_unit--> Drilling --answer--> Revealed --proceed--> Drilling
//!                                                     \--proceed--> Completed --proceed--> Idle
//! ```

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DrillError;
use crate::model::{Choice, Dataset, Unit, Word, NO_DEFINITION};

/// Observable state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    /// No unit selected.
    Idle,
    /// A card is shown and awaits a judgment.
    Drilling,
    /// The card was judged and its definition revealed.
    Revealed(Choice),
    /// The queue is exhausted.
    Completed,
}

impl DrillState {
    fn name(&self) -> &'static str {
        match self {
            DrillState::Idle => "idle",
            DrillState::Drilling => "drilling",
            DrillState::Revealed(_) => "revealed",
            DrillState::Completed => "completed",
        }
    }
}

impl fmt::Display for DrillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Most recent judgment recorded by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastChoice {
    None,
    Known,
    Unknown,
    Done,
}

impl From<Choice> for LastChoice {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Known => LastChoice::Known,
            Choice::Unknown => LastChoice::Unknown,
        }
    }
}

/// Read-only view of the card currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<'a> {
    pub term: &'a str,
    /// Definition text, with the placeholder substituted when empty.
    pub definition: &'a str,
    /// Whether the definition is currently displayed.
    pub definition_visible: bool,
    /// Queue length at the time the card was shown.
    pub remaining: usize,
}

/// A word the learner missed at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedWord {
    pub term: String,
    pub misses: u32,
}

/// Statistics for one pass through a unit.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub unit_id: i64,
    pub title: String,
    pub words: usize,
    pub cards_shown: u32,
    pub known: u32,
    pub unknown: u32,
    /// Missed words, most-missed first.
    pub missed: Vec<MissedWord>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Drilling,
    Revealed(Choice),
    Completed,
}

/// One drill pass over a unit. Discarded on completion or when returning
/// to unit selection.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    unit_id: i64,
    title: String,
    words: Vec<Word>,
    /// Indices into `words`; the head is the card on screen.
    queue: VecDeque<usize>,
    phase: Phase,
    last_choice: LastChoice,
    definition_visible: bool,
    remaining: usize,
    cards_shown: u32,
    known: u32,
    unknown: u32,
    /// Unknown answers per entry of `words`.
    misses: Vec<u32>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    fn new(unit: &Unit) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            unit_id: unit.id,
            title: unit.title.clone(),
            words: unit.words.clone(),
            queue: (0..unit.words.len()).collect(),
            phase: Phase::Drilling,
            last_choice: LastChoice::None,
            definition_visible: false,
            remaining: 0,
            cards_shown: 0,
            known: 0,
            unknown: 0,
            misses: vec![0; unit.words.len()],
            started_at: Utc::now(),
            completed_at: None,
        };
        session.show_head();
        session
    }

    fn show_head(&mut self) {
        self.phase = Phase::Drilling;
        self.definition_visible = false;
        self.remaining = self.queue.len();
        self.cards_shown += 1;
    }

    fn state(&self) -> DrillState {
        match self.phase {
            Phase::Drilling => DrillState::Drilling,
            Phase::Revealed(choice) => DrillState::Revealed(choice),
            Phase::Completed => DrillState::Completed,
        }
    }

    fn answer(&mut self, choice: Choice) -> Result<(), DrillError> {
        if self.phase != Phase::Drilling {
            return Err(invalid("answer", self.state()));
        }
        self.phase = Phase::Revealed(choice);
        self.last_choice = choice.into();
        self.definition_visible = true;
        match choice {
            Choice::Known => self.known += 1,
            Choice::Unknown => {
                self.unknown += 1;
                if let Some(&index) = self.queue.front() {
                    self.misses[index] += 1;
                }
            }
        }
        tracing::debug!(session = %self.id, %choice, "card answered");
        Ok(())
    }

    /// Apply the pending judgment to the queue and show the next card.
    fn advance(&mut self, choice: Choice) {
        if let Some(index) = self.queue.pop_front() {
            if choice == Choice::Unknown {
                self.queue.push_back(index);
            }
        }

        if self.queue.is_empty() {
            self.phase = Phase::Completed;
            self.last_choice = LastChoice::Done;
            self.definition_visible = true;
            self.remaining = 0;
            self.completed_at = Some(Utc::now());
            tracing::info!(
                session = %self.id,
                unit = self.unit_id,
                cards = self.cards_shown,
                "unit completed"
            );
        } else {
            self.show_head();
            tracing::debug!(
                session = %self.id,
                remaining = self.remaining,
                "next card"
            );
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn unit_id(&self) -> i64 {
        self.unit_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Words still waiting to be judged `known`, head first.
    pub fn queue(&self) -> impl Iterator<Item = &Word> {
        self.queue.iter().map(|&i| &self.words[i])
    }

    fn head(&self) -> Option<&Word> {
        self.queue.front().map(|&i| &self.words[i])
    }

    pub fn summary(&self) -> SessionSummary {
        // Repeated terms in one unit are tracked separately.
        let mut missed: Vec<MissedWord> = self
            .words
            .iter()
            .zip(&self.misses)
            .filter(|(_, &misses)| misses > 0)
            .map(|(word, &misses)| MissedWord {
                term: word.term.clone(),
                misses,
            })
            .collect();
        missed.sort_by(|a, b| b.misses.cmp(&a.misses).then_with(|| a.term.cmp(&b.term)));

        SessionSummary {
            session_id: self.id,
            unit_id: self.unit_id,
            title: self.title.clone(),
            words: self.words.len(),
            cards_shown: self.cards_shown,
            known: self.known,
            unknown: self.unknown,
            missed,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

fn invalid(action: &'static str, state: DrillState) -> DrillError {
    DrillError::InvalidAction {
        action,
        state: state.name(),
    }
}

/// Composes a [`Dataset`] with the single active drill session.
#[derive(Debug)]
pub struct DrillEngine {
    dataset: Dataset,
    session: Option<Session>,
    placeholder: String,
}

impl DrillEngine {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            session: None,
            placeholder: NO_DEFINITION.to_string(),
        }
    }

    /// Override the text shown for words without a definition.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn state(&self) -> DrillState {
        self.session
            .as_ref()
            .map_or(DrillState::Idle, Session::state)
    }

    pub fn last_choice(&self) -> LastChoice {
        self.session
            .as_ref()
            .map_or(LastChoice::None, |s| s.last_choice)
    }

    /// Begin drilling the first unit with `unit_id`.
    ///
    /// Fails with [`DrillError::NoWords`] when the unit is missing or empty,
    /// leaving the engine untouched. Any previous session is discarded.
    pub fn start_unit(&mut self, unit_id: i64) -> Result<(), DrillError> {
        let unit = self
            .dataset
            .find_unit(unit_id)
            .filter(|u| !u.words.is_empty())
            .ok_or(DrillError::NoWords { unit_id })?;

        if let Some(previous) = &self.session {
            tracing::debug!(session = %previous.id, "discarding previous session");
        }
        let session = Session::new(unit);
        tracing::debug!(
            session = %session.id,
            unit = unit_id,
            words = session.words.len(),
            "unit started"
        );
        self.session = Some(session);
        Ok(())
    }

    /// Record the learner's judgment of the current card and reveal it.
    pub fn answer(&mut self, choice: Choice) -> Result<(), DrillError> {
        match self.session.as_mut() {
            Some(session) => session.answer(choice),
            None => Err(invalid("answer", DrillState::Idle)),
        }
    }

    /// Move past a revealed card, or leave a completed unit.
    ///
    /// Returns the state after the transition.
    pub fn proceed(&mut self) -> Result<DrillState, DrillError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| invalid("continue", DrillState::Idle))?;

        match session.phase {
            Phase::Drilling => Err(invalid("continue", DrillState::Drilling)),
            Phase::Completed => {
                self.session = None;
                Ok(DrillState::Idle)
            }
            Phase::Revealed(choice) => {
                session.advance(choice);
                Ok(session.state())
            }
        }
    }

    /// Flip definition visibility. Touches neither the queue nor the
    /// recorded choice. Returns the new visibility.
    pub fn toggle_peek(&mut self) -> Result<bool, DrillError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| invalid("peek", DrillState::Idle))?;
        session.definition_visible = !session.definition_visible;
        Ok(session.definition_visible)
    }

    /// Abandon the current session, if any, and return to unit selection.
    pub fn back(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(session = %session.id, "returned to unit selection");
        }
    }

    /// The card on screen while drilling or revealed.
    pub fn card(&self) -> Option<Card<'_>> {
        let session = self.session.as_ref()?;
        if session.phase == Phase::Completed {
            return None;
        }
        let word = session.head()?;
        Some(Card {
            term: &word.term,
            definition: word.definition_or(&self.placeholder),
            definition_visible: session.definition_visible,
            remaining: session.remaining,
        })
    }

    /// Statistics for the active session.
    pub fn summary(&self) -> Option<SessionSummary> {
        self.session.as_ref().map(Session::summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn unit(id: i64, terms: &[&str]) -> Unit {
        Unit {
            id,
            title: format!("Unit {id}"),
            words: terms.iter().map(|t| Word::new(*t, format!("{t} def"))).collect(),
        }
    }

    fn engine(units: Vec<Unit>) -> DrillEngine {
        DrillEngine::new(Dataset { units })
    }

    fn current_term(e: &DrillEngine) -> String {
        e.card().unwrap().term.to_string()
    }

    #[test]
    fn worked_example_transition_sequence() {
        let mut e = engine(vec![Unit {
            id: 1,
            title: "A".into(),
            words: vec![Word::new("cat", "a small animal"), Word::new("dog", "")],
        }]);
        let mut trace = Vec::new();
        let mut record = |e: &DrillEngine| {
            let entry = match e.state() {
                DrillState::Drilling => format!("Drilling({})", current_term(e)),
                DrillState::Revealed(c) => format!("Revealed({},{c})", current_term(e)),
                other => format!("{other:?}"),
            };
            trace.push(entry);
        };

        e.start_unit(1).unwrap();
        record(&e);
        for choice in [Choice::Unknown, Choice::Unknown, Choice::Known, Choice::Known] {
            e.answer(choice).unwrap();
            record(&e);
            e.proceed().unwrap();
            record(&e);
        }

        assert_eq!(
            trace,
            vec![
                "Drilling(cat)",
                "Revealed(cat,unknown)",
                "Drilling(dog)",
                "Revealed(dog,unknown)",
                "Drilling(cat)",
                "Revealed(cat,known)",
                "Drilling(dog)",
                "Revealed(dog,known)",
                "Completed",
            ]
        );
        assert_eq!(e.last_choice(), LastChoice::Done);
    }

    #[test]
    fn missing_or_empty_unit_reports_no_words() {
        let mut e = engine(vec![unit(1, &[]), unit(2, &["a"])]);
        assert_eq!(e.start_unit(1), Err(DrillError::NoWords { unit_id: 1 }));
        assert_eq!(e.start_unit(7), Err(DrillError::NoWords { unit_id: 7 }));
        assert_eq!(e.state(), DrillState::Idle);
    }

    #[test]
    fn failed_start_keeps_active_session() {
        let mut e = engine(vec![unit(1, &[]), unit(2, &["a", "b"])]);
        e.start_unit(2).unwrap();
        e.answer(Choice::Known).unwrap();
        assert!(e.start_unit(1).is_err());
        assert_eq!(e.state(), DrillState::Revealed(Choice::Known));
    }

    #[test]
    fn duplicate_ids_resolve_to_first_unit() {
        let mut e = engine(vec![unit(3, &["first"]), unit(3, &["second"])]);
        e.start_unit(3).unwrap();
        assert_eq!(current_term(&e), "first");
    }

    #[test]
    fn answer_defers_queue_mutation() {
        let mut e = engine(vec![unit(1, &["a", "b"])]);
        e.start_unit(1).unwrap();
        e.answer(Choice::Known).unwrap();
        let card = e.card().unwrap();
        assert_eq!(card.term, "a");
        assert_eq!(card.remaining, 2);
        assert!(card.definition_visible);
        assert_eq!(e.session().unwrap().queue().count(), 2);
    }

    #[test]
    fn single_word_unit_repeats_until_known() {
        let mut e = engine(vec![unit(1, &["solo"])]);
        e.start_unit(1).unwrap();
        for _ in 0..5 {
            e.answer(Choice::Unknown).unwrap();
            assert_eq!(e.proceed().unwrap(), DrillState::Drilling);
            assert_eq!(current_term(&e), "solo");
            assert_eq!(e.card().unwrap().remaining, 1);
        }
        e.answer(Choice::Known).unwrap();
        assert_eq!(e.proceed().unwrap(), DrillState::Completed);

        let summary = e.summary().unwrap();
        assert_eq!(summary.cards_shown, 6);
        assert_eq!(summary.unknown, 5);
        assert_eq!(
            summary.missed,
            vec![MissedWord {
                term: "solo".into(),
                misses: 5
            }]
        );
        assert!(summary.completed_at.is_some());
    }

    #[test]
    fn repeated_terms_are_counted_separately() {
        let mut e = engine(vec![unit(1, &["echo", "echo", "x"])]);
        e.start_unit(1).unwrap();
        // Miss the first "echo" twice and the second once.
        for choice in [
            Choice::Unknown,
            Choice::Unknown,
            Choice::Known,
            Choice::Unknown,
            Choice::Known,
            Choice::Known,
        ] {
            e.answer(choice).unwrap();
            e.proceed().unwrap();
        }
        assert_eq!(e.state(), DrillState::Completed);
        assert_eq!(
            e.summary().unwrap().missed,
            vec![
                MissedWord {
                    term: "echo".into(),
                    misses: 2
                },
                MissedWord {
                    term: "echo".into(),
                    misses: 1
                },
            ]
        );
    }

    #[test]
    fn completes_after_exactly_n_known_answers() {
        let terms = ["a", "b", "c", "d"];
        let mut e = engine(vec![unit(1, &terms)]);
        e.start_unit(1).unwrap();

        // Every word is missed twice before it is known.
        let mut seen: HashMap<String, u32> = HashMap::new();
        let mut known = 0;
        while e.state() != DrillState::Completed {
            let term = current_term(&e);
            let count = seen.entry(term).or_default();
            *count += 1;
            let choice = if *count > 2 {
                known += 1;
                Choice::Known
            } else {
                Choice::Unknown
            };
            e.answer(choice).unwrap();
            e.proceed().unwrap();
        }
        assert_eq!(known, terms.len());
        assert!(seen.values().all(|&n| n == 3));
    }

    #[test]
    fn remaining_reflects_queue_at_display_time() {
        let mut e = engine(vec![unit(1, &["a", "b", "c"])]);
        e.start_unit(1).unwrap();
        assert_eq!(e.card().unwrap().remaining, 3);
        e.answer(Choice::Known).unwrap();
        assert_eq!(e.card().unwrap().remaining, 3);
        e.proceed().unwrap();
        assert_eq!(e.card().unwrap().remaining, 2);
        e.answer(Choice::Unknown).unwrap();
        e.proceed().unwrap();
        assert_eq!(e.card().unwrap().remaining, 2);
    }

    #[test]
    fn continue_from_completed_returns_to_idle_and_restart_is_fresh() {
        let mut e = engine(vec![unit(1, &["a", "b"])]);
        e.start_unit(1).unwrap();
        while e.state() != DrillState::Completed {
            e.answer(Choice::Known).unwrap();
            e.proceed().unwrap();
        }
        assert!(e.card().is_none());
        assert_eq!(e.proceed().unwrap(), DrillState::Idle);
        assert!(e.session().is_none());

        e.start_unit(1).unwrap();
        let queue: Vec<_> = e.session().unwrap().queue().map(|w| w.term.clone()).collect();
        assert_eq!(queue, vec!["a", "b"]);
        assert_eq!(e.last_choice(), LastChoice::None);
    }

    #[test]
    fn starting_another_unit_discards_session() {
        let mut e = engine(vec![unit(1, &["a", "b"]), unit(2, &["x"])]);
        e.start_unit(1).unwrap();
        let first = e.session().unwrap().id();
        e.answer(Choice::Unknown).unwrap();
        e.start_unit(2).unwrap();
        assert_ne!(e.session().unwrap().id(), first);
        assert_eq!(e.state(), DrillState::Drilling);
        assert_eq!(current_term(&e), "x");
    }

    #[test]
    fn invalid_actions_are_rejected_without_mutation() {
        let mut e = engine(vec![unit(1, &["a"])]);
        assert_eq!(
            e.answer(Choice::Known),
            Err(DrillError::InvalidAction {
                action: "answer",
                state: "idle"
            })
        );
        assert!(e.proceed().is_err());
        assert!(e.toggle_peek().is_err());

        e.start_unit(1).unwrap();
        assert_eq!(
            e.proceed(),
            Err(DrillError::InvalidAction {
                action: "continue",
                state: "drilling"
            })
        );
        e.answer(Choice::Unknown).unwrap();
        assert!(e.answer(Choice::Known).is_err());
        assert_eq!(e.state(), DrillState::Revealed(Choice::Unknown));
        assert_eq!(e.last_choice(), LastChoice::Unknown);
    }

    #[test]
    fn peek_is_independent_of_state_machine() {
        let mut e = engine(vec![unit(1, &["a", "b"])]);
        e.start_unit(1).unwrap();
        assert!(!e.card().unwrap().definition_visible);
        assert!(e.toggle_peek().unwrap());
        assert!(e.card().unwrap().definition_visible);
        assert_eq!(e.state(), DrillState::Drilling);
        assert_eq!(e.last_choice(), LastChoice::None);
        assert!(!e.toggle_peek().unwrap());

        e.toggle_peek().unwrap();
        e.answer(Choice::Known).unwrap();
        e.proceed().unwrap();
        assert!(!e.card().unwrap().definition_visible);
    }

    #[test]
    fn back_abandons_session() {
        let mut e = engine(vec![unit(1, &["a"])]);
        e.start_unit(1).unwrap();
        e.back();
        assert_eq!(e.state(), DrillState::Idle);
        e.back();
        assert_eq!(e.state(), DrillState::Idle);
    }

    #[test]
    fn placeholder_substitutes_empty_definitions() {
        let data = Dataset {
            units: vec![Unit {
                id: 1,
                title: "t".into(),
                words: vec![Word::new("dog", "")],
            }],
        };
        let mut e = DrillEngine::new(data.clone());
        e.start_unit(1).unwrap();
        assert_eq!(e.card().unwrap().definition, NO_DEFINITION);

        let mut e = DrillEngine::new(data).with_placeholder("-");
        e.start_unit(1).unwrap();
        assert_eq!(e.card().unwrap().definition, "-");
    }
}
