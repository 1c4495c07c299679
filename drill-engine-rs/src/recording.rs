//! The session-recording and spaced-repetition ports, plus the default
//! FSRS-backed scheduler adapter.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;
use rs_fsrs::{FSRS, Rating};
use serde::{Deserialize, Serialize};

use crate::sources::SessionCriteria;

/// Failure of any external collaborator call. The engine surfaces these to
/// its caller; it never swallows them.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Handle to a recorded session on the external store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
}

/// Authoritative counters, when the recorder chooses to return them. The
/// engine overwrites its optimistic counts with these.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub completed: usize,
    pub correct: usize,
}

pub trait SessionRecorder {
    fn create_session<'a>(
        &'a self,
        criteria: &'a SessionCriteria,
    ) -> LocalBoxFuture<'a, Result<SessionRecord, CollaboratorError>>;

    fn record_answer<'a>(
        &'a self,
        session: &'a SessionRecord,
        correct: bool,
        time_spent_seconds: i64,
    ) -> LocalBoxFuture<'a, Result<Option<SessionTotals>, CollaboratorError>>;

    fn complete_session<'a>(
        &'a self,
        session: &'a SessionRecord,
    ) -> LocalBoxFuture<'a, Result<(), CollaboratorError>>;
}

/// A review grade on the scheduler's 0–5 scale. The engine only ever produces
/// the fixed two-level mapping: correct answers grade 4, incorrect grade 2.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ReviewGrade(u8);

impl ReviewGrade {
    pub const CORRECT: ReviewGrade = ReviewGrade(4);
    pub const INCORRECT: ReviewGrade = ReviewGrade(2);

    pub fn for_outcome(correct: bool) -> Self {
        if correct {
            Self::CORRECT
        } else {
            Self::INCORRECT
        }
    }

    pub fn new(grade: u8) -> Self {
        Self(grade.min(5))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

pub trait ReviewScheduler {
    fn record_answer<'a>(
        &'a self,
        task_id: &'a str,
        correct: bool,
        grade: ReviewGrade,
    ) -> LocalBoxFuture<'a, Result<(), CollaboratorError>>;
}

/// In-process scheduler over FSRS: grades of 4 and above rate `Good`,
/// everything below rates `Again`. Used by tests and the local build; the
/// deployed app points the port at its own review store instead.
pub struct FsrsScheduler {
    fsrs: FSRS,
    cards: RefCell<HashMap<String, rs_fsrs::Card>>,
}

impl FsrsScheduler {
    pub fn new() -> Self {
        Self {
            fsrs: FSRS::default(),
            cards: RefCell::new(HashMap::new()),
        }
    }

    /// When the scheduler would next show this task, if it has been reviewed.
    pub fn due(&self, task_id: &str) -> Option<DateTime<Utc>> {
        self.cards.borrow().get(task_id).map(|card| card.due)
    }
}

impl Default for FsrsScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewScheduler for FsrsScheduler {
    fn record_answer<'a>(
        &'a self,
        task_id: &'a str,
        _correct: bool,
        grade: ReviewGrade,
    ) -> LocalBoxFuture<'a, Result<(), CollaboratorError>> {
        Box::pin(async move {
            let rating = if grade >= ReviewGrade::CORRECT {
                Rating::Good
            } else {
                Rating::Again
            };
            let mut cards = self.cards.borrow_mut();
            let card = cards
                .entry(task_id.to_string())
                .or_insert_with(rs_fsrs::Card::new);
            let record_log = self.fsrs.repeat(card.clone(), Utc::now());
            *card = record_log[&rating].card.clone();
            Ok(())
        })
    }
}
