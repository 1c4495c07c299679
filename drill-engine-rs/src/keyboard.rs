//! Keyboard command dispatch.
//!
//! The session is fully drivable from the keyboard. Dispatch itself is
//! synchronous; anything that needs async work afterwards (flushing reports,
//! advancing, playing a cue) is reported back through [`KeyAction`] so the
//! driving layer can run it.

use crate::answers::AnswerState;
use crate::audio::CueMoment;
use crate::{Phase, PracticeSession, SubmitOutcome};
use task_model::TaskContent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// 1 through 9, already one-based as typed.
    Digit(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    /// `r`: replay the question audio.
    Replay,
    /// `h`: toggle the hint.
    Hint,
    /// `?`: toggle the shortcut overlay.
    Help,
    Escape,
}

impl Key {
    /// Map a browser `KeyboardEvent.key` value. Unmapped keys are `None` and
    /// should not reach [`PracticeSession::handle_key`] at all.
    pub fn from_browser_key(key: &str) -> Option<Key> {
        match key {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            " " | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            "Escape" | "Esc" => Some(Key::Escape),
            "r" | "R" => Some(Key::Replay),
            "h" | "H" => Some(Key::Hint),
            "?" => Some(Key::Help),
            _ => key
                .parse::<u8>()
                .ok()
                .filter(|digit| (1..=9).contains(digit))
                .map(Key::Digit),
        }
    }
}

/// What the driving layer must do after a key was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing happened; the key had no meaning in the current state.
    Ignored,
    /// State changed; re-render and play any newly armed cue.
    Changed,
    /// An answer was scored; flush reports, then re-render feedback.
    Submitted,
    /// Flashcard self-assessment: scored, and the learner expects to move on
    /// immediately. Flush reports, then advance.
    SubmittedAdvance,
    /// The learner wants to leave feedback; advance once reports are flushed.
    AdvanceRequested,
    /// The session was cancelled.
    Cancelled,
}

impl PracticeSession {
    /// Apply one keyboard command. All state mutation happens here,
    /// synchronously; the returned action tells the caller what async work
    /// to run next.
    pub fn handle_key(&mut self, key: Key) -> KeyAction {
        if key == Key::Help {
            self.toggle_help();
            return KeyAction::Changed;
        }
        if key == Key::Escape {
            // dismissal order: help, then hint, then the session itself
            if self.help_shown {
                self.help_shown = false;
                return KeyAction::Changed;
            }
            if self.hint_shown {
                self.hint_shown = false;
                return KeyAction::Changed;
            }
            self.cancel();
            return KeyAction::Cancelled;
        }
        // the overlay captures everything else while it is up
        if self.help_shown {
            return KeyAction::Ignored;
        }
        match key {
            Key::Hint if self.current_task().is_some() => {
                self.toggle_hint();
                KeyAction::Changed
            }
            Key::Replay if self.current_task().is_some() => {
                self.rearm_cue(CueMoment::OnLoad);
                KeyAction::Changed
            }
            Key::Enter => match self.phase {
                Phase::Active(_) => match self.submit() {
                    SubmitOutcome::Scored { .. } => KeyAction::Submitted,
                    SubmitOutcome::Ignored => KeyAction::Ignored,
                },
                Phase::Feedback(_) => KeyAction::AdvanceRequested,
                _ => KeyAction::Ignored,
            },
            _ if !matches!(self.phase, Phase::Active(_)) => KeyAction::Ignored,
            Key::Digit(digit) => self.handle_digit(digit),
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.handle_arrow(key)
            }
            Key::Space => self.handle_space(),
            _ => KeyAction::Ignored,
        }
    }

    fn handle_digit(&mut self, digit: u8) -> KeyAction {
        let index = (digit as usize).saturating_sub(1);
        let Some(answer) = &self.answer else {
            return KeyAction::Ignored;
        };
        match answer {
            AnswerState::MultipleChoice { .. } => {
                self.select_option(index);
                KeyAction::Changed
            }
            AnswerState::TrueFalse { .. } => match digit {
                1 => {
                    self.choose_bool(true);
                    KeyAction::Changed
                }
                2 => {
                    self.choose_bool(false);
                    KeyAction::Changed
                }
                _ => KeyAction::Ignored,
            },
            AnswerState::MultipleSelect { .. } | AnswerState::ErrorDetection { .. } => {
                self.toggle_option(index);
                KeyAction::Changed
            }
            AnswerState::Matching { .. } => {
                let left = self.focus;
                self.choose_match(left, index);
                KeyAction::Changed
            }
            AnswerState::Flashcard { revealed: true, .. } => {
                let known = match digit {
                    1 => true,
                    2 => false,
                    _ => return KeyAction::Ignored,
                };
                self.choose_bool(known);
                match self.submit() {
                    SubmitOutcome::Scored { .. } => KeyAction::SubmittedAdvance,
                    SubmitOutcome::Ignored => KeyAction::Ignored,
                }
            }
            _ => KeyAction::Ignored,
        }
    }

    fn handle_arrow(&mut self, key: Key) -> KeyAction {
        if let Some(AnswerState::Slider { value }) = &self.answer {
            let value = *value;
            let step = match self.current_task().map(|task| &task.content) {
                Some(TaskContent::Slider(c)) if c.step > 0.0 => c.step,
                _ => 1.0,
            };
            let target = match key {
                Key::ArrowRight | Key::ArrowUp => value + step,
                Key::ArrowLeft | Key::ArrowDown => value - step,
                _ => return KeyAction::Ignored,
            };
            self.set_slider_value(target);
            return KeyAction::Changed;
        }
        let rows = self.row_count();
        if rows == 0 {
            return KeyAction::Ignored;
        }
        match key {
            Key::ArrowUp => {
                if self.focus == 0 {
                    return KeyAction::Ignored;
                }
                let focus = self.focus;
                if self.grabbed {
                    self.move_item(focus, focus - 1);
                }
                self.focus -= 1;
                KeyAction::Changed
            }
            Key::ArrowDown => {
                if self.focus + 1 >= rows {
                    return KeyAction::Ignored;
                }
                let focus = self.focus;
                if self.grabbed {
                    self.move_item(focus, focus + 1);
                }
                self.focus += 1;
                KeyAction::Changed
            }
            _ => KeyAction::Ignored,
        }
    }

    fn handle_space(&mut self) -> KeyAction {
        let Some(answer) = &self.answer else {
            return KeyAction::Ignored;
        };
        match answer {
            AnswerState::Ordering { .. } => {
                self.grabbed = !self.grabbed;
                KeyAction::Changed
            }
            AnswerState::MultipleChoice { .. } => {
                let focus = self.focus;
                self.select_option(focus);
                KeyAction::Changed
            }
            AnswerState::TrueFalse { .. } => {
                let choice = self.focus == 0;
                self.choose_bool(choice);
                KeyAction::Changed
            }
            AnswerState::MultipleSelect { .. } | AnswerState::ErrorDetection { .. } => {
                let focus = self.focus;
                self.toggle_option(focus);
                KeyAction::Changed
            }
            AnswerState::Flashcard { revealed: false, .. } => {
                self.reveal_flashcard();
                KeyAction::Changed
            }
            _ => KeyAction::Ignored,
        }
    }

    fn row_count(&self) -> usize {
        match &self.answer {
            Some(AnswerState::MultipleChoice { options, .. }) => options.len(),
            Some(AnswerState::TrueFalse { .. }) => 2,
            Some(AnswerState::Ordering { display }) => display.len(),
            Some(AnswerState::Matching { chosen, .. }) => chosen.len(),
            Some(AnswerState::MultipleSelect { option_count, .. }) => *option_count,
            Some(AnswerState::ErrorDetection { segmentation, .. }) => {
                segmentation.segments.len()
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{CollaboratorError, SessionRecord, SessionRecorder, SessionTotals};
    use crate::sources::{InMemoryContentSource, SessionCriteria};
    use crate::{EngineConfig, SessionPhase};
    use futures::executor::block_on;
    use futures::future::LocalBoxFuture;
    use task_model::{
        FlashcardContent, MatchPair, MatchingContent, MultipleChoiceContent, OrderingContent,
        SliderContent, Task, TrueFalseContent,
    };

    struct NullRecorder;

    impl SessionRecorder for NullRecorder {
        fn create_session<'a>(
            &'a self,
            _criteria: &'a SessionCriteria,
        ) -> LocalBoxFuture<'a, Result<SessionRecord, CollaboratorError>> {
            Box::pin(async {
                Ok(SessionRecord {
                    id: "s".to_string(),
                })
            })
        }

        fn record_answer<'a>(
            &'a self,
            _session: &'a SessionRecord,
            _correct: bool,
            _time_spent_seconds: i64,
        ) -> LocalBoxFuture<'a, Result<Option<SessionTotals>, CollaboratorError>> {
            Box::pin(async { Ok(None) })
        }

        fn complete_session<'a>(
            &'a self,
            _session: &'a SessionRecord,
        ) -> LocalBoxFuture<'a, Result<(), CollaboratorError>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn session(tasks: Vec<Task>) -> PracticeSession {
        let source = InMemoryContentSource::from_tasks(tasks);
        let config = EngineConfig {
            shuffle_seed: Some(3),
            ..Default::default()
        };
        block_on(PracticeSession::start(
            &SessionCriteria::default(),
            config,
            &source,
            &NullRecorder,
        ))
        .unwrap()
    }

    fn task(id: &str, content: TaskContent) -> Task {
        Task {
            id: id.to_string(),
            hint: Some("hint".to_string()),
            content,
        }
    }

    fn true_false() -> Task {
        task(
            "tf",
            TaskContent::TrueFalse(TrueFalseContent {
                statement: "Berlin is the capital of Germany.".to_string(),
                correct_answer: true,
                question_audio: None,
                answer_audio: None,
            }),
        )
    }

    #[test]
    fn browser_key_names_parse() {
        assert_eq!(Key::from_browser_key("3"), Some(Key::Digit(3)));
        assert_eq!(Key::from_browser_key(" "), Some(Key::Space));
        assert_eq!(Key::from_browser_key("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_browser_key("?"), Some(Key::Help));
        assert_eq!(Key::from_browser_key("R"), Some(Key::Replay));
        assert_eq!(Key::from_browser_key("0"), None);
        assert_eq!(Key::from_browser_key("12"), None);
        assert_eq!(Key::from_browser_key("Tab"), None);
    }

    #[test]
    fn digit_then_enter_answers_a_true_false_task() {
        let mut session = session(vec![true_false()]);
        assert_eq!(session.handle_key(Key::Digit(1)), KeyAction::Changed);
        assert_eq!(session.handle_key(Key::Digit(3)), KeyAction::Ignored);
        assert_eq!(session.handle_key(Key::Enter), KeyAction::Submitted);
        assert_eq!(session.phase(), SessionPhase::Feedback);
        assert!(session.view().feedback.unwrap().correct);
    }

    #[test]
    fn enter_without_a_submittable_answer_is_ignored() {
        let mut session = session(vec![true_false()]);
        assert_eq!(session.handle_key(Key::Enter), KeyAction::Ignored);
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn arrows_clamp_focus_and_space_selects_the_focused_row() {
        let mut session = session(vec![task(
            "mc",
            TaskContent::MultipleChoice(MultipleChoiceContent {
                question: "?".to_string(),
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_index: 0,
                question_audio: None,
                answer_audio: None,
            }),
        )]);
        assert_eq!(session.handle_key(Key::ArrowUp), KeyAction::Ignored);
        assert_eq!(session.handle_key(Key::ArrowDown), KeyAction::Changed);
        assert_eq!(session.handle_key(Key::ArrowDown), KeyAction::Changed);
        assert_eq!(session.handle_key(Key::ArrowDown), KeyAction::Ignored);
        assert_eq!(session.handle_key(Key::Space), KeyAction::Changed);
        let view = session.view();
        let rows = view.task.unwrap().rows;
        assert!(rows[2].selected);
        assert!(!rows[0].selected && !rows[1].selected);
    }

    #[test]
    fn grabbed_ordering_items_move_with_the_focus() {
        let mut session = session(vec![task(
            "order",
            TaskContent::Ordering(OrderingContent {
                question: "Build the sentence".to_string(),
                items: vec!["Ich".into(), "gehe".into(), "zur".into(), "Schule".into()],
                correct_order: vec![0, 1, 2, 3],
                question_audio: None,
                items_audio: vec![],
            }),
        )]);
        let before = session.view().task.unwrap().rows[0].label.clone();

        assert_eq!(session.handle_key(Key::Space), KeyAction::Changed);
        assert_eq!(session.handle_key(Key::ArrowDown), KeyAction::Changed);
        let view = session.view().task.unwrap();
        assert!(view.grabbed);
        assert_eq!(view.focus, 1);
        assert_eq!(view.rows[1].label, before);

        // drop, and the cursor moves alone again
        assert_eq!(session.handle_key(Key::Space), KeyAction::Changed);
        assert_eq!(session.handle_key(Key::ArrowUp), KeyAction::Changed);
        let view = session.view().task.unwrap();
        assert!(!view.grabbed);
        assert_eq!(view.rows[1].label, before);
    }

    #[test]
    fn slider_arrows_step_by_the_declared_step_and_clamp() {
        let mut session = session(vec![task(
            "slider",
            TaskContent::Slider(SliderContent {
                question: "?".to_string(),
                min: 0.0,
                max: 10.0,
                step: 2.0,
                correct_value: 4.0,
                tolerance: 0.0,
                unit: None,
                question_audio: None,
                answer_audio: None,
            }),
        )]);
        let value = |session: &PracticeSession| session.view().task.unwrap().slider.unwrap().value;
        assert_eq!(value(&session), 6.0);
        assert_eq!(session.handle_key(Key::ArrowLeft), KeyAction::Changed);
        assert_eq!(value(&session), 4.0);
        session.handle_key(Key::ArrowRight);
        session.handle_key(Key::ArrowRight);
        session.handle_key(Key::ArrowRight);
        session.handle_key(Key::ArrowRight);
        assert_eq!(value(&session), 10.0);
    }

    #[test]
    fn matching_digit_pairs_the_focused_left_row() {
        let mut session = session(vec![task(
            "match",
            TaskContent::Matching(MatchingContent {
                question: "Match".to_string(),
                pairs: vec![
                    MatchPair {
                        left: "der".into(),
                        right: "Hund".into(),
                    },
                    MatchPair {
                        left: "die".into(),
                        right: "Katze".into(),
                    },
                ],
                question_audio: None,
            }),
        )]);
        assert_eq!(session.handle_key(Key::Digit(1)), KeyAction::Changed);
        session.handle_key(Key::ArrowDown);
        assert_eq!(session.handle_key(Key::Digit(2)), KeyAction::Changed);
        assert_eq!(session.handle_key(Key::Enter), KeyAction::Submitted);
    }

    #[test]
    fn flashcard_space_reveals_and_a_digit_submits_for_advancing() {
        let mut session = session(vec![task(
            "card",
            TaskContent::Flashcard(FlashcardContent {
                front: "hola".to_string(),
                back: "hello".to_string(),
                front_language: None,
                back_language: None,
                front_audio: None,
                back_audio: None,
            }),
        )]);
        // assessment keys mean nothing before the reveal
        assert_eq!(session.handle_key(Key::Digit(1)), KeyAction::Ignored);
        assert_eq!(session.handle_key(Key::Space), KeyAction::Changed);
        assert!(session.view().task.unwrap().flashcard_back.is_some());
        assert_eq!(
            session.handle_key(Key::Digit(2)),
            KeyAction::SubmittedAdvance
        );
        assert_eq!(session.phase(), SessionPhase::Feedback);
        assert!(!session.view().feedback.unwrap().correct);
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn feedback_only_reacts_to_advance_and_global_keys() {
        let mut session = session(vec![true_false()]);
        session.handle_key(Key::Digit(1));
        session.handle_key(Key::Enter);
        assert_eq!(session.phase(), SessionPhase::Feedback);

        assert_eq!(session.handle_key(Key::Digit(2)), KeyAction::Ignored);
        assert_eq!(session.handle_key(Key::Space), KeyAction::Ignored);
        assert_eq!(session.handle_key(Key::Hint), KeyAction::Changed);
        assert_eq!(session.handle_key(Key::Enter), KeyAction::AdvanceRequested);
    }

    #[test]
    fn replay_rearms_the_question_cue() {
        let mut session = session(vec![true_false()]);
        session.take_due_cue();
        assert_eq!(session.handle_key(Key::Replay), KeyAction::Changed);
        assert_eq!(session.take_due_cue(), Some(CueMoment::OnLoad));
    }

    #[test]
    fn escape_dismisses_help_then_hint_then_cancels() {
        let mut session = session(vec![true_false()]);
        session.handle_key(Key::Help);
        session.handle_key(Key::Hint); // swallowed by the overlay
        assert_eq!(session.handle_key(Key::Digit(1)), KeyAction::Ignored);
        assert_eq!(session.handle_key(Key::Escape), KeyAction::Changed);
        assert!(!session.view().help_shown);

        session.handle_key(Key::Hint);
        assert!(session.view().task.as_ref().unwrap().hint.is_some());
        assert_eq!(session.handle_key(Key::Escape), KeyAction::Changed);
        assert!(session.view().task.as_ref().unwrap().hint.is_none());

        assert_eq!(session.handle_key(Key::Escape), KeyAction::Cancelled);
        assert_eq!(session.phase(), SessionPhase::Cancelled);
        assert_eq!(session.handle_key(Key::Digit(1)), KeyAction::Ignored);
    }
}
