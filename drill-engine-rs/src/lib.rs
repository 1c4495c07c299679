//! The practice session engine: answer state, scoring, audio cue sequencing,
//! keyboard dispatch, and the session state machine. The rendering layer and
//! all persistence live outside this crate and talk to it through the ports
//! in [`sources`], [`recording`], and [`audio`].

pub mod answers;
pub mod audio;
#[cfg(target_arch = "wasm32")]
mod bindings;
pub mod keyboard;
pub mod recording;
pub mod scoring;
pub mod shuffle;
pub mod sources;
mod utils;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use task_model::{Task, TaskContent, TaskKind};

use crate::answers::AnswerState;
use crate::audio::{AudioResolver, AudioSink, CueMoment, CueOutcome, CueSequencer};
use crate::recording::{
    CollaboratorError, ReviewGrade, ReviewScheduler, SessionRecord, SessionRecorder,
};
use crate::scoring::{ScoreResult, Verdict};
use crate::shuffle::Shuffler;
use crate::sources::{ContentSource, SessionCriteria};

// putting this inside LOGGER prevents us from accidentally initializing the logger more than once
#[allow(clippy::declare_interior_mutable_const)]
const LOGGER: LazyLock<()> = LazyLock::new(|| {
    utils::set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
});

pub(crate) fn init_logging() {
    // used to only initialize the logger once
    #[allow(clippy::borrow_interior_mutable_const)]
    *LOGGER;
}

/// Runtime options, passed at construction. No config files; the view hands
/// these over when it creates the session.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Fixed seed for reproducible display orders. `None` draws from entropy.
    pub shuffle_seed: Option<u64>,
    /// Base path audio references resolve against.
    pub audio_base_path: String,
    /// Safety cap per audio file, in case the backend never reports the end.
    pub playback_cap: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shuffle_seed: None,
            audio_base_path: "audio".to_string(),
            playback_cap: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Loading,
    Active(usize),
    Feedback(usize),
    Complete,
    Cancelled,
}

/// The phase as the view sees it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Loading,
    Active,
    Feedback,
    Complete,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Scored { correct: bool },
    /// Submission precondition unmet, or not in an active task. Nothing
    /// changed and nothing was queued.
    Ignored,
}

/// An outbound collaborator call, queued at submit time and flushed in order.
/// One call per item so a failed flush can resume without repeating calls
/// that already succeeded.
#[derive(Clone, Debug)]
enum Report {
    RecordAnswer {
        correct: bool,
        time_spent_seconds: i64,
    },
    ScheduleReview {
        task_id: String,
        correct: bool,
        grade: ReviewGrade,
    },
    CompleteSession,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("the content source returned no tasks for this session")]
    EmptySession,
    #[error("cannot advance while answer reports are still pending")]
    ReportPending,
    #[error("advance is only valid from feedback")]
    NotInFeedback,
    #[error("skip is only valid from an active task")]
    NotActive,
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// The session state machine. Owns the task list, the current task's answer
/// state, the counters, and the outbound report queue. All mutation happens
/// through the named transitions below; async work (flushing reports, playing
/// cues) is driven from outside via the `&RefCell` helpers so no borrow is
/// ever held across an await.
pub struct PracticeSession {
    record: SessionRecord,
    tasks: Vec<Task>,
    phase: Phase,
    completed_count: usize,
    correct_count: usize,
    answer: Option<AnswerState>,
    last_verdict: Option<Verdict>,
    activated_at: DateTime<Utc>,
    shuffler: Shuffler,
    config: EngineConfig,
    report_queue: VecDeque<Report>,
    due_cue: Option<CueMoment>,
    focus: usize,
    grabbed: bool,
    hint_shown: bool,
    help_shown: bool,
}

impl PracticeSession {
    /// Create the external session record, pull the task list, and activate
    /// the first task. The caller is in the `Loading` phase for exactly the
    /// duration of this call.
    pub async fn start(
        criteria: &SessionCriteria,
        config: EngineConfig,
        source: &dyn ContentSource,
        recorder: &dyn SessionRecorder,
    ) -> Result<Self, EngineError> {
        init_logging();
        let ids = source.task_ids(criteria).await?;
        if ids.is_empty() {
            return Err(EngineError::EmptySession);
        }
        let mut tasks = Vec::with_capacity(ids.len());
        for id in &ids {
            let task = source.task(id).await?;
            for issue in task.content.validate() {
                log::warn!("task {id:?} has a content problem: {issue}");
            }
            tasks.push(task);
        }
        let record = recorder.create_session(criteria).await?;

        let shuffler = match config.shuffle_seed {
            Some(seed) => Shuffler::seeded(seed),
            None => Shuffler::new(),
        };
        let mut session = Self {
            record,
            tasks,
            phase: Phase::Loading,
            completed_count: 0,
            correct_count: 0,
            answer: None,
            last_verdict: None,
            activated_at: Utc::now(),
            shuffler,
            config,
            report_queue: VecDeque::new(),
            due_cue: None,
            focus: 0,
            grabbed: false,
            hint_shown: false,
            help_shown: false,
        };
        session.activate(0);
        Ok(session)
    }

    fn activate(&mut self, index: usize) {
        self.answer = Some(AnswerState::for_task(
            &self.tasks[index].content,
            &mut self.shuffler,
        ));
        self.phase = Phase::Active(index);
        self.activated_at = Utc::now();
        self.focus = 0;
        self.grabbed = false;
        self.hint_shown = false;
        self.last_verdict = None;
        self.due_cue = Some(CueMoment::OnLoad);
    }

    fn finish(&mut self) {
        self.phase = Phase::Complete;
        self.answer = None;
        self.last_verdict = None;
        self.due_cue = None;
        self.report_queue.push_back(Report::CompleteSession);
    }

    /// Score the current answer and enter feedback. Counters update
    /// optimistically here; the collaborator calls are queued and must be
    /// flushed with [`PracticeSession::flush_reports`] before advancing.
    ///
    /// A second submit while already in feedback is a no-op, as is any submit
    /// whose "can submit" precondition is unmet.
    pub fn submit(&mut self) -> SubmitOutcome {
        let Phase::Active(index) = self.phase else {
            return SubmitOutcome::Ignored;
        };
        let Some(answer) = &self.answer else {
            return SubmitOutcome::Ignored;
        };
        if !answer.can_submit() {
            return SubmitOutcome::Ignored;
        }

        let task = &self.tasks[index];
        let verdict = scoring::evaluate(&task.content, answer);
        let correct = verdict.correct;

        self.completed_count += 1;
        if correct {
            self.correct_count += 1;
        }
        let time_spent_seconds = (Utc::now() - self.activated_at).num_seconds().max(0);
        self.report_queue.push_back(Report::RecordAnswer {
            correct,
            time_spent_seconds,
        });
        self.report_queue.push_back(Report::ScheduleReview {
            task_id: task.id.clone(),
            correct,
            grade: ReviewGrade::for_outcome(correct),
        });

        // the flashcard reveal cue already fired while the card flipped
        if !matches!(task.content, TaskContent::Flashcard(_)) {
            self.due_cue = Some(CueMoment::OnReveal);
        }
        self.last_verdict = Some(verdict);
        self.phase = Phase::Feedback(index);
        SubmitOutcome::Scored { correct }
    }

    /// Leave feedback for the next task, or complete the session from the
    /// last one. Refused while queued reports have not been flushed, so a
    /// lost collaborator call can be retried without losing its place.
    pub fn advance(&mut self) -> Result<(), EngineError> {
        let Phase::Feedback(index) = self.phase else {
            return Err(EngineError::NotInFeedback);
        };
        if !self.report_queue.is_empty() {
            return Err(EngineError::ReportPending);
        }
        if index + 1 < self.tasks.len() {
            self.activate(index + 1);
        } else {
            self.finish();
        }
        Ok(())
    }

    /// Move on without scoring. Only legal from an active task; counters are
    /// untouched and no reports are queued. Skipping the last task completes
    /// the session.
    pub fn skip(&mut self) -> Result<(), EngineError> {
        let Phase::Active(index) = self.phase else {
            return Err(EngineError::NotActive);
        };
        if index + 1 < self.tasks.len() {
            self.activate(index + 1);
        } else {
            self.finish();
        }
        Ok(())
    }

    /// Abandon the session. Legal at any point; pending reports are
    /// discarded, and results of calls already in flight are discarded when
    /// they land.
    pub fn cancel(&mut self) {
        if matches!(self.phase, Phase::Complete | Phase::Cancelled) {
            return;
        }
        self.phase = Phase::Cancelled;
        self.answer = None;
        self.last_verdict = None;
        self.due_cue = None;
        self.report_queue.clear();
    }

    /// Drain the outbound report queue in order, one collaborator call at a
    /// time. Items are only removed after their call succeeds, so a failure
    /// leaves the rest of the queue intact and calling this again resumes
    /// exactly where it stopped, without repeating anything. When the
    /// recorder returns authoritative totals they overwrite the optimistic
    /// counters.
    pub async fn flush_reports(
        session: &RefCell<PracticeSession>,
        recorder: &dyn SessionRecorder,
        scheduler: &dyn ReviewScheduler,
    ) -> Result<(), EngineError> {
        loop {
            let (record, item) = {
                let session = session.borrow();
                match session.report_queue.front() {
                    Some(item) => (session.record.clone(), item.clone()),
                    None => return Ok(()),
                }
            };
            let totals = match &item {
                Report::RecordAnswer {
                    correct,
                    time_spent_seconds,
                } => {
                    recorder
                        .record_answer(&record, *correct, *time_spent_seconds)
                        .await?
                }
                Report::ScheduleReview {
                    task_id,
                    correct,
                    grade,
                } => {
                    scheduler.record_answer(task_id, *correct, *grade).await?;
                    None
                }
                Report::CompleteSession => {
                    recorder.complete_session(&record).await?;
                    None
                }
            };
            let mut session = session.borrow_mut();
            if session.phase == Phase::Cancelled {
                // the call completed after cancellation; discard its result
                return Ok(());
            }
            session.report_queue.pop_front();
            if let Some(totals) = totals {
                session.completed_count = totals.completed;
                session.correct_count = totals.correct;
            }
        }
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn phase(&self) -> SessionPhase {
        match self.phase {
            Phase::Loading => SessionPhase::Loading,
            Phase::Active(_) => SessionPhase::Active,
            Phase::Feedback(_) => SessionPhase::Feedback,
            Phase::Complete => SessionPhase::Complete,
            Phase::Cancelled => SessionPhase::Cancelled,
        }
    }

    pub fn task_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Active(index) | Phase::Feedback(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.task_index().map(|index| &self.tasks[index])
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn report_pending(&self) -> bool {
        !self.report_queue.is_empty()
    }

    // =======
    // cue arming
    // =======

    /// The lifecycle moment whose cues are due, if any. Taking it clears it;
    /// the caller plays it via [`play_due_cue`].
    pub fn take_due_cue(&mut self) -> Option<CueMoment> {
        self.due_cue.take()
    }

    /// Put a cue moment back after an aborted playback attempt so the next
    /// user interaction retries it.
    pub fn rearm_cue(&mut self, moment: CueMoment) {
        if matches!(self.phase, Phase::Active(_) | Phase::Feedback(_)) {
            self.due_cue = Some(moment);
        }
    }

    // =======
    // pointer-driven answer mutation; the keyboard path lives in `keyboard`
    // =======

    pub fn select_option(&mut self, display_index: usize) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
        {
            answer.select(display_index);
        }
    }

    pub fn toggle_option(&mut self, index: usize) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
        {
            answer.toggle(index);
        }
    }

    pub fn choose_bool(&mut self, value: bool) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
        {
            answer.choose(value);
        }
    }

    pub fn set_text_entry(&mut self, text: String) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
        {
            answer.set_text(text);
        }
    }

    pub fn set_blank_entry(&mut self, blank: usize, text: String) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
        {
            answer.set_blank(blank, text);
        }
    }

    pub fn move_item(&mut self, from: usize, to: usize) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
        {
            answer.move_item(from, to);
        }
    }

    pub fn choose_match(&mut self, left: usize, right_display: usize) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
        {
            answer.choose_match(left, right_display);
        }
    }

    /// Clamp and snap to the declared step grid, then store.
    pub fn set_slider_value(&mut self, value: f64) {
        let Phase::Active(index) = self.phase else {
            return;
        };
        let TaskContent::Slider(content) = &self.tasks[index].content else {
            return;
        };
        let snapped = answers::snap_to_step(value, content);
        if let Some(answer) = self.answer.as_mut() {
            answer.set_value(snapped);
        }
    }

    /// Flip the flashcard. Arms the reveal cue, since for flashcards the
    /// reveal happens before feedback, not at it.
    pub fn reveal_flashcard(&mut self) {
        if let Phase::Active(_) = self.phase
            && let Some(answer) = self.answer.as_mut()
            && !answer.revealed()
        {
            answer.reveal();
            if answer.revealed() {
                self.due_cue = Some(CueMoment::OnReveal);
            }
        }
    }

    pub fn toggle_hint(&mut self) {
        self.hint_shown = !self.hint_shown;
    }

    pub fn toggle_help(&mut self) {
        self.help_shown = !self.help_shown;
    }

    // =======
    // view
    // =======

    pub fn view(&self) -> SessionView {
        let task = self.task_index().map(|index| self.task_view(index));
        let feedback = match (&self.phase, &self.last_verdict) {
            (Phase::Feedback(index), Some(verdict)) => {
                Some(self.feedback_view(*index, verdict))
            }
            _ => None,
        };
        SessionView {
            phase: self.phase(),
            task_index: self.task_index(),
            task_count: self.tasks.len(),
            completed_count: self.completed_count,
            correct_count: self.correct_count,
            report_pending: self.report_pending(),
            help_shown: self.help_shown,
            task,
            feedback,
        }
    }

    fn task_view(&self, index: usize) -> TaskView {
        let task = &self.tasks[index];
        let answer = self.answer.as_ref();

        let mut rows = Vec::new();
        let mut left_labels = Vec::new();
        let mut text_entries = Vec::new();
        let mut scrambled = None;
        let mut flashcard_back = None;
        let mut slider = None;

        match (&task.content, answer) {
            (
                TaskContent::MultipleChoice(c),
                Some(AnswerState::MultipleChoice {
                    selected, options, ..
                }),
            ) => {
                rows = options
                    .apply(&c.options)
                    .into_iter()
                    .enumerate()
                    .map(|(display, label)| RowView {
                        label: label.clone(),
                        selected: *selected == Some(display),
                    })
                    .collect();
            }
            (TaskContent::TrueFalse(_), Some(AnswerState::TrueFalse { choice })) => {
                rows = vec![
                    RowView {
                        label: "True".to_string(),
                        selected: *choice == Some(true),
                    },
                    RowView {
                        label: "False".to_string(),
                        selected: *choice == Some(false),
                    },
                ];
            }
            (TaskContent::Ordering(c), Some(AnswerState::Ordering { display })) => {
                rows = display
                    .iter()
                    .enumerate()
                    .map(|(position, &canonical)| RowView {
                        label: c.items.get(canonical).cloned().unwrap_or_default(),
                        selected: self.grabbed && self.focus == position,
                    })
                    .collect();
            }
            (
                TaskContent::Matching(c),
                Some(AnswerState::Matching {
                    chosen,
                    right_order,
                }),
            ) => {
                left_labels = c.pairs.iter().map(|pair| pair.left.clone()).collect();
                let focused_choice = chosen.get(self.focus).copied().flatten();
                rows = (0..right_order.len())
                    .map(|display| RowView {
                        label: right_order
                            .canonical_at(display)
                            .and_then(|canonical| c.pairs.get(canonical))
                            .map(|pair| pair.right.clone())
                            .unwrap_or_default(),
                        selected: focused_choice.is_some()
                            && focused_choice == right_order.canonical_at(display),
                    })
                    .collect();
            }
            (
                TaskContent::MultipleSelect(c),
                Some(AnswerState::MultipleSelect { selected, .. }),
            ) => {
                rows = c
                    .options
                    .iter()
                    .enumerate()
                    .map(|(index, label)| RowView {
                        label: label.clone(),
                        selected: selected.contains(&index),
                    })
                    .collect();
            }
            (TaskContent::Slider(c), Some(AnswerState::Slider { value })) => {
                slider = Some(SliderView {
                    value: *value,
                    min: c.min,
                    max: c.max,
                    step: c.step,
                    unit: c.unit.clone(),
                });
            }
            (
                TaskContent::WordScramble(_),
                Some(AnswerState::WordScramble {
                    entry,
                    scrambled: letters,
                }),
            ) => {
                scrambled = Some(letters.clone());
                text_entries = vec![entry.clone()];
            }
            (
                TaskContent::Flashcard(c),
                Some(AnswerState::Flashcard { revealed, .. }),
            ) => {
                if *revealed {
                    flashcard_back = Some(c.back.clone());
                }
            }
            (TaskContent::TextInput(_), Some(AnswerState::TextInput { entry })) => {
                text_entries = vec![entry.clone()];
            }
            (TaskContent::ClozeDeletion(_), Some(AnswerState::ClozeDeletion { entries })) => {
                text_entries = entries.clone();
            }
            (
                TaskContent::ErrorDetection(_),
                Some(AnswerState::ErrorDetection {
                    selected,
                    segmentation,
                }),
            ) => {
                rows = segmentation
                    .segments
                    .iter()
                    .enumerate()
                    .map(|(index, segment)| RowView {
                        label: segment.text.clone(),
                        selected: selected.contains(&index),
                    })
                    .collect();
            }
            _ => {}
        }

        TaskView {
            kind: task.content.kind(),
            prompt: task.content.prompt().to_string(),
            hint: self.hint_shown.then(|| task.hint.clone()).flatten(),
            rows,
            left_labels,
            text_entries,
            scrambled,
            flashcard_back,
            slider,
            focus: self.focus,
            grabbed: self.grabbed,
            can_submit: answer.is_some_and(AnswerState::can_submit),
        }
    }

    fn feedback_view(&self, index: usize, verdict: &Verdict) -> FeedbackView {
        let content = &self.tasks[index].content;
        let corrections = match (content, &self.answer) {
            (
                TaskContent::ErrorDetection(c),
                Some(AnswerState::ErrorDetection { segmentation, .. }),
            ) => segmentation
                .segments
                .iter()
                .filter_map(|segment| segment.error_index)
                .filter_map(|error_index| c.errors.get(error_index))
                .map(|descriptor| Correction {
                    error_text: descriptor.error_text.clone(),
                    correction: descriptor.correction.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };
        FeedbackView {
            correct: verdict.correct,
            score: verdict.score,
            correct_answer: correct_answer_text(content),
            corrections,
        }
    }
}

/// Play whatever cue moment is due on `session`, if any. Aborted playback
/// re-arms the moment so the next interaction retries it; that is the whole
/// recovery story for autoplay blocks.
pub async fn play_due_cue(
    session: &RefCell<PracticeSession>,
    resolver: &dyn AudioResolver,
    sink: &dyn AudioSink,
) {
    let Some((task, moment, cap)) = ({
        let mut session = session.borrow_mut();
        let moment = session.due_cue.take();
        let cap = session.config.playback_cap;
        moment.and_then(|moment| {
            session
                .current_task()
                .cloned()
                .map(|task| (task, moment, cap))
        })
    }) else {
        return;
    };
    let outcome = CueSequencer::new(cap)
        .play(&task, moment, resolver, sink)
        .await;
    if outcome == CueOutcome::Aborted {
        session.borrow_mut().rearm_cue(moment);
    }
}

/// What the learner's displayed answer should have been, for the feedback
/// panel. Kinds whose feedback is structural (matching, error-detection)
/// return nothing here.
fn correct_answer_text(content: &TaskContent) -> Option<String> {
    match content {
        TaskContent::MultipleChoice(c) => c.options.get(c.correct_index).cloned(),
        TaskContent::ClozeDeletion(c) => Some(
            c.blanks
                .iter()
                .map(|blank| blank.answer.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        TaskContent::TrueFalse(c) => Some(if c.correct_answer { "True" } else { "False" }.to_string()),
        TaskContent::Ordering(c) => Some(
            c.correct_order
                .iter()
                .filter_map(|&canonical| c.items.get(canonical))
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        TaskContent::Matching(_) => None,
        TaskContent::MultipleSelect(c) => Some(
            c.correct_indices
                .iter()
                .filter_map(|&index| c.options.get(index))
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        TaskContent::Slider(c) => Some(match &c.unit {
            Some(unit) => format!("{} {unit}", c.correct_value),
            None => c.correct_value.to_string(),
        }),
        TaskContent::WordScramble(c) => Some(c.solution.clone()),
        TaskContent::Flashcard(c) => Some(c.back.clone()),
        TaskContent::TextInput(c) => Some(c.correct_answer.clone()),
        TaskContent::ErrorDetection(_) => None,
    }
}

// =======
// view types
// =======

#[derive(Clone, Debug, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: SessionPhase,
    pub task_index: Option<usize>,
    pub task_count: usize,
    pub completed_count: usize,
    pub correct_count: usize,
    pub report_pending: bool,
    pub help_shown: bool,
    pub task: Option<TaskView>,
    pub feedback: Option<FeedbackView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub kind: TaskKind,
    pub prompt: String,
    /// Populated only while the hint is toggled on.
    pub hint: Option<String>,
    /// The focusable rows in display order; meaning depends on `kind`.
    pub rows: Vec<RowView>,
    /// Matching only: the unshuffled left column.
    pub left_labels: Vec<String>,
    /// Cloze blanks, or the single free-text entry.
    pub text_entries: Vec<String>,
    pub scrambled: Option<String>,
    /// Present once a flashcard is revealed.
    pub flashcard_back: Option<String>,
    pub slider: Option<SliderView>,
    pub focus: usize,
    pub grabbed: bool,
    pub can_submit: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SliderView {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub correct: bool,
    /// Error-detection only.
    pub score: Option<ScoreResult>,
    pub correct_answer: Option<String>,
    /// Error-detection only: the located errors and their corrections.
    pub corrections: Vec<Correction>,
}

#[derive(Clone, Debug, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub error_text: String,
    pub correction: String,
}
