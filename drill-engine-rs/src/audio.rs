//! Lifecycle audio cues.
//!
//! Each task kind declares which audio fields to try at each lifecycle moment,
//! in priority order. The sequencer plays the first field that resolves to at
//! least one file, its files strictly one after another; every file is capped
//! by a safety timeout in case the backend never reports completion. Playback
//! failure (autoplay policy, missing file) aborts the attempt quietly; the
//! session re-arms the cue and it is retried on the next user interaction.

use std::time::Duration;

use futures::future::{Either, LocalBoxFuture, select};
use serde::{Deserialize, Serialize};
use task_model::{Task, TaskContent};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum CueMoment {
    OnLoad,
    OnReveal,
}

/// A content audio field the resolver knows how to gather files for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioField {
    Question,
    Answer,
    Front,
    Back,
    /// The ordering task's item files, gathered in canonical correct order.
    ItemsInOrder,
}

/// Field priority per kind and moment. Fields are tried in order; the first
/// one yielding audio wins and the rest are not played.
pub fn cue_fields(content: &TaskContent, moment: CueMoment) -> &'static [AudioField] {
    use AudioField::*;
    match (content, moment) {
        (TaskContent::Flashcard(_), CueMoment::OnLoad) => &[Front],
        (TaskContent::Flashcard(_), CueMoment::OnReveal) => &[Back],
        (TaskContent::Ordering(_), CueMoment::OnLoad) => &[Question],
        (TaskContent::Ordering(_), CueMoment::OnReveal) => &[ItemsInOrder, Question],
        (_, CueMoment::OnLoad) => &[Question],
        (_, CueMoment::OnReveal) => &[Answer, Question],
    }
}

/// Resolves a task's audio field to zero or more playable references.
pub trait AudioResolver {
    fn resolve(&self, task: &Task, field: AudioField) -> Vec<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackFailure {
    #[error("playback is blocked until a user interaction unlocks it")]
    Blocked,
    #[error("audio file {0:?} could not be played")]
    Failed(String),
}

/// The actual playback backend. `play` resolves when the file finishes
/// naturally; `timer` is the clock the safety cap races against.
pub trait AudioSink {
    fn play(&self, url: &str) -> LocalBoxFuture<'static, Result<(), PlaybackFailure>>;
    fn timer(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueOutcome {
    /// The winning field's files all ran to completion (or cap).
    Played(usize),
    /// No configured field resolved to any audio.
    Silent,
    /// Playback failed partway; the caller should re-arm the moment.
    Aborted,
}

pub struct CueSequencer {
    cap: Duration,
}

impl CueSequencer {
    pub fn new(cap: Duration) -> Self {
        Self { cap }
    }

    pub async fn play(
        &self,
        task: &Task,
        moment: CueMoment,
        resolver: &dyn AudioResolver,
        sink: &dyn AudioSink,
    ) -> CueOutcome {
        for field in cue_fields(&task.content, moment) {
            let files = resolver.resolve(task, *field);
            if files.is_empty() {
                continue;
            }
            for url in &files {
                match select(sink.play(url), sink.timer(self.cap)).await {
                    Either::Left((Ok(()), _)) => {}
                    Either::Left((Err(failure), _)) => {
                        log::warn!("audio cue for task {:?} aborted: {failure}", task.id);
                        return CueOutcome::Aborted;
                    }
                    Either::Right(((), _)) => {
                        log::debug!("audio cue {url:?} hit the playback cap, moving on");
                    }
                }
            }
            return CueOutcome::Played(files.len());
        }
        CueOutcome::Silent
    }
}

/// The default resolver over the content schema: relative references joined
/// onto a base audio path.
pub struct ContentAudioResolver {
    base_path: String,
}

impl ContentAudioResolver {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn join(&self, reference: &str) -> String {
        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            reference.trim_start_matches('/')
        )
    }
}

impl AudioResolver for ContentAudioResolver {
    fn resolve(&self, task: &Task, field: AudioField) -> Vec<String> {
        let references: Vec<&str> = match (field, &task.content) {
            (AudioField::Front, TaskContent::Flashcard(c)) => {
                c.front_audio.as_deref().into_iter().collect()
            }
            (AudioField::Back, TaskContent::Flashcard(c)) => {
                c.back_audio.as_deref().into_iter().collect()
            }
            (AudioField::ItemsInOrder, TaskContent::Ordering(c)) => c
                .correct_order
                .iter()
                .filter_map(|&canonical| c.items_audio.get(canonical))
                .map(String::as_str)
                .filter(|reference| !reference.is_empty())
                .collect(),
            (AudioField::Question, content) => {
                question_audio(content).into_iter().collect()
            }
            (AudioField::Answer, content) => answer_audio(content).into_iter().collect(),
            _ => Vec::new(),
        };
        references
            .into_iter()
            .map(|reference| self.join(reference))
            .collect()
    }
}

fn question_audio(content: &TaskContent) -> Option<&str> {
    match content {
        TaskContent::MultipleChoice(c) => c.question_audio.as_deref(),
        TaskContent::ClozeDeletion(c) => c.question_audio.as_deref(),
        TaskContent::TrueFalse(c) => c.question_audio.as_deref(),
        TaskContent::Ordering(c) => c.question_audio.as_deref(),
        TaskContent::Matching(c) => c.question_audio.as_deref(),
        TaskContent::MultipleSelect(c) => c.question_audio.as_deref(),
        TaskContent::Slider(c) => c.question_audio.as_deref(),
        TaskContent::WordScramble(c) => c.question_audio.as_deref(),
        TaskContent::Flashcard(_) => None,
        TaskContent::TextInput(c) => c.question_audio.as_deref(),
        TaskContent::ErrorDetection(c) => c.question_audio.as_deref(),
    }
}

fn answer_audio(content: &TaskContent) -> Option<&str> {
    match content {
        TaskContent::MultipleChoice(c) => c.answer_audio.as_deref(),
        TaskContent::ClozeDeletion(c) => c.answer_audio.as_deref(),
        TaskContent::TrueFalse(c) => c.answer_audio.as_deref(),
        TaskContent::MultipleSelect(c) => c.answer_audio.as_deref(),
        TaskContent::Slider(c) => c.answer_audio.as_deref(),
        TaskContent::WordScramble(c) => c.answer_audio.as_deref(),
        TaskContent::TextInput(c) => c.answer_audio.as_deref(),
        TaskContent::Ordering(_)
        | TaskContent::Matching(_)
        | TaskContent::Flashcard(_)
        | TaskContent::ErrorDetection(_) => None,
    }
}
