//! The JS-facing session wrapper. Collaborator calls go out through plain
//! callback functions that return Promises; audio plays through
//! `HtmlAudioElement`. Everything here adapts between the JS world and the
//! ports the engine core defines; no session logic lives in this module.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use js_sys::{Function, Promise};
use task_model::LearningPath;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::audio::{AudioSink, ContentAudioResolver, PlaybackFailure};
use crate::keyboard::{Key, KeyAction};
use crate::recording::{
    CollaboratorError, ReviewGrade, ReviewScheduler, SessionRecord, SessionRecorder,
    SessionTotals,
};
use crate::sources::{InMemoryContentSource, SessionCriteria};
use crate::{EngineConfig, PracticeSession, SessionView, play_due_cue};

fn js_error(context: &str, value: JsValue) -> CollaboratorError {
    CollaboratorError::new(format!("{context}: {value:?}"))
}

async fn await_promise(value: JsValue, context: &str) -> Result<JsValue, CollaboratorError> {
    JsFuture::from(Promise::resolve(&value))
        .await
        .map_err(|e| js_error(context, e))
}

/// Recorder over three JS callbacks, each returning a Promise.
struct JsRecorder {
    create_session: Function,
    record_answer: Function,
    complete_session: Function,
}

impl SessionRecorder for JsRecorder {
    fn create_session<'a>(
        &'a self,
        criteria: &'a SessionCriteria,
    ) -> LocalBoxFuture<'a, Result<SessionRecord, CollaboratorError>> {
        Box::pin(async move {
            let criteria = serde_wasm_bindgen::to_value(criteria)
                .map_err(|e| CollaboratorError::new(e.to_string()))?;
            let pending = self
                .create_session
                .call1(&JsValue::NULL, &criteria)
                .map_err(|e| js_error("createSession", e))?;
            let value = await_promise(pending, "createSession").await?;
            let id = value
                .as_string()
                .ok_or_else(|| CollaboratorError::new("createSession must resolve to an id"))?;
            Ok(SessionRecord { id })
        })
    }

    fn record_answer<'a>(
        &'a self,
        session: &'a SessionRecord,
        correct: bool,
        time_spent_seconds: i64,
    ) -> LocalBoxFuture<'a, Result<Option<SessionTotals>, CollaboratorError>> {
        Box::pin(async move {
            let pending = self
                .record_answer
                .call3(
                    &JsValue::NULL,
                    &JsValue::from_str(&session.id),
                    &JsValue::from_bool(correct),
                    &JsValue::from_f64(time_spent_seconds as f64),
                )
                .map_err(|e| js_error("recordAnswer", e))?;
            let value = await_promise(pending, "recordAnswer").await?;
            if value.is_null() || value.is_undefined() {
                return Ok(None);
            }
            let totals = serde_wasm_bindgen::from_value(value)
                .map_err(|e| CollaboratorError::new(e.to_string()))?;
            Ok(Some(totals))
        })
    }

    fn complete_session<'a>(
        &'a self,
        session: &'a SessionRecord,
    ) -> LocalBoxFuture<'a, Result<(), CollaboratorError>> {
        Box::pin(async move {
            let pending = self
                .complete_session
                .call1(&JsValue::NULL, &JsValue::from_str(&session.id))
                .map_err(|e| js_error("completeSession", e))?;
            await_promise(pending, "completeSession").await?;
            Ok(())
        })
    }
}

struct JsScheduler {
    schedule_review: Function,
}

impl ReviewScheduler for JsScheduler {
    fn record_answer<'a>(
        &'a self,
        task_id: &'a str,
        correct: bool,
        grade: ReviewGrade,
    ) -> LocalBoxFuture<'a, Result<(), CollaboratorError>> {
        Box::pin(async move {
            let pending = self
                .schedule_review
                .call3(
                    &JsValue::NULL,
                    &JsValue::from_str(task_id),
                    &JsValue::from_bool(correct),
                    &JsValue::from_f64(grade.value() as f64),
                )
                .map_err(|e| js_error("scheduleReview", e))?;
            await_promise(pending, "scheduleReview").await?;
            Ok(())
        })
    }
}

/// Playback through a throwaway `HtmlAudioElement` per file. A rejected
/// `play()` Promise is the browser's autoplay refusal, surfaced as `Blocked`.
struct ElementAudioSink;

impl AudioSink for ElementAudioSink {
    fn play(&self, url: &str) -> LocalBoxFuture<'static, Result<(), PlaybackFailure>> {
        let url = url.to_string();
        Box::pin(async move {
            let element = HtmlAudioElement::new_with_src(&url)
                .map_err(|_| PlaybackFailure::Failed(url.clone()))?;
            let (sender, receiver) = oneshot::channel::<()>();
            let sender = Rc::new(RefCell::new(Some(sender)));
            // one handler serves both `ended` and `error`; the taken sender
            // makes the second invocation a no-op
            let ended = {
                let sender = Rc::clone(&sender);
                Closure::<dyn FnMut()>::new(move || {
                    if let Some(sender) = sender.borrow_mut().take() {
                        let _ = sender.send(());
                    }
                })
            };
            element.set_onended(Some(ended.as_ref().unchecked_ref()));
            element.set_onerror(Some(ended.as_ref().unchecked_ref()));

            let started = element.play().map_err(|_| PlaybackFailure::Blocked)?;
            if JsFuture::from(started).await.is_err() {
                return Err(PlaybackFailure::Blocked);
            }
            if receiver.await.is_err() {
                return Err(PlaybackFailure::Failed(url));
            }
            drop(ended);
            Ok(())
        })
    }

    fn timer(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(async move {
            let promise = Promise::new(&mut |resolve, _reject| {
                if let Some(window) = web_sys::window() {
                    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        &resolve,
                        duration.as_millis() as i32,
                    );
                }
            });
            let _ = JsFuture::from(promise).await;
        })
    }
}

#[wasm_bindgen]
pub struct DrillSession {
    // we never hold a borrow across an .await; async work re-borrows after
    // each await point
    session: RefCell<PracticeSession>,
    recorder: JsRecorder,
    scheduler: JsScheduler,
    resolver: ContentAudioResolver,
    sink: ElementAudioSink,
}

#[wasm_bindgen]
impl DrillSession {
    /// Build the session over an already-parsed learning path. The four
    /// callbacks are the persistence surface: `createSession(criteria)`,
    /// `recordAnswer(sessionId, correct, timeSpentSeconds)` (may resolve to
    /// authoritative totals or null), `completeSession(sessionId)`, and
    /// `scheduleReview(taskId, correct, grade)`.
    #[wasm_bindgen(constructor)]
    pub async fn new(
        learning_path: LearningPath,
        criteria: SessionCriteria,
        audio_base_path: String,
        create_session: Function,
        record_answer: Function,
        complete_session: Function,
        schedule_review: Function,
    ) -> Result<DrillSession, String> {
        let recorder = JsRecorder {
            create_session,
            record_answer,
            complete_session,
        };
        let scheduler = JsScheduler { schedule_review };
        let source = InMemoryContentSource::new(learning_path);
        let config = EngineConfig {
            audio_base_path: audio_base_path.clone(),
            ..Default::default()
        };
        let session = PracticeSession::start(&criteria, config, &source, &recorder)
            .await
            .map_err(|e| e.to_string())?;
        Ok(DrillSession {
            session: RefCell::new(session),
            recorder,
            scheduler,
            resolver: ContentAudioResolver::new(audio_base_path),
            sink: ElementAudioSink,
        })
    }

    pub fn view(&self) -> SessionView {
        self.session.borrow().view()
    }

    /// Feed one `KeyboardEvent.key` value through the engine, then run
    /// whatever follow-up the dispatch asked for.
    pub async fn handle_key(&self, browser_key: String) -> Result<SessionView, String> {
        if let Some(key) = Key::from_browser_key(&browser_key) {
            let action = self.session.borrow_mut().handle_key(key);
            self.run_action(action).await?;
        }
        Ok(self.view())
    }

    // pointer-driven equivalents of the keyboard commands; each applies the
    // mutation and plays any cue it armed

    pub async fn select_option(&self, display_index: usize) -> SessionView {
        self.session.borrow_mut().select_option(display_index);
        self.play_cue().await;
        self.view()
    }

    pub async fn toggle_option(&self, index: usize) -> SessionView {
        self.session.borrow_mut().toggle_option(index);
        self.play_cue().await;
        self.view()
    }

    pub async fn choose_bool(&self, value: bool) -> SessionView {
        self.session.borrow_mut().choose_bool(value);
        self.play_cue().await;
        self.view()
    }

    pub fn set_text_entry(&self, text: String) -> SessionView {
        self.session.borrow_mut().set_text_entry(text);
        self.view()
    }

    pub fn set_blank_entry(&self, blank: usize, text: String) -> SessionView {
        self.session.borrow_mut().set_blank_entry(blank, text);
        self.view()
    }

    pub fn set_slider_value(&self, value: f64) -> SessionView {
        self.session.borrow_mut().set_slider_value(value);
        self.view()
    }

    pub fn move_item(&self, from: usize, to: usize) -> SessionView {
        self.session.borrow_mut().move_item(from, to);
        self.view()
    }

    pub fn choose_match(&self, left: usize, right_display: usize) -> SessionView {
        self.session.borrow_mut().choose_match(left, right_display);
        self.view()
    }

    pub async fn reveal_flashcard(&self) -> SessionView {
        self.session.borrow_mut().reveal_flashcard();
        self.play_cue().await;
        self.view()
    }

    pub async fn submit(&self) -> Result<SessionView, String> {
        let outcome = self.session.borrow_mut().submit();
        if matches!(outcome, crate::SubmitOutcome::Scored { .. }) {
            self.flush().await?;
            self.play_cue().await;
        }
        Ok(self.view())
    }

    pub async fn advance(&self) -> Result<SessionView, String> {
        self.flush().await?;
        self.session
            .borrow_mut()
            .advance()
            .map_err(|e| e.to_string())?;
        // completing the last task queues the completion call
        self.flush().await?;
        self.play_cue().await;
        Ok(self.view())
    }

    pub async fn skip(&self) -> Result<SessionView, String> {
        self.session.borrow_mut().skip().map_err(|e| e.to_string())?;
        self.flush().await?;
        self.play_cue().await;
        Ok(self.view())
    }

    pub fn cancel(&self) -> SessionView {
        self.session.borrow_mut().cancel();
        self.view()
    }

    /// Re-run the report flush after a failure; safe to call repeatedly.
    pub async fn retry_reports(&self) -> Result<SessionView, String> {
        self.flush().await?;
        Ok(self.view())
    }

    /// Play whatever cue is currently armed. Call this on the first user
    /// interaction to pick up audio that autoplay policy blocked earlier.
    pub async fn play_pending_audio(&self) -> SessionView {
        self.play_cue().await;
        self.view()
    }
}

impl DrillSession {
    async fn run_action(&self, action: KeyAction) -> Result<(), String> {
        match action {
            KeyAction::Ignored | KeyAction::Cancelled => {}
            KeyAction::Changed => self.play_cue().await,
            KeyAction::Submitted => {
                self.flush().await?;
                self.play_cue().await;
            }
            KeyAction::SubmittedAdvance => {
                self.flush().await?;
                self.session
                    .borrow_mut()
                    .advance()
                    .map_err(|e| e.to_string())?;
                self.flush().await?;
                self.play_cue().await;
            }
            KeyAction::AdvanceRequested => {
                self.flush().await?;
                self.session
                    .borrow_mut()
                    .advance()
                    .map_err(|e| e.to_string())?;
                self.flush().await?;
                self.play_cue().await;
            }
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), String> {
        PracticeSession::flush_reports(&self.session, &self.recorder, &self.scheduler)
            .await
            .map_err(|e| e.to_string())
    }

    async fn play_cue(&self) {
        play_due_cue(&self.session, &self.resolver, &self.sink).await;
    }
}
