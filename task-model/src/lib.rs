//! The content vocabulary shared between the drill engine and the frontend.
//!
//! A learning path is a JSON document with a `tasks` array; every task is a
//! `{ "type": ..., "content": {...} }` record with one of eleven task kinds.
//! These types are read-only to the engine: answer state lives in
//! `drill-engine-rs`, not here.

pub mod segments;

use serde::{Deserialize, Serialize};

pub use segments::{Segment, SegmentDiagnostic, Segmentation, parse_segments};

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Ord, PartialOrd, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::German => "de",
            Language::French => "fr",
        };
        write!(f, "{code}")
    }
}

/// One unit of drillable content. `hint` is optional and uniform across all
/// task kinds; everything kind-specific lives in [`TaskContent`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub content: TaskContent,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum TaskContent {
    MultipleChoice(MultipleChoiceContent),
    ClozeDeletion(ClozeDeletionContent),
    TrueFalse(TrueFalseContent),
    Ordering(OrderingContent),
    Matching(MatchingContent),
    MultipleSelect(MultipleSelectContent),
    Slider(SliderContent),
    WordScramble(WordScrambleContent),
    Flashcard(FlashcardContent),
    TextInput(TextInputContent),
    ErrorDetection(ErrorDetectionContent),
}

/// The bare discriminant of [`TaskContent`], for dispatch tables and views.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Ord, PartialOrd, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    MultipleChoice,
    ClozeDeletion,
    TrueFalse,
    Ordering,
    Matching,
    MultipleSelect,
    Slider,
    WordScramble,
    Flashcard,
    TextInput,
    ErrorDetection,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceContent {
    pub question: String,
    pub options: Vec<String>,
    /// Canonical index into `options`; display order is shuffled by the engine.
    pub correct_index: usize,
    #[serde(default)]
    pub question_audio: Option<String>,
    #[serde(default)]
    pub answer_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ClozeDeletionContent {
    /// Display text; the frontend renders one gap per entry in `blanks`, in
    /// reading order.
    pub question: String,
    pub blanks: Vec<ClozeBlank>,
    #[serde(default)]
    pub question_audio: Option<String>,
    #[serde(default)]
    pub answer_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ClozeBlank {
    pub answer: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseContent {
    pub statement: String,
    pub correct_answer: bool,
    #[serde(default)]
    pub question_audio: Option<String>,
    #[serde(default)]
    pub answer_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct OrderingContent {
    pub question: String,
    /// Items in canonical order (the order they were authored in, not the
    /// solution order).
    pub items: Vec<String>,
    /// `correct_order[p]` is the canonical index of the item that belongs at
    /// position `p` in the solution.
    pub correct_order: Vec<usize>,
    #[serde(default)]
    pub question_audio: Option<String>,
    /// Co-indexed with `items`. May be shorter than `items` when trailing
    /// items have no audio.
    #[serde(default)]
    pub items_audio: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct MatchingContent {
    pub question: String,
    /// Pairs are canonically co-indexed: `pairs[i].left` matches
    /// `pairs[i].right`. Only the right column is shuffled for display.
    pub pairs: Vec<MatchPair>,
    #[serde(default)]
    pub question_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct MultipleSelectContent {
    pub question: String,
    pub options: Vec<String>,
    pub correct_indices: Vec<usize>,
    #[serde(default)]
    pub question_audio: Option<String>,
    #[serde(default)]
    pub answer_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SliderContent {
    pub question: String,
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    pub correct_value: f64,
    /// Accepted absolute deviation from `correct_value`. Zero means exact.
    #[serde(default)]
    pub tolerance: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub question_audio: Option<String>,
    #[serde(default)]
    pub answer_audio: Option<String>,
}

fn default_step() -> f64 {
    1.0
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WordScrambleContent {
    pub question: String,
    pub solution: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub question_audio: Option<String>,
    #[serde(default)]
    pub answer_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardContent {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub front_language: Option<Language>,
    #[serde(default)]
    pub back_language: Option<Language>,
    #[serde(default)]
    pub front_audio: Option<String>,
    #[serde(default)]
    pub back_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct TextInputContent {
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub question_audio: Option<String>,
    #[serde(default)]
    pub answer_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetectionContent {
    pub question: String,
    /// The flat text the learner hunts through. Segmentation happens at task
    /// activation, see [`segments::parse_segments`].
    pub text: String,
    pub errors: Vec<ErrorDescriptor>,
    #[serde(default)]
    pub question_audio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub error_text: String,
    pub correction: String,
    /// Byte offset into the content text. When present, the error must match
    /// at exactly this offset; when absent, the first occurrence wins.
    #[serde(default)]
    pub position: Option<usize>,
}

impl TaskContent {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskContent::MultipleChoice(_) => TaskKind::MultipleChoice,
            TaskContent::ClozeDeletion(_) => TaskKind::ClozeDeletion,
            TaskContent::TrueFalse(_) => TaskKind::TrueFalse,
            TaskContent::Ordering(_) => TaskKind::Ordering,
            TaskContent::Matching(_) => TaskKind::Matching,
            TaskContent::MultipleSelect(_) => TaskKind::MultipleSelect,
            TaskContent::Slider(_) => TaskKind::Slider,
            TaskContent::WordScramble(_) => TaskKind::WordScramble,
            TaskContent::Flashcard(_) => TaskKind::Flashcard,
            TaskContent::TextInput(_) => TaskKind::TextInput,
            TaskContent::ErrorDetection(_) => TaskKind::ErrorDetection,
        }
    }

    /// The text shown above the answering surface.
    pub fn prompt(&self) -> &str {
        match self {
            TaskContent::MultipleChoice(c) => &c.question,
            TaskContent::ClozeDeletion(c) => &c.question,
            TaskContent::TrueFalse(c) => &c.statement,
            TaskContent::Ordering(c) => &c.question,
            TaskContent::Matching(c) => &c.question,
            TaskContent::MultipleSelect(c) => &c.question,
            TaskContent::Slider(c) => &c.question,
            TaskContent::WordScramble(c) => &c.question,
            TaskContent::Flashcard(c) => &c.front,
            TaskContent::TextInput(c) => &c.question,
            TaskContent::ErrorDetection(c) => &c.question,
        }
    }

    /// Author-error checks. Issues degrade behavior (a task that can never be
    /// answered correctly still renders and can be skipped), so they are
    /// warnings for the log and the session view, not hard failures.
    pub fn validate(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();
        match self {
            TaskContent::MultipleChoice(c) => {
                if c.options.is_empty() {
                    issues.push(ContentIssue::NoOptions);
                } else if c.correct_index >= c.options.len() {
                    issues.push(ContentIssue::IndexOutOfRange {
                        index: c.correct_index,
                        len: c.options.len(),
                    });
                }
            }
            TaskContent::ClozeDeletion(c) => {
                if c.blanks.is_empty() {
                    issues.push(ContentIssue::NoBlanks);
                }
            }
            TaskContent::TrueFalse(_) => {}
            TaskContent::Ordering(c) => {
                if c.items.is_empty() {
                    issues.push(ContentIssue::NoOptions);
                } else if !is_permutation(&c.correct_order, c.items.len()) {
                    issues.push(ContentIssue::NotAPermutation {
                        len: c.items.len(),
                    });
                }
            }
            TaskContent::Matching(c) => {
                if c.pairs.is_empty() {
                    issues.push(ContentIssue::NoOptions);
                }
            }
            TaskContent::MultipleSelect(c) => {
                if c.options.is_empty() {
                    issues.push(ContentIssue::NoOptions);
                }
                for &index in &c.correct_indices {
                    if index >= c.options.len() {
                        issues.push(ContentIssue::IndexOutOfRange {
                            index,
                            len: c.options.len(),
                        });
                    }
                }
            }
            TaskContent::Slider(c) => {
                if c.min > c.max || c.step <= 0.0 || c.tolerance < 0.0 {
                    issues.push(ContentIssue::BadSliderRange {
                        min: c.min,
                        max: c.max,
                    });
                }
            }
            TaskContent::WordScramble(c) => {
                if c.solution.trim().is_empty() {
                    issues.push(ContentIssue::EmptyAnswer);
                }
            }
            TaskContent::Flashcard(_) => {}
            TaskContent::TextInput(c) => {
                if c.correct_answer.trim().is_empty() {
                    issues.push(ContentIssue::EmptyAnswer);
                }
            }
            TaskContent::ErrorDetection(c) => {
                let segmentation = parse_segments(&c.text, &c.errors);
                issues.extend(
                    segmentation
                        .diagnostics
                        .into_iter()
                        .map(ContentIssue::Segmentation),
                );
            }
        }
        issues
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}

/// A single authoring problem found in task content.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ContentIssue {
    #[error("declared answer index {index} is out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("correctOrder is not a permutation of 0..{len}")]
    NotAPermutation { len: usize },
    #[error("task declares no options")]
    NoOptions,
    #[error("cloze task declares no blanks")]
    NoBlanks,
    #[error("slider range {min}..{max} is unusable")]
    BadSliderRange { min: f64, max: f64 },
    #[error("correct answer is empty")]
    EmptyAnswer,
    #[error(transparent)]
    Segmentation(SegmentDiagnostic),
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("learning path is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The document the content repository serves tasks from.
#[derive(Clone, Debug, Default, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub language: Option<Language>,
    pub tasks: Vec<Task>,
}

impl LearningPath {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_learning_path_json() {
        let json = r#"{
            "title": "Saludos",
            "language": "es",
            "tasks": [
                {
                    "id": "greet-1",
                    "type": "flashcard",
                    "content": {
                        "front": "hola",
                        "back": "hello",
                        "frontLanguage": "es",
                        "backLanguage": "en",
                        "frontAudio": "spanish/hola.mp3"
                    }
                },
                {
                    "id": "greet-2",
                    "type": "multiple-choice",
                    "hint": "Think about the time of day.",
                    "content": {
                        "question": "How do you greet someone in the morning?",
                        "options": ["buenos días", "buenas noches", "hasta luego"],
                        "correctIndex": 0,
                        "questionAudio": "spanish/buenos-dias.mp3"
                    }
                }
            ]
        }"#;

        let path = LearningPath::from_json(json).unwrap();
        assert_eq!(path.title, "Saludos");
        assert_eq!(path.language, Some(Language::Spanish));
        assert_eq!(path.tasks.len(), 2);

        assert_eq!(path.tasks[0].content.kind(), TaskKind::Flashcard);
        let TaskContent::Flashcard(card) = &path.tasks[0].content else {
            panic!("expected a flashcard");
        };
        assert_eq!(card.front, "hola");
        assert_eq!(card.front_audio.as_deref(), Some("spanish/hola.mp3"));
        assert_eq!(card.back_audio, None);

        assert_eq!(path.tasks[1].hint.as_deref(), Some("Think about the time of day."));
        assert_eq!(path.tasks[1].content.prompt(), "How do you greet someone in the morning?");
    }

    #[test]
    fn task_serialization_keeps_the_type_tag_flat() {
        let task = Task {
            id: "tf-1".to_string(),
            hint: None,
            content: TaskContent::TrueFalse(TrueFalseContent {
                statement: "Berlin is the capital of Germany.".to_string(),
                correct_answer: true,
                question_audio: None,
                answer_audio: None,
            }),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "true-false");
        assert_eq!(value["content"]["statement"], "Berlin is the capital of Germany.");
        assert_eq!(value["content"]["correctAnswer"], true);

        let back: Task = serde_json::from_value(value).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn validate_flags_out_of_range_answer_index() {
        let content = TaskContent::MultipleChoice(MultipleChoiceContent {
            question: "?".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_index: 5,
            question_audio: None,
            answer_audio: None,
        });
        let issues = content.validate();
        assert_eq!(issues, vec![ContentIssue::IndexOutOfRange { index: 5, len: 2 }]);
    }

    #[test]
    fn validate_flags_broken_ordering() {
        let content = TaskContent::Ordering(OrderingContent {
            question: "Order the words".to_string(),
            items: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_order: vec![0, 0, 2],
            question_audio: None,
            items_audio: Vec::new(),
        });
        assert_eq!(content.validate(), vec![ContentIssue::NotAPermutation { len: 3 }]);

        let fine = TaskContent::Ordering(OrderingContent {
            question: "Order the words".to_string(),
            items: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_order: vec![2, 0, 1],
            question_audio: None,
            items_audio: Vec::new(),
        });
        assert!(fine.validate().is_empty());
    }

    #[test]
    fn validate_accepts_defaulted_fields() {
        let json = r#"{
            "id": "s-1",
            "type": "slider",
            "content": { "question": "Pick", "min": 0.0, "max": 10.0, "correctValue": 5.0 }
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        let TaskContent::Slider(slider) = &task.content else {
            panic!("expected a slider");
        };
        assert_eq!(slider.step, 1.0);
        assert_eq!(slider.tolerance, 0.0);
        assert!(task.content.validate().is_empty());
    }
}
