//! Per-task-kind answer state.
//!
//! One [`AnswerState`] exists at a time, rebuilt from scratch at every task
//! transition. Mutation goes through the named operations below; once the
//! session enters feedback the state is treated as frozen and only read by
//! scoring and the view.

use std::collections::BTreeSet;

use task_model::{
    SegmentDiagnostic, Segmentation, SliderContent, TaskContent, parse_segments,
};

use crate::shuffle::{Permutation, Shuffler};

#[derive(Clone, Debug, PartialEq)]
pub enum AnswerState {
    MultipleChoice {
        /// Display index of the learner's pick.
        selected: Option<usize>,
        options: Permutation,
        /// Where the canonical correct option landed after shuffling. `None`
        /// when the content declares an out-of-range index; such a task can
        /// never be answered correctly but still renders.
        correct_display_index: Option<usize>,
    },
    ClozeDeletion {
        entries: Vec<String>,
    },
    TrueFalse {
        choice: Option<bool>,
    },
    Ordering {
        /// Canonical index of the item at each display position. Starts as a
        /// fresh shuffle; the learner reorders it.
        display: Vec<usize>,
    },
    Matching {
        /// Chosen canonical right index per left row.
        chosen: Vec<Option<usize>>,
        right_order: Permutation,
    },
    MultipleSelect {
        selected: BTreeSet<usize>,
        option_count: usize,
    },
    Slider {
        value: f64,
    },
    WordScramble {
        entry: String,
        /// The letters as presented, drawn once at activation.
        scrambled: String,
    },
    Flashcard {
        revealed: bool,
        /// Self-assessment: `true` means "I knew it".
        assessment: Option<bool>,
    },
    TextInput {
        entry: String,
    },
    ErrorDetection {
        selected: BTreeSet<usize>,
        segmentation: Segmentation,
    },
}

impl AnswerState {
    /// The initial shape for a freshly activated task. This is the only
    /// constructor; it draws whatever randomness the kind needs from the
    /// session's shuffler.
    pub fn for_task(content: &TaskContent, shuffler: &mut Shuffler) -> Self {
        match content {
            TaskContent::MultipleChoice(c) => {
                let options = shuffler.permutation(c.options.len());
                let correct_display_index = options.display_of(c.correct_index);
                AnswerState::MultipleChoice {
                    selected: None,
                    options,
                    correct_display_index,
                }
            }
            TaskContent::ClozeDeletion(c) => AnswerState::ClozeDeletion {
                entries: vec![String::new(); c.blanks.len()],
            },
            TaskContent::TrueFalse(_) => AnswerState::TrueFalse { choice: None },
            TaskContent::Ordering(c) => AnswerState::Ordering {
                display: shuffler.permutation(c.items.len()).display_order().to_vec(),
            },
            TaskContent::Matching(c) => AnswerState::Matching {
                chosen: vec![None; c.pairs.len()],
                right_order: shuffler.permutation(c.pairs.len()),
            },
            TaskContent::MultipleSelect(c) => AnswerState::MultipleSelect {
                selected: BTreeSet::new(),
                option_count: c.options.len(),
            },
            TaskContent::Slider(c) => AnswerState::Slider {
                value: initial_slider_value(c),
            },
            TaskContent::WordScramble(c) => AnswerState::WordScramble {
                entry: String::new(),
                scrambled: shuffler.scramble(&c.solution),
            },
            TaskContent::Flashcard(_) => AnswerState::Flashcard {
                revealed: false,
                assessment: None,
            },
            TaskContent::TextInput(_) => AnswerState::TextInput {
                entry: String::new(),
            },
            TaskContent::ErrorDetection(c) => {
                let segmentation = parse_segments(&c.text, &c.errors);
                log_diagnostics(&segmentation.diagnostics);
                AnswerState::ErrorDetection {
                    selected: BTreeSet::new(),
                    segmentation,
                }
            }
        }
    }

    /// Whether this state is complete enough to be scored. Submission is
    /// refused while this is false; an empty or partial answer must never
    /// reach the scoring engine.
    pub fn can_submit(&self) -> bool {
        match self {
            AnswerState::MultipleChoice { selected, .. } => selected.is_some(),
            AnswerState::ClozeDeletion { entries } => {
                entries.iter().all(|entry| !entry.trim().is_empty())
            }
            AnswerState::TrueFalse { choice } => choice.is_some(),
            AnswerState::Ordering { .. } => true,
            AnswerState::Matching { chosen, .. } => chosen.iter().all(Option::is_some),
            AnswerState::MultipleSelect { selected, .. } => !selected.is_empty(),
            AnswerState::Slider { .. } => true,
            AnswerState::WordScramble { entry, .. } | AnswerState::TextInput { entry } => {
                !entry.trim().is_empty()
            }
            AnswerState::Flashcard {
                revealed,
                assessment,
            } => *revealed && assessment.is_some(),
            AnswerState::ErrorDetection { .. } => true,
        }
    }

    /// Pick an option by display position (multiple-choice).
    pub fn select(&mut self, display_index: usize) {
        if let AnswerState::MultipleChoice {
            selected, options, ..
        } = self
            && display_index < options.len()
        {
            *selected = Some(display_index);
        }
    }

    /// Toggle an option or segment by index (multiple-select and
    /// error-detection, whose display order is canonical order).
    pub fn toggle(&mut self, index: usize) {
        let (selected, limit) = match self {
            AnswerState::MultipleSelect {
                selected,
                option_count,
            } => (selected, *option_count),
            AnswerState::ErrorDetection {
                selected,
                segmentation,
            } => (selected, segmentation.segments.len()),
            _ => return,
        };
        if index >= limit {
            return;
        }
        if !selected.remove(&index) {
            selected.insert(index);
        }
    }

    /// Record a boolean choice: the statement verdict for true/false, the
    /// self-assessment for a revealed flashcard.
    pub fn choose(&mut self, value: bool) {
        match self {
            AnswerState::TrueFalse { choice } => *choice = Some(value),
            AnswerState::Flashcard {
                revealed: true,
                assessment,
            } => *assessment = Some(value),
            _ => {}
        }
    }

    pub fn set_blank(&mut self, blank: usize, text: String) {
        if let AnswerState::ClozeDeletion { entries } = self
            && let Some(entry) = entries.get_mut(blank)
        {
            *entry = text;
        }
    }

    pub fn set_text(&mut self, text: String) {
        match self {
            AnswerState::WordScramble { entry, .. } | AnswerState::TextInput { entry } => {
                *entry = text;
            }
            _ => {}
        }
    }

    /// Move the item at display position `from` to `to` (ordering).
    pub fn move_item(&mut self, from: usize, to: usize) {
        if let AnswerState::Ordering { display } = self
            && from < display.len()
            && to < display.len()
        {
            let item = display.remove(from);
            display.insert(to, item);
        }
    }

    /// Pair the left row with the right-column entry at `right_display`.
    pub fn choose_match(&mut self, left: usize, right_display: usize) {
        if let AnswerState::Matching {
            chosen,
            right_order,
        } = self
            && let Some(slot) = chosen.get_mut(left)
            && let Some(canonical) = right_order.canonical_at(right_display)
        {
            *slot = Some(canonical);
        }
    }

    pub fn set_value(&mut self, new_value: f64) {
        if let AnswerState::Slider { value } = self {
            *value = new_value;
        }
    }

    pub fn reveal(&mut self) {
        if let AnswerState::Flashcard { revealed, .. } = self {
            *revealed = true;
        }
    }

    pub fn revealed(&self) -> bool {
        matches!(self, AnswerState::Flashcard { revealed: true, .. })
    }
}

/// Midpoint of the declared range, snapped to the step grid.
fn initial_slider_value(content: &SliderContent) -> f64 {
    snap_to_step((content.min + content.max) / 2.0, content)
}

pub(crate) fn snap_to_step(value: f64, content: &SliderContent) -> f64 {
    let snapped = if content.step > 0.0 {
        content.min + ((value - content.min) / content.step).round() * content.step
    } else {
        value
    };
    snapped.clamp(content.min, content.max)
}

fn log_diagnostics(diagnostics: &[SegmentDiagnostic]) {
    for diagnostic in diagnostics {
        log::warn!("error-detection content problem: {diagnostic}");
    }
}
