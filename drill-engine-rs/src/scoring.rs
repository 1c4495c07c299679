//! Pure per-kind answer evaluation.
//!
//! Every kind is all-or-nothing except error-detection, which additionally
//! yields a fractional [`ScoreResult`]. Evaluation never mutates anything:
//! scoring the same snapshot twice gives the same verdict.

use serde::{Deserialize, Serialize};
use task_model::{Segmentation, TaskContent};
use unicode_normalization::UnicodeNormalization;

use crate::answers::AnswerState;

#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub correct: bool,
    /// Partial credit, error-detection only.
    pub score: Option<ScoreResult>,
}

impl Verdict {
    fn all_or_nothing(correct: bool) -> Self {
        Self {
            correct,
            score: None,
        }
    }
}

/// Hit/miss/false-positive breakdown for an error-detection answer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub hits: usize,
    pub false_positives: usize,
    pub missed_errors: usize,
    pub total_errors: usize,
    /// `(hits - falsePositives) / totalErrors`, clamped to `[0, 1]`.
    pub score: f64,
}

/// Evaluate a submitted answer against its task content.
pub fn evaluate(content: &TaskContent, answer: &AnswerState) -> Verdict {
    match (content, answer) {
        (
            TaskContent::MultipleChoice(_),
            AnswerState::MultipleChoice {
                selected,
                correct_display_index,
                ..
            },
        ) => Verdict::all_or_nothing(
            selected.is_some() && *selected == *correct_display_index,
        ),
        (TaskContent::ClozeDeletion(c), AnswerState::ClozeDeletion { entries }) => {
            let correct = entries.len() == c.blanks.len()
                && entries.iter().zip(&c.blanks).all(|(entry, blank)| {
                    answer_matches(entry, &blank.answer, &blank.alternatives, blank.case_sensitive)
                });
            Verdict::all_or_nothing(correct)
        }
        (TaskContent::TrueFalse(c), AnswerState::TrueFalse { choice }) => {
            Verdict::all_or_nothing(*choice == Some(c.correct_answer))
        }
        (TaskContent::Ordering(c), AnswerState::Ordering { display }) => {
            // the display sequence is already canonical indices, so the whole
            // answer is correct exactly when it equals the declared solution
            Verdict::all_or_nothing(*display == c.correct_order)
        }
        (TaskContent::Matching(c), AnswerState::Matching { chosen, .. }) => {
            let correct = chosen.len() == c.pairs.len()
                && chosen
                    .iter()
                    .enumerate()
                    .all(|(left, choice)| *choice == Some(left));
            Verdict::all_or_nothing(correct)
        }
        (TaskContent::MultipleSelect(c), AnswerState::MultipleSelect { selected, .. }) => {
            let correct = selected.len() == c.correct_indices.len()
                && c.correct_indices
                    .iter()
                    .all(|index| selected.contains(index));
            Verdict::all_or_nothing(correct)
        }
        (TaskContent::Slider(c), AnswerState::Slider { value }) => {
            Verdict::all_or_nothing((value - c.correct_value).abs() <= c.tolerance)
        }
        (TaskContent::WordScramble(c), AnswerState::WordScramble { entry, .. }) => {
            Verdict::all_or_nothing(answer_matches(
                entry,
                &c.solution,
                &c.alternatives,
                c.case_sensitive,
            ))
        }
        (TaskContent::Flashcard(_), AnswerState::Flashcard { assessment, .. }) => {
            // self-reported, taken as ground truth
            Verdict::all_or_nothing(*assessment == Some(true))
        }
        (TaskContent::TextInput(c), AnswerState::TextInput { entry }) => {
            Verdict::all_or_nothing(answer_matches(
                entry,
                &c.correct_answer,
                &c.alternatives,
                c.case_sensitive,
            ))
        }
        (
            TaskContent::ErrorDetection(_),
            AnswerState::ErrorDetection {
                selected,
                segmentation,
            },
        ) => {
            let score = error_detection_score(segmentation, selected.iter().copied());
            Verdict {
                correct: score.hits == score.total_errors && score.false_positives == 0,
                score: Some(score),
            }
        }
        (content, _) => {
            log::error!(
                "answer state does not match task kind {:?}; scoring as incorrect",
                content.kind()
            );
            Verdict::all_or_nothing(false)
        }
    }
}

/// Derive the hit/miss breakdown for a set of selected segment indices.
pub fn error_detection_score(
    segmentation: &Segmentation,
    selected: impl IntoIterator<Item = usize>,
) -> ScoreResult {
    let total_errors = segmentation.located_errors();
    let mut hits = 0;
    let mut false_positives = 0;
    for index in selected {
        match segmentation.segments.get(index) {
            Some(segment) if segment.is_error => hits += 1,
            Some(_) => false_positives += 1,
            // stale index from a selection that outlived its segmentation
            None => false_positives += 1,
        }
    }
    let score = if total_errors == 0 {
        if hits == 0 && false_positives == 0 { 1.0 } else { 0.0 }
    } else {
        ((hits as f64 - false_positives as f64) / total_errors as f64).clamp(0.0, 1.0)
    };
    ScoreResult {
        hits,
        false_positives,
        missed_errors: total_errors - hits,
        total_errors,
        score,
    }
}

/// Trimmed, NFC-normalized comparison against the answer or any alternative.
/// Internal whitespace stays significant.
pub(crate) fn answer_matches(
    entry: &str,
    answer: &str,
    alternatives: &[String],
    case_sensitive: bool,
) -> bool {
    let entry = normalize(entry, case_sensitive);
    std::iter::once(answer)
        .chain(alternatives.iter().map(String::as_str))
        .any(|candidate| normalize(candidate, case_sensitive) == entry)
}

fn normalize(text: &str, case_sensitive: bool) -> String {
    let normalized: String = text.trim().nfc().collect();
    if case_sensitive {
        normalized
    } else {
        normalized.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::Shuffler;
    use std::collections::BTreeSet;
    use task_model::{
        ClozeBlank, ClozeDeletionContent, ErrorDescriptor, ErrorDetectionContent, MatchPair,
        MatchingContent, MultipleChoiceContent, MultipleSelectContent, OrderingContent,
        SliderContent, TextInputContent, TrueFalseContent, parse_segments,
    };

    fn text_input(case_sensitive: bool) -> TaskContent {
        TaskContent::TextInput(TextInputContent {
            question: "Capital of Germany?".to_string(),
            correct_answer: "Berlin".to_string(),
            alternatives: vec![],
            case_sensitive,
            question_audio: None,
            answer_audio: None,
        })
    }

    fn entry(text: &str) -> AnswerState {
        AnswerState::TextInput {
            entry: text.to_string(),
        }
    }

    #[test]
    fn case_insensitive_text_accepts_any_casing_and_outer_whitespace() {
        let content = text_input(false);
        for submission in ["Berlin", "berlin", "BERLIN", "  Berlin  "] {
            assert!(
                evaluate(&content, &entry(submission)).correct,
                "{submission:?} should match"
            );
        }
        assert!(!evaluate(&content, &entry("Ber lin")).correct);
    }

    #[test]
    fn case_sensitive_text_rejects_the_wrong_casing() {
        let content = text_input(true);
        assert!(evaluate(&content, &entry("Berlin")).correct);
        assert!(!evaluate(&content, &entry("berlin")).correct);
    }

    #[test]
    fn alternatives_count_as_correct() {
        let content = TaskContent::TextInput(TextInputContent {
            question: "?".to_string(),
            correct_answer: "Streichholz".to_string(),
            alternatives: vec!["Zündholz".to_string()],
            case_sensitive: false,
            question_audio: None,
            answer_audio: None,
        });
        assert!(evaluate(&content, &entry("zündholz")).correct);
    }

    #[test]
    fn composed_and_decomposed_accents_compare_equal() {
        let content = TaskContent::TextInput(TextInputContent {
            question: "?".to_string(),
            correct_answer: "ni\u{00f1}o".to_string(),
            alternatives: vec![],
            case_sensitive: false,
            question_audio: None,
            answer_audio: None,
        });
        assert!(evaluate(&content, &entry("nin\u{0303}o")).correct);
    }

    #[test]
    fn multiple_choice_compares_display_indices() {
        let content = TaskContent::MultipleChoice(MultipleChoiceContent {
            question: "?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_index: 1,
            question_audio: None,
            answer_audio: None,
        });
        let mut shuffler = Shuffler::seeded(5);
        let mut answer = AnswerState::for_task(&content, &mut shuffler);
        let AnswerState::MultipleChoice {
            correct_display_index,
            ..
        } = &answer
        else {
            panic!("wrong answer shape");
        };
        let correct_display = correct_display_index.unwrap();

        assert!(!evaluate(&content, &answer).correct);
        answer.select((correct_display + 1) % 3);
        assert!(!evaluate(&content, &answer).correct);
        answer.select(correct_display);
        assert!(evaluate(&content, &answer).correct);
    }

    #[test]
    fn true_false_needs_the_declared_answer() {
        let content = TaskContent::TrueFalse(TrueFalseContent {
            statement: "Berlin is the capital of Germany.".to_string(),
            correct_answer: true,
            question_audio: None,
            answer_audio: None,
        });
        assert!(evaluate(&content, &AnswerState::TrueFalse { choice: Some(true) }).correct);
        assert!(!evaluate(&content, &AnswerState::TrueFalse { choice: Some(false) }).correct);
        assert!(!evaluate(&content, &AnswerState::TrueFalse { choice: None }).correct);
    }

    #[test]
    fn ordering_requires_the_exact_canonical_sequence() {
        let content = TaskContent::Ordering(OrderingContent {
            question: "Build the sentence".to_string(),
            items: vec!["gehe".into(), "Ich".into(), "Schule".into(), "zur".into()],
            correct_order: vec![1, 0, 3, 2],
            question_audio: None,
            items_audio: vec![],
        });
        assert!(
            evaluate(
                &content,
                &AnswerState::Ordering {
                    display: vec![1, 0, 3, 2]
                }
            )
            .correct
        );
        // one transposition fails the whole task
        assert!(
            !evaluate(
                &content,
                &AnswerState::Ordering {
                    display: vec![1, 0, 2, 3]
                }
            )
            .correct
        );
    }

    #[test]
    fn matching_is_all_or_nothing() {
        let content = TaskContent::Matching(MatchingContent {
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
        });
        let right_order = crate::shuffle::Permutation::identity(2);
        assert!(
            evaluate(
                &content,
                &AnswerState::Matching {
                    chosen: vec![Some(0), Some(1)],
                    right_order: right_order.clone(),
                }
            )
            .correct
        );
        assert!(
            !evaluate(
                &content,
                &AnswerState::Matching {
                    chosen: vec![Some(1), Some(0)],
                    right_order,
                }
            )
            .correct
        );
    }

    #[test]
    fn multiple_select_rejects_subsets_and_supersets() {
        let content = TaskContent::MultipleSelect(MultipleSelectContent {
            question: "Pick the nouns".to_string(),
            options: vec!["Hund".into(), "schnell".into(), "Katze".into(), "laut".into()],
            correct_indices: vec![0, 2],
            question_audio: None,
            answer_audio: None,
        });
        let answer = |indices: &[usize]| AnswerState::MultipleSelect {
            selected: indices.iter().copied().collect(),
            option_count: 4,
        };
        assert!(evaluate(&content, &answer(&[0, 2])).correct);
        assert!(!evaluate(&content, &answer(&[0])).correct);
        assert!(!evaluate(&content, &answer(&[0, 1, 2])).correct);
        assert!(!evaluate(&content, &answer(&[1, 3])).correct);
    }

    #[test]
    fn slider_tolerance_is_an_absolute_band() {
        let mut content = SliderContent {
            question: "?".to_string(),
            min: 0.0,
            max: 100.0,
            step: 1.0,
            correct_value: 50.0,
            tolerance: 2.0,
            unit: None,
            question_audio: None,
            answer_audio: None,
        };
        let answer = AnswerState::Slider { value: 48.0 };
        assert!(evaluate(&TaskContent::Slider(content.clone()), &answer).correct);
        content.tolerance = 1.0;
        assert!(!evaluate(&TaskContent::Slider(content), &answer).correct);
    }

    fn detection_content(errors: Vec<ErrorDescriptor>) -> TaskContent {
        TaskContent::ErrorDetection(ErrorDetectionContent {
            question: "Find the mistakes".to_string(),
            text: "Ich gehen zur Schule".to_string(),
            errors,
            question_audio: None,
        })
    }

    fn detection_answer(content: &TaskContent, selected: &[usize]) -> AnswerState {
        let TaskContent::ErrorDetection(c) = content else {
            panic!("wrong content");
        };
        AnswerState::ErrorDetection {
            selected: selected.iter().copied().collect(),
            segmentation: parse_segments(&c.text, &c.errors),
        }
    }

    #[test]
    fn error_detection_full_credit_needs_the_exact_error_set() {
        let content = detection_content(vec![ErrorDescriptor {
            error_text: "gehen".to_string(),
            correction: "gehe".to_string(),
            position: None,
        }]);
        // segment 1 is the error
        let verdict = evaluate(&content, &detection_answer(&content, &[1]));
        assert!(verdict.correct);
        let score = verdict.score.unwrap();
        assert_eq!(score.hits, 1);
        assert_eq!(score.false_positives, 0);
        assert_eq!(score.missed_errors, 0);
        assert_eq!(score.score, 1.0);

        let verdict = evaluate(&content, &detection_answer(&content, &[1, 2]));
        assert!(!verdict.correct);
        let score = verdict.score.unwrap();
        assert_eq!(score.hits, 1);
        assert_eq!(score.false_positives, 1);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn error_detection_score_stays_within_bounds() {
        let content = detection_content(vec![
            ErrorDescriptor {
                error_text: "gehen".to_string(),
                correction: "gehe".to_string(),
                position: None,
            },
            ErrorDescriptor {
                error_text: "zur".to_string(),
                correction: "in die".to_string(),
                position: None,
            },
        ]);
        let selections: &[&[usize]] = &[&[], &[0], &[1], &[1, 2], &[0, 1, 2, 3], &[3]];
        for selected in selections {
            let verdict = evaluate(&content, &detection_answer(&content, selected));
            let score = verdict.score.unwrap();
            assert!((0.0..=1.0).contains(&score.score), "score {}", score.score);
            assert_eq!(
                verdict.correct,
                score.hits == score.total_errors && score.false_positives == 0
            );
        }
    }

    #[test]
    fn zero_error_content_scores_one_only_when_nothing_is_selected() {
        let content = detection_content(vec![]);
        let verdict = evaluate(&content, &detection_answer(&content, &[]));
        assert!(verdict.correct);
        assert_eq!(verdict.score.unwrap().score, 1.0);

        let verdict = evaluate(&content, &detection_answer(&content, &[0]));
        assert!(!verdict.correct);
        assert_eq!(verdict.score.unwrap().score, 0.0);
    }

    #[test]
    fn evaluation_is_idempotent_on_a_snapshot() {
        let content = TaskContent::ClozeDeletion(ClozeDeletionContent {
            question: "Ich ___ zur Schule".to_string(),
            blanks: vec![ClozeBlank {
                answer: "gehe".into(),
                alternatives: vec!["laufe".into()],
                case_sensitive: false,
            }],
            question_audio: None,
            answer_audio: None,
        });
        let answer = AnswerState::ClozeDeletion {
            entries: vec!["Laufe".to_string()],
        };
        let first = evaluate(&content, &answer);
        let second = evaluate(&content, &answer);
        assert!(first.correct);
        assert_eq!(first, second);
    }

    #[test]
    fn mismatched_answer_shape_scores_incorrect() {
        let content = text_input(false);
        let verdict = evaluate(&content, &AnswerState::TrueFalse { choice: Some(true) });
        assert!(!verdict.correct);
    }

    #[test]
    fn stale_selection_indices_count_as_false_positives() {
        let segmentation = parse_segments("Ich gehe", &[]);
        let score = error_detection_score(&segmentation, BTreeSet::from([9]));
        assert_eq!(score.false_positives, 1);
        assert_eq!(score.score, 0.0);
    }
}
