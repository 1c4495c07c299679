//! Splits error-detection content into an ordered run of labeled segments.
//!
//! The learner sees the whole text as tappable chunks: plain words become
//! one segment each, and every located error span becomes a single segment
//! carrying the index of its descriptor (so feedback can show the
//! correction). Parsing never fails; anything the parser cannot resolve is
//! reported as a [`SegmentDiagnostic`] and the rest of the text still
//! renders.

use crate::ErrorDescriptor;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    pub is_error: bool,
    /// Index into the task's error descriptor list, for error segments.
    #[serde(default)]
    pub error_index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SegmentDiagnostic {
    #[error("error span {dropped} overlaps span {kept} at byte {position} and was dropped")]
    OverlappingSpans {
        kept: usize,
        dropped: usize,
        position: usize,
    },
    #[error("declared error text {text:?} (descriptor {index}) was not found in the content")]
    UnmatchedError { index: usize, text: String },
    #[error("descriptor {index} declares position {position}, but the text there does not match")]
    PositionMismatch { index: usize, position: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    pub diagnostics: Vec<SegmentDiagnostic>,
}

impl Segmentation {
    /// Number of error descriptors actually located in the text. This is the
    /// `totalErrors` denominator for scoring, so unlocatable descriptors do
    /// not make a perfect score unreachable.
    pub fn located_errors(&self) -> usize {
        self.segments.iter().filter(|s| s.is_error).count()
    }
}

// a claimed byte range of the content text
#[derive(Clone, Copy)]
struct Claim {
    start: usize,
    end: usize,
    error_index: usize,
}

fn overlaps(a: &Claim, b: &Claim) -> bool {
    a.start < b.end && b.start < a.end
}

/// Resolve error descriptors against `text` and produce the full segment run.
///
/// Position-declared descriptors are consumed first, ascending by position,
/// and must match at exactly their declared byte offset. The rest are matched
/// by first occurrence, longest error text first so a short descriptor cannot
/// pre-empt a longer one it is a substring of. Unclaimed stretches are
/// tokenized on whitespace into plain-word segments.
pub fn parse_segments(text: &str, errors: &[ErrorDescriptor]) -> Segmentation {
    let mut diagnostics = Vec::new();
    let mut claims: Vec<Claim> = Vec::new();

    let mut positioned: Vec<(usize, usize)> = errors
        .iter()
        .enumerate()
        .filter_map(|(index, descriptor)| descriptor.position.map(|p| (p, index)))
        .collect();
    positioned.sort_unstable();

    for (position, index) in positioned {
        let descriptor = &errors[index];
        if descriptor.error_text.is_empty() {
            diagnostics.push(SegmentDiagnostic::UnmatchedError {
                index,
                text: String::new(),
            });
            continue;
        }
        // text.get(..) also rejects offsets that land inside a multi-byte char
        let matches_here = text
            .get(position..)
            .is_some_and(|rest| rest.starts_with(&descriptor.error_text));
        if !matches_here {
            diagnostics.push(SegmentDiagnostic::PositionMismatch { index, position });
            continue;
        }
        let claim = Claim {
            start: position,
            end: position + descriptor.error_text.len(),
            error_index: index,
        };
        match claims.iter().find(|existing| overlaps(existing, &claim)) {
            Some(existing) => diagnostics.push(SegmentDiagnostic::OverlappingSpans {
                kept: existing.error_index,
                dropped: index,
                position,
            }),
            None => claims.push(claim),
        }
    }

    // longest text first, declaration order breaking ties
    let mut unpositioned: Vec<usize> = errors
        .iter()
        .enumerate()
        .filter_map(|(index, descriptor)| descriptor.position.is_none().then_some(index))
        .collect();
    unpositioned.sort_by_key(|&index| (std::cmp::Reverse(errors[index].error_text.len()), index));

    for index in unpositioned {
        let descriptor = &errors[index];
        if descriptor.error_text.is_empty() {
            diagnostics.push(SegmentDiagnostic::UnmatchedError {
                index,
                text: String::new(),
            });
            continue;
        }
        let found = text
            .match_indices(&descriptor.error_text)
            .map(|(start, matched)| Claim {
                start,
                end: start + matched.len(),
                error_index: index,
            })
            .find(|candidate| !claims.iter().any(|existing| overlaps(existing, candidate)));
        match found {
            Some(claim) => claims.push(claim),
            None => diagnostics.push(SegmentDiagnostic::UnmatchedError {
                index,
                text: descriptor.error_text.clone(),
            }),
        }
    }

    claims.sort_unstable_by_key(|claim| claim.start);

    let mut segments = Vec::new();
    let mut cursor = 0;
    for claim in &claims {
        push_words(&mut segments, &text[cursor..claim.start]);
        segments.push(Segment {
            text: text[claim.start..claim.end].to_string(),
            is_error: true,
            error_index: Some(claim.error_index),
        });
        cursor = claim.end;
    }
    push_words(&mut segments, &text[cursor..]);

    Segmentation {
        segments,
        diagnostics,
    }
}

fn push_words(segments: &mut Vec<Segment>, gap: &str) {
    for word in gap.split_whitespace() {
        segments.push(Segment {
            text: word.to_string(),
            is_error: false,
            error_index: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(text: &str, position: Option<usize>) -> ErrorDescriptor {
        ErrorDescriptor {
            error_text: text.to_string(),
            correction: format!("corrected {text}"),
            position,
        }
    }

    fn texts(segmentation: &Segmentation) -> Vec<(&str, bool)> {
        segmentation
            .segments
            .iter()
            .map(|s| (s.text.as_str(), s.is_error))
            .collect()
    }

    #[test]
    fn zero_errors_tokenizes_every_word() {
        let result = parse_segments("Ich gehe zur Schule", &[]);
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            texts(&result),
            vec![
                ("Ich", false),
                ("gehe", false),
                ("zur", false),
                ("Schule", false)
            ]
        );
        assert_eq!(result.located_errors(), 0);
    }

    #[test]
    fn marks_an_error_found_by_occurrence() {
        let errors = vec![descriptor("gehe", None)];
        let result = parse_segments("Ich gehe zur Schule", &errors);
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            texts(&result),
            vec![
                ("Ich", false),
                ("gehe", true),
                ("zur", false),
                ("Schule", false)
            ]
        );
        assert_eq!(result.segments[1].error_index, Some(0));
    }

    #[test]
    fn positioned_error_picks_the_declared_occurrence() {
        // both words read "der"; the descriptor points at the second one
        let errors = vec![descriptor("der", Some(4))];
        let result = parse_segments("der der", &errors);
        assert!(result.diagnostics.is_empty());
        assert_eq!(texts(&result), vec![("der", false), ("der", true)]);
    }

    #[test]
    fn longer_error_text_is_claimed_before_its_substring() {
        let errors = vec![descriptor("zur", None), descriptor("zur Schule", None)];
        let result = parse_segments("Ich gehe zur Schule", &errors);
        assert_eq!(
            texts(&result),
            vec![("Ich", false), ("gehe", false), ("zur Schule", true)]
        );
        assert_eq!(result.segments[2].error_index, Some(1));
        // the short descriptor has nowhere left to match
        assert_eq!(
            result.diagnostics,
            vec![SegmentDiagnostic::UnmatchedError {
                index: 0,
                text: "zur".to_string()
            }]
        );
        assert_eq!(result.located_errors(), 1);
    }

    #[test]
    fn overlapping_positions_keep_the_earlier_span() {
        let errors = vec![
            descriptor("gehe zur", Some(4)),
            descriptor("zur Schule", Some(9)),
        ];
        let result = parse_segments("Ich gehe zur Schule", &errors);
        assert_eq!(
            texts(&result),
            vec![("Ich", false), ("gehe zur", true), ("Schule", false)]
        );
        assert_eq!(
            result.diagnostics,
            vec![SegmentDiagnostic::OverlappingSpans {
                kept: 0,
                dropped: 1,
                position: 9
            }]
        );
    }

    #[test]
    fn mismatched_position_is_reported_and_skipped() {
        let errors = vec![descriptor("gehe", Some(0))];
        let result = parse_segments("Ich gehe", &errors);
        assert_eq!(texts(&result), vec![("Ich", false), ("gehe", false)]);
        assert_eq!(
            result.diagnostics,
            vec![SegmentDiagnostic::PositionMismatch {
                index: 0,
                position: 0
            }]
        );
    }

    #[test]
    fn unmatched_error_still_renders_the_whole_text() {
        let errors = vec![descriptor("fliege", None)];
        let result = parse_segments("Ich gehe zur Schule", &errors);
        assert_eq!(result.segments.len(), 4);
        assert!(result.segments.iter().all(|s| !s.is_error));
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn multibyte_text_segments_cleanly() {
        let errors = vec![descriptor("niño", None)];
        let result = parse_segments("el niño pequeño", &errors);
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            texts(&result),
            vec![("el", false), ("niño", true), ("pequeño", false)]
        );
    }

    #[test]
    fn coverage_is_total_modulo_whitespace() {
        let errors = vec![descriptor("gehe zur", None), descriptor("Ich", None)];
        let result = parse_segments("Ich gehe zur Schule heute", &errors);
        let rebuilt: String = result
            .segments
            .iter()
            .map(|s| s.text.replace(char::is_whitespace, ""))
            .collect();
        let original: String = "Ich gehe zur Schule heute".replace(char::is_whitespace, "");
        assert_eq!(rebuilt, original);
    }
}
