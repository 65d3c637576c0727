//! Scoring helpers shared by the detectors.
//!
//! - [`Staircase`]: score grows with the number of signals up to a ceiling
//! - [`proximity_boost`]: co-located hits raise each other's score
//! - [`co_occurrence`]: a positive match needs a negative match nearby
//! - [`capped`]: keep at most N per-occurrence evidence detections

use layered_markers::{Detection, Span};
use regex::Regex;

/// `min(ceiling, base + step * min(cap, count - offset))`
///
/// `count - offset` saturates at zero; `cap = None` leaves the step count
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Staircase {
    pub base: f64,
    pub step: f64,
    pub offset: usize,
    pub cap: Option<usize>,
    pub ceiling: f64,
}

impl Staircase {
    pub const fn new(base: f64, step: f64, ceiling: f64) -> Self {
        Staircase {
            base,
            step,
            offset: 0,
            cap: None,
            ceiling,
        }
    }

    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub const fn cap(mut self, cap: usize) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn score(&self, count: usize) -> f64 {
        let mut steps = count.saturating_sub(self.offset);
        if let Some(cap) = self.cap {
            steps = steps.min(cap);
        }
        (self.base + self.step * steps as f64).min(self.ceiling)
    }
}

/// Raise the score of every spanned detection that has spanned neighbours
/// starting within `radius` characters of its own start.
///
/// A detection with `n >= 1` neighbours ends up with at least
/// `floor + min(bonus_cap, bonus * n)`. Span-less detections are neither
/// boosted nor counted as neighbours.
pub fn proximity_boost(
    detections: &mut [Detection],
    radius: usize,
    floor: f64,
    bonus: f64,
    bonus_cap: f64,
) {
    let starts: Vec<Option<usize>> = detections
        .iter()
        .map(|d| d.span.map(|span| span.start))
        .collect();

    for (i, detection) in detections.iter_mut().enumerate() {
        let Some(own) = starts[i] else {
            continue;
        };
        let close = starts
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && other.map_or(false, |s| s.abs_diff(own) <= radius))
            .count();
        if close >= 1 {
            let boosted = floor + (bonus * close as f64).min(bonus_cap);
            detection.score = detection.score.max(boosted).clamp(0.0, 1.0);
        }
    }
}

/// For each match of `positive`, search `negative` in the character window
/// `[start - radius, start + radius)` around the positive start.
///
/// The first negative match in the window yields one detection spanning both
/// matches, with evidence `"<positive> … <negative>"`.
pub fn co_occurrence(
    text: &str,
    positive: &Regex,
    negative: &Regex,
    radius: usize,
    label: &str,
    score: f64,
) -> Vec<Detection> {
    let total_chars = text.chars().count();
    let mut detections = Vec::new();

    for pos in positive.find_iter(text) {
        let start_char = text[..pos.start()].chars().count();
        let window_start = byte_offset(text, start_char.saturating_sub(radius));
        let window_end = byte_offset(text, (start_char + radius).min(total_chars));

        if let Some(neg) = negative.find(&text[window_start..window_end]) {
            let neg_start = window_start + neg.start();
            let neg_end = window_start + neg.end();
            let pos_span = Span::from_byte_range(text, pos.start(), pos.end());
            let neg_span = Span::from_byte_range(text, neg_start, neg_end);
            detections.push(Detection::new(
                Some(pos_span.cover(&neg_span)),
                label,
                score,
                format!("{} … {}", pos.as_str(), &text[neg_start..neg_end]),
            ));
        }
    }

    detections
}

/// First `max` detections, each scored `score`.
pub fn capped<I>(detections: I, max: usize, score: f64) -> impl Iterator<Item = Detection>
where
    I: IntoIterator<Item = Detection>,
{
    detections
        .into_iter()
        .take(max)
        .map(move |detection| detection.with_score(score))
}

/// Byte offset of the `char_idx`-th character, or the text length past the end.
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_markers::Span;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_staircase() {
        let stairs = Staircase::new(0.7, 0.05, 0.95).offset(2).cap(5);
        assert!(close(stairs.score(2), 0.7));
        assert!(close(stairs.score(3), 0.75));
        assert!(close(stairs.score(7), 0.95));
        assert!(close(stairs.score(50), 0.95));
        // saturating below the offset
        assert!(close(stairs.score(0), 0.7));
    }

    #[test]
    fn test_staircase_ceiling_without_cap() {
        let stairs = Staircase::new(0.7, 0.05, 0.8).offset(2);
        assert!(close(stairs.score(4), 0.8));
        assert!(close(stairs.score(40), 0.8));
    }

    #[test]
    fn test_proximity_boost() {
        let mut detections = vec![
            Detection::new(Some(Span::new(0, 4)), "SEM_X", 0.4, "a"),
            Detection::new(Some(Span::new(50, 54)), "SEM_X", 0.4, "b"),
            Detection::new(Some(Span::new(200, 204)), "SEM_X", 0.4, "c"),
            Detection::new(None, "SEM_X", 0.4, "summary"),
        ];
        proximity_boost(&mut detections, 80, 0.7, 0.05, 0.25);

        assert!(close(detections[0].score, 0.75));
        assert!(close(detections[1].score, 0.75));
        assert!(close(detections[2].score, 0.4));
        assert!(close(detections[3].score, 0.4));
    }

    #[test]
    fn test_proximity_bonus_is_capped() {
        let mut detections: Vec<_> = (0..8)
            .map(|i| Detection::new(Some(Span::new(i, i + 1)), "SEM_X", 0.4, "x"))
            .collect();
        proximity_boost(&mut detections, 80, 0.7, 0.05, 0.25);
        assert!(detections.iter().all(|d| close(d.score, 0.95)));
    }

    #[test]
    fn test_co_occurrence_window() {
        let positive = Regex::new("(?i)perfekt").unwrap();
        let negative = Regex::new("(?i)absurd").unwrap();

        let found = co_occurrence("so perfekt und so absurd", &positive, &negative, 120, "SEM_X", 0.85);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Some(Span::new(3, 24)));
        assert_eq!(found[0].evidence, "perfekt … absurd");

        let far = format!("perfekt{}absurd", " ".repeat(130));
        assert!(co_occurrence(&far, &positive, &negative, 120, "SEM_X", 0.85).is_empty());
    }

    #[test]
    fn test_co_occurrence_negative_before_positive() {
        let positive = Regex::new("(?i)perfekt").unwrap();
        let negative = Regex::new("(?i)hasse").unwrap();

        let found = co_occurrence("ich hasse es, du bist perfekt", &positive, &negative, 120, "SEM_X", 0.85);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Some(Span::new(4, 29)));
    }

    #[test]
    fn test_capped() {
        let detections = (0..6).map(|i| Detection::new(Some(Span::new(i, i + 1)), "ATO_X", 0.9, "x"));
        let kept: Vec<_> = capped(detections, 4, 0.5).collect();
        assert_eq!(kept.len(), 4);
        assert!(kept.iter().all(|d| close(d.score, 0.5)));
    }
}
