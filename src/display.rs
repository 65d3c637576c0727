//! Text rendering of a message with its detections underlined.
//!
//! ```text
//! du lügst und manipulierst
//! ╰───────────────────────╯ATO_DIRECT_ACCUSATION 0.60
//! · ATO_EMO_HIGH_VALENCE_MARKER 0.40 "signals=1"
//! ```
//!
//! Spanned detections are drawn under their characters (display columns are
//! measured with `unicode-width`); span-less summary detections follow with a
//! leading `·`.

use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::{Detection, Span};

pub struct DetectionDisplay<'a> {
    text: &'a str,
    detections: Vec<&'a Detection>,
}

impl<'a> DetectionDisplay<'a> {
    pub fn new(text: &'a str) -> Self {
        DetectionDisplay {
            text,
            detections: Vec::new(),
        }
    }

    pub fn include(&mut self, detection: &'a Detection) {
        self.detections.push(detection);
    }

    /// Takes self
    pub fn with_all(mut self, detections: &'a [Detection]) -> Self {
        self.detections.extend(detections.iter());
        self
    }

    /// Display column at which character `char_idx` starts.
    fn column_of(&self, char_idx: usize) -> usize {
        let byte_idx = self
            .text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len());
        UnicodeWidthStr::width(&self.text[..byte_idx])
    }

    fn write_underline(&self, f: &mut fmt::Formatter<'_>, span: Span) -> fmt::Result {
        let start_col = self.column_of(span.start);
        let end_col = self.column_of(span.end);

        for _ in 0..start_col {
            f.write_char(' ')?;
        }
        f.write_char('╰')?;
        for _ in (start_col + 1)..end_col.saturating_sub(1) {
            f.write_char('─')?;
        }
        if end_col.saturating_sub(start_col) > 1 {
            f.write_char('╯')?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for DetectionDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)?;

        for detection in self.detections.iter().filter(|d| d.span.is_some()) {
            f.write_char('\n')?;
            if let Some(span) = detection.span {
                self.write_underline(f, span)?;
            }
            write!(f, "{} {:.2}", detection.label, detection.score)?;
        }

        for detection in self.detections.iter().filter(|d| d.span.is_none()) {
            write!(
                f,
                "\n· {} {:.2} {:?}",
                detection.label, detection.score, detection.evidence
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underline_counts_characters_not_bytes() {
        let text = "du lügst und manipulierst";
        let detections = vec![
            Detection::new(Some(Span::new(3, 8)), "ATO_X", 0.6, "lügst"),
            Detection::summary("ATO_Y", 0.4, "signals=1"),
        ];
        let display = DetectionDisplay::new(text).with_all(&detections);

        insta::assert_snapshot!(display, @r###"
        du lügst und manipulierst
           ╰───╯ATO_X 0.60
        · ATO_Y 0.40 "signals=1"
        "###);
    }

    #[test]
    fn test_single_char_span() {
        let text = "k ok";
        let detections = vec![Detection::new(Some(Span::new(0, 1)), "ATO_SLANG_TOKEN", 0.4, "k")];
        let display = DetectionDisplay::new(text).with_all(&detections);

        assert_eq!(display.to_string(), "k ok\n╰ATO_SLANG_TOKEN 0.40");
    }
}
