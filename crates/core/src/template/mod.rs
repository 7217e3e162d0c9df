//! Speed templates: named scripts of `(bars, tempo)` segments.

mod parser;
mod playback;

use std::fmt;

pub use parser::{parse, ParseError, ParsedTemplate, Statement, MAX_REPEAT_COUNT};
pub use playback::{BarOutcome, TemplatePlayback};

/// A run of `bars` bars played at `tempo` beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSegment {
    pub bars: u32,
    pub tempo: u32,
}

/// Parsed speed template.
///
/// Only [`SpeedTemplate::parse`] builds one, so the segment list is never
/// empty and [`SpeedTemplate::source`] always re-parses to the same segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTemplate {
    name: String,
    repeat: bool,
    statements: Vec<Statement>,
    segments: Vec<TemplateSegment>,
    source: String,
}

impl SpeedTemplate {
    /// Parses `text` and keeps it verbatim for re-display and editing.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, ParseError> {
        let ParsedTemplate { repeat, statements } = parse(text)?;
        let segments = statements
            .iter()
            .flat_map(|statement| {
                let segment = TemplateSegment {
                    bars: statement.bars,
                    tempo: statement.tempo,
                };
                std::iter::repeat(segment).take(statement.times as usize)
            })
            .collect();

        Ok(Self {
            name: name.into(),
            repeat,
            statements,
            segments,
            source: text.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repeats(&self) -> bool {
        self.repeat
    }

    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    /// Statements as written, before `times` expansion.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The text this template was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Bars played by one pass over all segments.
    pub fn total_bars(&self) -> u64 {
        self.segments.iter().map(|segment| u64::from(segment.bars)).sum()
    }

    /// Index of the statement that produced segment `segment`.
    ///
    /// Indices past the last segment map to the final statement.
    pub fn statement_for_segment(&self, segment: usize) -> usize {
        let mut covered = 0;
        for (index, statement) in self.statements.iter().enumerate() {
            covered += statement.times as usize;
            if segment < covered {
                return index;
            }
        }
        self.statements.len().saturating_sub(1)
    }
}

impl fmt::Display for SpeedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(bars: u32, tempo: u32) -> TemplateSegment {
        TemplateSegment { bars, tempo }
    }

    #[test]
    fn oversized_repeat_count_is_rejected_before_expansion() {
        let template = SpeedTemplate::parse("long", "1-100-999.").unwrap();
        assert_eq!(template.segments().len(), 999);
        assert!(matches!(
            SpeedTemplate::parse("huge", "1-1-4294967295."),
            Err(ParseError::NumberOutOfRange { .. })
        ));
    }

    #[test]
    fn expands_times_into_segments() {
        let template = SpeedTemplate::parse("warmup", "r4-100-2.8-140.").unwrap();
        assert!(template.repeats());
        assert_eq!(
            template.segments(),
            &[segment(4, 100), segment(4, 100), segment(8, 140)]
        );
        assert_eq!(template.statements().len(), 2);
        assert_eq!(template.total_bars(), 16);
    }

    #[test]
    fn source_round_trips() {
        for text in ["8-120.", "r4-100-2.8-140.", "1-60.2-70.3-80-4."] {
            let template = SpeedTemplate::parse("t", text).unwrap();
            assert_eq!(template.to_string(), text);

            let reparsed = SpeedTemplate::parse("t", template.source()).unwrap();
            assert_eq!(reparsed.segments(), template.segments());
            assert_eq!(reparsed.repeats(), template.repeats());
        }
    }

    #[test]
    fn failed_parse_builds_nothing() {
        assert!(SpeedTemplate::parse("broken", "8-100-0-1.").is_err());
        assert!(SpeedTemplate::parse("broken", "").is_err());
    }

    #[test]
    fn maps_segments_back_to_statements() {
        let template = SpeedTemplate::parse("t", "2-100-2.3-140.").unwrap();
        assert_eq!(template.segments().len(), 3);
        assert_eq!(template.statement_for_segment(0), 0);
        assert_eq!(template.statement_for_segment(1), 0);
        assert_eq!(template.statement_for_segment(2), 1);
        assert_eq!(template.statement_for_segment(9), 1);
    }
}
