//! Parser for the speed template mini-language.
//!
//! ```text
//! template  := ["r"] statement+
//! statement := bars "-" tempo ["-" times] "."
//! ```
//!
//! `bars`, `tempo` and `times` are decimal digit runs. A leading `r` makes the
//! template repeat once its last statement has played. `times` plays the same
//! statement that many times in a row, so `4-100-2.` is the same as
//! `4-100.4-100.`.

use std::fmt;

/// Largest `times` a statement may carry. Statements are expanded eagerly.
pub const MAX_REPEAT_COUNT: u32 = 999;

/// Why a piece of template text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("template text is empty")]
    Empty,
    #[error("unexpected character `{ch}` at byte {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("misplaced `-` at byte {offset}")]
    MisplacedSeparator { offset: usize },
    #[error("statement {statement} has no bar count")]
    MissingBars { statement: usize },
    #[error("statement {statement} has no tempo")]
    MissingTempo { statement: usize },
    #[error("statement {statement} ends in `-` without a repeat count")]
    MissingRepeatCount { statement: usize },
    #[error("statement {statement} contains a zero value")]
    ZeroValue { statement: usize },
    #[error("number ending at byte {offset} is too large")]
    NumberOutOfRange { offset: usize },
    #[error("text after the last `.` at byte {offset}; every statement must end with `.`")]
    TrailingInput { offset: usize },
}

/// One `bars-tempo[-times]` statement as written by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    pub bars: u32,
    pub tempo: u32,
    /// How often the statement is played back to back; `1` when omitted.
    pub times: u32,
}

impl Statement {
    /// Bars covered by all repetitions of the statement.
    pub fn total_bars(&self) -> u64 {
        u64::from(self.bars) * u64::from(self.times)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.bars, self.tempo)?;
        if self.times > 1 {
            write!(f, "-{}", self.times)?;
        }
        Ok(())
    }
}

/// Output of [`parse`]: the repeat flag plus the statements in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub repeat: bool,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    Bars,
    Tempo,
    Times,
}

#[derive(Debug, Default)]
struct StatementFields {
    field: Field,
    bars: Option<u32>,
    tempo: Option<u32>,
    times: Option<u32>,
}

impl StatementFields {
    fn push_digit(&mut self, digit: u32, offset: usize) -> Result<(), ParseError> {
        let slot = match self.field {
            Field::Bars => &mut self.bars,
            Field::Tempo => &mut self.tempo,
            Field::Times => &mut self.times,
        };
        let limit = match self.field {
            Field::Times => MAX_REPEAT_COUNT,
            Field::Bars | Field::Tempo => u32::MAX,
        };
        let value = slot
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|value| value.checked_add(digit))
            .filter(|value| *value <= limit)
            .ok_or(ParseError::NumberOutOfRange { offset })?;
        *slot = Some(value);
        Ok(())
    }

    fn advance(&mut self, offset: usize) -> Result<(), ParseError> {
        self.field = match (self.field, self.bars, self.tempo) {
            (Field::Bars, Some(_), _) => Field::Tempo,
            (Field::Tempo, _, Some(_)) => Field::Times,
            _ => return Err(ParseError::MisplacedSeparator { offset }),
        };
        Ok(())
    }

    fn finish(&self, statement: usize) -> Result<Statement, ParseError> {
        let bars = self.bars.ok_or(ParseError::MissingBars { statement })?;
        let tempo = self.tempo.ok_or(ParseError::MissingTempo { statement })?;
        let times = match (self.field, self.times) {
            (Field::Times, None) => return Err(ParseError::MissingRepeatCount { statement }),
            (_, times) => times.unwrap_or(1),
        };
        if bars == 0 || tempo == 0 || times == 0 {
            return Err(ParseError::ZeroValue { statement });
        }
        Ok(Statement { bars, tempo, times })
    }
}

/// Parses template text. Nothing is produced unless the whole text is valid.
pub fn parse(text: &str) -> Result<ParsedTemplate, ParseError> {
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let statement_count = text.matches('.').count();
    let mut parsed = ParsedTemplate {
        repeat: false,
        statements: Vec::with_capacity(statement_count),
    };
    let mut fields = StatementFields::default();

    for (offset, ch) in text.char_indices() {
        if parsed.statements.len() >= statement_count {
            return Err(ParseError::TrailingInput { offset });
        }
        match ch {
            'r' if offset == 0 => parsed.repeat = true,
            '.' => {
                let statement = fields.finish(parsed.statements.len())?;
                parsed.statements.push(statement);
                fields = StatementFields::default();
            }
            '-' => fields.advance(offset)?,
            _ => match ch.to_digit(10) {
                Some(digit) => fields.push_digit(digit, offset)?,
                None => return Err(ParseError::UnexpectedChar { ch, offset }),
            },
        }
    }

    Ok(parsed)
}
