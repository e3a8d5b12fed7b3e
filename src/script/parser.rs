use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embassy_time::Duration;

use super::lexer::{Clause, clauses};
use super::{Instruction, Pattern, PatternRun, Program, SlideDirection};
use crate::color::parse_hex;
use crate::error::{ParseError, ParseErrorKind};

const KEYWORD_LENGTH: &str = "Length";
const KEYWORD_BRIGHTNESS: &str = "Brightness";
const KEYWORD_FILL: &str = "Fill";
const KEYWORD_SLOW_FILL: &str = "SlowFill";
const KEYWORD_SLIDE: &str = "Slide";
const KEYWORD_TRIGGER: &str = "Trigger";

/// Parse a strip script into a [`Program`].
///
/// `max_length` is the pixel capacity of the strip; `Length` values above
/// it are rejected. Parsing is all-or-nothing: the first bad clause fails
/// the whole script.
pub fn parse(text: &str, max_length: usize) -> Result<Program, ParseError> {
    let instructions = clauses(text)
        .map(|clause| {
            parse_clause(&clause, max_length).map_err(|kind| ParseError::new(kind, clause.index))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Program::new(instructions))
}

fn parse_clause(clause: &Clause<'_>, max_length: usize) -> Result<Instruction, ParseErrorKind> {
    let keyword = clause.keyword();
    let args = clause.args();

    if keyword.eq_ignore_ascii_case(KEYWORD_LENGTH) {
        expect_arity(KEYWORD_LENGTH, "1", args, args.len() == 1)?;
        let length = usize::try_from(parse_int(args[0])?)
            .ok()
            .filter(|length| (1..=max_length).contains(length))
            .ok_or_else(|| out_of_range("length", args[0]))?;
        Ok(Instruction::SetLength(length))
    } else if keyword.eq_ignore_ascii_case(KEYWORD_BRIGHTNESS) {
        expect_arity(KEYWORD_BRIGHTNESS, "1", args, args.len() == 1)?;
        Ok(Instruction::SetBrightness(parse_brightness(args[0])?))
    } else if keyword.eq_ignore_ascii_case(KEYWORD_FILL) {
        expect_arity(
            KEYWORD_FILL,
            "color/count pairs",
            args,
            !args.is_empty() && args.len() % 2 == 0,
        )?;
        Ok(Instruction::Fill(parse_pattern(args)?))
    } else if keyword.eq_ignore_ascii_case(KEYWORD_SLOW_FILL) {
        expect_arity(
            KEYWORD_SLOW_FILL,
            "a delay and color/count pairs",
            args,
            args.len() >= 3 && args.len() % 2 == 1,
        )?;
        let delay = parse_float(args[0])?;
        if delay < 0.0 {
            return Err(out_of_range("slowfill delay", args[0]));
        }
        Ok(Instruction::SlowFill {
            interval: seconds(delay),
            pattern: parse_pattern(&args[1..])?,
        })
    } else if keyword.eq_ignore_ascii_case(KEYWORD_SLIDE) {
        expect_arity(KEYWORD_SLIDE, "a delay and a count", args, args.len() == 2)?;
        let delay = parse_float(args[0])?;
        if delay == 0.0 {
            return Err(out_of_range("slide delay", args[0]));
        }
        let count = u32::try_from(parse_int(args[1])?)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| out_of_range("slide count", args[1]))?;
        let direction = if delay > 0.0 {
            SlideDirection::Forward
        } else {
            SlideDirection::Backward
        };
        Ok(Instruction::Slide {
            interval: seconds(delay),
            direction,
            count,
        })
    } else if keyword.eq_ignore_ascii_case(KEYWORD_TRIGGER) {
        expect_arity(KEYWORD_TRIGGER, "no", args, args.is_empty())?;
        Ok(Instruction::Trigger)
    } else {
        Err(ParseErrorKind::UnknownKeyword(keyword.to_string()))
    }
}

/// Validate a brightness literal
fn parse_brightness(token: &str) -> Result<f32, ParseErrorKind> {
    let brightness = parse_float(token)?;
    if !(0.0..=1.0).contains(&brightness) {
        return Err(out_of_range("brightness", token));
    }
    Ok(brightness)
}

fn parse_pattern(args: &[&str]) -> Result<Pattern, ParseErrorKind> {
    let runs = args
        .chunks_exact(2)
        .map(|pair| {
            let color = parse_hex(pair[0])
                .ok_or_else(|| ParseErrorKind::InvalidColor(pair[0].to_string()))?;
            let count = parse_int(pair[1])?;
            let count = u16::try_from(count)
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| out_of_range("repeat count", pair[1]))?;
            Ok(PatternRun::new(color, count))
        })
        .collect::<Result<Vec<_>, ParseErrorKind>>()?;
    Pattern::new(runs).ok_or(ParseErrorKind::Arity {
        keyword: KEYWORD_FILL,
        expected: "color/count pairs",
        found: 0,
    })
}

fn expect_arity(
    keyword: &'static str,
    expected: &'static str,
    args: &[&str],
    ok: bool,
) -> Result<(), ParseErrorKind> {
    if ok {
        Ok(())
    } else {
        Err(ParseErrorKind::Arity {
            keyword,
            expected,
            found: args.len(),
        })
    }
}

fn parse_int(token: &str) -> Result<i64, ParseErrorKind> {
    token
        .parse::<i64>()
        .map_err(|_| ParseErrorKind::InvalidNumber(token.to_string()))
}

fn parse_float(token: &str) -> Result<f32, ParseErrorKind> {
    let value = token
        .parse::<f32>()
        .map_err(|_| ParseErrorKind::InvalidNumber(token.to_string()))?;
    if !value.is_finite() {
        return Err(out_of_range("number", token));
    }
    Ok(value)
}

fn out_of_range(what: &'static str, token: &str) -> ParseErrorKind {
    ParseErrorKind::OutOfRange {
        what,
        value: String::from(token),
    }
}

/// Convert a delay in seconds (sign ignored) to a duration
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seconds(delay: f32) -> Duration {
    Duration::from_micros(libm::roundf(delay.abs() * 1_000_000.0) as u64)
}
