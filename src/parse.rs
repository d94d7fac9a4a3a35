//! Parsing for the boundary syntaxes: movement requests and selections.
//!
//! Movement requests and selections arrive as text (command line, editor
//! key bindings) and are parsed once here into [`Goto`] and [`Span`]
//! values; nothing downstream matches on strings.
//!
//! # Movement syntax
//!
//! `GRANULARITY[:DIRECTION]` where:
//! - `GRANULARITY` is `hunk` or `file`
//! - `DIRECTION` is `first`, `last`, `next`, `prev`, or an ordinal `N`
//!   (negative ordinals clamp to the first target)
//!
//! Without a direction the request means ordinal 0.
//!
//! # Selection syntax
//!
//! - `N` - cursor at byte offset N
//! - `N..M` - selected range between offsets N and M (either order)
//!
//! # Examples
//!
//! ```
//! use git_hunks::navigate::{Direction, Goto, Granularity};
//! use git_hunks::parse::{parse_goto, parse_selection};
//! use git_hunks::text::Span;
//!
//! let goto = parse_goto("file:next").unwrap();
//! assert_eq!(goto, Goto::new(Granularity::File, Direction::Next));
//!
//! let goto = parse_goto("hunk").unwrap();
//! assert_eq!(goto, Goto::new(Granularity::Hunk, Direction::Nth(0)));
//!
//! assert_eq!(parse_selection("120").unwrap(), Span::point(120));
//! assert_eq!(parse_selection("180..120").unwrap(), Span::new(120, 180));
//! ```

use crate::navigate::{Direction, Goto, Granularity};
use crate::text::Span;
use error_set::error_set;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{self, char};
use nom::combinator::{all_consuming, map, opt, value};
use nom::sequence::{preceded, separated_pair};
use nom::{IResult, Parser};
use std::str::FromStr;

error_set! {
    /// Errors from parsing movement and selection syntax
    ParseError := {
        /// Input is not `hunk[:DIRECTION]` or `file[:DIRECTION]`
        #[display("Invalid movement '{input}': expected 'hunk|file[:first|last|next|prev|N]'")]
        InvalidGoto { input: String },
        /// Input is not `N` or `N..M`
        #[display("Invalid selection '{input}': expected 'OFFSET' or 'START..END'")]
        InvalidSelection { input: String },
    }
}

fn granularity(input: &str) -> IResult<&str, Granularity> {
    alt((
        value(Granularity::Hunk, tag("hunk")),
        value(Granularity::File, tag("file")),
    ))
    .parse(input)
}

fn direction(input: &str) -> IResult<&str, Direction> {
    alt((
        value(Direction::First, tag("first")),
        value(Direction::Last, tag("last")),
        value(Direction::Next, tag("next")),
        value(Direction::Prev, tag("prev")),
        map(complete::i64, Direction::Nth),
    ))
    .parse(input)
}

fn goto(input: &str) -> IResult<&str, Goto> {
    map(
        (granularity, opt(preceded(char(':'), direction))),
        |(granularity, direction)| Goto {
            granularity,
            direction: direction.unwrap_or_default(),
        },
    )
    .parse(input)
}

fn offset(input: &str) -> IResult<&str, usize> {
    map(complete::u64, |n| usize::try_from(n).unwrap_or(usize::MAX)).parse(input)
}

fn selection(input: &str) -> IResult<&str, Span> {
    alt((
        map(separated_pair(offset, tag(".."), offset), |(a, b)| {
            Span::new(a, b)
        }),
        map(offset, Span::point),
    ))
    .parse(input)
}

/// Parse a movement request such as `hunk:next` or `file:3`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidGoto`] for anything else.
pub fn parse_goto(input: &str) -> Result<Goto, ParseError> {
    all_consuming(goto)
        .parse(input.trim())
        .map(|(_, goto)| goto)
        .map_err(|_| ParseError::InvalidGoto {
            input: input.to_string(),
        })
}

/// Parse a selection: a cursor offset `N` or a range `N..M`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidSelection`] for anything else.
pub fn parse_selection(input: &str) -> Result<Span, ParseError> {
    all_consuming(selection)
        .parse(input.trim())
        .map(|(_, span)| span)
        .map_err(|_| ParseError::InvalidSelection {
            input: input.to_string(),
        })
}

impl FromStr for Goto {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_goto(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn parse_every_direction() {
        let cases = [
            ("hunk:first", Goto::new(Granularity::Hunk, Direction::First)),
            ("hunk:last", Goto::new(Granularity::Hunk, Direction::Last)),
            ("file:next", Goto::new(Granularity::File, Direction::Next)),
            ("file:prev", Goto::new(Granularity::File, Direction::Prev)),
            ("file:3", Goto::new(Granularity::File, Direction::Nth(3))),
            ("hunk:-2", Goto::new(Granularity::Hunk, Direction::Nth(-2))),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_goto(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn bare_granularity_means_first_ordinal() {
        assert_eq!(
            parse_goto("file").unwrap(),
            Goto::new(Granularity::File, Direction::Nth(0))
        );
    }

    #[test]
    fn goto_from_str() {
        let goto: Goto = "hunk:next".parse().unwrap();
        assert_eq!(goto, Goto::new(Granularity::Hunk, Direction::Next));
    }

    #[test]
    fn display_parses_back() {
        for input in ["hunk:first", "file:last", "hunk:next", "file:prev", "hunk:7"] {
            assert_eq!(parse_goto(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn reject_unknown_granularity() {
        assert!(matches!(
            parse_goto("line:next"),
            Err(ParseError::InvalidGoto { .. })
        ));
    }

    #[test]
    fn reject_unknown_direction() {
        assert!(matches!(
            parse_goto("hunk:sideways"),
            Err(ParseError::InvalidGoto { .. })
        ));
        assert!(matches!(
            parse_goto("hunk:"),
            Err(ParseError::InvalidGoto { .. })
        ));
    }

    #[test]
    fn reject_trailing_input() {
        assert!(parse_goto("hunk:nextx").is_err());
        assert!(parse_selection("10..20..30").is_err());
    }

    #[test]
    fn parse_cursor() {
        assert_eq!(parse_selection("42").unwrap(), Span::point(42));
        assert_eq!(parse_selection(" 42 ").unwrap(), Span::point(42));
    }

    #[test]
    fn parse_range_in_either_order() {
        assert_eq!(parse_selection("10..20").unwrap(), Span::new(10, 20));
        assert_eq!(parse_selection("20..10").unwrap(), Span::new(10, 20));
    }

    #[test]
    fn reject_bad_selection() {
        for input in ["", "..", "-3", "ten", "10.."] {
            assert!(
                matches!(parse_selection(input), Err(ParseError::InvalidSelection { .. })),
                "{input}"
            );
        }
    }
}
