//! Parsing of individual header lines: `@@` hunk markers and file paths.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{self, char};
use nom::combinator::{map, opt, rest};
use nom::sequence::preceded;
use nom::{IResult, Parser};
use std::fmt;

/// One side of a hunk marker: `start[,count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    /// Number of lines; git omits it when it is 1.
    pub count: u32,
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count {
            1 => write!(f, "{}", self.start),
            n => write!(f, "{},{}", self.start, n),
        }
    }
}

/// A parsed `@@ -a,b +c,d @@ context` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkHeader {
    pub old: LineRange,
    pub new: LineRange,
    /// Section heading git prints after the closing `@@`, if any.
    pub context: String,
}

impl HunkHeader {
    /// Parse a hunk marker line. Returns `None` for anything else,
    /// including combined-diff `@@@` markers.
    pub fn parse(line: &str) -> Option<Self> {
        hunk_header(line).ok().map(|(_, header)| header)
    }
}

impl fmt::Display for HunkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@@ -{} +{} @@", self.old, self.new)?;
        if !self.context.is_empty() {
            write!(f, " {}", self.context)?;
        }
        Ok(())
    }
}

fn line_range(input: &str) -> IResult<&str, LineRange> {
    map(
        (complete::u32, opt(preceded(char(','), complete::u32))),
        |(start, count)| LineRange {
            start,
            count: count.unwrap_or(1),
        },
    )
    .parse(input)
}

fn hunk_header(input: &str) -> IResult<&str, HunkHeader> {
    map(
        (
            tag("@@ -"),
            line_range,
            tag(" +"),
            line_range,
            tag(" @@"),
            rest,
        ),
        |(_, old, _, new, _, context): (_, _, _, _, _, &str)| HunkHeader {
            old,
            new,
            context: context.trim().to_string(),
        },
    )
    .parse(input)
}

/// Path named by one file header line, if the line names one.
///
/// Recognises `+++ b/path`, `--- a/path` and `rename to path`; `/dev/null`
/// sides name nothing.
pub fn header_line_path(line: &str) -> Option<&str> {
    let parsed: IResult<&str, &str> = alt((
        preceded(tag("+++ b/"), rest),
        preceded(tag("--- a/"), rest),
        preceded(tag("rename to "), rest),
    ))
    .parse(line);

    parsed
        .ok()
        .map(|(_, path)| path.trim_end())
        .filter(|path| !path.is_empty())
}

/// Path from a `diff --git a/X b/Y` line: the `b/` side.
pub fn git_line_path(line: &str) -> Option<&str> {
    let names = line.strip_prefix("diff --git ")?;
    names
        .rfind(" b/")
        .map(|idx| names[idx + 3..].trim_end())
        .filter(|path| !path.is_empty())
}
