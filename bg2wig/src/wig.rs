use std::io::{BufRead, Write};

use anyhow::Context;

pub const DEFAULT_TRACK_NAME: &str = "converted_from_bedgraph";

// Number of skipped lines kept in the summary; the rest are only counted
const MAX_SKIPPED_KEPT: usize = 20;

/// bedGraph interval.  Coordinates are 0-based, half open.
/// The value is kept as the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<'a> {
    pub chrom: &'a str,
    pub start: i64,
    pub end: i64,
    pub value: &'a str,
}

/// Data line without exactly 4 fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub fields: usize,
}

/// Totals from a conversion.  Only the first few skipped lines are kept.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub intervals: usize,
    pub positions: u64,
    pub declarations: usize,
    pub n_skipped: usize,
    pub skipped: Vec<SkippedLine>,
}

impl Summary {
    fn add_skipped(&mut self, s: SkippedLine) {
        self.n_skipped += 1;
        if self.skipped.len() < MAX_SKIPPED_KEPT {
            self.skipped.push(s)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    // Comment, track or browser line
    Metadata,
    Blank,
    Data(Interval<'a>),
    // Wrong number of fields
    Malformed(usize),
}

/// Classify a raw input line.  The metadata prefixes are checked before trimming.
/// A line with 4 fields where start or end is not an integer is an error.
pub fn parse_line(s: &str) -> anyhow::Result<Line<'_>> {
    if s.starts_with('#') || s.starts_with("track") || s.starts_with("browser") {
        return Ok(Line::Metadata);
    }
    let fields: Vec<_> = s.split_whitespace().collect();
    Ok(match fields.len() {
        0 => Line::Blank,
        4 => {
            let start = fields[1]
                .parse::<i64>()
                .with_context(|| format!("Error reading start position '{}'", fields[1]))?;
            let end = fields[2]
                .parse::<i64>()
                .with_context(|| format!("Error reading end position '{}'", fields[2]))?;
            Line::Data(Interval {
                chrom: fields[0],
                start,
                end,
                value: fields[3],
            })
        }
        n => Line::Malformed(n),
    })
}

/// Strategy
///
/// Write the track line, then read the bedGraph line by line.  Whenever the contig
/// differs from that of the previous interval a new variableStep line is written
/// (so a contig split into several runs gets several declarations).  Each interval
/// [start, end) is written out as one line per base using 1-based positions
/// start+1..=end.  Nothing is held in memory beyond the current line.
pub fn expand<R: BufRead, W: Write>(
    rdr: &mut R,
    wrt: &mut W,
    track_name: &str,
) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    let mut current: Option<String> = None;
    let mut buf = String::new();
    let mut line = 0;

    writeln!(wrt, "track type=wiggle_0 name=\"{}\"", track_name)?;

    loop {
        buf.clear();
        if rdr
            .read_line(&mut buf)
            .with_context(|| format!("Error after reading {} lines", line))?
            == 0
        {
            break;
        }
        line += 1;
        match parse_line(&buf).with_context(|| format!("Parse error at line {}", line))? {
            Line::Metadata | Line::Blank => (),
            Line::Malformed(fields) => {
                warn!("Skipping line {}: expected 4 fields, found {}", line, fields);
                summary.add_skipped(SkippedLine { line, fields })
            }
            Line::Data(iv) => {
                if current.as_deref() != Some(iv.chrom) {
                    writeln!(wrt, "variableStep chrom={} span=1", iv.chrom)?;
                    current = Some(iv.chrom.to_owned());
                    summary.declarations += 1;
                }
                for x in iv.start..iv.end {
                    writeln!(wrt, "{} {}", x + 1, iv.value)?
                }
                summary.intervals += 1;
                summary.positions += iv.end.saturating_sub(iv.start).max(0) as u64;
            }
        }
    }
    Ok(summary)
}
