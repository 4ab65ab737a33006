use std::{fmt, str::FromStr};

/// Mapped read counts for the two files of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadCounts {
    pub primary: u64,
    pub reference: u64,
}

/// Which count goes on top for the ratio formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ReferenceOverPrimary,
    PrimaryOverReference,
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference-over-primary" => Ok(Self::ReferenceOverPrimary),
            "primary-over-reference" => Ok(Self::PrimaryOverReference),
            _ => Err("no match"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ReferenceOverPrimary => write!(f, "reference-over-primary"),
            Self::PrimaryOverReference => write!(f, "primary-over-reference"),
        }
    }
}

/// Normalization formula
///
/// Ratio - single factor, the ratio of the two counts
/// Percent - reference reads as a percentage of all reads, plus its inverse
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
    Ratio(Direction),
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Factors {
    Ratio(f64),
    Percent { raw: f64, scale: f64 },
}

/// Zero denominators give a neutral factor of 1
fn guarded_div(n: f64, d: f64) -> f64 {
    if d > 0.0 {
        n / d
    } else {
        1.0
    }
}

impl Formula {
    pub fn apply(&self, c: ReadCounts) -> Factors {
        let (p, r) = (c.primary as f64, c.reference as f64);
        match self {
            Self::Ratio(Direction::ReferenceOverPrimary) => Factors::Ratio(guarded_div(r, p)),
            Self::Ratio(Direction::PrimaryOverReference) => Factors::Ratio(guarded_div(p, r)),
            Self::Percent => {
                let raw = guarded_div(100.0 * r, p + r);
                Factors::Percent {
                    raw,
                    scale: guarded_div(1.0, raw),
                }
            }
        }
    }

    /// Column header line (without newline) for the output table
    pub fn header(&self, primary_label: &str, reference_label: &str) -> String {
        match self {
            Self::Ratio(_) => format!(
                "sample,{}_reads,{}_reads,spikein_factor",
                primary_label, reference_label
            ),
            Self::Percent => format!(
                "sample,{}_reads,spikein_reads,spikein_factor,inverse_spikein_factor",
                primary_label
            ),
        }
    }
}

/// Shortest representation that round trips, always with a decimal point
/// (1.0, 0.25, 0.3333333333333333).  Exponents are signed and have at least
/// two digits (5e-06, 1e+16)
pub fn format_float(x: f64) -> String {
    let s = format!("{:?}", x);
    match s.split_once('e') {
        Some((m, e)) => {
            let (sign, digits) = match e.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', e),
            };
            format!("{}e{}{:0>2}", m, sign, digits)
        }
        None => s,
    }
}

impl fmt::Display for Factors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ratio(x) => write!(f, "{}", format_float(*x)),
            Self::Percent { raw, scale } => {
                write!(f, "{},{}", format_float(*raw), format_float(*scale))
            }
        }
    }
}
