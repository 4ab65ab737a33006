#[macro_use]
extern crate anyhow;

use std::{ffi::OsString, fmt, io::BufRead, str::FromStr};

use clap::{error::ErrorKind, ArgMatches, Command};

/// LogLevel
///
/// Represents minimum level of messages that will be logged
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel {
    pub level: usize,
}

impl FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel { level: 0 }),
            "warn" => Ok(LogLevel { level: 1 }),
            "info" => Ok(LogLevel { level: 2 }),
            "debug" => Ok(LogLevel { level: 3 }),
            "trace" => Ok(LogLevel { level: 4 }),
            "none" => Ok(LogLevel { level: 5 }),
            _ => Err("no match"),
        }
    }
}

impl LogLevel {
    pub fn is_none(&self) -> bool {
        self.level > 4
    }
    pub fn get_level(&self) -> usize {
        if self.level > 4 {
            0
        } else {
            self.level
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level_str = ["error", "warn", "info", "debug", "trace", "none"];
        if self.level < 6 {
            write!(f, "{}", level_str[self.level])
        } else {
            write!(f, "unknown")
        }
    }
}

/// Initialize logging from command line arguments
pub fn init_log(m: &ArgMatches) -> anyhow::Result<()> {
    let verbose = m
        .get_one::<LogLevel>("loglevel")
        .copied()
        .unwrap_or(LogLevel { level: 1 });
    let quiet = verbose.is_none() || m.get_flag("quiet");
    let ts = m
        .get_one::<stderrlog::Timestamp>("timestamp")
        .copied()
        .unwrap_or(stderrlog::Timestamp::Off);

    stderrlog::new()
        .quiet(quiet)
        .verbosity(verbose.get_level())
        .timestamp(ts)
        .init()
        .map_err(|e| anyhow!("Could not initialize logging: {}", e))
}

/// Parse command line arguments.
///
/// Help and version requests are handled as usual by clap.  Any other
/// parse failure (missing or surplus arguments, bad option values) prints the
/// error kind to stderr and the usage line to stdout, and exits with status 1.
pub fn get_matches_or_usage<I, T>(mut cmd: Command, args: I) -> ArgMatches
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match cmd.try_get_matches_from_mut(args) {
        Ok(m) => m,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            k => usage_exit(&mut cmd, &k.to_string()),
        },
    }
}

/// Report a usage error: message to stderr, usage line to stdout, exit status 1.
/// Used for errors that clap can not detect itself.
pub fn usage_exit(cmd: &mut Command, msg: &str) -> ! {
    eprintln!("error: {}", msg);
    println!("{}", cmd.render_usage());
    std::process::exit(1)
}

/// Read in next line and split on tabs after trimming white space
pub fn get_next_line<'a, R: BufRead>(
    rdr: &mut R,
    buf: &'a mut String,
) -> anyhow::Result<Option<Vec<&'a str>>> {
    buf.clear();
    if rdr.read_line(buf)? == 0 {
        Ok(None)
    } else {
        Ok(Some(buf.trim().split('\t').collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parsing_is_case_insensitive() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel { level: 1 }));
        assert_eq!("Trace".parse::<LogLevel>(), Ok(LogLevel { level: 4 }));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn log_level_none_maps_to_quiet() {
        let l: LogLevel = "none".parse().unwrap();
        assert!(l.is_none());
        assert_eq!(l.get_level(), 0);
        assert_eq!(l.to_string(), "none");
    }

    #[test]
    fn next_line_splits_on_tabs() {
        let mut rdr = "a\tb c\t3\n\nlast".as_bytes();
        let mut buf = String::new();

        let f = get_next_line(&mut rdr, &mut buf).unwrap().unwrap();
        assert_eq!(f, vec!["a", "b c", "3"]);

        let f = get_next_line(&mut rdr, &mut buf).unwrap().unwrap();
        assert_eq!(f, vec![""]);

        let f = get_next_line(&mut rdr, &mut buf).unwrap().unwrap();
        assert_eq!(f, vec!["last"]);

        assert!(get_next_line(&mut rdr, &mut buf).unwrap().is_none());
    }
}
