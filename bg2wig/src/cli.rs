use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};

use utils::{get_matches_or_usage, init_log, LogLevel};

use crate::{config::*, wig::DEFAULT_TRACK_NAME};

/// Set up definition of command options for clap
fn cli_model() -> Command {
    Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .author(crate_authors!())
        .arg(
            Arg::new("timestamp")
                .short('X')
                .long("timestamp")
                .value_parser(value_parser!(stderrlog::Timestamp))
                .value_name("GRANULARITY")
                .default_value("none")
                .help("Prepend log entries with a timestamp"),
        )
        .arg(
            Arg::new("loglevel")
                .short('l')
                .long("loglevel")
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .ignore_case(true)
                .default_value("warn")
                .help("Set log level"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .long("quiet")
                .conflicts_with("loglevel")
                .help("Silence all output"),
        )
        .arg(
            Arg::new("track_name")
                .short('n')
                .long("track-name")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .default_value(DEFAULT_TRACK_NAME)
                .help("Set name written on the track line"),
        )
        .arg(
            Arg::new("input")
                .value_parser(value_parser!(PathBuf))
                .value_name("INPUT")
                .required(true)
                .help("Input bedGraph file"),
        )
        .arg(
            Arg::new("output")
                .value_parser(value_parser!(PathBuf))
                .value_name("OUTPUT")
                .required(true)
                .help("Output Wiggle file"),
        )
}

fn make_config(m: &ArgMatches) -> Config {
    let input = m
        .get_one::<PathBuf>("input")
        .expect("Missing input file")
        .to_owned();
    let output = m
        .get_one::<PathBuf>("output")
        .expect("Missing output file")
        .to_owned();
    let mut cfg = Config::new(input, output);
    if let Some(s) = m.get_one::<String>("track_name") {
        cfg.set_track_name(s.clone())
    }
    cfg
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = get_matches_or_usage(cli_model(), std::env::args_os());

    // Setup logging
    init_log(&m)?;

    debug!("Processing command line options");

    Ok(make_config(&m))
}
