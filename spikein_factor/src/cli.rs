use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};

use anyhow::Context;
use regex::Regex;

use utils::{get_matches_or_usage, init_log, usage_exit, LogLevel};

use crate::{
    config::*,
    formula::{Direction, Formula},
    sample::{read_path_list_from_file, PathClassifier},
};

const DEFAULT_MARKER: &str = "/dmel/";

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
            Arg::new("reference_marker")
                .short('m')
                .long("reference-marker")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .help("Input paths containing this string are from the reference genome [default: /dmel/]"),
        )
        .arg(
            Arg::new("reference_regex")
                .short('r')
                .long("reference-regex")
                .value_parser(value_parser!(String))
                .value_name("REGEX")
                .conflicts_with("reference_marker")
                .help("Input paths matching this regular expression are from the reference genome"),
        )
        .arg(
            Arg::new("suffix")
                .short('s')
                .long("suffix")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .default_value(".bam")
                .help("Suffix removed from file names to get sample names"),
        )
        .arg(
            Arg::new("formula")
                .short('f')
                .long("formula")
                .value_parser(["ratio", "percent"])
                .ignore_case(true)
                .value_name("FORMULA")
                .default_value("ratio")
                .help("Normalization formula"),
        )
        .arg(
            Arg::new("direction")
                .short('D')
                .long("direction")
                .value_parser(value_parser!(Direction))
                .value_name("DIRECTION")
                .default_value("reference-over-primary")
                .help("Direction of ratio (reference-over-primary or primary-over-reference)"),
        )
        .arg(
            Arg::new("primary_label")
                .short('p')
                .long("primary-label")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .default_value("scer")
                .help("Label for primary genome column"),
        )
        .arg(
            Arg::new("reference_label")
                .short('R')
                .long("reference-label")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .default_value("dmel")
                .help("Label for reference genome column"),
        )
        .arg(
            Arg::new("samtools")
                .short('S')
                .long("samtools")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value("samtools")
                .help("Set samtools executable used for counting reads"),
        )
        .arg(
            Arg::new("bam_list")
                .short('b')
                .long("bam-list")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("File with list of input alignment files (added after those on the command line)"),
        )
        .arg(
            Arg::new("output")
                .value_parser(value_parser!(PathBuf))
                .value_name("OUTPUT_CSV")
                .required(true)
                .help("Output CSV file"),
        )
        .arg(
            Arg::new("bams")
                .value_parser(value_parser!(PathBuf))
                .value_name("BAM")
                .num_args(1..)
                .action(ArgAction::Append)
                .required_unless_present("bam_list")
                .help("Input alignment files for primary and reference genomes"),
        )
}

fn make_classifier(m: &ArgMatches) -> anyhow::Result<PathClassifier> {
    if let Some(s) = m.get_one::<String>("reference_regex") {
        let r = Regex::new(s).with_context(|| format!("Invalid regular expression {}", s))?;
        Ok(PathClassifier::Pattern(r))
    } else {
        let s = m
            .get_one::<String>("reference_marker")
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_MARKER);
        if s.is_empty() {
            Err(anyhow!("Reference marker can not be empty"))
        } else {
            Ok(PathClassifier::Marker(s.to_owned()))
        }
    }
}

/// Input files from the command line followed by those from the list file (if given)
fn collect_input_paths(m: &ArgMatches) -> anyhow::Result<Vec<PathBuf>> {
    let mut input_paths: Vec<PathBuf> = m
        .get_many::<PathBuf>("bams")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    if let Some(p) = m.get_one::<PathBuf>("bam_list") {
        let mut v = read_path_list_from_file(p)
            .with_context(|| "Could not read from alignment file list")?;
        input_paths.append(&mut v)
    }
    Ok(input_paths)
}

fn make_config(m: &ArgMatches, input_paths: Vec<PathBuf>) -> anyhow::Result<Config> {
    let formula = match m
        .get_one::<String>("formula")
        .expect("Missing default formula")
        .to_lowercase()
        .as_str()
    {
        "percent" => Formula::Percent,
        _ => Formula::Ratio(
            *m.get_one::<Direction>("direction")
                .expect("Missing default direction"),
        ),
    };

    let classifier = make_classifier(m)?;

    debug!("Number of input files: {}", input_paths.len());

    let output = m
        .get_one::<PathBuf>("output")
        .expect("Missing output file")
        .to_owned();

    let mut cfg = Config::new(output, input_paths, classifier, formula);
    cfg.set_suffix(
        m.get_one::<String>("suffix")
            .expect("Missing default suffix")
            .clone(),
    );
    cfg.set_labels(
        m.get_one::<String>("primary_label")
            .expect("Missing default primary label")
            .clone(),
        m.get_one::<String>("reference_label")
            .expect("Missing default reference label")
            .clone(),
    );
    cfg.set_samtools(
        m.get_one::<PathBuf>("samtools")
            .expect("Missing default samtools")
            .to_owned(),
    );
    Ok(cfg)
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = get_matches_or_usage(cli_model(), std::env::args_os());

    // Setup logging
    init_log(&m)?;

    debug!("Processing command line options");

    let input_paths = collect_input_paths(&m)?;
    if input_paths.is_empty() {
        usage_exit(&mut cli_model(), "no input alignment files")
    }

    make_config(&m, input_paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::GenomeRole;

    fn config_from(args: &[&str]) -> anyhow::Result<Config> {
        let m = cli_model().try_get_matches_from(args)?;
        let input_paths = collect_input_paths(&m)?;
        make_config(&m, input_paths)
    }

    #[test]
    fn defaults() {
        let args = ["spikein_factor", "out.csv", "scer/A.bam", "dmel/A.bam"];
        let cfg = config_from(&args).unwrap();
        assert_eq!(cfg.output_file(), PathBuf::from("out.csv"));
        assert_eq!(cfg.input_paths().len(), 2);
        assert_eq!(cfg.formula(), Formula::Ratio(Direction::ReferenceOverPrimary));
        assert_eq!(cfg.suffix(), ".bam");
        assert_eq!(cfg.primary_label(), "scer");
        assert_eq!(cfg.reference_label(), "dmel");
        assert_eq!(cfg.samtools(), PathBuf::from("samtools"));
        assert_eq!(
            cfg.classifier().classify("x/dmel/A.bam"),
            GenomeRole::Reference
        );
    }

    #[test]
    fn formula_and_direction_options() {
        let cfg = config_from(&["spikein_factor", "-f", "percent", "out.csv", "a.bam"]).unwrap();
        assert_eq!(cfg.formula(), Formula::Percent);

        let cfg = config_from(&[
            "spikein_factor",
            "--direction",
            "primary-over-reference",
            "out.csv",
            "a.bam",
        ])
        .unwrap();
        assert_eq!(cfg.formula(), Formula::Ratio(Direction::PrimaryOverReference));
    }

    #[test]
    fn regex_classifier() {
        let args = ["spikein_factor", "-r", "spike", "out.csv", "a_spike.bam"];
        let cfg = config_from(&args).unwrap();
        assert_eq!(
            cfg.classifier().classify("a_spike.bam"),
            GenomeRole::Reference
        );
        assert!(config_from(&["spikein_factor", "-r", "(", "out.csv", "a.bam"]).is_err());
    }

    #[test]
    fn argument_count_errors() {
        assert!(cli_model().try_get_matches_from(["spikein_factor"]).is_err());
        assert!(cli_model()
            .try_get_matches_from(["spikein_factor", "out.csv"])
            .is_err());
        assert!(cli_model()
            .try_get_matches_from(["spikein_factor", "-m", "/x/", "-r", "y", "out.csv", "a.bam"])
            .is_err());
    }

    #[test]
    fn bam_list_appended_after_positional_files() {
        let dir = std::env::temp_dir();
        let full = dir.join(format!("spikein_factor_list_{}.txt", std::process::id()));
        let empty = dir.join(format!("spikein_factor_empty_{}.txt", std::process::id()));
        std::fs::write(&full, "dmel/A.bam\n\nscer/B.bam\n").unwrap();
        std::fs::write(&empty, "\n").unwrap();

        let m = cli_model()
            .try_get_matches_from([
                "spikein_factor",
                "-b",
                full.to_str().unwrap(),
                "out.csv",
                "scer/A.bam",
            ])
            .unwrap();
        assert_eq!(
            collect_input_paths(&m).unwrap(),
            vec![
                PathBuf::from("scer/A.bam"),
                PathBuf::from("dmel/A.bam"),
                PathBuf::from("scer/B.bam"),
            ]
        );

        // An empty list and no positional files leaves nothing to process,
        // which handle_cli reports as a usage error
        let m = cli_model()
            .try_get_matches_from(["spikein_factor", "-b", empty.to_str().unwrap(), "out.csv"])
            .unwrap();
        assert!(collect_input_paths(&m).unwrap().is_empty());

        let _ = std::fs::remove_file(&full);
        let _ = std::fs::remove_file(&empty);
    }
}
