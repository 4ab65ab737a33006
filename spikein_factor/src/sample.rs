use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;
use regex::Regex;
use utils::get_next_line;

/// Which genome an alignment file was mapped against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenomeRole {
    Primary,
    Reference,
}

impl fmt::Display for GenomeRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// Decides the genome role of an input path from its textual form.
/// Anything not recognized as a reference file is taken to be primary.
#[derive(Debug)]
pub enum PathClassifier {
    // Path contains this substring (i.e., "/dmel/")
    Marker(String),
    // Path matches this regular expression
    Pattern(Regex),
}

impl PathClassifier {
    pub fn classify<P: AsRef<Path>>(&self, p: P) -> GenomeRole {
        let s = p.as_ref().to_string_lossy();
        let is_ref = match self {
            Self::Marker(m) => s.contains(m.as_str()),
            Self::Pattern(r) => r.is_match(&s),
        };
        if is_ref {
            GenomeRole::Reference
        } else {
            GenomeRole::Primary
        }
    }
}

/// Sample name is the last '/' separated component of the path with
/// suffix removed if present
pub fn sample_name<P: AsRef<Path>>(p: P, suffix: &str) -> String {
    let s = p.as_ref().to_string_lossy();
    let base = s.rsplit('/').next().unwrap_or_default();
    base.strip_suffix(suffix).unwrap_or(base).to_owned()
}

/// Input sample
///
/// name - sample name derived from the file names
/// primary - alignment file for the primary genome
/// reference - alignment file for the reference (spike-in) genome
///
#[derive(Debug, Default)]
pub struct Sample {
    name: String,
    primary: Option<PathBuf>,
    reference: Option<PathBuf>,
}

impl Sample {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set path for role, returning the previous path if there was one
    pub fn set_path(&mut self, role: GenomeRole, p: PathBuf) -> Option<PathBuf> {
        match role {
            GenomeRole::Primary => self.primary.replace(p),
            GenomeRole::Reference => self.reference.replace(p),
        }
    }
}

/// A sample with alignment files for both genomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub name: String,
    pub primary: PathBuf,
    pub reference: PathBuf,
}

/// A sample missing the file for one of the genomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteSample {
    pub name: String,
    pub missing: GenomeRole,
}

/// Group input paths by sample name.  If the same sample name occurs twice for the
/// same genome, the later path replaces the earlier one.
pub fn match_samples<P: AsRef<Path>>(
    paths: &[P],
    classifier: &PathClassifier,
    suffix: &str,
) -> BTreeMap<String, Sample> {
    let mut samples = BTreeMap::new();
    for p in paths.iter() {
        let p: &Path = p.as_ref();
        let role = classifier.classify(p);
        let name = sample_name(p, suffix);
        trace!("{} -> sample {} ({})", p.display(), name, role);
        let s = samples
            .entry(name.clone())
            .or_insert_with(|| Sample::new(name));
        if let Some(old) = s.set_path(role, p.to_owned()) {
            warn!(
                "Sample {}: {} file {} replaced by {}",
                s.name(),
                role,
                old.display(),
                p.display()
            )
        }
    }
    samples
}

/// Split samples into those with both files present (in sample name order) and
/// those missing one file
pub fn pair_samples(
    samples: BTreeMap<String, Sample>,
) -> (Vec<SamplePair>, Vec<IncompleteSample>) {
    let mut pairs = Vec::with_capacity(samples.len());
    let mut incomplete = Vec::new();
    for (name, s) in samples {
        match (s.primary, s.reference) {
            (Some(primary), Some(reference)) => pairs.push(SamplePair {
                name,
                primary,
                reference,
            }),
            (None, _) => incomplete.push(IncompleteSample {
                name,
                missing: GenomeRole::Primary,
            }),
            (_, None) => incomplete.push(IncompleteSample {
                name,
                missing: GenomeRole::Reference,
            }),
        }
    }
    (pairs, incomplete)
}

/// Read in list of alignment file paths, one per line.  Empty lines are skipped.
pub fn read_path_list_from_file<P: AsRef<Path>>(fname: P) -> anyhow::Result<Vec<PathBuf>> {
    debug!("Reading in path list from {}", fname.as_ref().display());

    let mut rdr = CompressIo::new().path(&fname).bufreader()?;

    let mut buf = String::new();
    let mut line = 0;
    let mut path_vec = Vec::new();

    while let Some(fields) = get_next_line(&mut rdr, &mut buf).with_context(|| {
        format!(
            "Error after reading {} lines from {}",
            line,
            fname.as_ref().display()
        )
    })? {
        line += 1;
        if !fields[0].is_empty() {
            path_vec.push(PathBuf::from(fields[0]))
        }
    }

    debug!(
        "Finished reading in {} lines; found {} paths",
        line,
        path_vec.len()
    );

    Ok(path_vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(s: &str) -> PathClassifier {
        PathClassifier::Marker(s.to_owned())
    }

    #[test]
    fn sample_name_strips_directory_and_suffix() {
        assert_eq!(sample_name("a/dmel/SampleA.bam", ".bam"), "SampleA");
        assert_eq!(sample_name("SampleA.bam", ".bam"), "SampleA");
        assert_eq!(sample_name("x/SampleA.cram", ".bam"), "SampleA.cram");
        // Only a trailing suffix is removed
        assert_eq!(sample_name("x/S.bam.bai", ".bam"), "S.bam.bai");
    }

    #[test]
    fn classify_by_marker_and_pattern() {
        let c = marker("/dmel/");
        assert_eq!(c.classify("run/dmel/S1.bam"), GenomeRole::Reference);
        assert_eq!(c.classify("run/scer/S1.bam"), GenomeRole::Primary);
        // No fallback when the marker is absent
        assert_eq!(c.classify("run/dmel_S1.bam"), GenomeRole::Primary);

        let c = PathClassifier::Pattern(Regex::new(r"_spike\.bam$").unwrap());
        assert_eq!(c.classify("S1_spike.bam"), GenomeRole::Reference);
        assert_eq!(c.classify("S1.bam"), GenomeRole::Primary);
    }

    #[test]
    fn incomplete_samples_are_dropped() {
        let paths = ["a/primary/S1.bam", "a/reference/S1.bam", "a/primary/S2.bam"];
        let samples = match_samples(&paths, &marker("/reference/"), ".bam");
        assert_eq!(samples.len(), 2);

        let (pairs, incomplete) = pair_samples(samples);
        assert_eq!(
            pairs,
            vec![SamplePair {
                name: "S1".to_owned(),
                primary: PathBuf::from("a/primary/S1.bam"),
                reference: PathBuf::from("a/reference/S1.bam"),
            }]
        );
        assert_eq!(
            incomplete,
            vec![IncompleteSample {
                name: "S2".to_owned(),
                missing: GenomeRole::Reference,
            }]
        );
    }

    #[test]
    fn reference_only_sample_is_incomplete() {
        let paths = ["r/dmel/S3.bam"];
        let (pairs, incomplete) = pair_samples(match_samples(&paths, &marker("/dmel/"), ".bam"));
        assert!(pairs.is_empty());
        assert_eq!(incomplete[0].missing, GenomeRole::Primary);
    }

    #[test]
    fn last_path_wins_within_a_role() {
        let paths = ["x/S1.bam", "y/S1.bam", "z/dmel/S1.bam"];
        let samples = match_samples(&paths, &marker("/dmel/"), ".bam");
        let s = &samples["S1"];
        assert_eq!(s.primary.as_deref(), Some(Path::new("y/S1.bam")));
        assert_eq!(s.reference.as_deref(), Some(Path::new("z/dmel/S1.bam")));
    }
}
