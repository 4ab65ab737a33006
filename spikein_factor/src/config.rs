use std::path::{Path, PathBuf};

use crate::{formula::Formula, sample::PathClassifier};

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// output_file - destination for the CSV table
/// input_paths - alignment files for all samples and both genomes
/// classifier - decides whether an input file belongs to the reference genome
/// suffix - file suffix removed to get the sample name
/// formula - normalization formula
/// primary_label, reference_label - used for the column headers
/// samtools - samtools executable used for counting
///
pub struct Config {
    output_file: PathBuf,
    input_paths: Vec<PathBuf>,
    classifier: PathClassifier,
    suffix: String,
    formula: Formula,
    primary_label: String,
    reference_label: String,
    samtools: PathBuf,
}

impl Config {
    pub fn new(
        output_file: PathBuf,
        input_paths: Vec<PathBuf>,
        classifier: PathClassifier,
        formula: Formula,
    ) -> Self {
        Self {
            output_file,
            input_paths,
            classifier,
            formula,
            suffix: String::from(".bam"),
            primary_label: String::from("scer"),
            reference_label: String::from("dmel"),
            samtools: PathBuf::from("samtools"),
        }
    }

    pub fn set_suffix(&mut self, s: String) {
        self.suffix = s
    }

    pub fn set_labels(&mut self, primary: String, reference: String) {
        self.primary_label = primary;
        self.reference_label = reference;
    }

    pub fn set_samtools(&mut self, p: PathBuf) {
        self.samtools = p
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn input_paths(&self) -> &[PathBuf] {
        &self.input_paths
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn formula(&self) -> Formula {
        self.formula
    }

    pub fn primary_label(&self) -> &str {
        &self.primary_label
    }

    pub fn reference_label(&self) -> &str {
        &self.reference_label
    }

    pub fn samtools(&self) -> &Path {
        &self.samtools
    }
}
