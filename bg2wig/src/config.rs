use std::path::{Path, PathBuf};

use crate::wig::DEFAULT_TRACK_NAME;

pub struct Config {
    input_file: PathBuf,
    output_file: PathBuf,
    track_name: String,
}

impl Config {
    pub fn new(input_file: PathBuf, output_file: PathBuf) -> Self {
        Self {
            input_file,
            output_file,
            track_name: String::from(DEFAULT_TRACK_NAME),
        }
    }

    pub fn set_track_name(&mut self, s: String) {
        self.track_name = s
    }

    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }
}
