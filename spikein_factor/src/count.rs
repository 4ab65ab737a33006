use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Context;

/// Source of mapped read counts for an alignment file
pub trait MappedReadCounter {
    fn count_mapped(&self, path: &Path) -> anyhow::Result<u64>;
}

/// Counts mapped reads by running `samtools view -c -F 4`
pub struct Samtools {
    exe: PathBuf,
}

impl Samtools {
    pub fn new<P: AsRef<Path>>(exe: P) -> Self {
        Self {
            exe: exe.as_ref().to_owned(),
        }
    }
}

impl MappedReadCounter for Samtools {
    fn count_mapped(&self, path: &Path) -> anyhow::Result<u64> {
        debug!(
            "Running {} view -c -F 4 {}",
            self.exe.display(),
            path.display()
        );
        let output = Command::new(&self.exe)
            .args(["view", "-c", "-F", "4"])
            .arg(path)
            .output()
            .with_context(|| format!("Could not run {}", self.exe.display()))?;

        if !output.status.success() {
            return Err(anyhow!(
                "{} view -c -F 4 {} failed ({}): {}",
                self.exe.display(),
                path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        parse_count(&output.stdout)
            .with_context(|| format!("Could not get read count for {}", path.display()))
    }
}

/// Output should consist of a single unsigned integer, possibly surrounded by white space
pub fn parse_count(out: &[u8]) -> anyhow::Result<u64> {
    let s = std::str::from_utf8(out).with_context(|| "Counter output is not valid UTF-8")?;
    let s = s.trim();
    s.parse::<u64>()
        .with_context(|| format!("Unexpected counter output '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_trims_output() {
        assert_eq!(parse_count(b"12345\n").unwrap(), 12345);
        assert_eq!(parse_count(b"  0 \n").unwrap(), 0);
    }

    #[test]
    fn parse_count_rejects_non_numeric_output() {
        assert!(parse_count(b"").is_err());
        assert!(parse_count(b"[E::hts_open] fail\n").is_err());
        assert!(parse_count(b"-3\n").is_err());
        assert!(parse_count(b"12 34\n").is_err());
    }

    #[test]
    fn missing_executable_is_an_error() {
        let st = Samtools::new("/nonexistent/bin/samtools");
        let e = st.count_mapped(Path::new("S1.bam")).unwrap_err();
        assert!(e.to_string().contains("Could not run"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error() {
        let st = Samtools::new("false");
        let e = st.count_mapped(Path::new("S1.bam")).unwrap_err();
        assert!(e.to_string().contains("failed"));
    }

    #[cfg(unix)]
    #[test]
    fn non_numeric_output_is_an_error() {
        // echo writes its arguments ("view -c -F 4 S1.bam") and exits successfully
        let st = Samtools::new("echo");
        let e = st.count_mapped(Path::new("S1.bam")).unwrap_err();
        assert!(e.to_string().contains("Could not get read count"));
        assert!(format!("{:#}", e).contains("view -c -F 4 S1.bam"));
    }
}
