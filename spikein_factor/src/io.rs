use std::{cmp::Ordering, io::Write, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;

use crate::{config::Config, process::NormResult};

// Sample name, then counts, then factors
fn cmp_results(a: &NormResult, b: &NormResult) -> Ordering {
    a.sample
        .cmp(&b.sample)
        .then_with(|| a.counts.cmp(&b.counts))
        .then_with(|| {
            a.factors
                .partial_cmp(&b.factors)
                .unwrap_or(Ordering::Equal)
        })
}

/// Write header line followed by one comma separated line per result, sorted on sample name.
/// Fields are not quoted
pub fn write_report<W: Write>(
    wrt: &mut W,
    results: &[NormResult],
    header: &str,
) -> anyhow::Result<()> {
    let mut v: Vec<_> = results.iter().collect();
    v.sort_unstable_by(|a, b| cmp_results(a, b));

    writeln!(wrt, "{}", header)?;
    for r in v {
        writeln!(
            wrt,
            "{},{},{},{}",
            r.sample, r.counts.primary, r.counts.reference, r.factors
        )?
    }
    Ok(())
}

pub fn write_report_file(path: &Path, results: &[NormResult], cfg: &Config) -> anyhow::Result<()> {
    trace!("Opening {} for output", path.display());
    let mut wrt = CompressIo::new()
        .path(path)
        .bufwriter()
        .with_context(|| format!("Could not open output file {}", path.display()))?;
    let header = cfg
        .formula()
        .header(cfg.primary_label(), cfg.reference_label());
    write_report(&mut wrt, results, &header)
        .and_then(|_| wrt.flush().map_err(anyhow::Error::from))
        .with_context(|| format!("Error writing to {}", path.display()))
}
