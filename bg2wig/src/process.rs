use crate::{config::Config, wig};
use anyhow::Context;
use std::io::Write;

use compress_io::compress::CompressIo;

/// Convert the input bedGraph to a per-base Wiggle track, streaming from input to output
pub fn process_data(cfg: &Config) -> anyhow::Result<()> {
    let (in_path, out_path) = (cfg.input_file(), cfg.output_file());
    debug!(
        "Converting {} to {}",
        in_path.display(),
        out_path.display()
    );

    let mut rdr = CompressIo::new()
        .path(in_path)
        .bufreader()
        .with_context(|| format!("Could not open input file {}", in_path.display()))?;
    let mut wrt = CompressIo::new()
        .path(out_path)
        .bufwriter()
        .with_context(|| format!("Could not open output file {}", out_path.display()))?;

    let summary = wig::expand(&mut rdr, &mut wrt, cfg.track_name()).with_context(|| {
        format!(
            "Error converting {} to {}",
            in_path.display(),
            out_path.display()
        )
    })?;
    wrt.flush()
        .with_context(|| format!("Error writing to {}", out_path.display()))?;

    info!(
        "Wrote {} positions from {} intervals ({} variableStep sections); {} lines skipped",
        summary.positions,
        summary.intervals,
        summary.declarations,
        summary.n_skipped
    );
    if !summary.skipped.is_empty() {
        let v: Vec<_> = summary
            .skipped
            .iter()
            .map(|s| format!("{} ({} fields)", s.line, s.fields))
            .collect();
        debug!("First skipped lines: {}", v.join(", "))
    }
    Ok(())
}
