use anyhow::Context;

use crate::{
    config::Config,
    count::{MappedReadCounter, Samtools},
    formula::{Factors, Formula, ReadCounts},
    io,
    sample::{match_samples, pair_samples, SamplePair},
};

/// Normalization result for one sample
#[derive(Debug, Clone, PartialEq)]
pub struct NormResult {
    pub sample: String,
    pub counts: ReadCounts,
    pub factors: Factors,
}

/// Count mapped reads for each sample pair (primary file first) and calculate
/// the normalization factors.  Any counting failure aborts the whole calculation.
pub fn calculate_factors<C: MappedReadCounter + ?Sized>(
    pairs: &[SamplePair],
    counter: &C,
    formula: Formula,
) -> anyhow::Result<Vec<NormResult>> {
    let mut v = Vec::with_capacity(pairs.len());
    for pair in pairs.iter() {
        let primary = counter
            .count_mapped(&pair.primary)
            .with_context(|| format!("Error counting primary reads for {}", pair.name))?;
        let reference = counter
            .count_mapped(&pair.reference)
            .with_context(|| format!("Error counting reference reads for {}", pair.name))?;
        let counts = ReadCounts { primary, reference };
        let factors = formula.apply(counts);
        debug!(
            "{}: primary {}, reference {}, factors {}",
            pair.name, primary, reference, factors
        );
        v.push(NormResult {
            sample: pair.name.clone(),
            counts,
            factors,
        })
    }
    Ok(v)
}

/// Strategy
///
/// Group input files into samples, keeping only those with files for both genomes.
/// Count mapped reads for each file, calculate factors and write out the table
pub fn process_samples(cfg: &Config) -> anyhow::Result<()> {
    debug!("Starting processing");

    let samples = match_samples(cfg.input_paths(), cfg.classifier(), cfg.suffix());
    let (pairs, incomplete) = pair_samples(samples);
    for s in incomplete.iter() {
        warn!("Skipping sample {}: no {} file", s.name, s.missing)
    }
    info!(
        "{} complete samples, {} incomplete",
        pairs.len(),
        incomplete.len()
    );

    let counter = Samtools::new(cfg.samtools());
    let results = calculate_factors(&pairs, &counter, cfg.formula())?;

    io::write_report_file(cfg.output_file(), &results, cfg)?;
    println!("Wrote spike-in factors to {}", cfg.output_file().display());
    Ok(())
}
