//! End-to-end generation for one record type.

use std::path::PathBuf;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::info;

use crate::{
    consolidate::{ConsolidatedSchema, consolidate},
    emit,
    files::{NWAVES, RecordType, WaveFiles},
    inference::{WaveSchema, infer_wave},
    partition::{FieldPartition, FieldSet, partition},
    report::SubsetReport,
    sentinel::{SentinelMap, reconcile},
};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub encoding: &'static Encoding,
    pub write_report: bool,
}

/// Result of the analysis stages, ready for emission.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub record_type: RecordType,
    pub waves: Vec<WaveSchema>,
    pub consolidated: ConsolidatedSchema,
    pub partition: FieldPartition,
    pub sentinels: SentinelMap,
}

#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub source_dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Runs the cross-wave stages over already inferred wave schemas.
pub fn analyze(record_type: RecordType, waves: Vec<WaveSchema>) -> Analysis {
    let field_sets: [FieldSet; NWAVES as usize] = std::array::from_fn(|idx| {
        waves
            .get(idx)
            .map(|wave| wave.fields.iter().cloned().collect())
            .unwrap_or_default()
    });
    let mut consolidated = consolidate(&waves);
    let partition = partition(&field_sets);
    let sentinels = reconcile(&waves, &partition, &mut consolidated);
    Analysis {
        record_type,
        waves,
        consolidated,
        partition,
        sentinels,
    }
}

pub fn infer_all(
    files: &WaveFiles,
    record_type: RecordType,
    encoding: &'static Encoding,
) -> Result<Vec<WaveSchema>> {
    (1..=NWAVES)
        .map(|wave| {
            infer_wave(files, wave, record_type, encoding).with_context(|| {
                format!("Inferring wave {wave} {} types", record_type.as_str())
            })
        })
        .collect()
}

/// Infers, reconciles, and writes the record classes for `record_type`.
pub fn generate(
    files: &WaveFiles,
    record_type: RecordType,
    options: &GenerateOptions,
) -> Result<GenerateOutcome> {
    info!("Generating {} record classes", record_type.as_str());
    let waves = infer_all(files, record_type, options.encoding)?;
    let analysis = analyze(record_type, waves);

    let specs = emit::plan(
        record_type,
        &analysis.partition,
        &analysis.consolidated,
        &analysis.waves,
        &analysis.sentinels,
    );
    let source_dir = files.source_dir(record_type)?;
    let written = emit::emit(&specs, &source_dir)?;

    let report = if options.write_report {
        let path = files
            .subsets_dir()?
            .join(format!("{}_subsets.yml", record_type.as_str()));
        SubsetReport::build(
            record_type,
            &analysis.waves,
            &analysis.partition,
            &analysis.consolidated,
            &analysis.sentinels,
        )
        .save(&path)?;
        info!("Subset report written to {path:?}");
        Some(path)
    } else {
        None
    };

    info!("Finished generating {} record classes", record_type.as_str());
    Ok(GenerateOutcome {
        source_dir,
        written,
        report,
    })
}
