//! YAML summary of a generation run: per-wave statistics, the field groups with
//! their consolidated levels, and the harmonized boolean codes.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    consolidate::ConsolidatedSchema,
    files::RecordType,
    inference::{Sentinels, WaveSchema},
    io_utils,
    level::FieldLevel,
    partition::{FieldPartition, WaveGroup},
    sentinel::SentinelMap,
};

#[derive(Debug, Clone, Serialize)]
pub struct WaveSummary {
    pub wave: u8,
    pub rows: usize,
    pub fields: usize,
    pub boolean_fields: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubsetReport {
    pub record_type: RecordType,
    pub waves: Vec<WaveSummary>,
    /// Keyed by class group tag, e.g. `W4W5`.
    pub groups: BTreeMap<String, BTreeMap<String, FieldLevel>>,
    /// Harmonized boolean codes, keyed by class group tag then field.
    pub sentinels: BTreeMap<String, BTreeMap<String, Sentinels>>,
}

impl SubsetReport {
    pub fn build(
        record_type: RecordType,
        waves: &[WaveSchema],
        partition: &FieldPartition,
        consolidated: &ConsolidatedSchema,
        sentinels: &SentinelMap,
    ) -> Self {
        let summaries = waves
            .iter()
            .map(|wave| WaveSummary {
                wave: wave.wave,
                rows: wave.rows,
                fields: wave.fields.len(),
                boolean_fields: wave
                    .levels
                    .values()
                    .filter(|level| **level == FieldLevel::Boolean)
                    .count(),
            })
            .collect();
        let groups = WaveGroup::ABSTRACT
            .into_iter()
            .chain(waves.iter().map(|wave| WaveGroup::Wave(wave.wave)))
            .map(|group| {
                let fields: BTreeMap<String, FieldLevel> = partition
                    .group(group)
                    .iter()
                    .filter_map(|field| consolidated.level(field).map(|l| (field.clone(), l)))
                    .collect();
                (group.tag(), fields)
            })
            .collect();
        Self {
            record_type,
            waves: summaries,
            groups,
            sentinels: sentinels.by_tag(),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing subset report to YAML")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml_string()?;
        io_utils::write_text(path, &yaml).with_context(|| format!("Writing report {path:?}"))
    }
}
