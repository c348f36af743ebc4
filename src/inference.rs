//! Streaming type inference for one wave of survey data.
//!
//! Every column runs an independent state machine over the lattice in
//! [`FieldLevel`]. A column starts out as a candidate boolean: the first two
//! distinct small-integer codes it sees become its low and high sentinels, and
//! a third distinct code (or any value that is not a small integer) pushes it
//! up the lattice for good. Empty values carry no information and are skipped.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{debug, error, info};
use serde::Serialize;
use thiserror::Error;

use crate::{
    files::{RecordType, WaveFiles},
    header,
    io_utils,
    level::{FieldLevel, parse_byte},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("value '{value}' in column {column} fits no storage level")]
    Unclassifiable { column: String, value: String },
}

/// False (low) and true (high) codes observed in a boolean column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Sentinels {
    pub low: Option<i8>,
    pub high: Option<i8>,
}

impl Sentinels {
    pub fn new(low: i8, high: i8) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnState {
    level: FieldLevel,
    sentinels: Sentinels,
}

impl Default for ColumnState {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnState {
    pub fn new() -> Self {
        Self {
            level: FieldLevel::Boolean,
            sentinels: Sentinels::default(),
        }
    }

    pub fn level(&self) -> FieldLevel {
        self.level
    }

    pub fn sentinels(&self) -> Sentinels {
        self.sentinels
    }

    /// Widens to `level`; a narrower request is ignored.
    pub fn promote(&mut self, level: FieldLevel) {
        if level > self.level {
            self.level = level;
        }
    }

    pub fn observe(&mut self, column: &str, raw: &str) -> Result<(), InferenceError> {
        let value = raw.trim();
        if value.is_empty() {
            return Ok(());
        }
        if self.level == FieldLevel::Boolean {
            match parse_byte(value) {
                Some(code) => {
                    self.observe_code(code);
                    return Ok(());
                }
                None => self.promote(FieldLevel::Byte),
            }
        }
        match self.level.classify(value) {
            Some(level) => {
                self.promote(level);
                Ok(())
            }
            None => Err(InferenceError::Unclassifiable {
                column: column.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn observe_code(&mut self, code: i8) {
        match (self.sentinels.low, self.sentinels.high) {
            (None, _) => self.sentinels.low = Some(code),
            (Some(low), None) if code != low => self.sentinels.high = Some(code),
            (Some(low), Some(high)) if code != low && code != high => {
                self.promote(FieldLevel::Byte)
            }
            _ => {}
        }
    }

    /// Orders the sentinels so that low < high.
    fn settle(&mut self) {
        if let Sentinels {
            low: Some(low),
            high: Some(high),
        } = self.sentinels
            && low > high
        {
            self.sentinels = Sentinels::new(high, low);
        }
    }
}

/// Inferred fields, levels, and boolean sentinels for one wave.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaveSchema {
    pub wave: u8,
    pub fields: Vec<String>,
    pub levels: BTreeMap<String, FieldLevel>,
    pub sentinels: BTreeMap<String, Sentinels>,
    pub rows: usize,
}

impl WaveSchema {
    pub fn level(&self, field: &str) -> Option<FieldLevel> {
        self.levels.get(field).copied()
    }

    pub fn sentinels(&self, field: &str) -> Option<Sentinels> {
        self.sentinels.get(field).copied()
    }
}

/// Accumulates observations for every column of a wave.
#[derive(Debug, Clone)]
pub struct TypeInference {
    wave: u8,
    fields: Vec<String>,
    columns: Vec<ColumnState>,
    rows: usize,
    unclassified: usize,
}

impl TypeInference {
    pub fn new(wave: u8, fields: Vec<String>) -> Self {
        let columns = vec![ColumnState::new(); fields.len()];
        Self {
            wave,
            fields,
            columns,
            rows: 0,
            unclassified: 0,
        }
    }

    /// Feeds one data row. Missing trailing values count as empty.
    pub fn observe_row<S: AsRef<str>>(&mut self, values: &[S]) {
        if values.len() > self.fields.len() {
            debug!(
                "Wave {} row {} has {} value(s) for {} column(s); ignoring the surplus",
                self.wave,
                self.rows + 1,
                values.len(),
                self.fields.len()
            );
        }
        for ((field, state), value) in self.fields.iter().zip(&mut self.columns).zip(values) {
            if let Err(err) = state.observe(field, value.as_ref()) {
                error!("Wave {} row {}: {err}", self.wave, self.rows + 1);
                self.unclassified += 1;
            }
        }
        self.rows += 1;
    }

    pub fn finish(mut self) -> WaveSchema {
        let mut levels = BTreeMap::new();
        let mut sentinels = BTreeMap::new();
        for (field, state) in self.fields.iter().zip(&mut self.columns) {
            state.settle();
            levels.insert(field.clone(), state.level);
            if state.level == FieldLevel::Boolean && state.sentinels.low.is_some() {
                sentinels.insert(field.clone(), state.sentinels);
            }
        }
        if self.unclassified > 0 {
            info!(
                "Wave {} skipped {} unclassifiable value(s)",
                self.wave, self.unclassified
            );
        }
        WaveSchema {
            wave: self.wave,
            fields: self.fields,
            levels,
            sentinels,
            rows: self.rows,
        }
    }
}

/// Normalizes the header of `wave` and scans every data row.
pub fn infer_wave(
    files: &WaveFiles,
    wave: u8,
    record_type: RecordType,
    encoding: &'static Encoding,
) -> Result<WaveSchema> {
    let path = files.input_file(wave, record_type);
    info!("Inferring wave {wave} {} types from {path:?}", record_type.as_str());
    let mut reader = io_utils::open_tab_reader_from_path(&path, encoding)?;
    let header_line = io_utils::reader_header_line(&mut reader)
        .with_context(|| format!("Reading header of {path:?}"))?;
    let fields = header::normalize(&header_line, wave);
    let mut inference = TypeInference::new(wave, fields);

    let mut record = csv::ByteRecord::new();
    let mut values: Vec<String> = Vec::new();
    while reader
        .read_byte_record(&mut record)
        .with_context(|| format!("Reading row {} of {path:?}", inference.rows + 2))?
    {
        values.clear();
        values.extend(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned()),
        );
        inference.observe_row(&values);
    }

    let schema = inference.finish();
    info!(
        "Inferred wave {wave}: {} field(s), {} row(s), {} boolean field(s)",
        schema.fields.len(),
        schema.rows,
        schema.sentinels.len()
    );
    Ok(schema)
}
