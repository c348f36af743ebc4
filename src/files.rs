//! Locations of survey inputs and generated outputs below a base data directory.
//!
//! ```text
//! <data>/input/WaAS/UKDA-7215-tab/tab/was_wave_<w>_<type>_eul_final[_v2].tab
//! <data>/generated/WaASCG/Subsets/
//! <data>/output/src/main/java/uk/ac/leeds/ccg/data/waas/data/<type>/
//! ```

use std::{fs, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use serde::Serialize;

/// Number of survey waves.
pub const NWAVES: u8 = 5;

/// Java package holding the generated record classes, minus the record type.
pub const PACKAGE_ROOT: &str = "uk.ac.leeds.ccg.data.waas.data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize)]
#[value(rename_all = "lowercase")]
pub enum RecordType {
    #[value(name = "hhold")]
    #[serde(rename = "hhold")]
    Household,
    #[value(name = "person")]
    #[serde(rename = "person")]
    Person,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Household => "hhold",
            RecordType::Person => "person",
        }
    }

    /// Single letter used in generated class names.
    pub fn tag(self) -> &'static str {
        match self {
            RecordType::Household => "H",
            RecordType::Person => "P",
        }
    }

    pub fn package(self) -> String {
        format!("{PACKAGE_ROOT}.{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct WaveFiles {
    data_dir: PathBuf,
}

impl WaveFiles {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `$HOME/data/WaAS`.
    pub fn default_data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Unable to resolve home directory"))?;
        Ok(home.join("data").join("WaAS"))
    }

    pub fn input_dir(&self) -> PathBuf {
        self.data_dir
            .join("input")
            .join("WaAS")
            .join("UKDA-7215-tab")
            .join("tab")
    }

    pub fn input_file(&self, wave: u8, record_type: RecordType) -> PathBuf {
        self.input_dir().join(input_file_name(wave, record_type))
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.data_dir.join("generated").join("WaASCG")
    }

    /// Directory for diagnostic subset reports, created on demand.
    pub fn subsets_dir(&self) -> Result<PathBuf> {
        let dir = self.generated_dir().join("Subsets");
        fs::create_dir_all(&dir).with_context(|| format!("Creating directory {dir:?}"))?;
        Ok(dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("output")
    }

    /// Source directory mirroring the generated package, created on demand.
    pub fn source_dir(&self, record_type: RecordType) -> Result<PathBuf> {
        let mut dir = self.output_dir().join("src").join("main").join("java");
        for segment in PACKAGE_ROOT.split('.') {
            dir.push(segment);
        }
        dir.push(record_type.as_str());
        fs::create_dir_all(&dir).with_context(|| format!("Creating directory {dir:?}"))?;
        Ok(dir)
    }
}

pub fn input_file_name(wave: u8, record_type: RecordType) -> String {
    let suffix = if wave == 1 { "_v2" } else { "" };
    format!(
        "was_wave_{wave}_{}_eul_final{suffix}.tab",
        record_type.as_str()
    )
}
