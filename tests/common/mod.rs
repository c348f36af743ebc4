#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch data directory that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn input_dir(&self) -> PathBuf {
        self.path()
            .join("input")
            .join("WaAS")
            .join("UKDA-7215-tab")
            .join("tab")
    }

    pub fn source_dir(&self, record_type: &str) -> PathBuf {
        self.path()
            .join("output/src/main/java/uk/ac/leeds/ccg/data/waas/data")
            .join(record_type)
    }

    pub fn report_path(&self, record_type: &str) -> PathBuf {
        self.path()
            .join("generated/WaASCG/Subsets")
            .join(format!("{record_type}_subsets.yml"))
    }

    /// Writes the raw bytes of one wave extract.
    pub fn write_wave(&self, wave: u8, record_type: &str, contents: &[u8]) -> PathBuf {
        let dir = self.input_dir();
        fs::create_dir_all(&dir).expect("create input dir");
        let suffix = if wave == 1 { "_v2" } else { "" };
        let path = dir.join(format!(
            "was_wave_{wave}_{record_type}_eul_final{suffix}.tab"
        ));
        fs::write(&path, contents).expect("write wave file");
        path
    }

    /// Writes the five-wave survey described by [`survey_wave`].
    pub fn write_survey(&self, record_type: &str) {
        for wave in 1..=5 {
            self.write_wave(wave, record_type, survey_wave(wave).as_bytes());
        }
    }

    pub fn read_source(&self, record_type: &str, class_name: &str) -> String {
        fs::read_to_string(self.source_dir(record_type).join(format!("{class_name}.java")))
            .expect("read generated source")
    }
}

/// A small survey extract for `wave`.
///
/// | field    | waves     | values                    | level   |
/// |----------|-----------|---------------------------|---------|
/// | CASEWn   | own       | 1001..1003                | short   |
/// | PERSONWn | own       | 10..12                    | byte    |
/// | SEX      | all       | 1, 2                      | boolean |
/// | AGE      | all       | 25, 67, 40                | byte    |
/// | INCOME   | all       | 1200.5, 300               | double  |
/// | FLAG     | all       | 1, 2 (wave 3 uses 0, 1)   | byte    |
/// | HPROP    | 1, 2      | -1, 1                     | boolean |
/// | DVTOTINC | 3, 4, 5   | 100000, 250000            | int     |
/// | NOTE     | 4, 5      | free text                 | string  |
pub fn survey_wave(wave: u8) -> String {
    let tag = format!("W{wave}");
    let mut header = vec![
        format!("CASE{tag}"),
        format!("PERSON{tag}"),
        format!("SEX{tag}"),
        format!("Age{tag}"),
        format!("INCOME{tag}"),
        format!("FLAG{tag}"),
    ];
    let flag = if wave == 3 { ["1", "0", "1"] } else { ["1", "2", "1"] };
    let mut rows: Vec<Vec<String>> = (0..3)
        .map(|row| {
            vec![
                format!("{}", 1001 + row),
                format!("{}", 10 + row),
                ["1", "2", "2"][row].to_string(),
                ["25", "67", "40"][row].to_string(),
                ["1200.5", "", "300"][row].to_string(),
                flag[row].to_string(),
            ]
        })
        .collect();
    if wave <= 2 {
        header.push(format!("HPROP{tag}"));
        for (row, value) in rows.iter_mut().zip(["-1", "1", "-1"]) {
            row.push(value.to_string());
        }
    }
    if wave >= 3 {
        header.push(format!("DVTOTINC{tag}"));
        for (row, value) in rows.iter_mut().zip(["100000", "250000", ""]) {
            row.push(value.to_string());
        }
    }
    if wave >= 4 {
        header.push(format!("note{tag}"));
        for (row, value) in rows.iter_mut().zip(["abc", "", "x y"]) {
            row.push(value.to_string());
        }
    }
    let mut text = header.join("\t");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join("\t"));
        text.push('\n');
    }
    text
}
