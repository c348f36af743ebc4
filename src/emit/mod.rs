//! Planning and writing of the generated record classes.
//!
//! [`plan`] turns the partition and inferred types into one [`ClassSpec`] per
//! output file without touching the filesystem; [`emit`] renders each spec with
//! the Java renderer and writes it below the output directory.

pub mod java;

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info};

use crate::{
    consolidate::ConsolidatedSchema,
    files::RecordType,
    inference::WaveSchema,
    io_utils,
    level::FieldLevel,
    partition::{FieldPartition, WaveGroup},
    sentinel::SentinelMap,
};

/// Prefix shared by every generated class name.
pub const CLASS_PREFIX: &str = "WaAS";
/// Identifier type passed to every record constructor.
pub const RECORD_ID_IMPORT: &str = "uk.ac.leeds.ccg.data.waas.data.id.WaAS_RecordID";
/// Base class of the root record class.
pub const RECORD_BASE_IMPORT: &str = "uk.ac.leeds.ccg.data.Data_Record";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub level: FieldLevel,
    /// Code read as `false` for boolean fields; other codes read as `true`.
    pub false_code: Option<i8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constructor {
    /// Root class: holds the split line and chains to the record base.
    Root,
    /// Abstract ancestor: chains the identifier upwards.
    Intermediate,
    /// Wave class: splits a data line and initializes every column in order.
    Concrete { columns: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    pub package: String,
    pub class_name: String,
    pub group: WaveGroup,
    /// Generated class this one extends; `None` for the root.
    pub extends: Option<String>,
    pub imports: Vec<String>,
    pub fields: Vec<FieldSpec>,
    pub constructor: Constructor,
}

impl ClassSpec {
    pub fn is_abstract(&self) -> bool {
        self.group.is_abstract()
    }

    pub fn file_name(&self) -> String {
        format!("{}.java", self.class_name)
    }
}

pub fn class_name(group: WaveGroup, record_type: RecordType) -> String {
    format!("{CLASS_PREFIX}_{}{}Record", group.tag(), record_type.tag())
}

/// Builds the five wave classes followed by the four abstract ancestors.
pub fn plan(
    record_type: RecordType,
    partition: &FieldPartition,
    consolidated: &ConsolidatedSchema,
    waves: &[WaveSchema],
    sentinels: &SentinelMap,
) -> Vec<ClassSpec> {
    let package = record_type.package();
    let concrete = waves.iter().map(|wave| {
        let group = WaveGroup::Wave(wave.wave);
        let fields = field_specs(partition.group(group), consolidated, |field| {
            wave.sentinels(field).and_then(|codes| codes.low)
        });
        ClassSpec {
            package: package.clone(),
            class_name: class_name(group, record_type),
            group,
            extends: group.parent().map(|parent| class_name(parent, record_type)),
            imports: vec![RECORD_ID_IMPORT.to_string()],
            fields,
            constructor: Constructor::Concrete {
                columns: wave.fields.clone(),
            },
        }
    });
    let ancestors = WaveGroup::ABSTRACT.into_iter().map(|group| {
        let fields = field_specs(partition.group(group), consolidated, |field| {
            sentinels.get(group, field).and_then(|codes| codes.low)
        });
        let (imports, constructor) = if group == WaveGroup::All {
            (
                vec![RECORD_ID_IMPORT.to_string(), RECORD_BASE_IMPORT.to_string()],
                Constructor::Root,
            )
        } else {
            (vec![RECORD_ID_IMPORT.to_string()], Constructor::Intermediate)
        };
        ClassSpec {
            package: package.clone(),
            class_name: class_name(group, record_type),
            group,
            extends: group.parent().map(|parent| class_name(parent, record_type)),
            imports,
            fields,
            constructor,
        }
    });
    concrete.chain(ancestors).collect()
}

fn field_specs<'a, I, F>(
    fields: I,
    consolidated: &ConsolidatedSchema,
    code_for: F,
) -> Vec<FieldSpec>
where
    I: IntoIterator<Item = &'a String>,
    F: Fn(&str) -> Option<i8>,
{
    fields
        .into_iter()
        .map(|name| {
            let level = consolidated.level(name).unwrap_or(FieldLevel::String);
            let false_code = if level == FieldLevel::Boolean {
                code_for(name.as_str())
            } else {
                None
            };
            FieldSpec {
                name: name.clone(),
                level,
                false_code,
            }
        })
        .collect()
}

/// Renders and writes every spec into `out_dir`, replacing existing files.
pub fn emit(specs: &[ClassSpec], out_dir: &Path) -> Result<Vec<PathBuf>> {
    info!("Writing {} class(es) to {out_dir:?}", specs.len());
    let mut written = Vec::with_capacity(specs.len());
    for spec in specs {
        let path = out_dir.join(spec.file_name());
        let source = java::render(spec);
        io_utils::write_text(&path, &source)?;
        debug!("Wrote {} field(s) to {path:?}", spec.fields.len());
        written.push(path);
    }
    info!("Finished writing {} class(es)", written.len());
    Ok(written)
}
