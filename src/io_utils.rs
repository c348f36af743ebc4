//! I/O helpers for reading survey extracts and writing generated sources.
//!
//! Survey extracts are tab-separated with no quoting: a value may legitimately
//! contain a `"` character, so the reader treats quotes as ordinary bytes.
//! Non UTF-8 inputs are transcoded on the fly through `encoding_rs_io`.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

pub const TAB_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

fn open_decoded(path: &Path, encoding: &'static Encoding) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let reader: Box<dyn Read> = if encoding == UTF_8 {
        Box::new(BufReader::new(file))
    } else {
        Box::new(BufReader::new(
            DecodeReaderBytesBuilder::new()
                .encoding(Some(encoding))
                .build(file),
        ))
    };
    Ok(reader)
}

pub fn open_tab_reader<R>(reader: R, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(TAB_DELIMITER)
        .quoting(false)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_tab_reader_from_path(
    path: &Path,
    encoding: &'static Encoding,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader = open_decoded(path, encoding)?;
    Ok(open_tab_reader(reader, true))
}

/// Returns the raw header line, tab separators included.
pub fn reader_header_line<R>(reader: &mut csv::Reader<R>) -> Result<String>
where
    R: Read,
{
    let headers = reader.headers().context("Reading header line")?;
    Ok(headers.iter().collect::<Vec<_>>().join("\t"))
}

/// Creates (or truncates) `path`, creating parent directories as needed.
pub fn create_text_writer(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Creating directory {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    Ok(BufWriter::new(file))
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    let mut writer = create_text_writer(path)?;
    writer
        .write_all(contents.as_bytes())
        .with_context(|| format!("Writing {path:?}"))?;
    writer.flush().with_context(|| format!("Flushing {path:?}"))?;
    Ok(())
}
