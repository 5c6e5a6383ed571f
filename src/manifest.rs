//! Manifest Reader
//!
//! Reads the tab-delimited manifest that drives a dataset build.
//!
//! ## Row Format
//! ```text
//! <image_path>\t<label_text>[\t<ignored>...]
//! ```
//! No header row. Blank lines are skipped. A field that starts with a double
//! quote runs to its closing quote, so it may contain tabs; `""` inside it
//! collapses to a single `"`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};

/// Field separator
const DELIMITER: char = '\t';

/// Quote character for fields containing tabs or quotes
const QUOTE: char = '"';

/// One parsed manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// 1-based line number in the manifest
    pub line: usize,

    /// Path of the referenced image, as written in the manifest
    pub image_path: PathBuf,

    /// Label text before normalization
    pub label: String,
}

impl ManifestRow {
    /// The label with whitespace trimmed and interior spaces removed
    pub fn normalized_label(&self) -> String {
        normalize_label(&self.label)
    }
}

/// Trim surrounding whitespace and drop every interior space character.
///
/// Only U+0020 is removed from the interior; tabs or other whitespace inside
/// the label are kept.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().replace(' ', "")
}

/// Streaming reader over manifest rows, in file order
pub struct Manifest {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl Manifest {
    /// Open a manifest file
    ///
    /// A missing file is reported as `ManifestNotFound`; other open failures
    /// surface as `Io`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DatasetError::ManifestNotFound(path.to_path_buf()),
            _ => DatasetError::Io(e),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }

    /// Path of the manifest being read
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for Manifest {
    type Item = Result<ManifestRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(DatasetError::Io(e))),
            };
            self.line_no += 1;

            match parse_row(self.line_no, &line) {
                Ok(Some(row)) => return Some(Ok(row)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Parse a single manifest line
///
/// Returns:
/// - `Ok(Some(row))` — a well-formed row
/// - `Ok(None)` — blank line
/// - `Err(Manifest)` — the line has no label field
pub fn parse_row(line_no: usize, line: &str) -> Result<Option<ManifestRow>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = split_fields(line).into_iter();
    let image_field = fields.next().unwrap_or_default();
    let label = fields.next().ok_or_else(|| DatasetError::Manifest {
        line: line_no,
        message: format!("expected `<image_path>\\t<label>`, got {:?}", line),
    })?;

    Ok(Some(ManifestRow {
        line: line_no,
        image_path: PathBuf::from(image_field),
        label,
    }))
}

/// Split a line on tabs, honoring double-quoted fields
///
/// A quote opens a quoted field only at the start of a field. Inside it,
/// tabs are literal and `""` is an escaped quote; the closing quote ends the
/// quoting and any following characters are kept as-is. An unterminated
/// quote runs to the end of the line.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut at_start = true;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == DELIMITER {
            fields.push(std::mem::take(&mut field));
            at_start = true;
            continue;
        } else if c == QUOTE && at_start {
            in_quotes = true;
        } else {
            field.push(c);
        }
        at_start = false;
    }

    fields.push(field);
    fields
}
