// src/process/mod.rs
pub mod utils;

use csv::{ReaderBuilder, StringRecord};
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};
use tracing::{debug, info};

use crate::error::{ConvertError, Result};
use utils::clean_field;

/// Marker that identifies the region-code column in a header row.
pub const UF_HEADER: &str = "UF";
/// Label of the municipality column in a header row.
pub const MUNICIPALITY_HEADER: &str = "MUNICIPALITY";

/// One valid data row: `[uf, municipality, class, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub uf: String,
    pub municipality: String,
    pub class: String,
}

/// Why a row was left out of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than three fields.
    TooFewFields,
    /// UF, municipality or class is blank.
    EmptyField,
    /// A repeated header line in the middle of the data.
    HeaderLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCheck {
    Valid(Record),
    Skip(SkipReason),
}

/// Everything read from one CSV, in file order.
#[derive(Debug, Default)]
pub struct LoadedRows {
    pub records: Vec<Record>,
    /// Rows rejected by [`check_row`]. The leading header is not counted.
    pub skipped: usize,
    pub header_detected: bool,
}

impl LoadedRows {
    /// True when the input held no row at all, not even a header or a blank line.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.skipped == 0 && !self.header_detected
    }
}

/// A first row is a header when its first cell is, or contains, `UF`.
pub fn is_header_row(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|cell| clean_field(cell).to_uppercase().contains(UF_HEADER))
        .unwrap_or(false)
}

/// Validate one data row and pull out its first three fields.
pub fn check_row(record: &StringRecord) -> RowCheck {
    if record.len() < 3 {
        return RowCheck::Skip(SkipReason::TooFewFields);
    }

    let uf = clean_field(&record[0]);
    let municipality = clean_field(&record[1]);
    let class = clean_field(&record[2]);

    if uf.is_empty() || municipality.is_empty() || class.is_empty() {
        return RowCheck::Skip(SkipReason::EmptyField);
    }

    if uf.eq_ignore_ascii_case(UF_HEADER) || municipality.eq_ignore_ascii_case(MUNICIPALITY_HEADER)
    {
        return RowCheck::Skip(SkipReason::HeaderLabel);
    }

    RowCheck::Valid(Record {
        uf: uf.to_string(),
        municipality: municipality.to_string(),
        class: class.to_string(),
    })
}

/// Blank lines between byte offsets `start` and the next record in `text`.
///
/// The csv reader drops these silently; they still count as rows with no fields.
fn blank_lines(text: &str, start: usize, end: usize) -> usize {
    let bytes = text.as_bytes();
    let mut gap = &bytes[start..end];
    // a CRLF terminator can be split across two reads
    if start > 0 && bytes[start - 1] == b'\r' && gap.first() == Some(&b'\n') {
        gap = &gap[1..];
    }
    gap.iter()
        .take_while(|b| matches!(b, b'\n' | b'\r'))
        .filter(|&&b| b == b'\n')
        .count()
}

/// Parse classification rows from any reader.
///
/// The first row is dropped without being counted if [`is_header_row`] says so,
/// otherwise it is treated as data like every other row. A blank line is a row
/// too: it is skipped, and when it comes first no header is looked for.
pub fn read_records<R: Read>(mut reader: R) -> std::result::Result<LoadedRows, csv::Error> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    // offsets below are into `text`, so the BOM must not reach the csv reader
    let text = buf.strip_prefix('\u{feff}').unwrap_or(&buf);

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // trailing columns vary between exports
        .from_reader(text.as_bytes());

    let mut loaded = LoadedRows::default();
    let mut record = StringRecord::new();
    let mut consumed = 0;
    let mut first_row = true;

    while rdr.read_record(&mut record)? {
        let end = rdr.position().byte() as usize;
        let blanks = blank_lines(text, consumed, end);
        consumed = end;

        if blanks > 0 {
            debug!(count = blanks, reason = ?SkipReason::TooFewFields, "skipping blank lines");
            loaded.skipped += blanks;
            first_row = false;
        }

        if first_row {
            first_row = false;
            if is_header_row(&record) {
                info!("header row detected, skipping");
                loaded.header_detected = true;
                continue;
            }
        }

        match check_row(&record) {
            RowCheck::Valid(rec) => loaded.records.push(rec),
            RowCheck::Skip(reason) => {
                let line = record.position().map(|p| p.line());
                debug!(?line, ?reason, "skipping row");
                loaded.skipped += 1;
            }
        }
    }

    let trailing = blank_lines(text, consumed, text.len());
    if trailing > 0 {
        debug!(count = trailing, "skipping trailing blank lines");
        loaded.skipped += trailing;
    }

    Ok(loaded)
}

/// Open `path` and read every classification row from it.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<LoadedRows> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => ConvertError::InputRead {
            path: path.to_path_buf(),
            source: e.into(),
        },
    })?;

    let loaded = read_records(file).map_err(|source| ConvertError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;

    if loaded.is_empty() {
        return Err(ConvertError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    info!(
        records = loaded.records.len(),
        skipped = loaded.skipped,
        "loaded CSV"
    );
    Ok(loaded)
}
