// src/table.rs
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use tracing::{debug, info};

use crate::normalize::composite_key;
use crate::process::{LoadedRows, Record};

/// Processed entries echoed to the log while building.
const LOGGED_ENTRIES: usize = 5;

/// Risk factor for a municipality with no known class.
pub const UNKNOWN_RISK_FACTOR: f64 = 1.5;

/// Normalized `municipality_uf` key → classification code, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IcmTable(BTreeMap<String, String>);

impl IcmTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `class` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: String, class: String) -> Option<String> {
        self.0.insert(key, class)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a municipality by its display name and UF.
    pub fn lookup(&self, municipality: &str, uf: &str) -> Option<&str> {
        self.get(&composite_key(municipality, uf))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for IcmTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Row counts gathered while building a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Valid rows, overwritten ones included.
    pub processed: usize,
    pub skipped: usize,
    pub header_detected: bool,
}

/// Accumulates records into an [`IcmTable`]; later keys win.
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: IcmTable,
    stats: ConversionStats,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &Record) {
        let key = composite_key(&record.municipality, &record.uf);
        if let Some(previous) = self.table.insert(key.clone(), record.class.clone()) {
            debug!(key = %key, previous = %previous, class = %record.class, "overwriting entry");
        }
        self.stats.processed += 1;

        if self.stats.processed <= LOGGED_ENTRIES {
            info!(key = %key, class = %record.class, "processed");
        }
    }

    pub fn skip(&mut self) {
        self.stats.skipped += 1;
    }

    pub fn finish(self) -> (IcmTable, ConversionStats) {
        (self.table, self.stats)
    }
}

/// Build the table from everything the parser produced.
pub fn build_table(loaded: &LoadedRows) -> (IcmTable, ConversionStats) {
    let mut builder = TableBuilder::new();
    for record in &loaded.records {
        builder.push(record);
    }
    for _ in 0..loaded.skipped {
        builder.skip();
    }

    let (table, mut stats) = builder.finish();
    stats.header_detected = loaded.header_detected;
    (table, stats)
}

/// The known ICM classes, best (A) to worst (D) emergency response capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IcmClass {
    A,
    B,
    C,
    D,
}

impl IcmClass {
    /// Exact match only: `"b"` or `" C "` are not known classes.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }

    /// Additional risk contributed by this class; A adds none.
    pub fn risk_factor(self) -> f64 {
        match self {
            Self::A => 0.0,
            Self::B => 1.0,
            Self::C => 2.0,
            Self::D => 3.0,
        }
    }
}

impl fmt::Display for IcmClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(s)
    }
}

/// Risk factor for an optional classification code; unknown codes get [`UNKNOWN_RISK_FACTOR`].
pub fn risk_factor(code: Option<&str>) -> f64 {
    code.and_then(IcmClass::parse)
        .map(IcmClass::risk_factor)
        .unwrap_or(UNKNOWN_RISK_FACTOR)
}
