// src/convert.rs
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::error::Result;
use crate::output::{self, OutputFormat};
use crate::process;
use crate::table::{build_table, ConversionStats, IcmTable};

pub const DEFAULT_INPUT: &str = "icm_combined.csv";
pub const DEFAULT_OUTPUT: &str = "icm_data.js";

/// Entries shown in the summary.
const SAMPLE_ENTRIES: usize = 3;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Append the self-running `debugICMData()` block to scripts.
    pub diagnostics: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::Js,
            diagnostics: true,
        }
    }
}

/// Outcome of one run, printed as the closing summary.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub stats: ConversionStats,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub entries: usize,
    pub bytes_written: u64,
    pub sample: Vec<(String, String)>,
}

/// Read the CSV into a table without writing anything.
pub fn load_table<P: AsRef<Path>>(input: P) -> Result<(IcmTable, ConversionStats)> {
    let loaded = process::load_records(input)?;
    Ok(build_table(&loaded))
}

/// CSV in, artifact out.
#[tracing::instrument(level = "info", skip(opts), fields(input = %opts.input.display(), output = %opts.output.display()))]
pub fn convert(opts: &ConvertOptions) -> Result<ConversionReport> {
    info!("converting");
    let (table, stats) = load_table(&opts.input)?;

    let text = output::render(&table, opts.format, opts.diagnostics)?;
    let bytes_written = output::write_artifact(&opts.output, &text)?;

    let sample = table
        .iter()
        .take(SAMPLE_ENTRIES)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Ok(ConversionReport {
        stats,
        output: opts.output.clone(),
        format: opts.format,
        entries: table.len(),
        bytes_written,
        sample,
    })
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "✔ Conversion complete")?;
        writeln!(f, "  processed: {} municipalities", self.stats.processed)?;
        writeln!(f, "  skipped:   {} rows", self.stats.skipped)?;
        writeln!(f, "  entries:   {}", self.entries)?;
        writeln!(f, "  output:    {}", self.output.display())?;
        writeln!(f, "  size:      {} bytes", self.bytes_written)?;

        writeln!(f)?;
        writeln!(f, "Sample entries:")?;
        for (key, class) in &self.sample {
            writeln!(f, "  {} -> {}", key, class)?;
        }

        if self.format == OutputFormat::Js {
            let file = self
                .output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.output.display().to_string());
            writeln!(f)?;
            writeln!(f, "Next steps:")?;
            writeln!(f, "  1. Include in your HTML: <script src='{}'></script>", file)?;
            writeln!(f, "  2. The table is available as window.icmData")?;
            match self.sample.first() {
                Some((key, class)) => {
                    writeln!(f, "  3. Test: window.icmData['{}'] should return '{}'", key, class)?
                }
                None => writeln!(f, "  3. Test: window.icmData['itabirito_mg']")?,
            }
        }
        Ok(())
    }
}
