use anyhow::{Context, Result};
use clap::Parser;
use icmconvert::{
    convert::{DEFAULT_INPUT, DEFAULT_OUTPUT},
    convert, logging, ConvertOptions, OutputFormat,
};
use std::path::PathBuf;
use tracing::info;

/// Convert the ICM classification CSV into a lookup table for the risk map.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// CSV with `UF,municipality,class` rows
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Destination artifact
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Js)]
    format: OutputFormat,

    /// Leave out the `debugICMData()` block
    #[arg(long)]
    no_debug: bool,
}

fn main() -> Result<()> {
    logging::init_logging("info");
    let args = Args::parse();

    let opts = ConvertOptions {
        input: args.input,
        output: args.output,
        format: args.format,
        diagnostics: !args.no_debug,
    };
    info!(input = %opts.input.display(), output = %opts.output.display(), format = ?opts.format, "startup");

    let report = convert(&opts).with_context(|| {
        format!(
            "converting {} to {}",
            opts.input.display(),
            opts.output.display()
        )
    })?;

    println!("{}", report);
    Ok(())
}
