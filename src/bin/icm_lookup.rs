use anyhow::{Context, Result};
use clap::Parser;
use icmconvert::{composite_key, load_table, logging, output, risk_factor, IcmTable};
use std::path::{Path, PathBuf};

/// Resolve one municipality against the CSV or a generated artifact.
#[derive(Parser, Debug)]
struct Args {
    /// `.csv`, `.js` or `.json`
    #[arg(long, default_value = icmconvert::convert::DEFAULT_OUTPUT)]
    source: PathBuf,

    #[arg(long)]
    municipality: String,

    #[arg(long)]
    uf: String,
}

fn load(source: &Path) -> Result<IcmTable> {
    let is_csv = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let table = if is_csv {
        load_table(source).map(|(table, _)| table)
    } else {
        output::read_artifact(source)
    };
    table.with_context(|| format!("loading {}", source.display()))
}

fn main() -> Result<()> {
    logging::init_logging("warn");
    let args = Args::parse();

    let table = load(&args.source)?;
    let key = composite_key(&args.municipality, &args.uf);
    let class = table.get(&key);

    println!("key:         {}", key);
    println!("class:       {}", class.unwrap_or("N/A"));
    println!("risk factor: {}", risk_factor(class));
    Ok(())
}
