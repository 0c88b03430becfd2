use std::{io, path::PathBuf};

/// Errors that abort a conversion or lookup.
///
/// Malformed rows are not errors; they are counted and skipped by
/// [`crate::process`].
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input CSV does not exist.
    #[error("{} not found (expected the CSV next to where the tool is run)", path.display())]
    MissingInput { path: PathBuf },

    /// The input CSV holds no rows at all.
    #[error("{} is empty", path.display())]
    EmptyInput { path: PathBuf },

    /// Any other failure while reading the input: I/O, invalid UTF-8, CSV syntax.
    #[error("reading CSV {}: {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The artifact could not be written to its destination.
    #[error("writing {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The table could not be serialized.
    #[error("rendering artifact: {0}")]
    Render(#[from] serde_json::Error),

    /// A generated artifact did not contain a readable table.
    #[error("parsing artifact: {reason}")]
    ArtifactParse { reason: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
