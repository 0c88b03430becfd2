// src/output/mod.rs
pub mod js;
pub mod json;

use clap::ValueEnum;
use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use tempfile::Builder;
use tracing::info;

use crate::error::{ConvertError, Result};
use crate::table::IcmTable;

/// Kind of artifact the table is written as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Browser script assigning `window.icmData`.
    #[default]
    Js,
    /// Plain JSON object.
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension; anything but `.json` is a script.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Js,
        }
    }
}

/// Render `table` as an artifact. The diagnostic block only applies to scripts.
pub fn render(table: &IcmTable, format: OutputFormat, with_diagnostics: bool) -> Result<String> {
    match format {
        OutputFormat::Js => Ok(js::render(table, with_diagnostics)),
        OutputFormat::Json => json::render(table),
    }
}

/// Inverse of [`render`].
pub fn parse_artifact(text: &str, format: OutputFormat) -> Result<IcmTable> {
    match format {
        OutputFormat::Js => js::parse(text),
        OutputFormat::Json => json::parse(text),
    }
}

/// Read a previously generated artifact back into a table.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<IcmTable> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => ConvertError::InputRead {
            path: path.to_path_buf(),
            source: e.into(),
        },
    })?;

    let table = parse_artifact(&text, OutputFormat::from_path(path))?;
    info!(entries = table.len(), "loaded artifact");
    Ok(table)
}

/// Write `contents` to `path` through a temp file in the same directory,
/// so the destination is either the old file or the complete new one.
///
/// Returns the number of bytes written.
#[tracing::instrument(level = "info", skip(path, contents), fields(path = %path.as_ref().display()))]
pub fn write_artifact<P: AsRef<Path>>(path: P, contents: &str) -> Result<u64> {
    let path = path.as_ref();
    let wrap = |source: io::Error| ConvertError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // the temp file would otherwise land owner-only (0600)
    let existing = fs::metadata(path).ok().map(|m| m.permissions());
    let mut builder = Builder::new();
    if let Some(perms) = create_permissions(existing.as_ref()) {
        builder.permissions(perms);
    }

    let mut tmp = builder.tempfile_in(dir).map_err(wrap)?;
    if let Some(perms) = existing {
        // creation mode is masked by the umask; restore the old mode exactly
        tmp.as_file().set_permissions(perms).map_err(wrap)?;
    }
    tmp.write_all(contents.as_bytes()).map_err(wrap)?;
    tmp.as_file().sync_all().map_err(wrap)?;
    tmp.persist(path).map_err(|e| wrap(e.error))?;

    let bytes = contents.len() as u64;
    info!(bytes, "wrote artifact");
    Ok(bytes)
}

/// Mode the temp file is created with: the destination's, or 0644 for a new file.
#[cfg(unix)]
fn create_permissions(existing: Option<&fs::Permissions>) -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(
        existing
            .cloned()
            .unwrap_or_else(|| fs::Permissions::from_mode(0o644)),
    )
}

#[cfg(not(unix))]
fn create_permissions(existing: Option<&fs::Permissions>) -> Option<fs::Permissions> {
    existing.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn sample() -> IcmTable {
        [("itabirito_mg", "C"), ("saopaulo_sp", "B")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("icm_data.js")), OutputFormat::Js);
        assert_eq!(OutputFormat::from_path(Path::new("out/icm.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("icm_data")), OutputFormat::Js);
    }

    #[test]
    fn every_format_round_trips() -> Result<()> {
        let table = sample();
        for format in [OutputFormat::Js, OutputFormat::Json] {
            for with_diagnostics in [true, false] {
                let text = render(&table, format, with_diagnostics)?;
                assert_eq!(parse_artifact(&text, format)?, table);
            }
        }
        Ok(())
    }

    #[test]
    fn write_then_read_back() -> Result<()> {
        let dir = tempdir()?;
        for name in ["icm_data.js", "icm_data.json"] {
            let path = dir.path().join(name);
            let text = render(&sample(), OutputFormat::from_path(&path), true)?;

            let bytes = write_artifact(&path, &text)?;
            assert_eq!(bytes, fs::metadata(&path)?.len());
            assert_eq!(read_artifact(&path)?, sample());
        }
        Ok(())
    }

    #[test]
    fn write_replaces_existing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("icm_data.js");
        fs::write(&path, "stale")?;

        write_artifact(&path, "fresh")?;
        assert_eq!(fs::read_to_string(&path)?, "fresh");
        // no temp files left behind
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_existing_permissions() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        for mode in [0o644, 0o640] {
            let path = dir.path().join(format!("icm_data_{:o}.js", mode));
            fs::write(&path, "stale")?;
            fs::set_permissions(&path, fs::Permissions::from_mode(mode))?;

            write_artifact(&path, "fresh")?;
            assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, mode);
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn new_artifact_is_world_readable_under_umask() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        // a plainly created file shows what the current umask allows
        let plain = dir.path().join("plain");
        fs::write(&plain, "")?;
        let allowed = fs::metadata(&plain)?.permissions().mode() & 0o777;

        let path = dir.path().join("icm_data.js");
        write_artifact(&path, "fresh")?;
        assert_eq!(
            fs::metadata(&path)?.permissions().mode() & 0o777,
            allowed & 0o644
        );
        Ok(())
    }

    #[test]
    fn unwritable_destination() -> Result<()> {
        let dir = tempdir()?;
        let path: PathBuf = dir.path().join("missing").join("icm_data.js");

        let err = write_artifact(&path, "x").unwrap_err();
        assert!(matches!(err, ConvertError::OutputWrite { .. }));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn missing_artifact() -> Result<()> {
        let dir = tempdir()?;
        let err = read_artifact(dir.path().join("icm_data.js")).unwrap_err();
        assert!(matches!(err, ConvertError::MissingInput { .. }));
        Ok(())
    }
}
