// src/output/js.rs
use serde_json::Value;

use crate::error::{ConvertError, Result};
use crate::table::IcmTable;

/// Global the browser map reads the table from.
pub const GLOBAL_NAME: &str = "window.icmData";

pub const PREAMBLE: &str = "\
// ICM Classification Data - Brazilian Municipalities
// Auto-generated from CSV data
// Format: normalized_municipality_uf -> ICM_Classification
";

/// Logs the entry count and a few keys as soon as the script is loaded.
pub const DIAGNOSTICS: &str = r#"
// Debug function to verify ICM data
function debugICMData() {
    console.log("ICM Data loaded:", Object.keys(window.icmData).length, "municipalities");
    console.log("Sample ICM entries:", Object.keys(window.icmData).slice(0, 5));
    console.log("ICM data ready for use!");
}

// Auto-run debug on load
debugICMData();
"#;

/// JSON string literals are valid JavaScript string literals.
fn js_string(s: &str) -> String {
    Value::from(s).to_string()
}

/// Preamble plus the `window.icmData = {...};` assignment, one entry per line.
pub fn render_table(table: &IcmTable) -> String {
    let mut out = String::with_capacity(PREAMBLE.len() + table.len() * 32);
    out.push_str(PREAMBLE);
    out.push('\n');
    out.push_str(&format!("{} = {{\n", GLOBAL_NAME));

    let last = table.len().saturating_sub(1);
    for (i, (key, class)) in table.iter().enumerate() {
        let comma = if i < last { "," } else { "" };
        out.push_str(&format!(
            "    {}: {}{}\n",
            js_string(key),
            js_string(class),
            comma
        ));
    }

    out.push_str("};\n");
    out
}

pub fn render(table: &IcmTable, with_diagnostics: bool) -> String {
    let mut out = render_table(table);
    if with_diagnostics {
        out.push_str(DIAGNOSTICS);
    }
    out
}

/// Recover the table from a script produced by [`render`].
pub fn parse(script: &str) -> Result<IcmTable> {
    let assignment = format!("{} = ", GLOBAL_NAME);
    let start = script
        .find(&assignment)
        .map(|i| i + assignment.len())
        .ok_or_else(|| ConvertError::ArtifactParse {
            reason: format!("no `{}` assignment found", GLOBAL_NAME),
        })?;

    let body = &script[start..];
    // entries never span lines, so the first `};` line closes the literal
    let end = body
        .find("\n};")
        .ok_or_else(|| ConvertError::ArtifactParse {
            reason: "unterminated object literal".to_string(),
        })?;

    serde_json::from_str(&body[..end + 2]).map_err(|e| ConvertError::ArtifactParse {
        reason: e.to_string(),
    })
}
