// src/output/json.rs
use crate::error::{ConvertError, Result};
use crate::table::IcmTable;

/// Pretty-printed object with a trailing newline.
pub fn render(table: &IcmTable) -> Result<String> {
    let mut text = serde_json::to_string_pretty(table)?;
    text.push('\n');
    Ok(text)
}

pub fn parse(text: &str) -> Result<IcmTable> {
    serde_json::from_str(text).map_err(|e| ConvertError::ArtifactParse {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn renders_sorted_object() -> Result<()> {
        let table: IcmTable = [("saopaulo_sp", "B"), ("itabirito_mg", "C")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let text = render(&table)?;
        assert_eq!(
            text,
            "{\n  \"itabirito_mg\": \"C\",\n  \"saopaulo_sp\": \"B\"\n}\n"
        );
        assert_eq!(parse(&text)?, table);
        Ok(())
    }

    #[test]
    fn empty_table() -> Result<()> {
        let text = render(&IcmTable::new())?;
        assert_eq!(text, "{}\n");
        assert!(parse(&text)?.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(parse("{\"itabirito_mg\": 1}").is_err());
    }
}
