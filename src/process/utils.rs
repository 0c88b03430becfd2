/// Byte-order mark some spreadsheet exports put in front of the first cell.
const BOM: char = '\u{feff}';

/// Trim whitespace and a leading BOM from a raw CSV cell.
pub fn clean_field(raw: &str) -> &str {
    raw.trim_start_matches(BOM).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace_and_bom() {
        assert_eq!(clean_field("  MG "), "MG");
        assert_eq!(clean_field("\u{feff}UF"), "UF");
        assert_eq!(clean_field("\u{feff} SP\t"), "SP");
        assert_eq!(clean_field(""), "");
    }
}
