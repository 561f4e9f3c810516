use std::collections::HashMap;

/// Rows scanned when looking for the header.
pub const HEADER_SCAN_ROWS: usize = 50;

/// Decode file bytes as UTF-8, falling back to latin-1.
pub fn decode_text(content: Vec<u8>) -> String {
    match String::from_utf8(content) {
        Ok(text) => text,
        // Latin-1: each byte maps to the same Unicode code point.
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Find the header row among the first rows of a sheet.
///
/// Lab exports often carry a few lines of preamble (sample id, operator,
/// date) above the real table. The header is the bottom-most row, within
/// `max_rows`, that has the most common row width and whose cells are all
/// non-empty text (no numbers, no dates). Falls back to row 0.
pub fn detect_header_row(rows: &[Vec<String>], max_rows: usize) -> usize {
    let scanned: Vec<&Vec<String>> = rows
        .iter()
        .take(max_rows)
        .collect();

    if scanned.is_empty() {
        return 0;
    }

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for row in &scanned {
        *counts.entry(used_width(row)).or_insert(0) += 1;
    }
    // Ties resolve to the wider row so a one-cell preamble never wins.
    let most_common = counts
        .into_iter()
        .max_by_key(|&(len, c)| (c, len))
        .map(|(len, _)| len)
        .unwrap_or(0);
    if most_common == 0 {
        return 0;
    }

    for i in (0..scanned.len()).rev() {
        let row = scanned[i];
        if used_width(row) != most_common {
            continue;
        }
        let is_header = row[..most_common].iter().all(|cell| {
            let trimmed = cell.trim();
            !trimmed.is_empty() && trimmed.parse::<f64>().is_err() && !is_date_like(trimmed)
        });
        if is_header {
            return i;
        }
    }

    0
}

/// Width of a row ignoring trailing empty cells.
fn used_width(row: &[String]) -> usize {
    row.iter()
        .rposition(|c| !c.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(0)
}

fn is_date_like(s: &str) -> bool {
    let has_separators = s.contains('/') || s.contains(':') || s.contains('-');
    if !has_separators {
        return false;
    }

    use chrono::{NaiveDate, NaiveDateTime};
    const FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%d/%m/%Y",
    ];
    FORMATS.iter().any(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt).is_ok() || NaiveDate::parse_from_str(s, fmt).is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn header_on_first_row() {
        let data = rows(&[
            &["Grain Size (mm)", "Weight (%)"],
            &["2.0", "5"],
            &["1.0", "15"],
        ]);
        assert_eq!(detect_header_row(&data, HEADER_SCAN_ROWS), 0);
    }

    #[test]
    fn header_below_preamble() {
        let data = rows(&[
            &["Sample", "BH-3 12.4 m"],
            &["Sieved", "2024-05-17"],
            &["", ""],
            &["Size", "Weight"],
            &["2.0", "5"],
            &["1.0", "15"],
            &["0.5", "25"],
        ]);
        assert_eq!(detect_header_row(&data, HEADER_SCAN_ROWS), 3);
    }

    #[test]
    fn headerless_data_defaults_to_zero() {
        let data = rows(&[&["2.0", "5"], &["1.0", "15"]]);
        assert_eq!(detect_header_row(&data, HEADER_SCAN_ROWS), 0);
        assert_eq!(detect_header_row(&[], HEADER_SCAN_ROWS), 0);
    }

    #[test]
    fn latin1_fallback() {
        let text = decode_text(vec![b'G', 0xE9, b'o']);
        assert_eq!(text, "G\u{e9}o");
        assert_eq!(decode_text(b"plain".to_vec()), "plain");
    }

    #[test]
    fn dates_are_not_headers() {
        assert!(is_date_like("2024-05-17"));
        assert!(is_date_like("05/17/2024"));
        assert!(!is_date_like("Weight (%)"));
    }
}
