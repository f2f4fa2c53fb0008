use crate::error::{AdminError, Result};
use tracing::warn;

/// A decoded tabular payload: header row plus data rows whose field count
/// matches the header's.
#[derive(Debug, Clone)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of a header column, if present
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Tab wins when the first line contains one; comma otherwise
pub fn sniff_delimiter(first_line: &str) -> char {
    if first_line.contains('\t') {
        '\t'
    } else {
        ','
    }
}

/// Quote-aware field splitting. A field may be wrapped in double quotes;
/// a doubled quote inside a quoted field is an escaped quote; the delimiter
/// is literal while a quote is open. Every field is trimmed.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Decodes CSV/TSV text into a [`Table`]. Blank lines are dropped up front;
/// rows whose field count does not match the header are skipped with a
/// warning and processing continues.
pub fn parse_table(text: &str) -> Result<Table> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let Some(first_line) = lines.first() else {
        return Err(AdminError::UnrecognizedFormat(
            "input contains no non-blank lines".to_string(),
        ));
    };

    let delimiter = sniff_delimiter(first_line);
    let header = split_line(first_line, delimiter);

    let mut rows = Vec::new();
    for (index, line) in lines.iter().enumerate().skip(1) {
        let fields = split_line(line, delimiter);
        if fields.len() != header.len() {
            warn!(
                "Skipping line {}: expected {} fields, found {}",
                index + 1,
                header.len(),
                fields.len()
            );
            continue;
        }
        rows.push(fields);
    }

    Ok(Table { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_tab_over_comma() {
        assert_eq!(sniff_delimiter("name\tmonth"), '\t');
        assert_eq!(sniff_delimiter("name,month"), ',');
    }

    #[test]
    fn escaped_quote_decodes_to_single_quote() {
        let fields = split_line(r#""a""b",plain"#, ',');
        assert_eq!(fields, vec![r#"a"b"#, "plain"]);
    }

    #[test]
    fn delimiter_inside_quotes_is_literal() {
        let fields = split_line(r#""1,8,15",x"#, ',');
        assert_eq!(fields, vec!["1,8,15", "x"]);
    }

    #[test]
    fn fields_are_trimmed() {
        let fields = split_line("  a , b\t,c  ", ',');
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn comma_and_tab_content_decode_identically() {
        let comma = parse_table("name,month\n中央区,2025-04\n北区,2025-05").unwrap();
        let tab = parse_table("name\tmonth\n中央区\t2025-04\n北区\t2025-05").unwrap();
        assert_eq!(comma.header, tab.header);
        assert_eq!(comma.rows, tab.rows);
    }

    #[test]
    fn mismatched_row_is_skipped_and_parsing_continues() {
        let table = parse_table("a,b,c,d,e\n1,2,3,4\n1,2,3,4,5").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0], vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn blank_lines_are_dropped_before_processing() {
        let table = parse_table("a,b\n\n1,2\n   \n3,4\n").unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_table("\n  \n").is_err());
    }
}
