//! Delimited-text parser producing a [`Table`]

use crate::error::{Error, Result};
use crate::table::{Column, Record, Table};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';

/// Turn a user-supplied separator into a delimiter byte.
///
/// Accepts any single ASCII character, plus the spellings `\t` and `tab`.
pub fn parse_delimiter(sep: &str) -> Result<u8> {
    match sep {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }

    let mut chars = sep.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(Error::InvalidDelimiter(sep.to_string())),
    }
}

/// Parse a delimited file into a Table
pub fn parse_csv<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_reader(BufReader::new(file), delimiter, path.to_path_buf())
}

/// Parse delimited text from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str, delimiter: u8) -> Result<Table> {
    parse_reader(content.as_bytes(), delimiter, PathBuf::from(source_name))
}

/// Parse delimited text from any reader. The first line is the header; every
/// following line must have exactly as many fields.
pub fn parse_reader<R: Read>(reader: R, delimiter: u8, path: PathBuf) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        // Field counts are checked below so the error can carry a line number
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| Column::new(name.to_string(), i))
        .collect();

    if columns.is_empty() {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in header".to_string(),
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for col in &columns {
        if !seen.insert(col.name.as_str()) {
            return Err(Error::CsvParse {
                path,
                message: format!("duplicate column name '{}' in header", col.name),
            });
        }
    }

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if record.len() != columns.len() {
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(row_idx as u64 + 2);
            return Err(Error::FieldCount {
                path,
                line,
                expected: columns.len(),
                found: record.len(),
            });
        }

        rows.push(Record::new(record.iter().map(str::to_string).collect()));
    }

    log::debug!(
        "parsed {} rows x {} columns from {}",
        rows.len(),
        columns.len(),
        path.display()
    );

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}
