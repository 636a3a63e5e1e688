//! Core table types for representing one loaded input

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which of the two compared inputs something belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A parsed table from a single delimited-text source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions, in header order. Names are unique.
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<Record>,
    /// Source file path (or a label for in-memory sources)
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    /// Column names in header order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Raw value of a named column in a given row
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.find_column(column)?;
        self.rows.get(row).and_then(|r| r.get(col.index))
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as written in the header
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// One row of one input. Cells are positional against the table's columns and
/// hold the raw text exactly as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Raw cell text for each column
    pub cells: Vec<String>,
}

impl Record {
    /// Create a new record
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Get a cell's raw text by column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// A cell value with type detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        // Try parsing as integer first
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }

        CellValue::String(trimmed.to_string())
    }

    /// Value equality across numeric representations: `1` equals `1.0`,
    /// NaN equals NaN, numbers never equal strings.
    pub fn same_value(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (CellValue::Integer(i), CellValue::Float(f))
            | (CellValue::Float(f), CellValue::Integer(i)) => float_equals_integer(*f, *i),
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Empty, CellValue::Empty) => true,
            _ => false,
        }
    }
}

/// True only when `f` is integral and converts to exactly `i`
fn float_equals_integer(f: f64, i: i64) -> bool {
    // i64::MIN as f64 is exactly -2^63, i64::MAX as f64 rounds up to 2^63
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 && f as i64 == i
}

/// Exact value of a finite decimal literal such as `12`, `-0.50` or `1.2e3`.
///
/// Stored as sign, significant digits without leading or trailing zeros, and a
/// power-of-ten exponent, so two literals are equal iff they denote the same
/// number, however many digits they carry. Zero is always non-negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Decimal {
    /// Parse a decimal literal, ignoring surrounding whitespace. Returns `None`
    /// for anything else, including `NaN` and `inf`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (negative, rest) = match s.as_bytes().first()? {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(pos) => (&rest[..pos], rest[pos + 1..].parse::<i64>().ok()?),
            None => (rest, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return None;
        }

        let joined = format!("{int_part}{frac_part}");
        let without_trailing = joined.trim_end_matches('0');
        let trailing = i64::try_from(joined.len() - without_trailing.len()).ok()?;
        let frac_len = i64::try_from(frac_part.len()).ok()?;
        let digits = without_trailing.trim_start_matches('0');

        if digits.is_empty() {
            return Some(Self {
                negative: false,
                digits: String::new(),
                exponent: 0,
            });
        }

        Some(Self {
            negative,
            digits: digits.to_string(),
            exponent: exponent.checked_sub(frac_len)?.checked_add(trailing)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_parse_integer() {
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse("-123"), CellValue::Integer(-123));
        assert_eq!(CellValue::parse(" 7 "), CellValue::Integer(7));
    }

    #[test]
    fn test_cell_value_parse_float() {
        assert_eq!(CellValue::parse("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::parse("1.0"), CellValue::Float(1.0));
    }

    #[test]
    fn test_cell_value_parse_string_and_empty() {
        assert_eq!(
            CellValue::parse("0xABCD"),
            CellValue::String("0xABCD".to_string())
        );
        assert_eq!(CellValue::parse(""), CellValue::Empty);
        assert_eq!(CellValue::parse("   "), CellValue::Empty);
    }

    #[test]
    fn test_same_value_across_numeric_types() {
        assert!(CellValue::Integer(1).same_value(&CellValue::Float(1.0)));
        assert!(CellValue::Float(f64::NAN).same_value(&CellValue::Float(f64::NAN)));
        assert!(CellValue::Empty.same_value(&CellValue::Empty));
        assert!(!CellValue::Integer(1).same_value(&CellValue::String("1".to_string())));
        assert!(!CellValue::Integer(1).same_value(&CellValue::Empty));
        assert!(!CellValue::Float(1.5).same_value(&CellValue::Integer(1)));
    }

    #[test]
    fn test_same_value_does_not_round_large_integers() {
        // 2^53 + 1 has no f64 representation and rounds to 2^53
        let float = CellValue::Float(9007199254740992.0);
        assert!(!CellValue::Integer(9007199254740993).same_value(&float));
        assert!(CellValue::Integer(9007199254740992).same_value(&float));
        assert!(!CellValue::Integer(i64::MAX).same_value(&CellValue::Float(i64::MAX as f64)));
    }

    #[test]
    fn test_decimal_parse() {
        let d = |s: &str| Decimal::parse(s);
        assert_eq!(d("1"), d("1.0"));
        assert_eq!(d("100"), d("1e2"));
        assert_eq!(d("0.5"), d(".50"));
        assert_eq!(d("007"), d("+7"));
        assert_eq!(d("-0"), d("0.000"));
        assert_eq!(d(" 2.5 "), d("25E-1"));
        assert_ne!(d("1"), d("-1"));
        assert_ne!(d("9223372036854775808"), d("9223372036854775809"));
        assert_ne!(d("9007199254740993"), d("9007199254740992.0"));
        assert_eq!(d("9007199254740993"), d("9007199254740993.000"));

        for not_decimal in ["", ".", "abc", "1e", "1.2.3", "NaN", "inf", "--1", "0x1F"] {
            assert_eq!(d(not_decimal), None, "{not_decimal:?}");
        }
    }

    #[test]
    fn test_table_value_lookup() {
        let mut table = Table::new(PathBuf::from("t.csv"));
        table.columns = vec![
            Column::new("id".to_string(), 0),
            Column::new("name".to_string(), 1),
        ];
        table
            .rows
            .push(Record::new(vec!["1".to_string(), "a".to_string()]));

        assert_eq!(table.value(0, "name"), Some("a"));
        assert_eq!(table.value(0, "missing"), None);
        assert_eq!(table.value(5, "id"), None);
        assert!(table.has_column("id"));
        assert_eq!(table.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Left.to_string(), "left");
        assert_eq!(Side::Right.to_string(), "right");
    }
}
