//! tabcmp-core: Core library for reconciling two delimited-text tables
//!
//! This library provides functionality to:
//! - Parse CSV-like sources into tables of raw text records
//! - Index each table by a composite join key
//! - Full-outer-join the two indexes, pairing duplicate keys one-to-many
//! - Compare matched pairs column by column under an exact or typed value policy
//! - Aggregate counts and bounded difference samples into a [`Report`]
//! - Load named comparison profiles from a JSON file

pub mod aggregator;
pub mod compare;
pub mod comparator;
pub mod error;
pub mod index;
pub mod join;
pub mod parser;
pub mod profile;
pub mod table;

pub use aggregator::{Aggregator, ColumnDifference, Report, RowDifference, DEFAULT_SAMPLE_LIMIT};
pub use compare::{compare_files, compare_tables, parse_column_list, CompareOptions};
pub use comparator::{compare_records, CellDiff, ComparePlan, ValuePolicy};
pub use error::{Error, ErrorKind, Result};
pub use index::{CompositeKey, KeyIndex};
pub use join::{outer_join, JoinedRow, Membership};
pub use parser::{parse_csv, parse_csv_str, parse_delimiter, DEFAULT_DELIMITER};
pub use profile::{Profile, ProfileFile, DEFAULT_PROFILE_FILE};
pub use table::{CellValue, Column, Decimal, Record, Side, Table};
