//! Comparison runs: index both tables, join them, compare, aggregate

use crate::aggregator::{Aggregator, Report, DEFAULT_SAMPLE_LIMIT};
use crate::comparator::{compare_records, ComparePlan, ValuePolicy};
use crate::error::{Error, Result};
use crate::index::KeyIndex;
use crate::join::{outer_join, JoinedRow};
use crate::parser::{parse_csv, DEFAULT_DELIMITER};
use crate::table::{Side, Table};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Join columns, in key order. Must not be empty.
    pub join_cols: Vec<String>,
    /// Columns left out of the comparison
    pub exclude_cols: Vec<String>,
    /// Field delimiter used to read both inputs
    pub delimiter: u8,
    /// How cell values are judged equal
    pub policy: ValuePolicy,
    /// Samples kept per column
    pub sample_limit: usize,
    /// Row difference records kept
    pub row_limit: usize,
}

impl CompareOptions {
    /// Options with defaults for everything but the join columns
    pub fn new(join_cols: Vec<String>) -> Self {
        Self {
            join_cols,
            exclude_cols: Vec::new(),
            delimiter: DEFAULT_DELIMITER,
            policy: ValuePolicy::default(),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            row_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }

    pub fn exclude(mut self, exclude_cols: Vec<String>) -> Self {
        self.exclude_cols = exclude_cols;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn policy(mut self, policy: ValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn limits(mut self, sample_limit: usize, row_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self.row_limit = row_limit;
        self
    }
}

/// Split a comma-separated column list, trimming names and dropping blanks
pub fn parse_column_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read two delimited files and compare them
pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
    left: P,
    right: Q,
    options: &CompareOptions,
) -> Result<Report> {
    if options.join_cols.is_empty() {
        return Err(Error::EmptyJoinKey);
    }

    let left = parse_csv(left, options.delimiter)?;
    let right = parse_csv(right, options.delimiter)?;
    compare_tables(&left, &right, options)
}

/// Compare two loaded tables
pub fn compare_tables(left: &Table, right: &Table, options: &CompareOptions) -> Result<Report> {
    let left_index = KeyIndex::build(left, &options.join_cols, Side::Left)?;
    let right_index = KeyIndex::build(right, &options.join_cols, Side::Right)?;
    let plan = ComparePlan::build(left, right, &options.join_cols, &options.exclude_cols)?;

    for (index, table) in [(&left_index, left), (&right_index, right)] {
        if let Some(key) = index.duplicate_keys().next() {
            log::warn!(
                "{} has duplicate join keys (first: {:?}); matching rows are paired one-to-many",
                table.source_path.display(),
                key
            );
        }
    }
    if !plan.left_only_columns.is_empty() {
        log::warn!(
            "columns only in {} are not compared: {}",
            left.source_path.display(),
            plan.left_only_columns.join(", ")
        );
    }
    if !plan.right_only_columns.is_empty() {
        log::warn!(
            "columns only in {} are not compared: {}",
            right.source_path.display(),
            plan.right_only_columns.join(", ")
        );
    }

    let rows = outer_join(&left_index, &right_index);
    log::debug!(
        "outer join produced {} rows over {} compare columns",
        rows.len(),
        plan.columns.len()
    );

    let mut aggregator = Aggregator::with_limits(
        &options.join_cols,
        &plan,
        options.sample_limit,
        options.row_limit,
    );

    for row in &rows {
        match *row {
            JoinedRow::LeftOnly { key, .. } => aggregator.record_unmatched(key, Side::Left)?,
            JoinedRow::RightOnly { key, .. } => aggregator.record_unmatched(key, Side::Right)?,
            JoinedRow::Both {
                key,
                left: l,
                right: r,
            } => {
                let diffs = compare_records(&left.rows[l], &right.rows[r], &plan, options.policy);
                aggregator.record_pair(key, &diffs)?;
            }
        }
    }

    aggregator.finalize()
}
