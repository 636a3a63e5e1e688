//! Accumulation of comparison results into a [`Report`]
//!
//! The [`Aggregator`] is fed one joined row at a time:
//! - one-sided rows through [`Aggregator::record_unmatched`]
//! - matched pairs, with their cell differences, through [`Aggregator::record_pair`]
//!
//! Counters are exact; samples and row records are capped and keep the
//! first entries in the order they were fed.

use crate::comparator::{CellDiff, ComparePlan};
use crate::error::{Error, Result};
use crate::join::Membership;
use crate::table::Side;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::mem;

/// Default cap for per-column samples and for row difference records
pub const DEFAULT_SAMPLE_LIMIT: usize = 10;

/// Join column name to raw key value, in join-spec order
pub type JoinValues = IndexMap<String, String>;

/// A single differing cell, with the key of the row it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDifference {
    /// Column the difference was found in. Samples are already grouped by
    /// column in the report, so it is not repeated in serialized output.
    #[serde(skip)]
    pub column: String,
    pub join: JoinValues,
    pub value1: String,
    pub value2: String,
}

/// A joined row that is not matched-and-identical
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowDifference {
    /// Key present on one side only
    Unmatched { join: JoinValues, status: Membership },
    /// Key present on both sides with at least one differing column
    Differing {
        join: JoinValues,
        diff: IndexMap<String, (String, String)>,
    },
}

impl RowDifference {
    /// Key of the row
    pub fn join(&self) -> &JoinValues {
        match self {
            RowDifference::Unmatched { join, .. } | RowDifference::Differing { join, .. } => join,
        }
    }
}

/// Final result of one comparison run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Joined rows processed (outer-join row count)
    pub total: usize,
    /// Matched rows with every compared column equal
    pub matched: usize,
    /// Rows that are one-sided or differ in at least one column
    pub unmatched: usize,
    /// Matched rows with at least one differing column
    pub differing: usize,
    /// Rows whose key only exists in the left input
    pub left_only: usize,
    /// Rows whose key only exists in the right input
    pub right_only: usize,
    /// Columns that were compared, in left header order
    pub compare_columns: Vec<String>,
    /// Non-key columns found only in the left input (never compared)
    pub left_only_columns: Vec<String>,
    /// Non-key columns found only in the right input (never compared)
    pub right_only_columns: Vec<String>,
    /// Difference count per compared column
    pub column_diff_counts: IndexMap<String, usize>,
    /// First differences per compared column
    pub column_differences: IndexMap<String, Vec<ColumnDifference>>,
    /// First one-sided or differing rows, in join order
    pub differences: Vec<RowDifference>,
}

impl Report {
    /// True when nothing is unmatched and no column differs
    pub fn is_identical(&self) -> bool {
        self.unmatched == 0
    }

    /// Difference count for a column, 0 for unknown columns
    pub fn diff_count(&self, column: &str) -> usize {
        self.column_diff_counts.get(column).copied().unwrap_or(0)
    }

    /// Samples for a column, empty for unknown columns
    pub fn samples(&self, column: &str) -> &[ColumnDifference] {
        self.column_differences
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Accumulating,
    Finalized,
}

/// Builds a [`Report`] from classified rows. Construct one per run.
#[derive(Debug)]
pub struct Aggregator {
    state: State,
    join_cols: Vec<String>,
    sample_limit: usize,
    row_limit: usize,
    report: Report,
}

impl Aggregator {
    /// Create an aggregator with the default limits
    pub fn new(join_cols: &[String], plan: &ComparePlan) -> Self {
        Self::with_limits(join_cols, plan, DEFAULT_SAMPLE_LIMIT, DEFAULT_SAMPLE_LIMIT)
    }

    /// Create an aggregator keeping at most `sample_limit` samples per column
    /// and `row_limit` row difference records
    pub fn with_limits(
        join_cols: &[String],
        plan: &ComparePlan,
        sample_limit: usize,
        row_limit: usize,
    ) -> Self {
        let compare_columns = plan.column_names();
        let report = Report {
            column_diff_counts: compare_columns.iter().map(|c| (c.clone(), 0)).collect(),
            column_differences: compare_columns
                .iter()
                .map(|c| (c.clone(), Vec::new()))
                .collect(),
            compare_columns,
            left_only_columns: plan.left_only_columns.clone(),
            right_only_columns: plan.right_only_columns.clone(),
            ..Report::default()
        };

        Self {
            state: State::Accumulating,
            join_cols: join_cols.to_vec(),
            sample_limit,
            row_limit,
            report,
        }
    }

    /// Whether [`finalize`](Self::finalize) has been called
    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    /// Record a row whose key only exists on `side`
    pub fn record_unmatched(&mut self, key: &[String], side: Side) -> Result<()> {
        self.ensure_accumulating()?;

        let status = match side {
            Side::Left => {
                self.report.left_only += 1;
                Membership::LeftOnly
            }
            Side::Right => {
                self.report.right_only += 1;
                Membership::RightOnly
            }
        };
        self.report.total += 1;
        self.report.unmatched += 1;

        if self.report.differences.len() < self.row_limit {
            let join = self.join_values(key);
            self.report
                .differences
                .push(RowDifference::Unmatched { join, status });
        }

        Ok(())
    }

    /// Record a matched pair and the cells in which it differs
    pub fn record_pair(&mut self, key: &[String], diffs: &[CellDiff<'_>]) -> Result<()> {
        self.ensure_accumulating()?;

        self.report.total += 1;
        if diffs.is_empty() {
            self.report.matched += 1;
            return Ok(());
        }

        self.report.differing += 1;
        self.report.unmatched += 1;

        let join = self.join_values(key);
        for diff in diffs {
            *self
                .report
                .column_diff_counts
                .entry(diff.column.to_string())
                .or_default() += 1;

            let samples = self
                .report
                .column_differences
                .entry(diff.column.to_string())
                .or_default();
            if samples.len() < self.sample_limit {
                samples.push(ColumnDifference {
                    column: diff.column.to_string(),
                    join: join.clone(),
                    value1: diff.value1.to_string(),
                    value2: diff.value2.to_string(),
                });
            }
        }

        if self.report.differences.len() < self.row_limit {
            let diff = diffs
                .iter()
                .map(|d| {
                    (
                        d.column.to_string(),
                        (d.value1.to_string(), d.value2.to_string()),
                    )
                })
                .collect();
            self.report
                .differences
                .push(RowDifference::Differing { join, diff });
        }

        Ok(())
    }

    /// Close the run and hand out the report. Only succeeds once.
    pub fn finalize(&mut self) -> Result<Report> {
        self.ensure_accumulating()?;
        self.state = State::Finalized;
        Ok(mem::take(&mut self.report))
    }

    fn ensure_accumulating(&self) -> Result<()> {
        match self.state {
            State::Accumulating => Ok(()),
            State::Finalized => Err(Error::AggregatorFinalized),
        }
    }

    fn join_values(&self, key: &[String]) -> JoinValues {
        self.join_cols
            .iter()
            .cloned()
            .zip(key.iter().cloned())
            .collect()
    }
}
