//! Column comparison for matched record pairs

use crate::error::{Error, Result};
use crate::table::{CellValue, Decimal, Record, Side, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How two cell values are judged equal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuePolicy {
    /// Raw text must match byte for byte. `1` and `1.0` differ, as do `a` and `a `.
    #[default]
    Exact,
    /// Cells are compared by value: `1` equals `1.0`, surrounding whitespace
    /// is ignored, empty equals empty. Decimal literals compare exactly, never
    /// through a rounded float; anything else falls back to [`CellValue::parse`].
    Typed,
}

impl ValuePolicy {
    /// Whether `a` and `b` are considered equal under this policy
    pub fn equal(self, a: &str, b: &str) -> bool {
        match self {
            ValuePolicy::Exact => a == b,
            ValuePolicy::Typed => match (Decimal::parse(a), Decimal::parse(b)) {
                (Some(x), Some(y)) => x == y,
                _ => CellValue::parse(a).same_value(&CellValue::parse(b)),
            },
        }
    }
}

impl FromStr for ValuePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(ValuePolicy::Exact),
            "typed" => Ok(ValuePolicy::Typed),
            other => Err(format!(
                "unknown value policy '{}', expected 'exact' or 'typed'",
                other
            )),
        }
    }
}

impl fmt::Display for ValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuePolicy::Exact => write!(f, "exact"),
            ValuePolicy::Typed => write!(f, "typed"),
        }
    }
}

/// A compare column resolved to its position in each input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparedColumn {
    pub name: String,
    pub left_index: usize,
    pub right_index: usize,
}

/// The fixed set of columns compared during one run
#[derive(Debug, Clone, Default)]
pub struct ComparePlan {
    /// Columns compared, in left header order
    pub columns: Vec<ComparedColumn>,
    /// Non-key columns only present in the left input
    pub left_only_columns: Vec<String>,
    /// Non-key columns only present in the right input
    pub right_only_columns: Vec<String>,
}

impl ComparePlan {
    /// Derive the compare columns: left columns minus join columns minus
    /// excluded columns, restricted to those the right input also has.
    ///
    /// Every excluded column must exist in both inputs.
    pub fn build(
        left: &Table,
        right: &Table,
        join_cols: &[String],
        exclude_cols: &[String],
    ) -> Result<Self> {
        for col in exclude_cols {
            for (side, table) in [(Side::Left, left), (Side::Right, right)] {
                if !table.has_column(col) {
                    return Err(Error::ExcludeColumnNotFound {
                        column: col.clone(),
                        side,
                    });
                }
            }
        }

        let skipped: HashSet<&str> = join_cols
            .iter()
            .chain(exclude_cols.iter())
            .map(String::as_str)
            .collect();

        let mut plan = ComparePlan::default();
        for col in &left.columns {
            if skipped.contains(col.name.as_str()) {
                continue;
            }
            match right.find_column(&col.name) {
                Some(r) => plan.columns.push(ComparedColumn {
                    name: col.name.clone(),
                    left_index: col.index,
                    right_index: r.index,
                }),
                None => plan.left_only_columns.push(col.name.clone()),
            }
        }

        plan.right_only_columns = right
            .columns
            .iter()
            .filter(|c| !skipped.contains(c.name.as_str()) && !left.has_column(&c.name))
            .map(|c| c.name.clone())
            .collect();

        Ok(plan)
    }

    /// Names of the compared columns, in order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// One differing cell of a matched pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDiff<'a> {
    pub column: &'a str,
    pub value1: &'a str,
    pub value2: &'a str,
}

/// Compare a matched (left, right) pair over the planned columns. An empty
/// result means the pair is identical.
pub fn compare_records<'a>(
    left: &'a Record,
    right: &'a Record,
    plan: &'a ComparePlan,
    policy: ValuePolicy,
) -> Vec<CellDiff<'a>> {
    plan.columns
        .iter()
        .filter_map(|col| {
            let value1 = left.get(col.left_index)?;
            let value2 = right.get(col.right_index)?;
            if policy.equal(value1, value2) {
                None
            } else {
                Some(CellDiff {
                    column: &col.name,
                    value1,
                    value2,
                })
            }
        })
        .collect()
}
