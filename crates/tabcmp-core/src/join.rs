//! Full outer join of two key indexes

use crate::index::{CompositeKey, KeyIndex};
use serde::{Deserialize, Serialize};

/// Membership of a joined row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    LeftOnly,
    RightOnly,
    Both,
}

/// One output row of the outer join. Row indices point into the left and
/// right tables respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinedRow<'a> {
    LeftOnly { key: &'a CompositeKey, left: usize },
    RightOnly { key: &'a CompositeKey, right: usize },
    Both { key: &'a CompositeKey, left: usize, right: usize },
}

impl<'a> JoinedRow<'a> {
    /// Composite key shared by the row
    pub fn key(&self) -> &'a CompositeKey {
        match self {
            JoinedRow::LeftOnly { key, .. }
            | JoinedRow::RightOnly { key, .. }
            | JoinedRow::Both { key, .. } => *key,
        }
    }

    pub fn membership(&self) -> Membership {
        match self {
            JoinedRow::LeftOnly { .. } => Membership::LeftOnly,
            JoinedRow::RightOnly { .. } => Membership::RightOnly,
            JoinedRow::Both { .. } => Membership::Both,
        }
    }
}

/// Full outer join with left precedence.
///
/// Left keys come first in their first-seen order. A key present on both sides
/// yields every (left, right) pair, left-major. Right keys absent from the left
/// follow in their own first-seen order. The row count equals that of a
/// relational full outer join.
pub fn outer_join<'a>(left: &'a KeyIndex, right: &'a KeyIndex) -> Vec<JoinedRow<'a>> {
    let mut rows = Vec::new();

    for (key, left_rows) in left.iter() {
        match right.get(key) {
            Some(right_rows) => {
                for &l in left_rows {
                    for &r in right_rows {
                        rows.push(JoinedRow::Both {
                            key,
                            left: l,
                            right: r,
                        });
                    }
                }
            }
            None => {
                rows.extend(left_rows.iter().map(|&l| JoinedRow::LeftOnly { key, left: l }));
            }
        }
    }

    for (key, right_rows) in right.iter() {
        if left.contains(key) {
            continue;
        }
        rows.extend(
            right_rows
                .iter()
                .map(|&r| JoinedRow::RightOnly { key, right: r }),
        );
    }

    rows
}
