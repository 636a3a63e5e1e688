//! Composite-key index over one table

use crate::error::{Error, Result};
use crate::table::{Side, Table};
use indexmap::IndexMap;

/// Raw join-column values of one record, in join-spec order
pub type CompositeKey = Vec<String>;

/// Maps each composite key to the rows sharing it.
///
/// Keys iterate in first-seen order; row indices under a key are ascending.
#[derive(Debug, Clone)]
pub struct KeyIndex {
    groups: IndexMap<CompositeKey, Vec<usize>>,
}

impl KeyIndex {
    /// Index `table` by `join_cols`. Every join column must exist in the table.
    pub fn build(table: &Table, join_cols: &[String], side: Side) -> Result<Self> {
        if join_cols.is_empty() {
            return Err(Error::EmptyJoinKey);
        }

        let positions = join_cols
            .iter()
            .map(|name| {
                table
                    .find_column(name)
                    .map(|c| c.index)
                    .ok_or_else(|| Error::JoinColumnNotFound {
                        column: name.clone(),
                        side,
                    })
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut groups: IndexMap<CompositeKey, Vec<usize>> = IndexMap::new();
        for (row_idx, record) in table.rows.iter().enumerate() {
            let key: CompositeKey = positions
                .iter()
                .map(|&p| record.get(p).unwrap_or_default().to_string())
                .collect();
            groups.entry(key).or_default().push(row_idx);
        }

        log::debug!(
            "indexed {} {} rows into {} keys",
            table.row_count(),
            side,
            groups.len()
        );

        Ok(Self { groups })
    }

    /// Rows sharing `key`, if any
    pub fn get(&self, key: &[String]) -> Option<&[usize]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &[String]) -> bool {
        self.groups.contains_key(key)
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    /// Keys with more than one row
    pub fn duplicate_keys(&self) -> impl Iterator<Item = &CompositeKey> {
        self.groups
            .iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(key, _)| key)
    }

    /// Iterate keys and their rows in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&CompositeKey, &[usize])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
