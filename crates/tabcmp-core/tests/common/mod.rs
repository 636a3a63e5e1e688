//! Common test utilities and helpers

use std::fs;
use std::path::{Path, PathBuf};
use tabcmp_core::{compare_files, CompareOptions, Report, Result};
use tempfile::TempDir;

/// Temporary directory holding the two inputs of a comparison
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a CSV file from rows of fields, joined with commas
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> PathBuf {
        let mut content = String::new();
        for row in data {
            content.push_str(&row.join(","));
            content.push('\n');
        }
        self.create_raw(name, &content)
    }

    /// Write a file with raw content
    pub fn create_raw(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).expect("write fixture file");
        path
    }

    /// Write both inputs and compare them
    pub fn compare(&self, left: &str, right: &str, options: &CompareOptions) -> Result<Report> {
        let left = self.create_raw("left.csv", left);
        let right = self.create_raw("right.csv", right);
        compare_files(left, right, options)
    }
}

pub fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// The four-way partition of joined rows must add up to the total
pub fn assert_partition(report: &Report) {
    assert_eq!(
        report.matched + report.differing + report.left_only + report.right_only,
        report.total,
        "partition does not cover total: {report:?}"
    );
    assert_eq!(report.matched + report.unmatched, report.total);
    assert_eq!(
        report.unmatched,
        report.differing + report.left_only + report.right_only
    );
}

/// Sample and row-record buffers respect their caps
pub fn assert_bounds(report: &Report, limit: usize) {
    for column in &report.compare_columns {
        assert_eq!(
            report.samples(column).len(),
            limit.min(report.diff_count(column)),
            "sample bound violated for column {column}"
        );
    }
    assert_eq!(report.differences.len(), limit.min(report.unmatched));
}
