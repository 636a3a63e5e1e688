//! Named comparison profiles ("file types")
//!
//! A profile file is a JSON object mapping a type name to its join columns,
//! excluded columns and separator:
//!
//! ```json
//! {
//!   "orders": { "join_cols": ["region", "id"], "exclude_cols": ["loaded_at"], "sep": ";" }
//! }
//! ```

use crate::compare::CompareOptions;
use crate::error::{Error, Result};
use crate::parser::parse_delimiter;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default profile file name, looked up in the working directory
pub const DEFAULT_PROFILE_FILE: &str = "file_types_config.json";

fn default_sep() -> String {
    ",".to_string()
}

/// Join/exclude/separator settings for one file type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Join columns, in key order
    #[serde(default)]
    pub join_cols: Vec<String>,
    /// Columns left out of the comparison
    #[serde(default)]
    pub exclude_cols: Vec<String>,
    /// Field separator
    #[serde(default = "default_sep")]
    pub sep: String,
}

impl Profile {
    /// Resolve into run options
    pub fn to_options(&self) -> Result<CompareOptions> {
        let delimiter = parse_delimiter(&self.sep)?;
        Ok(CompareOptions::new(self.join_cols.clone())
            .exclude(self.exclude_cols.clone())
            .delimiter(delimiter))
    }
}

/// All profiles from one profile file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(skip)]
    path: PathBuf,
    #[serde(flatten)]
    profiles: IndexMap<String, Profile>,
}

impl ProfileFile {
    /// Load a profile file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut file: ProfileFile = serde_json::from_str(&content)?;
        file.path = path.to_path_buf();
        Ok(file)
    }

    /// Look up a profile by type name
    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.profiles.get(name).ok_or_else(|| Error::ProfileNotFound {
            name: name.to_string(),
            path: self.path.clone(),
        })
    }

    /// Type names in file order
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }
}
