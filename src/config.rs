use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Environment variable that overrides the catalog location.
pub const CATALOG_FILE_ENV: &str = "BOOKSHELF_FILE";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bookshelf";
/// Catalog file name stored inside the application data directory.
const CATALOG_FILE_NAME: &str = "books.jsonl";

/// Runtime settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: PathBuf,
}

impl Config {
    /// Resolve the catalog path from `BOOKSHELF_FILE`, falling back to the
    /// data directory inside the user's home.
    pub fn resolve() -> Result<Self> {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self::from_sources(env::var(CATALOG_FILE_ENV).ok(), home)
    }

    fn from_sources(override_path: Option<String>, home: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = override_path.filter(|p| !p.trim().is_empty()) {
            return Ok(Self {
                catalog_path: PathBuf::from(path),
            });
        }

        let home = home.ok_or_else(|| {
            anyhow!("could not locate home directory; set {CATALOG_FILE_ENV} instead")
        })?;
        Ok(Self {
            catalog_path: home.join(DATA_DIR_NAME).join(CATALOG_FILE_NAME),
        })
    }
}
