use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 130 * 1024 * 1024;
pub const DEFAULT_MAX_FILENAME_LEN: usize = 255;

/// Limits applied to input documents before they are split
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Config {
    /// Largest input PDF accepted, in bytes
    #[arg(
        long,
        global = true,
        env = "PDFSPLIT_MAX_FILE_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE
    )]
    pub max_file_size: u64,

    /// Longest input file name accepted, in characters
    #[arg(
        long,
        global = true,
        env = "PDFSPLIT_MAX_FILENAME_LEN",
        default_value_t = DEFAULT_MAX_FILENAME_LEN
    )]
    pub max_filename_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_filename_len: DEFAULT_MAX_FILENAME_LEN,
        }
    }
}

impl Config {
    /// Check that `path` names an acceptable PDF and return its size
    pub fn check_input(&self, path: &Path) -> Result<u64> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("No file name in path: {}", path.display()))?;

        if !file_name.to_ascii_lowercase().ends_with(".pdf") {
            anyhow::bail!("Only PDF files are allowed: {}", file_name);
        }

        if file_name.chars().count() > self.max_filename_len {
            anyhow::bail!(
                "Filename too long ({} characters, limit is {})",
                file_name.chars().count(),
                self.max_filename_len
            );
        }

        let size = std::fs::metadata(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?
            .len();
        if size > self.max_file_size {
            anyhow::bail!(
                "File size exceeds maximum allowed size of {}MB",
                self.max_file_size / (1024 * 1024)
            );
        }

        Ok(size)
    }
}
