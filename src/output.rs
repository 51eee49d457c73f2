use crate::settings::{DuplicatePolicy, OutputSettings};
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("couldn't write file {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Directory the fetched sources are written to,
/// one `<name>.<extension>` file per contract.
#[derive(Debug, Clone)]
pub struct OutputDir {
    dir: PathBuf,
    extension: String,
    on_duplicate: DuplicatePolicy,
}

impl OutputDir {
    pub fn new(settings: &OutputSettings) -> Self {
        Self {
            dir: settings.dir.clone(),
            extension: settings.extension.clone(),
            on_duplicate: settings.on_duplicate,
        }
    }

    /// Makes sure the directory exists, creating it when `create_dir` is set.
    pub fn prepare(settings: &OutputSettings) -> anyhow::Result<Self> {
        let output = Self::new(settings);
        if settings.create_dir {
            std::fs::create_dir_all(&output.dir).context(format!(
                "creating output directory {}",
                output.dir.display()
            ))?;
        } else if !output.dir.is_dir() {
            return Err(anyhow!(
                "output directory {} does not exist",
                output.dir.display()
            ));
        }
        Ok(output)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn on_duplicate(&self) -> DuplicatePolicy {
        self.on_duplicate
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{name}.{}", self.extension))
        }
    }

    /// Writes `contents` for the contract, replacing any existing file.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf, WriteError> {
        let path = self.path_for(name);
        std::fs::write(&path, contents).map_err(|source| WriteError::File {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
