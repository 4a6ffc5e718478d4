use std::env;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::actions::MANIFEST_FILE_NAME;

/// Where to look for the action manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ManifestBase {
    /// The process working directory.
    #[default]
    WorkingDirectory,
    /// The directory holding the running executable.
    ExecutableDirectory,
    Explicit(PathBuf),
}

impl ManifestBase {
    /// Directory that should contain the manifest.
    pub fn resolve_dir(&self) -> io::Result<PathBuf> {
        match self {
            ManifestBase::WorkingDirectory => env::current_dir(),
            ManifestBase::ExecutableDirectory => {
                let exe = env::current_exe()?;
                exe.parent().map(PathBuf::from).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("executable path {:?} has no parent directory", exe),
                    )
                })
            }
            ManifestBase::Explicit(dir) => Ok(dir.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub base: ManifestBase,
    pub file_name: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            base: ManifestBase::default(),
            file_name: MANIFEST_FILE_NAME.to_string(),
        }
    }
}

impl ManifestConfig {
    pub fn manifest_path(&self) -> io::Result<PathBuf> {
        Ok(self.base.resolve_dir()?.join(&self.file_name))
    }
}
