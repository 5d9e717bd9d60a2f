use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Platform-specific locations for config and data files.
///
/// Follows XDG base directories on Linux, `~/Library/Application Support`
/// on macOS and `%APPDATA%` on Windows.
pub struct ProjectPaths {
    dirs: ProjectDirs,
}

impl ProjectPaths {
    /// Returns `None` when no home directory can be determined.
    pub fn new(name: &str) -> Option<Self> {
        ProjectDirs::from("", "", name).map(|dirs| ProjectPaths { dirs })
    }

    pub fn config_dir(&self) -> &Path {
        self.dirs.config_dir()
    }

    pub fn data_dir(&self) -> &Path {
        self.dirs.data_dir()
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_contain_name() {
        if let Some(paths) = ProjectPaths::new("icerunner") {
            assert!(paths.config_dir().to_string_lossy().contains("icerunner"));
            assert!(paths.data_dir().to_string_lossy().contains("icerunner"));
            assert!(paths.log_dir().ends_with("logs"));
        }
    }
}
