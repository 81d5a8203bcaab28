//! Isolated temporary filesystem for scaffolded projects.
//!
//! The `Sandbox` wraps a `tempfile::TempDir` and confines every path it
//! touches to that root. Relative paths are resolved against the root and
//! rejected if they are absolute or traverse out of it, so a misbehaving
//! test cannot write outside its own fixture. The backing directory is
//! removed when the sandbox is dropped.

use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::SandboxError;

pub struct Sandbox {
    temp_dir: TempDir,
}

impl Sandbox {
    /// Allocate a fresh temporary root.
    pub fn new() -> Result<Self, SandboxError> {
        let temp_dir = TempDir::new().map_err(SandboxError::Create)?;
        debug!(root = %temp_dir.path().display(), "sandbox created");
        Ok(Self { temp_dir })
    }

    /// The absolute root of the sandbox.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve a relative path against the sandbox root.
    ///
    /// Absolute inputs and paths containing `..` components are rejected;
    /// the sandbox root is the sole writable area.
    pub fn resolve<P: AsRef<Path>>(&self, relative: P) -> Result<PathBuf, SandboxError> {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            return Err(SandboxError::AbsolutePath(relative.to_path_buf()));
        }
        for component in relative.components() {
            if matches!(component, Component::ParentDir) {
                return Err(SandboxError::PathEscape(relative.to_path_buf()));
            }
        }
        Ok(self.root().join(relative))
    }

    /// Create a directory (and any missing parents) under the root.
    /// Returns the absolute path.
    pub fn mkdir<P: AsRef<Path>>(&self, relative: P) -> Result<PathBuf, SandboxError> {
        let path = self.resolve(relative)?;
        std::fs::create_dir_all(&path).map_err(|e| SandboxError::CreateDirectory {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Write text content to a file under the root, creating parent
    /// directories as needed. Returns the absolute path.
    pub fn write<P: AsRef<Path>>(&self, relative: P, content: &str) -> Result<PathBuf, SandboxError> {
        let path = self.resolve(relative)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SandboxError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&path, content).map_err(|e| SandboxError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Create an empty file under the root. Returns the absolute path.
    pub fn touch<P: AsRef<Path>>(&self, relative: P) -> Result<PathBuf, SandboxError> {
        self.write(relative, "")
    }

    /// Read a file under the root into a string.
    pub fn read<P: AsRef<Path>>(&self, relative: P) -> Result<String, SandboxError> {
        let path = self.resolve(relative)?;
        std::fs::read_to_string(&path).map_err(|e| SandboxError::ReadFile { path, source: e })
    }

    /// Whether a path exists under the root.
    pub fn exists<P: AsRef<Path>>(&self, relative: P) -> bool {
        self.resolve(relative).map(|p| p.exists()).unwrap_or(false)
    }

    /// List all files under the root (recursively), as paths relative to it.
    pub fn list_files(&self) -> Vec<PathBuf> {
        walkdir::WalkDir::new(self.root())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(self.root())
                    .ok()
                    .map(|p| p.to_path_buf())
            })
            .collect()
    }

    /// Remove everything under the root while keeping the root itself, so a
    /// fresh project can be scaffolded into the same sandbox.
    pub fn clean(&self) -> Result<(), SandboxError> {
        let root = self.root().to_path_buf();
        let entries = std::fs::read_dir(&root).map_err(|e| SandboxError::Cleanup {
            path: root.clone(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| SandboxError::Cleanup {
                path: root.clone(),
                source: e,
            })?;
            let path = entry.path();
            let result = if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            result.map_err(|e| SandboxError::Cleanup {
                path: path.clone(),
                source: e,
            })?;
        }
        debug!(root = %root.display(), "sandbox cleaned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read_round_trip() {
        let sandbox = Sandbox::new().unwrap();
        let path = sandbox.write("conf/base/settings.txt", "hello").unwrap();

        assert!(path.is_absolute());
        assert!(path.starts_with(sandbox.root()));
        assert_eq!(sandbox.read("conf/base/settings.txt").unwrap(), "hello");
    }

    #[test]
    fn rejects_absolute_paths() {
        let sandbox = Sandbox::new().unwrap();
        let err = sandbox.write("/etc/passwd", "nope").unwrap_err();
        assert!(matches!(err, SandboxError::AbsolutePath(_)));
    }

    #[test]
    fn rejects_parent_traversal() {
        let sandbox = Sandbox::new().unwrap();
        let err = sandbox.resolve("../outside.txt").unwrap_err();
        assert!(matches!(err, SandboxError::PathEscape(_)));
    }

    #[test]
    fn clean_empties_but_keeps_root() {
        let sandbox = Sandbox::new().unwrap();
        sandbox.write("a/b/c.txt", "x").unwrap();
        sandbox.write("top.txt", "y").unwrap();

        sandbox.clean().unwrap();

        assert!(sandbox.root().exists());
        assert!(sandbox.list_files().is_empty());
    }

    #[test]
    fn list_files_returns_relative_paths() {
        let sandbox = Sandbox::new().unwrap();
        sandbox.write("data/input.csv", "a,b").unwrap();

        let files = sandbox.list_files();
        assert_eq!(files, vec![PathBuf::from("data/input.csv")]);
    }
}
