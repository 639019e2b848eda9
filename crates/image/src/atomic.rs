//! Safe in-place writes.
//!
//! Every operation may be asked to write over the file it just read. When the
//! source and destination resolve to the same file, output is staged in a
//! temporary file next to the destination and renamed over it only once the
//! write succeeded. An uncommitted stage is deleted when the guard drops.

use crate::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Where an operation should write its output.
#[derive(Debug)]
pub struct WriteTarget {
    destination: PathBuf,
    staged: Option<TempPath>,
}

impl WriteTarget {
    /// Prepare a write of `destination` for an operation that read `source`.
    ///
    /// Creates the destination's parent directories first.
    pub fn prepare(source: &Path, destination: &Path) -> Result<Self> {
        let parent = parent_dir(destination);
        fs::create_dir_all(parent)?;

        if !paths_equivalent(source, destination)? {
            return Ok(Self {
                destination: destination.to_path_buf(),
                staged: None,
            });
        }

        // Replace the file behind any symlink, not the link itself.
        let destination = resolve(destination)?;

        // Same extension as the destination so format sniffing by name still works.
        let suffix = destination
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let staged = tempfile::Builder::new()
            .prefix(".imgtools-")
            .suffix(&suffix)
            .tempfile_in(parent_dir(&destination))?
            .into_temp_path();

        tracing::debug!(
            destination = %destination.display(),
            staged = %staged.display(),
            "staging in-place write"
        );

        Ok(Self {
            destination,
            staged: Some(staged),
        })
    }

    /// Path the caller should write into.
    pub fn path(&self) -> &Path {
        self.staged.as_deref().unwrap_or(&self.destination)
    }

    /// Final destination, with symlinks resolved when staged.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Whether writes go through a temporary file.
    pub fn is_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Publish the output, atomically replacing the destination when staged.
    pub fn commit(mut self) -> Result<PathBuf> {
        let destination = std::mem::take(&mut self.destination);
        if let Some(staged) = self.staged.take() {
            // On failure the returned TempPath is dropped, which removes it.
            staged.persist(&destination).map_err(|e| e.error)?;
            tracing::debug!(destination = %destination.display(), "committed staged write");
        }
        Ok(destination)
    }
}

impl Drop for WriteTarget {
    fn drop(&mut self) {
        let Some(staged) = self.staged.take() else {
            return;
        };
        match staged.close() {
            Ok(()) => {
                tracing::debug!(destination = %self.destination.display(), "discarded staged write");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    destination = %self.destination.display(),
                    error = %e,
                    "failed to remove staged file"
                );
            }
        }
    }
}

/// Run `body` against a write target for `destination`, committing on success.
///
/// If `body` or the commit fails, any staged file is removed and the original
/// destination is left untouched.
pub fn with_write_target<T, F>(source: &Path, destination: &Path, body: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let target = WriteTarget::prepare(source, destination)?;
    let value = body(target.path())?;
    target.commit()?;
    Ok(value)
}

/// Whether two paths name the same file once symlinks are resolved.
///
/// A path that does not exist yet is resolved through its parent directory.
pub fn paths_equivalent(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(resolve(a)? == resolve(b)?)
}

fn resolve(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let Some(name) = path.file_name() else {
                return Ok(path.to_path_buf());
            };
            Ok(fs::canonicalize(parent_dir(path))
                .map(|parent| parent.join(name))
                .unwrap_or_else(|_| path.to_path_buf()))
        }
        Err(e) => Err(e),
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageError;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_distinct_paths_write_directly() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.png");
        let destination = dir.path().join("out.png");
        fs::write(&source, b"source").unwrap();

        let target = WriteTarget::prepare(&source, &destination).unwrap();
        assert!(!target.is_staged());
        assert_eq!(target.path(), destination);
    }

    #[test]
    fn test_same_path_is_staged_beside_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpeg");
        fs::write(&source, b"original").unwrap();

        let target = WriteTarget::prepare(&source, &source).unwrap();
        assert!(target.is_staged());
        assert_ne!(target.path(), source);
        assert_eq!(
            target.path().parent().unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
        assert_eq!(target.path().extension().unwrap(), "jpeg");
    }

    #[test]
    fn test_commit_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("image.png");
        fs::write(&source, b"original").unwrap();

        let written = with_write_target(&source, &source, |target| {
            fs::write(target, b"replacement")?;
            Ok(42)
        })
        .unwrap();

        assert_eq!(written, 42);
        assert_eq!(fs::read(&source).unwrap(), b"replacement");
        assert_eq!(entries(dir.path()), vec!["image.png"]);
    }

    #[test]
    fn test_failure_leaves_original_and_no_stray_files() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("image.png");
        fs::write(&source, b"original bytes").unwrap();

        let result: Result<()> = with_write_target(&source, &source, |target| {
            fs::write(target, b"half")?;
            Err(ImageError::InvalidData("encoder blew up".into()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&source).unwrap(), b"original bytes");
        assert_eq!(entries(dir.path()), vec!["image.png"]);
    }

    #[test]
    fn test_cleanup_tolerates_missing_stage() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("image.png");
        fs::write(&source, b"original").unwrap();

        let target = WriteTarget::prepare(&source, &source).unwrap();
        fs::remove_file(target.path()).unwrap();
        drop(target);

        assert_eq!(entries(dir.path()), vec!["image.png"]);
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.png");
        fs::write(&source, b"source").unwrap();
        let destination = dir.path().join("nested/deeper/out.png");

        with_write_target(&source, &destination, |target| {
            fs::write(target, b"out")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"out");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_alias_is_staged() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.png");
        let alias = dir.path().join("alias.png");
        fs::write(&real, b"original").unwrap();
        std::os::unix::fs::symlink(&real, &alias).unwrap();

        assert!(paths_equivalent(&real, &alias).unwrap());
        let target = WriteTarget::prepare(&real, &alias).unwrap();
        assert!(target.is_staged());
        assert_eq!(target.destination(), fs::canonicalize(&real).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_alias_commit_updates_real_file() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.png");
        let alias = dir.path().join("alias.png");
        fs::write(&real, b"original").unwrap();
        std::os::unix::fs::symlink(&real, &alias).unwrap();

        with_write_target(&real, &alias, |target| {
            fs::write(target, b"replacement")?;
            Ok(())
        })
        .unwrap();

        assert!(fs::symlink_metadata(&alias).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&real).unwrap(), b"replacement");
        assert_eq!(entries(dir.path()), vec!["alias.png", "real.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_into_other_directory_staged_beside_real_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("store")).unwrap();
        fs::create_dir(dir.path().join("links")).unwrap();
        let real = dir.path().join("store/real.png");
        let alias = dir.path().join("links/alias.png");
        fs::write(&real, b"original").unwrap();
        std::os::unix::fs::symlink(&real, &alias).unwrap();

        let target = WriteTarget::prepare(&alias, &alias).unwrap();
        assert_eq!(
            target.path().parent().unwrap(),
            fs::canonicalize(dir.path().join("store")).unwrap()
        );
    }

    #[test]
    fn test_equivalence_through_dot_segments() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let plain = dir.path().join("new.png");
        let dotted = dir.path().join("sub/../new.png");

        assert!(paths_equivalent(&plain, &dotted).unwrap());
    }
}
