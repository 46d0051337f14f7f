//! Planned filesystem changes, previewed before they are applied.

use camino::Utf8PathBuf;
use std::fs;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsPlanKind {
    Dir,
    File { contents: String, executable: bool },
}

/// A directory or file that will be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsPlan {
    pub path: Utf8PathBuf,
    pub kind: FsPlanKind,
}

impl FsPlan {
    pub fn dir(path: Utf8PathBuf) -> Self {
        Self {
            path,
            kind: FsPlanKind::Dir,
        }
    }

    pub fn file(path: Utf8PathBuf, contents: String) -> Self {
        Self {
            path,
            kind: FsPlanKind::File {
                contents,
                executable: false,
            },
        }
    }

    pub fn executable(path: Utf8PathBuf, contents: String) -> Self {
        Self {
            path,
            kind: FsPlanKind::File {
                contents,
                executable: true,
            },
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, FsPlanKind::File { .. })
    }

    pub fn is_executable(&self) -> bool {
        matches!(
            self.kind,
            FsPlanKind::File {
                executable: true,
                ..
            }
        )
    }

    /// `[F ]`, `[Fx]` or `[D ]`.
    pub fn label(&self) -> &'static str {
        match (self.is_file(), self.is_executable()) {
            (true, true) => "[Fx]",
            (true, false) => "[F ]",
            (false, _) => "[D ]",
        }
    }

    /// Create the entry, including missing parents. Existing files are overwritten.
    pub fn apply(&self) -> io::Result<()> {
        match &self.kind {
            FsPlanKind::Dir => fs::create_dir_all(&self.path),
            FsPlanKind::File {
                contents,
                executable,
            } => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, contents)?;
                if *executable {
                    make_executable(&self.path)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(unix)]
fn make_executable(path: &camino::Utf8Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &camino::Utf8Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(FsPlan::dir("/a".into()).label(), "[D ]");
        assert_eq!(FsPlan::file("/a".into(), String::new()).label(), "[F ]");
        assert_eq!(FsPlan::executable("/a".into(), String::new()).label(), "[Fx]");
    }

    #[test]
    fn test_apply_dir_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("a/b/c");
        FsPlan::dir(path.clone()).apply().unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_apply_file_writes_contents() {
        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("x/y.txt");
        FsPlan::file(path.clone(), "hello".to_string()).apply().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_apply_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("run.sh");
        FsPlan::executable(path.clone(), "#!/usr/bin/bash\n".to_string())
            .apply()
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_ne!(mode & 0o100, 0);
    }
}
