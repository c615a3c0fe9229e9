//! Filesystem access behind a trait.
//!
//! Config loading, local checkouts and report export go through
//! [`FileSystem`] so tests can swap in an in-memory [`mock::MockFs`].

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write `content`, creating the file and any missing parent folders.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// The real disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Shared [`RealFs`] for call sites without an injected filesystem.
pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}


#[cfg(test)]
mod tests {
    use super::mock::MockFs;
    use super::*;

    #[test]
    fn test_mock_fs_read_write() {
        let fs = MockFs::new();
        let path = Path::new("/repo/.gitnav.toml");
        assert!(!fs.exists(path));
        assert!(fs.read_to_string(path).is_err());

        fs.write(path, "[cache]\nttl_minutes = 5\n").unwrap();
        assert!(fs.exists(path));
        assert_eq!(fs.read_to_string(path).unwrap(), "[cache]\nttl_minutes = 5\n");
    }

    #[test]
    fn test_real_fs_creates_parent_folders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/demo-analysis.md");
        RealFs::new().write(&path, "# demo\n").unwrap();
        assert_eq!(RealFs::new().read_to_string(&path).unwrap(), "# demo\n");
    }
}
