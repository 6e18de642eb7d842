//! The host-directory mount.

use std::path::PathBuf;

use crate::adapter::clean_path;
use crate::{
    BackedFile, Errno, File, FileSystem, HostBacking, OpenFlags, Permissions, Result, Stat,
    Timestamps, sys,
};

/// A [`FileSystem`] rooted at a host directory.
///
/// Guest paths are lexically normalized and joined under the root before any
/// host call; everything else is delegated to the host and its error codes
/// are normalized to [`Errno`]. On Windows every handle is additionally
/// wrapped in [`WindowsFile`](crate::WindowsFile) to repair directory
/// snapshot and write error quirks.
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// Mounts the host directory at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn host_path(&self, path: &str) -> PathBuf {
        let cleaned = rooted_clean(path);
        if cleaned == "." {
            self.root.clone()
        } else {
            self.root.join(cleaned)
        }
    }
}

/// Normalizes a guest path as if rooted, so `..` clamps at the mount root
/// instead of escaping into the host parent directory.
fn rooted_clean(path: &str) -> String {
    if path.starts_with('/') {
        clean_path(path)
    } else {
        clean_path(&format!("/{path}"))
    }
}

impl FileSystem for DirFs {
    fn open_file(&self, path: &str, flags: OpenFlags, perm: Permissions) -> Result<Box<dyn File>> {
        let cleaned = rooted_clean(path);
        let host = self.host_path(path);
        let file = sys::open_options(flags, perm)
            .open(&host)
            .map_err(Errno::from)?;
        let handle: Box<dyn File> = Box::new(BackedFile::new(
            cleaned.clone(),
            flags.access_mode(),
            Box::new(HostBacking::new(file, host.clone())),
        ));
        #[cfg(windows)]
        let handle: Box<dyn File> = Box::new(crate::WindowsFile::new(
            handle,
            Box::new(move || {
                let reopened = sys::open_options(flags, perm)
                    .open(&host)
                    .map_err(Errno::from)?;
                Ok(Box::new(BackedFile::new(
                    cleaned.clone(),
                    flags.access_mode(),
                    Box::new(HostBacking::new(reopened, host.clone())),
                )) as Box<dyn File>)
            }),
        ));
        Ok(handle)
    }

    fn stat(&self, path: &str) -> Result<Stat> {
        let meta = std::fs::metadata(self.host_path(path)).map_err(Errno::from)?;
        Ok(Stat::from(&meta))
    }

    fn lstat(&self, path: &str) -> Result<Stat> {
        let meta = std::fs::symlink_metadata(self.host_path(path)).map_err(Errno::from)?;
        Ok(Stat::from(&meta))
    }

    fn readlink(&self, path: &str) -> Result<String> {
        let target = std::fs::read_link(self.host_path(path)).map_err(Errno::from)?;
        Ok(target.to_string_lossy().into_owned())
    }

    fn mkdir(&self, path: &str, perm: Permissions) -> Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(perm.mode());
        }
        #[cfg(not(unix))]
        let _ = perm;
        builder.create(self.host_path(path)).map_err(Errno::from)
    }

    fn rmdir(&self, path: &str) -> Result<()> {
        std::fs::remove_dir(self.host_path(path)).map_err(Errno::from)
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        std::fs::rename(self.host_path(from), self.host_path(to)).map_err(Errno::from)
    }

    fn link(&self, old: &str, new: &str) -> Result<()> {
        std::fs::hard_link(self.host_path(old), self.host_path(new)).map_err(Errno::from)
    }

    fn symlink(&self, target: &str, link: &str) -> Result<()> {
        #[cfg(unix)]
        {
            // The target is stored verbatim; it is resolved at use, not here.
            std::os::unix::fs::symlink(target, self.host_path(link)).map_err(Errno::from)
        }
        #[cfg(not(unix))]
        {
            let _ = (target, link);
            Err(Errno::NotSupported)
        }
    }

    fn unlink(&self, path: &str) -> Result<()> {
        std::fs::remove_file(self.host_path(path)).map_err(Errno::from)
    }

    fn chmod(&self, path: &str, perm: Permissions) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                self.host_path(path),
                std::fs::Permissions::from_mode(perm.mode()),
            )
            .map_err(Errno::from)
        }
        #[cfg(not(unix))]
        {
            let _ = (path, perm);
            Err(Errno::NotSupported)
        }
    }

    fn chown(&self, path: &str, uid: u32, gid: u32) -> Result<()> {
        #[cfg(unix)]
        {
            sys::unix::chown(&self.host_path(path), uid, gid, true).map_err(Errno::from)
        }
        #[cfg(not(unix))]
        {
            let _ = (path, uid, gid);
            Err(Errno::NotSupported)
        }
    }

    fn lchown(&self, path: &str, uid: u32, gid: u32) -> Result<()> {
        #[cfg(unix)]
        {
            sys::unix::chown(&self.host_path(path), uid, gid, false).map_err(Errno::from)
        }
        #[cfg(not(unix))]
        {
            let _ = (path, uid, gid);
            Err(Errno::NotSupported)
        }
    }

    fn utimens(&self, path: &str, times: Option<&Timestamps>, follow_symlinks: bool) -> Result<()> {
        #[cfg(unix)]
        {
            sys::unix::utimensat(&self.host_path(path), times, follow_symlinks)
                .map_err(Errno::from)
        }
        #[cfg(not(unix))]
        {
            let _ = (path, times, follow_symlinks);
            Err(Errno::NotSupported)
        }
    }

    fn truncate(&self, path: &str, size: i64) -> Result<()> {
        if size < 0 {
            return Err(Errno::InvalidArgument);
        }
        // Opening for write makes the host produce the right errno for
        // directories and missing paths.
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(self.host_path(path))
            .map_err(Errno::from)?;
        file.set_len(size as u64).map_err(Errno::from)
    }
}
