//! Host quirk shims that keep per-platform behavior out of the handle layer.

use std::time::Duration;

use crate::{
    AccessMode, Dirent, Errno, File, Permissions, Result, Stat, Timestamps, Whence,
};

/// Produces a fresh handle equivalent to the one being repaired.
pub type Reopen = Box<dyn FnMut() -> Result<Box<dyn File>> + Send>;

/// Repairs Windows-specific handle behavior.
///
/// A Windows directory handle snapshots its listing at open time, so entries
/// created after the open are invisible to it. The shim closes and reopens
/// the handle once, immediately before the first enumeration, which refreshes
/// the snapshot without changing observable cursor semantics. Windows also
/// reports `ERROR_ACCESS_DENIED` where POSIX systems report `EBADF` for
/// writes through an unwritable handle, so write paths remap
/// [`Errno::Access`] accordingly.
///
/// The shim is a plain [`File`] decorator and compiles on every platform;
/// only the Windows build of [`DirFs`](crate::DirFs) installs it.
pub struct WindowsFile {
    inner: Box<dyn File>,
    reopen: Reopen,
    dir_initialized: bool,
}

impl WindowsFile {
    /// Decorates `inner`. `reopen` must produce a handle opened from the
    /// same path with the same flags.
    pub fn new(inner: Box<dyn File>, reopen: Reopen) -> Self {
        Self {
            inner,
            reopen,
            dir_initialized: false,
        }
    }

    fn maybe_init_dir(&mut self) -> Result<()> {
        if self.dir_initialized {
            return Ok(());
        }
        self.inner.close()?;
        self.inner = (self.reopen)()?;
        self.dir_initialized = true;
        Ok(())
    }

    fn remap_write(errno: Errno) -> Errno {
        match errno {
            Errno::Access => Errno::BadDescriptor,
            errno => errno,
        }
    }
}

impl File for WindowsFile {
    fn path(&self) -> &str {
        self.inner.path()
    }

    fn access_mode(&self) -> AccessMode {
        self.inner.access_mode()
    }

    fn is_nonblock(&self) -> bool {
        self.inner.is_nonblock()
    }

    fn set_nonblock(&mut self, enable: bool) -> Result<()> {
        self.inner.set_nonblock(enable)
    }

    fn stat(&mut self) -> Result<Stat> {
        self.inner.stat()
    }

    fn is_dir(&mut self) -> Result<bool> {
        self.inner.is_dir()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner.read(buf)
    }

    fn pread(&mut self, buf: &mut [u8], offset: i64) -> Result<usize> {
        self.inner.pread(buf, offset)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.inner.seek(offset, whence)
    }

    fn poll_read(&mut self, timeout: Option<Duration>) -> Result<bool> {
        self.inner.poll_read(timeout)
    }

    fn readdir(&mut self, n: i64) -> Result<Vec<Dirent>> {
        // Non-directories must fail here untouched; reopening would reset
        // the handle's seek cursor as a side effect.
        if !self.inner.is_dir()? {
            return Err(Errno::NotDirectory);
        }
        self.maybe_init_dir()?;
        self.inner.readdir(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.inner.write(buf).map_err(Self::remap_write)
    }

    fn pwrite(&mut self, buf: &[u8], offset: i64) -> Result<usize> {
        self.inner.pwrite(buf, offset).map_err(Self::remap_write)
    }

    fn truncate(&mut self, size: i64) -> Result<()> {
        self.inner.truncate(size).map_err(Self::remap_write)
    }

    fn sync(&mut self) -> Result<()> {
        self.inner.sync()
    }

    fn datasync(&mut self) -> Result<()> {
        self.inner.datasync()
    }

    fn chmod(&mut self, perm: Permissions) -> Result<()> {
        self.inner.chmod(perm)
    }

    fn chown(&mut self, uid: u32, gid: u32) -> Result<()> {
        self.inner.chown(uid, gid)
    }

    fn utimens(&mut self, times: Option<&Timestamps>) -> Result<()> {
        self.inner.utimens(times)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::FileType;

    /// Serves a fixed listing and records whether it was closed.
    struct SnapshotDir {
        entries: Vec<Dirent>,
        next: usize,
        closed: bool,
    }

    impl SnapshotDir {
        fn boxed(names: &[&str]) -> Box<dyn File> {
            Box::new(SnapshotDir {
                entries: names
                    .iter()
                    .map(|n| Dirent {
                        name: n.to_string(),
                        ino: 0,
                        file_type: FileType::File,
                    })
                    .collect(),
                next: 0,
                closed: false,
            })
        }
    }

    impl File for SnapshotDir {
        fn is_dir(&mut self) -> Result<bool> {
            Ok(true)
        }

        fn readdir(&mut self, n: i64) -> Result<Vec<Dirent>> {
            if self.closed {
                return Err(Errno::BadDescriptor);
            }
            let max = if n > 0 { n as usize } else { usize::MAX };
            let batch: Vec<Dirent> = self.entries[self.next..]
                .iter()
                .take(max)
                .cloned()
                .collect();
            self.next += batch.len();
            Ok(batch)
        }

        fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    /// A regular file serving fixed bytes through a cursor.
    struct ByteFile {
        data: Vec<u8>,
        pos: usize,
    }

    impl File for ByteFile {
        fn is_dir(&mut self) -> Result<bool> {
            Ok(false)
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            let remaining = &self.data[self.pos..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct AccessDeniedFile;

    impl File for AccessDeniedFile {
        fn write(&mut self, _buf: &[u8]) -> Result<usize> {
            Err(Errno::Access)
        }

        fn pwrite(&mut self, _buf: &[u8], _offset: i64) -> Result<usize> {
            Err(Errno::Access)
        }

        fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
            Err(Errno::Access)
        }
    }

    #[test]
    fn readdir_reopens_exactly_once() {
        let reopens = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reopens);
        // The stale pre-reopen snapshot misses "late"; the fresh one has it.
        let mut f = WindowsFile::new(
            SnapshotDir::boxed(&["early"]),
            Box::new(move || {
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(SnapshotDir::boxed(&["early", "late"]))
            }),
        );

        let first = f.readdir(1).expect("first batch");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "early");
        let second = f.readdir(1).expect("second batch");
        assert_eq!(second[0].name, "late");
        assert_eq!(reopens.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn readdir_on_regular_file_fails_without_reopening() {
        let reopens = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reopens);
        let mut f = WindowsFile::new(
            Box::new(ByteFile {
                data: b"abcdef".to_vec(),
                pos: 0,
            }),
            Box::new(move || {
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(Box::new(ByteFile {
                    data: b"abcdef".to_vec(),
                    pos: 0,
                }))
            }),
        );

        let mut buf = [0u8; 3];
        assert_eq!(f.read(&mut buf).expect("read"), 3);
        assert_eq!(&buf, b"abc");

        assert_eq!(f.readdir(0).unwrap_err(), Errno::NotDirectory);

        // The cursor is untouched: the handle was never swapped.
        assert_eq!(f.read(&mut buf).expect("read after readdir"), 3);
        assert_eq!(&buf, b"def");
        assert_eq!(reopens.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn write_paths_remap_access_denied() {
        let mut f = WindowsFile::new(Box::new(AccessDeniedFile), Box::new(|| Ok(Box::new(AccessDeniedFile))));
        assert_eq!(f.write(b"x"), Err(Errno::BadDescriptor));
        assert_eq!(f.pwrite(b"x", 0), Err(Errno::BadDescriptor));
        // Read paths keep the host's code untouched.
        assert_eq!(f.read(&mut [0u8; 1]), Err(Errno::Access));
    }
}
