//! A guard that turns any mount immutable.

use std::time::Duration;

use crate::{
    AccessMode, Dirent, Errno, File, FileSystem, OpenFlags, Permissions, Result, Stat, Timestamps,
    Whence,
};

/// Wraps `fs` so every mutation fails with [`Errno::ReadOnlyFilesystem`].
///
/// Idempotent: a mount that already reports
/// [`FileSystem::is_read_only`] comes back unchanged instead of gaining
/// another layer of indirection.
pub fn read_only(fs: Box<dyn FileSystem>) -> Box<dyn FileSystem> {
    if fs.is_read_only() {
        return fs;
    }
    Box::new(ReadOnlyFs { inner: fs })
}

struct ReadOnlyFs {
    inner: Box<dyn FileSystem>,
}

impl FileSystem for ReadOnlyFs {
    fn open_file(&self, path: &str, flags: OpenFlags, perm: Permissions) -> Result<Box<dyn File>> {
        // Only genuine write intent is refused; creation flags without it
        // are silently dropped so a read-open with stray flags still works.
        if flags.has_write_intent() {
            return Err(Errno::NotSupported);
        }
        let flags = OpenFlags {
            create: false,
            truncate: false,
            ..flags
        };
        let inner = self.inner.open_file(path, flags, perm)?;
        Ok(Box::new(ReadOnlyFile { inner }))
    }

    fn stat(&self, path: &str) -> Result<Stat> {
        self.inner.stat(path)
    }

    fn lstat(&self, path: &str) -> Result<Stat> {
        self.inner.lstat(path)
    }

    fn readlink(&self, path: &str) -> Result<String> {
        self.inner.readlink(path)
    }

    fn mkdir(&self, _path: &str, _perm: Permissions) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn rmdir(&self, _path: &str) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn rename(&self, _from: &str, _to: &str) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn link(&self, _old: &str, _new: &str) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn symlink(&self, _target: &str, _link: &str) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn unlink(&self, _path: &str) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn chmod(&self, _path: &str, _perm: Permissions) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn chown(&self, _path: &str, _uid: u32, _gid: u32) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn lchown(&self, _path: &str, _uid: u32, _gid: u32) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn utimens(
        &self,
        _path: &str,
        _times: Option<&Timestamps>,
        _follow_symlinks: bool,
    ) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn truncate(&self, _path: &str, _size: i64) -> Result<()> {
        Err(Errno::ReadOnlyFilesystem)
    }

    fn is_read_only(&self) -> bool {
        true
    }
}

/// A handle opened through a read-only mount.
///
/// Reads pass through untouched. Mutations fail with the code a guest would
/// see from a handle that was never opened for writing, which keeps the
/// wrapper invisible: [`Errno::IsDirectory`] when the handle is a directory,
/// [`Errno::BadDescriptor`] otherwise.
struct ReadOnlyFile {
    inner: Box<dyn File>,
}

impl ReadOnlyFile {
    fn write_err(&mut self) -> Errno {
        match self.inner.is_dir() {
            Err(errno) => errno,
            Ok(true) => Errno::IsDirectory,
            Ok(false) => Errno::BadDescriptor,
        }
    }
}

impl File for ReadOnlyFile {
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
        self.inner.readdir(n)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(self.write_err())
    }

    fn pwrite(&mut self, _buf: &[u8], _offset: i64) -> Result<usize> {
        Err(self.write_err())
    }

    fn truncate(&mut self, _size: i64) -> Result<()> {
        Err(self.write_err())
    }

    fn sync(&mut self) -> Result<()> {
        Err(Errno::BadDescriptor)
    }

    fn datasync(&mut self) -> Result<()> {
        Err(Errno::BadDescriptor)
    }

    fn chmod(&mut self, _perm: Permissions) -> Result<()> {
        Err(Errno::BadDescriptor)
    }

    fn chown(&mut self, _uid: u32, _gid: u32) -> Result<()> {
        Err(Errno::BadDescriptor)
    }

    fn utimens(&mut self, _times: Option<&Timestamps>) -> Result<()> {
        Err(Errno::BadDescriptor)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
