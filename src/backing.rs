//! Backing resources and the capability probes a handle uses to drive them.
//!
//! A [`Backing`] is the raw resource behind an open handle: a host file, a
//! console stream, a device, or something fabricated by a fake filesystem.
//! Instead of downcasting, the handle layer asks a backing for each optional
//! capability through an `as_*` probe that returns `None` when the capability
//! is absent. The handle layer then decides how to degrade: emulate, remap to
//! an errno, or report the operation unsupported.

use std::io::{self, Read, Seek, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::{Dirent, Permissions, Stat, Timestamps};

/// Positioned reads that leave the current offset alone.
pub trait ReadAt {
    /// Reads into `buf` at the absolute `offset`, like `pread` in POSIX.
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

/// Positioned writes that leave the current offset alone.
pub trait WriteAt {
    /// Writes `buf` at the absolute `offset`, like `pwrite` in POSIX.
    fn write_at(&mut self, buf: &[u8], offset: u64) -> io::Result<usize>;
}

/// A one-way directory cursor.
pub trait ListDir {
    /// Returns the next entry, or `None` once the directory is exhausted.
    ///
    /// A directory removed or closed while iteration is in progress also
    /// yields `None`; concurrent removal is not an error on any supported
    /// platform.
    fn next_entry(&mut self) -> io::Result<Option<Dirent>>;
}

/// Resizing the backing resource.
pub trait Truncate {
    /// Truncates or extends the resource to `size` bytes.
    fn truncate(&mut self, size: u64) -> io::Result<()>;
}

/// Flushing contents to stable storage.
pub trait Fsync {
    /// Flushes contents and metadata, like `fsync` in POSIX.
    fn sync(&mut self) -> io::Result<()>;

    /// Flushes contents only, like `fdatasync` in POSIX. Backings without a
    /// distinct data-sync primitive fall back to a full sync.
    fn datasync(&mut self) -> io::Result<()> {
        self.sync()
    }
}

/// Changing permission bits on the backing resource.
pub trait Chmod {
    /// Applies `perm`, like `fchmod` in POSIX.
    fn chmod(&mut self, perm: Permissions) -> io::Result<()>;
}

/// Changing the owner and group of the backing resource.
pub trait Chown {
    /// Applies `uid` and `gid`, like `fchown` in POSIX.
    fn chown(&mut self, uid: u32, gid: u32) -> io::Result<()>;
}

/// Setting timestamps on the backing resource.
pub trait SetTimes {
    /// Applies `times` at nanosecond precision, like `futimens` in POSIX.
    fn set_times(&mut self, times: &Timestamps) -> io::Result<()>;
}

/// Readiness polling.
pub trait PollRead {
    /// Returns `true` once data is ready to read, or `false` when the
    /// timeout elapses first. `None` blocks up to forever.
    fn poll_read(&mut self, timeout: Option<Duration>) -> io::Result<bool>;
}

/// Toggling non-blocking mode on the underlying descriptor.
pub trait SetNonblock {
    /// Enables or disables non-blocking mode.
    fn set_nonblock(&mut self, enable: bool) -> io::Result<()>;
}

/// The raw resource behind an open handle.
///
/// Only [`Backing::stat`] is mandatory; every other capability is reported
/// through a probe defaulting to `None`. Backings speak `io::Result` so that
/// native error codes survive intact until the handle layer normalizes them.
#[allow(unused_variables)]
pub trait Backing: Send {
    /// Returns a normalized stat snapshot of the resource.
    fn stat(&mut self) -> io::Result<Stat>;

    /// Sequential reads, if supported.
    fn as_read(&mut self) -> Option<&mut dyn Read> {
        None
    }

    /// Offset repositioning, if supported.
    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        None
    }

    /// Positioned reads, if supported natively. When absent the handle layer
    /// emulates them over [`Backing::as_seek`] and [`Backing::as_read`].
    fn as_read_at(&mut self) -> Option<&mut dyn ReadAt> {
        None
    }

    /// Sequential writes, if supported.
    fn as_write(&mut self) -> Option<&mut dyn Write> {
        None
    }

    /// Positioned writes, if supported natively.
    fn as_write_at(&mut self) -> Option<&mut dyn WriteAt> {
        None
    }

    /// Directory enumeration, if this resource is a directory.
    fn as_list_dir(&mut self) -> Option<&mut dyn ListDir> {
        None
    }

    /// Resizing, if supported.
    fn as_truncate(&mut self) -> Option<&mut dyn Truncate> {
        None
    }

    /// Durable flushing, if supported.
    fn as_fsync(&mut self) -> Option<&mut dyn Fsync> {
        None
    }

    /// Permission changes, if supported.
    fn as_chmod(&mut self) -> Option<&mut dyn Chmod> {
        None
    }

    /// Ownership changes, if supported.
    fn as_chown(&mut self) -> Option<&mut dyn Chown> {
        None
    }

    /// Timestamp changes, if supported.
    fn as_set_times(&mut self) -> Option<&mut dyn SetTimes> {
        None
    }

    /// Readiness polling, if supported.
    fn as_poll(&mut self) -> Option<&mut dyn PollRead> {
        None
    }

    /// Non-blocking mode, if the resource has a configurable descriptor.
    fn as_nonblock(&mut self) -> Option<&mut dyn SetNonblock> {
        None
    }
}

/// A backing over an open host file or directory.
///
/// The path is retained because directory enumeration re-opens it lazily; the
/// host handle alone cannot be rewound into a portable cursor.
pub struct HostBacking {
    file: std::fs::File,
    path: PathBuf,
    cursor: Option<std::fs::ReadDir>,
}

impl HostBacking {
    /// Wraps an already-open host file together with the path it was opened
    /// from.
    pub fn new(file: std::fs::File, path: impl Into<PathBuf>) -> Self {
        Self {
            file,
            path: path.into(),
            cursor: None,
        }
    }
}

impl Backing for HostBacking {
    fn stat(&mut self) -> io::Result<Stat> {
        let meta = self.file.metadata()?;
        Ok(Stat::from(&meta))
    }

    fn as_read(&mut self) -> Option<&mut dyn Read> {
        Some(&mut self.file)
    }

    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        Some(&mut self.file)
    }

    #[cfg(unix)]
    fn as_read_at(&mut self) -> Option<&mut dyn ReadAt> {
        Some(self)
    }

    fn as_write(&mut self) -> Option<&mut dyn Write> {
        Some(&mut self.file)
    }

    #[cfg(unix)]
    fn as_write_at(&mut self) -> Option<&mut dyn WriteAt> {
        Some(self)
    }

    fn as_list_dir(&mut self) -> Option<&mut dyn ListDir> {
        Some(self)
    }

    fn as_truncate(&mut self) -> Option<&mut dyn Truncate> {
        Some(self)
    }

    fn as_fsync(&mut self) -> Option<&mut dyn Fsync> {
        Some(self)
    }

    #[cfg(unix)]
    fn as_chmod(&mut self) -> Option<&mut dyn Chmod> {
        Some(self)
    }

    #[cfg(unix)]
    fn as_chown(&mut self) -> Option<&mut dyn Chown> {
        Some(self)
    }

    #[cfg(unix)]
    fn as_set_times(&mut self) -> Option<&mut dyn SetTimes> {
        Some(self)
    }

    #[cfg(unix)]
    fn as_poll(&mut self) -> Option<&mut dyn PollRead> {
        Some(self)
    }

    #[cfg(unix)]
    fn as_nonblock(&mut self) -> Option<&mut dyn SetNonblock> {
        Some(self)
    }
}

#[cfg(unix)]
impl ReadAt for HostBacking {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.file.read_at(buf, offset)
    }
}

#[cfg(unix)]
impl WriteAt for HostBacking {
    fn write_at(&mut self, buf: &[u8], offset: u64) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.file.write_at(buf, offset)
    }
}

impl ListDir for HostBacking {
    fn next_entry(&mut self) -> io::Result<Option<Dirent>> {
        if self.cursor.is_none() {
            match std::fs::read_dir(&self.path) {
                Ok(rd) => self.cursor = Some(rd),
                // The directory vanished between open and enumeration.
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e),
            }
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };
        match cursor.next() {
            None => Ok(None),
            Some(Err(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Some(Err(e)) => Err(e),
            Some(Ok(entry)) => {
                let file_type = match entry.file_type() {
                    Ok(ft) => ft.into(),
                    // The entry was removed mid-iteration; report the stream
                    // as exhausted rather than failing the whole batch.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                    Err(e) => return Err(e),
                };
                #[cfg(unix)]
                let ino = {
                    use std::os::unix::fs::DirEntryExt;
                    entry.ino()
                };
                #[cfg(not(unix))]
                let ino = 0;
                Ok(Some(Dirent {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    ino,
                    file_type,
                }))
            }
        }
    }
}

impl Truncate for HostBacking {
    fn truncate(&mut self, size: u64) -> io::Result<()> {
        self.file.set_len(size)
    }
}

impl Fsync for HostBacking {
    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn datasync(&mut self) -> io::Result<()> {
        self.file.sync_data()
    }
}

#[cfg(unix)]
impl Chmod for HostBacking {
    fn chmod(&mut self, perm: Permissions) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        self.file
            .set_permissions(std::fs::Permissions::from_mode(perm.mode()))
    }
}

#[cfg(unix)]
impl Chown for HostBacking {
    fn chown(&mut self, uid: u32, gid: u32) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;
        crate::sys::unix::fchown(self.file.as_raw_fd(), uid, gid)
    }
}

#[cfg(unix)]
impl SetTimes for HostBacking {
    fn set_times(&mut self, times: &Timestamps) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;
        crate::sys::unix::futimens(self.file.as_raw_fd(), Some(times))
    }
}

#[cfg(unix)]
impl PollRead for HostBacking {
    fn poll_read(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        use std::os::unix::io::AsRawFd;
        crate::sys::unix::poll_read(self.file.as_raw_fd(), timeout)
    }
}

#[cfg(unix)]
impl SetNonblock for HostBacking {
    fn set_nonblock(&mut self, enable: bool) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;
        crate::sys::unix::set_nonblock(self.file.as_raw_fd(), enable)
    }
}

fn console_stat() -> Stat {
    Stat {
        file_type: crate::FileType::CharacterDevice,
        permissions: Permissions::from_mode(0o620),
        ..Stat::default()
    }
}

impl Backing for io::Stdin {
    fn stat(&mut self) -> io::Result<Stat> {
        Ok(console_stat())
    }

    fn as_read(&mut self) -> Option<&mut dyn Read> {
        Some(self)
    }

    #[cfg(unix)]
    fn as_poll(&mut self) -> Option<&mut dyn PollRead> {
        Some(self)
    }

    #[cfg(unix)]
    fn as_nonblock(&mut self) -> Option<&mut dyn SetNonblock> {
        Some(self)
    }
}

#[cfg(unix)]
impl PollRead for io::Stdin {
    fn poll_read(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        use std::os::unix::io::AsRawFd;
        crate::sys::unix::poll_read(self.as_raw_fd(), timeout)
    }
}

#[cfg(unix)]
impl SetNonblock for io::Stdin {
    fn set_nonblock(&mut self, enable: bool) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;
        crate::sys::unix::set_nonblock(self.as_raw_fd(), enable)
    }
}

impl Backing for io::Stdout {
    fn stat(&mut self) -> io::Result<Stat> {
        Ok(console_stat())
    }

    fn as_write(&mut self) -> Option<&mut dyn Write> {
        Some(self)
    }
}

impl Backing for io::Stderr {
    fn stat(&mut self) -> io::Result<Stat> {
        Ok(console_stat())
    }

    fn as_write(&mut self) -> Option<&mut dyn Write> {
        Some(self)
    }
}

/// A `/dev/null` lookalike: reads return end-of-stream, writes are swallowed,
/// and readiness polling reports ready immediately so a guest polling it
/// never hangs.
#[derive(Debug, Default)]
pub struct NullDevice;

impl Backing for NullDevice {
    fn stat(&mut self) -> io::Result<Stat> {
        Ok(Stat {
            file_type: crate::FileType::CharacterDevice,
            permissions: Permissions::from_mode(0o666),
            ..Stat::default()
        })
    }

    fn as_read(&mut self) -> Option<&mut dyn Read> {
        Some(self)
    }

    fn as_write(&mut self) -> Option<&mut dyn Write> {
        Some(self)
    }

    fn as_poll(&mut self) -> Option<&mut dyn PollRead> {
        Some(self)
    }
}

impl Read for NullDevice {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

impl Write for NullDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PollRead for NullDevice {
    fn poll_read(&mut self, _timeout: Option<Duration>) -> io::Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileType;

    #[test]
    fn host_backing_stat_regular_file() {
        let mut tmp = tempfile::NamedTempFile::new().expect("tempfile");
        tmp.write_all(b"hello").expect("write");
        let path = tmp.path().to_path_buf();
        let file = tmp.reopen().expect("reopen");
        let mut backing = HostBacking::new(file, path);
        let st = backing.stat().expect("stat");
        assert_eq!(st.file_type, FileType::File);
        assert_eq!(st.size, 5);
    }

    #[cfg(unix)]
    #[test]
    fn host_backing_read_at() {
        let mut tmp = tempfile::NamedTempFile::new().expect("tempfile");
        tmp.write_all(b"0123456789").expect("write");
        let path = tmp.path().to_path_buf();
        let file = tmp.reopen().expect("reopen");
        let mut backing = HostBacking::new(file, path);
        let reader = backing.as_read_at().expect("read_at capability");
        let mut buf = [0u8; 4];
        let n = reader.read_at(&mut buf, 3).expect("read_at");
        assert_eq!(&buf[..n], b"3456");
    }

    #[test]
    fn host_backing_lists_directory_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.txt"), b"a").expect("write a");
        std::fs::write(dir.path().join("b.txt"), b"b").expect("write b");
        let handle = std::fs::File::open(dir.path()).expect("open dir");
        let mut backing = HostBacking::new(handle, dir.path());
        let cursor = backing.as_list_dir().expect("list_dir capability");

        let mut names = Vec::new();
        while let Some(entry) = cursor.next_entry().expect("next_entry") {
            assert_eq!(entry.file_type, FileType::File);
            names.push(entry.name);
        }
        names.sort();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn host_backing_missing_directory_yields_no_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handle = std::fs::File::open(dir.path()).expect("open dir");
        let path = dir.path().to_path_buf();
        drop(dir);
        let mut backing = HostBacking::new(handle, path);
        let cursor = backing.as_list_dir().expect("list_dir capability");
        assert!(cursor.next_entry().expect("next_entry").is_none());
    }

    #[test]
    fn null_device_reads_nothing_and_swallows_writes() {
        let mut dev = NullDevice;
        let mut buf = [0u8; 8];
        assert_eq!(dev.as_read().expect("read").read(&mut buf).expect("ok"), 0);
        assert_eq!(
            dev.as_write().expect("write").write(b"gone").expect("ok"),
            4
        );
        assert!(dev.as_poll().expect("poll").poll_read(None).expect("ok"));
        let st = dev.stat().expect("stat");
        assert_eq!(st.file_type, FileType::CharacterDevice);
    }

    #[test]
    fn console_streams_expose_expected_capabilities() {
        let mut stdin = io::stdin();
        assert!(Backing::as_read(&mut stdin).is_some());
        assert!(stdin.as_write().is_none());

        let mut stdout = io::stdout();
        assert!(stdout.as_read().is_none());
        assert!(Backing::as_write(&mut stdout).is_some());
        assert_eq!(
            Backing::stat(&mut stdout).expect("stat").file_type,
            FileType::CharacterDevice
        );
    }
}
