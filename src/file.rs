//! The per-open-handle contract implemented by every file backend.

use std::time::Duration;

use crate::{AccessMode, Dirent, Errno, Permissions, Result, Stat, Timestamps, Whence};

/// An open file handle bridging guest I/O to a backing resource.
///
/// Every optional operation has a default body returning
/// [`Errno::NotSupported`], so implementations stay forward-compatible when
/// operations are added: implement what the backend supports and inherit the
/// rest. [`File::sync`] and [`File::datasync`] instead default to success so
/// that filesystems without explicit flush semantics do not appear broken.
///
/// # Errors
///
/// Every fallible method returns exactly one [`Errno`]; out-of-range inputs
/// fail locally with [`Errno::InvalidArgument`], never panic. End-of-stream is
/// not an error: callers detect completion by a zero-byte result on a
/// non-empty request.
///
/// # Ownership and concurrency
///
/// A `File` exclusively owns its backing resource and releases it exactly
/// once on close. Handle operations take `&mut self`: each handle is driven
/// by a single logical caller, and there is no internal locking anywhere in
/// this layer. Callers that share a handle across threads must serialize
/// access externally. [`File::poll_read`] is the only operation that may
/// block; its sole cancellation is the timeout, and the effect of closing the
/// handle from elsewhere while a poll is pending is platform-dependent.
#[allow(unused_variables)]
pub trait File: Send {
    /// Returns the path used to open the file, or an empty string when the
    /// handle is not path-addressable (e.g. a console stream).
    fn path(&self) -> &str {
        ""
    }

    /// Returns the access mode the file was opened with. Never changes after
    /// construction.
    fn access_mode(&self) -> AccessMode {
        AccessMode::ReadOnly
    }

    /// Returns `true` if non-blocking mode was successfully enabled via
    /// [`File::set_nonblock`].
    fn is_nonblock(&self) -> bool {
        false
    }

    /// Toggles non-blocking mode, like `fcntl` with `O_NONBLOCK` in POSIX.
    ///
    /// # Errors
    ///
    /// - [`Errno::NotSupported`]: the backing handle exposes no descriptor to
    ///   configure.
    /// - [`Errno::BadDescriptor`]: the file or directory was closed.
    fn set_nonblock(&mut self, enable: bool) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Returns a normalized stat snapshot, like `fstat` in POSIX.
    ///
    /// Implementations backed by a flat metadata source set the access,
    /// modification, and change timestamps to the same value. A successful
    /// stat may cache the file type for [`File::is_dir`].
    ///
    /// # Errors
    ///
    /// - [`Errno::NotSupported`]: the backend cannot stat this handle.
    /// - [`Errno::BadDescriptor`]: the file or directory was closed, or a
    ///   low-level I/O failure occurred (remapped for guest-facing
    ///   consistency).
    fn stat(&mut self) -> Result<Stat> {
        Err(Errno::NotSupported)
    }

    /// Returns `true` if this file is a directory.
    ///
    /// Implementations may answer from a cached [`File::stat`] result; the
    /// type of an open handle cannot change on supported platforms.
    fn is_dir(&mut self) -> Result<bool> {
        Err(Errno::NotSupported)
    }

    /// Reads from the current offset into `buf`, returning the count read,
    /// like `read` in POSIX.
    ///
    /// An empty `buf` short-circuits to `Ok(0)` without touching the backing
    /// resource.
    ///
    /// # Errors
    ///
    /// - [`Errno::BadDescriptor`]: closed, or opened write-only.
    /// - [`Errno::IsDirectory`]: the handle is a directory.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Err(Errno::NotSupported)
    }

    /// Reads at the absolute `offset` into `buf` without moving the current
    /// offset, like `pread` in POSIX.
    ///
    /// # Errors
    ///
    /// Same as [`File::read`], plus [`Errno::InvalidArgument`] for a negative
    /// offset.
    fn pread(&mut self, buf: &mut [u8], offset: i64) -> Result<usize> {
        Err(Errno::NotSupported)
    }

    /// Sets the offset for the next read or write and returns the resulting
    /// absolute offset, like `lseek` in POSIX.
    ///
    /// # Errors
    ///
    /// - [`Errno::IsDirectory`]: the handle is a directory.
    /// - [`Errno::InvalidArgument`]: the resolved position is negative.
    /// - [`Errno::BadDescriptor`]: the file was closed.
    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        Err(Errno::NotSupported)
    }

    /// Returns whether the file has data ready to read, like `poll` in POSIX
    /// for a single descriptor.
    ///
    /// A `None` timeout blocks up to forever. Handles that can never produce
    /// data (e.g. a null device) return ready immediately instead of hanging.
    fn poll_read(&mut self, timeout: Option<Duration>) -> Result<bool> {
        Err(Errno::NotSupported)
    }

    /// Reads directory entries through a stateful cursor, in arbitrary order.
    ///
    /// If `n > 0`, returns at most `n` entries; if `n <= 0`, returns all
    /// remaining entries. Exhausting the directory is not an error, and for
    /// portability neither is the directory being removed or closed
    /// concurrently: entries silently stop.
    ///
    /// # Errors
    ///
    /// - [`Errno::NotDirectory`]: the handle is not a directory.
    /// - [`Errno::BadDescriptor`]: the handle was closed.
    fn readdir(&mut self, n: i64) -> Result<Vec<Dirent>> {
        Err(Errno::NotSupported)
    }

    /// Writes `buf` at the current offset, returning the count written, like
    /// `write` in POSIX.
    ///
    /// # Errors
    ///
    /// - [`Errno::BadDescriptor`]: closed, or opened read-only.
    /// - [`Errno::IsDirectory`]: the handle is a directory.
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Err(Errno::NotSupported)
    }

    /// Writes `buf` at the absolute `offset` without moving the current
    /// offset, like `pwrite` in POSIX.
    ///
    /// # Errors
    ///
    /// Same as [`File::write`], plus [`Errno::InvalidArgument`] for a
    /// negative offset.
    fn pwrite(&mut self, buf: &[u8], offset: i64) -> Result<usize> {
        Err(Errno::NotSupported)
    }

    /// Truncates the file to `size` bytes, like `ftruncate` in POSIX.
    ///
    /// # Errors
    ///
    /// - [`Errno::InvalidArgument`]: `size` is negative.
    /// - [`Errno::IsDirectory`]: the handle is a directory.
    /// - [`Errno::BadDescriptor`]: closed, or opened read-only.
    fn truncate(&mut self, size: i64) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Synchronizes file contents and metadata to stable storage, like
    /// `fsync` in POSIX.
    ///
    /// Defaults to success rather than [`Errno::NotSupported`] so backends
    /// without flush semantics do not appear broken.
    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    /// Synchronizes file contents to stable storage, like `fdatasync` in
    /// POSIX. Backends without a distinct data-sync primitive dispatch to
    /// [`File::sync`]; absent both, this defaults to success.
    fn datasync(&mut self) -> Result<()> {
        Ok(())
    }

    /// Changes the permission bits, like `fchmod` in POSIX.
    fn chmod(&mut self, perm: Permissions) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Changes the owner and group, like `fchown` in POSIX. Pass `u32::MAX`
    /// to leave either id unchanged.
    fn chown(&mut self, uid: u32, gid: u32) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Sets access and modification times at nanosecond precision, like
    /// `futimens` in POSIX.
    ///
    /// A `None` value behaves as if both timestamps were
    /// [`Timestamp::Now`](crate::Timestamp::Now).
    fn utimens(&mut self, times: Option<&Timestamps>) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Releases the backing resource. Closing an already-closed file is a
    /// no-op success; the resource is released exactly once.
    fn close(&mut self) -> Result<()> {
        Err(Errno::NotSupported)
    }
}
