//! The per-mount contract implemented by every filesystem backend.

use crate::{Errno, File, OpenFlags, Permissions, Result, Stat, Timestamps};

/// A mount root addressed by guest-visible, `/`-separated paths.
///
/// A `FileSystem` is created once at mount time, holds no open-handle state
/// of its own, and is logically immutable for the life of the mount: methods
/// take `&self` and instances may be shared freely. Files produced by
/// [`FileSystem::open_file`] each own their backing resource exclusively.
///
/// Every operation has a default body returning [`Errno::NotSupported`], so
/// backends implement what their backing store can express and inherit the
/// rest; the contract stays forward-compatible when operations are added.
/// Backends whose store is writable but intentionally mounted immutable
/// return [`Errno::ReadOnlyFilesystem`] from mutations instead, preserving
/// the distinction between "not implemented here" and "deliberately
/// disallowed" (see [`read_only`](crate::read_only)).
#[allow(unused_variables)]
pub trait FileSystem: Send + Sync {
    /// Opens a file under this mount, like `openat` relative to the mount
    /// root in POSIX.
    ///
    /// `perm` applies only when `flags.create` creates the file.
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        perm: Permissions,
    ) -> Result<Box<dyn File>> {
        Err(Errno::NotSupported)
    }

    /// Returns a normalized stat snapshot for `path`, following symlinks.
    fn stat(&self, path: &str) -> Result<Stat> {
        Err(Errno::NotSupported)
    }

    /// Like [`FileSystem::stat`], but does not follow a trailing symlink.
    ///
    /// Backends whose store cannot represent symlinks deliberately answer
    /// with [`FileSystem::stat`] semantics; that approximation is part of
    /// this contract, not a bug.
    fn lstat(&self, path: &str) -> Result<Stat> {
        Err(Errno::NotSupported)
    }

    /// Reads the target of a symbolic link.
    fn readlink(&self, path: &str) -> Result<String> {
        Err(Errno::NotSupported)
    }

    /// Creates a directory, like `mkdir` in POSIX.
    fn mkdir(&self, path: &str, perm: Permissions) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Removes an empty directory, like `rmdir` in POSIX.
    fn rmdir(&self, path: &str) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Renames `from` to `to`, like `rename` in POSIX.
    fn rename(&self, from: &str, to: &str) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Creates a hard link `new` to `old`, like `link` in POSIX.
    fn link(&self, old: &str, new: &str) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Creates a symbolic link at `link` pointing to `target`, like
    /// `symlink` in POSIX.
    fn symlink(&self, target: &str, link: &str) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Removes a non-directory entry, like `unlink` in POSIX.
    fn unlink(&self, path: &str) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Changes permission bits, like `chmod` in POSIX.
    fn chmod(&self, path: &str, perm: Permissions) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Changes owner and group, following symlinks, like `chown` in POSIX.
    fn chown(&self, path: &str, uid: u32, gid: u32) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Changes owner and group without following a trailing symlink, like
    /// `lchown` in POSIX.
    fn lchown(&self, path: &str, uid: u32, gid: u32) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Sets access and modification times, like `utimensat` in POSIX.
    ///
    /// A `None` value behaves as if both timestamps were
    /// [`Timestamp::Now`](crate::Timestamp::Now). `follow_symlinks` selects
    /// whether a trailing symlink is resolved or updated itself.
    fn utimens(&self, path: &str, times: Option<&Timestamps>, follow_symlinks: bool) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Truncates the file at `path` to `size` bytes, like `truncate` in
    /// POSIX.
    ///
    /// # Errors
    ///
    /// [`Errno::InvalidArgument`] when `size` is negative.
    fn truncate(&self, path: &str, size: i64) -> Result<()> {
        Err(Errno::NotSupported)
    }

    /// Returns `true` if this mount already rejects all mutation, so that
    /// [`read_only`](crate::read_only) can return it unchanged instead of
    /// stacking another wrapper.
    fn is_read_only(&self) -> bool {
        false
    }
}

/// A mount that supports nothing.
///
/// Every operation inherits the default [`Errno::NotSupported`] body. Since
/// nothing can be mutated, it counts as read-only for wrapping purposes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnimplementedFs;

impl FileSystem for UnimplementedFs {
    fn is_read_only(&self) -> bool {
        true
    }
}
