//! The closed error taxonomy shared by every component in this crate.
//!
//! Guest-facing host functions are constrained to a small set of well-known
//! POSIX-style codes, so every boundary operation in this crate returns
//! exactly one [`Errno`] on failure. Native failures are normalized here and
//! nowhere else: no backend-specific error type crosses a component boundary,
//! and nothing in this layer is fatal — every failure is per-call and
//! recoverable at the caller's discretion.

use std::io;

/// Result alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Errno>;

/// Normalized POSIX-style result code.
///
/// The set is closed on purpose: callers translating to a guest ABI can
/// exhaustively map each variant to a numeric code. `Ok(_)` denotes success;
/// there is no success variant.
///
/// # Examples
///
/// ```rust
/// use sandfs::Errno;
///
/// let err = Errno::from(std::io::Error::from(std::io::ErrorKind::NotFound));
/// assert_eq!(err, Errno::NotFound);
/// assert_eq!(err.to_string(), "no such file or directory");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Errno {
    /// The backend or platform does not support this operation (`ENOSYS`).
    ///
    /// Never fatal: callers must treat this as "feature not available", not
    /// as an unexpected failure.
    #[error("function not supported")]
    NotSupported,

    /// The handle was closed, or was not opened with the access mode the
    /// attempted operation requires (`EBADF`).
    #[error("bad file descriptor")]
    BadDescriptor,

    /// The operation targets a directory but requires a non-directory
    /// (`EISDIR`).
    #[error("is a directory")]
    IsDirectory,

    /// The operation requires a directory but the target is not one
    /// (`ENOTDIR`).
    #[error("not a directory")]
    NotDirectory,

    /// A malformed parameter, such as a negative offset or size (`EINVAL`).
    #[error("invalid argument")]
    InvalidArgument,

    /// Mutation was attempted against an intentionally immutable mount
    /// (`EROFS`). Distinct from [`Errno::NotSupported`]: the operation is
    /// implemented, but deliberately disallowed here.
    #[error("read-only file system")]
    ReadOnlyFilesystem,

    /// The path does not exist (`ENOENT`).
    #[error("no such file or directory")]
    NotFound,

    /// The path already exists (`EEXIST`).
    #[error("file exists")]
    AlreadyExists,

    /// Access was denied by the host (`EACCES`).
    #[error("permission denied")]
    Access,

    /// The operation is not permitted for this process (`EPERM`).
    #[error("operation not permitted")]
    NotPermitted,

    /// The directory is not empty (`ENOTEMPTY`).
    #[error("directory not empty")]
    NotEmpty,

    /// A path component exceeded the host limit (`ENAMETOOLONG`).
    #[error("file name too long")]
    NameTooLong,

    /// Too many levels of symbolic links (`ELOOP`).
    #[error("too many levels of symbolic links")]
    TooManySymlinks,

    /// The operation would block on a non-blocking handle (`EAGAIN`).
    #[error("resource temporarily unavailable")]
    WouldBlock,

    /// The operation was interrupted before completing (`EINTR`).
    #[error("interrupted system call")]
    Interrupted,

    /// A low-level I/O failure with no more specific code (`EIO`).
    #[error("input/output error")]
    Io,
}

impl From<io::Error> for Errno {
    /// Normalizes a native error into the closed code set.
    ///
    /// On Unix the raw OS errno is consulted first; `io::ErrorKind` folds
    /// several distinct errnos together and is only used when no raw code is
    /// attached. Unrecognized conditions collapse to [`Errno::Io`].
    fn from(error: io::Error) -> Self {
        #[cfg(unix)]
        if let Some(raw) = error.raw_os_error() {
            return Errno::from_raw_os_error(raw);
        }
        match error.kind() {
            io::ErrorKind::NotFound => Errno::NotFound,
            io::ErrorKind::PermissionDenied => Errno::Access,
            io::ErrorKind::AlreadyExists => Errno::AlreadyExists,
            io::ErrorKind::InvalidInput => Errno::InvalidArgument,
            io::ErrorKind::IsADirectory => Errno::IsDirectory,
            io::ErrorKind::NotADirectory => Errno::NotDirectory,
            io::ErrorKind::DirectoryNotEmpty => Errno::NotEmpty,
            io::ErrorKind::InvalidFilename => Errno::NameTooLong,
            io::ErrorKind::ReadOnlyFilesystem => Errno::ReadOnlyFilesystem,
            io::ErrorKind::WouldBlock => Errno::WouldBlock,
            io::ErrorKind::Interrupted => Errno::Interrupted,
            io::ErrorKind::Unsupported => Errno::NotSupported,
            _ => Errno::Io,
        }
    }
}

impl Errno {
    /// Maps a raw Unix errno value into the closed code set.
    #[cfg(unix)]
    fn from_raw_os_error(raw: i32) -> Errno {
        match raw {
            libc::ENOSYS => Errno::NotSupported,
            libc::EBADF => Errno::BadDescriptor,
            libc::EISDIR => Errno::IsDirectory,
            libc::ENOTDIR => Errno::NotDirectory,
            libc::EINVAL => Errno::InvalidArgument,
            libc::EROFS => Errno::ReadOnlyFilesystem,
            libc::ENOENT => Errno::NotFound,
            libc::EEXIST => Errno::AlreadyExists,
            libc::EACCES => Errno::Access,
            libc::EPERM => Errno::NotPermitted,
            libc::ENOTEMPTY => Errno::NotEmpty,
            libc::ENAMETOOLONG => Errno::NameTooLong,
            libc::ELOOP => Errno::TooManySymlinks,
            libc::EAGAIN => Errno::WouldBlock,
            libc::EINTR => Errno::Interrupted,
            _ => Errno::Io,
        }
    }
}
