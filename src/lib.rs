//! Host-side virtual filesystem layer for sandboxed guests.
//!
//! A guest addresses files through `/`-separated paths and a small set of
//! POSIX-shaped operations. This crate supplies the host half of that
//! contract: a [`FileSystem`] trait for mount roots, a [`File`] trait for
//! open handles, and a closed [`Errno`] taxonomy every failure is normalized
//! into, so a guest-facing translation layer can map results mechanically.
//!
//! Backends come in three flavors:
//!
//! - [`DirFs`] mounts a host directory, confining guest paths under its root
//!   and repairing platform quirks on Windows.
//! - [`NamespaceFs`] adapts anything that can resolve a path to a
//!   [`Backing`] resource, which is how fakes and archive readers mount.
//! - [`UnimplementedFs`] supports nothing, the starting point for partial
//!   backends.
//!
//! Any mount becomes immutable with [`read_only`], and console streams get
//! guest-stable identities through [`StdioFile`].
//!
//! ```no_run
//! use sandfs::{DirFs, File, FileSystem, OpenFlags, Permissions};
//!
//! let fs = DirFs::new("/srv/guest");
//! let mut file = fs.open_file("/etc/config", OpenFlags::READ, Permissions::default())?;
//! let mut buf = [0u8; 128];
//! let n = file.read(&mut buf)?;
//! # Ok::<(), sandfs::Errno>(())
//! ```
//!
//! Operations a backend cannot express fail with [`Errno::NotSupported`]
//! rather than panicking or lying; capability discovery happens through the
//! probes on [`Backing`].

mod adapter;
mod backed_file;
mod backing;
mod dir_fs;
mod errno;
mod file;
mod filesystem;
mod quirks;
mod readonly;
mod sys;
mod types;

pub use adapter::{Namespace, NamespaceFs};
pub use backed_file::{BackedFile, StdioFile};
pub use backing::{
    Backing, Chmod, Chown, Fsync, HostBacking, ListDir, NullDevice, PollRead, ReadAt, SetNonblock,
    SetTimes, Truncate, WriteAt,
};
pub use dir_fs::DirFs;
pub use errno::{Errno, Result};
pub use file::File;
pub use filesystem::{FileSystem, UnimplementedFs};
pub use quirks::{Reopen, WindowsFile};
pub use readonly::read_only;
pub use types::{
    AccessMode, Dirent, FileType, OpenFlags, Permissions, Stat, Timestamp, Timestamps, Whence,
};
