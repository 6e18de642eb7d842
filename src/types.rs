//! Normalized value types shared by the file and filesystem contracts.
//!
//! These are the fixed-shape structures produced from heterogeneous native
//! stat/readdir results so that every backend reports the same data model to
//! the guest-facing translation layer.

use std::time::SystemTime;

use crate::{Errno, Result};

/// Type of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Character device, e.g. a console stream.
    CharacterDevice,
    /// Anything the backing store cannot classify.
    Other,
}

impl From<std::fs::FileType> for FileType {
    fn from(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            return FileType::Directory;
        }
        if ft.is_symlink() {
            return FileType::Symlink;
        }
        if ft.is_file() {
            return FileType::File;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_char_device() {
                return FileType::CharacterDevice;
            }
        }
        FileType::Other
    }
}

/// Normalized stat snapshot, copied out of the backend on every stat call.
///
/// A backing store without distinct timestamps sets all three to the same
/// value; one without link counts reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    /// Type of the entry.
    pub file_type: FileType,
    /// Permission bits.
    pub permissions: Permissions,
    /// Number of hard links.
    pub nlink: u64,
    /// Size in bytes.
    pub size: u64,
    /// Last access time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub accessed: SystemTime,
    /// Last modification time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub modified: SystemTime,
    /// Last status change time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub changed: SystemTime,
}

impl Stat {
    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

impl Default for Stat {
    fn default() -> Self {
        Self {
            file_type: FileType::File,
            permissions: Permissions::default_file(),
            nlink: 1,
            size: 0,
            accessed: SystemTime::UNIX_EPOCH,
            modified: SystemTime::UNIX_EPOCH,
            changed: SystemTime::UNIX_EPOCH,
        }
    }
}

impl From<&std::fs::Metadata> for Stat {
    fn from(meta: &std::fs::Metadata) -> Self {
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{MetadataExt, PermissionsExt};
            let changed = if meta.ctime() >= 0 {
                SystemTime::UNIX_EPOCH
                    + std::time::Duration::new(meta.ctime() as u64, meta.ctime_nsec() as u32)
            } else {
                modified
            };
            return Stat {
                file_type: meta.file_type().into(),
                permissions: Permissions::from_mode(meta.permissions().mode()),
                nlink: meta.nlink(),
                size: meta.len(),
                accessed: meta.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
                modified,
                changed,
            };
        }
        #[cfg(not(unix))]
        {
            let readonly = meta.permissions().readonly();
            return Stat {
                file_type: meta.file_type().into(),
                permissions: if readonly {
                    Permissions::from_mode(0o444)
                } else {
                    Permissions::from_mode(0o644)
                },
                nlink: 1,
                size: meta.len(),
                accessed: meta.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
                modified,
                changed: modified,
            };
        }
    }
}

/// Normalized directory entry produced in batches by a readdir cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dirent {
    /// Name of the entry, without any path prefix.
    pub name: String,
    /// Inode-equivalent identifier, or zero when the backing store has none.
    pub ino: u64,
    /// Type of the entry.
    pub file_type: FileType,
}

/// Unix-style permissions stored as a mode bitmask (rwxrwxrwx).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permissions(u32);

impl Permissions {
    /// Create permissions from a Unix mode (e.g. `0o755`). Type bits are
    /// masked off.
    #[inline]
    pub const fn from_mode(mode: u32) -> Self {
        Self(mode & 0o7777)
    }

    /// Get the raw mode value.
    #[inline]
    pub const fn mode(&self) -> u32 {
        self.0
    }

    /// Returns `true` if no write bit is set for user, group, or other.
    #[inline]
    pub const fn readonly(&self) -> bool {
        (self.0 & 0o222) == 0
    }

    /// Default permissions for a new file (`0o644`).
    #[inline]
    pub const fn default_file() -> Self {
        Self(0o644)
    }

    /// Default permissions for a new directory (`0o755`).
    #[inline]
    pub const fn default_dir() -> Self {
        Self(0o755)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::default_file()
    }
}

/// Flags for opening a file.
///
/// The read/write fields carry the access intent; the rest adjust creation
/// behavior. Wrappers that gate on write intent must inspect only the intent
/// fields so that flags added later are never misread as write intent.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing.
    pub write: bool,
    /// Create the file if it does not exist.
    pub create: bool,
    /// Truncate the file to zero length.
    pub truncate: bool,
    /// Writes go to the end of the file.
    pub append: bool,
}

impl OpenFlags {
    /// Read-only access.
    pub const READ: Self = Self {
        read: true,
        write: false,
        create: false,
        truncate: false,
        append: false,
    };

    /// Write access with create and truncate.
    pub const WRITE: Self = Self {
        read: false,
        write: true,
        create: true,
        truncate: true,
        append: false,
    };

    /// Read and write access.
    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
        create: false,
        truncate: false,
        append: false,
    };

    /// The fixed access mode these flags select, decided at open time.
    pub const fn access_mode(&self) -> AccessMode {
        match (self.read, self.write || self.append) {
            (true, true) => AccessMode::ReadWrite,
            (false, true) => AccessMode::WriteOnly,
            _ => AccessMode::ReadOnly,
        }
    }

    /// Returns `true` if these flags carry any write intent.
    ///
    /// Only the intent fields participate; creation flags do not.
    pub const fn has_write_intent(&self) -> bool {
        self.write || self.append
    }
}

/// The access mode a handle was opened with. Fixed for the handle's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessMode {
    /// Reads only, e.g. stdin.
    ReadOnly,
    /// Writes only, e.g. stdout.
    WriteOnly,
    /// Reads and writes.
    ReadWrite,
}

impl AccessMode {
    /// Returns `true` if reads are permitted.
    #[inline]
    pub const fn readable(&self) -> bool {
        !matches!(self, AccessMode::WriteOnly)
    }

    /// Returns `true` if writes are permitted.
    #[inline]
    pub const fn writable(&self) -> bool {
        !matches!(self, AccessMode::ReadOnly)
    }
}

/// Origin for a seek operation.
///
/// The set is closed: guest-supplied raw values outside `{0, 1, 2}` fail at
/// [`Whence::from_raw`] with [`Errno::InvalidArgument`] instead of reaching a
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Whence {
    /// Relative to the start of the file.
    Start,
    /// Relative to the current offset.
    Current,
    /// Relative to the end of the file.
    End,
}

impl Whence {
    /// Decodes a raw guest-supplied whence value.
    pub const fn from_raw(raw: u32) -> Result<Whence> {
        match raw {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            _ => Err(Errno::InvalidArgument),
        }
    }
}

/// One timestamp argument to a utimens-style operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Set the timestamp to the current time.
    Now,
    /// Leave the timestamp unchanged.
    Omit,
    /// Set the timestamp to the given time.
    Set(SystemTime),
}

/// Access and modification timestamps for a utimens-style operation.
///
/// Passing no timestamps at all behaves the same as setting both to
/// [`Timestamp::Now`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    /// New access time.
    pub accessed: Timestamp,
    /// New modification time.
    pub modified: Timestamp,
}

impl Timestamps {
    /// Sets both timestamps to the current time.
    pub const NOW: Timestamps = Timestamps {
        accessed: Timestamp::Now,
        modified: Timestamp::Now,
    };
}

/// Serde support for `SystemTime` (when the `serde` feature is enabled).
#[cfg(feature = "serde")]
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        (duration.as_secs(), duration.subsec_nanos()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos): (u64, u32) = Deserialize::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::new(secs, nanos))
    }
}
