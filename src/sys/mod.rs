//! Platform plumbing: raw native calls and per-platform open constants.
//!
//! Everything platform-divergent is isolated here and selected at compile
//! time; no runtime branching on the host OS happens outside this module.

use std::fs::OpenOptions;

use crate::{OpenFlags, Permissions};

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(windows)]
pub(crate) mod windows;

/// Builds the `OpenOptions` for a host open, applying the platform's extra
/// flag constants (e.g. the backup-semantics flag Windows needs to open a
/// directory handle).
pub(crate) fn open_options(flags: OpenFlags, perm: Permissions) -> OpenOptions {
    let mut opts = OpenOptions::new();
    opts.read(flags.read)
        .write(flags.write)
        .append(flags.append)
        .create(flags.create)
        .truncate(flags.truncate);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(perm.mode());
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        let _ = perm;
        opts.custom_flags(windows::FILE_FLAG_BACKUP_SEMANTICS);
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = perm;
    }
    opts
}
