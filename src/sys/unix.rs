//! Unix raw-call helpers for the descriptor-based capabilities.

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::{Timestamp, Timestamps};

fn cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))
}

fn check(rc: libc::c_int) -> io::Result<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Waits until `fd` is readable or the timeout elapses. `None` blocks up to
/// forever.
pub(crate) fn poll_read(fd: RawFd, timeout: Option<Duration>) -> io::Result<bool> {
    let mut fds = [libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    }];
    let timeout_ms = match timeout {
        None => -1,
        Some(d) => d.as_millis().min(i32::MAX as u128) as libc::c_int,
    };
    let count = unsafe { libc::poll(fds.as_mut_ptr(), 1, timeout_ms) };
    if count < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(count > 0)
}

/// Toggles `O_NONBLOCK` on `fd` via `fcntl`.
pub(crate) fn set_nonblock(fd: RawFd, enable: bool) -> io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    let flags = if enable {
        flags | libc::O_NONBLOCK
    } else {
        flags & !libc::O_NONBLOCK
    };
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Changes the owner and group of an open descriptor.
pub(crate) fn fchown(fd: RawFd, uid: u32, gid: u32) -> io::Result<()> {
    check(unsafe { libc::fchown(fd, uid, gid) })
}

/// Changes the owner and group of a path, optionally without following a
/// trailing symlink.
pub(crate) fn chown(path: &Path, uid: u32, gid: u32, follow_symlinks: bool) -> io::Result<()> {
    let cpath = cstring(path)?;
    let rc = if follow_symlinks {
        unsafe { libc::chown(cpath.as_ptr(), uid, gid) }
    } else {
        unsafe { libc::lchown(cpath.as_ptr(), uid, gid) }
    };
    check(rc)
}

/// Sets timestamps on an open descriptor at nanosecond precision.
pub(crate) fn futimens(fd: RawFd, times: Option<&Timestamps>) -> io::Result<()> {
    let ts = timespec_pair(times);
    check(unsafe { libc::futimens(fd, ts.as_ptr()) })
}

/// Sets timestamps on a path, optionally without following a trailing
/// symlink.
pub(crate) fn utimensat(
    path: &Path,
    times: Option<&Timestamps>,
    follow_symlinks: bool,
) -> io::Result<()> {
    let cpath = cstring(path)?;
    let ts = timespec_pair(times);
    let flags = if follow_symlinks {
        0
    } else {
        libc::AT_SYMLINK_NOFOLLOW
    };
    check(unsafe { libc::utimensat(libc::AT_FDCWD, cpath.as_ptr(), ts.as_ptr(), flags) })
}

fn timespec_pair(times: Option<&Timestamps>) -> [libc::timespec; 2] {
    let times = times.copied().unwrap_or(Timestamps::NOW);
    [timespec(times.accessed), timespec(times.modified)]
}

fn timespec(ts: Timestamp) -> libc::timespec {
    let (tv_sec, tv_nsec) = match ts {
        Timestamp::Now => (0, libc::UTIME_NOW as i64),
        Timestamp::Omit => (0, libc::UTIME_OMIT as i64),
        Timestamp::Set(t) => {
            let d = t
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or(Duration::ZERO);
            (d.as_secs() as i64, d.subsec_nanos() as i64)
        }
    };
    libc::timespec {
        tv_sec: tv_sec as libc::time_t,
        tv_nsec: tv_nsec as _,
    }
}
