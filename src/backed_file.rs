//! The standard [`File`] implementation over a [`Backing`] resource.

use std::io::SeekFrom;
use std::time::Duration;

use crate::{
    AccessMode, Backing, Dirent, Errno, File, FileType, Permissions, Result, Stat, Timestamps,
    Whence,
};

/// A file handle that drives any [`Backing`] through capability probes.
///
/// The handle fixes the path and access mode at construction, tracks
/// non-blocking state, and caches the file type after the first successful
/// stat: the type of an open handle cannot change on supported platforms, so
/// repeated [`File::is_dir`] checks cost at most one stat.
///
/// Closing takes the backing out of an `Option`, which makes release happen
/// exactly once and turns every later operation into
/// [`Errno::BadDescriptor`].
pub struct BackedFile {
    path: String,
    access_mode: AccessMode,
    nonblock: bool,
    cached_type: Option<FileType>,
    backing: Option<Box<dyn Backing>>,
}

impl BackedFile {
    /// Wraps `backing` as an open handle addressed by `path`.
    pub fn new(path: impl Into<String>, access_mode: AccessMode, backing: Box<dyn Backing>) -> Self {
        Self {
            path: path.into(),
            access_mode,
            nonblock: false,
            cached_type: None,
            backing: Some(backing),
        }
    }

    fn backing(&mut self) -> Result<&mut Box<dyn Backing>> {
        self.backing.as_mut().ok_or(Errno::BadDescriptor)
    }
}

impl File for BackedFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    fn is_nonblock(&self) -> bool {
        self.nonblock
    }

    fn set_nonblock(&mut self, enable: bool) -> Result<()> {
        let backing = self.backing()?;
        let ctl = backing.as_nonblock().ok_or(Errno::NotSupported)?;
        ctl.set_nonblock(enable).map_err(Errno::from)?;
        self.nonblock = enable;
        Ok(())
    }

    fn stat(&mut self) -> Result<Stat> {
        let backing = self.backing()?;
        let st = backing.stat().map_err(|e| match Errno::from(e) {
            // A handle whose descriptor can no longer be statted is treated
            // as revoked, which guests understand better than a raw EIO.
            Errno::Io => Errno::BadDescriptor,
            errno => errno,
        })?;
        self.cached_type = Some(st.file_type);
        Ok(st)
    }

    fn is_dir(&mut self) -> Result<bool> {
        if let Some(ft) = self.cached_type {
            return Ok(ft == FileType::Directory);
        }
        let st = self.stat()?;
        Ok(st.is_dir())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        // Zero-length reads succeed even against a closed or write-only
        // handle; guests use them as liveness probes.
        if buf.is_empty() {
            return Ok(0);
        }
        if self.backing.is_none() || !self.access_mode.readable() {
            return Err(Errno::BadDescriptor);
        }
        if self.is_dir()? {
            return Err(Errno::IsDirectory);
        }
        let backing = self.backing()?;
        let reader = backing.as_read().ok_or(Errno::BadDescriptor)?;
        reader.read(buf).map_err(Errno::from)
    }

    fn pread(&mut self, buf: &mut [u8], offset: i64) -> Result<usize> {
        if offset < 0 {
            return Err(Errno::InvalidArgument);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        if self.backing.is_none() || !self.access_mode.readable() {
            return Err(Errno::BadDescriptor);
        }
        if self.is_dir()? {
            return Err(Errno::IsDirectory);
        }
        let backing = self.backing()?;
        if let Some(reader) = backing.as_read_at() {
            return reader.read_at(buf, offset as u64).map_err(Errno::from);
        }

        // Emulate over seek+read. The pre-call offset is restored on every
        // exit, including a failed repositioning seek, so the sequential
        // cursor is undisturbed no matter what went wrong in between.
        let target = offset as u64;
        let (orig, seeked) = {
            let seeker = backing.as_seek().ok_or(Errno::NotSupported)?;
            let orig = seeker.stream_position().map_err(Errno::from)?;
            let seeked = if orig == target {
                Ok(())
            } else {
                seeker
                    .seek(SeekFrom::Start(target))
                    .map(|_| ())
                    .map_err(Errno::from)
            };
            (orig, seeked)
        };
        let read_result = match (seeked, backing.as_read()) {
            (Err(errno), _) => Err(errno),
            (Ok(()), None) => Err(Errno::NotSupported),
            (Ok(()), Some(reader)) => reader.read(buf).map_err(Errno::from),
        };
        let restore = match backing.as_seek() {
            Some(seeker) => seeker
                .seek(SeekFrom::Start(orig))
                .map(|_| ())
                .map_err(Errno::from),
            None => Err(Errno::NotSupported),
        };
        let n = read_result?;
        restore?;
        Ok(n)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        if self.backing.is_none() {
            return Err(Errno::BadDescriptor);
        }
        if self.is_dir()? {
            return Err(Errno::IsDirectory);
        }
        let from = match whence {
            Whence::Start => {
                if offset < 0 {
                    return Err(Errno::InvalidArgument);
                }
                SeekFrom::Start(offset as u64)
            }
            Whence::Current => SeekFrom::Current(offset),
            Whence::End => SeekFrom::End(offset),
        };
        let backing = self.backing()?;
        let seeker = backing.as_seek().ok_or(Errno::NotSupported)?;
        seeker.seek(from).map_err(Errno::from)
    }

    fn poll_read(&mut self, timeout: Option<Duration>) -> Result<bool> {
        let backing = self.backing()?;
        let poller = backing.as_poll().ok_or(Errno::NotSupported)?;
        poller.poll_read(timeout).map_err(Errno::from)
    }

    fn readdir(&mut self, n: i64) -> Result<Vec<Dirent>> {
        if self.backing.is_none() {
            return Err(Errno::BadDescriptor);
        }
        if !self.is_dir()? {
            return Err(Errno::NotDirectory);
        }
        let max = if n > 0 { Some(n as usize) } else { None };
        let backing = self.backing()?;
        let cursor = backing.as_list_dir().ok_or(Errno::NotSupported)?;
        let mut entries = Vec::new();
        loop {
            if max.is_some_and(|m| entries.len() == m) {
                break;
            }
            match cursor.next_entry().map_err(Errno::from)? {
                Some(entry) => entries.push(entry),
                None => break,
            }
        }
        Ok(entries)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if !self.access_mode.writable() {
            return Err(Errno::BadDescriptor);
        }
        let backing = self.backing()?;
        if backing.as_write().is_none() {
            return Err(Errno::NotSupported);
        }
        if self.is_dir()? {
            return Err(Errno::IsDirectory);
        }
        // Unlike reads, zero-length writes only succeed once the handle has
        // proven writable.
        if buf.is_empty() {
            return Ok(0);
        }
        let backing = self.backing()?;
        let writer = backing.as_write().ok_or(Errno::NotSupported)?;
        writer.write(buf).map_err(Errno::from)
    }

    fn pwrite(&mut self, buf: &[u8], offset: i64) -> Result<usize> {
        if offset < 0 {
            return Err(Errno::InvalidArgument);
        }
        if !self.access_mode.writable() {
            return Err(Errno::BadDescriptor);
        }
        let backing = self.backing()?;
        if backing.as_write_at().is_none() {
            return Err(Errno::NotSupported);
        }
        if self.is_dir()? {
            return Err(Errno::IsDirectory);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        let backing = self.backing()?;
        let writer = backing.as_write_at().ok_or(Errno::NotSupported)?;
        writer.write_at(buf, offset as u64).map_err(Errno::from)
    }

    fn truncate(&mut self, size: i64) -> Result<()> {
        if size < 0 {
            return Err(Errno::InvalidArgument);
        }
        if self.backing.is_none() {
            return Err(Errno::BadDescriptor);
        }
        if self.is_dir()? {
            return Err(Errno::IsDirectory);
        }
        if !self.access_mode.writable() {
            return Err(Errno::BadDescriptor);
        }
        let backing = self.backing()?;
        let resizer = backing.as_truncate().ok_or(Errno::NotSupported)?;
        resizer.truncate(size as u64).map_err(Errno::from)
    }

    fn sync(&mut self) -> Result<()> {
        let backing = self.backing()?;
        match backing.as_fsync() {
            Some(syncer) => syncer.sync().map_err(Errno::from),
            None => Ok(()),
        }
    }

    fn datasync(&mut self) -> Result<()> {
        let backing = self.backing()?;
        match backing.as_fsync() {
            Some(syncer) => syncer.datasync().map_err(Errno::from),
            None => Ok(()),
        }
    }

    fn chmod(&mut self, perm: Permissions) -> Result<()> {
        let backing = self.backing()?;
        let ctl = backing.as_chmod().ok_or(Errno::NotSupported)?;
        ctl.chmod(perm).map_err(Errno::from)
    }

    fn chown(&mut self, uid: u32, gid: u32) -> Result<()> {
        let backing = self.backing()?;
        let ctl = backing.as_chown().ok_or(Errno::NotSupported)?;
        ctl.chown(uid, gid).map_err(Errno::from)
    }

    fn utimens(&mut self, times: Option<&Timestamps>) -> Result<()> {
        let backing = self.backing()?;
        let ctl = backing.as_set_times().ok_or(Errno::NotSupported)?;
        let times = times.copied().unwrap_or(Timestamps::NOW);
        ctl.set_times(&times).map_err(Errno::from)
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the backing releases the host resource; a second close
        // finds nothing left to release and succeeds.
        self.backing.take();
        Ok(())
    }
}

/// A console stream handle with the fixed identity guests expect.
///
/// Stat answers are fabricated once at construction (type and mode from the
/// stream, zero size, link count one, epoch timestamps) so they stay stable
/// across calls even when the host console cannot be statted. Closing is a
/// no-op: the process console outlives every guest.
pub struct StdioFile {
    inner: BackedFile,
    st: Stat,
}

impl StdioFile {
    /// Wraps a console-style backing. `readable` selects whether this is an
    /// input stream (stdin) or an output stream (stdout, stderr).
    pub fn new(readable: bool, mut backing: Box<dyn Backing>) -> Self {
        let st = match backing.stat() {
            Ok(st) => Stat {
                file_type: st.file_type,
                permissions: st.permissions,
                ..Stat::default()
            },
            Err(_) => Stat {
                file_type: FileType::CharacterDevice,
                ..Stat::default()
            },
        };
        let access_mode = if readable {
            AccessMode::ReadOnly
        } else {
            AccessMode::WriteOnly
        };
        Self {
            inner: BackedFile::new("", access_mode, backing),
            st,
        }
    }

    /// The process standard input.
    pub fn stdin() -> Self {
        Self::new(true, Box::new(std::io::stdin()))
    }

    /// The process standard output.
    pub fn stdout() -> Self {
        Self::new(false, Box::new(std::io::stdout()))
    }

    /// The process standard error.
    pub fn stderr() -> Self {
        Self::new(false, Box::new(std::io::stderr()))
    }
}

impl File for StdioFile {
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
        Ok(self.st.clone())
    }

    fn is_dir(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner.read(buf)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.inner.seek(offset, whence)
    }

    fn poll_read(&mut self, timeout: Option<Duration>) -> Result<bool> {
        self.inner.poll_read(timeout)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.inner.write(buf)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read, Seek, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::ListDir;

    /// Counts stat calls so caching behavior is observable.
    struct CountingStat {
        calls: Arc<AtomicUsize>,
        file_type: FileType,
    }

    impl Backing for CountingStat {
        fn stat(&mut self) -> io::Result<Stat> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(Stat {
                file_type: self.file_type,
                ..Stat::default()
            })
        }
    }

    /// Offers seek and sequential read but no positioned read, forcing the
    /// pread emulation path.
    struct SeekOnly(Cursor<Vec<u8>>);

    impl Backing for SeekOnly {
        fn stat(&mut self) -> io::Result<Stat> {
            Ok(Stat::default())
        }

        fn as_read(&mut self) -> Option<&mut dyn Read> {
            Some(&mut self.0)
        }

        fn as_seek(&mut self) -> Option<&mut dyn Seek> {
            Some(&mut self.0)
        }
    }

    /// Seeks succeed except for a one-shot poisoned absolute target, where
    /// the cursor moves first and the call then fails.
    struct PoisonedSeek {
        cursor: Cursor<Vec<u8>>,
        poison: Option<u64>,
    }

    impl Seek for PoisonedSeek {
        fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
            let n = self.cursor.seek(pos)?;
            if let io::SeekFrom::Start(target) = pos {
                if self.poison.take_if(|p| *p == target).is_some() {
                    return Err(io::Error::other("seek fault"));
                }
            }
            Ok(n)
        }
    }

    struct PoisonedBacking(PoisonedSeek);

    impl Backing for PoisonedBacking {
        fn stat(&mut self) -> io::Result<Stat> {
            Ok(Stat::default())
        }

        fn as_read(&mut self) -> Option<&mut dyn Read> {
            Some(&mut self.0.cursor)
        }

        fn as_seek(&mut self) -> Option<&mut dyn Seek> {
            Some(&mut self.0)
        }
    }

    /// Records every absolute repositioning target.
    struct RecordingSeek {
        cursor: Cursor<Vec<u8>>,
        starts: Arc<Mutex<Vec<u64>>>,
    }

    impl Seek for RecordingSeek {
        fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
            if let io::SeekFrom::Start(target) = pos {
                self.starts.lock().expect("lock").push(target);
            }
            self.cursor.seek(pos)
        }
    }

    struct RecordingBacking(RecordingSeek);

    impl Backing for RecordingBacking {
        fn stat(&mut self) -> io::Result<Stat> {
            Ok(Stat::default())
        }

        fn as_read(&mut self) -> Option<&mut dyn Read> {
            Some(&mut self.0.cursor)
        }

        fn as_seek(&mut self) -> Option<&mut dyn Seek> {
            Some(&mut self.0)
        }
    }

    /// A fixed directory listing served one entry at a time.
    struct FakeDir {
        entries: Vec<Dirent>,
        next: usize,
    }

    impl Backing for FakeDir {
        fn stat(&mut self) -> io::Result<Stat> {
            Ok(Stat {
                file_type: FileType::Directory,
                ..Stat::default()
            })
        }

        fn as_list_dir(&mut self) -> Option<&mut dyn ListDir> {
            Some(self)
        }
    }

    impl ListDir for FakeDir {
        fn next_entry(&mut self) -> io::Result<Option<Dirent>> {
            let entry = self.entries.get(self.next).cloned();
            if entry.is_some() {
                self.next += 1;
            }
            Ok(entry)
        }
    }

    /// A writable sink without read support.
    struct SinkOnly(Vec<u8>);

    impl Backing for SinkOnly {
        fn stat(&mut self) -> io::Result<Stat> {
            Ok(Stat::default())
        }

        fn as_write(&mut self) -> Option<&mut dyn Write> {
            Some(&mut self.0)
        }
    }

    fn dirent(name: &str) -> Dirent {
        Dirent {
            name: name.to_string(),
            ino: 0,
            file_type: FileType::File,
        }
    }

    #[test]
    fn is_dir_stats_at_most_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backing = CountingStat {
            calls: Arc::clone(&calls),
            file_type: FileType::Directory,
        };
        let mut f = BackedFile::new("d", AccessMode::ReadOnly, Box::new(backing));
        assert!(f.is_dir().expect("is_dir"));
        assert!(f.is_dir().expect("is_dir again"));
        assert!(f.is_dir().expect("is_dir a third time"));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn pread_restores_sequential_offset() {
        let data = b"abcdefghijklmnopqrst".to_vec();
        let backing = SeekOnly(Cursor::new(data));
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));

        // Advance the sequential cursor first.
        let mut buf = [0u8; 4];
        assert_eq!(f.read(&mut buf).expect("read"), 4);
        assert_eq!(&buf, b"abcd");

        // A positioned read must not disturb it.
        let mut pbuf = [0u8; 10];
        assert_eq!(f.pread(&mut pbuf, 0).expect("pread"), 10);
        assert_eq!(&pbuf, b"abcdefghij");

        assert_eq!(f.read(&mut buf).expect("read after pread"), 4);
        assert_eq!(&buf, b"efgh");
    }

    #[test]
    fn repeated_preads_are_position_independent() {
        let data = b"abcdefghijklmnopqrst".to_vec();
        let backing = SeekOnly(Cursor::new(data));
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));

        let mut buf = [0u8; 10];
        assert_eq!(f.pread(&mut buf, 10).expect("pread at 10"), 10);
        assert_eq!(&buf, b"klmnopqrst");
        assert_eq!(f.pread(&mut buf, 0).expect("pread at 0"), 10);
        assert_eq!(&buf, b"abcdefghij");
        assert_eq!(f.pread(&mut buf, 10).expect("pread at 10 again"), 10);
        assert_eq!(&buf, b"klmnopqrst");

        // The sequential cursor never moved off the start.
        let mut head = [0u8; 4];
        assert_eq!(f.read(&mut head).expect("read"), 4);
        assert_eq!(&head, b"abcd");
    }

    #[test]
    fn pread_restores_offset_when_repositioning_fails() {
        let backing = PoisonedBacking(PoisonedSeek {
            cursor: Cursor::new(b"abcdef".to_vec()),
            poison: Some(5),
        });
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));

        let mut buf = [0u8; 4];
        assert_eq!(f.read(&mut buf).expect("read"), 4);

        // The repositioning seek moves the cursor and then fails; the
        // failure must not leak the moved cursor to the next read.
        let mut pbuf = [0u8; 1];
        assert_eq!(f.pread(&mut pbuf, 5), Err(Errno::Io));
        let mut tail = [0u8; 2];
        assert_eq!(f.read(&mut tail).expect("read after failed pread"), 2);
        assert_eq!(&tail, b"ef");
    }

    #[test]
    fn pread_at_current_offset_skips_repositioning() {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let backing = RecordingBacking(RecordingSeek {
            cursor: Cursor::new(b"abcdef".to_vec()),
            starts: Arc::clone(&starts),
        });
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));

        let mut buf = [0u8; 4];
        assert_eq!(f.read(&mut buf).expect("read"), 4);

        let mut pbuf = [0u8; 2];
        assert_eq!(f.pread(&mut pbuf, 4).expect("pread"), 2);
        assert_eq!(&pbuf, b"ef");

        // Only the restoring seek happened.
        assert_eq!(*starts.lock().expect("lock"), [4]);
    }

    #[test]
    fn pread_rejects_negative_offset() {
        let backing = SeekOnly(Cursor::new(b"x".to_vec()));
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));
        let mut buf = [0u8; 1];
        assert_eq!(f.pread(&mut buf, -1), Err(Errno::InvalidArgument));
    }

    #[test]
    fn readdir_batches_then_drains() {
        let backing = FakeDir {
            entries: vec![dirent("a"), dirent("b"), dirent("c")],
            next: 0,
        };
        let mut f = BackedFile::new("d", AccessMode::ReadOnly, Box::new(backing));
        let first = f.readdir(2).expect("first batch");
        assert_eq!(first.len(), 2);
        let second = f.readdir(2).expect("second batch");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "c");
        assert!(f.readdir(2).expect("exhausted").is_empty());
    }

    #[test]
    fn readdir_on_regular_file_is_not_directory() {
        let backing = SeekOnly(Cursor::new(Vec::new()));
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));
        assert_eq!(f.readdir(0).unwrap_err(), Errno::NotDirectory);
    }

    #[test]
    fn zero_length_read_succeeds_on_write_only_handle() {
        let backing = SinkOnly(Vec::new());
        let mut f = BackedFile::new("f", AccessMode::WriteOnly, Box::new(backing));
        assert_eq!(f.read(&mut []), Ok(0));
        // A real read against the same handle still fails.
        assert_eq!(f.read(&mut [0u8; 1]), Err(Errno::BadDescriptor));
    }

    #[test]
    fn write_gates_differ_from_read_gates() {
        // Writing a read-only handle is a descriptor error.
        let backing = SinkOnly(Vec::new());
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));
        assert_eq!(f.write(b"x"), Err(Errno::BadDescriptor));

        // Writing a backing with no write capability is unsupported.
        let backing = SeekOnly(Cursor::new(Vec::new()));
        let mut f = BackedFile::new("f", AccessMode::ReadWrite, Box::new(backing));
        assert_eq!(f.write(b"x"), Err(Errno::NotSupported));
    }

    #[test]
    fn zero_length_write_checks_access_first() {
        let backing = SinkOnly(Vec::new());
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));
        assert_eq!(f.write(&[]), Err(Errno::BadDescriptor));

        let backing = SinkOnly(Vec::new());
        let mut f = BackedFile::new("f", AccessMode::WriteOnly, Box::new(backing));
        assert_eq!(f.write(&[]), Ok(0));
    }

    #[test]
    fn close_is_idempotent_and_revokes_operations() {
        let backing = SeekOnly(Cursor::new(b"data".to_vec()));
        let mut f = BackedFile::new("f", AccessMode::ReadOnly, Box::new(backing));
        assert_eq!(f.close(), Ok(()));
        assert_eq!(f.close(), Ok(()));
        assert_eq!(f.read(&mut [0u8; 1]), Err(Errno::BadDescriptor));
        assert_eq!(f.stat().unwrap_err(), Errno::BadDescriptor);
        assert_eq!(f.seek(0, Whence::Start), Err(Errno::BadDescriptor));
    }

    #[test]
    fn read_on_directory_is_is_directory() {
        let backing = FakeDir {
            entries: Vec::new(),
            next: 0,
        };
        let mut f = BackedFile::new("d", AccessMode::ReadOnly, Box::new(backing));
        assert_eq!(f.read(&mut [0u8; 1]), Err(Errno::IsDirectory));
        assert_eq!(f.seek(4, Whence::Start), Err(Errno::IsDirectory));
    }

    #[test]
    fn stdio_file_has_fixed_identity() {
        let backing = SinkOnly(Vec::new());
        let mut f = StdioFile::new(false, Box::new(backing));
        assert_eq!(f.path(), "");
        assert_eq!(f.access_mode(), AccessMode::WriteOnly);
        assert!(!f.is_dir().expect("is_dir"));

        let st = f.stat().expect("stat");
        assert_eq!(st.nlink, 1);
        assert_eq!(st.size, 0);
        let again = f.stat().expect("stat again");
        assert_eq!(st.accessed, again.accessed);
        assert_eq!(st.modified, again.modified);

        // Closing never severs the console; the handle stays usable.
        assert_eq!(f.close(), Ok(()));
        assert_eq!(f.write(b"still open").expect("write"), 10);
    }
}
