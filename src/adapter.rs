//! Adapts a minimal path-to-resource namespace into a full mount.

use std::io;

use crate::{BackedFile, Backing, Errno, File, FileSystem, OpenFlags, Permissions, Result, Stat};

/// The smallest surface a mountable namespace has to provide: resolve a
/// cleaned, mount-relative path to a backing resource.
///
/// Fake and archive-backed filesystems implement this one method and gain
/// the full [`FileSystem`] contract through [`NamespaceFs`].
pub trait Namespace: Send + Sync {
    /// Opens the resource at `path`. The path is already normalized: no
    /// leading slash, no `.` or `..` segments, `"."` for the root itself.
    fn open(&self, path: &str) -> io::Result<Box<dyn Backing>>;
}

/// A [`FileSystem`] over any [`Namespace`].
///
/// Paths are normalized before they reach the namespace, so implementors
/// never see absolute or dotted forms. No flag validation happens here:
/// flags only pick the access mode of the returned handle, and mutation
/// attempts surface as capability errors from the backing itself. Mutating
/// operations on the mount inherit [`Errno::NotSupported`].
///
/// `lstat` degrades to [`NamespaceFs::stat`]: a namespace this minimal
/// cannot represent symlinks, and that approximation is documented in the
/// [`FileSystem::lstat`] contract.
pub struct NamespaceFs<N> {
    ns: N,
}

impl<N> NamespaceFs<N> {
    /// Mounts `ns`.
    pub fn new(ns: N) -> Self {
        Self { ns }
    }
}

impl<N: Namespace> FileSystem for NamespaceFs<N> {
    fn open_file(&self, path: &str, flags: OpenFlags, _perm: Permissions) -> Result<Box<dyn File>> {
        let cleaned = clean_path(path);
        let backing = self.ns.open(&cleaned).map_err(Errno::from)?;
        Ok(Box::new(BackedFile::new(
            cleaned,
            flags.access_mode(),
            backing,
        )))
    }

    fn stat(&self, path: &str) -> Result<Stat> {
        let mut backing = self.ns.open(&clean_path(path)).map_err(Errno::from)?;
        backing.stat().map_err(Errno::from)
    }

    fn lstat(&self, path: &str) -> Result<Stat> {
        self.stat(path)
    }
}

/// Lexically normalizes a guest path to the mount-relative form namespaces
/// expect.
///
/// One leading `/` is stripped (guest paths address the mount root), `.`
/// segments and empty segments collapse, and `..` resolves against earlier
/// segments. A path that resolves to the root becomes `"."`; the empty
/// string stays empty so callers can reject it with the host's own error.
pub(crate) fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !rooted {
                    // Relative paths keep leading ".." for the namespace to
                    // judge; rooted ones cannot climb above the mount.
                    segments.push("..");
                }
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return ".".to_string();
    }
    segments.join("/")
}
