//! Windows open-flag constants.
//!
//! Directory handles on Windows require backup semantics at open time; there
//! is no `O_DIRECTORY` analogue in the default flag set.

/// `FILE_FLAG_BACKUP_SEMANTICS`: required to obtain a handle to a directory.
pub(crate) const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;
