//! Scoped access to user-chosen files.
//!
//! Some hosts only let a process touch a user-picked file between an explicit
//! acquire and release (sandbox bookmarks, portal handles, mounted shares).
//! [`ScopedAccess`] pairs the two: it acquires on construction and releases on
//! drop, so early returns, `?` and panics all give the permission back.

use std::path::{Path, PathBuf};

/// Host-specific permission to read or write a path.
pub trait ResourceAccess: Send + Sync {
    /// Try to gain access; `false` means there is nothing to release.
    fn acquire(&self, path: &Path) -> bool;

    /// Give back access gained by a successful [`acquire`](Self::acquire).
    fn release(&self, path: &Path);
}

/// No sandbox: every path is already accessible.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsandboxed;

impl ResourceAccess for Unsandboxed {
    fn acquire(&self, _path: &Path) -> bool {
        false
    }

    fn release(&self, _path: &Path) {}
}

/// Guard holding access to one path until dropped.
pub struct ScopedAccess<'a> {
    access: &'a dyn ResourceAccess,
    path: PathBuf,
    acquired: bool,
}

impl<'a> ScopedAccess<'a> {
    pub fn acquire(access: &'a dyn ResourceAccess, path: &Path) -> Self {
        let acquired = access.acquire(path);
        if acquired {
            tracing::trace!(path = %path.display(), "acquired scoped access");
        }
        Self {
            access,
            path: path.to_path_buf(),
            acquired,
        }
    }
}

impl Drop for ScopedAccess<'_> {
    fn drop(&mut self) {
        if self.acquired {
            self.access.release(&self.path);
            tracing::trace!(path = %self.path.display(), "released scoped access");
        }
    }
}
