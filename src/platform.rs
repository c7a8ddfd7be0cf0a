//! Platform-specific attribute handling.
//! Hides OS differences behind a uniform API so the rest of the codebase can
//! remain platform-agnostic.

use std::fs;
use std::path::Path;
use tracing::trace;

/// Clear attributes that commonly block deletion (read-only bit; owner write
/// permission on Unix). Best-effort: failures are swallowed; the delete that
/// follows will surface any real problem.
pub fn clear_protective_attributes(path: &Path) {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return;
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = meta.permissions().mode();
        if mode & 0o200 == 0 {
            let perms = fs::Permissions::from_mode(mode | 0o200);
            if fs::set_permissions(path, perms).is_ok() {
                trace!(path = %path.display(), "restored owner write bit before delete");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let mut perms = meta.permissions();
        if perms.readonly() {
            perms.set_readonly(false);
            if fs::set_permissions(path, perms).is_ok() {
                trace!(path = %path.display(), "cleared read-only attribute before delete");
            }
        }
    }
}
