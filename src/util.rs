//! Мелкие файловые утилиты.

use std::path::Path;

// Best-effort fsync parent directory after rename (Unix only).
#[cfg(unix)]
pub fn fsync_parent_dir(p: &Path) -> std::io::Result<()> {
    use std::fs::File;
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn fsync_parent_dir(_p: &Path) -> std::io::Result<()> {
    Ok(())
}
