use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Result, anyhow};

/// Create the collect output directory if needed and check that history
/// files can be written into it.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !std::fs::metadata(path)?.is_dir() {
            return Err(anyhow!("output path is not a directory: {}", path.display()));
        }
    } else {
        std::fs::create_dir_all(path)?;
    }

    let probe_path = path.join(".eduhistory_write_probe");
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&probe_path)
        .map_err(|err| anyhow!("output directory is not writable: {} ({err})", path.display()))?;
    let _ = std::fs::remove_file(&probe_path);
    Ok(())
}

/// Whether other users can list `dir`. Private history written there would
/// be readable by them.
#[cfg(unix)]
pub fn is_world_readable(dir: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    Ok(std::fs::metadata(dir)?.permissions().mode() & 0o004 != 0)
}

#[cfg(not(unix))]
pub fn is_world_readable(_dir: &Path) -> Result<bool> {
    Ok(false)
}
