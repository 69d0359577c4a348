use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting generated files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `data` to `path`, creating parents. The file gets the process
/// umask's default mode, unlike [`atomic_write`] which leaves it owner-only.
pub fn write_plain(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_plain(path, data)?;
    Ok(true)
}

/// Write a file, keeping an existing one unless `force` is set.
/// Returns true if written.
pub fn write_file(path: &Path, data: &[u8], force: bool) -> Result<bool> {
    if force {
        write_plain(path, data)?;
        return Ok(true);
    }
    write_if_missing(path, data)
}

/// Serialize `value` as pretty JSON with a trailing newline, keeping an
/// existing file unless `force` is set.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    let mut data = serde_json::to_string_pretty(value)?;
    data.push('\n');
    write_plain(path, data.as_bytes())?;
    Ok(true)
}

/// True when `path` is missing or is a directory with no entries.
pub fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(std::fs::read_dir(path)?.next().is_none())
}

/// Recursively copy `src` into `dest`, creating directories as needed.
/// Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<usize> {
    ensure_dir(dest)?;
    let mut copied = 0;
    let mut entries: Vec<_> = std::fs::read_dir(src)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
