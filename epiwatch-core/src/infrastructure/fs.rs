// epiwatch-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the same directory as the target so the final
/// rename never crosses filesystems. The target is either fully written or
/// left untouched.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Pretty JSON, written atomically.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, data: &T) -> Result<(), InfrastructureError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| InfrastructureError::Io(std::io::Error::other(e)))?;
    atomic_write(path, content)
}

pub fn ensure_dir(path: &Path) -> Result<(), InfrastructureError> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
