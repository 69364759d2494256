//! Asset-to-cache copy utility

use std::fs;
use std::path::{Path, PathBuf};

use super::{AssetError, AssetStore};

/// Copy a named bundled asset into the cache directory exactly once.
///
/// The copy is skipped when the destination already exists. Returns the
/// cached file's path either way.
pub fn ensure_cached(
    cache_dir: &Path,
    store: &AssetStore,
    subpath: &str,
    name: &str,
) -> Result<PathBuf, AssetError> {
    let dest = cache_dir.join(name);
    if !dest.exists() {
        let bytes = store.read(&format!("{subpath}{name}"))?;
        fs::create_dir_all(cache_dir)?;
        fs::write(&dest, bytes)?;
        log::debug!("cached asset {name} at {}", dest.display());
    }
    Ok(dest)
}
