//! Offline asset cache.
//!
//! A fixed manifest of static assets is pre-fetched from the origin
//! assets directory into a named cache directory when the watch loop
//! starts. Reads are cache-first: a cached entry is served if present,
//! otherwise the read passes through to the origin. There is no
//! invalidation beyond the cache directory name.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{PillboxError, Result};

/// Name of the cache directory; bump it to invalidate everything.
pub const CACHE_NAME: &str = "assets-v1";

/// The fixed set of static assets the cache pre-fetches.
pub const ASSET_MANIFEST: &[&str] = &["alarm_banner.txt", "notification_icon.txt"];

/// Banner used when neither the cache nor the origin has one.
pub const DEFAULT_ALARM_BANNER: &str = "*** MEDICATION REMINDER ***";

/// Cache-first access to the static assets.
pub struct AssetCache {
    origin_dir: PathBuf,
    cache_dir: PathBuf,
}

impl AssetCache {
    pub fn new(origin_dir: PathBuf, cache_root: &Path) -> Self {
        Self {
            origin_dir,
            cache_dir: cache_root.join(CACHE_NAME),
        }
    }

    /// Pre-fetches every manifest entry from the origin into the cache.
    /// Entries missing at the origin are skipped; returns how many were
    /// installed.
    pub fn install(&self) -> Result<usize> {
        fs::create_dir_all(&self.cache_dir).map_err(|_| PillboxError::DirectoryError {
            path: self.cache_dir.clone(),
        })?;

        let mut installed = 0;
        for name in ASSET_MANIFEST {
            let origin = self.origin_dir.join(name);
            if !origin.is_file() {
                debug!("Asset {} not present at origin, skipping", name);
                continue;
            }
            match fs::copy(&origin, self.cache_dir.join(name)) {
                Ok(_) => installed += 1,
                Err(e) => warn!("Failed to cache asset {}: {}", name, e),
            }
        }

        info!(
            "Asset cache {} ready, {} of {} assets installed",
            CACHE_NAME,
            installed,
            ASSET_MANIFEST.len()
        );
        Ok(installed)
    }

    /// Serves the cached entry if present, otherwise passes through to
    /// the origin.
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let cached = self.cache_dir.join(name);
        if cached.is_file() {
            debug!("Serving {} from cache", name);
            return Ok(fs::read(cached)?);
        }

        let origin = self.origin_dir.join(name);
        if origin.is_file() {
            debug!("Cache miss for {}, passing through to origin", name);
            return Ok(fs::read(origin)?);
        }

        Err(PillboxError::AssetMissing {
            name: name.to_string(),
        })
    }

    /// The alarm banner as text, falling back to the built-in default
    /// when the asset is unavailable.
    pub fn alarm_banner(&self) -> String {
        match self.fetch("alarm_banner.txt") {
            Ok(bytes) => String::from_utf8_lossy(&bytes).trim_end().to_string(),
            Err(e) => {
                debug!("Using built-in alarm banner ({})", e);
                DEFAULT_ALARM_BANNER.to_string()
            }
        }
    }
}
