use std::fs;
use std::path::{Path, PathBuf};

use log;

/// On-disk cache of API responses, one directory per season so that a
/// season still in progress can be dropped wholesale.
pub struct Cache {
    dir: Option<PathBuf>,
}

impl Cache {
    /// A cache rooted at `dir`. If the directory can't be created the
    /// cache is disabled rather than failing the run.
    pub fn new(dir: &Path) -> Cache {
        match fs::create_dir_all(dir) {
            Ok(()) => Cache {
                dir: Some(dir.to_path_buf()),
            },
            Err(e) => {
                log::warn!("Cache disabled, cannot use {}: {}", dir.display(), e);
                Cache { dir: None }
            }
        }
    }

    pub fn disabled() -> Cache {
        Cache { dir: None }
    }

    fn entry(&self, season: i32, key: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|d| d.join(season.to_string()).join(format!("{}.json", sanitize(key))))
    }

    pub fn get(&self, season: i32, key: &str) -> Option<Vec<u8>> {
        let path = self.entry(season, key)?;
        let data = fs::read(&path).ok()?;
        log::debug!("cache hit {}", path.display());
        Some(data)
    }

    pub fn put(&self, season: i32, key: &str, data: &[u8]) {
        let Some(path) = self.entry(season, key) else {
            return;
        };
        let res = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(&path, data));
        if let Err(e) = res {
            log::warn!("Cannot write cache entry {}: {}", path.display(), e);
        }
    }

    /// Forget everything cached for `season`.
    pub fn flush(&self, season: i32) -> Result<(), String> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let dir = dir.join(season.to_string());
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Cannot flush cache {}: {}", dir.display(), e)),
        }
    }
}

fn sanitize(key: &str) -> String {
    let key = key
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}
