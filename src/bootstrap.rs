use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log;

use crate::config::Paths;

pub const DEFAULT_CONFIG: &str = "\
diffs:
  - team: CHW
    year: 2024
    games_played: 0
pairs:
  - teamA: NYM
    yearA: 1962
    colorA: orange
    teamB: CHW
    yearB: \"2024\"
    colorB: black
    games_played: 0
";

pub const DEFAULT_SECRETS: &str = "\
bluesky:
  username: your-handle.bsky.social
  password: your-app-password
";

/// Make sure a file exists at `path`, writing `content` if nothing is
/// there yet. An existing file is never touched, whatever it contains.
///
/// Returns whether the file was created.
pub fn ensure_file(path: &Path, content: &str) -> Result<bool, String> {
    if path.exists() {
        log::debug!("{} exists, leaving it alone", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Cannot create directory {}: {}", parent.display(), e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        // Someone else got there first: same as "exists".
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(format!("Cannot create {}: {}", path.display(), e)),
    };
    file.write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;

    Ok(true)
}

/// Create the default config and secrets documents where they are missing.
pub fn bootstrap(paths: &Paths) -> Result<(), String> {
    if ensure_file(&paths.config_file, DEFAULT_CONFIG)? {
        println!("Created default config file at {}", paths.config_file.display());
    }
    if ensure_file(&paths.secrets_file, DEFAULT_SECRETS)? {
        println!("Created default secrets file at {}", paths.secrets_file.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{ConfigDocument, SecretsDocument};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn paths_in(dir: &TempDir) -> Paths {
        Paths {
            config_file: dir.path().join("config.yaml"),
            secrets_file: dir.path().join("secrets.yaml"),
            cache_dir: dir.path().join("cache"),
        }
    }

    #[test]
    fn creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        assert!(ensure_file(&path, DEFAULT_CONFIG).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        for content in ["diffs: []\n", "", "{{{ not yaml"] {
            fs::write(&path, content).unwrap();
            assert!(!ensure_file(&path, DEFAULT_CONFIG).unwrap());
            assert_eq!(fs::read_to_string(&path).unwrap(), content);
        }
    }

    #[test]
    fn idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        bootstrap(&paths).unwrap();
        let first = (
            fs::read(&paths.config_file).unwrap(),
            fs::read(&paths.secrets_file).unwrap(),
        );
        bootstrap(&paths).unwrap();
        let second = (
            fs::read(&paths.config_file).unwrap(),
            fs::read(&paths.secrets_file).unwrap(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("secrets.yaml");
        assert!(ensure_file(&path, DEFAULT_SECRETS).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_SECRETS);
    }

    #[test]
    fn unwritable_parent_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let v = ensure_file(&blocker.join("config.yaml"), DEFAULT_CONFIG);
        assert!(v.is_err());
    }

    #[test]
    fn config_failure_stops_before_secrets() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let paths = Paths {
            config_file: blocker.join("config.yaml"),
            secrets_file: dir.path().join("secrets.yaml"),
            cache_dir: PathBuf::from("/cache"),
        };
        assert!(bootstrap(&paths).is_err());
        assert!(!paths.secrets_file.exists());
    }

    #[test]
    fn only_missing_one_is_created() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        fs::write(&paths.config_file, "diffs: []\n").unwrap();
        bootstrap(&paths).unwrap();
        assert_eq!(fs::read_to_string(&paths.config_file).unwrap(), "diffs: []\n");
        assert_eq!(fs::read_to_string(&paths.secrets_file).unwrap(), DEFAULT_SECRETS);
    }

    #[test]
    fn defaults_are_valid_documents() {
        let cfg: ConfigDocument = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(cfg.diffs.len(), 1);
        assert_eq!(cfg.pairs.len(), 1);
        assert_eq!(cfg.pairs[0].year_b.year(), 2024);
        assert_eq!(cfg.pairs[0].games_played, 0);
        let secrets: SecretsDocument = serde_yaml::from_str(DEFAULT_SECRETS).unwrap();
        assert_eq!(secrets.bluesky.username, "your-handle.bsky.social");
    }
}
