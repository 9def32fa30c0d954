use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const CONFIG_FILE_VAR: &str = "CONFIG_FILE_PATH";
pub const SECRETS_FILE_VAR: &str = "SECRETS_FILE_PATH";
pub const CACHE_DIR_VAR: &str = "PYBASEBALL_CACHE";

pub const DEFAULT_CONFIG_FILE: &str = "/config/config.yaml";
pub const DEFAULT_SECRETS_FILE: &str = "/config/secrets.yaml";
pub const DEFAULT_CACHE_DIR: &str = "/cache";

/// Filesystem locations shared by the entrypoint and the job, resolved
/// once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub config_file: PathBuf,
    pub secrets_file: PathBuf,
    pub cache_dir: PathBuf,
}

impl Paths {
    pub fn from_env() -> Paths {
        Paths::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Paths
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty variable counts as unset, like ${VAR:-default}.
        let resolve = |key: &str, default: &str| {
            PathBuf::from(
                lookup(key)
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| default.to_string()),
            )
        };
        Paths {
            config_file: resolve(CONFIG_FILE_VAR, DEFAULT_CONFIG_FILE),
            secrets_file: resolve(SECRETS_FILE_VAR, DEFAULT_SECRETS_FILE),
            cache_dir: resolve(CACHE_DIR_VAR, DEFAULT_CACHE_DIR),
        }
    }
}

pub struct Config {
    pub paths: Paths,
    pub lock_file: PathBuf,
    pub pause: Duration,
    pub dry_run: bool,
    pub out_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    pub fn get() -> Result<Config, String> {
	Cli::parse().to_config(Paths::from_env())
    }
}

#[derive(Debug, Parser)]
#[command(name = "season-metrics")]
#[command(version = "0.1.0")]
#[command(about = "Compare MLB seasons at game N and post them to Bluesky", long_about = None)]
struct Cli {
    /// Don't post or save anything, only log what would be posted
    #[arg(long)]
    dry_run: bool,
    /// With --dry-run, write each rendered image to this directory
    #[arg(long, value_name = "DIR", requires = "dry_run")]
    out_dir: Option<PathBuf>,
    /// Seconds to wait after each post (rate limiting)
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    pause: u64,
    /// Lock file guarding against overlapping runs
    #[arg(long, value_name = "PATH")]
    lock_file: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

fn default_lock_file() -> PathBuf {
    env::temp_dir().join("season-metrics.lock")
}

impl Cli {
    fn to_config(self, paths: Paths) -> Result<Config, String> {
        if let Some(dir) = &self.out_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("Not a directory: {}", dir.display()));
            }
        }
        Ok(Config {
            paths,
            lock_file: self.lock_file.unwrap_or_else(default_lock_file),
            pause: Duration::from_secs(self.pause),
            dry_run: self.dry_run,
            out_dir: self.out_dir,
            verbose: self.verbose,
        })
    }
}
