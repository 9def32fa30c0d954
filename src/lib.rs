pub mod bluesky;
pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod curl;
pub mod documents;
pub mod gamelog;
pub mod job;
pub mod launcher;
pub mod lock;
pub mod metrics;
pub mod mlbstats;
pub mod posts;
pub mod render;
pub mod utils;

use chrono::{Datelike, Local};

use crate::{
    cache::Cache,
    config::Config,
    documents::{ConfigDocument, SecretsDocument},
    job::{BlueskyPublisher, DryRunPublisher, Job, Publisher},
    mlbstats::{MlbStats, SeasonSource},
};

pub fn run(cfg: Config) -> Result<(), String> {
    log::debug!("cfg.paths={:?}", cfg.paths);
    log::debug!("cfg.lock_file={:?}", cfg.lock_file);
    log::debug!("cfg.dry_run={:?}", cfg.dry_run);

    let stats = MlbStats::new(Cache::new(&cfg.paths.cache_dir));
    locked(&cfg, stats.cache(), || {
        post_all(&cfg, &stats, &|secrets: &SecretsDocument| publisher_for(&cfg, secrets))
    })
}

/// Run `work` under the run lock, then drop this year's cached data
/// whatever the outcome.
fn locked<F>(cfg: &Config, cache: &Cache, work: F) -> Result<(), String>
where
    F: FnOnce() -> Result<(), String>,
{
    log::info!("Attempting to acquire lock...");
    let lock = lock::acquire(&cfg.lock_file)?;
    log::info!("Lock acquired successfully.");

    let result = work();
    if let Err(e) = &result {
        log::error!("An error occurred: {}", e);
    }

    // Results for a season still being played change daily.
    log::info!("Removing cached data from this year...");
    if let Err(e) = cache.flush(Local::now().year()) {
        log::warn!("{}", e);
    }

    drop(lock);
    log::info!("Lock released.");
    result
}

fn publisher_for(cfg: &Config, secrets: &SecretsDocument) -> Result<Box<dyn Publisher>, String> {
    if cfg.dry_run {
        return Ok(Box::new(DryRunPublisher::new(cfg.out_dir.clone())));
    }
    log::info!("Logging in to Bluesky as {}...", secrets.bluesky.username);
    Ok(Box::new(BlueskyPublisher::new(bluesky::Client::login(&secrets.bluesky)?)))
}

type PublisherFactory<'a> = dyn Fn(&SecretsDocument) -> Result<Box<dyn Publisher>, String> + 'a;

fn post_all(cfg: &Config, source: &dyn SeasonSource, publisher_for: &PublisherFactory<'_>) -> Result<(), String> {
    log::info!("Loading configuration from {}...", cfg.paths.config_file.display());
    let mut doc: ConfigDocument = documents::load(&cfg.paths.config_file)?;
    log::debug!("Configuration loaded: {:?}", doc);

    log::info!("Loading secrets from {}...", cfg.paths.secrets_file.display());
    let secrets: SecretsDocument = documents::load(&cfg.paths.secrets_file)?;
    log::debug!("Secrets loaded: {:?}", secrets);

    let mut publisher = publisher_for(&secrets)?;
    let mut job = Job::new(source, publisher.as_mut(), cfg.pause);
    let result = job
        .run_pairs(&mut doc.pairs)
        .and_then(|n| Ok(n + job.run_diffs(&mut doc.diffs)?));

    if cfg.dry_run {
        log::info!("Dry run, not saving {}", cfg.paths.config_file.display());
        return result.map(|_| ());
    }

    // Whatever went out is recorded, even if a later post failed.
    log::info!("Saving updated configuration to {}...", cfg.paths.config_file.display());
    documents::save(&doc, &cfg.paths.config_file)?;
    log::info!("Configuration saved successfully.");

    let posted = result?;
    log::info!("{} post(s) published.", posted);
    Ok(())
}
