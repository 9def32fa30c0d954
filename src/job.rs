use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use log;

use crate::bluesky;
use crate::documents::{DiffRecord, PairRecord};
use crate::metrics::RunDiffMetrics;
use crate::mlbstats::SeasonSource;
use crate::posts::{self, Post, Side};
use crate::render;

pub trait Publisher {
    fn publish(&mut self, post: &Post) -> Result<(), String>;
}

pub struct BlueskyPublisher {
    client: bluesky::Client,
}

impl BlueskyPublisher {
    pub fn new(client: bluesky::Client) -> BlueskyPublisher {
        BlueskyPublisher { client }
    }
}

impl Publisher for BlueskyPublisher {
    fn publish(&mut self, post: &Post) -> Result<(), String> {
        let png = render::rasterize(&post.svg)?;
        self.client.send_image(&post.text, &png, &post.alt)
    }
}

/// Logs posts instead of sending them, optionally keeping the images.
pub struct DryRunPublisher {
    out_dir: Option<PathBuf>,
    count: usize,
}

impl DryRunPublisher {
    pub fn new(out_dir: Option<PathBuf>) -> DryRunPublisher {
        DryRunPublisher { out_dir, count: 0 }
    }
}

impl Publisher for DryRunPublisher {
    fn publish(&mut self, post: &Post) -> Result<(), String> {
        self.count += 1;
        log::info!("[dry run] post #{}:\n{}", self.count, post.text);
        log::debug!("[dry run] alt: {}", post.alt);
        if let Some(dir) = &self.out_dir {
            fs::create_dir_all(dir).map_err(|e| format!("Cannot create {}: {}", dir.display(), e))?;
            let path = dir.join(format!("{}.svg", self.count));
            fs::write(&path, &post.svg).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
            log::info!("[dry run] image written to {}", path.display());
        }
        Ok(())
    }
}

pub struct Job<'a> {
    source: &'a dyn SeasonSource,
    publisher: &'a mut dyn Publisher,
    pause: Duration,
}

impl<'a> Job<'a> {
    pub fn new(source: &'a dyn SeasonSource, publisher: &'a mut dyn Publisher, pause: Duration) -> Job<'a> {
        Job {
            source,
            publisher,
            pause,
        }
    }

    fn publish(&mut self, post: &Post) -> Result<(), String> {
        self.publisher.publish(post)?;
        if !self.pause.is_zero() {
            log::info!("Sleeping for {} seconds to avoid rate limits...", self.pause.as_secs());
            thread::sleep(self.pause);
        }
        Ok(())
    }

    /// Post the next game of every pair that has one. A pair's
    /// `games_played` only moves once its post went out. Returns the
    /// number of posts.
    pub fn run_pairs(&mut self, pairs: &mut [PairRecord]) -> Result<usize, String> {
        let mut posted = 0;
        for pair in pairs.iter_mut() {
            log::info!("Processing pair: {:?}", pair);
            let (ta, ya) = (pair.team_a.as_str(), pair.year_a);
            let (tb, yb) = (pair.team_b.as_str(), pair.year_b);

            log::info!("Fetching data for {} {}...", ta, ya);
            let the_last = self.source.game_log(ta, ya.year())?;
            log::info!("Fetching data for {} {}...", tb, yb);
            let this_time = self.source.game_log(tb, yb.year())?;

            let Some(n) = pair.games_played.checked_add(1) else {
                log::warn!("Games played {} cannot advance for {} {} vs {} {}. Skipping...", pair.games_played, ta, ya, tb, yb);
                continue;
            };
            if n > the_last.games_played() || n > this_time.games_played() {
                log::warn!("Games played {} is out of range for {} {} or {} {}. Skipping...", n, ta, ya, tb, yb);
                continue;
            }

            let wins_a = the_last.wins_series(n);
            let wins_b = this_time.wins_series(n);
            let a = Side { team: ta, season: ya, color: &pair.color_a, wins: the_last.wins_after(n) };
            let b = Side { team: tb, season: yb, color: &pair.color_b, wins: this_time.wins_after(n) };

            log::info!("Generating plot for {} {} vs {} {}...", ta, ya, tb, yb);
            let svg = render::step_plot(
                &posts::comparison_title(&a, &b),
                &[
                    render::Series { label: format!("{} {} Season", ta, ya), color: a.color, wins: &wins_a },
                    render::Series { label: format!("{} {} Season", tb, yb), color: b.color, wins: &wins_b },
                ],
            );
            let post = Post {
                text: posts::comparison_text(n, &a, &b),
                alt: posts::comparison_alt(n, &a, &b),
                svg,
            };

            log::info!("Posting plot for {} {} vs {} {}...", ta, ya, tb, yb);
            self.publish(&post)?;
            pair.games_played = n;
            posted += 1;
            log::debug!("Updated pair: {:?}", pair);
        }
        Ok(posted)
    }

    /// Post the run differential table of every team-season with a new
    /// game. Returns the number of posts.
    pub fn run_diffs(&mut self, diffs: &mut [DiffRecord]) -> Result<usize, String> {
        let mut posted = 0;
        for diff in diffs.iter_mut() {
            log::info!("Processing run differential for: {:?}", diff);
            let (team, year) = (diff.team.as_str(), diff.year);

            log::info!("Fetching data for {} {}...", team, year);
            let season_log = self.source.game_log(team, year.year())?;

            let Some(n) = diff.games_played.checked_add(1) else {
                log::warn!("Games played {} cannot advance for {} {}. Skipping...", diff.games_played, team, year);
                continue;
            };
            if n > season_log.games_played() {
                log::warn!("Games played {} is out of range for {} {}. Skipping...", n, team, year);
                continue;
            }

            log::info!("Generating chart for {} {}...", team, year);
            let metrics = RunDiffMetrics::compute(&season_log, n);
            let post = Post {
                text: posts::run_diff_text(team, year, &metrics),
                alt: posts::run_diff_alt(team, year),
                svg: render::table(
                    &posts::run_diff_title(team, year),
                    &["Metric", "Value", "Total"],
                    &metrics.table(),
                ),
            };

            log::info!("Posting chart for {} {}...", team, year);
            self.publish(&post)?;
            diff.games_played = n;
            posted += 1;
            log::debug!("Updated diff: {:?}", diff);
        }
        Ok(posted)
    }
}
