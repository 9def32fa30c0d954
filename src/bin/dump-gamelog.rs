use std::env;
use std::error::Error;

use chrono::Datelike;

use season_metrics::cache::Cache;
use season_metrics::mlbstats::{MlbStats, SeasonSource};

fn get_args() -> Result<(String, i32), Box<dyn Error>> {
    let args: Vec<_> = env::args().collect();
    let team = args.get(1).ok_or("usage: dump-gamelog TEAM [YEAR]")?.clone();
    let year = if args.len() >= 3 {
        args[2].parse()?
    } else {
        chrono::offset::Local::now().year()
    };
    Ok((team, year))
}

fn main() -> Result<(), Box<dyn Error>> {
    let (team, year) = get_args()?;
    let stats = MlbStats::new(Cache::disabled());
    let log = stats.game_log(&team, year)?;
    println!("{:>4} {:>3} {:>3} {:>7}", "G", "R", "RA", "W-L");
    for row in log.rows() {
        println!(
            "{:>4} {:>3} {:>3} {:>7}",
            row.game,
            row.runs,
            row.runs_allowed,
            format!("{}-{}", row.wins, row.losses)
        );
    }
    Ok(())
}
